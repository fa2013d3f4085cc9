/*
 * Copyright 2025 Security Union LLC
 *
 * Licensed under either of
 *
 * * Apache License, Version 2.0
 *   (http://www.apache.org/licenses/LICENSE-2.0)
 * * MIT license
 *   (http://opensource.org/licenses/MIT)
 *
 * at your option.
 */

//! Chat endpoints.
//!
//! - **`GET /ws/{user_id}`**: websocket connection endpoint; the user id
//!   comes from the path (auth is resolved upstream of this service).
//! - **`GET /chats/{user_id}/messages`**: conversation history.
//! - **`POST /chats/{user_id}/messages`**: send a message over plain
//!   HTTP; it is persisted and fanned out to live sessions exactly like a
//!   websocket frame.
//! - **`GET /metrics`**: Prometheus exposition.

use actix::prelude::Stream;
use actix::{Actor, StreamHandler};
use actix_http::error::PayloadError;
use actix_http::ws::{Codec, Message, ProtocolError};
use actix_web::web::Bytes;
use actix_web::{error, get, post, web, Error, HttpRequest, HttpResponse};
use actix_web_actors::ws::{handshake, WebsocketContext};
use gigmarket_types::{InboundFrame, OrderId, UserId};
use prometheus::{Encoder, TextEncoder};
use serde::Deserialize;
use tracing::{debug, error as log_error};

use crate::actors::chat_session::WsChatSession;
use crate::constants::MAX_FRAME_BYTES;
use crate::ingest::IngestError;
use crate::models::AppState;

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub recipient_id: UserId,
    pub order_id: Option<OrderId>,
}

#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    pub recipient_id: UserId,
    pub message: String,
    #[serde(default)]
    pub order_id: Option<OrderId>,
}

/// Start a WebSocket connection with a custom codec.
fn start_with_codec<A, S>(
    actor: A,
    req: &HttpRequest,
    stream: S,
    codec: Codec,
) -> Result<HttpResponse, Error>
where
    A: Actor<Context = WebsocketContext<A>> + StreamHandler<Result<Message, ProtocolError>>,
    S: Stream<Item = Result<Bytes, PayloadError>> + 'static,
{
    let mut res = handshake(req)?;
    Ok(res.streaming(WebsocketContext::with_codec(actor, stream, codec)))
}

#[get("/ws/{user_id}")]
pub async fn ws_connect(
    path: web::Path<UserId>,
    req: HttpRequest,
    stream: web::Payload,
    state: web::Data<AppState>,
) -> Result<HttpResponse, Error> {
    let user_id = path.into_inner();
    debug!("socket connected for user {user_id}");
    let actor = WsChatSession::new(user_id, state.registry.clone(), state.chat.clone());
    let codec = Codec::new().max_size(MAX_FRAME_BYTES);
    start_with_codec(actor, &req, stream, codec)
}

#[get("/chats/{user_id}/messages")]
pub async fn chat_history(
    path: web::Path<UserId>,
    query: web::Query<HistoryQuery>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, Error> {
    let user_id = path.into_inner();
    let messages = state
        .chat
        .history(user_id, query.recipient_id, query.order_id)
        .await
        .map_err(|err| {
            log_error!("history query for users {user_id}/{} failed: {err}", query.recipient_id);
            error::ErrorInternalServerError(err)
        })?;
    Ok(HttpResponse::Ok().json(messages))
}

#[post("/chats/{user_id}/messages")]
pub async fn send_message(
    path: web::Path<UserId>,
    body: web::Json<SendMessageRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, Error> {
    let sender_id = path.into_inner();
    let body = body.into_inner();
    let frame = InboundFrame::Message {
        recipient_id: body.recipient_id,
        message: body.message,
        order_id: body.order_id,
    };

    match state.chat.send_frame(sender_id, frame).await {
        Ok((message, report)) => {
            debug!(
                "user {sender_id} posted message {}: {} delivered live",
                message.id,
                report.delivered_count()
            );
            Ok(HttpResponse::Created().json(message))
        }
        Err(err @ IngestError::MalformedFrame(_)) => Err(error::ErrorBadRequest(err)),
        Err(err @ IngestError::PersistenceFailed(_)) => {
            log_error!("user {sender_id}: {err}");
            Err(error::ErrorInternalServerError(err))
        }
    }
}

#[get("/metrics")]
pub async fn metrics_endpoint() -> Result<HttpResponse, Error> {
    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();
    encoder
        .encode(&prometheus::gather(), &mut buffer)
        .map_err(error::ErrorInternalServerError)?;
    Ok(HttpResponse::Ok()
        .content_type(encoder.format_type())
        .body(buffer))
}
