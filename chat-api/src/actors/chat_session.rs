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

//! WebSocket chat session actor.
//!
//! One actor per open connection. The actor registers itself with the
//! [`ConnectionRegistry`] on start and unregisters exactly once on stop;
//! in between it runs the receive loop, pushing each valid frame through
//! the chat service and dropping malformed ones without closing the
//! connection.

use std::sync::Arc;

use actix::{
    clock::Instant, Actor, ActorContext, ActorFutureExt, AsyncContext, ContextFutureSpawner,
    Handler, Running, StreamHandler, WrapFuture,
};
use actix_web_actors::ws::{self, WebsocketContext};
use gigmarket_types::UserId;
use tracing::{debug, error, info, warn};

use crate::chat::ChatService;
use crate::constants::{CLIENT_TIMEOUT, HEARTBEAT_INTERVAL};
use crate::ingest::IngestError;
use crate::messages::SessionMessage;
use crate::registry::{next_session_id, ConnectionRegistry, SessionHandle, SessionId};

pub struct WsChatSession {
    session_id: SessionId,
    user_id: UserId,
    registry: Arc<ConnectionRegistry>,
    chat: Arc<ChatService>,
    heartbeat: Instant,
}

impl WsChatSession {
    pub fn new(user_id: UserId, registry: Arc<ConnectionRegistry>, chat: Arc<ChatService>) -> Self {
        WsChatSession {
            session_id: next_session_id(),
            user_id,
            registry,
            chat,
            heartbeat: Instant::now(),
        }
    }

    fn start_heartbeat(&self, ctx: &mut WebsocketContext<Self>) {
        ctx.run_interval(HEARTBEAT_INTERVAL, |act, ctx| {
            if Instant::now().duration_since(act.heartbeat) > CLIENT_TIMEOUT {
                error!(
                    "client heartbeat failed for session {} of user {}, disconnecting",
                    act.session_id, act.user_id
                );
                ctx.stop();
                return;
            }
            ctx.ping(b"");
        });
    }
}

impl Actor for WsChatSession {
    type Context = WebsocketContext<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        info!(
            "session {} opened for user {}",
            self.session_id, self.user_id
        );
        self.registry.register(
            self.user_id,
            SessionHandle {
                id: self.session_id,
                addr: ctx.address().recipient(),
            },
        );
        self.start_heartbeat(ctx);
    }

    fn stopping(&mut self, _: &mut Self::Context) -> Running {
        info!(
            "session {} closed for user {}",
            self.session_id, self.user_id
        );
        self.registry.unregister(self.user_id, self.session_id);
        Running::Stop
    }
}

/// Outbound path: frames fanned out by the broadcaster land here.
impl Handler<SessionMessage> for WsChatSession {
    type Result = ();

    fn handle(&mut self, msg: SessionMessage, ctx: &mut Self::Context) -> Self::Result {
        ctx.text(msg.payload.as_ref());
    }
}

impl StreamHandler<Result<ws::Message, ws::ProtocolError>> for WsChatSession {
    fn handle(&mut self, item: Result<ws::Message, ws::ProtocolError>, ctx: &mut Self::Context) {
        let msg = match item {
            Ok(msg) => msg,
            Err(err) => {
                error!("websocket protocol error: {err:?}");
                ctx.stop();
                return;
            }
        };

        match msg {
            ws::Message::Text(text) => {
                self.heartbeat = Instant::now();
                let chat = self.chat.clone();
                let sender_id = self.user_id;
                // ctx.wait parks the mailbox until ingest+broadcast
                // finish, so one sender's frames stay in receive order
                async move { chat.send_raw(sender_id, &text).await }
                    .into_actor(self)
                    .map(|result, act, _ctx| match result {
                        Ok((message, report)) => {
                            debug!(
                                "user {} sent message {}: {} delivered, {} failed",
                                act.user_id,
                                message.id,
                                report.delivered_count(),
                                report.failed_count()
                            );
                        }
                        Err(IngestError::MalformedFrame(reason)) => {
                            warn!("user {}: ignoring malformed frame: {reason}", act.user_id);
                        }
                        Err(IngestError::PersistenceFailed(err)) => {
                            error!(
                                "user {}: message dropped, store unavailable: {err}",
                                act.user_id
                            );
                        }
                    })
                    .wait(ctx);
            }
            ws::Message::Binary(_) => {
                warn!(
                    "user {}: binary frames are not part of the chat protocol",
                    self.user_id
                );
            }
            ws::Message::Ping(payload) => {
                self.heartbeat = Instant::now();
                ctx.pong(&payload);
            }
            ws::Message::Pong(_) => {
                self.heartbeat = Instant::now();
            }
            ws::Message::Close(reason) => {
                info!(
                    "close received for session {} of user {}",
                    self.session_id, self.user_id
                );
                ctx.close(reason);
                ctx.stop();
            }
            _ => (),
        }
    }

    fn finished(&mut self, ctx: &mut Self::Context) {
        ctx.stop()
    }
}
