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

use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use gig_api::api::chats::{chat_history, metrics_endpoint, send_message, ws_connect};
use gig_api::chat::ChatService;
use gig_api::config::Config;
use gig_api::models::AppState;
use gig_api::registry::ConnectionRegistry;
use gig_api::store::{MemoryStore, MessageStore, PgMessageStore};
use std::sync::Arc;
use tracing::{info, warn};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let config = Config::from_env();

    let store: Arc<dyn MessageStore> = match &config.database_url {
        Some(url) => {
            let store = PgMessageStore::connect(url)
                .await
                .map_err(|err| std::io::Error::new(std::io::ErrorKind::Other, err))?;
            Arc::new(store)
        }
        None => {
            warn!("DATABASE_URL not set, falling back to the in-memory message store");
            Arc::new(MemoryStore::new())
        }
    };

    let registry = Arc::new(ConnectionRegistry::new());
    let chat = Arc::new(ChatService::new(store, registry.clone()));

    info!("chat server listening on {}", config.listen_addr);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(AppState {
                registry: registry.clone(),
                chat: chat.clone(),
            }))
            .wrap(cors)
            .service(ws_connect)
            .service(chat_history)
            .service(send_message)
            .service(metrics_endpoint)
    })
    .bind(config.listen_addr.as_str())?
    .run()
    .await
}
