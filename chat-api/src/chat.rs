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

//! The chat service: ingest-then-broadcast as one logical operation, plus
//! conversation history.
//!
//! Both entry points — the websocket receive loop and the HTTP send
//! endpoint — go through [`ChatService::send_raw`] /
//! [`ChatService::send_frame`], so non-websocket senders get the same
//! live fan-out.

use std::sync::Arc;

use gigmarket_types::{ChatMessage, InboundFrame, OrderId, UserId};
use tracing::debug;

use crate::broadcast::{Broadcaster, DeliveryReport};
use crate::ingest::{IngestError, IngestionPipeline};
use crate::registry::ConnectionRegistry;
use crate::store::{MessageStore, StoreError};

pub struct ChatService {
    pipeline: IngestionPipeline,
    broadcaster: Broadcaster,
    store: Arc<dyn MessageStore>,
}

impl ChatService {
    pub fn new(store: Arc<dyn MessageStore>, registry: Arc<ConnectionRegistry>) -> Self {
        Self {
            pipeline: IngestionPipeline::new(store.clone()),
            broadcaster: Broadcaster::new(registry),
            store,
        }
    }

    /// Ingest a raw text frame, then fan the persisted message out.
    ///
    /// Broadcast only ever sees the stored entity: a message that failed
    /// to persist is never delivered to anyone.
    pub async fn send_raw(
        &self,
        sender_id: UserId,
        raw: &str,
    ) -> Result<(ChatMessage, DeliveryReport), IngestError> {
        let message = self.pipeline.ingest_raw(sender_id, raw).await?;
        Ok(self.fan_out(message))
    }

    /// Same as [`send_raw`](Self::send_raw) for an already-decoded frame.
    pub async fn send_frame(
        &self,
        sender_id: UserId,
        frame: InboundFrame,
    ) -> Result<(ChatMessage, DeliveryReport), IngestError> {
        let message = self.pipeline.ingest_frame(sender_id, frame).await?;
        Ok(self.fan_out(message))
    }

    /// Ordered message history between two users, optionally scoped to
    /// one order. Empty when no messages exist.
    pub async fn history(
        &self,
        user_a: UserId,
        user_b: UserId,
        order_id: Option<OrderId>,
    ) -> Result<Vec<ChatMessage>, StoreError> {
        self.store.conversation(user_a, user_b, order_id).await
    }

    fn fan_out(&self, message: ChatMessage) -> (ChatMessage, DeliveryReport) {
        let report = self.broadcaster.broadcast(&message);
        debug!(
            "message {} fanned out: {} delivered, {} failed",
            message.id,
            report.delivered_count(),
            report.failed_count()
        );
        (message, report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use crate::test_utils::recording_session;

    fn service() -> (ChatService, Arc<ConnectionRegistry>) {
        let registry = Arc::new(ConnectionRegistry::new());
        let store = Arc::new(MemoryStore::new());
        (ChatService::new(store, registry.clone()), registry)
    }

    #[actix_rt::test]
    async fn send_persists_then_delivers_to_sender_tabs() {
        let (chat, registry) = service();
        let (tab_one, frames_one, _) = recording_session();
        let (tab_two, frames_two, _) = recording_session();
        registry.register(1, tab_one);
        registry.register(1, tab_two);

        let (message, report) = chat
            .send_raw(1, r#"{"type":"message","recipient_id":2,"message":"hi"}"#)
            .await
            .expect("send succeeds");
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;

        // recipient 2 has no sessions: two deliveries, both to sender tabs
        assert_eq!(report.delivered_count(), 2);
        assert_eq!(frames_one.lock().unwrap().len(), 1);
        assert_eq!(frames_two.lock().unwrap().len(), 1);

        let history = chat.history(1, 2, None).await.unwrap();
        assert_eq!(history, vec![message]);
    }

    #[actix_rt::test]
    async fn rejected_frame_is_not_broadcast() {
        let (chat, registry) = service();
        let (tab, frames, _) = recording_session();
        registry.register(1, tab);

        let result = chat
            .send_raw(1, r#"{"type":"message","recipient_id":2,"message":"  "}"#)
            .await;
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;

        assert!(matches!(result, Err(IngestError::MalformedFrame(_))));
        assert!(frames.lock().unwrap().is_empty());
        assert!(chat.history(1, 2, None).await.unwrap().is_empty());
    }

    #[actix_rt::test]
    async fn history_includes_both_directions_in_order() {
        let (chat, _registry) = service();
        chat.send_raw(1, r#"{"type":"message","recipient_id":2,"message":"first"}"#)
            .await
            .unwrap();
        chat.send_raw(2, r#"{"type":"message","recipient_id":1,"message":"second"}"#)
            .await
            .unwrap();
        chat.send_raw(1, r#"{"type":"message","recipient_id":3,"message":"other thread"}"#)
            .await
            .unwrap();

        let history = chat.history(2, 1, None).await.unwrap();
        let bodies: Vec<&str> = history.iter().map(|m| m.message.as_str()).collect();
        assert_eq!(bodies, vec!["first", "second"]);
    }
}
