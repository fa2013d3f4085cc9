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

//! Fan-out of a persisted message to every live session of its
//! participants.
//!
//! Delivery is best effort, at most once per live session: no retry, no
//! queue, no offline mailbox. A recipient with zero live sessions simply
//! receives nothing in real time; the message stays retrievable through
//! the durable store.

use std::sync::Arc;

use gigmarket_types::{ChatMessage, OutboundFrame, UserId};
use tracing::{error, trace, warn};

use crate::messages::SessionMessage;
use crate::metrics::CHAT_DELIVERY_FAILURES_TOTAL;
use crate::registry::{ConnectionRegistry, SessionId};

/// Per-session outcomes of one broadcast, for observability only; a
/// failed session never fails the broadcast.
#[derive(Debug, Default)]
pub struct DeliveryReport {
    pub delivered: Vec<(UserId, SessionId)>,
    pub failed: Vec<(UserId, SessionId)>,
}

impl DeliveryReport {
    pub fn delivered_count(&self) -> usize {
        self.delivered.len()
    }

    pub fn failed_count(&self) -> usize {
        self.failed.len()
    }
}

pub struct Broadcaster {
    registry: Arc<ConnectionRegistry>,
}

impl Broadcaster {
    pub fn new(registry: Arc<ConnectionRegistry>) -> Self {
        Self { registry }
    }

    /// Push `message` to every live session of its sender and recipient.
    ///
    /// The sender's own sessions are included, the originating one among
    /// them, so every open tab of the sender renders the same
    /// authoritative frame.
    pub fn broadcast(&self, message: &ChatMessage) -> DeliveryReport {
        let frame = OutboundFrame::from(message);
        let payload: Arc<str> = match serde_json::to_string(&frame) {
            Ok(json) => json.into(),
            Err(err) => {
                error!("failed to serialize outbound frame for message {}: {err}", message.id);
                return DeliveryReport::default();
            }
        };

        let mut report = DeliveryReport::default();
        let targets = if message.sender_id == message.recipient_id {
            vec![message.sender_id]
        } else {
            vec![message.sender_id, message.recipient_id]
        };

        for user_id in targets {
            for handle in self.registry.live_sessions_of(user_id) {
                let push = handle.addr.try_send(SessionMessage {
                    payload: payload.clone(),
                });
                match push {
                    Ok(()) => {
                        trace!("delivered message {} to session {}", message.id, handle.id);
                        report.delivered.push((user_id, handle.id));
                    }
                    Err(err) => {
                        warn!(
                            "delivery of message {} to session {} of user {user_id} failed: {err}",
                            message.id, handle.id
                        );
                        CHAT_DELIVERY_FAILURES_TOTAL.inc();
                        report.failed.push((user_id, handle.id));
                    }
                }
            }
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{recording_session, Shutdown};
    use chrono::Utc;
    use std::time::Duration;

    fn message(sender_id: UserId, recipient_id: UserId) -> ChatMessage {
        ChatMessage {
            id: 10,
            sender_id,
            recipient_id,
            order_id: None,
            message: "hello there".to_string(),
            created_at: Utc::now(),
        }
    }

    async fn drain_mailboxes() {
        // give recorder actors a chance to process their mailboxes
        tokio::time::sleep(Duration::from_millis(50)).await;
    }

    #[actix_rt::test]
    async fn delivers_to_every_session_of_both_participants() {
        let registry = Arc::new(ConnectionRegistry::new());
        let (tab_one, frames_one, _) = recording_session();
        let (tab_two, frames_two, _) = recording_session();
        let (recipient, frames_recipient, _) = recording_session();
        registry.register(1, tab_one);
        registry.register(1, tab_two);
        registry.register(2, recipient);

        let report = Broadcaster::new(registry).broadcast(&message(1, 2));
        drain_mailboxes().await;

        assert_eq!(report.delivered_count(), 3);
        assert_eq!(report.failed_count(), 0);
        for frames in [&frames_one, &frames_two, &frames_recipient] {
            let frames = frames.lock().unwrap();
            assert_eq!(frames.len(), 1);
            let json: serde_json::Value = serde_json::from_str(&frames[0]).unwrap();
            assert_eq!(json["type"], "message");
            assert_eq!(json["id"], 10);
            assert_eq!(json["sender_id"], 1);
            assert_eq!(json["recipient_id"], 2);
            assert_eq!(json["message"], "hello there");
        }
    }

    #[actix_rt::test]
    async fn offline_recipient_is_not_an_error() {
        let registry = Arc::new(ConnectionRegistry::new());
        let (sender, frames, _) = recording_session();
        registry.register(1, sender);

        let report = Broadcaster::new(registry).broadcast(&message(1, 2));
        drain_mailboxes().await;

        assert_eq!(report.delivered_count(), 1);
        assert_eq!(report.failed_count(), 0);
        assert_eq!(frames.lock().unwrap().len(), 1);
    }

    #[actix_rt::test]
    async fn uninvolved_users_receive_nothing() {
        let registry = Arc::new(ConnectionRegistry::new());
        let (sender, _, _) = recording_session();
        let (bystander, bystander_frames, _) = recording_session();
        registry.register(1, sender);
        registry.register(3, bystander);

        Broadcaster::new(registry).broadcast(&message(1, 2));
        drain_mailboxes().await;

        assert!(bystander_frames.lock().unwrap().is_empty());
    }

    #[actix_rt::test]
    async fn dead_session_does_not_block_its_siblings() {
        let registry = Arc::new(ConnectionRegistry::new());
        let (dead, dead_frames, dead_addr) = recording_session();
        let (live, live_frames, _) = recording_session();
        let dead_id = dead.id;
        registry.register(2, dead);
        registry.register(2, live);

        dead_addr.do_send(Shutdown);
        drain_mailboxes().await;

        let report = Broadcaster::new(registry).broadcast(&message(1, 2));
        drain_mailboxes().await;

        assert_eq!(report.failed_count(), 1);
        assert_eq!(report.failed[0].1, dead_id);
        assert_eq!(report.delivered_count(), 1);
        assert!(dead_frames.lock().unwrap().is_empty());
        assert_eq!(live_frames.lock().unwrap().len(), 1);
    }
}
