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

//! JSON frames exchanged over a chat session.
//!
//! Frames carry a `"type"` discriminator and decode into tagged enums, so
//! an unknown discriminator fails the decode instead of being silently
//! ignored.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::message::ChatMessage;
use crate::{OrderId, UserId};

/// A frame received from a connected client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum InboundFrame {
    Message {
        recipient_id: UserId,
        message: String,
        #[serde(default)]
        order_id: Option<OrderId>,
    },
}

/// A frame pushed to every live session of a message's participants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum OutboundFrame {
    Message {
        id: i64,
        sender_id: UserId,
        recipient_id: UserId,
        order_id: Option<OrderId>,
        message: String,
        created_at: DateTime<Utc>,
    },
}

impl From<&ChatMessage> for OutboundFrame {
    fn from(msg: &ChatMessage) -> Self {
        OutboundFrame::Message {
            id: msg.id,
            sender_id: msg.sender_id,
            recipient_id: msg.recipient_id,
            order_id: msg.order_id,
            message: msg.message.clone(),
            created_at: msg.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_message_frame() {
        let frame: InboundFrame =
            serde_json::from_str(r#"{"type":"message","recipient_id":2,"message":"hi"}"#)
                .expect("valid frame");
        assert_eq!(
            frame,
            InboundFrame::Message {
                recipient_id: 2,
                message: "hi".to_string(),
                order_id: None,
            }
        );
    }

    #[test]
    fn decode_message_frame_with_order_scope() {
        let frame: InboundFrame = serde_json::from_str(
            r#"{"type":"message","recipient_id":2,"message":"hi","order_id":7}"#,
        )
        .expect("valid frame");
        let InboundFrame::Message { order_id, .. } = frame;
        assert_eq!(order_id, Some(7));
    }

    #[test]
    fn unknown_frame_type_is_rejected() {
        let result: Result<InboundFrame, _> =
            serde_json::from_str(r#"{"type":"typing","recipient_id":2}"#);
        assert!(result.is_err());
    }

    #[test]
    fn missing_recipient_is_rejected() {
        let result: Result<InboundFrame, _> =
            serde_json::from_str(r#"{"type":"message","message":"hi"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn outbound_frame_carries_the_full_message() {
        let msg = ChatMessage {
            id: 42,
            sender_id: 1,
            recipient_id: 2,
            order_id: Some(7),
            message: "hello".to_string(),
            created_at: "2026-08-28T12:00:00Z".parse().expect("timestamp"),
        };
        let frame = OutboundFrame::from(&msg);
        let json = serde_json::to_value(&frame).expect("serialize");
        assert_eq!(json["type"], "message");
        assert_eq!(json["id"], 42);
        assert_eq!(json["sender_id"], 1);
        assert_eq!(json["recipient_id"], 2);
        assert_eq!(json["order_id"], 7);
        assert_eq!(json["message"], "hello");
        // chrono serializes DateTime<Utc> as RFC 3339
        assert!(json["created_at"]
            .as_str()
            .expect("string timestamp")
            .starts_with("2026-08-28T12:00:00"));
    }
}
