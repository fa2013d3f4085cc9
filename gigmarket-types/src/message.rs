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

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{OrderId, UserId};

/// A persisted chat message.
///
/// `id` and `created_at` are assigned by the message store at persistence
/// time; a message is never edited or deleted once it exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: i64,
    pub sender_id: UserId,
    pub recipient_id: UserId,
    /// `None` means the general direct-message thread between the two users.
    pub order_id: Option<OrderId>,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

impl ChatMessage {
    /// True if `user_a` and `user_b` are the two participants of this
    /// message, in either direction.
    pub fn is_between(&self, user_a: UserId, user_b: UserId) -> bool {
        (self.sender_id == user_a && self.recipient_id == user_b)
            || (self.sender_id == user_b && self.recipient_id == user_a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(sender_id: UserId, recipient_id: UserId) -> ChatMessage {
        ChatMessage {
            id: 1,
            sender_id,
            recipient_id,
            order_id: None,
            message: "hi".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn is_between_matches_both_directions() {
        assert!(message(1, 2).is_between(1, 2));
        assert!(message(1, 2).is_between(2, 1));
    }

    #[test]
    fn is_between_excludes_third_users() {
        assert!(!message(1, 2).is_between(1, 3));
        assert!(!message(1, 2).is_between(3, 2));
    }
}
