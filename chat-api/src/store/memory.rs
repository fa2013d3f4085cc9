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

//! In-memory message store for tests and DATABASE_URL-less development.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use gigmarket_types::{ChatMessage, OrderId, UserId};

use super::{MessageStore, NewMessage, StoreError};

pub struct MemoryStore {
    messages: Mutex<Vec<ChatMessage>>,
    next_id: AtomicI64,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            messages: Mutex::new(Vec::new()),
            next_id: AtomicI64::new(1),
        }
    }

    pub fn len(&self) -> usize {
        self.messages.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[cfg(test)]
    fn seed(&self, message: ChatMessage) {
        self.messages.lock().unwrap().push(message);
    }
}

#[async_trait]
impl MessageStore for MemoryStore {
    async fn create(&self, new_message: NewMessage) -> Result<ChatMessage, StoreError> {
        let message = ChatMessage {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            sender_id: new_message.sender_id,
            recipient_id: new_message.recipient_id,
            order_id: new_message.order_id,
            message: new_message.message,
            created_at: Utc::now(),
        };
        self.messages.lock().unwrap().push(message.clone());
        Ok(message)
    }

    async fn conversation(
        &self,
        user_a: UserId,
        user_b: UserId,
        order_id: Option<OrderId>,
    ) -> Result<Vec<ChatMessage>, StoreError> {
        let mut messages: Vec<ChatMessage> = self
            .messages
            .lock()
            .unwrap()
            .iter()
            .filter(|m| m.is_between(user_a, user_b))
            .filter(|m| order_id.is_none() || m.order_id == order_id)
            .cloned()
            .collect();
        messages.sort_by_key(|m| (m.created_at, m.id));
        Ok(messages)
    }
}
