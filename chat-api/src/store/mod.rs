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

//! Durable storage for chat messages.
//!
//! The chat core talks to an abstract [`MessageStore`]; the store assigns
//! message ids and timestamps. [`PgMessageStore`] is the production
//! implementation, [`MemoryStore`] backs tests and database-less
//! development.

pub mod memory;
pub mod postgres;

use std::error::Error;
use std::fmt;

use async_trait::async_trait;
use gigmarket_types::{ChatMessage, OrderId, UserId};

pub use memory::MemoryStore;
pub use postgres::PgMessageStore;

/// Input for persisting one message. Identifier and timestamp are
/// assigned by the store, never by the caller.
#[derive(Debug, Clone)]
pub struct NewMessage {
    pub sender_id: UserId,
    pub recipient_id: UserId,
    pub order_id: Option<OrderId>,
    pub message: String,
}

#[derive(Debug)]
pub enum StoreError {
    Unavailable(String),
    Query(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Unavailable(e) => write!(f, "message store unavailable: {e}"),
            StoreError::Query(e) => write!(f, "message store query failed: {e}"),
        }
    }
}

impl Error for StoreError {}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                StoreError::Unavailable(err.to_string())
            }
            other => StoreError::Query(other.to_string()),
        }
    }
}

/// Durable append + query of chat messages.
#[async_trait]
pub trait MessageStore: Send + Sync {
    /// Persist one message; the store assigns `id` and `created_at`.
    async fn create(&self, new_message: NewMessage) -> Result<ChatMessage, StoreError>;

    /// Every message between `user_a` and `user_b`, in both directions,
    /// optionally restricted to one order, ordered by `created_at`
    /// ascending with ties broken by `id` ascending.
    async fn conversation(
        &self,
        user_a: UserId,
        user_b: UserId,
        order_id: Option<OrderId>,
    ) -> Result<Vec<ChatMessage>, StoreError>;
}
