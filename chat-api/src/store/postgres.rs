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

//! Postgres-backed message store.
//!
//! Expects a `messages` table shaped like:
//!
//! ```sql
//! CREATE TABLE messages (
//!     id           BIGSERIAL PRIMARY KEY,
//!     sender_id    BIGINT NOT NULL REFERENCES users(id),
//!     recipient_id BIGINT NOT NULL REFERENCES users(id),
//!     order_id     BIGINT REFERENCES orders(id),
//!     message      TEXT NOT NULL,
//!     created_at   TIMESTAMPTZ NOT NULL DEFAULT NOW()
//! );
//! ```

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use gigmarket_types::{ChatMessage, OrderId, UserId};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

use super::{MessageStore, NewMessage, StoreError};

/// Row returned from the `messages` table.
#[derive(Debug, sqlx::FromRow)]
struct MessageRow {
    id: i64,
    sender_id: i64,
    recipient_id: i64,
    order_id: Option<i64>,
    message: String,
    created_at: DateTime<Utc>,
}

impl From<MessageRow> for ChatMessage {
    fn from(row: MessageRow) -> Self {
        ChatMessage {
            id: row.id,
            sender_id: row.sender_id,
            recipient_id: row.recipient_id,
            order_id: row.order_id,
            message: row.message,
            created_at: row.created_at,
        }
    }
}

pub struct PgMessageStore {
    pool: PgPool,
}

impl PgMessageStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect a fresh pool to `database_url`.
    pub async fn connect(database_url: &str) -> Result<Self, sqlx::Error> {
        info!("Connecting to database...");
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .acquire_timeout(Duration::from_secs(5))
            .connect(database_url)
            .await?;
        info!("Database connection pool established");
        Ok(Self::new(pool))
    }
}

#[async_trait]
impl MessageStore for PgMessageStore {
    async fn create(&self, new_message: NewMessage) -> Result<ChatMessage, StoreError> {
        let row = sqlx::query_as::<_, MessageRow>(
            r#"
            INSERT INTO messages (sender_id, recipient_id, order_id, message, created_at)
            VALUES ($1, $2, $3, $4, NOW())
            RETURNING id, sender_id, recipient_id, order_id, message, created_at
            "#,
        )
        .bind(new_message.sender_id)
        .bind(new_message.recipient_id)
        .bind(new_message.order_id)
        .bind(&new_message.message)
        .fetch_one(&self.pool)
        .await?;
        Ok(row.into())
    }

    async fn conversation(
        &self,
        user_a: UserId,
        user_b: UserId,
        order_id: Option<OrderId>,
    ) -> Result<Vec<ChatMessage>, StoreError> {
        let rows = sqlx::query_as::<_, MessageRow>(
            r#"
            SELECT id, sender_id, recipient_id, order_id, message, created_at
            FROM messages
            WHERE ((sender_id = $1 AND recipient_id = $2)
                OR (sender_id = $2 AND recipient_id = $1))
              AND ($3::BIGINT IS NULL OR order_id = $3)
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(user_a)
        .bind(user_b)
        .bind(order_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(ChatMessage::from).collect())
    }
}
