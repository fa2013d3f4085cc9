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

//! Inbound frame ingestion: decode, validate, persist.
//!
//! A message is only ever broadcast after it has been persisted; callers
//! get the stored entity back and fan out exactly that.

use std::error::Error;
use std::fmt;
use std::sync::Arc;

use gigmarket_types::{ChatMessage, InboundFrame, UserId};
use tracing::error;

use crate::metrics::{CHAT_FRAMES_REJECTED_TOTAL, CHAT_MESSAGES_INGESTED_TOTAL};
use crate::store::{MessageStore, NewMessage, StoreError};

#[derive(Debug)]
pub enum IngestError {
    /// Bad client input; the connection stays open.
    MalformedFrame(String),
    /// The store rejected or could not take the write; nothing was
    /// persisted and nothing may be broadcast.
    PersistenceFailed(StoreError),
}

impl fmt::Display for IngestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IngestError::MalformedFrame(reason) => write!(f, "malformed frame: {reason}"),
            IngestError::PersistenceFailed(err) => write!(f, "persistence failed: {err}"),
        }
    }
}

impl Error for IngestError {}

pub struct IngestionPipeline {
    store: Arc<dyn MessageStore>,
}

impl IngestionPipeline {
    pub fn new(store: Arc<dyn MessageStore>) -> Self {
        Self { store }
    }

    /// Decode a raw text frame and ingest it.
    pub async fn ingest_raw(
        &self,
        sender_id: UserId,
        raw: &str,
    ) -> Result<ChatMessage, IngestError> {
        let frame: InboundFrame =
            serde_json::from_str(raw).map_err(|e| Self::reject(e.to_string()))?;
        self.ingest_frame(sender_id, frame).await
    }

    /// Validate a decoded frame and persist the message it carries.
    pub async fn ingest_frame(
        &self,
        sender_id: UserId,
        frame: InboundFrame,
    ) -> Result<ChatMessage, IngestError> {
        let InboundFrame::Message {
            recipient_id,
            message,
            order_id,
        } = frame;

        if message.trim().is_empty() {
            return Err(Self::reject("empty message body".to_string()));
        }
        if recipient_id == sender_id {
            return Err(Self::reject(
                "sender and recipient must differ".to_string(),
            ));
        }

        let stored = self
            .store
            .create(NewMessage {
                sender_id,
                recipient_id,
                order_id,
                message,
            })
            .await
            .map_err(|err| {
                error!("failed to persist message from user {sender_id}: {err}");
                IngestError::PersistenceFailed(err)
            })?;

        CHAT_MESSAGES_INGESTED_TOTAL.inc();
        Ok(stored)
    }

    fn reject(reason: String) -> IngestError {
        CHAT_FRAMES_REJECTED_TOTAL.inc();
        IngestError::MalformedFrame(reason)
    }
}
