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

//! Shared types for the gigmarket chat backend: the persisted message
//! entity and the JSON frames exchanged over a chat session.

pub mod frames;
pub mod message;

pub use frames::{InboundFrame, OutboundFrame};
pub use message::ChatMessage;

/// Marketplace user identifier (primary key of the users table).
pub type UserId = i64;

/// Order identifier used to scope a conversation to one order.
pub type OrderId = i64;
