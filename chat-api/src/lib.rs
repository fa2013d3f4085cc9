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

//! Realtime chat layer of the gigmarket marketplace backend.
//!
//! A client opens one websocket per tab/device; each session registers
//! itself in the [`registry::ConnectionRegistry`]. Inbound frames run
//! through the [`ingest::IngestionPipeline`] (validate, persist) and the
//! persisted message is fanned out by the [`broadcast::Broadcaster`] to
//! every live session of sender and recipient. History is served from the
//! durable [`store::MessageStore`]; there is no offline mailbox.

pub mod actors;
pub mod api;
pub mod broadcast;
pub mod chat;
pub mod config;
pub mod constants;
pub mod ingest;
pub mod messages;
pub mod metrics;
pub mod models;
pub mod registry;
pub mod store;
pub mod test_utils;
