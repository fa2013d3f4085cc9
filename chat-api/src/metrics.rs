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

//! Centralized Prometheus metrics for the chat API

use lazy_static::lazy_static;
use prometheus::{register_int_counter, register_int_gauge, IntCounter, IntGauge};

lazy_static! {
    /// Number of currently registered live chat sessions
    pub static ref CHAT_SESSIONS_ACTIVE: IntGauge = register_int_gauge!(
        "gigmarket_chat_sessions_active",
        "Number of currently registered live chat sessions"
    )
    .expect("Failed to create chat_sessions_active metric");

    /// Total chat messages validated and persisted
    pub static ref CHAT_MESSAGES_INGESTED_TOTAL: IntCounter = register_int_counter!(
        "gigmarket_chat_messages_ingested_total",
        "Total chat messages validated and persisted"
    )
    .expect("Failed to create chat_messages_ingested_total metric");

    /// Total inbound frames rejected as malformed
    pub static ref CHAT_FRAMES_REJECTED_TOTAL: IntCounter = register_int_counter!(
        "gigmarket_chat_frames_rejected_total",
        "Total inbound frames rejected as malformed"
    )
    .expect("Failed to create chat_frames_rejected_total metric");

    /// Total per-session delivery failures during fan-out
    pub static ref CHAT_DELIVERY_FAILURES_TOTAL: IntCounter = register_int_counter!(
        "gigmarket_chat_delivery_failures_total",
        "Total per-session delivery failures during fan-out"
    )
    .expect("Failed to create chat_delivery_failures_total metric");
}
