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

use actix::Message as ActixMessage;
use std::sync::Arc;

/// One prepared outbound frame, pushed into a session actor's mailbox.
///
/// The payload is the already-serialized JSON text, shared across every
/// session it is fanned out to.
#[derive(Clone, ActixMessage)]
#[rtype(result = "()")]
pub struct SessionMessage {
    pub payload: Arc<str>,
}
