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

//! Shared test helpers for registry, broadcast and integration tests.

use std::sync::{Arc, Mutex};

use actix::{Actor, ActorContext, Context, Handler, Message as ActixMessage};

use crate::messages::SessionMessage;
use crate::registry::{next_session_id, SessionHandle};

/// Frames captured by a [`RecordingSession`], in arrival order.
pub type RecordedFrames = Arc<Mutex<Vec<String>>>;

/// Stop a [`RecordingSession`], closing its mailbox. Subsequent sends to
/// its recipient fail, which is how tests fabricate a dead session.
#[derive(ActixMessage)]
#[rtype(result = "()")]
pub struct Shutdown;

/// A stand-in session actor that records every frame pushed to it.
pub struct RecordingSession {
    frames: RecordedFrames,
}

impl RecordingSession {
    pub fn new(frames: RecordedFrames) -> Self {
        Self { frames }
    }
}

impl Actor for RecordingSession {
    type Context = Context<Self>;
}

impl Handler<SessionMessage> for RecordingSession {
    type Result = ();

    fn handle(&mut self, msg: SessionMessage, _ctx: &mut Self::Context) -> Self::Result {
        self.frames.lock().unwrap().push(msg.payload.to_string());
    }
}

impl Handler<Shutdown> for RecordingSession {
    type Result = ();

    fn handle(&mut self, _msg: Shutdown, ctx: &mut Self::Context) -> Self::Result {
        ctx.stop();
    }
}

/// Start a recording session and hand back its registry handle, its
/// captured frames and its address (for shutdown).
pub fn recording_session() -> (SessionHandle, RecordedFrames, actix::Addr<RecordingSession>) {
    let frames: RecordedFrames = Arc::default();
    let addr = RecordingSession::new(frames.clone()).start();
    let handle = SessionHandle {
        id: next_session_id(),
        addr: addr.clone().recipient(),
    };
    (handle, frames, addr)
}
