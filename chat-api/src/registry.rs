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

//! Registry of live chat sessions, keyed by user.
//!
//! One user may have any number of concurrent sessions (tabs, devices),
//! so the registry maps a user id to a set of session handles rather than
//! a single connection. The registry is constructed once at process start
//! and injected everywhere it is needed; it is never a global.

use std::collections::HashMap;
use std::sync::Mutex;

use actix::Recipient;
use gigmarket_types::UserId;
use tracing::debug;
use uuid::Uuid;

use crate::messages::SessionMessage;
use crate::metrics::CHAT_SESSIONS_ACTIVE;

/// Process-unique identifier of one live session.
pub type SessionId = u64;

/// Derive a compact session id from a v4 UUID.
pub fn next_session_id() -> SessionId {
    (Uuid::new_v4().as_u128() & 0xFFFF_FFFF_FFFF_FFFF) as u64
}

/// The outbound-send capability of one live session: its id plus the
/// address frames are pushed to. Cloning yields another handle to the
/// same session.
#[derive(Clone)]
pub struct SessionHandle {
    pub id: SessionId,
    pub addr: Recipient<SessionMessage>,
}

/// Concurrent map from user id to that user's live sessions.
///
/// A user present in the map always has a non-empty session set; the
/// entry is dropped the moment its last session unregisters.
pub struct ConnectionRegistry {
    sessions: Mutex<HashMap<UserId, Vec<SessionHandle>>>,
}

impl Default for ConnectionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// Add a session to the user's live set, creating the set if absent.
    pub fn register(&self, user_id: UserId, handle: SessionHandle) {
        let mut sessions = self.sessions.lock().unwrap();
        let session_id = handle.id;
        sessions.entry(user_id).or_default().push(handle);
        CHAT_SESSIONS_ACTIVE.inc();
        debug!("registered session {session_id} for user {user_id}");
    }

    /// Remove the session from the user's set; drops the user entry when
    /// the set empties. A no-op if the user or session is already gone,
    /// so racing disconnect paths stay safe.
    pub fn unregister(&self, user_id: UserId, session_id: SessionId) {
        let mut sessions = self.sessions.lock().unwrap();
        if let Some(live) = sessions.get_mut(&user_id) {
            let before = live.len();
            live.retain(|handle| handle.id != session_id);
            if live.len() < before {
                CHAT_SESSIONS_ACTIVE.dec();
                debug!("unregistered session {session_id} for user {user_id}");
            }
            if live.is_empty() {
                sessions.remove(&user_id);
            }
        }
    }

    /// Snapshot of the user's live sessions at call time. The returned
    /// vector is a copy: mutations after this call do not affect it.
    pub fn live_sessions_of(&self, user_id: UserId) -> Vec<SessionHandle> {
        self.sessions
            .lock()
            .unwrap()
            .get(&user_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Number of users with at least one live session.
    pub fn connected_users(&self) -> usize {
        self.sessions.lock().unwrap().len()
    }

    /// Total number of live sessions across all users.
    pub fn session_count(&self) -> usize {
        self.sessions.lock().unwrap().values().map(Vec::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::recording_session;
    use std::sync::Arc;

    #[actix_rt::test]
    async fn register_tracks_multiple_sessions_per_user() {
        let registry = ConnectionRegistry::new();
        let (first, _, _) = recording_session();
        let (second, _, _) = recording_session();

        registry.register(1, first);
        registry.register(1, second);

        assert_eq!(registry.live_sessions_of(1).len(), 2);
        assert_eq!(registry.connected_users(), 1);
        assert_eq!(registry.session_count(), 2);
    }

    #[actix_rt::test]
    async fn unregister_drops_empty_user_entries() {
        let registry = ConnectionRegistry::new();
        let (first, _, _) = recording_session();
        let (second, _, _) = recording_session();
        let (first_id, second_id) = (first.id, second.id);

        registry.register(1, first);
        registry.register(1, second);

        registry.unregister(1, first_id);
        assert_eq!(registry.live_sessions_of(1).len(), 1);
        assert_eq!(registry.connected_users(), 1);

        registry.unregister(1, second_id);
        assert!(registry.live_sessions_of(1).is_empty());
        assert_eq!(registry.connected_users(), 0);
    }

    #[actix_rt::test]
    async fn unregister_is_idempotent() {
        let registry = ConnectionRegistry::new();
        let (handle, _, _) = recording_session();
        let session_id = handle.id;

        registry.register(1, handle);
        registry.unregister(1, session_id);
        // already gone: both of these must be silent no-ops
        registry.unregister(1, session_id);
        registry.unregister(99, session_id);

        assert_eq!(registry.session_count(), 0);
    }

    #[actix_rt::test]
    async fn snapshot_is_not_affected_by_later_mutation() {
        let registry = ConnectionRegistry::new();
        let (first, _, _) = recording_session();
        registry.register(1, first);

        let snapshot = registry.live_sessions_of(1);
        assert_eq!(snapshot.len(), 1);

        let (second, _, _) = recording_session();
        registry.register(1, second);
        registry.unregister(1, snapshot[0].id);

        // the copy taken earlier still holds exactly what it held then
        assert_eq!(snapshot.len(), 1);
        assert_eq!(registry.live_sessions_of(1).len(), 1);
    }

    #[actix_rt::test]
    async fn concurrent_register_and_unregister() {
        let registry = Arc::new(ConnectionRegistry::new());
        let handles: Vec<_> = (0..16).map(|_| recording_session().0).collect();
        let ids: Vec<_> = handles.iter().map(|h| h.id).collect();

        let mut workers = Vec::new();
        for (i, handle) in handles.into_iter().enumerate() {
            let registry = registry.clone();
            workers.push(std::thread::spawn(move || {
                registry.register((i % 4) as UserId, handle);
            }));
        }
        for worker in workers {
            worker.join().expect("register worker panicked");
        }
        assert_eq!(registry.session_count(), 16);
        assert_eq!(registry.connected_users(), 4);

        let mut workers = Vec::new();
        for (i, id) in ids.into_iter().enumerate() {
            let registry = registry.clone();
            workers.push(std::thread::spawn(move || {
                registry.unregister((i % 4) as UserId, id);
            }));
        }
        for worker in workers {
            worker.join().expect("unregister worker panicked");
        }
        assert_eq!(registry.session_count(), 0);
        assert_eq!(registry.connected_users(), 0);
    }
}
