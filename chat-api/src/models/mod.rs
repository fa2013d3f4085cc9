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

use std::sync::Arc;

use crate::chat::ChatService;
use crate::registry::ConnectionRegistry;

/// Shared application state, constructed once in the binary and handed to
/// every handler via `web::Data`.
pub struct AppState {
    pub registry: Arc<ConnectionRegistry>,
    pub chat: Arc<ChatService>,
}
