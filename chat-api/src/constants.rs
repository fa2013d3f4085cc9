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

use std::time::Duration;

/// How often the server pings each websocket client.
pub const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(5);

/// How long a client may stay silent before its session is dropped.
pub const CLIENT_TIMEOUT: Duration = Duration::from_secs(10);

/// Maximum accepted websocket frame size. Chat frames are small JSON
/// objects; anything near this limit is not a chat message.
pub const MAX_FRAME_BYTES: usize = 65_536;
