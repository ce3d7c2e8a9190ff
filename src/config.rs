// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Wire and storage constants.

/// Prefix of every live-stream frame.
pub const FRAME_PREFIX: &[u8] = b"data: ";

/// Terminator of every live-stream frame.
pub const FRAME_SUFFIX: &[u8] = b"\n\n";

/// Keepalive frame. A comment line in event-stream terms, ignored by clients.
pub const KEEPALIVE_FRAME: &[u8] = b": keepalive\n\n";

/// Audit log location used when nothing else is configured.
pub const DEFAULT_EVENT_LOG_PATH: &str = "/var/log/modsec/audit.log";

/// Environment variable naming the audit log location.
pub const EVENT_LOG_ENV: &str = "MODSEC_LOG_FILE";

/// HTTP status ModSecurity answers with when it blocks a request.
pub const BLOCKED_HTTP_CODE: u64 = 403;

/// Frames buffered per subscriber before it is considered dead.
pub const DEFAULT_SUBSCRIBER_BUFFER: usize = 256;
