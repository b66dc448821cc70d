//! Centralized default constants for optionhub.
//!
//! Every crate reads its defaults from here; environment configuration in the
//! API server overrides them.

// =============================================================================
// SEARCH DISPATCH
// =============================================================================

/// Queries shorter than this (in characters) are answered with a preview.
pub const SEARCH_MIN_QUERY_LEN: usize = 2;

/// Maximum rows returned by a vocabulary search or preview.
pub const SEARCH_RESULT_LIMIT: i64 = 10;

// =============================================================================
// EVENTS
// =============================================================================

/// Broadcast buffer of the in-process event bus.
pub const EVENT_BUS_CAPACITY: usize = 256;

/// HTTP timeout for event delivery, in seconds.
pub const EVENT_TIMEOUT_SECS: u64 = 10;

// =============================================================================
// DATABASE BOOTSTRAP
// =============================================================================

/// Connection attempts made at startup before giving up.
pub const DB_CONNECT_ATTEMPTS: u32 = 5;

/// Delay between startup connection attempts, in milliseconds.
pub const DB_CONNECT_RETRY_MS: u64 = 500;

// =============================================================================
// SERVER
// =============================================================================

pub const HOST: &str = "0.0.0.0";

pub const PORT: u16 = 3000;

pub const DATABASE_URL: &str = "postgres://localhost/optionhub";

/// Request header carrying the caller identity.
pub const IDENTITY_HEADER: &str = "uuid";
