//! Structured logging field name constants for optionhub.
//!
//! All crates use these names for `tracing` fields so log aggregation can
//! query the same keys across the API, core and storage layers.
//! `tracing` macros take field names as literals, so call sites spell the
//! key out; the tests below hold the core call sites to these names.
//!
//! ## Log Level Contract
//!
//! | Level | Usage |
//! |-------|-------|
//! | ERROR | Degraded service, requires operator attention |
//! | WARN  | Request failed at the boundary, or partial write |
//! | INFO  | Lifecycle events (startup, shutdown, migrations) |
//! | DEBUG | Per-request decisions (preview vs search, persist, publish) |

// ─── Identity fields ───────────────────────────────────────────────────────

/// Correlation ID propagated from the `x-request-id` header (UUIDv7).
pub const REQUEST_ID: &str = "request_id";

/// Subsystem originating the log event: "api", "core", "database", "events".
pub const SUBSYSTEM: &str = "subsystem";

/// Component within a subsystem, e.g. "search_dispatcher", "mutation_pipeline".
pub const COMPONENT: &str = "component";

/// Logical operation name, e.g. "preview", "search", "persist", "publish".
pub const OPERATION: &str = "op";

// ─── Entity fields ─────────────────────────────────────────────────────────

/// Vocabulary slug.
pub const VOCABULARY: &str = "vocabulary";

pub const ATTRIBUTE_ID: &str = "attribute_id";

/// Id of an attribute value allocated by the store.
pub const VALUE_ID: &str = "value_id";

/// Event topic.
pub const TOPIC: &str = "topic";

// ─── Measurement fields ────────────────────────────────────────────────────

pub const DURATION_MS: &str = "duration_ms";

pub const RESULT_COUNT: &str = "result_count";

pub const POOL_SIZE: &str = "pool_size";

pub const POOL_IDLE: &str = "pool_idle";

// ─── Outcome fields ────────────────────────────────────────────────────────

/// Error message when an operation fails.
pub const ERROR_MSG: &str = "error";
