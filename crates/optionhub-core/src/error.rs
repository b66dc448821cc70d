//! Error types for optionhub.

use thiserror::Error;

/// Result type alias using optionhub's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for optionhub operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation failed (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Caller identity missing or ambiguous
    #[error("Unauthenticated: {0}")]
    Unauthenticated(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The attribute value was persisted but the change event was not delivered.
    ///
    /// The row identified by `value_id` exists in the store.
    #[error("Publish error (value {value_id} persisted): {reason}")]
    Publish { value_id: i64, reason: String },

    /// HTTP/network request failed
    #[error("Request error: {0}")]
    Request(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::Request(e.to_string())
    }
}
