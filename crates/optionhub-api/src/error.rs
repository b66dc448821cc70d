//! HTTP error mapping.
//!
//! Storage failures map differently depending on the operation: vocabulary
//! reads report 404 "lookup failed", writes report 409 "aborted", and the
//! remaining reads report 500. Handlers pick the mapping with
//! [`ApiError::lookup`] / [`ApiError::write`]; everything else goes through
//! `From<optionhub_core::Error>`.

use axum::{http::StatusCode, response::IntoResponse, Json};
use tracing::{error, warn};

use optionhub_core::Error;

#[derive(Debug)]
pub enum ApiError {
    Unauthorized(String),
    NotFound(String),
    BadRequest(String),
    Conflict(String),
    Internal(String),
    /// The value was stored but its change event was not delivered.
    PublishFailed { value_id: i64, message: String },
}

impl ApiError {
    /// Map an error from a vocabulary read.
    pub fn lookup(err: Error) -> Self {
        match err {
            Error::Database(e) => {
                warn!(subsystem = "api", op = "lookup", error = %e, "Vocabulary lookup failed");
                ApiError::NotFound("lookup failed".to_string())
            }
            other => other.into(),
        }
    }

    /// Map an error from a write path.
    pub fn write(err: Error) -> Self {
        match err {
            Error::Database(e) => {
                warn!(subsystem = "api", op = "write", error = %e, "Write aborted");
                ApiError::Conflict("aborted".to_string())
            }
            other => other.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::PublishFailed { .. } => StatusCode::BAD_GATEWAY,
        }
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        match err {
            Error::Unauthenticated(msg) => ApiError::Unauthorized(msg),
            Error::NotFound(msg) => ApiError::NotFound(msg),
            Error::InvalidInput(msg) => ApiError::BadRequest(msg),
            Error::Publish { value_id, reason } => ApiError::PublishFailed {
                value_id,
                message: format!("value persisted but change event not published: {}", reason),
            },
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        let body = match self {
            ApiError::PublishFailed { value_id, message } => {
                error!(subsystem = "api", value_id, error = %message, "Event publish failed");
                serde_json::json!({
                    "error": message,
                    "persisted": true,
                    "id": value_id,
                })
            }
            ApiError::Internal(message) => {
                error!(subsystem = "api", error = %message, "Request failed");
                serde_json::json!({ "error": message })
            }
            ApiError::Unauthorized(message)
            | ApiError::NotFound(message)
            | ApiError::BadRequest(message)
            | ApiError::Conflict(message) => {
                warn!(subsystem = "api", status = status.as_u16(), error = %message, "Request rejected");
                serde_json::json!({ "error": message })
            }
        };

        (status, Json(body)).into_response()
    }
}
