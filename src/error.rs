//! Error types for the data-fetching layer
//!
//! Provides unified error handling using thiserror.

use std::time::Duration;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Fetch Error Enum ==
/// Unified error type for cache, dedup, retry and gateway failures.
///
/// `Clone` because a single outcome is handed to every caller that joined a
/// deduplicated request.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FetchError {
    /// Transport failure: connection refused, reset, DNS, client timeout
    #[error("Network error: {0}")]
    Network(String),

    /// Upstream answered with a non-2xx status
    #[error("Upstream returned status {status}: {message}")]
    Status { status: u16, message: String },

    /// Request exceeded the deduplicator timeout and was aborted
    #[error("Request timed out after {}ms", .0.as_millis())]
    Timeout(Duration),

    /// Upstream envelope reported `success: false`
    #[error("{0}")]
    Application(String),

    /// Response body could not be decoded
    #[error("Invalid response: {0}")]
    Decode(String),

    /// Request parameters failed validation
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Request was cancelled before it settled
    #[error("Request cancelled")]
    Cancelled,
}

impl FetchError {
    /// Network-level failures get one automatic retry; application-level
    /// failures propagate immediately.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            FetchError::Network(_) | FetchError::Status { .. } | FetchError::Timeout(_)
        )
    }

    fn status_code(&self) -> StatusCode {
        match self {
            FetchError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            FetchError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            FetchError::Cancelled => StatusCode::SERVICE_UNAVAILABLE,
            FetchError::Network(_)
            | FetchError::Status { .. }
            | FetchError::Application(_)
            | FetchError::Decode(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            FetchError::Decode(err.to_string())
        } else {
            FetchError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        FetchError::Decode(err.to_string())
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for FetchError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(json!({
            "success": false,
            "error": self.to_string(),
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the data-fetching layer.
pub type Result<T> = std::result::Result<T, FetchError>;
