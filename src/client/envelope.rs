//! The `{ success, data, error }` response wrapper used by every `/api/*`
//! endpoint.

use serde::{Deserialize, Serialize};

use crate::error::{FetchError, Result};

/// JSON envelope around API payloads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiEnvelope<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
        }
    }

    /// Unwraps the envelope. A successful envelope may omit `data`;
    /// `success: false` becomes [`FetchError::Application`].
    pub fn into_result(self) -> Result<Option<T>> {
        if self.success {
            Ok(self.data)
        } else {
            Err(FetchError::Application(
                self.error
                    .unwrap_or_else(|| "request failed without an error message".to_string()),
            ))
        }
    }
}
