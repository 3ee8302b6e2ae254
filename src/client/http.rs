//! HTTP client for the upstream API.

use std::time::Duration;

use reqwest::{Client, Url};
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::client::{ApiEnvelope, ApiRequest, HttpMethod};
use crate::error::{FetchError, Result};

/// Default per-call network timeout.
pub const DEFAULT_NETWORK_TIMEOUT: Duration = Duration::from_millis(10_000);

const MAX_ERROR_BODY: usize = 200;

/// Sends [`ApiRequest`]s to the upstream and unwraps the response envelope.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: Url,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = Url::parse(base_url).map_err(|e| {
            FetchError::InvalidRequest(format!("invalid upstream url '{base_url}': {e}"))
        })?;
        let http = Client::builder().timeout(timeout).build()?;

        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Performs `request` and returns the envelope's `data` (null when absent).
    ///
    /// Returns [`FetchError::Cancelled`] as soon as `abort` fires.
    pub async fn send(&self, request: &ApiRequest, abort: &CancellationToken) -> Result<Value> {
        let url = self.base_url.join(&request.path).map_err(|e| {
            FetchError::InvalidRequest(format!("invalid path '{}': {e}", request.path))
        })?;

        let builder = match request.method {
            HttpMethod::Get => self.http.get(url),
            HttpMethod::Post => self.http.post(url),
        };
        let builder = builder.query(&request.query);
        let builder = match &request.body {
            Some(body) => builder.json(body),
            None => builder,
        };

        debug!(method = %request.method, url = %request.url(), "sending upstream request");

        let response = tokio::select! {
            biased;
            _ = abort.cancelled() => return Err(FetchError::Cancelled),
            response = builder.send() => response?,
        };

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::Status {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }

        let envelope: ApiEnvelope<Value> = response.json().await?;
        Ok(envelope.into_result()?.unwrap_or(Value::Null))
    }
}

/// Prefers the envelope's `error` field, falling back to the raw body.
fn error_message(body: &str) -> String {
    if let Ok(envelope) = serde_json::from_str::<ApiEnvelope<Value>>(body) {
        if let Some(error) = envelope.error {
            return error;
        }
    }
    let mut message: String = body.trim().chars().take(MAX_ERROR_BODY).collect();
    if message.is_empty() {
        message.push_str("empty response body");
    }
    message
}
