//! Fetch-with-retry
//!
//! A failed first attempt is retried exactly once after a fixed delay, with
//! the refresh flag set so the retry bypasses any cached value. There is no
//! backoff, jitter or circuit breaker.

use std::future::Future;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::error::{FetchError, Result};

/// Number of automatic retries after the first attempt.
pub const MAX_AUTOMATIC_RETRIES: u32 = 1;

/// Default delay before the automatic retry.
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(1_000);

// == Retry Policy ==
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Pause between the failed first attempt and the retry
    pub delay: Duration,
}

impl RetryPolicy {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_RETRY_DELAY)
    }
}

// == Attempt ==
/// Describes one invocation of the attempt function.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Attempt {
    /// Zero for the first attempt
    pub number: u32,
    /// Bypass cached values
    pub refresh: bool,
}

impl Attempt {
    fn first() -> Self {
        Self {
            number: 0,
            refresh: false,
        }
    }

    fn retry(self) -> Self {
        Self {
            number: self.number + 1,
            refresh: true,
        }
    }
}

// == Fetch With Retry ==
/// Runs `attempt_fn`, retrying once on a retryable failure.
///
/// Application-level failures surface immediately. The wait before the
/// retry is cancellable through `cancel`, in which case the result is
/// [`FetchError::Cancelled`].
pub async fn fetch_with_retry<T, F, Fut>(
    policy: &RetryPolicy,
    cancel: &CancellationToken,
    mut attempt_fn: F,
) -> Result<T>
where
    F: FnMut(Attempt) -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut attempt = Attempt::first();

    loop {
        match attempt_fn(attempt).await {
            Ok(value) => return Ok(value),
            Err(err) if err.is_retryable() && attempt.number < MAX_AUTOMATIC_RETRIES => {
                warn!(
                    error = %err,
                    delay_ms = policy.delay.as_millis() as u64,
                    "fetch failed, scheduling retry"
                );

                tokio::select! {
                    _ = cancel.cancelled() => {
                        debug!("retry cancelled");
                        return Err(FetchError::Cancelled);
                    }
                    _ = tokio::time::sleep(policy.delay) => {}
                }

                attempt = attempt.retry();
            }
            Err(err) => return Err(err),
        }
    }
}
