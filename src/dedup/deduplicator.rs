//! Request Deduplicator
//!
//! Collapses concurrent identical requests into a single in-flight call.
//! Every caller awaits a shared handle to the same outcome.

use std::collections::HashMap;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures::future::{BoxFuture, Shared};
use futures::FutureExt;
use tokio::sync::{oneshot, Mutex};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::dedup::DedupKey;
use crate::error::{FetchError, Result};

/// Default deadline for a pending request.
pub const DEFAULT_DEDUP_TIMEOUT: Duration = Duration::from_millis(30_000);

type SharedOutcome<T> = Shared<BoxFuture<'static, Result<T>>>;

// == Pending Request ==
struct PendingRequest<T> {
    /// Distinguishes this request from a later one registered under the same key
    id: u64,
    outcome: SharedOutcome<T>,
    abort: CancellationToken,
}

type PendingMap<T> = Arc<Mutex<HashMap<DedupKey, PendingRequest<T>>>>;

// == Request Deduplicator ==
/// Tracks in-flight requests by key so identical concurrent requests share
/// one call.
///
/// Each request runs on its own task, so it settles (and leaves the pending
/// set) even when every caller has stopped waiting.
pub struct RequestDeduplicator<T> {
    pending: PendingMap<T>,
    next_id: Arc<AtomicU64>,
}

impl<T> Clone for RequestDeduplicator<T> {
    fn clone(&self) -> Self {
        Self {
            pending: Arc::clone(&self.pending),
            next_id: Arc::clone(&self.next_id),
        }
    }
}

impl<T> Default for RequestDeduplicator<T> {
    fn default() -> Self {
        Self {
            pending: Arc::new(Mutex::new(HashMap::new())),
            next_id: Arc::new(AtomicU64::new(0)),
        }
    }
}

impl<T> RequestDeduplicator<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self::default()
    }

    // == Execute ==
    /// Runs `request_fn` unless a request for `key` is already pending, in
    /// which case the caller joins it.
    ///
    /// `request_fn` receives an abort token that fires when the request
    /// times out or is cancelled. The entry leaves the pending set on
    /// success, failure or after `timeout`, whichever comes first.
    pub async fn execute<F, Fut>(&self, key: DedupKey, request_fn: F, timeout: Duration) -> Result<T>
    where
        F: FnOnce(CancellationToken) -> Fut,
        Fut: Future<Output = Result<T>> + Send + 'static,
    {
        let outcome = {
            let mut pending = self.pending.lock().await;
            match pending.get(&key) {
                Some(existing) => {
                    debug!(%key, "joining in-flight request");
                    existing.outcome.clone()
                }
                None => {
                    let request = self.spawn(key.clone(), request_fn, timeout);
                    let outcome = request.outcome.clone();
                    pending.insert(key, request);
                    outcome
                }
            }
        };

        outcome.await
    }

    /// Starts the request task. Must be called with the pending map locked so
    /// the task cannot settle before its entry is registered.
    fn spawn<F, Fut>(&self, key: DedupKey, request_fn: F, timeout: Duration) -> PendingRequest<T>
    where
        F: FnOnce(CancellationToken) -> Fut,
        Fut: Future<Output = Result<T>> + Send + 'static,
    {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let abort = CancellationToken::new();
        let request = request_fn(abort.clone());

        let (tx, rx) = oneshot::channel();
        let pending = Arc::clone(&self.pending);
        let task_abort = abort.clone();

        debug!(%key, id, "starting request");
        tokio::spawn(async move {
            let result = tokio::select! {
                biased;
                _ = task_abort.cancelled() => Err(FetchError::Cancelled),
                _ = tokio::time::sleep(timeout) => {
                    warn!(%key, timeout_ms = timeout.as_millis() as u64, "request timed out, aborting");
                    task_abort.cancel();
                    Err(FetchError::Timeout(timeout))
                }
                result = AssertUnwindSafe(request).catch_unwind() => result.unwrap_or_else(|_| {
                    warn!(%key, "request panicked");
                    Err(FetchError::Network("request panicked before settling".into()))
                }),
            };

            {
                let mut pending = pending.lock().await;
                if pending.get(&key).is_some_and(|entry| entry.id == id) {
                    pending.remove(&key);
                }
            }

            // Nobody waiting is fine
            let _ = tx.send(result);
        });

        let outcome = rx
            .map(|received| received.unwrap_or(Err(FetchError::Cancelled)))
            .boxed()
            .shared();

        PendingRequest { id, outcome, abort }
    }

    // == Cancel ==
    /// Forgets the pending request for `key` and fires its abort token.
    ///
    /// Callers already waiting on it receive [`FetchError::Cancelled`]; the
    /// next `execute` for the key starts a fresh request. Returns whether a
    /// request was pending.
    pub async fn cancel(&self, key: &DedupKey) -> bool {
        let removed = self.pending.lock().await.remove(key);
        match removed {
            Some(request) => {
                debug!(%key, id = request.id, "cancelling pending request");
                request.abort.cancel();
                true
            }
            None => false,
        }
    }

    pub async fn is_pending(&self, key: &DedupKey) -> bool {
        self.pending.lock().await.contains_key(key)
    }

    pub async fn pending_count(&self) -> usize {
        self.pending.lock().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    fn key(s: &str) -> DedupKey {
        DedupKey::from(s)
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_callers_share_one_call() {
        let dedup = RequestDeduplicator::<u32>::new();
        let calls = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::new();
        for _ in 0..5 {
            let dedup = dedup.clone();
            let calls = Arc::clone(&calls);
            handles.push(tokio::spawn(async move {
                dedup
                    .execute(
                        key("GET /api/provider-density"),
                        move |_| async move {
                            calls.fetch_add(1, Ordering::SeqCst);
                            tokio::time::sleep(Duration::from_millis(100)).await;
                            Ok(42)
                        },
                        DEFAULT_DEDUP_TIMEOUT,
                    )
                    .await
            }));
        }

        for handle in handles {
            assert_eq!(handle.await.unwrap(), Ok(42));
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(dedup.pending_count().await, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_callers_share_failure() {
        let dedup = RequestDeduplicator::<u32>::new();

        let first = {
            let dedup = dedup.clone();
            tokio::spawn(async move {
                dedup
                    .execute(
                        key("k"),
                        |_| async {
                            tokio::time::sleep(Duration::from_millis(50)).await;
                            Err(FetchError::Network("connection reset".into()))
                        },
                        DEFAULT_DEDUP_TIMEOUT,
                    )
                    .await
            })
        };
        tokio::time::sleep(Duration::from_millis(1)).await;

        let second = dedup
            .execute(key("k"), |_| async { Ok(7) }, DEFAULT_DEDUP_TIMEOUT)
            .await;

        let expected = Err(FetchError::Network("connection reset".into()));
        assert_eq!(second, expected);
        assert_eq!(first.await.unwrap(), expected);
    }

    #[tokio::test(start_paused = true)]
    async fn test_settled_request_is_not_reused() {
        let dedup = RequestDeduplicator::<u32>::new();

        let first = dedup
            .execute(key("k"), |_| async { Ok(1) }, DEFAULT_DEDUP_TIMEOUT)
            .await;
        let second = dedup
            .execute(key("k"), |_| async { Ok(2) }, DEFAULT_DEDUP_TIMEOUT)
            .await;

        assert_eq!(first, Ok(1));
        assert_eq!(second, Ok(2));
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_aborts_and_frees_key() {
        let dedup = RequestDeduplicator::<u32>::new();
        let signal = Arc::new(std::sync::Mutex::new(None));

        let slot = Arc::clone(&signal);
        let result = dedup
            .execute(
                key("slow"),
                move |abort| {
                    *slot.lock().unwrap() = Some(abort);
                    std::future::pending()
                },
                Duration::from_millis(200),
            )
            .await;

        assert_eq!(result, Err(FetchError::Timeout(Duration::from_millis(200))));
        assert!(!dedup.is_pending(&key("slow")).await);

        // A subsequent call starts a fresh attempt
        let retry = dedup
            .execute(key("slow"), |_| async { Ok(9) }, Duration::from_millis(200))
            .await;
        assert_eq!(retry, Ok(9));

        let abort = signal.lock().unwrap().take().unwrap();
        assert!(abort.is_cancelled(), "abort signal fires on timeout");
    }

    async fn explode() -> Result<u32> {
        panic!("upstream handler blew up")
    }

    #[tokio::test(start_paused = true)]
    async fn test_panicking_request_frees_key() {
        let dedup = RequestDeduplicator::<u32>::new();

        let first = dedup
            .execute(key("k"), |_| explode(), DEFAULT_DEDUP_TIMEOUT)
            .await;
        assert!(matches!(first, Err(FetchError::Network(_))));
        assert!(!dedup.is_pending(&key("k")).await);

        let second = dedup
            .execute(key("k"), |_| async { Ok(5) }, DEFAULT_DEDUP_TIMEOUT)
            .await;
        assert_eq!(second, Ok(5));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_fires_abort_and_allows_fresh_call() {
        let dedup = RequestDeduplicator::<u32>::new();

        let waiter = {
            let dedup = dedup.clone();
            tokio::spawn(async move {
                dedup
                    .execute(
                        key("k"),
                        |abort| async move {
                            abort.cancelled().await;
                            Ok(1)
                        },
                        DEFAULT_DEDUP_TIMEOUT,
                    )
                    .await
            })
        };
        tokio::time::sleep(Duration::from_millis(1)).await;
        assert!(dedup.is_pending(&key("k")).await);

        assert!(dedup.cancel(&key("k")).await);
        assert!(!dedup.cancel(&key("k")).await);
        assert_eq!(waiter.await.unwrap(), Err(FetchError::Cancelled));

        let fresh = dedup
            .execute(key("k"), |_| async { Ok(2) }, DEFAULT_DEDUP_TIMEOUT)
            .await;
        assert_eq!(fresh, Ok(2));
    }

    #[tokio::test(start_paused = true)]
    async fn test_request_after_cancel_stays_pending() {
        let dedup = RequestDeduplicator::<u32>::new();

        // Old request is cancelled before it settles
        let old = {
            let dedup = dedup.clone();
            tokio::spawn(async move {
                dedup
                    .execute(
                        key("k"),
                        |_| async {
                            tokio::time::sleep(Duration::from_millis(100)).await;
                            Ok(1)
                        },
                        DEFAULT_DEDUP_TIMEOUT,
                    )
                    .await
            })
        };
        tokio::time::sleep(Duration::from_millis(1)).await;
        dedup.cancel(&key("k")).await;
        assert_eq!(old.await.unwrap(), Err(FetchError::Cancelled));

        let newer = {
            let dedup = dedup.clone();
            tokio::spawn(async move {
                dedup
                    .execute(
                        key("k"),
                        |_| async {
                            tokio::time::sleep(Duration::from_millis(500)).await;
                            Ok(2)
                        },
                        DEFAULT_DEDUP_TIMEOUT,
                    )
                    .await
            })
        };
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(dedup.is_pending(&key("k")).await);

        assert_eq!(newer.await.unwrap(), Ok(2));
        assert_eq!(dedup.pending_count().await, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_distinct_keys_run_independently() {
        let dedup = RequestDeduplicator::<u32>::new();
        let calls = Arc::new(AtomicUsize::new(0));

        let run = |name: &'static str, value: u32| {
            let dedup = dedup.clone();
            let calls = Arc::clone(&calls);
            async move {
                dedup
                    .execute(
                        key(name),
                        move |_| async move {
                            calls.fetch_add(1, Ordering::SeqCst);
                            Ok(value)
                        },
                        DEFAULT_DEDUP_TIMEOUT,
                    )
                    .await
            }
        };

        let (a, b) = tokio::join!(run("a", 1), run("b", 2));
        assert_eq!((a, b), (Ok(1), Ok(2)));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
