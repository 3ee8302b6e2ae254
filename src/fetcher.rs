//! Data Fetcher
//!
//! Composes the response cache, the request deduplicator and the retry
//! wrapper in front of the upstream client. One `DataFetcher` is built at
//! startup and handed to every consumer; clones share state.

use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::cache::{CacheStats, CacheStore, SharedCache};
use crate::client::{ApiClient, ApiRequest};
use crate::config::Config;
use crate::dedup::{RequestDeduplicator, DEFAULT_DEDUP_TIMEOUT};
use crate::error::Result;
use crate::retry::{fetch_with_retry, RetryPolicy};

/// Snapshot of the fetch layer's shared state.
#[derive(Debug, Clone, Serialize)]
pub struct FetcherStats {
    pub cache: CacheStats,
    pub pending_requests: usize,
}

#[derive(Clone)]
pub struct DataFetcher {
    client: ApiClient,
    cache: SharedCache,
    dedup: RequestDeduplicator<Value>,
    retry: RetryPolicy,
    dedup_timeout: Duration,
}

impl DataFetcher {
    pub fn new(client: ApiClient, cache_ttl: Duration) -> Self {
        Self {
            client,
            cache: Arc::new(RwLock::new(CacheStore::new(cache_ttl))),
            dedup: RequestDeduplicator::new(),
            retry: RetryPolicy::default(),
            dedup_timeout: DEFAULT_DEDUP_TIMEOUT,
        }
    }

    /// Builds the client and fetcher from gateway configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        let client = ApiClient::new(&config.upstream_url, config.network_timeout())?;
        Ok(Self::new(client, config.cache_ttl())
            .with_retry_policy(RetryPolicy::new(config.retry_delay()))
            .with_dedup_timeout(config.dedup_timeout()))
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_dedup_timeout(mut self, timeout: Duration) -> Self {
        self.dedup_timeout = timeout;
        self
    }

    pub fn cache(&self) -> &SharedCache {
        &self.cache
    }

    pub fn deduplicator(&self) -> &RequestDeduplicator<Value> {
        &self.dedup
    }

    // == Fetch ==
    /// Serves `request` from the cache, or from a (possibly shared) upstream
    /// call on a miss.
    ///
    /// With `refresh` the cache is skipped and the upstream is asked to
    /// bypass its own cache; the result still replaces the cached value.
    pub async fn fetch<T: DeserializeOwned>(&self, request: &ApiRequest, refresh: bool) -> Result<T> {
        let cache_key = request.dedup_key();

        if !refresh {
            if let Some(value) = self.cache.write().await.get(cache_key.as_str()) {
                debug!(key = %cache_key, "cache hit");
                return Ok(serde_json::from_value(value)?);
            }
        }

        let outgoing = if refresh {
            request.with_refresh()
        } else {
            request.clone()
        };
        // Stored by the request task; outlives callers that stop waiting
        let client = self.client.clone();
        let cache = Arc::clone(&self.cache);
        let value = self
            .dedup
            .execute(
                outgoing.dedup_key(),
                move |abort| async move {
                    let value = client.send(&outgoing, &abort).await?;
                    cache
                        .write()
                        .await
                        .set(cache_key.into_string(), value.clone());
                    Ok(value)
                },
                self.dedup_timeout,
            )
            .await?;

        Ok(serde_json::from_value(value)?)
    }

    /// [`fetch`](Self::fetch) with a single automatic retry. The retry
    /// always refreshes.
    pub async fn fetch_with_retry<T: DeserializeOwned>(
        &self,
        request: &ApiRequest,
        refresh: bool,
        cancel: &CancellationToken,
    ) -> Result<T> {
        fetch_with_retry(&self.retry, cancel, |attempt| {
            self.fetch(request, refresh || attempt.refresh)
        })
        .await
    }

    pub async fn clear_cache(&self) -> usize {
        self.cache.write().await.clear()
    }

    pub async fn stats(&self) -> FetcherStats {
        FetcherStats {
            cache: self.cache.read().await.stats(),
            pending_requests: self.dedup.pending_count().await,
        }
    }
}
