//! Response DTOs for the gateway's operational endpoints
//!
//! Data endpoints answer with [`ApiEnvelope`](crate::client::ApiEnvelope).

use serde::Serialize;

use crate::fetcher::FetcherStats;

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// Number of cache hits
    pub hits: u64,
    /// Number of cache misses (absent or stale)
    pub misses: u64,
    /// Entries currently held, stale ones included
    pub total_entries: usize,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
    /// Upstream requests currently in flight
    pub pending_requests: usize,
}

impl From<FetcherStats> for StatsResponse {
    fn from(stats: FetcherStats) -> Self {
        Self {
            hits: stats.cache.hits,
            misses: stats.cache.misses,
            total_entries: stats.cache.total_entries,
            hit_rate: stats.cache.hit_rate(),
            pending_requests: stats.pending_requests,
        }
    }
}

/// Response body for DELETE /cache
#[derive(Debug, Clone, Serialize)]
pub struct ClearResponse {
    pub message: String,
    pub cleared: usize,
}

impl ClearResponse {
    pub fn new(cleared: usize) -> Self {
        Self {
            message: format!("Cleared {} cached responses", cleared),
            cleared,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
