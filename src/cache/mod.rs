//! Cache Module
//!
//! Provides the session-scoped response cache with TTL expiration.

mod entry;
mod stats;
mod store;


use std::sync::Arc;

use tokio::sync::RwLock;

// Re-export public types
pub use entry::{current_timestamp_ms, CacheEntry};
pub use stats::CacheStats;
pub use store::CacheStore;

/// Cache of decoded upstream payloads, shared by every consumer of a
/// [`DataFetcher`](crate::fetcher::DataFetcher).
pub type SharedCache = Arc<RwLock<CacheStore<serde_json::Value>>>;
