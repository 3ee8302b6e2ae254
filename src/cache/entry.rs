//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL support.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

// == Cache Entry ==
/// A stored value together with the moment it was stored.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// The stored value
    pub value: V,
    /// Storage timestamp (Unix milliseconds)
    pub stored_at: u64,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates a new cache entry stamped with the current time.
    pub fn new(value: V) -> Self {
        Self::stored_at(value, current_timestamp_ms())
    }

    /// Creates a new cache entry with an explicit storage timestamp.
    pub fn stored_at(value: V, stored_at: u64) -> Self {
        Self { value, stored_at }
    }

    // == Is Valid ==
    /// Checks whether the entry is still fresh at `now`.
    ///
    /// Boundary condition: an entry is valid only while `now - stored_at < ttl`.
    /// Once the TTL has fully elapsed the entry is stale. A clock reading
    /// earlier than `stored_at` counts as zero age.
    pub fn is_valid_at(&self, now: u64, ttl: Duration) -> bool {
        let age = now.saturating_sub(self.stored_at);
        u128::from(age) < ttl.as_millis()
    }

    /// Checks whether the entry is still fresh right now.
    pub fn is_valid(&self, ttl: Duration) -> bool {
        self.is_valid_at(current_timestamp_ms(), ttl)
    }

    // == Age ==
    /// Returns how long ago the entry was stored, in milliseconds.
    pub fn age_ms(&self) -> u64 {
        current_timestamp_ms().saturating_sub(self.stored_at)
    }
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
///
/// A clock set before the epoch reads as zero.
pub fn current_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
