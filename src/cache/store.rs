//! Cache Store Module
//!
//! Session-scoped key/value store with a fixed TTL and lazy expiry.

use std::collections::HashMap;
use std::time::Duration;

use tracing::trace;

use crate::cache::entry::current_timestamp_ms;
use crate::cache::{CacheEntry, CacheStats};

// == Cache Store ==
/// In-memory cache with a single time-to-live for every entry.
///
/// Expiry is lazy: a stale entry reads as absent but stays in the map until
/// it is overwritten or the whole store is cleared. There is no capacity
/// eviction.
#[derive(Debug)]
pub struct CacheStore<V> {
    entries: HashMap<String, CacheEntry<V>>,
    stats: CacheStats,
    ttl: Duration,
}

impl<V: Clone> CacheStore<V> {
    // == Constructor ==
    /// Creates an empty store whose entries stay fresh for `ttl`.
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            stats: CacheStats::new(),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    // == Set ==
    /// Stores a value, overwriting any previous entry and resetting its
    /// timestamp.
    pub fn set(&mut self, key: impl Into<String>, value: V) {
        self.set_at(key, value, current_timestamp_ms());
    }

    /// Stores a value stamped with an explicit clock reading.
    pub fn set_at(&mut self, key: impl Into<String>, value: V, now: u64) {
        self.entries
            .insert(key.into(), CacheEntry::stored_at(value, now));
        self.stats.set_total_entries(self.entries.len());
    }

    // == Get ==
    /// Returns the value for `key` if it was stored less than one TTL ago.
    pub fn get(&mut self, key: &str) -> Option<V> {
        self.get_at(key, current_timestamp_ms())
    }

    /// Same as [`get`](Self::get), evaluated at the clock reading `now`.
    pub fn get_at(&mut self, key: &str, now: u64) -> Option<V> {
        match self.entries.get(key) {
            Some(entry) if entry.is_valid_at(now, self.ttl) => {
                self.stats.record_hit();
                Some(entry.value.clone())
            }
            Some(_) => {
                trace!(key, "cache entry stale");
                self.stats.record_miss();
                None
            }
            None => {
                self.stats.record_miss();
                None
            }
        }
    }

    // == Clear ==
    /// Drops every entry. Hit and miss counters are kept.
    pub fn clear(&mut self) -> usize {
        let removed = self.entries.len();
        self.entries.clear();
        self.stats.set_total_entries(0);
        removed
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    /// Number of entries in the map, stale ones included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;

    fn store() -> CacheStore<String> {
        CacheStore::new(Duration::from_secs(300))
    }

    #[test]
    fn test_store_new() {
        let store = store();
        assert_eq!(store.len(), 0);
        assert!(store.is_empty());
        assert_eq!(store.ttl(), Duration::from_secs(300));
    }

    #[test]
    fn test_store_set_and_get() {
        let mut store = store();

        store.set("key1", "value1".to_string());

        assert_eq!(store.get("key1").as_deref(), Some("value1"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_get_nonexistent() {
        let mut store = store();
        assert!(store.get("nonexistent").is_none());
    }

    #[test]
    fn test_store_overwrite() {
        let mut store = store();

        store.set("key1", "value1".to_string());
        store.set("key1", "value2".to_string());

        assert_eq!(store.get("key1").as_deref(), Some("value2"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_ttl_expiration() {
        let mut store = CacheStore::new(Duration::from_millis(50));

        store.set("key1", "value1".to_string());
        assert!(store.get("key1").is_some());

        // Wait for expiration
        sleep(Duration::from_millis(80));

        assert!(store.get("key1").is_none());
        // Lazy expiry: the stale entry is still in the map
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_overwrite_resets_timestamp() {
        let mut store = CacheStore::new(Duration::from_millis(100));

        store.set_at("key1", "old".to_string(), 1_000);
        assert!(store.get_at("key1", 1_150).is_none());

        store.set_at("key1", "new".to_string(), 1_150);
        assert_eq!(store.get_at("key1", 1_200).as_deref(), Some("new"));
    }

    #[test]
    fn test_store_clear() {
        let mut store = store();

        store.set("key1", "value1".to_string());
        store.set("key2", "value2".to_string());

        assert_eq!(store.clear(), 2);
        assert!(store.is_empty());
        assert!(store.get("key1").is_none());
    }

    #[test]
    fn test_store_stats() {
        let mut store = CacheStore::new(Duration::from_millis(100));

        store.set_at("key1", "value1".to_string(), 1_000);
        store.get_at("key1", 1_010); // hit
        store.get_at("key1", 1_200); // stale: miss
        store.get_at("nonexistent", 1_200); // miss

        let stats = store.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 2);
        assert_eq!(stats.total_entries, 1);
    }
}
