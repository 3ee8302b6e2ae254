//! Configuration Module
//!
//! Handles loading gateway configuration from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Gateway configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the upstream REST API
    pub upstream_url: String,
    /// HTTP server port
    pub server_port: u16,
    /// Time-to-live of cached responses, in seconds
    pub cache_ttl: u64,
    /// Deadline for a deduplicated request, in milliseconds
    pub dedup_timeout_ms: u64,
    /// Per-call network timeout, in milliseconds
    pub network_timeout_ms: u64,
    /// Delay before the single automatic retry, in milliseconds
    pub retry_delay_ms: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `UPSTREAM_URL` - Upstream API base URL (default: http://127.0.0.1:5000)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `CACHE_TTL_SECS` - Cache TTL in seconds (default: 300)
    /// - `DEDUP_TIMEOUT_MS` - Pending request deadline (default: 30000)
    /// - `NETWORK_TIMEOUT_MS` - Per-call network timeout (default: 10000)
    /// - `RETRY_DELAY_MS` - Delay before the automatic retry (default: 1000)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            upstream_url: env::var("UPSTREAM_URL").unwrap_or(defaults.upstream_url),
            server_port: env_or("SERVER_PORT", defaults.server_port),
            cache_ttl: env_or("CACHE_TTL_SECS", defaults.cache_ttl),
            dedup_timeout_ms: env_or("DEDUP_TIMEOUT_MS", defaults.dedup_timeout_ms),
            network_timeout_ms: env_or("NETWORK_TIMEOUT_MS", defaults.network_timeout_ms),
            retry_delay_ms: env_or("RETRY_DELAY_MS", defaults.retry_delay_ms),
        }
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl)
    }

    pub fn dedup_timeout(&self) -> Duration {
        Duration::from_millis(self.dedup_timeout_ms)
    }

    pub fn network_timeout(&self) -> Duration {
        Duration::from_millis(self.network_timeout_ms)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            upstream_url: "http://127.0.0.1:5000".to_string(),
            server_port: 3000,
            cache_ttl: 300,
            dedup_timeout_ms: 30_000,
            network_timeout_ms: 10_000,
            retry_delay_ms: 1_000,
        }
    }
}

fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
