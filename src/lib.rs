//! Market Gateway - cached, deduplicated access to market-intelligence data
//!
//! Provides a TTL response cache, in-flight request deduplication and a
//! single-retry fetch wrapper in front of the provider, census and
//! quality-measure APIs, plus consumer resources that discard superseded
//! responses.

pub mod api;
pub mod cache;
pub mod client;
pub mod config;
pub mod dedup;
pub mod error;
pub mod fetcher;
pub mod models;
pub mod queries;
pub mod resource;
pub mod retry;

pub use api::AppState;
pub use config::Config;
pub use error::{FetchError, Result};
pub use fetcher::DataFetcher;
pub use resource::{FetchStatus, Resource, ResourceState};
