//! Deduplication Module
//!
//! Shares one in-flight call between concurrent identical requests.

mod deduplicator;
mod key;

pub use deduplicator::{RequestDeduplicator, DEFAULT_DEDUP_TIMEOUT};
pub use key::DedupKey;
