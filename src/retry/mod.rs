//! Retry Module
//!
//! Single-retry fetch wrapper and request generations for discarding
//! superseded responses.

mod generation;
mod policy;

pub use generation::{Generation, GenerationCounter};
pub use policy::{
    fetch_with_retry, Attempt, RetryPolicy, DEFAULT_RETRY_DELAY, MAX_AUTOMATIC_RETRIES,
};
