//! Client Module
//!
//! Request descriptions, the response envelope, and the reqwest-based
//! upstream client.

mod envelope;
mod http;
mod request;

pub use envelope::ApiEnvelope;
pub use http::{ApiClient, DEFAULT_NETWORK_TIMEOUT};
pub use request::{ApiRequest, HttpMethod};
