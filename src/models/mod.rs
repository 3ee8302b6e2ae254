//! Data models
//!
//! Market-data payloads plus the DTOs used by the gateway's HTTP bodies.

pub mod providers;
pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use providers::{MeasureDefinition, NearbyProvider, ProviderTypeCount, QualityMatrix};
pub use requests::{GeoQueryParams, RefreshParams};
pub use responses::{ClearResponse, HealthResponse, StatsResponse};
