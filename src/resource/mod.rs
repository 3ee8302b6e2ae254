//! Resource Module
//!
//! Consumer-facing data resources: fetch state, generation guard and
//! structured cancellation.

#[allow(clippy::module_inception)]
mod resource;
mod state;

use crate::queries::{NearbyProvidersQuery, ProviderDensityQuery, QualityMatrixQuery};

pub use resource::Resource;
pub use state::{FetchStatus, ResourceState};

pub type ProviderDensityResource = Resource<ProviderDensityQuery>;
pub type NearbyProvidersResource = Resource<NearbyProvidersQuery>;
pub type QualityMatrixResource = Resource<QualityMatrixQuery>;
