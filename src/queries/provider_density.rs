use serde::{Deserialize, Serialize};

use crate::client::ApiRequest;
use crate::error::Result;
use crate::models::ProviderTypeCount;
use crate::queries::{validate_area, Query};

pub const PROVIDER_DENSITY_PATH: &str = "/api/provider-density";

/// Provider counts by type within `radius` miles of a point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderDensityQuery {
    pub lat: f64,
    pub lon: f64,
    pub radius: f64,
}

impl ProviderDensityQuery {
    pub fn new(lat: f64, lon: f64, radius: f64) -> Self {
        Self { lat, lon, radius }
    }
}

impl Query for ProviderDensityQuery {
    type Output = Vec<ProviderTypeCount>;

    fn validate(&self) -> Result<()> {
        validate_area(self.lat, self.lon, self.radius)
    }

    fn request(&self) -> ApiRequest {
        ApiRequest::get(PROVIDER_DENSITY_PATH)
            .param("lat", self.lat)
            .param("lon", self.lon)
            .param("radius", self.radius)
    }
}
