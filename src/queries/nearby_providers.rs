use serde::{Deserialize, Serialize};

use crate::client::ApiRequest;
use crate::error::Result;
use crate::models::NearbyProvider;
use crate::queries::{validate_area, Query};

pub const NEARBY_PROVIDERS_PATH: &str = "/api/nearby-providers";

/// Provider locations within `radius` miles, optionally of one type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NearbyProvidersQuery {
    pub lat: f64,
    pub lon: f64,
    pub radius: f64,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub provider_type: Option<String>,
}

impl NearbyProvidersQuery {
    pub fn new(lat: f64, lon: f64, radius: f64) -> Self {
        Self {
            lat,
            lon,
            radius,
            provider_type: None,
        }
    }

    pub fn with_type(mut self, provider_type: impl Into<String>) -> Self {
        self.provider_type = Some(provider_type.into());
        self
    }
}

impl Query for NearbyProvidersQuery {
    type Output = Vec<NearbyProvider>;

    fn validate(&self) -> Result<()> {
        validate_area(self.lat, self.lon, self.radius)
    }

    fn request(&self) -> ApiRequest {
        let request = ApiRequest::get(NEARBY_PROVIDERS_PATH)
            .param("lat", self.lat)
            .param("lon", self.lon)
            .param("radius", self.radius);

        match self.provider_type.as_deref().map(str::trim) {
            Some(provider_type) if !provider_type.is_empty() => request.param("type", provider_type),
            _ => request,
        }
    }
}
