//! Request DTOs for the gateway API
//!
//! Defines the query strings accepted by the `/api/*` endpoints.

use serde::Deserialize;

use crate::queries::{NearbyProvidersQuery, ProviderDensityQuery};

/// Query string of the geographic endpoints
/// (`GET /api/provider-density`, `GET /api/nearby-providers`).
///
/// # Fields
/// - `lat`, `lon`: search point in degrees
/// - `radius`: search radius in miles
/// - `type`: optional provider type filter (nearby providers only)
/// - `refresh`: bypass cached results
#[derive(Debug, Clone, Deserialize)]
pub struct GeoQueryParams {
    pub lat: f64,
    pub lon: f64,
    pub radius: f64,
    #[serde(rename = "type", default)]
    pub provider_type: Option<String>,
    #[serde(default)]
    pub refresh: bool,
}

impl GeoQueryParams {
    pub fn density_query(&self) -> ProviderDensityQuery {
        ProviderDensityQuery::new(self.lat, self.lon, self.radius)
    }

    pub fn nearby_query(&self) -> NearbyProvidersQuery {
        let query = NearbyProvidersQuery::new(self.lat, self.lon, self.radius);
        match &self.provider_type {
            Some(provider_type) => query.with_type(provider_type.clone()),
            None => query,
        }
    }
}

/// Query string carrying only the refresh flag.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RefreshParams {
    #[serde(default)]
    pub refresh: bool,
}
