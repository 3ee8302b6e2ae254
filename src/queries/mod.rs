//! Queries Module
//!
//! Typed descriptions of the market-data requests made by consumers. Each
//! query validates its inputs and knows which endpoint it targets.

mod nearby_providers;
mod provider_density;
mod quality_measures;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::client::ApiRequest;
use crate::error::{FetchError, Result};

pub use nearby_providers::{NearbyProvidersQuery, NEARBY_PROVIDERS_PATH};
pub use provider_density::{ProviderDensityQuery, PROVIDER_DENSITY_PATH};
pub use quality_measures::{QualityMatrixQuery, MAX_MATRIX_PROVIDERS, QUALITY_MATRIX_PATH};

/// Largest accepted search radius, in miles.
pub const MAX_RADIUS_MILES: f64 = 250.0;

/// A request that a [`Resource`](crate::resource::Resource) can fetch.
pub trait Query: Clone + Send + Sync + 'static {
    type Output: DeserializeOwned + Serialize + Clone + Send + Sync + 'static;

    fn validate(&self) -> Result<()>;

    fn request(&self) -> ApiRequest;
}

/// Checks a search point and radius.
pub fn validate_area(lat: f64, lon: f64, radius: f64) -> Result<()> {
    if !(-90.0..=90.0).contains(&lat) {
        return Err(FetchError::InvalidRequest(format!(
            "lat must be between -90 and 90, got {lat}"
        )));
    }
    if !(-180.0..=180.0).contains(&lon) {
        return Err(FetchError::InvalidRequest(format!(
            "lon must be between -180 and 180, got {lon}"
        )));
    }
    if !(radius > 0.0 && radius <= MAX_RADIUS_MILES) {
        return Err(FetchError::InvalidRequest(format!(
            "radius must be greater than 0 and at most {MAX_RADIUS_MILES} miles, got {radius}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_area() {
        assert!(validate_area(38.63, -90.2, 25.0).is_ok());
        assert!(validate_area(90.0, 180.0, MAX_RADIUS_MILES).is_ok());

        assert!(validate_area(91.0, 0.0, 10.0).is_err());
        assert!(validate_area(0.0, -181.0, 10.0).is_err());
        assert!(validate_area(0.0, 0.0, 0.0).is_err());
        assert!(validate_area(0.0, 0.0, 300.0).is_err());
        assert!(validate_area(f64::NAN, 0.0, 10.0).is_err());
        assert!(validate_area(0.0, 0.0, f64::NAN).is_err());
    }
}
