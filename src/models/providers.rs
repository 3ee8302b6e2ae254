//! Payload shapes returned by the market-data endpoints.
//!
//! Only the fields consumers rely on are typed; anything else the upstream
//! sends is kept in `extra`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Provider count for one provider type inside a search radius.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderTypeCount {
    #[serde(rename = "type")]
    pub provider_type: String,
    pub count: u64,
}

/// A provider location near the search point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NearbyProvider {
    pub id: String,
    pub name: String,
    #[serde(rename = "type", default)]
    pub provider_type: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    /// Distance from the search point in miles
    #[serde(default)]
    pub distance: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Quality-measure definition shown as a matrix column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasureDefinition {
    pub code: String,
    pub label: String,
    #[serde(default)]
    pub higher_is_better: Option<bool>,
}

/// Provider by measure score matrix.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct QualityMatrix {
    #[serde(default)]
    pub measures: Vec<MeasureDefinition>,
    /// provider id -> measure code -> score (null when not reported)
    #[serde(default)]
    pub scores: BTreeMap<String, BTreeMap<String, Option<f64>>>,
    #[serde(default)]
    pub publish_date: Option<String>,
}

impl QualityMatrix {
    pub fn score(&self, provider_id: &str, measure: &str) -> Option<f64> {
        self.scores.get(provider_id)?.get(measure).copied().flatten()
    }
}
