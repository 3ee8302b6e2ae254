use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::client::ApiRequest;
use crate::error::{FetchError, Result};
use crate::models::QualityMatrix;
use crate::queries::Query;

pub const QUALITY_MATRIX_PATH: &str = "/api/quality-measures/matrix";

/// Upper bound on providers per matrix request.
pub const MAX_MATRIX_PROVIDERS: usize = 500;

/// Quality-measure scores for a set of providers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityMatrixQuery {
    pub provider_ids: Vec<String>,
    #[serde(default)]
    pub measures: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publish_date: Option<String>,
}

impl QualityMatrixQuery {
    pub fn new<I, S>(provider_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            provider_ids: provider_ids.into_iter().map(Into::into).collect(),
            measures: Vec::new(),
            publish_date: None,
        }
    }

    pub fn with_measures<I, S>(mut self, measures: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.measures = measures.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_publish_date(mut self, publish_date: impl Into<String>) -> Self {
        self.publish_date = Some(publish_date.into());
        self
    }
}

/// Sorted, de-duplicated, blank-free copy so equivalent selections share a key.
fn canonical(values: &[String]) -> Vec<&str> {
    let mut values: Vec<&str> = values
        .iter()
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .collect();
    values.sort_unstable();
    values.dedup();
    values
}

impl Query for QualityMatrixQuery {
    type Output = QualityMatrix;

    fn validate(&self) -> Result<()> {
        let ids = canonical(&self.provider_ids);
        if ids.is_empty() {
            return Err(FetchError::InvalidRequest(
                "provider_ids must contain at least one id".to_string(),
            ));
        }
        if ids.len() > MAX_MATRIX_PROVIDERS {
            return Err(FetchError::InvalidRequest(format!(
                "at most {MAX_MATRIX_PROVIDERS} providers per request, got {}",
                ids.len()
            )));
        }
        Ok(())
    }

    fn request(&self) -> ApiRequest {
        let mut body = json!({
            "provider_ids": canonical(&self.provider_ids),
            "measures": canonical(&self.measures),
        });
        if let Some(publish_date) = &self.publish_date {
            body["publish_date"] = json!(publish_date);
        }
        ApiRequest::post(QUALITY_MATRIX_PATH, body)
    }
}
