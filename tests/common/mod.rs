//! Local stand-in for the upstream market-data API.
//!
//! Counts calls per endpoint and can be told to be slow or to fail.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use market_gateway::client::{ApiClient, DEFAULT_NETWORK_TIMEOUT};
use market_gateway::retry::RetryPolicy;
use market_gateway::DataFetcher;
use serde::Deserialize;
use serde_json::{json, Value};

#[derive(Clone, Default)]
pub struct Upstream {
    pub density_calls: Arc<AtomicUsize>,
    pub nearby_calls: Arc<AtomicUsize>,
    pub matrix_calls: Arc<AtomicUsize>,
    /// Calls that carried `refresh=true`
    pub refresh_calls: Arc<AtomicUsize>,
    /// Density calls answered with 500 before succeeding
    pub failures_remaining: Arc<AtomicUsize>,
    pub always_fail: Arc<AtomicBool>,
    /// Added latency for every density call
    pub latency_ms: Arc<AtomicU64>,
    /// Added latency for density calls with radius >= 25
    pub wide_radius_latency_ms: Arc<AtomicU64>,
}

#[derive(Debug, Deserialize)]
struct GeoParams {
    lat: f64,
    lon: f64,
    radius: f64,
    #[serde(rename = "type")]
    provider_type: Option<String>,
    #[serde(default)]
    refresh: bool,
}

#[derive(Debug, Deserialize)]
struct MatrixBody {
    provider_ids: Vec<String>,
    #[serde(default)]
    measures: Vec<String>,
}

impl Upstream {
    pub fn calls(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }

    fn should_fail(&self) -> bool {
        if self.always_fail.load(Ordering::SeqCst) {
            return true;
        }
        self.failures_remaining
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }

    /// Binds to an ephemeral port and returns the base URL.
    pub async fn spawn(&self) -> String {
        let app = Router::new()
            .route("/api/provider-density", get(density))
            .route("/api/nearby-providers", get(nearby))
            .route("/api/quality-measures/matrix", post(matrix))
            .with_state(self.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }
}

async fn density(State(upstream): State<Upstream>, Query(params): Query<GeoParams>) -> Response {
    upstream.density_calls.fetch_add(1, Ordering::SeqCst);
    if params.refresh {
        upstream.refresh_calls.fetch_add(1, Ordering::SeqCst);
    }

    let mut delay = upstream.latency_ms.load(Ordering::SeqCst);
    if params.radius >= 25.0 {
        delay += upstream.wide_radius_latency_ms.load(Ordering::SeqCst);
    }
    if delay > 0 {
        tokio::time::sleep(Duration::from_millis(delay)).await;
    }

    if upstream.should_fail() {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "success": false, "error": "BigQuery job failed" })),
        )
            .into_response();
    }

    // Count encodes the radius so tests can tell responses apart
    Json(json!({
        "success": true,
        "data": [
            { "type": "Hospital", "count": params.radius as u64 },
            { "type": "SNF", "count": 3 }
        ]
    }))
    .into_response()
}

async fn nearby(State(upstream): State<Upstream>, Query(params): Query<GeoParams>) -> Response {
    upstream.nearby_calls.fetch_add(1, Ordering::SeqCst);

    if params.provider_type.as_deref() == Some("Unknown") {
        return Json(json!({ "success": false, "error": "unknown provider type" })).into_response();
    }

    Json(json!({
        "success": true,
        "data": [{
            "id": "264500",
            "name": "Barnes-Jewish Hospital",
            "type": params.provider_type.unwrap_or_else(|| "Hospital".to_string()),
            "latitude": params.lat,
            "longitude": params.lon,
            "distance": params.radius / 2.0
        }]
    }))
    .into_response()
}

async fn matrix(State(upstream): State<Upstream>, Json(body): Json<MatrixBody>) -> Json<Value> {
    upstream.matrix_calls.fetch_add(1, Ordering::SeqCst);

    let measures = if body.measures.is_empty() {
        vec!["READM_30".to_string()]
    } else {
        body.measures
    };
    let scores: serde_json::Map<String, Value> = body
        .provider_ids
        .iter()
        .map(|id| {
            let row: serde_json::Map<String, Value> =
                measures.iter().map(|m| (m.clone(), json!(12.5))).collect();
            (id.clone(), Value::Object(row))
        })
        .collect();

    Json(json!({
        "success": true,
        "data": {
            "measures": measures
                .iter()
                .map(|m| json!({ "code": m, "label": m }))
                .collect::<Vec<_>>(),
            "scores": scores,
            "publish_date": "2024-07-01"
        }
    }))
}

/// Fetcher pointed at `base_url` with a short retry delay.
pub fn fetcher(base_url: &str, cache_ttl: Duration) -> DataFetcher {
    let client = ApiClient::new(base_url, DEFAULT_NETWORK_TIMEOUT).unwrap();
    DataFetcher::new(client, cache_ttl).with_retry_policy(RetryPolicy::new(Duration::from_millis(50)))
}
