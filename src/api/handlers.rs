//! API Handlers
//!
//! HTTP request handlers for each gateway endpoint.

use axum::{
    extract::{rejection::JsonRejection, rejection::QueryRejection, Query, State},
    Json,
};
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::client::ApiEnvelope;
use crate::config::Config;
use crate::error::{FetchError, Result};
use crate::fetcher::DataFetcher;
use crate::models::{
    ClearResponse, GeoQueryParams, HealthResponse, NearbyProvider, ProviderTypeCount,
    QualityMatrix, RefreshParams, StatsResponse,
};
use crate::queries::{self, QualityMatrixQuery};

/// Application state shared across all handlers.
///
/// The fetcher's cache and deduplicator are shared by every request the
/// gateway serves.
#[derive(Clone)]
pub struct AppState {
    pub fetcher: DataFetcher,
    /// Cancelled on shutdown so pending retries stop waiting
    pub shutdown: CancellationToken,
}

impl AppState {
    pub fn new(fetcher: DataFetcher) -> Self {
        Self {
            fetcher,
            shutdown: CancellationToken::new(),
        }
    }

    /// Creates a new AppState from configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(DataFetcher::from_config(config)?))
    }
}

/// Validates `query`, fetches it through the cache/dedup/retry layer and
/// wraps the payload in a success envelope.
async fn serve<Q: queries::Query>(
    state: &AppState,
    query: &Q,
    refresh: bool,
) -> Result<Json<ApiEnvelope<Q::Output>>> {
    query.validate()?;
    let data = state
        .fetcher
        .fetch_with_retry::<Q::Output>(&query.request(), refresh, &state.shutdown)
        .await?;
    Ok(Json(ApiEnvelope::ok(data)))
}

fn query_params<T>(params: std::result::Result<Query<T>, QueryRejection>) -> Result<T> {
    params
        .map(|Query(params)| params)
        .map_err(|rejection| FetchError::InvalidRequest(rejection.body_text()))
}

/// Handler for GET /api/provider-density
pub async fn provider_density_handler(
    State(state): State<AppState>,
    params: std::result::Result<Query<GeoQueryParams>, QueryRejection>,
) -> Result<Json<ApiEnvelope<Vec<ProviderTypeCount>>>> {
    let params = query_params(params)?;
    serve(&state, &params.density_query(), params.refresh).await
}

/// Handler for GET /api/nearby-providers
pub async fn nearby_providers_handler(
    State(state): State<AppState>,
    params: std::result::Result<Query<GeoQueryParams>, QueryRejection>,
) -> Result<Json<ApiEnvelope<Vec<NearbyProvider>>>> {
    let params = query_params(params)?;
    serve(&state, &params.nearby_query(), params.refresh).await
}

/// Handler for POST /api/quality-measures/matrix
pub async fn quality_matrix_handler(
    State(state): State<AppState>,
    params: std::result::Result<Query<RefreshParams>, QueryRejection>,
    body: std::result::Result<Json<QualityMatrixQuery>, JsonRejection>,
) -> Result<Json<ApiEnvelope<QualityMatrix>>> {
    let params = query_params(params)?;
    let Json(query) = body.map_err(|rejection| FetchError::InvalidRequest(rejection.body_text()))?;
    serve(&state, &query, params.refresh).await
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(state.fetcher.stats().await.into())
}

/// Handler for DELETE /cache
pub async fn clear_cache_handler(State(state): State<AppState>) -> Json<ClearResponse> {
    let cleared = state.fetcher.clear_cache().await;
    info!("Cache cleared: {} entries removed", cleared);
    Json(ClearResponse::new(cleared))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
