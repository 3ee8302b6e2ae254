//! API Routes
//!
//! Configures the Axum router with all gateway endpoints.

use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    clear_cache_handler, health_handler, nearby_providers_handler, provider_density_handler,
    quality_matrix_handler, stats_handler, AppState,
};
use crate::queries::{NEARBY_PROVIDERS_PATH, PROVIDER_DENSITY_PATH, QUALITY_MATRIX_PATH};

/// Creates the main router with all endpoints configured.
///
/// Data endpoints live under the same `/api/*` paths as the upstream they
/// front, so consumers can point at either.
///
/// # Middleware
/// - CORS: Allows any origin
/// - Tracing: Logs all requests
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route(PROVIDER_DENSITY_PATH, get(provider_density_handler))
        .route(NEARBY_PROVIDERS_PATH, get(nearby_providers_handler))
        .route(QUALITY_MATRIX_PATH, post(quality_matrix_handler))
        .route("/stats", get(stats_handler))
        .route("/cache", delete(clear_cache_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
