//! API Module
//!
//! HTTP handlers and routing for the gateway.
//!
//! # Endpoints
//! - `GET /api/provider-density` - Provider counts by type around a point
//! - `GET /api/nearby-providers` - Provider locations around a point
//! - `POST /api/quality-measures/matrix` - Quality scores for providers
//! - `GET /stats` - Cache and in-flight request statistics
//! - `DELETE /cache` - Drop every cached response
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
