//! # REST Routes
//!
//! Router assembly for the REST API.

use crate::api::rest::handlers::{self, AppState};
use axum::Router;
use axum::routing::{get, post};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

/// Builds the REST router.
///
/// # Routes
///
/// - `GET /api/v1/health`
/// - `POST /api/v1/exchange/best-rate`
/// - `GET /api/v1/exchange/providers`
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/v1/health", get(handlers::health))
        .route("/api/v1/exchange/best-rate", post(handlers::best_rate))
        .route("/api/v1/exchange/providers", get(handlers::list_providers))
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(state)
}
