//! # REST API
//!
//! HTTP boundary over the best-rate aggregator.
//!
//! # Endpoints
//!
//! - `POST /api/v1/exchange/best-rate` - Best conversion across providers
//! - `GET /api/v1/exchange/providers` - Registered providers and breaker state
//! - `GET /api/v1/health` - Health check
//!
//! # Usage
//!
//! ```ignore
//! use fx_best_rate::api::rest::{create_router, AppState};
//! use fx_best_rate::application::RateAggregator;
//! use std::sync::Arc;
//!
//! let state = Arc::new(AppState::new(RateAggregator::new(providers)));
//! let router = create_router(state);
//!
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
//! axum::serve(listener, router).await?;
//! ```

pub mod handlers;
pub mod routes;

pub use handlers::{
    ApiError, AppState, BestRateRequest, BestRateResponse, ErrorResponse, HealthResponse,
};
pub use routes::create_router;
