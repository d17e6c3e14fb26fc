//! # REST Handlers
//!
//! Request/response DTOs, error mapping and handlers for the REST API.
//!
//! Inbound validation happens here; the aggregator only ever sees a
//! well-formed [`ConversionRequest`].

use crate::application::error::AggregationError;
use crate::application::services::{ProviderStatus, RateAggregator};
use crate::domain::entities::conversion::{ConversionRequest, ConversionResult};
use crate::domain::errors::ValidationError;
use crate::domain::value_objects::CurrencyCode;
use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

/// Shared state for all handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Best-rate aggregator over the registered providers.
    pub aggregator: RateAggregator,
}

impl AppState {
    /// Creates state around `aggregator`.
    #[must_use]
    pub fn new(aggregator: RateAggregator) -> Self {
        Self { aggregator }
    }
}

// ============================================================================
// DTOs
// ============================================================================

/// Body of `POST /api/v1/exchange/best-rate`.
///
/// Every field is optional on the wire so that a missing field is reported
/// as a validation error rather than a deserialization failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BestRateRequest {
    /// Source currency code.
    #[serde(default)]
    pub source_currency: Option<String>,
    /// Target currency code.
    #[serde(default)]
    pub target_currency: Option<String>,
    /// Amount, as a JSON number or string.
    #[serde(default, with = "rust_decimal::serde::arbitrary_precision_option")]
    pub amount: Option<Decimal>,
}

impl BestRateRequest {
    /// Validates the body into a [`ConversionRequest`].
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] found.
    pub fn validate(&self) -> Result<ConversionRequest, ValidationError> {
        let source = self
            .source_currency
            .as_deref()
            .ok_or(ValidationError::MissingField("sourceCurrency"))?;
        let target = self
            .target_currency
            .as_deref()
            .ok_or(ValidationError::MissingField("targetCurrency"))?;
        let amount = self.amount.ok_or(ValidationError::MissingField("amount"))?;

        ConversionRequest::new(CurrencyCode::new(source)?, CurrencyCode::new(target)?, amount)
    }
}

/// Successful best-rate response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BestRateResponse {
    /// Winning provider.
    pub provider: String,
    /// Winning rate.
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub rate: Decimal,
    /// `amount × rate`, two decimal places.
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub converted_amount: Decimal,
    /// Total time spent querying providers.
    pub response_time_ms: u64,
}

impl From<ConversionResult> for BestRateResponse {
    fn from(result: ConversionResult) -> Self {
        Self {
            provider: result.provider_name().to_string(),
            rate: result.rate(),
            converted_amount: result.converted_amount(),
            response_time_ms: result.response_time_ms(),
        }
    }
}

/// Error body returned for every failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    /// Human-readable message.
    pub message: String,
    /// When the error was produced.
    pub timestamp: DateTime<Utc>,
    /// Machine-readable code.
    pub error_code: String,
}

impl ErrorResponse {
    /// Creates an error body stamped with the current time.
    #[must_use]
    pub fn new(error_code: &str, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            timestamp: Utc::now(),
            error_code: error_code.to_string(),
        }
    }
}

/// Health check body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always `healthy` while the process serves requests.
    pub status: String,
}

// ============================================================================
// Errors
// ============================================================================

/// Error code for rejected input.
pub const INVALID_REQUEST: &str = "INVALID_REQUEST";
/// Error code when no provider produced a rate.
pub const NO_VALID_RATE: &str = "NO_VALID_RATE";
/// Error code for everything else.
pub const INTERNAL_ERROR: &str = "INTERNAL_ERROR";

/// Failures surfaced by handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed body or failed validation.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// No provider produced a usable rate.
    #[error("{0}")]
    NoValidRate(String),

    /// Any other failure; the detail is logged, not returned.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        Self::InvalidRequest(err.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::InvalidRequest(rejection.body_text())
    }
}

impl From<AggregationError> for ApiError {
    fn from(err: AggregationError) -> Self {
        match err {
            AggregationError::NoValidRate { .. } => {
                Self::NoValidRate("No valid exchange rate found".to_string())
            }
            other => Self::Internal(other.to_string()),
        }
    }
}

impl ApiError {
    /// Returns the HTTP status for this error.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) | Self::NoValidRate(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            Self::InvalidRequest(message) => ErrorResponse::new(INVALID_REQUEST, message),
            Self::NoValidRate(message) => ErrorResponse::new(NO_VALID_RATE, message),
            Self::Internal(detail) => {
                tracing::error!(error = %detail, "request failed");
                ErrorResponse::new(INTERNAL_ERROR, "Internal server error")
            }
        };
        (status, Json(body)).into_response()
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// Health check.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
    })
}

/// Finds the best rate for a conversion.
#[tracing::instrument(skip(state, payload), fields(request_id = %Uuid::new_v4()))]
pub async fn best_rate(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<BestRateRequest>, JsonRejection>,
) -> Result<Json<BestRateResponse>, ApiError> {
    let Json(body) = payload?;
    let request = body.validate().inspect_err(|e| {
        tracing::warn!(error = %e, "rejected conversion request");
    })?;

    tracing::info!(%request, "best rate requested");
    let result = state.aggregator.find_best(&request).await?;
    Ok(Json(BestRateResponse::from(result)))
}

/// Lists registered providers and their breaker state.
#[tracing::instrument(skip(state))]
pub async fn list_providers(State(state): State<Arc<AppState>>) -> Json<Vec<ProviderStatus>> {
    Json(state.aggregator.provider_statuses())
}
