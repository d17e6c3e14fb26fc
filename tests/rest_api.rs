//! HTTP-level tests for the REST boundary.

#![allow(clippy::unwrap_used)]

use async_trait::async_trait;
use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Method, Request, StatusCode};
use fx_best_rate::api::rest::{AppState, create_router};
use fx_best_rate::application::RateAggregator;
use fx_best_rate::domain::entities::{ConversionRequest, Quote};
use fx_best_rate::infrastructure::providers::{ProviderError, ProviderOutcome, RateProvider};
use rust_decimal::Decimal;
use serde_json::Value;
use std::str::FromStr;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;
use tower::ServiceExt;

#[derive(Debug)]
struct StubProvider {
    name: &'static str,
    rate: Option<&'static str>,
    calls: AtomicU32,
}

impl StubProvider {
    fn new(name: &'static str, rate: Option<&'static str>) -> Arc<Self> {
        Arc::new(Self {
            name,
            rate,
            calls: AtomicU32::new(0),
        })
    }
}

#[async_trait]
impl RateProvider for StubProvider {
    fn name(&self) -> &str {
        self.name
    }

    async fn quote(&self, _request: &ConversionRequest) -> ProviderOutcome {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.rate {
            Some(rate) => ProviderOutcome::Valid(
                Quote::new(
                    self.name,
                    Decimal::from_str(rate).unwrap(),
                    Duration::from_millis(5),
                )
                .unwrap(),
            ),
            None => ProviderOutcome::Failed(ProviderError::unavailable("down")),
        }
    }
}

fn app(providers: &[Arc<StubProvider>]) -> Router {
    let providers = providers
        .iter()
        .map(|p| Arc::clone(p) as Arc<dyn RateProvider>)
        .collect();
    create_router(Arc::new(AppState::new(RateAggregator::new(providers))))
}

fn standard_providers() -> Vec<Arc<StubProvider>> {
    vec![
        StubProvider::new("API1", Some("0.85")),
        StubProvider::new("API2", Some("0.86")),
        StubProvider::new("API3", Some("0.84")),
    ]
}

fn best_rate_request(body: &str) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri("/api/v1/exchange/best-rate")
        .header("Content-Type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn returns_best_rate() {
    let (status, json) = send(
        app(&standard_providers()),
        best_rate_request(r#"{"sourceCurrency":"USD","targetCurrency":"EUR","amount":100.00}"#),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["provider"], "API2");
    assert!(json["rate"].is_number());
    assert_eq!(json["rate"].to_string(), "0.86");
    assert_eq!(json["convertedAmount"].to_string(), "86.00");
    assert!(json["responseTimeMs"].is_u64());
}

#[tokio::test]
async fn rounds_converted_amount_half_up() {
    let providers = vec![StubProvider::new("API1", Some("0.855"))];
    let (status, json) = send(
        app(&providers),
        best_rate_request(r#"{"sourceCurrency":"USD","targetCurrency":"EUR","amount":"100.00"}"#),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["convertedAmount"].to_string(), "85.50");
}

#[tokio::test]
async fn invalid_currency_is_rejected_before_providers() {
    let providers = standard_providers();
    let (status, json) = send(
        app(&providers),
        best_rate_request(r#"{"sourceCurrency":"usd","targetCurrency":"EUR","amount":100}"#),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["errorCode"], "INVALID_REQUEST");
    assert!(json["timestamp"].is_string());
    for provider in &providers {
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }
}

#[tokio::test]
async fn amount_below_minimum_is_rejected() {
    let (status, json) = send(
        app(&standard_providers()),
        best_rate_request(r#"{"sourceCurrency":"USD","targetCurrency":"EUR","amount":0.001}"#),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["errorCode"], "INVALID_REQUEST");
}

#[tokio::test]
async fn missing_field_is_rejected() {
    let (status, json) = send(
        app(&standard_providers()),
        best_rate_request(r#"{"sourceCurrency":"USD","amount":10}"#),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["errorCode"], "INVALID_REQUEST");
    assert!(json["message"].as_str().unwrap().contains("targetCurrency"));
}

#[tokio::test]
async fn malformed_json_is_rejected() {
    let (status, json) = send(app(&standard_providers()), best_rate_request("{not json")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["errorCode"], "INVALID_REQUEST");
}

#[tokio::test]
async fn no_valid_rate_is_bad_request() {
    let providers = vec![
        StubProvider::new("API1", None),
        StubProvider::new("API2", None),
    ];
    let (status, json) = send(
        app(&providers),
        best_rate_request(r#"{"sourceCurrency":"USD","targetCurrency":"EUR","amount":100}"#),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["errorCode"], "NO_VALID_RATE");
}

#[tokio::test]
async fn no_providers_is_internal_error() {
    let (status, json) = send(
        app(&[]),
        best_rate_request(r#"{"sourceCurrency":"USD","targetCurrency":"EUR","amount":100}"#),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["errorCode"], "INTERNAL_ERROR");
    assert_eq!(json["message"], "Internal server error");
}

#[tokio::test]
async fn health_reports_healthy() {
    let request = Request::builder()
        .uri("/api/v1/health")
        .body(Body::empty())
        .unwrap();
    let (status, json) = send(app(&[]), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "healthy");
}

#[tokio::test]
async fn lists_providers_in_registration_order() {
    let request = Request::builder()
        .uri("/api/v1/exchange/providers")
        .body(Body::empty())
        .unwrap();
    let (status, json) = send(app(&standard_providers()), request).await;

    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["API1", "API2", "API3"]);
    assert!(json[0]["circuitState"].is_null());
}
