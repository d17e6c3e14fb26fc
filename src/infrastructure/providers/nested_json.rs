//! # Nested JSON Rate Client
//!
//! JSON provider wrapping its rate in a status envelope.
//!
//! ```text
//! POST {base}/v2/exchange
//! {"sourceCurrency": "USD", "targetCurrency": "EUR", "quantity": "100.00"}
//! → {"statusCode": 200, "message": "ok", "data": {"total": 0.84}}
//! ```

use crate::domain::entities::conversion::ConversionRequest;
use crate::infrastructure::providers::error::ProviderResult;
use crate::infrastructure::providers::http_client::{HttpClient, endpoint};
use crate::infrastructure::providers::traits::RateClient;
use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Path of the exchange endpoint.
pub const EXCHANGE_PATH: &str = "/v2/exchange";

/// Wire request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NestedRateRequest {
    /// Source currency code.
    pub source_currency: String,
    /// Target currency code.
    pub target_currency: String,
    /// Amount to convert, sent as a JSON number.
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub quantity: Decimal,
}

impl From<&ConversionRequest> for NestedRateRequest {
    fn from(request: &ConversionRequest) -> Self {
        Self {
            source_currency: request.source_currency().to_string(),
            target_currency: request.target_currency().to_string(),
            quantity: request.amount(),
        }
    }
}

/// Wire response envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NestedRateResponse {
    /// Provider-level status code.
    #[serde(default)]
    pub status_code: Option<i32>,
    /// Provider-level message.
    #[serde(default)]
    pub message: Option<String>,
    /// Payload carrying the rate.
    #[serde(default)]
    pub data: Option<NestedRateData>,
}

/// Payload of [`NestedRateResponse`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NestedRateData {
    /// The quoted rate.
    #[serde(default, with = "rust_decimal::serde::arbitrary_precision_option")]
    pub total: Option<Decimal>,
}

impl NestedRateResponse {
    /// Extracts `data.total`.
    #[must_use]
    pub fn rate(&self) -> Option<Decimal> {
        self.data.as_ref().and_then(|data| data.total)
    }
}

/// Client for the nested JSON provider.
#[derive(Debug, Clone)]
pub struct NestedJsonClient {
    http: HttpClient,
    url: String,
}

impl NestedJsonClient {
    /// Creates a client for the provider at `base_url`.
    #[must_use]
    pub fn new(http: HttpClient, base_url: &str) -> Self {
        Self {
            http,
            url: endpoint(base_url, EXCHANGE_PATH),
        }
    }

    /// Returns the full endpoint URL.
    #[inline]
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl RateClient for NestedJsonClient {
    fn wire_format(&self) -> &'static str {
        "json-envelope"
    }

    async fn fetch_rate(&self, request: &ConversionRequest) -> ProviderResult<Option<Decimal>> {
        let body = NestedRateRequest::from(request);
        let response: NestedRateResponse = self.http.post_json(&self.url, &body).await?;
        if response.rate().is_none() {
            tracing::debug!(
                status_code = ?response.status_code,
                message = ?response.message,
                "nested response carried no total"
            );
        }
        Ok(response.rate())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn request_shape() {
        let request = ConversionRequest::parse("GBP", "JPY", Decimal::new(2500, 2)).unwrap();
        let json = serde_json::to_value(NestedRateRequest::from(&request)).unwrap();
        assert_eq!(json["sourceCurrency"], "GBP");
        assert_eq!(json["targetCurrency"], "JPY");
        assert!(json["quantity"].is_number());
        assert_eq!(json["quantity"].to_string(), "25.00");
    }

    #[test]
    fn close_totals_stay_distinct() {
        let response: NestedRateResponse =
            serde_json::from_str(r#"{"data": {"total": 1.0000000000000001}}"#).unwrap();
        let total = response.rate().unwrap();
        assert_eq!(total, Decimal::from_str_exact("1.0000000000000001").unwrap());
        assert!(total > Decimal::ONE);
    }

    #[test]
    fn accepts_total_as_string() {
        let response: NestedRateResponse =
            serde_json::from_str(r#"{"data": {"total": "0.84"}}"#).unwrap();
        assert_eq!(response.rate(), Some(Decimal::new(84, 2)));
    }

    #[test]
    fn extracts_nested_total() {
        let response: NestedRateResponse = serde_json::from_str(
            r#"{"statusCode": 200, "message": "ok", "data": {"total": 0.84}}"#,
        )
        .unwrap();
        assert_eq!(response.rate(), Some(Decimal::new(84, 2)));
        assert_eq!(response.status_code, Some(200));
    }

    #[test]
    fn missing_data_yields_none() {
        let response: NestedRateResponse =
            serde_json::from_str(r#"{"statusCode": 404, "message": "pair not found"}"#).unwrap();
        assert_eq!(response.rate(), None);

        let response: NestedRateResponse =
            serde_json::from_str(r#"{"data": {"total": null}}"#).unwrap();
        assert_eq!(response.rate(), None);
    }
}
