//! # Flat JSON Rate Client
//!
//! JSON provider answering with a top-level `rate` field.
//!
//! ```text
//! POST {base}/v1/rates
//! {"from": "USD", "to": "EUR", "value": "100.00"}
//! → {"rate": 0.85}
//! ```

use crate::domain::entities::conversion::ConversionRequest;
use crate::infrastructure::providers::error::ProviderResult;
use crate::infrastructure::providers::http_client::{HttpClient, endpoint};
use crate::infrastructure::providers::traits::RateClient;
use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Path of the rate endpoint.
pub const RATES_PATH: &str = "/v1/rates";

/// Wire request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlatRateRequest {
    /// Source currency code.
    pub from: String,
    /// Target currency code.
    pub to: String,
    /// Amount to convert, sent as a JSON number.
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub value: Decimal,
}

impl From<&ConversionRequest> for FlatRateRequest {
    fn from(request: &ConversionRequest) -> Self {
        Self {
            from: request.source_currency().to_string(),
            to: request.target_currency().to_string(),
            value: request.amount(),
        }
    }
}

/// Wire response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlatRateResponse {
    /// The quoted rate, if the provider had one.
    #[serde(default, with = "rust_decimal::serde::arbitrary_precision_option")]
    pub rate: Option<Decimal>,
}

/// Client for the flat JSON provider.
#[derive(Debug, Clone)]
pub struct FlatJsonClient {
    http: HttpClient,
    url: String,
}

impl FlatJsonClient {
    /// Creates a client for the provider at `base_url`.
    #[must_use]
    pub fn new(http: HttpClient, base_url: &str) -> Self {
        Self {
            http,
            url: endpoint(base_url, RATES_PATH),
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
impl RateClient for FlatJsonClient {
    fn wire_format(&self) -> &'static str {
        "json"
    }

    async fn fetch_rate(&self, request: &ConversionRequest) -> ProviderResult<Option<Decimal>> {
        let body = FlatRateRequest::from(request);
        let response: FlatRateResponse = self.http.post_json(&self.url, &body).await?;
        Ok(response.rate)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn request_shape() {
        let request = ConversionRequest::parse("USD", "EUR", Decimal::new(10000, 2)).unwrap();
        let json = serde_json::to_value(FlatRateRequest::from(&request)).unwrap();
        assert_eq!(json["from"], "USD");
        assert_eq!(json["to"], "EUR");
        assert!(json["value"].is_number());
        assert_eq!(json["value"].to_string(), "100.00");
    }

    #[test]
    fn response_accepts_number_string_and_missing() {
        let number: FlatRateResponse = serde_json::from_str(r#"{"rate": 0.855}"#).unwrap();
        assert_eq!(number.rate, Some(Decimal::new(855, 3)));

        let text: FlatRateResponse = serde_json::from_str(r#"{"rate": "0.86"}"#).unwrap();
        assert_eq!(text.rate, Some(Decimal::new(86, 2)));

        let missing: FlatRateResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(missing.rate, None);

        let null: FlatRateResponse = serde_json::from_str(r#"{"rate": null}"#).unwrap();
        assert_eq!(null.rate, None);
    }

    #[test]
    fn number_rate_keeps_every_digit() {
        let response: FlatRateResponse =
            serde_json::from_str(r#"{"rate": 0.12345678901234567891}"#).unwrap();
        assert_eq!(
            response.rate,
            Some(Decimal::from_str_exact("0.12345678901234567891").unwrap())
        );
    }

    #[test]
    fn request_body_is_a_json_number() {
        let request = ConversionRequest::parse("USD", "EUR", Decimal::new(10050, 2)).unwrap();
        let body = serde_json::to_string(&FlatRateRequest::from(&request)).unwrap();
        assert_eq!(body, r#"{"from":"USD","to":"EUR","value":100.50}"#);
    }

    #[test]
    fn url_is_joined() {
        let client = FlatJsonClient::new(HttpClient::new(1000).unwrap(), "http://api1.local/");
        assert_eq!(client.url(), "http://api1.local/v1/rates");
    }
}
