//! # XML Document Rate Client
//!
//! Provider speaking XML documents over HTTP.
//!
//! ```text
//! POST {base}/xml-api/convert
//! <exchangeRequest><From>USD</From><To>EUR</To><Amount>100.00</Amount></exchangeRequest>
//! → <exchangeResponse><Result>0.86</Result></exchangeResponse>
//! ```
//!
//! `Result` is read as text and parsed as a decimal. An empty or missing
//! `Result` means the provider had no rate.

use crate::domain::entities::conversion::ConversionRequest;
use crate::infrastructure::providers::error::{ProviderError, ProviderResult};
use crate::infrastructure::providers::http_client::{HttpClient, endpoint};
use crate::infrastructure::providers::traits::RateClient;
use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Path of the convert endpoint.
pub const CONVERT_PATH: &str = "/xml-api/convert";

/// Wire request document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename = "exchangeRequest")]
pub struct ExchangeRequest {
    /// Source currency code.
    #[serde(rename = "From")]
    pub from: String,
    /// Target currency code.
    #[serde(rename = "To")]
    pub to: String,
    /// Amount to convert, as decimal text.
    #[serde(rename = "Amount")]
    pub amount: String,
}

impl From<&ConversionRequest> for ExchangeRequest {
    fn from(request: &ConversionRequest) -> Self {
        Self {
            from: request.source_currency().to_string(),
            to: request.target_currency().to_string(),
            amount: request.amount().to_string(),
        }
    }
}

/// Wire response document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename = "exchangeResponse")]
pub struct ExchangeResponse {
    /// Quoted rate as text.
    #[serde(rename = "Result", default)]
    pub result: Option<String>,
}

/// Encodes a request document.
///
/// # Errors
///
/// Returns `ProviderError::InternalError` if serialization fails.
pub fn encode_request(request: &ConversionRequest) -> ProviderResult<String> {
    quick_xml::se::to_string(&ExchangeRequest::from(request))
        .map_err(|e| ProviderError::internal_error(format!("Failed to encode XML request: {}", e)))
}

/// Decodes a response document into an optional rate.
///
/// # Errors
///
/// Returns `ProviderError::ProtocolError` if the document is malformed or
/// `Result` is not a decimal.
pub fn decode_response(document: &str) -> ProviderResult<Option<Decimal>> {
    let response: ExchangeResponse = quick_xml::de::from_str(document)
        .map_err(|e| ProviderError::protocol_error(format!("Failed to parse XML response: {}", e)))?;

    match response.result.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(text) => Decimal::from_str(text).map(Some).map_err(|e| {
            ProviderError::protocol_error(format!("Invalid Result value '{}': {}", text, e))
        }),
    }
}

/// Client for the XML document provider.
#[derive(Debug, Clone)]
pub struct XmlDocumentClient {
    http: HttpClient,
    url: String,
}

impl XmlDocumentClient {
    /// Creates a client for the provider at `base_url`.
    #[must_use]
    pub fn new(http: HttpClient, base_url: &str) -> Self {
        Self {
            http,
            url: endpoint(base_url, CONVERT_PATH),
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
impl RateClient for XmlDocumentClient {
    fn wire_format(&self) -> &'static str {
        "xml"
    }

    async fn fetch_rate(&self, request: &ConversionRequest) -> ProviderResult<Option<Decimal>> {
        let document = encode_request(request)?;
        let body = self.http.post_xml(&self.url, document).await?;
        decode_response(&body)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn encodes_request_document() {
        let request = ConversionRequest::parse("USD", "EUR", Decimal::new(10000, 2)).unwrap();
        let xml = encode_request(&request).unwrap();
        assert_eq!(
            xml,
            "<exchangeRequest><From>USD</From><To>EUR</To><Amount>100.00</Amount></exchangeRequest>"
        );
    }

    #[test]
    fn decodes_result() {
        let rate = decode_response(
            "<?xml version=\"1.0\"?><exchangeResponse><Result>0.86</Result></exchangeResponse>",
        )
        .unwrap();
        assert_eq!(rate, Some(Decimal::new(86, 2)));
    }

    #[test]
    fn missing_or_empty_result_is_none() {
        assert_eq!(decode_response("<exchangeResponse/>").unwrap(), None);
        assert_eq!(
            decode_response("<exchangeResponse><Result></Result></exchangeResponse>").unwrap(),
            None
        );
    }

    #[test]
    fn non_decimal_result_is_protocol_error() {
        let err = decode_response("<exchangeResponse><Result>n/a</Result></exchangeResponse>")
            .unwrap_err();
        assert!(matches!(err, ProviderError::ProtocolError { .. }));
        assert!(!err.is_retryable());
    }

    #[test]
    fn malformed_document_is_protocol_error() {
        let err = decode_response("<exchangeResponse><Result>0.86").unwrap_err();
        assert!(matches!(err, ProviderError::ProtocolError { .. }));
    }
}
