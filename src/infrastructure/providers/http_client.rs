//! # HTTP Client Utilities
//!
//! Shared HTTP client for the provider wire clients.
//!
//! Wraps `reqwest` with a transport timeout, JSON and XML POST helpers, and
//! the mapping from transport errors and HTTP statuses to
//! [`ProviderError`].
//!
//! # Examples
//!
//! ```ignore
//! use fx_best_rate::infrastructure::providers::http_client::HttpClient;
//!
//! let client = HttpClient::new(2000)?;
//! let response: RateResponse = client.post_json("http://rates.local/v1/rates", &body).await?;
//! ```

use crate::infrastructure::providers::error::{ProviderError, ProviderResult};
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderValue};
use reqwest::{Client, Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;

const APPLICATION_XML: &str = "application/xml";

/// HTTP client wrapper for provider wire clients.
#[derive(Debug, Clone)]
pub struct HttpClient {
    /// Inner reqwest client.
    client: Client,
    /// Transport timeout in milliseconds.
    timeout_ms: u64,
}

impl HttpClient {
    /// Creates a new HTTP client with the specified transport timeout.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::InternalError` if the client cannot be created.
    pub fn new(timeout_ms: u64) -> ProviderResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .build()
            .map_err(|e| {
                ProviderError::internal_error(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self { client, timeout_ms })
    }

    /// Returns the configured timeout in milliseconds.
    #[inline]
    #[must_use]
    pub fn timeout_ms(&self) -> u64 {
        self.timeout_ms
    }

    /// Makes a POST request with a JSON body and deserializes the JSON response.
    ///
    /// # Errors
    ///
    /// Returns a transport or status error if the request fails, and
    /// `ProviderError::ProtocolError` if the response cannot be parsed.
    pub async fn post_json<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        url: &str,
        body: &B,
    ) -> ProviderResult<T> {
        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| self.map_reqwest_error(e))?;

        let response = self.check_status(response).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| ProviderError::protocol_error(format!("Failed to parse response: {}", e)))
    }

    /// Makes a POST request with an XML document body and returns the raw
    /// response text.
    ///
    /// # Errors
    ///
    /// Returns a transport or status error if the request fails, and
    /// `ProviderError::ProtocolError` if the body cannot be read.
    pub async fn post_xml(&self, url: &str, document: String) -> ProviderResult<String> {
        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, HeaderValue::from_static(APPLICATION_XML))
            .header(ACCEPT, HeaderValue::from_static(APPLICATION_XML))
            .body(document)
            .send()
            .await
            .map_err(|e| self.map_reqwest_error(e))?;

        let response = self.check_status(response).await?;
        response
            .text()
            .await
            .map_err(|e| ProviderError::protocol_error(format!("Failed to read response: {}", e)))
    }

    /// Passes 2xx responses through and maps everything else to an error.
    async fn check_status(&self, response: Response) -> ProviderResult<Response> {
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            let error_body = response.text().await.unwrap_or_default();
            Err(self.map_status_error(status, &error_body))
        }
    }

    /// Maps a reqwest error to a ProviderError.
    fn map_reqwest_error(&self, error: reqwest::Error) -> ProviderError {
        if error.is_timeout() {
            ProviderError::timeout_with_duration("Request timed out", self.timeout_ms)
        } else if error.is_connect() {
            ProviderError::connection(format!("Connection failed: {}", error))
        } else {
            ProviderError::connection(format!("HTTP request failed: {}", error))
        }
    }

    /// Maps an HTTP status code to a ProviderError.
    fn map_status_error(&self, status: StatusCode, body: &str) -> ProviderError {
        match status {
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                ProviderError::invalid_request(format!("Bad request ({}): {}", status, body))
            }
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                ProviderError::authentication(format!("Authentication failed: {}", body))
            }
            StatusCode::TOO_MANY_REQUESTS => ProviderError::rate_limited("Rate limit exceeded"),
            StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
                ProviderError::timeout(format!("Upstream timeout ({}): {}", status, body))
            }
            s if s.is_server_error() => {
                ProviderError::unavailable(format!("Server error ({}): {}", status, body))
            }
            _ => ProviderError::protocol_error(format!("HTTP error ({}): {}", status, body)),
        }
    }
}

/// Joins a base URL and an absolute path without doubling slashes.
#[must_use]
pub fn endpoint(base_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
