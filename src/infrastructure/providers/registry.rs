//! # Provider Registry
//!
//! Assembles the registered provider set from configuration.
//!
//! Registration order is fixed (flat JSON, XML document, nested JSON) and
//! decides ties between equal rates. Disabled providers are skipped.

use crate::config::{ProviderSettings, ProvidersConfig};
use crate::infrastructure::providers::error::ProviderResult;
use crate::infrastructure::providers::flat_json::FlatJsonClient;
use crate::infrastructure::providers::http_client::HttpClient;
use crate::infrastructure::providers::nested_json::NestedJsonClient;
use crate::infrastructure::providers::policy_provider::PolicyProvider;
use crate::infrastructure::providers::traits::RateProvider;
use crate::infrastructure::providers::xml_document::XmlDocumentClient;
use crate::infrastructure::resilience::{CircuitBreakerConfig, ProviderPolicy};
use std::sync::Arc;

/// Builds the resilience policy for one provider.
#[must_use]
pub fn policy_for(settings: &ProviderSettings) -> ProviderPolicy {
    let mut policy = ProviderPolicy::new(settings.name.clone(), settings.timeout())
        .with_retry(settings.max_retries, settings.retry_delay());
    if let Some(breaker) = &settings.circuit_breaker {
        policy = policy.with_circuit_breaker(CircuitBreakerConfig::from(breaker));
    }
    if settings.fallback {
        policy = policy.with_fallback();
    }
    policy
}

/// Builds every enabled provider in registration order.
///
/// # Errors
///
/// Returns `ProviderError::InternalError` if an HTTP client cannot be created.
pub fn build_providers(config: &ProvidersConfig) -> ProviderResult<Vec<Arc<dyn RateProvider>>> {
    let mut providers: Vec<Arc<dyn RateProvider>> = Vec::with_capacity(3);

    let settings = &config.flat_json;
    if settings.enabled {
        let client = FlatJsonClient::new(HttpClient::new(settings.timeout_ms)?, &settings.base_url);
        providers.push(Arc::new(PolicyProvider::new(
            settings.name.clone(),
            client,
            policy_for(settings),
        )));
    }

    let settings = &config.xml_document;
    if settings.enabled {
        let client =
            XmlDocumentClient::new(HttpClient::new(settings.timeout_ms)?, &settings.base_url);
        providers.push(Arc::new(PolicyProvider::new(
            settings.name.clone(),
            client,
            policy_for(settings),
        )));
    }

    let settings = &config.nested_json;
    if settings.enabled {
        let client =
            NestedJsonClient::new(HttpClient::new(settings.timeout_ms)?, &settings.base_url);
        providers.push(Arc::new(PolicyProvider::new(
            settings.name.clone(),
            client,
            policy_for(settings),
        )));
    }

    for provider in &providers {
        tracing::info!(provider = provider.name(), "registered rate provider");
    }

    Ok(providers)
}
