//! # Rate Aggregation
//!
//! Fans a conversion request out to every registered provider and picks
//! the best rate.
//!
//! Each provider runs in its own task. The aggregator waits for all of
//! them; a slow provider is bounded by its own timeout and retry budget.
//! Outcomes are collected in registration order so ties resolve to the
//! first-registered provider whatever order the tasks finish in.

use crate::application::error::{AggregationError, AggregationResult};
use crate::application::services::result_selector::{converted_amount, select_best};
use crate::domain::entities::conversion::{ConversionRequest, ConversionResult};
use crate::domain::entities::quote::Quote;
use crate::infrastructure::providers::error::ProviderError;
use crate::infrastructure::providers::traits::{ProviderOutcome, RateProvider};
use crate::infrastructure::resilience::CircuitState;
use futures::future::join_all;
use serde::Serialize;
use std::sync::Arc;
use tokio::time::Instant;

/// Name and breaker state of one registered provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderStatus {
    /// Provider name.
    pub name: String,
    /// Breaker state, if the provider has a breaker.
    pub circuit_state: Option<CircuitState>,
}

/// Finds the best rate across a fixed set of providers.
#[derive(Debug, Clone)]
pub struct RateAggregator {
    providers: Vec<Arc<dyn RateProvider>>,
}

impl RateAggregator {
    /// Creates an aggregator over `providers`, in registration order.
    #[must_use]
    pub fn new(providers: Vec<Arc<dyn RateProvider>>) -> Self {
        Self { providers }
    }

    /// Returns the number of registered providers.
    #[inline]
    #[must_use]
    pub fn provider_count(&self) -> usize {
        self.providers.len()
    }

    /// Returns each provider's name and breaker state, in registration order.
    #[must_use]
    pub fn provider_statuses(&self) -> Vec<ProviderStatus> {
        self.providers
            .iter()
            .map(|provider| ProviderStatus {
                name: provider.name().to_string(),
                circuit_state: provider.circuit_state(),
            })
            .collect()
    }

    /// Queries every provider and returns the best conversion.
    ///
    /// # Errors
    ///
    /// - `NoProvidersAvailable` if nothing is registered
    /// - `NoValidRate` if no provider returned a positive rate
    /// - `Arithmetic` if the converted amount overflows
    pub async fn find_best(
        &self,
        request: &ConversionRequest,
    ) -> AggregationResult<ConversionResult> {
        if self.providers.is_empty() {
            return Err(AggregationError::NoProvidersAvailable);
        }

        let started = Instant::now();
        let outcomes = self.collect_outcomes(request).await;
        let total = outcomes.len();

        let mut quotes: Vec<Quote> = Vec::with_capacity(total);
        for (name, outcome) in outcomes {
            match outcome {
                ProviderOutcome::Valid(quote) => quotes.push(quote),
                ProviderOutcome::Invalid => {
                    tracing::warn!(provider = %name, "excluded provider: no valid rate");
                }
                ProviderOutcome::Failed(error) => {
                    tracing::warn!(
                        provider = %name,
                        kind = error.kind(),
                        error = %error,
                        "excluded provider: call failed"
                    );
                }
            }
        }

        tracing::info!(
            valid = quotes.len(),
            total,
            "{} valid responses out of {}",
            quotes.len(),
            total
        );

        let best = select_best(&quotes).ok_or(AggregationError::NoValidRate {
            valid: quotes.len(),
            total,
        })?;
        let converted = converted_amount(request.amount(), best.rate())?;

        let result = ConversionResult::new(
            best.provider_name(),
            best.rate(),
            converted,
            started.elapsed(),
        );
        tracing::info!(
            provider = result.provider_name(),
            rate = %result.rate(),
            converted_amount = %result.converted_amount(),
            response_time_ms = result.response_time_ms(),
            "best rate selected"
        );
        Ok(result)
    }

    /// Spawns one task per provider and joins them in registration order.
    async fn collect_outcomes(&self, request: &ConversionRequest) -> Vec<(String, ProviderOutcome)> {
        let handles: Vec<_> = self
            .providers
            .iter()
            .map(|provider| {
                let provider = Arc::clone(provider);
                let request = request.clone();
                tokio::spawn(async move { provider.quote(&request).await })
            })
            .collect();

        join_all(handles)
            .await
            .into_iter()
            .zip(&self.providers)
            .map(|(joined, provider)| {
                let outcome = joined.unwrap_or_else(|e| {
                    ProviderOutcome::Failed(ProviderError::internal_error(format!(
                        "provider task failed: {}",
                        e
                    )))
                });
                (provider.name().to_string(), outcome)
            })
            .collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::value_objects::ArithmeticError;
    use crate::infrastructure::providers::error::ProviderResult;
    use crate::infrastructure::providers::policy_provider::PolicyProvider;
    use crate::infrastructure::providers::traits::RateClient;
    use crate::infrastructure::resilience::ProviderPolicy;
    use async_trait::async_trait;
    use rust_decimal::Decimal;
    use std::str::FromStr;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[derive(Debug)]
    enum Behavior {
        Rate(Decimal),
        Invalid,
        Fail,
        Panic,
    }

    #[derive(Debug)]
    struct MockProvider {
        name: String,
        behavior: Behavior,
        delay: Duration,
        calls: AtomicU32,
    }

    impl MockProvider {
        fn new(name: &str, behavior: Behavior) -> Self {
            Self {
                name: name.to_string(),
                behavior,
                delay: Duration::ZERO,
                calls: AtomicU32::new(0),
            }
        }

        fn rate(name: &str, rate: &str) -> Self {
            Self::new(name, Behavior::Rate(dec(rate)))
        }

        fn failing(name: &str) -> Self {
            Self::new(name, Behavior::Fail)
        }

        fn delayed(mut self, delay: Duration) -> Self {
            self.delay = delay;
            self
        }
    }

    #[async_trait]
    impl RateProvider for MockProvider {
        fn name(&self) -> &str {
            &self.name
        }

        #[allow(clippy::panic)]
        async fn quote(&self, _request: &ConversionRequest) -> ProviderOutcome {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            match &self.behavior {
                Behavior::Rate(rate) => {
                    ProviderOutcome::Valid(Quote::new(&self.name, *rate, self.delay).unwrap())
                }
                Behavior::Invalid => ProviderOutcome::Invalid,
                Behavior::Fail => {
                    ProviderOutcome::Failed(ProviderError::unavailable("service down"))
                }
                Behavior::Panic => panic!("provider blew up"),
            }
        }
    }

    fn request() -> ConversionRequest {
        ConversionRequest::parse("USD", "EUR", dec("100.00")).unwrap()
    }

    fn aggregator(providers: Vec<MockProvider>) -> RateAggregator {
        RateAggregator::new(
            providers
                .into_iter()
                .map(|p| Arc::new(p) as Arc<dyn RateProvider>)
                .collect(),
        )
    }

    #[tokio::test]
    async fn highest_rate_wins() {
        let aggregator = aggregator(vec![
            MockProvider::rate("API1", "0.85"),
            MockProvider::rate("API2", "0.86"),
            MockProvider::rate("API3", "0.84"),
        ]);

        let result = aggregator.find_best(&request()).await.unwrap();
        assert_eq!(result.provider_name(), "API2");
        assert_eq!(result.rate(), dec("0.86"));
        assert_eq!(result.converted_amount(), dec("86.00"));
    }

    #[tokio::test]
    async fn partial_failure_excludes_failed_provider() {
        let aggregator = aggregator(vec![
            MockProvider::rate("API1", "0.85"),
            MockProvider::failing("API2"),
            MockProvider::rate("API3", "0.84"),
        ]);

        let result = aggregator.find_best(&request()).await.unwrap();
        assert_eq!(result.provider_name(), "API1");
        assert_eq!(result.converted_amount(), dec("85.00"));
    }

    #[tokio::test]
    async fn all_fail_is_no_valid_rate() {
        let aggregator = aggregator(vec![
            MockProvider::failing("API1"),
            MockProvider::new("API2", Behavior::Invalid),
            MockProvider::failing("API3"),
        ]);

        let err = aggregator.find_best(&request()).await.unwrap_err();
        assert_eq!(err, AggregationError::NoValidRate { valid: 0, total: 3 });
    }

    #[tokio::test]
    async fn no_providers_fails_immediately() {
        let aggregator = RateAggregator::new(vec![]);
        let err = aggregator.find_best(&request()).await.unwrap_err();
        assert_eq!(err, AggregationError::NoProvidersAvailable);
        assert_eq!(aggregator.provider_count(), 0);
        assert!(aggregator.provider_statuses().is_empty());
    }

    #[tokio::test]
    async fn tie_goes_to_first_registered() {
        let aggregator = aggregator(vec![
            MockProvider::rate("API1", "0.86").delayed(Duration::from_millis(30)),
            MockProvider::rate("API2", "0.86"),
            MockProvider::rate("API3", "0.84"),
        ]);

        for _ in 0..5 {
            let result = aggregator.find_best(&request()).await.unwrap();
            assert_eq!(result.provider_name(), "API1");
        }
    }

    #[tokio::test]
    async fn panicking_provider_is_isolated() {
        let aggregator = aggregator(vec![
            MockProvider::new("API1", Behavior::Panic),
            MockProvider::rate("API2", "0.84"),
        ]);

        let result = aggregator.find_best(&request()).await.unwrap();
        assert_eq!(result.provider_name(), "API2");
    }

    #[tokio::test]
    async fn every_provider_is_called_once() {
        let providers: Vec<Arc<MockProvider>> = vec![
            Arc::new(MockProvider::rate("API1", "0.85")),
            Arc::new(MockProvider::failing("API2")),
            Arc::new(MockProvider::rate("API3", "0.84")),
        ];
        let aggregator = RateAggregator::new(
            providers
                .iter()
                .map(|p| Arc::clone(p) as Arc<dyn RateProvider>)
                .collect(),
        );

        aggregator.find_best(&request()).await.unwrap();
        for provider in &providers {
            assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn waits_for_slow_provider() {
        let aggregator = aggregator(vec![
            MockProvider::rate("API1", "0.85"),
            MockProvider::rate("API2", "0.90").delayed(Duration::from_millis(1500)),
        ]);

        let result = aggregator.find_best(&request()).await.unwrap();
        assert_eq!(result.provider_name(), "API2");
        assert!(result.total_elapsed() >= Duration::from_millis(1500));
    }

    #[derive(Debug)]
    struct HangingClient;

    #[async_trait]
    impl RateClient for HangingClient {
        fn wire_format(&self) -> &'static str {
            "test"
        }

        async fn fetch_rate(&self, _request: &ConversionRequest) -> ProviderResult<Option<Decimal>> {
            std::future::pending::<()>().await;
            Ok(None)
        }
    }

    #[tokio::test(start_paused = true)]
    async fn hung_provider_is_bounded_by_its_timeout() {
        let hung = PolicyProvider::new(
            "API2",
            HangingClient,
            ProviderPolicy::new("API2", Duration::from_secs(2)),
        );
        let providers: Vec<Arc<dyn RateProvider>> = vec![
            Arc::new(MockProvider::rate("API1", "0.85")),
            Arc::new(hung),
            Arc::new(MockProvider::rate("API3", "0.84")),
        ];
        let aggregator = RateAggregator::new(providers);

        let result = aggregator.find_best(&request()).await.unwrap();
        assert_eq!(result.provider_name(), "API1");
        assert!(result.total_elapsed() >= Duration::from_secs(2));
        assert!(result.total_elapsed() < Duration::from_secs(3));
    }

    #[tokio::test]
    async fn overflow_is_arithmetic_error() {
        let huge = ConversionRequest::parse("USD", "EUR", Decimal::MAX).unwrap();
        let aggregator = aggregator(vec![MockProvider::rate("API1", "2")]);

        let err = aggregator.find_best(&huge).await.unwrap_err();
        assert_eq!(err, AggregationError::Arithmetic(ArithmeticError::Overflow));
    }

    #[test]
    fn statuses_follow_registration_order() {
        let aggregator = aggregator(vec![
            MockProvider::rate("API1", "0.85"),
            MockProvider::rate("API2", "0.86"),
        ]);
        let statuses = aggregator.provider_statuses();
        assert_eq!(aggregator.provider_count(), 2);
        assert_eq!(statuses[0].name, "API1");
        assert_eq!(statuses[1].name, "API2");
        assert!(statuses[0].circuit_state.is_none());
    }
}
