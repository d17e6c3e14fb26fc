//! # Policy-Guarded Provider
//!
//! Couples a [`RateClient`] with its [`ProviderPolicy`] and exposes the
//! uniform [`RateProvider::quote`] operation.

use crate::domain::entities::conversion::ConversionRequest;
use crate::domain::entities::quote::Quote;
use crate::infrastructure::providers::error::ProviderError;
use crate::infrastructure::providers::traits::{ProviderOutcome, RateClient, RateProvider};
use crate::infrastructure::resilience::{CircuitState, ProviderPolicy};
use async_trait::async_trait;
use rust_decimal::Decimal;
use tokio::time::Instant;

/// A rate provider whose remote call runs under a resilience policy.
#[derive(Debug)]
pub struct PolicyProvider<C: RateClient> {
    name: String,
    client: C,
    policy: ProviderPolicy,
}

impl<C: RateClient> PolicyProvider<C> {
    /// Creates a provider.
    #[must_use]
    pub fn new(name: impl Into<String>, client: C, policy: ProviderPolicy) -> Self {
        Self {
            name: name.into(),
            client,
            policy,
        }
    }

    /// Returns the underlying wire client.
    #[inline]
    #[must_use]
    pub fn client(&self) -> &C {
        &self.client
    }

    /// Returns the resilience policy.
    #[inline]
    #[must_use]
    pub fn policy(&self) -> &ProviderPolicy {
        &self.policy
    }

    fn on_failure(&self, error: ProviderError) -> ProviderOutcome {
        if self.policy.has_fallback() {
            tracing::warn!(
                provider = %self.name,
                error = %error,
                "using fallback for provider"
            );
            return ProviderOutcome::Invalid;
        }
        tracing::warn!(
            provider = %self.name,
            kind = error.kind(),
            error = %error,
            "error calling provider"
        );
        ProviderOutcome::Failed(error)
    }
}

#[async_trait]
impl<C: RateClient> RateProvider for PolicyProvider<C> {
    fn name(&self) -> &str {
        &self.name
    }

    fn circuit_state(&self) -> Option<CircuitState> {
        self.policy.circuit_state()
    }

    async fn quote(&self, request: &ConversionRequest) -> ProviderOutcome {
        if request.amount() <= Decimal::ZERO {
            tracing::error!(provider = %self.name, %request, "invalid request parameters");
            return ProviderOutcome::Failed(ProviderError::invalid_request(format!(
                "amount must be positive, got {}",
                request.amount()
            )));
        }

        let started = Instant::now();
        let result = self
            .policy
            .execute(|| self.client.fetch_rate(request))
            .await;

        match result {
            Ok(Some(rate)) => match Quote::new(self.name.clone(), rate, started.elapsed()) {
                Ok(quote) => {
                    tracing::debug!(
                        provider = %self.name,
                        format = self.client.wire_format(),
                        %rate,
                        "provider returned rate"
                    );
                    ProviderOutcome::Valid(quote)
                }
                Err(_) => {
                    tracing::warn!(provider = %self.name, %rate, "provider returned invalid rate");
                    ProviderOutcome::Invalid
                }
            },
            Ok(None) => {
                tracing::warn!(provider = %self.name, "provider returned no rate");
                ProviderOutcome::Invalid
            }
            Err(error) => self.on_failure(error),
        }
    }
}
