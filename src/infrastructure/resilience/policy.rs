//! # Provider Policy
//!
//! Composable fault tolerance around a single provider call.
//!
//! A [`ProviderPolicy`] takes a "do the call" closure and runs it under, from
//! the outside in:
//!
//! 1. **retry**: bounded, fixed delay, transient errors only
//! 2. **circuit breaker**: optional; checked before every attempt and fed
//!    every attempt's result
//! 3. **timeout**: each attempt gets its own window
//!
//! Fallback is a flag read by the caller once `execute` has failed; it never
//! alters the error returned here.
//!
//! # Examples
//!
//! ```
//! use fx_best_rate::infrastructure::resilience::{CircuitBreakerConfig, ProviderPolicy};
//! use std::time::Duration;
//!
//! let policy = ProviderPolicy::new("API1", Duration::from_secs(2))
//!     .with_retry(2, Duration::from_millis(500))
//!     .with_circuit_breaker(CircuitBreakerConfig::default());
//!
//! assert!(policy.circuit_breaker().is_some());
//! assert!(!policy.has_fallback());
//! ```

use crate::infrastructure::providers::error::{ProviderError, ProviderResult};
use crate::infrastructure::resilience::circuit_breaker::{
    CircuitBreaker, CircuitBreakerConfig, CircuitState,
};
use crate::infrastructure::resilience::retry::RetryPolicy;
use std::future::Future;
use std::time::Duration;

/// Timeout, retry, circuit breaker and fallback settings for one provider.
#[derive(Debug)]
pub struct ProviderPolicy {
    provider: String,
    timeout: Duration,
    retry: RetryPolicy,
    circuit_breaker: Option<CircuitBreaker>,
    fallback: bool,
}

impl ProviderPolicy {
    /// Creates a policy with only a per-attempt timeout.
    #[must_use]
    pub fn new(provider: impl Into<String>, timeout: Duration) -> Self {
        Self {
            provider: provider.into(),
            timeout,
            retry: RetryPolicy::none(),
            circuit_breaker: None,
            fallback: false,
        }
    }

    /// Adds bounded retry.
    #[must_use]
    pub fn with_retry(mut self, max_retries: u32, delay: Duration) -> Self {
        self.retry = RetryPolicy::new(max_retries, delay);
        self
    }

    /// Adds a circuit breaker.
    #[must_use]
    pub fn with_circuit_breaker(mut self, config: CircuitBreakerConfig) -> Self {
        self.circuit_breaker = Some(CircuitBreaker::new(self.provider.clone(), config));
        self
    }

    /// Enables the static fallback outcome on exhaustion.
    #[must_use]
    pub fn with_fallback(mut self) -> Self {
        self.fallback = true;
        self
    }

    /// Returns the provider name.
    #[inline]
    #[must_use]
    pub fn provider(&self) -> &str {
        &self.provider
    }

    /// Returns the per-attempt timeout.
    #[inline]
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Returns the retry policy.
    #[inline]
    #[must_use]
    pub fn retry(&self) -> &RetryPolicy {
        &self.retry
    }

    /// Returns the circuit breaker, if configured.
    #[inline]
    #[must_use]
    pub fn circuit_breaker(&self) -> Option<&CircuitBreaker> {
        self.circuit_breaker.as_ref()
    }

    /// Returns the circuit state, if a breaker is configured.
    #[must_use]
    pub fn circuit_state(&self) -> Option<CircuitState> {
        self.circuit_breaker.as_ref().map(CircuitBreaker::state)
    }

    /// Returns true if failures should be replaced by the fallback outcome.
    #[inline]
    #[must_use]
    pub fn has_fallback(&self) -> bool {
        self.fallback
    }

    /// Runs `call` under retry, circuit breaker and timeout.
    ///
    /// `call` is invoked once per attempt and must build a fresh request each
    /// time.
    ///
    /// # Errors
    ///
    /// Returns the error of the last attempt: the call's own error, a
    /// [`ProviderError::Timeout`] if the attempt overran, or
    /// [`ProviderError::CircuitOpen`] if the breaker refused it.
    pub async fn execute<T, F, Fut>(&self, call: F) -> ProviderResult<T>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = ProviderResult<T>>,
    {
        let call = &call;
        self.retry
            .run(&self.provider, move |_| self.attempt(call))
            .await
    }

    async fn attempt<T, F, Fut>(&self, call: &F) -> ProviderResult<T>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = ProviderResult<T>>,
    {
        let permit = match &self.circuit_breaker {
            Some(breaker) => Some(breaker.try_acquire()?),
            None => None,
        };

        let result = match tokio::time::timeout(self.timeout, call()).await {
            Ok(result) => result,
            Err(_) => {
                let timeout_ms = u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX);
                Err(ProviderError::timeout_with_duration(
                    format!("{} did not answer within {}ms", self.provider, timeout_ms),
                    timeout_ms,
                ))
            }
        };

        if let Some(permit) = permit {
            permit.record(result.is_ok());
        }

        result
    }
}
