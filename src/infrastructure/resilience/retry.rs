//! # Retry Policy
//!
//! Bounded, fixed-delay retry of transient provider failures.
//!
//! Only errors for which [`ProviderError::is_retryable`] holds are retried;
//! anything else ends the loop on the spot. Each attempt re-runs the whole
//! call, request encoding included.

use crate::infrastructure::providers::error::{ProviderError, ProviderResult};
use std::future::Future;
use std::time::Duration;

/// Default number of retries after the first attempt.
const DEFAULT_MAX_RETRIES: u32 = 2;

/// Default pause between attempts in milliseconds.
const DEFAULT_RETRY_DELAY_MS: u64 = 500;

/// Fixed-delay retry policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_retries: u32,
    delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            delay: Duration::from_millis(DEFAULT_RETRY_DELAY_MS),
        }
    }
}

impl RetryPolicy {
    /// Creates a retry policy.
    #[must_use]
    pub fn new(max_retries: u32, delay: Duration) -> Self {
        Self { max_retries, delay }
    }

    /// A policy that never retries.
    #[must_use]
    pub fn none() -> Self {
        Self::new(0, Duration::ZERO)
    }

    /// Returns the number of retries after the first attempt.
    #[inline]
    #[must_use]
    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Returns the pause between attempts.
    #[inline]
    #[must_use]
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Returns the maximum number of attempts (first call plus retries).
    #[inline]
    #[must_use]
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    /// Runs `attempt` until it succeeds, fails permanently, or retries run out.
    ///
    /// `attempt` receives the zero-based attempt number.
    ///
    /// # Errors
    ///
    /// Returns the last error once a non-retryable error occurs or all
    /// retries are spent.
    pub async fn run<T, F, Fut>(&self, provider: &str, mut attempt: F) -> ProviderResult<T>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = ProviderResult<T>>,
    {
        let mut attempt_no = 0;
        loop {
            match attempt(attempt_no).await {
                Ok(value) => return Ok(value),
                Err(error) => {
                    if !self.should_retry(&error, attempt_no) {
                        return Err(error);
                    }
                    tracing::debug!(
                        provider,
                        attempt = attempt_no + 1,
                        max_attempts = self.max_attempts(),
                        error = %error,
                        "retrying provider call"
                    );
                    tokio::time::sleep(self.delay).await;
                    attempt_no += 1;
                }
            }
        }
    }

    fn should_retry(&self, error: &ProviderError, attempt_no: u32) -> bool {
        error.is_retryable() && attempt_no < self.max_retries
    }
}
