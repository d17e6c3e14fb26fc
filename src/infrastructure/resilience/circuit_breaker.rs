//! # Circuit Breaker
//!
//! Per-provider failure-rate breaker shared by every concurrent request.
//!
//! The breaker keeps a rolling window of the last
//! `request_volume_threshold` call results. Once the window is full and the
//! share of failures reaches `failure_ratio`, the breaker opens and rejects
//! calls without reaching the provider. After `open_delay` a single trial
//! call is admitted (half-open); its result either closes the breaker or
//! opens it again.
//!
//! ```text
//!  Closed ──(window full, failures ≥ ratio)──▶ Open
//!    ▲                                          │
//!    │                                  (open_delay elapsed)
//!    │                                          ▼
//!    └──────────(trial succeeds)────────── HalfOpen ──(trial fails)──▶ Open
//! ```
//!
//! All transitions happen under one mutex, so a transition is observed
//! atomically by concurrent callers.
//!
//! # Examples
//!
//! ```
//! use fx_best_rate::infrastructure::resilience::circuit_breaker::{
//!     CircuitBreaker, CircuitBreakerConfig, CircuitState,
//! };
//!
//! let breaker = CircuitBreaker::new("API1", CircuitBreakerConfig::default());
//! assert_eq!(breaker.state(), CircuitState::Closed);
//!
//! for _ in 0..4 {
//!     let permit = breaker.try_acquire().unwrap();
//!     permit.record(false);
//! }
//! assert_eq!(breaker.state(), CircuitState::Open);
//! assert!(breaker.try_acquire().is_err());
//! ```

use crate::infrastructure::providers::error::{ProviderError, ProviderResult};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;
use std::time::Duration;
use tokio::time::Instant;

/// Default number of calls in the rolling window.
const DEFAULT_REQUEST_VOLUME_THRESHOLD: usize = 4;

/// Default failure ratio that opens the breaker.
const DEFAULT_FAILURE_RATIO: f64 = 0.5;

/// Default time spent open before a trial call.
const DEFAULT_OPEN_DELAY_MS: u64 = 1000;

/// Circuit breaker tuning.
#[derive(Debug, Clone, PartialEq)]
pub struct CircuitBreakerConfig {
    /// Size of the rolling window; the breaker never opens before it is full.
    pub request_volume_threshold: usize,
    /// Failure share (0, 1] of the window that opens the breaker.
    pub failure_ratio: f64,
    /// How long the breaker stays open before admitting a trial call.
    pub open_delay: Duration,
}

impl Default for CircuitBreakerConfig {
    fn default() -> Self {
        Self {
            request_volume_threshold: DEFAULT_REQUEST_VOLUME_THRESHOLD,
            failure_ratio: DEFAULT_FAILURE_RATIO,
            open_delay: Duration::from_millis(DEFAULT_OPEN_DELAY_MS),
        }
    }
}

impl CircuitBreakerConfig {
    /// Sets the rolling window size.
    #[must_use]
    pub fn with_request_volume_threshold(mut self, threshold: usize) -> Self {
        self.request_volume_threshold = threshold.max(1);
        self
    }

    /// Sets the failure ratio.
    #[must_use]
    pub fn with_failure_ratio(mut self, ratio: f64) -> Self {
        self.failure_ratio = ratio;
        self
    }

    /// Sets the open delay.
    #[must_use]
    pub fn with_open_delay(mut self, delay: Duration) -> Self {
        self.open_delay = delay;
        self
    }
}

/// Observable breaker state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CircuitState {
    /// Calls flow normally.
    Closed,
    /// Calls are rejected without reaching the provider.
    Open,
    /// One trial call decides whether to close or reopen.
    HalfOpen,
}

impl fmt::Display for CircuitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Closed => write!(f, "CLOSED"),
            Self::Open => write!(f, "OPEN"),
            Self::HalfOpen => write!(f, "HALF_OPEN"),
        }
    }
}

#[derive(Debug)]
struct BreakerState {
    state: CircuitState,
    /// `true` = failure, newest at the back.
    window: VecDeque<bool>,
    opened_at: Option<Instant>,
    trial_in_flight: bool,
}

impl BreakerState {
    fn open(&mut self) {
        self.state = CircuitState::Open;
        self.opened_at = Some(Instant::now());
        self.trial_in_flight = false;
        self.window.clear();
    }

    fn close(&mut self) {
        self.state = CircuitState::Closed;
        self.opened_at = None;
        self.trial_in_flight = false;
        self.window.clear();
    }
}

/// A failure-rate circuit breaker.
#[derive(Debug)]
pub struct CircuitBreaker {
    name: String,
    config: CircuitBreakerConfig,
    inner: Mutex<BreakerState>,
}

impl CircuitBreaker {
    /// Creates a closed breaker for the named provider.
    #[must_use]
    pub fn new(name: impl Into<String>, config: CircuitBreakerConfig) -> Self {
        let capacity = config.request_volume_threshold;
        Self {
            name: name.into(),
            config,
            inner: Mutex::new(BreakerState {
                state: CircuitState::Closed,
                window: VecDeque::with_capacity(capacity),
                opened_at: None,
                trial_in_flight: false,
            }),
        }
    }

    /// Returns the provider name this breaker guards.
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the configuration.
    #[inline]
    #[must_use]
    pub fn config(&self) -> &CircuitBreakerConfig {
        &self.config
    }

    /// Returns the current state.
    ///
    /// An open breaker whose delay has elapsed still reports `Open` until a
    /// caller actually takes the trial permit.
    #[must_use]
    pub fn state(&self) -> CircuitState {
        self.inner.lock().state
    }

    /// Asks for permission to call the provider.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::CircuitOpen`] while the breaker is open, or
    /// while another caller holds the half-open trial permit.
    pub fn try_acquire(&self) -> ProviderResult<BreakerPermit<'_>> {
        let mut inner = self.inner.lock();
        match inner.state {
            CircuitState::Closed => Ok(BreakerPermit::new(self, false)),
            CircuitState::Open => {
                let delay_elapsed = inner
                    .opened_at
                    .is_none_or(|opened| opened.elapsed() >= self.config.open_delay);
                if delay_elapsed {
                    inner.state = CircuitState::HalfOpen;
                    inner.trial_in_flight = true;
                    tracing::info!(provider = %self.name, "circuit half-open, admitting trial call");
                    Ok(BreakerPermit::new(self, true))
                } else {
                    Err(ProviderError::circuit_open(&self.name))
                }
            }
            CircuitState::HalfOpen => {
                if inner.trial_in_flight {
                    Err(ProviderError::circuit_open(&self.name))
                } else {
                    inner.trial_in_flight = true;
                    Ok(BreakerPermit::new(self, true))
                }
            }
        }
    }

    fn on_result(&self, trial: bool, success: bool) {
        let mut inner = self.inner.lock();

        if trial {
            if inner.state != CircuitState::HalfOpen {
                return;
            }
            if success {
                inner.close();
                tracing::info!(provider = %self.name, "circuit closed after successful trial");
            } else {
                inner.open();
                tracing::warn!(provider = %self.name, "circuit reopened after failed trial");
            }
            return;
        }

        // Results of calls admitted before the breaker opened are dropped.
        if inner.state != CircuitState::Closed {
            return;
        }

        inner.window.push_back(!success);
        while inner.window.len() > self.config.request_volume_threshold {
            inner.window.pop_front();
        }

        if inner.window.len() == self.config.request_volume_threshold {
            let failures = inner.window.iter().filter(|failed| **failed).count();
            let ratio = failures as f64 / inner.window.len() as f64;
            if ratio >= self.config.failure_ratio {
                inner.open();
                tracing::warn!(
                    provider = %self.name,
                    failures,
                    window = self.config.request_volume_threshold,
                    "circuit opened"
                );
            }
        }
    }
}

/// Permission to make one call, obtained from [`CircuitBreaker::try_acquire`].
///
/// The call's result must be reported with [`BreakerPermit::record`]. A
/// permit dropped without a result counts as a failure, so an abandoned
/// half-open trial can never wedge the breaker.
#[derive(Debug)]
#[must_use = "a permit must be settled with `record`"]
pub struct BreakerPermit<'a> {
    breaker: &'a CircuitBreaker,
    trial: bool,
    settled: bool,
}

impl<'a> BreakerPermit<'a> {
    fn new(breaker: &'a CircuitBreaker, trial: bool) -> Self {
        Self {
            breaker,
            trial,
            settled: false,
        }
    }

    /// Returns true if this permit is the half-open trial.
    #[inline]
    #[must_use]
    pub fn is_trial(&self) -> bool {
        self.trial
    }

    /// Reports the call's result to the breaker.
    pub fn record(mut self, success: bool) {
        self.settled = true;
        self.breaker.on_result(self.trial, success);
    }
}

impl Drop for BreakerPermit<'_> {
    fn drop(&mut self) {
        if !self.settled {
            self.breaker.on_result(self.trial, false);
        }
    }
}
