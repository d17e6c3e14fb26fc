//! # Rate Provider Traits
//!
//! Port definitions for rate provider integrations.
//!
//! Two seams are defined here:
//!
//! - [`RateClient`]: one remote call, encoded in a provider's own wire
//!   format, yielding "one decimal rate or none". It may fail.
//! - [`RateProvider`]: the uniform, infallible `quote` operation the
//!   aggregator fans out to. Every failure has already been folded into a
//!   [`ProviderOutcome`].
//!
//! [`PolicyProvider`](crate::infrastructure::providers::PolicyProvider) joins
//! the two by running a client under its resilience policy.

use crate::domain::entities::conversion::ConversionRequest;
use crate::domain::entities::quote::Quote;
use crate::infrastructure::providers::error::{ProviderError, ProviderResult};
use crate::infrastructure::resilience::CircuitState;
use async_trait::async_trait;
use rust_decimal::Decimal;
use std::fmt;

/// Terminal result of asking one provider for a quote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderOutcome {
    /// The provider returned a positive rate.
    Valid(Quote),
    /// The provider answered without a usable (positive) rate.
    Invalid,
    /// The call failed; the cause is kept for diagnostics only.
    Failed(ProviderError),
}

impl ProviderOutcome {
    /// Returns the quote if the outcome is valid.
    #[must_use]
    pub fn quote(&self) -> Option<&Quote> {
        match self {
            Self::Valid(quote) => Some(quote),
            Self::Invalid | Self::Failed(_) => None,
        }
    }

    /// Consumes the outcome, returning the quote if valid.
    #[must_use]
    pub fn into_quote(self) -> Option<Quote> {
        match self {
            Self::Valid(quote) => Some(quote),
            Self::Invalid | Self::Failed(_) => None,
        }
    }

    /// Returns true for [`ProviderOutcome::Valid`].
    #[inline]
    #[must_use]
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid(_))
    }

    /// Returns the failure cause, if any.
    #[must_use]
    pub fn error(&self) -> Option<&ProviderError> {
        match self {
            Self::Failed(error) => Some(error),
            Self::Valid(_) | Self::Invalid => None,
        }
    }
}

impl fmt::Display for ProviderOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Valid(quote) => write!(f, "VALID({})", quote),
            Self::Invalid => write!(f, "INVALID"),
            Self::Failed(error) => write!(f, "FAILED({})", error),
        }
    }
}

/// A provider-specific remote rate call.
///
/// Implementations translate the request into their wire shape, perform the
/// call and extract the rate. `Ok(None)` means the provider answered but
/// the rate field was absent.
#[async_trait]
pub trait RateClient: Send + Sync + fmt::Debug {
    /// Returns a short label for the wire format, used in logs.
    fn wire_format(&self) -> &'static str;

    /// Fetches the rate for `request`.
    ///
    /// # Errors
    ///
    /// Returns a [`ProviderError`] for transport, HTTP status, encoding or
    /// decoding failures.
    async fn fetch_rate(&self, request: &ConversionRequest) -> ProviderResult<Option<Decimal>>;
}

/// A rate provider as seen by the aggregator.
///
/// `quote` never fails; errors are reported as
/// [`ProviderOutcome::Failed`].
#[async_trait]
pub trait RateProvider: Send + Sync + fmt::Debug {
    /// Returns the provider name.
    fn name(&self) -> &str;

    /// Returns the circuit breaker state, if the provider has one.
    fn circuit_state(&self) -> Option<CircuitState> {
        None
    }

    /// Quotes a rate for `request`.
    async fn quote(&self, request: &ConversionRequest) -> ProviderOutcome;
}
