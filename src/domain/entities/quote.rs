//! # Quote Entity
//!
//! A single provider's rate for one conversion request.
//!
//! # Examples
//!
//! ```
//! use fx_best_rate::domain::entities::quote::Quote;
//! use rust_decimal::Decimal;
//! use std::time::Duration;
//!
//! let quote = Quote::new("API1", Decimal::new(85, 2), Duration::from_millis(40)).unwrap();
//! assert_eq!(quote.provider_name(), "API1");
//!
//! assert!(Quote::new("API1", Decimal::ZERO, Duration::ZERO).is_err());
//! ```

use crate::domain::errors::{ValidationError, ValidationResult};
use rust_decimal::Decimal;
use std::fmt;
use std::time::Duration;

/// A positive rate reported by one provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quote {
    provider_name: String,
    rate: Decimal,
    elapsed: Duration,
}

impl Quote {
    /// Creates a quote.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::NonPositiveRate`] if `rate <= 0`.
    pub fn new(
        provider_name: impl Into<String>,
        rate: Decimal,
        elapsed: Duration,
    ) -> ValidationResult<Self> {
        if rate <= Decimal::ZERO {
            return Err(ValidationError::NonPositiveRate(rate.to_string()));
        }
        Ok(Self {
            provider_name: provider_name.into(),
            rate,
            elapsed,
        })
    }

    /// Returns the provider name.
    #[inline]
    #[must_use]
    pub fn provider_name(&self) -> &str {
        &self.provider_name
    }

    /// Returns the quoted rate.
    #[inline]
    #[must_use]
    pub fn rate(&self) -> Decimal {
        self.rate
    }

    /// Returns how long this provider took, retries included.
    #[inline]
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }
}

impl fmt::Display for Quote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Quote({} rate={} in {}ms)",
            self.provider_name,
            self.rate,
            self.elapsed.as_millis()
        )
    }
}
