//! # Conversion Entities
//!
//! The inbound conversion request and the winning conversion result.
//!
//! # Examples
//!
//! ```
//! use fx_best_rate::domain::entities::conversion::ConversionRequest;
//! use rust_decimal::Decimal;
//!
//! let request = ConversionRequest::parse("USD", "EUR", Decimal::new(10000, 2)).unwrap();
//! assert_eq!(request.source_currency().as_str(), "USD");
//! assert_eq!(request.amount(), Decimal::new(10000, 2));
//! ```

use crate::domain::errors::{ValidationError, ValidationResult};
use crate::domain::value_objects::CurrencyCode;
use rust_decimal::Decimal;
use std::fmt;
use std::time::Duration;

/// Smallest accepted conversion amount (0.01).
pub const MIN_AMOUNT: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// A request to convert `amount` of `source_currency` into `target_currency`.
///
/// # Invariants
///
/// - `amount >= 0.01`
/// - Both currency codes are three uppercase letters
///
/// Instances are only obtainable through the validating constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionRequest {
    source_currency: CurrencyCode,
    target_currency: CurrencyCode,
    amount: Decimal,
}

impl ConversionRequest {
    /// Creates a validated conversion request.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::AmountTooSmall`] if `amount < 0.01`.
    pub fn new(
        source_currency: CurrencyCode,
        target_currency: CurrencyCode,
        amount: Decimal,
    ) -> ValidationResult<Self> {
        if amount < MIN_AMOUNT {
            return Err(ValidationError::AmountTooSmall {
                amount: amount.to_string(),
                minimum: MIN_AMOUNT.to_string(),
            });
        }
        Ok(Self {
            source_currency,
            target_currency,
            amount,
        })
    }

    /// Creates a validated conversion request from raw currency strings.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if either code is malformed or the
    /// amount is below the minimum.
    pub fn parse(source: &str, target: &str, amount: Decimal) -> ValidationResult<Self> {
        Self::new(CurrencyCode::new(source)?, CurrencyCode::new(target)?, amount)
    }

    /// Returns the source currency.
    #[inline]
    #[must_use]
    pub fn source_currency(&self) -> &CurrencyCode {
        &self.source_currency
    }

    /// Returns the target currency.
    #[inline]
    #[must_use]
    pub fn target_currency(&self) -> &CurrencyCode {
        &self.target_currency
    }

    /// Returns the amount to convert.
    #[inline]
    #[must_use]
    pub fn amount(&self) -> Decimal {
        self.amount
    }
}

impl fmt::Display for ConversionRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} -> {}",
            self.amount, self.source_currency, self.target_currency
        )
    }
}

/// The best conversion found across all providers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionResult {
    provider_name: String,
    rate: Decimal,
    converted_amount: Decimal,
    total_elapsed: Duration,
}

impl ConversionResult {
    /// Creates a conversion result.
    #[must_use]
    pub fn new(
        provider_name: impl Into<String>,
        rate: Decimal,
        converted_amount: Decimal,
        total_elapsed: Duration,
    ) -> Self {
        Self {
            provider_name: provider_name.into(),
            rate,
            converted_amount,
            total_elapsed,
        }
    }

    /// Returns the winning provider's name.
    #[inline]
    #[must_use]
    pub fn provider_name(&self) -> &str {
        &self.provider_name
    }

    /// Returns the winning rate.
    #[inline]
    #[must_use]
    pub fn rate(&self) -> Decimal {
        self.rate
    }

    /// Returns `amount × rate`, rounded half-up to two places.
    #[inline]
    #[must_use]
    pub fn converted_amount(&self) -> Decimal {
        self.converted_amount
    }

    /// Returns the wall-clock span of the whole fan-out.
    #[inline]
    #[must_use]
    pub fn total_elapsed(&self) -> Duration {
        self.total_elapsed
    }

    /// Returns the total elapsed time in whole milliseconds.
    #[must_use]
    pub fn response_time_ms(&self) -> u64 {
        u64::try_from(self.total_elapsed.as_millis()).unwrap_or(u64::MAX)
    }
}

impl fmt::Display for ConversionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ConversionResult({} rate={} converted={} in {}ms)",
            self.provider_name,
            self.rate,
            self.converted_amount,
            self.response_time_ms()
        )
    }
}
