//! # Checked Arithmetic
//!
//! Safe multiplication and monetary rounding for decimal values.
//!
//! This module provides:
//! - [`ArithmeticError`] - Error type for arithmetic failures
//! - [`CheckedArithmetic`] - Trait for non-panicking arithmetic
//! - [`round_half_up`] / [`round_money`] - Explicit half-up rounding
//!
//! # Examples
//!
//! ```
//! use fx_best_rate::domain::value_objects::arithmetic::{round_money, CheckedArithmetic};
//! use rust_decimal::Decimal;
//!
//! let amount = Decimal::new(10000, 2); // 100.00
//! let rate = Decimal::new(855, 3); // 0.855
//! let converted = round_money(amount.safe_mul(rate).unwrap());
//! assert_eq!(converted, Decimal::new(8550, 2));
//! ```

use rust_decimal::{Decimal, RoundingStrategy};
use thiserror::Error;

/// Number of decimal places kept in converted amounts.
pub const MONEY_SCALE: u32 = 2;

/// Error type for arithmetic operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum ArithmeticError {
    /// Arithmetic operation resulted in overflow.
    #[error("arithmetic overflow")]
    Overflow,
}

/// Result type for arithmetic operations.
pub type ArithmeticResult<T> = Result<T, ArithmeticError>;

/// Trait for checked arithmetic operations.
///
/// Implementors must never panic; overflow is reported as an error.
pub trait CheckedArithmetic: Sized {
    /// Safely multiply two values.
    ///
    /// # Errors
    ///
    /// Returns `ArithmeticError::Overflow` if the result would overflow.
    fn safe_mul(self, rhs: Self) -> ArithmeticResult<Self>;
}

impl CheckedArithmetic for Decimal {
    #[inline]
    fn safe_mul(self, rhs: Self) -> ArithmeticResult<Self> {
        self.checked_mul(rhs).ok_or(ArithmeticError::Overflow)
    }
}

/// Rounds to `dp` decimal places, exact halves away from zero.
#[inline]
#[must_use]
pub fn round_half_up(value: Decimal, dp: u32) -> Decimal {
    value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
}

/// Rounds a monetary value to [`MONEY_SCALE`] places, half-up.
///
/// The result always carries exactly two fractional digits, so `86` is
/// returned as `86.00`.
#[inline]
#[must_use]
pub fn round_money(value: Decimal) -> Decimal {
    let mut rounded = round_half_up(value, MONEY_SCALE);
    rounded.rescale(MONEY_SCALE);
    rounded
}
