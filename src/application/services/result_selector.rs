//! # Result Selector
//!
//! Picks the winning quote and computes the converted amount.
//!
//! Selection compares rates exactly as decimals. Among equal rates the
//! first quote in the slice wins, so callers pass quotes in registration
//! order to get a reproducible tie-break.

use crate::domain::entities::quote::Quote;
use crate::domain::value_objects::{ArithmeticResult, CheckedArithmetic, round_money};
use rust_decimal::Decimal;

/// Returns the quote with the highest rate, first-seen among ties.
#[must_use]
pub fn select_best(quotes: &[Quote]) -> Option<&Quote> {
    quotes.iter().fold(None, |best: Option<&Quote>, quote| match best {
        Some(current) if current.rate() >= quote.rate() => Some(current),
        _ => Some(quote),
    })
}

/// Computes `amount × rate` rounded half-up to two decimal places.
///
/// # Errors
///
/// Returns `ArithmeticError::Overflow` if the product does not fit.
pub fn converted_amount(amount: Decimal, rate: Decimal) -> ArithmeticResult<Decimal> {
    Ok(round_money(amount.safe_mul(rate)?))
}
