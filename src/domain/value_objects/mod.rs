//! # Value Objects
//!
//! Immutable types with validation and domain semantics.
//!
//! - [`CurrencyCode`]: three-letter uppercase currency code
//! - [`ArithmeticError`], [`CheckedArithmetic`]: non-panicking decimal math
//! - [`round_money`]: half-up rounding to two decimal places

pub mod arithmetic;
pub mod currency_code;

pub use arithmetic::{
    ArithmeticError, ArithmeticResult, CheckedArithmetic, MONEY_SCALE, round_half_up,
    round_money,
};
pub use currency_code::CurrencyCode;
