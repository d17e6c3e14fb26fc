//! # Domain Errors
//!
//! Validation failures raised while constructing domain values.
//!
//! These errors are produced at the boundary when an inbound conversion
//! request is malformed. A value that made it past construction is valid for
//! the rest of its lifetime, so the core never sees a [`ValidationError`].

use thiserror::Error;

/// Error raised when a domain value fails validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Currency code is not exactly three uppercase ASCII letters.
    #[error("invalid currency code '{code}': must be exactly 3 uppercase letters")]
    InvalidCurrencyCode {
        /// The rejected input.
        code: String,
    },

    /// Conversion amount is below the minimum.
    #[error("amount must be at least {minimum}, got {amount}")]
    AmountTooSmall {
        /// The rejected amount, rendered as text.
        amount: String,
        /// The minimum accepted amount, rendered as text.
        minimum: String,
    },

    /// A required field is missing.
    #[error("{0} is required")]
    MissingField(&'static str),

    /// Rate is zero or negative.
    #[error("rate must be positive, got {0}")]
    NonPositiveRate(String),
}

impl ValidationError {
    /// Creates an invalid currency code error.
    #[must_use]
    pub fn invalid_currency_code(code: impl Into<String>) -> Self {
        Self::InvalidCurrencyCode { code: code.into() }
    }
}

/// Result type for domain validation.
pub type ValidationResult<T> = Result<T, ValidationError>;
