//! # Currency Code Value Object
//!
//! ISO-4217-shaped currency code.
//!
//! Only the shape is checked (three uppercase ASCII letters). Whether a pair
//! is actually quotable is the providers' concern.
//!
//! # Examples
//!
//! ```
//! use fx_best_rate::domain::value_objects::CurrencyCode;
//!
//! let usd = CurrencyCode::new("USD").unwrap();
//! assert_eq!(usd.as_str(), "USD");
//!
//! assert!(CurrencyCode::new("usd").is_err());
//! assert!(CurrencyCode::new("US").is_err());
//! ```

use crate::domain::errors::{ValidationError, ValidationResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Length of a currency code.
pub const CURRENCY_CODE_LEN: usize = 3;

/// A validated three-letter uppercase currency code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CurrencyCode(String);

impl CurrencyCode {
    /// Creates a currency code, validating its shape.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidCurrencyCode`] unless the input is
    /// exactly three uppercase ASCII letters.
    pub fn new(code: impl Into<String>) -> ValidationResult<Self> {
        let code = code.into();
        let well_formed =
            code.len() == CURRENCY_CODE_LEN && code.bytes().all(|b| b.is_ascii_uppercase());
        if !well_formed {
            return Err(ValidationError::invalid_currency_code(code));
        }
        Ok(Self(code))
    }

    /// Returns the code as a string slice.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for CurrencyCode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for CurrencyCode {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<CurrencyCode> for String {
    fn from(code: CurrencyCode) -> Self {
        code.0
    }
}

impl AsRef<str> for CurrencyCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
