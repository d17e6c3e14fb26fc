//! # Application Errors
//!
//! Failures of the best-rate use case.
//!
//! ```text
//! AggregationError
//! ├── NoProvidersAvailable   - nothing registered
//! ├── NoValidRate            - every provider failed or was filtered out
//! └── Arithmetic             - converted amount overflowed
//! ```
//!
//! Per-provider failures never appear here; they are folded into each
//! provider's outcome and only logged.

use crate::domain::value_objects::ArithmeticError;
use thiserror::Error;

/// Error type for aggregation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AggregationError {
    /// No providers are registered.
    #[error("no rate providers available")]
    NoProvidersAvailable,

    /// No provider produced a usable rate.
    #[error("no valid exchange rate found: {valid} valid responses out of {total}")]
    NoValidRate {
        /// Number of valid outcomes.
        valid: usize,
        /// Number of providers queried.
        total: usize,
    },

    /// Converted amount could not be computed.
    #[error("conversion failed: {0}")]
    Arithmetic(#[from] ArithmeticError),
}

impl AggregationError {
    /// Returns true if this is [`AggregationError::NoValidRate`].
    #[must_use]
    pub fn is_no_valid_rate(&self) -> bool {
        matches!(self, Self::NoValidRate { .. })
    }
}

/// Result type for aggregation.
pub type AggregationResult<T> = Result<T, AggregationError>;
