//! # Application Layer
//!
//! The best-rate use case: query every provider, select the best quote and
//! compute the converted amount.

pub mod error;
pub mod services;

pub use error::{AggregationError, AggregationResult};
pub use services::{ProviderStatus, RateAggregator};
