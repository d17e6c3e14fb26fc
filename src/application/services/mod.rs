//! # Application Services
//!
//! - [`RateAggregator`]: concurrent fan-out and best-rate selection
//! - [`select_best`], [`converted_amount`]: pure selection and rounding

pub mod rate_aggregation;
pub mod result_selector;

pub use rate_aggregation::{ProviderStatus, RateAggregator};
pub use result_selector::{converted_amount, select_best};
