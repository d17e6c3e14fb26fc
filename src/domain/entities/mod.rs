//! # Domain Entities
//!
//! - [`ConversionRequest`]: validated inbound request
//! - [`ConversionResult`]: the winning conversion
//! - [`Quote`]: one provider's positive rate

pub mod conversion;
pub mod quote;

pub use conversion::{ConversionRequest, ConversionResult, MIN_AMOUNT};
pub use quote::Quote;
