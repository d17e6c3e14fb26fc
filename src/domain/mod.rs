//! # Domain Layer
//!
//! Request, quote and result types plus the decimal arithmetic they rely on.
//! Nothing here performs I/O.

pub mod entities;
pub mod errors;
pub mod value_objects;

pub use errors::{ValidationError, ValidationResult};
