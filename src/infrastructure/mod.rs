//! # Infrastructure Layer
//!
//! Outbound adapters: provider wire clients and the resilience policies
//! that guard them.

pub mod providers;
pub mod resilience;
