//! # Resilience
//!
//! Fault-tolerance building blocks wrapped around every provider call.
//!
//! - [`ProviderPolicy`]: retry → circuit breaker → timeout composition
//! - [`CircuitBreaker`]: shared, failure-rate based breaker
//! - [`RetryPolicy`]: bounded fixed-delay retry

pub mod circuit_breaker;
pub mod policy;
pub mod retry;

pub use circuit_breaker::{BreakerPermit, CircuitBreaker, CircuitBreakerConfig, CircuitState};
pub use policy::ProviderPolicy;
pub use retry::RetryPolicy;
