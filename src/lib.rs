//! # fx-best-rate
//!
//! Best-rate currency conversion across several independent rate providers.
//!
//! A conversion request is sent concurrently to every registered provider.
//! Each provider call runs under its own policy (per-attempt timeout,
//! bounded retry, optional circuit breaker, optional fallback), and the
//! highest positive rate wins. The converted amount is `amount × rate`
//! rounded half-up to two decimal places.
//!
//! # Layers
//!
//! - [`domain`]: requests, quotes, results and decimal arithmetic
//! - [`application`]: the aggregator and result selection
//! - [`infrastructure`]: provider wire clients and resilience policies
//! - [`api`]: the REST boundary
//! - [`config`]: layered settings for the server binary
//!
//! # Example
//!
//! ```ignore
//! use fx_best_rate::application::RateAggregator;
//! use fx_best_rate::config::ProvidersConfig;
//! use fx_best_rate::domain::entities::ConversionRequest;
//! use fx_best_rate::infrastructure::providers::build_providers;
//! use rust_decimal::Decimal;
//!
//! let aggregator = RateAggregator::new(build_providers(&ProvidersConfig::default())?);
//! let request = ConversionRequest::parse("USD", "EUR", Decimal::new(10000, 2))?;
//! let best = aggregator.find_best(&request).await?;
//! println!("{} @ {} = {}", best.provider_name(), best.rate(), best.converted_amount());
//! ```

pub mod api;
pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
