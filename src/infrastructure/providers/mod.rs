//! # Rate Providers
//!
//! Remote exchange-rate sources behind a uniform quoting capability.
//!
//! - [`RateClient`]: one remote call in a provider's wire format
//! - [`PolicyProvider`]: a client wrapped in its [`ProviderPolicy`](crate::infrastructure::resilience::ProviderPolicy)
//! - [`build_providers`]: the configured provider set in registration order

pub mod error;
pub mod flat_json;
pub mod http_client;
pub mod nested_json;
pub mod policy_provider;
pub mod registry;
pub mod traits;
pub mod xml_document;

pub use error::{ProviderError, ProviderResult};
pub use flat_json::FlatJsonClient;
pub use http_client::HttpClient;
pub use nested_json::NestedJsonClient;
pub use policy_provider::PolicyProvider;
pub use registry::{build_providers, policy_for};
pub use traits::{ProviderOutcome, RateClient, RateProvider};
pub use xml_document::XmlDocumentClient;
