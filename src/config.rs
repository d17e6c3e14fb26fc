//! # Application Configuration
//!
//! Layered settings for the server binary.
//!
//! Sources, lowest precedence first:
//! 1. Built-in defaults ([`AppConfig::default`])
//! 2. `config/default.toml`, if present
//! 3. The file named by `FXRATE_CONFIG`, if set
//! 4. Environment variables prefixed `FXRATE__`, nested with `__`
//!    (for example `FXRATE__PROVIDERS__FLAT_JSON__BASE_URL`)

use crate::infrastructure::resilience::CircuitBreakerConfig;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Environment variable naming an extra configuration file.
pub const CONFIG_FILE_ENV: &str = "FXRATE_CONFIG";

/// Environment variable prefix.
pub const ENV_PREFIX: &str = "FXRATE";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A source could not be read or deserialized.
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    /// A loaded value is out of range.
    #[error("invalid configuration for {field}: {reason}")]
    Invalid {
        /// Dotted path of the offending field.
        field: String,
        /// What is wrong with it.
        reason: String,
    },
}

impl ConfigError {
    fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP listener.
    pub server: ServerConfig,
    /// Log output.
    pub logging: LoggingConfig,
    /// Rate providers.
    pub providers: ProvidersConfig,
}

/// HTTP listener settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind host.
    pub host: String,
    /// Bind port.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl ServerConfig {
    /// Returns `host:port`.
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Log output settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct LoggingConfig {
    /// Emit JSON lines instead of human-readable output.
    pub json: bool,
}

/// The three provider slots, in registration order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProvidersConfig {
    /// Flat JSON provider.
    pub flat_json: ProviderSettings,
    /// XML document provider.
    pub xml_document: ProviderSettings,
    /// Nested JSON provider.
    pub nested_json: ProviderSettings,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            flat_json: ProviderSettings {
                name: "API1".to_string(),
                base_url: "http://localhost:8081".to_string(),
                timeout_ms: 2000,
                max_retries: 2,
                circuit_breaker: Some(BreakerSettings::default()),
                ..ProviderSettings::default()
            },
            xml_document: ProviderSettings {
                name: "API2".to_string(),
                base_url: "http://localhost:8082".to_string(),
                timeout_ms: 3000,
                max_retries: 3,
                ..ProviderSettings::default()
            },
            nested_json: ProviderSettings {
                name: "API3".to_string(),
                base_url: "http://localhost:8083".to_string(),
                timeout_ms: 2000,
                max_retries: 2,
                fallback: true,
                ..ProviderSettings::default()
            },
        }
    }
}

impl ProvidersConfig {
    /// Iterates `(config key, settings)` in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &ProviderSettings)> {
        [
            ("flat_json", &self.flat_json),
            ("xml_document", &self.xml_document),
            ("nested_json", &self.nested_json),
        ]
        .into_iter()
    }
}

/// Per-provider settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderSettings {
    /// Provider name reported in results.
    pub name: String,
    /// Whether the provider is registered.
    pub enabled: bool,
    /// Base URL of the remote service.
    pub base_url: String,
    /// Per-attempt timeout.
    pub timeout_ms: u64,
    /// Additional attempts after the first.
    pub max_retries: u32,
    /// Fixed delay between attempts.
    pub retry_delay_ms: u64,
    /// Circuit breaker, if any.
    pub circuit_breaker: Option<BreakerSettings>,
    /// Degrade failures to an invalid outcome.
    pub fallback: bool,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            name: String::new(),
            enabled: true,
            base_url: String::new(),
            timeout_ms: 2000,
            max_retries: 2,
            retry_delay_ms: 500,
            circuit_breaker: None,
            fallback: false,
        }
    }
}

impl ProviderSettings {
    /// Per-attempt timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Delay between attempts.
    #[must_use]
    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }
}

/// Circuit breaker settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BreakerSettings {
    /// Rolling window size.
    pub request_volume_threshold: usize,
    /// Failure ratio that opens the breaker.
    pub failure_ratio: f64,
    /// Time spent open before a trial call.
    pub open_delay_ms: u64,
}

impl Default for BreakerSettings {
    fn default() -> Self {
        let defaults = CircuitBreakerConfig::default();
        Self {
            request_volume_threshold: defaults.request_volume_threshold,
            failure_ratio: defaults.failure_ratio,
            open_delay_ms: u64::try_from(defaults.open_delay.as_millis()).unwrap_or(u64::MAX),
        }
    }
}

impl From<&BreakerSettings> for CircuitBreakerConfig {
    fn from(settings: &BreakerSettings) -> Self {
        CircuitBreakerConfig::default()
            .with_request_volume_threshold(settings.request_volume_threshold)
            .with_failure_ratio(settings.failure_ratio)
            .with_open_delay(Duration::from_millis(settings.open_delay_ms))
    }
}

impl AppConfig {
    /// Loads configuration from all layered sources and validates it.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Load` if a source is malformed and
    /// `ConfigError::Invalid` if a value is out of range.
    pub fn load() -> Result<Self, ConfigError> {
        let mut builder = config::Config::builder()
            .add_source(config::Config::try_from(&AppConfig::default())?)
            .add_source(config::File::with_name("config/default").required(false));

        if let Ok(path) = std::env::var(CONFIG_FILE_ENV) {
            builder = builder.add_source(config::File::with_name(&path).required(true));
        }

        let loaded: AppConfig = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        loaded.validate()?;
        Ok(loaded)
    }

    /// Checks value ranges.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (key, settings) in self.providers.iter() {
            let field = |name: &str| format!("providers.{}.{}", key, name);

            if !settings.enabled {
                continue;
            }
            if settings.name.trim().is_empty() {
                return Err(ConfigError::invalid(field("name"), "must not be empty"));
            }
            if settings.base_url.trim().is_empty() {
                return Err(ConfigError::invalid(field("base_url"), "must not be empty"));
            }
            if settings.timeout_ms == 0 {
                return Err(ConfigError::invalid(field("timeout_ms"), "must be positive"));
            }
            if let Some(breaker) = &settings.circuit_breaker {
                if breaker.request_volume_threshold == 0 {
                    return Err(ConfigError::invalid(
                        field("circuit_breaker.request_volume_threshold"),
                        "must be positive",
                    ));
                }
                if !(breaker.failure_ratio > 0.0 && breaker.failure_ratio <= 1.0) {
                    return Err(ConfigError::invalid(
                        field("circuit_breaker.failure_ratio"),
                        format!("{} is outside (0, 1]", breaker.failure_ratio),
                    ));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_provider_policies() {
        let config = AppConfig::default();
        let providers = &config.providers;

        assert_eq!(providers.flat_json.name, "API1");
        assert_eq!(providers.flat_json.timeout_ms, 2000);
        assert_eq!(providers.flat_json.max_retries, 2);
        assert!(providers.flat_json.circuit_breaker.is_some());
        assert!(!providers.flat_json.fallback);

        assert_eq!(providers.xml_document.name, "API2");
        assert_eq!(providers.xml_document.timeout_ms, 3000);
        assert_eq!(providers.xml_document.max_retries, 3);
        assert!(providers.xml_document.circuit_breaker.is_none());

        assert_eq!(providers.nested_json.name, "API3");
        assert!(providers.nested_json.fallback);
        assert_eq!(providers.nested_json.retry_delay(), Duration::from_millis(500));

        assert!(config.validate().is_ok());
    }

    #[test]
    fn iterates_in_registration_order() {
        let config = ProvidersConfig::default();
        let names: Vec<_> = config.iter().map(|(_, s)| s.name.as_str()).collect();
        assert_eq!(names, vec!["API1", "API2", "API3"]);
    }

    #[test]
    fn breaker_settings_convert() {
        let settings = BreakerSettings {
            request_volume_threshold: 10,
            failure_ratio: 0.25,
            open_delay_ms: 5000,
        };
        let config = CircuitBreakerConfig::from(&settings);
        assert_eq!(config.request_volume_threshold, 10);
        assert!((config.failure_ratio - 0.25).abs() < f64::EPSILON);
        assert_eq!(config.open_delay, Duration::from_secs(5));
        assert_eq!(BreakerSettings::default().open_delay_ms, 1000);
    }

    #[test]
    fn rejects_zero_timeout() {
        let mut config = AppConfig::default();
        config.providers.xml_document.timeout_ms = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("providers.xml_document.timeout_ms"));
    }

    #[test]
    fn rejects_bad_failure_ratio() {
        let mut config = AppConfig::default();
        if let Some(breaker) = config.providers.flat_json.circuit_breaker.as_mut() {
            breaker.failure_ratio = 1.5;
        }
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field, .. }) if field.ends_with("failure_ratio")
        ));
    }

    #[test]
    fn rejects_zero_volume_threshold() {
        let mut config = AppConfig::default();
        if let Some(breaker) = config.providers.flat_json.circuit_breaker.as_mut() {
            breaker.request_volume_threshold = 0;
        }
        assert!(config.validate().is_err());
    }

    #[test]
    fn disabled_provider_is_not_validated() {
        let mut config = AppConfig::default();
        config.providers.nested_json.enabled = false;
        config.providers.nested_json.base_url.clear();
        assert!(config.validate().is_ok());

        config.providers.nested_json.enabled = true;
        assert!(config.validate().is_err());
    }

    #[test]
    fn bind_address_joins_host_and_port() {
        let server = ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 9000,
        };
        assert_eq!(server.bind_address(), "127.0.0.1:9000");
    }
}
