//! Application configuration
//!
//! Split into focused sub-modules:
//! - `server`: HTTP server settings
//! - `fault`: fault injection engine settings
//!
//! Logging settings live with the tracing setup in [`crate::telemetry`].

mod fault;
mod server;

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::telemetry::TelemetryConfig;

pub use fault::FaultAppConfig;
pub use server::ServerConfig;

/// Shared default for boolean `true` fields across config structs
pub(crate) const fn default_true() -> bool {
    true
}

/// Prefix for environment variable overrides
const ENV_PREFIX: &str = "FAULTLINE";

/// Application environment (development or production)
///
/// Controls whether internal error details are exposed in responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Development environment - error details exposed
    #[default]
    Development,
    /// Production environment - sanitized error responses
    Production,
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
        }
    }
}

impl std::str::FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Ok(Self::Development),
            "production" | "prod" => Ok(Self::Production),
            _ => Err(format!(
                "Invalid environment: {s}. Use 'development' or 'production'"
            )),
        }
    }
}

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application environment (development or production)
    #[serde(default)]
    pub environment: Option<Environment>,

    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Fault injection configuration
    #[serde(default)]
    pub fault: FaultAppConfig,

    /// Logging configuration
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    /// Load configuration from environment and optional file
    ///
    /// Sources in increasing priority: built-in defaults, `config.toml` in the
    /// working directory, `FAULTLINE_*` environment variables using `__` as
    /// the section separator (e.g. `FAULTLINE_SERVER__PORT=9090`).
    pub fn load() -> Result<Self, config::ConfigError> {
        let builder = Self::defaults()?
            // Load from file if exists
            .add_source(config::File::with_name("config").required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );

        builder.build()?.try_deserialize()
    }

    /// Load configuration from a TOML document layered over the defaults
    pub fn from_toml(document: &str) -> Result<Self, config::ConfigError> {
        Self::defaults()?
            .add_source(config::File::from_str(document, config::FileFormat::Toml))
            .build()?
            .try_deserialize()
    }

    /// Effective environment, defaulting to development
    pub fn environment(&self) -> Environment {
        self.environment.unwrap_or_default()
    }

    fn defaults() -> Result<config::ConfigBuilder<config::builder::DefaultState>, config::ConfigError>
    {
        config::Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080)?
            .set_default("fault.session_header", "request-id")?
            .set_default("fault.settings_header", "fault-settings")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::telemetry::LogFormat;

    #[test]
    fn environment_default_is_development() {
        assert_eq!(Environment::default(), Environment::Development);
        assert_eq!(AppConfig::default().environment(), Environment::Development);
    }

    #[test]
    fn environment_display() {
        assert_eq!(format!("{}", Environment::Development), "development");
        assert_eq!(format!("{}", Environment::Production), "production");
    }

    #[test]
    fn environment_from_str() {
        assert_eq!(
            "prod".parse::<Environment>().unwrap(),
            Environment::Production
        );
        assert_eq!(
            "DEVELOPMENT".parse::<Environment>().unwrap(),
            Environment::Development
        );
        assert!(
            "staging"
                .parse::<Environment>()
                .unwrap_err()
                .contains("Invalid environment")
        );
    }

    #[test]
    fn default_config_values() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.shutdown_timeout_secs, Some(30));
        assert!(config.fault.enabled);
        assert_eq!(config.fault.session_header, "request-id");
        assert_eq!(config.fault.settings_header, "fault-settings");
        assert_eq!(config.fault.marker_header, "Faults-Enabled");
        assert_eq!(config.fault.session_ttl_secs, 300);
        assert_eq!(config.fault.max_sessions, 10_000);
        assert_eq!(config.telemetry.log_format, LogFormat::Text);
    }

    #[test]
    fn from_toml_overrides_defaults() {
        let config = AppConfig::from_toml(
            r#"
            environment = "production"

            [server]
            port = 9090

            [fault]
            session_header = "x-session"
            session_ttl_secs = 30

            [telemetry]
            log_format = "json"
            "#,
        )
        .unwrap();

        assert_eq!(config.environment(), Environment::Production);
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.fault.session_header, "x-session");
        assert_eq!(config.fault.settings_header, "fault-settings");
        assert_eq!(config.fault.session_ttl().as_secs(), 30);
        assert_eq!(config.telemetry.log_format, LogFormat::Json);
    }

    #[test]
    fn from_toml_empty_document_uses_defaults() {
        let config = AppConfig::from_toml("").unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.fault.sweep_interval_secs, 60);
    }

    #[test]
    fn from_toml_rejects_wrong_types() {
        assert!(AppConfig::from_toml("[server]\nport = \"eighty\"").is_err());
    }

    #[test]
    fn bind_address_joins_host_and_port() {
        let config = ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 3000,
            shutdown_timeout_secs: None,
        };
        assert_eq!(config.bind_address(), "127.0.0.1:3000");
    }

    #[test]
    fn config_serialization_roundtrip() {
        let config = AppConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let parsed: AppConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.fault.marker_header, config.fault.marker_header);
    }
}
