//! Configuration module for the sign-in gateway
//!
//! Provides layered configuration loading from files, environment variables, and defaults.
//!
//! # Configuration Precedence
//!
//! 1. CLI arguments (highest priority)
//! 2. Environment variables (`SSO_*`)
//! 3. Configuration file (TOML)
//! 4. Default values (lowest priority)
//!
//! # Example
//!
//! ```rust
//! use sso::config::SsoConfig;
//!
//! let config = SsoConfig::default();
//! assert_eq!(config.session.ttl_seconds, 3600);
//!
//! let toml = r#"
//! [session]
//! ttl_seconds = 900
//! "#;
//! let config: SsoConfig = toml::from_str(toml).unwrap();
//! assert_eq!(config.session.ttl_seconds, 900);
//! ```

pub mod error;
pub mod logging;
pub mod outage;
pub mod session;

pub use error::ConfigError;
pub use logging::{LogFormat, LoggingConfig};
pub use outage::OutageConfig;
pub use session::SessionConfig;

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Unified configuration for the sign-in gateway.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SsoConfig {
    /// Session settings
    pub session: SessionConfig,
    /// Identity registry outage detection
    pub outage: OutageConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

impl SsoConfig {
    /// Load configuration from a TOML file
    ///
    /// If path is None, returns default configuration.
    /// If path doesn't exist, returns NotFound error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => {
                if !p.exists() {
                    return Err(ConfigError::NotFound(p.to_path_buf()));
                }
                let content = std::fs::read_to_string(p).map_err(|source| ConfigError::Read {
                    path: p.to_path_buf(),
                    source,
                })?;
                toml::from_str(&content).map_err(|e| ConfigError::Parse {
                    path: p.to_path_buf(),
                    message: e.to_string(),
                })
            }
            None => Ok(Self::default()),
        }
    }

    /// Apply environment variable overrides
    ///
    /// Invalid values are ignored (previous values are kept).
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(level) = std::env::var("SSO_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("SSO_LOG_FORMAT") {
            if let Ok(f) = format.parse() {
                self.logging.format = f;
            }
        }
        if let Ok(ttl) = std::env::var("SSO_SESSION_TTL") {
            if let Ok(t) = ttl.parse() {
                self.session.ttl_seconds = t;
            }
        }

        self
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.session.ttl_seconds == 0 {
            return Err(ConfigError::Validation {
                field: "session.ttl_seconds".to_string(),
                message: "ttl must be non-zero".to_string(),
            });
        }
        self.logging.validate()?;
        if self.outage.failure_threshold == 0 {
            return Err(ConfigError::Validation {
                field: "outage.failure_threshold".to_string(),
                message: "threshold must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_sso_config_defaults() {
        let config = SsoConfig::default();
        assert_eq!(config.session.ttl_seconds, 3600);
        assert_eq!(config.outage.failure_threshold, 3);
        assert_eq!(config.logging.level, "info");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_parse_minimal_toml() {
        let toml = r#"
        [outage]
        failure_threshold = 5
        "#;

        let config: SsoConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.outage.failure_threshold, 5);
        assert_eq!(config.session.ttl_seconds, 3600); // Default
    }

    #[test]
    fn test_config_parse_example_toml() {
        let toml = include_str!("../../sso.example.toml");
        let config: SsoConfig = toml::from_str(toml).unwrap();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_load_from_file() {
        let temp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(temp.path(), "[session]\nttl_seconds = 120").unwrap();

        let config = SsoConfig::load(Some(temp.path())).unwrap();
        assert_eq!(config.session.ttl_seconds, 120);
    }

    #[test]
    fn test_config_missing_file_error() {
        let result = SsoConfig::load(Some(Path::new("/nonexistent/sso.toml")));
        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn test_config_invalid_toml_error() {
        let temp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(temp.path(), "[session\nttl_seconds = ").unwrap();

        let result = SsoConfig::load(Some(temp.path()));
        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_config_env_override_ttl() {
        std::env::set_var("SSO_SESSION_TTL", "900");
        let config = SsoConfig::default().with_env_overrides();
        std::env::remove_var("SSO_SESSION_TTL");

        assert_eq!(config.session.ttl_seconds, 900);
    }

    #[test]
    fn test_config_env_override_invalid_format_ignored() {
        std::env::set_var("SSO_LOG_FORMAT", "xml");
        let config = SsoConfig::default().with_env_overrides();
        std::env::remove_var("SSO_LOG_FORMAT");

        assert_eq!(config.logging.format, LogFormat::Pretty);
    }

    #[test]
    fn test_validate_rejects_zero_ttl() {
        let mut config = SsoConfig::default();
        config.session.ttl_seconds = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Validation { field, .. }) if field == "session.ttl_seconds"
        ));
    }

    #[test]
    fn test_validate_rejects_unknown_log_level() {
        let mut config = SsoConfig::default();
        config.logging.level = "verbose".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Validation { field, .. }) if field == "logging.level"
        ));
    }

    #[test]
    fn test_validate_rejects_zero_threshold() {
        let mut config = SsoConfig::default();
        config.outage.failure_threshold = 0;
        assert!(config.validate().is_err());
    }
}
