//! Configuration for the admin tooling
//!
//! Defaults target the production API. Every value can be overridden from
//! the environment:
//!
//! | Variable | Field | Default |
//! |----------|-------|---------|
//! | `ACCESS_API_URL` | `api.base_url` | `https://file-system-black.vercel.app` |
//! | `ACCESS_API_TIMEOUT_SECS` | `api.timeout_secs` | `30` |
//! | `ACCESS_LOG_LEVEL` | `observability.log_level` | `info` |
//!
//! The bearer token is not configuration; it is read through a
//! [`CredentialSource`](folder_access_api::CredentialSource).
//!
//! # Example
//!
//! ```no_run
//! use folder_access_requests::config::AdminConfig;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AdminConfig::from_env()?;
//! println!("API: {}", config.api.base_url);
//! # Ok(())
//! # }
//! ```

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Default remote API
pub const DEFAULT_BASE_URL: &str = "https://file-system-black.vercel.app";

/// Configuration error
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A variable is set but cannot be parsed
    #[error("Failed to parse {var}: {value:?}")]
    ParseError {
        /// Variable name
        var: String,
        /// Raw value
        value: String,
    },
    /// Configuration validation failed
    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

/// Remote API configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL, without trailing slash
    pub base_url: String,
    /// Per-call timeout in seconds
    pub timeout_secs: u64,
}

impl ApiConfig {
    /// Validate API configuration
    ///
    /// # Errors
    ///
    /// Returns error if the URL is not http(s) or the timeout is zero
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(ConfigError::ValidationError(format!(
                "base_url must start with http:// or https://, got {:?}",
                self.base_url
            )));
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "timeout_secs must be > 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Get timeout as Duration
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 30,
        }
    }
}

/// Observability configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Default filter when `RUST_LOG` is unset
    pub log_level: String,
}

impl ObservabilityConfig {
    /// Validate observability configuration
    ///
    /// # Errors
    ///
    /// Returns error if log level is invalid
    pub fn validate(&self) -> Result<(), ConfigError> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.to_lowercase().as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "log_level must be one of: {valid_levels:?}"
            )));
        }
        Ok(())
    }
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Complete admin configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminConfig {
    /// Remote API
    pub api: ApiConfig,
    /// Logging
    pub observability: ObservabilityConfig,
}

impl AdminConfig {
    /// Load from process environment variables
    ///
    /// # Errors
    ///
    /// Returns error if a variable cannot be parsed or validation fails
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Load from an arbitrary variable lookup
    ///
    /// # Errors
    ///
    /// Returns error if a variable cannot be parsed or validation fails
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(url) = lookup("ACCESS_API_URL") {
            config.api.base_url = url.trim_end_matches('/').to_string();
        }
        if let Some(raw) = lookup("ACCESS_API_TIMEOUT_SECS") {
            config.api.timeout_secs =
                raw.trim().parse().map_err(|_| ConfigError::ParseError {
                    var: "ACCESS_API_TIMEOUT_SECS".to_string(),
                    value: raw.clone(),
                })?;
        }
        if let Some(level) = lookup("ACCESS_LOG_LEVEL") {
            config.observability.log_level = level;
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate entire configuration
    ///
    /// # Errors
    ///
    /// Returns error if any section is invalid
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.api.validate()?;
        self.observability.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |var| vars.get(var).cloned()
    }

    #[test]
    fn test_default_config_is_valid() {
        let config = AdminConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.api.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.api.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_overrides_from_lookup() {
        let config = AdminConfig::from_lookup(lookup(&[
            ("ACCESS_API_URL", "http://localhost:4000/"),
            ("ACCESS_API_TIMEOUT_SECS", "5"),
            ("ACCESS_LOG_LEVEL", "debug"),
        ]));

        assert_eq!(
            config,
            Ok(AdminConfig {
                api: ApiConfig {
                    base_url: "http://localhost:4000".to_string(),
                    timeout_secs: 5,
                },
                observability: ObservabilityConfig {
                    log_level: "debug".to_string(),
                },
            })
        );
    }

    #[test]
    fn test_unparseable_timeout() {
        let result = AdminConfig::from_lookup(lookup(&[("ACCESS_API_TIMEOUT_SECS", "soon")]));
        assert!(matches!(result, Err(ConfigError::ParseError { .. })));
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let mut config = AdminConfig::default();
        config.api.timeout_secs = 0;
        assert!(config.validate().is_err());

        let mut config = AdminConfig::default();
        config.api.base_url = "ftp://files".to_string();
        assert!(config.validate().is_err());

        let mut config = AdminConfig::default();
        config.observability.log_level = "loud".to_string();
        assert!(config.validate().is_err());
    }
}
