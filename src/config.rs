//! # Probe Configuration
//!
//! Configuration management for the check library and plugin binary.
//! Supports config files and environment variables; command-line flags are
//! applied on top by the binary.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{ProbeError, ProbeResult};

/// Default per-request timeout, independent of the outer check timeout
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 3000;

/// Default outer check timeout
pub const DEFAULT_CHECK_TIMEOUT_SECS: u64 = 10;

/// Probe configuration for the Kafka Connect transport and check harness
///
/// # Examples
///
/// ```rust
/// use check_kafka_connector::config::ProbeConfig;
///
/// let config = ProbeConfig::default();
/// assert_eq!(config.transport.scheme, "http");
/// assert_eq!(config.transport.request_timeout_ms, 3000);
/// assert_eq!(config.check.timeout_secs, 10);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
    /// HTTP transport settings
    pub transport: TransportConfig,
    /// Plugin harness settings
    pub check: CheckConfig,
}

/// Kafka Connect transport configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransportConfig {
    /// Scheme prepended to candidate URLs that carry none
    pub scheme: String,
    /// Request timeout in milliseconds
    pub request_timeout_ms: u64,
    /// Override for the User-Agent header
    pub user_agent: Option<String>,
}

/// Plugin harness configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckConfig {
    /// Outer invocation timeout in seconds
    pub timeout_secs: u64,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            scheme: "http".to_string(),
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
            user_agent: None,
        }
    }
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_CHECK_TIMEOUT_SECS,
        }
    }
}

impl ProbeConfig {
    /// Load configuration from an optional explicit file, discovered files and
    /// environment variables
    ///
    /// Precedence (highest to lowest):
    /// 1. Environment variables
    /// 2. Explicit config file, or the first discovered one
    /// 3. Default values
    ///
    /// An explicit file that cannot be read is an error; a discovered one is
    /// skipped.
    pub fn load(explicit: Option<&Path>) -> ProbeResult<Self> {
        let mut config = match explicit {
            Some(path) => {
                debug!("Loading config from: {}", path.display());
                Self::load_from_file(path)?
            }
            None => match Self::find_config_file() {
                Some(path) => {
                    debug!("Loading config from: {}", path.display());
                    Self::load_from_file(&path).unwrap_or_else(|e| {
                        debug!("Failed to load config file: {}", e);
                        Self::default()
                    })
                }
                None => Self::default(),
            },
        };

        config.apply_env_overrides();
        config.validate()?;

        debug!("Loaded probe configuration: {:?}", config);
        Ok(config)
    }

    /// Load configuration from specific file
    pub fn load_from_file(path: &Path) -> ProbeResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ProbeError::config_error(format!("Failed to read config file: {}", e)))?;

        toml::from_str(&content)
            .map_err(|e| ProbeError::config_error(format!("Failed to parse config file: {}", e)))
    }

    /// Find the config file in standard locations
    fn find_config_file() -> Option<PathBuf> {
        let mut possible_paths = vec![PathBuf::from("./check-kafka-connector.toml")];
        if let Some(config_dir) = dirs::config_dir() {
            possible_paths.push(config_dir.join("check-kafka-connector").join("config.toml"));
        }

        possible_paths
            .into_iter()
            .find(|path| path.exists() && path.is_file())
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) {
        if let Ok(scheme) = std::env::var("KAFKA_CONNECT_SCHEME") {
            self.transport.scheme = scheme;
        }
        if let Ok(timeout) = std::env::var("KAFKA_CONNECT_REQUEST_TIMEOUT_MS") {
            if let Ok(timeout_ms) = timeout.parse() {
                self.transport.request_timeout_ms = timeout_ms;
            }
        }
        if let Ok(timeout) = std::env::var("KAFKA_CONNECT_CHECK_TIMEOUT") {
            if let Ok(timeout_secs) = timeout.parse() {
                self.check.timeout_secs = timeout_secs;
            }
        }
    }

    fn validate(&self) -> ProbeResult<()> {
        match self.transport.scheme.as_str() {
            "http" | "https" => {}
            other => {
                return Err(ProbeError::config_error(format!(
                    "Unsupported scheme '{}', expected http or https",
                    other
                )))
            }
        }
        if self.transport.request_timeout_ms == 0 {
            return Err(ProbeError::config_error(
                "request_timeout_ms must be greater than zero",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::TempDir;

    fn clear_env() {
        std::env::remove_var("KAFKA_CONNECT_SCHEME");
        std::env::remove_var("KAFKA_CONNECT_REQUEST_TIMEOUT_MS");
        std::env::remove_var("KAFKA_CONNECT_CHECK_TIMEOUT");
    }

    #[test]
    fn test_default_config() {
        let config = ProbeConfig::default();
        assert_eq!(config.transport.scheme, "http");
        assert_eq!(config.transport.request_timeout_ms, 3000);
        assert!(config.transport.user_agent.is_none());
        assert_eq!(config.check.timeout_secs, 10);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("probe.toml");
        std::fs::write(&config_path, "[transport]\nrequest_timeout_ms = 1500\n").unwrap();

        let config = ProbeConfig::load_from_file(&config_path).unwrap();
        assert_eq!(config.transport.request_timeout_ms, 1500);
        assert_eq!(config.transport.scheme, "http");
        assert_eq!(config.check.timeout_secs, 10);
    }

    #[test]
    fn test_unparseable_file_is_config_error() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("broken.toml");
        std::fs::write(&config_path, "[transport\nscheme = ").unwrap();

        let err = ProbeConfig::load_from_file(&config_path).unwrap_err();
        assert!(matches!(err, ProbeError::ConfigError(_)));
    }

    #[test]
    #[serial]
    fn test_explicit_missing_file_fails() {
        clear_env();
        let temp_dir = TempDir::new().unwrap();
        let result = ProbeConfig::load(Some(&temp_dir.path().join("absent.toml")));
        assert!(result.is_err());
    }

    #[test]
    #[serial]
    fn test_env_overrides_file_values() {
        clear_env();
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("probe.toml");
        std::fs::write(
            &config_path,
            "[transport]\nscheme = \"http\"\nrequest_timeout_ms = 1500\n\n[check]\ntimeout_secs = 20\n",
        )
        .unwrap();

        std::env::set_var("KAFKA_CONNECT_SCHEME", "https");
        std::env::set_var("KAFKA_CONNECT_CHECK_TIMEOUT", "5");
        std::env::set_var("KAFKA_CONNECT_REQUEST_TIMEOUT_MS", "not-a-number");
        let config = ProbeConfig::load(Some(&config_path));
        clear_env();

        let config = config.unwrap();
        assert_eq!(config.transport.scheme, "https");
        assert_eq!(config.transport.request_timeout_ms, 1500);
        assert_eq!(config.check.timeout_secs, 5);
    }

    #[test]
    #[serial]
    fn test_unsupported_scheme_rejected() {
        clear_env();
        std::env::set_var("KAFKA_CONNECT_SCHEME", "ftp");
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("probe.toml");
        std::fs::write(&config_path, "").unwrap();
        let result = ProbeConfig::load(Some(&config_path));
        clear_env();

        assert!(matches!(result, Err(ProbeError::ConfigError(_))));
    }
}
