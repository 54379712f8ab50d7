//! Configuration management for the todo-sync binary.
//!
//! Loads configuration from environment variables with sensible defaults:
//!
//! | Variable                     | Default                 |
//! |------------------------------|-------------------------|
//! | `TODO_API_URL`               | `http://localhost:3000` |
//! | `TODO_LOG_LEVEL`             | `info`                  |
//! | `TODO_METRICS_ADDR`          | unset (no exporter)     |
//! | `TODO_SHUTDOWN_TIMEOUT_SECS` | `5`                     |

use std::env;
use std::net::SocketAddr;
use std::time::Duration;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// Default base URL of the todo collection
pub const DEFAULT_API_URL: &str = "http://localhost:3000";

/// Invalid configuration value
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// `TODO_API_URL` is not an http(s) URL
    #[error("TODO_API_URL must start with http:// or https://, got {0:?}")]
    InvalidApiUrl(String),

    /// `TODO_LOG_LEVEL` is not a valid filter directive
    #[error("TODO_LOG_LEVEL is not a valid log filter: {0}")]
    InvalidLogLevel(String),

    /// `TODO_METRICS_ADDR` is not a socket address
    #[error("TODO_METRICS_ADDR must be host:port, got {0:?}")]
    InvalidMetricsAddr(String),

    /// `TODO_SHUTDOWN_TIMEOUT_SECS` is not a whole number of seconds
    #[error("TODO_SHUTDOWN_TIMEOUT_SECS must be a whole number, got {0:?}")]
    InvalidShutdownTimeout(String),
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Base URL of the todo collection
    pub api_url: String,
    /// Log filter used when `RUST_LOG` is unset
    pub log_level: String,
    /// Prometheus exporter address, if metrics should be served
    pub metrics_addr: Option<SocketAddr>,
    /// How long shutdown waits for in-flight effects
    pub shutdown_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            log_level: "info".to_string(),
            metrics_addr: None,
            shutdown_timeout: Duration::from_secs(5),
        }
    }
}

impl Config {
    /// Load configuration from the process environment
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] naming the first invalid variable.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through `lookup`, which maps a variable name to its value
    ///
    /// Blank values count as unset.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] naming the first invalid variable.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let defaults = Self::default();

        let api_url = get("TODO_API_URL").unwrap_or(defaults.api_url);
        if !(api_url.starts_with("http://") || api_url.starts_with("https://")) {
            return Err(ConfigError::InvalidApiUrl(api_url));
        }

        let log_level = get("TODO_LOG_LEVEL").unwrap_or(defaults.log_level);
        EnvFilter::try_new(&log_level).map_err(|e| ConfigError::InvalidLogLevel(e.to_string()))?;

        let metrics_addr = get("TODO_METRICS_ADDR")
            .map(|value| {
                value
                    .parse::<SocketAddr>()
                    .map_err(|_| ConfigError::InvalidMetricsAddr(value))
            })
            .transpose()?;

        let shutdown_timeout = match get("TODO_SHUTDOWN_TIMEOUT_SECS") {
            Some(value) => value
                .parse::<u64>()
                .map(Duration::from_secs)
                .map_err(|_| ConfigError::InvalidShutdownTimeout(value))?,
            None => defaults.shutdown_timeout,
        };

        Ok(Self {
            api_url,
            log_level,
            metrics_addr,
            shutdown_timeout,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        assert_eq!(load(&[]).unwrap(), Config::default());
    }

    #[test]
    fn reads_every_variable() {
        let config = load(&[
            ("TODO_API_URL", "https://todos.example.com"),
            ("TODO_LOG_LEVEL", "debug,todo_sync=trace"),
            ("TODO_METRICS_ADDR", "127.0.0.1:9090"),
            ("TODO_SHUTDOWN_TIMEOUT_SECS", "12"),
        ])
        .unwrap();

        assert_eq!(config.api_url, "https://todos.example.com");
        assert_eq!(config.log_level, "debug,todo_sync=trace");
        assert_eq!(config.metrics_addr, Some("127.0.0.1:9090".parse().unwrap()));
        assert_eq!(config.shutdown_timeout, Duration::from_secs(12));
    }

    #[test]
    fn blank_values_fall_back_to_defaults() {
        let config = load(&[("TODO_API_URL", "  "), ("TODO_METRICS_ADDR", "")]).unwrap();
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.metrics_addr, None);
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert_eq!(
            load(&[("TODO_API_URL", "localhost:3000")]),
            Err(ConfigError::InvalidApiUrl("localhost:3000".to_string()))
        );
        assert_eq!(
            load(&[("TODO_METRICS_ADDR", "nine-thousand")]),
            Err(ConfigError::InvalidMetricsAddr("nine-thousand".to_string()))
        );
        assert_eq!(
            load(&[("TODO_SHUTDOWN_TIMEOUT_SECS", "soon")]),
            Err(ConfigError::InvalidShutdownTimeout("soon".to_string()))
        );
    }
}
