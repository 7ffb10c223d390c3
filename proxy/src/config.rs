//! Startup configuration.
//!
//! Read once from the environment in `main` and passed down by value; nothing
//! below this module looks at process environment.

use std::net::SocketAddr;
use std::time::Duration;

use thiserror::Error;

pub const DEFAULT_PORT: u16 = 5050;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Upstream base URL without a trailing slash.
    pub upstream_host: String,
    pub listen_addr: SocketAddr,
    pub upstream_timeout: Duration,
    pub log_level: String,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("ACC_API_HOST must be set to the upstream base URL")]
    MissingUpstreamHost,

    #[error("PORT is not a valid port number: {0:?}")]
    InvalidPort(String),

    #[error("ACC_API_TIMEOUT_SECS must be a positive number of seconds: {0:?}")]
    InvalidTimeout(String),
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let upstream_host = lookup("ACC_API_HOST")
            .map(|host| host.trim().trim_end_matches('/').to_string())
            .filter(|host| !host.is_empty())
            .ok_or(ConfigError::MissingUpstreamHost)?;

        let port = match lookup("PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidPort(raw))?,
            None => DEFAULT_PORT,
        };

        let timeout_secs = match lookup("ACC_API_TIMEOUT_SECS") {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => secs,
                _ => return Err(ConfigError::InvalidTimeout(raw)),
            },
            None => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Config {
            upstream_host,
            listen_addr: SocketAddr::from(([0, 0, 0, 0], port)),
            upstream_timeout: Duration::from_secs(timeout_secs),
            log_level: lookup("RUST_LOG").unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_only_host_is_set() {
        let config = Config::from_lookup(lookup(&[("ACC_API_HOST", "http://upstream:8080/")])).unwrap();
        assert_eq!(config.upstream_host, "http://upstream:8080");
        assert_eq!(config.listen_addr.port(), DEFAULT_PORT);
        assert_eq!(config.upstream_timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn missing_or_blank_host_fails_fast() {
        assert_eq!(
            Config::from_lookup(lookup(&[])).unwrap_err(),
            ConfigError::MissingUpstreamHost
        );
        assert_eq!(
            Config::from_lookup(lookup(&[("ACC_API_HOST", "   ")])).unwrap_err(),
            ConfigError::MissingUpstreamHost
        );
    }

    #[test]
    fn overrides_are_parsed() {
        let config = Config::from_lookup(lookup(&[
            ("ACC_API_HOST", "http://upstream"),
            ("PORT", "6000"),
            ("ACC_API_TIMEOUT_SECS", "5"),
            ("RUST_LOG", "debug"),
        ]))
        .unwrap();
        assert_eq!(config.listen_addr.port(), 6000);
        assert_eq!(config.upstream_timeout, Duration::from_secs(5));
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn bad_numbers_are_rejected() {
        let err = Config::from_lookup(lookup(&[("ACC_API_HOST", "http://u"), ("PORT", "http")]))
            .unwrap_err();
        assert_eq!(err, ConfigError::InvalidPort("http".to_string()));

        let err = Config::from_lookup(lookup(&[
            ("ACC_API_HOST", "http://u"),
            ("ACC_API_TIMEOUT_SECS", "0"),
        ]))
        .unwrap_err();
        assert_eq!(err, ConfigError::InvalidTimeout("0".to_string()));
    }
}
