use std::env;
use std::net::SocketAddr;
use std::time::Duration;

use anyhow::{Context, Result};

const DEFAULT_API_URL: &str = "https://api.worldbank.org/v2";
const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Runtime configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Base URL of the country data provider, without a trailing slash
    pub api_base_url: String,
    pub bind_addr: SocketAddr,
    /// Upper bound for each outbound provider call
    pub request_timeout: Duration,
}

impl AppConfig {
    /// Reads configuration from the environment, applying defaults for
    /// anything unset. Invalid values fail startup rather than surfacing
    /// at request time.
    pub fn from_env() -> Result<Self> {
        Self::build(
            env::var("WORLD_BANK_API_URL").ok(),
            env::var("BIND_ADDR").ok(),
            env::var("REQUEST_TIMEOUT_SECS").ok(),
        )
    }

    fn build(
        api_url: Option<String>,
        bind_addr: Option<String>,
        timeout_secs: Option<String>,
    ) -> Result<Self> {
        let api_base_url = api_url
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let bind_addr = bind_addr
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse::<SocketAddr>()
            .context("BIND_ADDR is not a valid socket address")?;

        let timeout_secs = match timeout_secs {
            Some(raw) => raw
                .parse::<u64>()
                .context("REQUEST_TIMEOUT_SECS is not a valid number of seconds")?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Self {
            api_base_url,
            bind_addr,
            request_timeout: Duration::from_secs(timeout_secs),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let config = AppConfig::build(None, None, None).unwrap();

        assert_eq!(config.api_base_url, "https://api.worldbank.org/v2");
        assert_eq!(config.bind_addr, "127.0.0.1:3000".parse().unwrap());
        assert_eq!(config.request_timeout, Duration::from_secs(30));
    }

    #[test]
    fn trailing_slash_is_stripped_from_api_url() {
        let config = AppConfig::build(
            Some("https://example.test/v2/".to_string()),
            None,
            None,
        )
        .unwrap();

        assert_eq!(config.api_base_url, "https://example.test/v2");
    }

    #[test]
    fn invalid_bind_addr_is_rejected() {
        let result = AppConfig::build(None, Some("not-an-address".to_string()), None);
        assert!(result.is_err());
    }

    #[test]
    fn invalid_timeout_is_rejected() {
        let result = AppConfig::build(None, None, Some("soon".to_string()));
        assert!(result.is_err());
    }

    #[test]
    fn explicit_timeout_is_used() {
        let config = AppConfig::build(None, None, Some("5".to_string())).unwrap();
        assert_eq!(config.request_timeout, Duration::from_secs(5));
    }
}
