//! # Lookup Configuration
//!
//! ```toml
//! [lookup]
//! endpoint = "https://api.upcitemdb.com/prod/trial/lookup"
//! api_token = ""
//! timeout_secs = 10
//! connect_timeout_secs = 5
//! max_retries = 2
//! initial_backoff_ms = 250
//! max_backoff_secs = 2
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use url::Url;

use crate::error::{LookupError, LookupResult};

/// Remote lookup settings.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupConfig {
    /// Lookup URL; the barcode is sent as the `upc` query parameter.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Bearer credential. Sent only when non-empty.
    #[serde(default)]
    pub api_token: String,

    /// Whole-request timeout per attempt (seconds).
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    /// Retries after the first attempt, for transient failures only.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    #[serde(default = "default_initial_backoff")]
    pub initial_backoff_ms: u64,

    #[serde(default = "default_max_backoff")]
    pub max_backoff_secs: u64,
}

fn default_endpoint() -> String {
    "https://api.upcitemdb.com/prod/trial/lookup".to_string()
}
fn default_timeout() -> u64 {
    10
}
fn default_connect_timeout() -> u64 {
    5
}
fn default_max_retries() -> u32 {
    2
}
fn default_initial_backoff() -> u64 {
    250
}
fn default_max_backoff() -> u64 {
    2
}

impl Default for LookupConfig {
    fn default() -> Self {
        LookupConfig {
            endpoint: default_endpoint(),
            api_token: String::new(),
            timeout_secs: default_timeout(),
            connect_timeout_secs: default_connect_timeout(),
            max_retries: default_max_retries(),
            initial_backoff_ms: default_initial_backoff(),
            max_backoff_secs: default_max_backoff(),
        }
    }
}

/// Keeps the credential out of logs.
impl fmt::Debug for LookupConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LookupConfig")
            .field("endpoint", &self.endpoint)
            .field("api_token", &if self.api_token.is_empty() { "" } else { "***" })
            .field("timeout_secs", &self.timeout_secs)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .field("max_retries", &self.max_retries)
            .field("initial_backoff_ms", &self.initial_backoff_ms)
            .field("max_backoff_secs", &self.max_backoff_secs)
            .finish()
    }
}

impl LookupConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn initial_backoff(&self) -> Duration {
        Duration::from_millis(self.initial_backoff_ms)
    }

    pub fn max_backoff(&self) -> Duration {
        Duration::from_secs(self.max_backoff_secs)
    }

    /// Parses and checks the endpoint.
    pub fn endpoint_url(&self) -> LookupResult<Url> {
        let url = Url::parse(&self.endpoint)?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(LookupError::InvalidConfig(format!(
                "endpoint must use http or https, got: {}",
                other
            ))),
        }
    }

    pub fn validate(&self) -> LookupResult<()> {
        self.endpoint_url()?;

        if self.timeout_secs == 0 {
            return Err(LookupError::InvalidConfig(
                "timeout_secs must be greater than 0".into(),
            ));
        }

        if self.connect_timeout_secs == 0 {
            return Err(LookupError::InvalidConfig(
                "connect_timeout_secs must be greater than 0".into(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = LookupConfig::default();
        assert_eq!(config.timeout(), Duration::from_secs(10));
        assert_eq!(config.max_retries, 2);
        assert_eq!(config.initial_backoff(), Duration::from_millis(250));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation() {
        let mut config = LookupConfig::default();
        config.endpoint = "ftp://example.com/lookup".into();
        assert!(config.validate().is_err());

        config.endpoint = "not a url".into();
        assert!(matches!(config.validate(), Err(LookupError::InvalidConfig(_))));

        config.endpoint = "http://localhost:8080/lookup".into();
        assert!(config.validate().is_ok());

        config.timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_debug_redacts_token() {
        let config = LookupConfig {
            api_token: "secret-token".into(),
            ..Default::default()
        };
        let debug = format!("{:?}", config);
        assert!(!debug.contains("secret-token"));
        assert!(debug.contains("***"));
    }
}
