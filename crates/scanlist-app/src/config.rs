//! # App Configuration
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     SCANLIST_LOOKUP_URL        SCANLIST_LOOKUP_TOKEN                     │
//! │     SCANLIST_LOOKUP_TIMEOUT_SECS  SCANLIST_LOOKUP_MAX_RETRIES            │
//! │     SCANLIST_DEDUP_WINDOW_MS   SCANLIST_VIDEO_TIMEOUT_MS                 │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/scanlist/scanlist.toml (Linux)                           │
//! │     ~/Library/Application Support/com.scanlist.scanlist/ (macOS)       │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [session]
//! dedup_window_ms = 3000
//! video_timeout_ms = 4000
//!
//! [lookup]
//! endpoint = "https://api.upcitemdb.com/prod/trial/lookup"
//! api_token = "..."
//!
//! [ui]
//! message_ttl_secs = 5
//! lock_manual_entry_while_scanning = true
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info, warn};

use scanlist_lookup::LookupConfig;
use scanlist_session::SessionConfig;

use crate::error::{AppError, AppResult};

// =============================================================================
// UI Settings
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UiConfig {
    /// How long a status message stays visible (seconds).
    #[serde(default = "default_message_ttl")]
    pub message_ttl_secs: u64,

    /// Refuse typed codes while the camera session is active.
    #[serde(default = "default_lock_manual_entry")]
    pub lock_manual_entry_while_scanning: bool,
}

fn default_message_ttl() -> u64 {
    5
}

fn default_lock_manual_entry() -> bool {
    true
}

impl Default for UiConfig {
    fn default() -> Self {
        UiConfig {
            message_ttl_secs: default_message_ttl(),
            lock_manual_entry_while_scanning: default_lock_manual_entry(),
        }
    }
}

impl UiConfig {
    pub fn message_ttl(&self) -> Duration {
        Duration::from_secs(self.message_ttl_secs)
    }
}

// =============================================================================
// App Configuration
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub session: SessionConfig,

    #[serde(default)]
    pub lookup: LookupConfig,

    #[serde(default)]
    pub ui: UiConfig,
}

impl AppConfig {
    /// Loads configuration from file and environment.
    ///
    /// Falls back to [`default_config_path`](Self::default_config_path) when
    /// no path is given. A missing file means defaults.
    pub fn load(config_path: Option<PathBuf>) -> AppResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load config: {}. Using defaults.", e);
            Self::default()
        })
    }

    pub fn save(&self, config_path: Option<PathBuf>) -> AppResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| AppError::ConfigSave("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| AppError::ConfigSave(e.to_string()))?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents).map_err(|e| AppError::ConfigSave(e.to_string()))?;

        info!(?path, "Config saved");
        Ok(())
    }

    pub fn validate(&self) -> AppResult<()> {
        self.session.validate()?;
        self.lookup.validate()?;

        if self.ui.message_ttl_secs == 0 {
            return Err(AppError::InvalidConfig(
                "message_ttl_secs must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applies `SCANLIST_*` overrides read through `var`.
    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(url) = var("SCANLIST_LOOKUP_URL") {
            debug!(url = %url, "Overriding lookup endpoint from environment");
            self.lookup.endpoint = url;
        }

        if let Some(token) = var("SCANLIST_LOOKUP_TOKEN") {
            debug!("Overriding lookup token from environment");
            self.lookup.api_token = token;
        }

        if let Some(secs) = parse_var(&var, "SCANLIST_LOOKUP_TIMEOUT_SECS") {
            self.lookup.timeout_secs = secs;
        }

        if let Some(retries) = parse_var(&var, "SCANLIST_LOOKUP_MAX_RETRIES") {
            self.lookup.max_retries = retries;
        }

        if let Some(ms) = parse_var(&var, "SCANLIST_DEDUP_WINDOW_MS") {
            debug!(ms, "Overriding dedup window from environment");
            self.session.dedup_window_ms = ms;
        }

        if let Some(ms) = parse_var(&var, "SCANLIST_VIDEO_TIMEOUT_MS") {
            self.session.video_timeout_ms = ms;
        }
    }

    /// `<config dir>/scanlist.toml` for the current platform.
    pub fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "scanlist", "scanlist")
            .map(|dirs| dirs.config_dir().join("scanlist.toml"))
    }
}

fn parse_var<T: FromStr>(var: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    let raw = var(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(key, value = %raw, "Ignoring unparsable environment override");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.ui.message_ttl(), Duration::from_secs(5));
        assert!(config.ui.lock_manual_entry_while_scanning);
        assert_eq!(config.session.dedup_window_ms, 3000);
        assert_eq!(config.lookup.max_retries, 2);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [lookup]
            api_token = "abc"

            [ui]
            message_ttl_secs = 8
            "#,
        )
        .unwrap();

        assert_eq!(config.lookup.api_token, "abc");
        assert_eq!(config.lookup.timeout_secs, 10);
        assert_eq!(config.ui.message_ttl_secs, 8);
        assert!(config.ui.lock_manual_entry_while_scanning);
        assert_eq!(config.session, SessionConfig::default());
    }

    #[test]
    fn test_env_overrides() {
        let mut config = AppConfig::default();
        config.apply_overrides(env(&[
            ("SCANLIST_LOOKUP_URL", "http://localhost:9000/lookup"),
            ("SCANLIST_LOOKUP_TOKEN", "secret"),
            ("SCANLIST_LOOKUP_MAX_RETRIES", "0"),
            ("SCANLIST_DEDUP_WINDOW_MS", "1500"),
            ("SCANLIST_VIDEO_TIMEOUT_MS", "not-a-number"),
        ]));

        assert_eq!(config.lookup.endpoint, "http://localhost:9000/lookup");
        assert_eq!(config.lookup.api_token, "secret");
        assert_eq!(config.lookup.max_retries, 0);
        assert_eq!(config.session.dedup_window_ms, 1500);
        assert_eq!(config.session.video_timeout_ms, 4000);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("scanlist.toml");

        let mut config = AppConfig::default();
        config.ui.message_ttl_secs = 3;
        config.session.require_retail_length = true;
        config.save(Some(path.clone())).unwrap();

        let loaded: AppConfig =
            toml::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scanlist.toml");
        std::fs::write(&path, "[ui]\nmessage_ttl_secs = 0\n").unwrap();

        let err = AppConfig::load(Some(path.clone())).unwrap_err();
        assert!(err.is_config_error());

        let fallback = AppConfig::load_or_default(Some(path));
        assert_eq!(fallback.ui.message_ttl_secs, 5);
    }

    #[test]
    fn test_missing_file_means_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config: AppConfig = AppConfig::load_or_default(Some(dir.path().join("absent.toml")));
        assert_eq!(config.ui, UiConfig::default());
    }
}
