//! # App Error Type
//!
//! One error for the orchestration layer, wrapping each lower crate.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  CoreError ────────┐                                                    │
//! │  SessionError ─────┼──► AppError ──► caller / status message            │
//! │  LookupError ──────┤                                                    │
//! │  io / toml ────────┘    ConfigLoad, ConfigSave, InvalidConfig           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

use scanlist_core::CoreError;
use scanlist_lookup::LookupError;
use scanlist_session::SessionError;

/// Result type alias for app operations.
pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    // =========================================================================
    // Configuration Errors
    // =========================================================================
    #[error("Failed to load config: {0}")]
    ConfigLoad(String),

    #[error("Failed to save config: {0}")]
    ConfigSave(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // =========================================================================
    // Layer Errors
    // =========================================================================
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Lookup(#[from] LookupError),
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::ConfigLoad(err.to_string())
    }
}

impl From<toml::de::Error> for AppError {
    fn from(err: toml::de::Error) -> Self {
        AppError::ConfigLoad(err.to_string())
    }
}

impl From<toml::ser::Error> for AppError {
    fn from(err: toml::ser::Error) -> Self {
        AppError::ConfigSave(err.to_string())
    }
}

impl AppError {
    /// Configuration problems are fixed by editing the file or environment.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            AppError::ConfigLoad(_)
                | AppError::ConfigSave(_)
                | AppError::InvalidConfig(_)
                | AppError::Session(SessionError::InvalidConfig(_))
                | AppError::Lookup(LookupError::InvalidConfig(_))
        )
    }
}
