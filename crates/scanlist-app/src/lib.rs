//! # scanlist-app: Orchestration
//!
//! Connects the scan session to product resolution and owns the list.
//!
//! ## Wiring
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  AppConfig::load ──► SessionConfig ──► ScanSessionManager::new          │
//! │        │                                        │                      │
//! │        │                                        ▼ events               │
//! │        ├──► LookupConfig ──► UpcLookupClient ──► ScannerApp::spawn_ingest│
//! │        │                                        │                      │
//! │        └──► UiConfig (message TTL, manual lock) ┘                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//! ```rust,no_run
//! # async fn run(decoder: std::sync::Arc<dyn scanlist_session::DecoderAdapter>) -> scanlist_app::AppResult<()> {
//! use std::sync::Arc;
//! use scanlist_app::{AppConfig, ScannerApp};
//! use scanlist_lookup::UpcLookupClient;
//! use scanlist_session::ScanSessionManager;
//!
//! scanlist_app::init_tracing();
//! let config = AppConfig::load(None)?;
//!
//! let (session, events) = ScanSessionManager::new(decoder, config.session.clone());
//! let app = Arc::new(ScannerApp::new(UpcLookupClient::new(config.lookup.clone())?, config.ui.clone()));
//! let _ingest = app.spawn_ingest(events);
//!
//! session.start(None, true).await?;
//! # Ok(())
//! # }
//! ```

pub mod app;
pub mod config;
pub mod error;

pub use app::{
    ManualEntryOutcome, MessageKind, ScanOutcome, ScannerApp, StatusMessage, MSG_EXPORT_EMPTY,
    MSG_LOOKUP_FAILED, MSG_NOT_FOUND,
};
pub use config::{AppConfig, UiConfig};
pub use error::{AppError, AppResult};

use tracing_subscriber::EnvFilter;

/// Installs the global fmt subscriber.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=scanlist_session=trace` - Include decoder frame noise
/// - Default: `info,scanlist=debug`
///
/// Later calls leave the first subscriber in place.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,scanlist=debug"));

    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_tracing_twice() {
        init_tracing();
        init_tracing();
    }
}
