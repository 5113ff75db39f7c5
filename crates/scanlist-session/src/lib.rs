//! # scanlist-session: Scan Session Lifecycle
//!
//! Drives one camera scanning attempt at a time on top of a host-provided
//! barcode decoder.
//!
//! ## State Machine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   ┌──────┐  list_devices  ┌───────────────────┐  devices   ┌───────┐    │
//! │   │ Idle │ ─────────────► │ RequestingDevices │ ─────────► │ Ready │    │
//! │   └──┬───┘                └─────────┬─────────┘            └───┬───┘    │
//! │      │ ▲                   none /   │                          │        │
//! │      │ └──────────────────denied ───┘                    start │        │
//! │      │                                                         ▼        │
//! │      │  start (rear-facing hint)                          ┌────────┐    │
//! │      └──────────────────────────────────────────────────► │ Active │    │
//! │                                                           └───┬────┘    │
//! │   stop / one-shot decode / watchdog / stream end / teardown   │         │
//! │                                                               ▼         │
//! │                        ┌───────┐                        ┌──────────┐    │
//! │                        │ Ready │ ◄───── released ────── │ Stopping │    │
//! │                        └───────┘                        └──────────┘    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`decoder`] - The `DecoderAdapter` seam and its request/stream types
//! - [`session`] - `ScanSessionManager`, the lifecycle owner
//! - [`manual`] - Manual entry sharing the scan channel
//! - [`config`] - Session tuning (dedup window, watchdog, decoder hints)
//! - [`error`] - `SessionError`

pub mod config;
pub mod decoder;
pub mod error;
pub mod manual;
pub mod session;

#[cfg(test)]
pub(crate) mod fake;

pub use config::{ScanBox, SessionConfig};
pub use decoder::{
    DecodeEvent, DecodeRequest, DecoderAdapter, DecoderError, DecoderStream, TrackCapabilities,
};
pub use error::{SessionError, SessionResult};
pub use manual::{ManualEntryHandler, ManualSubmit};
pub use session::{HapticPulse, ScanSessionManager, SessionEvent, SessionInfo, SessionState};
