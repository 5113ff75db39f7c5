//! # Session Error Types
//!
//! ## Error Categories
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Devices            Camera              Session           Torch         │
//! │  ───────────────    ───────────────     ──────────────    ───────────── │
//! │  DeviceEnumeration  CameraStart         InvalidState      Unsupported   │
//! │  NoCameras          InitTimeout         NoActiveSession   Torch(reason) │
//! │  UnknownDevice      StreamEnded                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every variant is recoverable: manual entry stays available and the user
//! may retry or pick another camera.

use thiserror::Error;

use crate::session::SessionState;

/// Result type alias for session operations.
pub type SessionResult<T> = Result<T, SessionError>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    // =========================================================================
    // Device Errors
    // =========================================================================
    /// The platform refused or failed to enumerate cameras.
    #[error("Camera enumeration failed: {0}")]
    DeviceEnumeration(String),

    /// Enumeration succeeded but found nothing.
    #[error("No camera found")]
    NoCameras,

    /// The requested device id is not in the last enumeration.
    #[error("Unknown camera device: {0}")]
    UnknownDevice(String),

    // =========================================================================
    // Camera Errors
    // =========================================================================
    /// The video stream could not be acquired.
    #[error("Failed to start camera: {0}")]
    CameraStart(String),

    /// No live video frame appeared in time; the session was stopped.
    #[error("Camera did not produce video within {timeout_ms} ms")]
    InitializationTimeout { timeout_ms: u64 },

    /// The decoder closed its event stream while the session was active.
    #[error("Decoder stream ended unexpectedly")]
    StreamEnded,

    // =========================================================================
    // Session Errors
    // =========================================================================
    #[error("Cannot {action} while {state}")]
    InvalidState {
        action: &'static str,
        state: SessionState,
    },

    #[error("No active scan session")]
    NoActiveSession,

    #[error("Invalid session configuration: {0}")]
    InvalidConfig(String),

    // =========================================================================
    // Torch Errors
    // =========================================================================
    #[error("Torch is not supported by the active camera")]
    TorchUnsupported,

    /// The device rejected the torch constraint change.
    #[error("Torch change rejected: {0}")]
    Torch(String),
}

impl SessionError {
    /// Returns true when the user can simply try the same action again.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, SessionError::InvalidConfig(_))
    }

    /// Returns true for errors raised while enumerating cameras.
    pub fn is_device_enumeration(&self) -> bool {
        matches!(
            self,
            SessionError::DeviceEnumeration(_) | SessionError::NoCameras
        )
    }

    /// Message shown to the user.
    pub fn user_message(&self) -> &'static str {
        match self {
            SessionError::DeviceEnumeration(_) | SessionError::NoCameras => {
                "No se pudo acceder a la cámara. Verifica permisos / HTTPS."
            }
            SessionError::CameraStart(_)
            | SessionError::InitializationTimeout { .. }
            | SessionError::StreamEnded
            | SessionError::UnknownDevice(_) => {
                "Error al acceder a la cámara. Asegúrate de dar permisos."
            }
            SessionError::TorchUnsupported | SessionError::Torch(_) => {
                "No se pudo cambiar la linterna."
            }
            SessionError::InvalidState { .. }
            | SessionError::NoActiveSession
            | SessionError::InvalidConfig(_) => "El escáner no está disponible en este momento.",
        }
    }
}
