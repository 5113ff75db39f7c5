//! # Decoder Adapter
//!
//! The boundary to the host's camera and barcode decoder. The session
//! manager never touches a camera directly.
//!
//! ## Event Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  start(DecodeRequest) ──► DecoderStream                                 │
//! │                             ├── capabilities { torch }                  │
//! │                             └── events: mpsc::Receiver<DecodeEvent>     │
//! │                                   VideoReady      first live frame      │
//! │                                   Decoded(text)   a barcode was read    │
//! │                                   FrameNoise(..)  nothing in this frame │
//! │                                                                         │
//! │  stop() returns once camera and decoder are released                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;

use scanlist_core::{CameraDevice, CameraSelection, Symbology};

use crate::config::{ScanBox, SessionConfig};

/// Failures reported by the host decoder.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecoderError {
    #[error("camera permission denied")]
    PermissionDenied,

    #[error("camera unavailable: {0}")]
    Unavailable(String),

    #[error("constraint rejected: {0}")]
    ConstraintRejected(String),

    #[error("{0}")]
    Other(String),
}

/// What the session asks the decoder to do.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodeRequest {
    pub camera: CameraSelection,
    pub symbologies: Vec<Symbology>,
    pub fps: u32,
    pub scan_box: ScanBox,
    pub aspect_ratio: f64,
}

impl DecodeRequest {
    /// Builds a request for the retail symbologies using the configured hints.
    pub fn retail(camera: CameraSelection, config: &SessionConfig) -> Self {
        DecodeRequest {
            camera,
            symbologies: Symbology::RETAIL.to_vec(),
            fps: config.fps,
            scan_box: config.scan_box,
            aspect_ratio: config.aspect_ratio,
        }
    }
}

/// One item in the decoder's event sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeEvent {
    /// The first live video frame was rendered.
    VideoReady,
    /// A barcode was decoded from a frame.
    Decoded(String),
    /// A frame without a readable barcode. Expected, never an error.
    FrameNoise(String),
}

/// Capabilities reported by the active video track.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TrackCapabilities {
    pub torch: bool,
}

/// Returned by [`DecoderAdapter::start`].
#[derive(Debug)]
pub struct DecoderStream {
    pub events: mpsc::Receiver<DecodeEvent>,
    pub capabilities: TrackCapabilities,
}

/// Host camera + decoder.
///
/// Implementations must stop producing events once `stop` has returned.
#[async_trait]
pub trait DecoderAdapter: Send + Sync {
    async fn list_cameras(&self) -> Result<Vec<CameraDevice>, DecoderError>;

    async fn start(&self, request: DecodeRequest) -> Result<DecoderStream, DecoderError>;

    async fn stop(&self) -> Result<(), DecoderError>;

    async fn set_torch(&self, on: bool) -> Result<(), DecoderError>;
}
