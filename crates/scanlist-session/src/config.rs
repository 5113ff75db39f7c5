//! # Session Configuration
//!
//! Tuning for the scan session. Embedded as the `[session]` table of the
//! application config file.
//!
//! ```toml
//! [session]
//! dedup_window_ms = 3000
//! video_timeout_ms = 4000
//! fps = 10
//! aspect_ratio = 1.0
//! require_retail_length = false
//! haptics = true
//!
//! [session.scan_box]
//! width = 250
//! height = 250
//! ```

use serde::{Deserialize, Serialize};
use std::time::Duration;

use scanlist_core::{DEFAULT_DEDUP_WINDOW_MS, DEFAULT_VIDEO_TIMEOUT_MS};

use crate::error::{SessionError, SessionResult};

/// Region of the frame the decoder searches, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanBox {
    #[serde(default = "default_scan_box_side")]
    pub width: u32,
    #[serde(default = "default_scan_box_side")]
    pub height: u32,
}

fn default_scan_box_side() -> u32 {
    250
}

impl Default for ScanBox {
    fn default() -> Self {
        ScanBox {
            width: default_scan_box_side(),
            height: default_scan_box_side(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Trailing window in which a repeated decode is noise (continuous mode).
    #[serde(default = "default_dedup_window_ms")]
    pub dedup_window_ms: u64,

    /// How long to wait for the first live video frame.
    #[serde(default = "default_video_timeout_ms")]
    pub video_timeout_ms: u64,

    /// Decode attempts per second requested from the decoder.
    #[serde(default = "default_fps")]
    pub fps: u32,

    #[serde(default)]
    pub scan_box: ScanBox,

    #[serde(default = "default_aspect_ratio")]
    pub aspect_ratio: f64,

    /// Drop camera decodes that are not 12/13-digit retail codes.
    #[serde(default)]
    pub require_retail_length: bool,

    /// Emit haptic pulses for accepted and suppressed decodes.
    #[serde(default = "default_true")]
    pub haptics: bool,
}

fn default_dedup_window_ms() -> u64 {
    DEFAULT_DEDUP_WINDOW_MS
}

fn default_video_timeout_ms() -> u64 {
    DEFAULT_VIDEO_TIMEOUT_MS
}

fn default_fps() -> u32 {
    10
}

fn default_aspect_ratio() -> f64 {
    1.0
}

fn default_true() -> bool {
    true
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            dedup_window_ms: default_dedup_window_ms(),
            video_timeout_ms: default_video_timeout_ms(),
            fps: default_fps(),
            scan_box: ScanBox::default(),
            aspect_ratio: default_aspect_ratio(),
            require_retail_length: false,
            haptics: true,
        }
    }
}

impl SessionConfig {
    pub fn dedup_window(&self) -> Duration {
        Duration::from_millis(self.dedup_window_ms)
    }

    pub fn video_timeout(&self) -> Duration {
        Duration::from_millis(self.video_timeout_ms)
    }

    pub fn validate(&self) -> SessionResult<()> {
        if self.video_timeout_ms == 0 {
            return Err(SessionError::InvalidConfig(
                "video_timeout_ms must be greater than 0".into(),
            ));
        }

        if self.fps == 0 {
            return Err(SessionError::InvalidConfig(
                "fps must be greater than 0".into(),
            ));
        }

        if self.scan_box.width == 0 || self.scan_box.height == 0 {
            return Err(SessionError::InvalidConfig(
                "scan_box dimensions must be greater than 0".into(),
            ));
        }

        if !(self.aspect_ratio.is_finite() && self.aspect_ratio > 0.0) {
            return Err(SessionError::InvalidConfig(format!(
                "aspect_ratio must be a positive number, got {}",
                self.aspect_ratio
            )));
        }

        Ok(())
    }
}
