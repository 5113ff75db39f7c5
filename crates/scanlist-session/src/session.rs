//! # Scan Session Manager
//!
//! Owns the lifecycle of camera scanning: device enumeration, start/stop,
//! duplicate suppression, torch control and the startup watchdog.
//!
//! ## Task Layout
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ScanSessionManager (caller side)                                       │
//! │    start() ──spawn──► session task (one per generation)                 │
//! │    stop()  ──stop_tx──►    │                                            │
//! │    drop    ──teardown──►   │  select! {                                 │
//! │                            │    decoder events  → dedup → SessionEvent  │
//! │                            │    stop signal                             │
//! │                            │    manager dropped                         │
//! │                            │    watchdog (until first decoder event)    │
//! │                            │  }                                         │
//! │                            ▼                                            │
//! │                      release(): decoder.stop(), state → Ready, done     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The session task is the only place the decoder is released, so release
//! runs exactly once per session no matter how many exit paths race.
//! Every session carries a generation number; the task only mutates
//! shared state while its generation is current.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, watch, Mutex, RwLock};
use tokio::time::Instant;
use tracing::{debug, info, trace, warn};
use ts_rs::TS;

use scanlist_core::validation::is_likely_retail_barcode;
use scanlist_core::{CameraDevice, CameraSelection, DedupVerdict, RecentScanWindow, ScanEvent, ScanSource};

use crate::config::SessionConfig;
use crate::decoder::{DecodeEvent, DecodeRequest, DecoderAdapter};
use crate::error::{SessionError, SessionResult};
use crate::manual::ManualEntryHandler;

// =============================================================================
// Public Types
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Idle,
    RequestingDevices,
    Ready,
    Active,
    Stopping,
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionState::Idle => write!(f, "idle"),
            SessionState::RequestingDevices => write!(f, "requesting devices"),
            SessionState::Ready => write!(f, "ready"),
            SessionState::Active => write!(f, "active"),
            SessionState::Stopping => write!(f, "stopping"),
        }
    }
}

/// Vibration feedback for a decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum HapticPulse {
    /// A fresh code was accepted.
    Accepted,
    /// A repeat was dropped by the duplicate window.
    Suppressed,
}

impl HapticPulse {
    pub fn duration(&self) -> Duration {
        match self {
            HapticPulse::Accepted => Duration::from_millis(200),
            HapticPulse::Suppressed => Duration::from_millis(50),
        }
    }
}

/// Everything the manager reports to its listener.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// An accepted value (camera or manual).
    Scan(ScanEvent),
    StateChanged(SessionState),
    /// A non-fatal failure reported outside of a direct call.
    Error(SessionError),
    Haptic(HapticPulse),
}

/// Describes a running session.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionInfo {
    pub generation: u64,
    pub camera: CameraSelection,
    pub continuous: bool,
    /// Whether the UI should offer a torch toggle.
    pub torch_supported: bool,
}

// =============================================================================
// Internal State
// =============================================================================

/// Why a session task is exiting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StopReason {
    User,
    OneShot,
    Watchdog,
    StreamEnded,
    Teardown,
}

struct ActiveSession {
    info: SessionInfo,
    torch_on: bool,
    stop_tx: mpsc::Sender<StopReason>,
    done_rx: watch::Receiver<bool>,
}

struct SessionInner {
    state: SessionState,
    generation: u64,
    devices: Vec<CameraDevice>,
    selected_device: Option<String>,
    active: Option<ActiveSession>,
}

struct SessionShared {
    decoder: Arc<dyn DecoderAdapter>,
    config: SessionConfig,
    events: mpsc::UnboundedSender<SessionEvent>,
    /// Serializes start, stop, enumeration and torch changes.
    lifecycle: Mutex<()>,
    inner: RwLock<SessionInner>,
}

impl SessionShared {
    fn emit(&self, event: SessionEvent) {
        // Listener gone means nobody is interested; not an error.
        let _ = self.events.send(event);
    }

    fn set_state(&self, inner: &mut SessionInner, state: SessionState) {
        if inner.state != state {
            debug!(from = %inner.state, to = %state, "Session state changed");
            inner.state = state;
            self.emit(SessionEvent::StateChanged(state));
        }
    }

    /// Runs one decoded value through the filters.
    ///
    /// Returns true when the value was accepted.
    async fn accept_decode(
        &self,
        generation: u64,
        value: &str,
        window: &mut RecentScanWindow,
        continuous: bool,
    ) -> bool {
        let value = value.trim();
        if value.is_empty() {
            debug!(generation, "Ignoring blank decode");
            return false;
        }

        let mut inner = self.inner.write().await;

        if inner.generation != generation || inner.state != SessionState::Active {
            debug!(generation, value, "Discarding decode after stop");
            return false;
        }

        if self.config.require_retail_length && !is_likely_retail_barcode(value) {
            debug!(value, "Ignoring non-retail decode");
            return false;
        }

        match window.check_and_record(value, Instant::now().into_std(), continuous) {
            DedupVerdict::Suppressed => {
                debug!(value, "Suppressed repeated decode");
                if self.config.haptics {
                    self.emit(SessionEvent::Haptic(HapticPulse::Suppressed));
                }
                false
            }
            DedupVerdict::Accepted => {
                info!(generation, value, "Barcode accepted");
                self.emit(SessionEvent::Scan(ScanEvent::now(value, ScanSource::Camera)));
                if self.config.haptics {
                    self.emit(SessionEvent::Haptic(HapticPulse::Accepted));
                }
                if !continuous {
                    self.set_state(&mut inner, SessionState::Stopping);
                }
                true
            }
        }
    }

    /// Releases the decoder and settles state for `generation`.
    async fn release(&self, generation: u64, reason: StopReason) {
        {
            let mut inner = self.inner.write().await;
            if inner.generation == generation && inner.state == SessionState::Active {
                self.set_state(&mut inner, SessionState::Stopping);
            }
        }

        if let Err(e) = self.decoder.stop().await {
            warn!(generation, error = %e, "Decoder did not release cleanly");
        }

        let mut inner = self.inner.write().await;
        if inner.generation == generation {
            inner.active = None;
            self.set_state(&mut inner, SessionState::Ready);
        }
        drop(inner);

        info!(generation, ?reason, "Scan session stopped");

        match reason {
            StopReason::Watchdog => self.emit(SessionEvent::Error(
                SessionError::InitializationTimeout {
                    timeout_ms: self.config.video_timeout_ms,
                },
            )),
            StopReason::StreamEnded => self.emit(SessionEvent::Error(SessionError::StreamEnded)),
            StopReason::User | StopReason::OneShot | StopReason::Teardown => {}
        }
    }
}

/// Session task for one generation.
async fn run_session(
    shared: Arc<SessionShared>,
    generation: u64,
    continuous: bool,
    mut events: mpsc::Receiver<DecodeEvent>,
    mut stop_rx: mpsc::Receiver<StopReason>,
    mut teardown_rx: watch::Receiver<()>,
    done_tx: watch::Sender<bool>,
) {
    let mut window = RecentScanWindow::new(shared.config.dedup_window());
    let mut video_ready = false;
    let watchdog = tokio::time::sleep(shared.config.video_timeout());
    tokio::pin!(watchdog);

    let reason = loop {
        tokio::select! {
            event = events.recv() => {
                // Any frame-derived event proves video is flowing.
                if !video_ready && event.is_some() {
                    debug!(generation, "Video ready");
                    video_ready = true;
                }
                match event {
                    Some(DecodeEvent::VideoReady) => {}
                    Some(DecodeEvent::Decoded(value)) => {
                        let accepted = shared
                            .accept_decode(generation, &value, &mut window, continuous)
                            .await;
                        if accepted && !continuous {
                            break StopReason::OneShot;
                        }
                    }
                    Some(DecodeEvent::FrameNoise(detail)) => {
                        trace!(generation, %detail, "No barcode in frame");
                    }
                    None => {
                        warn!(generation, "Decoder event stream closed");
                        break StopReason::StreamEnded;
                    }
                }
            }

            reason = stop_rx.recv() => {
                break reason.unwrap_or(StopReason::Teardown);
            }

            _ = teardown_rx.changed() => {
                info!(generation, "Session manager dropped, tearing down");
                break StopReason::Teardown;
            }

            _ = &mut watchdog, if !video_ready => {
                warn!(
                    generation,
                    timeout_ms = shared.config.video_timeout_ms,
                    "No video within startup timeout"
                );
                break StopReason::Watchdog;
            }
        }
    };

    shared.release(generation, reason).await;
    let _ = done_tx.send(true);
}

async fn wait_released(mut done_rx: watch::Receiver<bool>) {
    // Err means the task is gone, which also means released.
    let _ = done_rx.wait_for(|done| *done).await;
}

// =============================================================================
// Scan Session Manager
// =============================================================================

/// Owner of the scan session lifecycle.
///
/// Dropping the manager tears down a running session; the session task
/// still releases the decoder.
pub struct ScanSessionManager {
    shared: Arc<SessionShared>,
    teardown_tx: watch::Sender<()>,
}

impl ScanSessionManager {
    /// Creates a manager and the receiver for its events.
    pub fn new(
        decoder: Arc<dyn DecoderAdapter>,
        config: SessionConfig,
    ) -> (Self, mpsc::UnboundedReceiver<SessionEvent>) {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let (teardown_tx, _) = watch::channel(());

        let shared = Arc::new(SessionShared {
            decoder,
            config,
            events: events_tx,
            lifecycle: Mutex::new(()),
            inner: RwLock::new(SessionInner {
                state: SessionState::Idle,
                generation: 0,
                devices: Vec::new(),
                selected_device: None,
                active: None,
            }),
        });

        (ScanSessionManager { shared, teardown_tx }, events_rx)
    }

    pub fn config(&self) -> &SessionConfig {
        &self.shared.config
    }

    pub async fn state(&self) -> SessionState {
        self.shared.inner.read().await.state
    }

    /// Devices from the last successful enumeration.
    pub async fn devices(&self) -> Vec<CameraDevice> {
        self.shared.inner.read().await.devices.clone()
    }

    pub async fn selected_device(&self) -> Option<String> {
        self.shared.inner.read().await.selected_device.clone()
    }

    /// The running session, if any.
    pub async fn current_session(&self) -> Option<SessionInfo> {
        let inner = self.shared.inner.read().await;
        inner.active.as_ref().map(|active| active.info.clone())
    }

    /// Chooses the device for the next start.
    pub async fn select_device(&self, device_id: &str) -> SessionResult<()> {
        let mut inner = self.shared.inner.write().await;
        if !inner.devices.iter().any(|d| d.id == device_id) {
            return Err(SessionError::UnknownDevice(device_id.to_string()));
        }
        inner.selected_device = Some(device_id.to_string());
        Ok(())
    }

    /// Enumerates cameras and picks a default.
    ///
    /// The default keeps the current selection when it is still present,
    /// else prefers a rear-facing label, else the first device. While a
    /// session is running the list is refreshed without changing state.
    pub async fn list_devices(&self) -> SessionResult<Vec<CameraDevice>> {
        let _op = self.shared.lifecycle.lock().await;

        let previous = {
            let mut inner = self.shared.inner.write().await;
            let previous = inner.state;
            if matches!(previous, SessionState::Idle | SessionState::Ready) {
                self.shared.set_state(&mut inner, SessionState::RequestingDevices);
            }
            previous
        };
        let settles = matches!(previous, SessionState::Idle | SessionState::Ready);

        let result = self.shared.decoder.list_cameras().await;

        let mut inner = self.shared.inner.write().await;
        match result {
            Ok(devices) if !devices.is_empty() => {
                let kept = inner
                    .selected_device
                    .take()
                    .filter(|id| devices.iter().any(|d| &d.id == id));
                inner.selected_device =
                    kept.or_else(|| CameraDevice::pick_default(&devices).map(|d| d.id.clone()));
                inner.devices = devices.clone();

                info!(
                    count = devices.len(),
                    selected = ?inner.selected_device,
                    "Cameras enumerated"
                );
                if settles {
                    self.shared.set_state(&mut inner, SessionState::Ready);
                }
                Ok(devices)
            }
            Ok(_) => {
                warn!("No cameras found");
                inner.devices.clear();
                inner.selected_device = None;
                if settles {
                    self.shared.set_state(&mut inner, SessionState::Idle);
                }
                Err(SessionError::NoCameras)
            }
            Err(e) => {
                warn!(error = %e, "Camera enumeration failed");
                if settles {
                    let fallback = if inner.devices.is_empty() {
                        SessionState::Idle
                    } else {
                        SessionState::Ready
                    };
                    self.shared.set_state(&mut inner, fallback);
                }
                Err(SessionError::DeviceEnumeration(e.to_string()))
            }
        }
    }

    /// Starts a session, or returns the running one.
    ///
    /// Without an explicit or previously selected device the decoder is
    /// asked for a rear-facing camera.
    pub async fn start(&self, device_id: Option<&str>, continuous: bool) -> SessionResult<SessionInfo> {
        let _op = self.shared.lifecycle.lock().await;

        let camera = {
            let mut inner = self.shared.inner.write().await;
            match (inner.state, inner.active.as_ref()) {
                (SessionState::Active, Some(active)) => {
                    debug!(generation = active.info.generation, "Session already active");
                    return Ok(active.info.clone());
                }
                (SessionState::Idle | SessionState::Ready, _) => {}
                (state, _) => {
                    return Err(SessionError::InvalidState {
                        action: "start",
                        state,
                    });
                }
            }

            if let Some(id) = device_id {
                if !inner.devices.is_empty() && !inner.devices.iter().any(|d| d.id == id) {
                    return Err(SessionError::UnknownDevice(id.to_string()));
                }
                inner.selected_device = Some(id.to_string());
            }

            match &inner.selected_device {
                Some(id) => CameraSelection::Device(id.clone()),
                None => CameraSelection::FacingEnvironment,
            }
        };

        info!(camera = %camera, continuous, "Starting scan session");
        let request = DecodeRequest::retail(camera.clone(), &self.shared.config);

        let stream = match self.shared.decoder.start(request).await {
            Ok(stream) => stream,
            Err(e) => {
                warn!(camera = %camera, error = %e, "Camera start failed");
                let mut inner = self.shared.inner.write().await;
                let fallback = if inner.devices.is_empty() {
                    SessionState::Idle
                } else {
                    SessionState::Ready
                };
                self.shared.set_state(&mut inner, fallback);
                return Err(SessionError::CameraStart(e.to_string()));
            }
        };

        let mut inner = self.shared.inner.write().await;
        inner.generation += 1;
        let generation = inner.generation;

        let info = SessionInfo {
            generation,
            camera,
            continuous,
            torch_supported: stream.capabilities.torch,
        };
        let (stop_tx, stop_rx) = mpsc::channel(1);
        let (done_tx, done_rx) = watch::channel(false);

        inner.active = Some(ActiveSession {
            info: info.clone(),
            torch_on: false,
            stop_tx,
            done_rx,
        });
        self.shared.set_state(&mut inner, SessionState::Active);
        drop(inner);

        tokio::spawn(run_session(
            self.shared.clone(),
            generation,
            continuous,
            stream.events,
            stop_rx,
            self.teardown_tx.subscribe(),
            done_tx,
        ));

        info!(generation, torch = info.torch_supported, "Scan session active");
        Ok(info)
    }

    /// Stops the running session and waits until the decoder is released.
    ///
    /// A no-op when nothing is running. Concurrent callers all return once
    /// the single release has finished.
    pub async fn stop(&self) {
        let _op = self.shared.lifecycle.lock().await;

        let done_rx = {
            let mut inner = self.shared.inner.write().await;
            let Some(active) = inner.active.as_ref() else {
                return;
            };
            let done_rx = active.done_rx.clone();
            let stop_tx = active.stop_tx.clone();

            if inner.state == SessionState::Active {
                self.shared.set_state(&mut inner, SessionState::Stopping);
                // Capacity 1: a full channel already carries a stop request.
                let _ = stop_tx.try_send(StopReason::User);
            }
            done_rx
        };

        wait_released(done_rx).await;
    }

    /// Flips the torch on the active camera. Returns the new torch state.
    pub async fn toggle_torch(&self) -> SessionResult<bool> {
        let _op = self.shared.lifecycle.lock().await;

        let next = {
            let inner = self.shared.inner.read().await;
            let active = match (inner.state, inner.active.as_ref()) {
                (SessionState::Active, Some(active)) => active,
                _ => return Err(SessionError::NoActiveSession),
            };
            if !active.info.torch_supported {
                return Err(SessionError::TorchUnsupported);
            }
            !active.torch_on
        };

        self.shared.decoder.set_torch(next).await.map_err(|e| {
            warn!(error = %e, "Torch change rejected");
            SessionError::Torch(e.to_string())
        })?;

        let mut inner = self.shared.inner.write().await;
        if let Some(active) = inner.active.as_mut() {
            active.torch_on = next;
        }
        debug!(torch = next, "Torch toggled");
        Ok(next)
    }

    /// A manual entry handler that feeds this manager's event channel.
    pub fn manual_entry(&self) -> ManualEntryHandler {
        ManualEntryHandler::new(self.shared.events.clone())
    }

    /// Stops any running session and drops the manager.
    pub async fn shutdown(self) {
        self.stop().await;
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoder::DecoderError;
    use crate::fake::FakeDecoder;

    fn manager(decoder: &Arc<FakeDecoder>) -> (ScanSessionManager, mpsc::UnboundedReceiver<SessionEvent>) {
        ScanSessionManager::new(decoder.clone(), SessionConfig::default())
    }

    /// Receives events until `pred` matches, returning the ones before it.
    async fn collect_until<F>(
        rx: &mut mpsc::UnboundedReceiver<SessionEvent>,
        pred: F,
    ) -> (Vec<SessionEvent>, SessionEvent)
    where
        F: Fn(&SessionEvent) -> bool,
    {
        let mut seen = Vec::new();
        loop {
            let event = rx.recv().await.expect("event channel closed");
            if pred(&event) {
                return (seen, event);
            }
            seen.push(event);
        }
    }

    fn scans(events: &[SessionEvent]) -> Vec<String> {
        events
            .iter()
            .filter_map(|e| match e {
                SessionEvent::Scan(scan) => Some(scan.value().to_string()),
                _ => None,
            })
            .collect()
    }

    fn is_scan_of(value: &'static str) -> impl Fn(&SessionEvent) -> bool {
        move |e| matches!(e, SessionEvent::Scan(scan) if scan.value() == value)
    }

    fn is_state(state: SessionState) -> impl Fn(&SessionEvent) -> bool {
        move |e| *e == SessionEvent::StateChanged(state)
    }

    #[tokio::test]
    async fn test_list_devices_prefers_rear_camera() {
        let decoder = FakeDecoder::with_cameras(vec![
            CameraDevice::new("front", "Front Camera"),
            CameraDevice::new("rear", "Back Camera"),
        ]);
        let (manager, _rx) = manager(&decoder);

        let devices = manager.list_devices().await.unwrap();
        assert_eq!(devices.len(), 2);
        assert_eq!(manager.selected_device().await.as_deref(), Some("rear"));
        assert_eq!(manager.state().await, SessionState::Ready);

        manager.select_device("front").await.unwrap();
        manager.list_devices().await.unwrap();
        assert_eq!(manager.selected_device().await.as_deref(), Some("front"));

        assert!(matches!(
            manager.select_device("missing").await,
            Err(SessionError::UnknownDevice(_))
        ));
    }

    #[tokio::test]
    async fn test_list_devices_failures_leave_idle() {
        let decoder = FakeDecoder::with_cameras(Vec::new());
        let (manager, _rx) = manager(&decoder);
        assert_eq!(manager.list_devices().await, Err(SessionError::NoCameras));
        assert_eq!(manager.state().await, SessionState::Idle);

        decoder.deny_cameras(DecoderError::PermissionDenied);
        let err = manager.list_devices().await.unwrap_err();
        assert!(err.is_device_enumeration());
        assert_eq!(manager.state().await, SessionState::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_one_shot_stops_after_first_accepted_decode() {
        let decoder = FakeDecoder::with_cameras(vec![CameraDevice::new("rear", "Rear")]);
        let (manager, mut rx) = manager(&decoder);
        manager.list_devices().await.unwrap();
        while rx.try_recv().is_ok() {}

        let info = manager.start(None, false).await.unwrap();
        assert_eq!(info.camera, CameraSelection::Device("rear".into()));
        assert_eq!(manager.state().await, SessionState::Active);

        decoder.emit(DecodeEvent::VideoReady).await;
        decoder.emit(DecodeEvent::FrameNoise("no code".into())).await;
        decoder.emit(DecodeEvent::Decoded("012345678905".into())).await;
        decoder.emit(DecodeEvent::Decoded("999999999999".into())).await;

        let (before, _) = collect_until(&mut rx, is_state(SessionState::Ready)).await;
        assert_eq!(scans(&before), vec!["012345678905"]);
        assert!(before.contains(&SessionEvent::Haptic(HapticPulse::Accepted)));
        assert!(before.contains(&SessionEvent::StateChanged(SessionState::Stopping)));

        assert_eq!(manager.state().await, SessionState::Ready);
        assert_eq!(decoder.stop_count(), 1);
        assert!(manager.current_session().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_continuous_suppresses_repeats_inside_window() {
        let decoder = FakeDecoder::with_cameras(Vec::new());
        let (manager, mut rx) = manager(&decoder);

        let info = manager.start(None, true).await.unwrap();
        assert_eq!(info.camera, CameraSelection::FacingEnvironment);

        decoder.emit(DecodeEvent::VideoReady).await;
        decoder.emit(DecodeEvent::Decoded("A".into())).await;
        decoder.emit(DecodeEvent::Decoded("A".into())).await;
        decoder.emit(DecodeEvent::Decoded("B".into())).await;

        let (before, _) = collect_until(&mut rx, is_scan_of("B")).await;
        assert_eq!(scans(&before), vec!["A"]);
        assert!(before.contains(&SessionEvent::Haptic(HapticPulse::Suppressed)));

        tokio::time::advance(Duration::from_millis(3000)).await;
        decoder.emit(DecodeEvent::Decoded("A".into())).await;
        collect_until(&mut rx, is_scan_of("A")).await;

        assert_eq!(manager.state().await, SessionState::Active);
        manager.stop().await;
        assert_eq!(manager.state().await, SessionState::Ready);
    }

    #[tokio::test(start_paused = true)]
    async fn test_decode_without_video_ready_disarms_watchdog() {
        let decoder = FakeDecoder::with_cameras(Vec::new());
        let (manager, mut rx) = manager(&decoder);

        manager.start(None, true).await.unwrap();
        decoder.emit(DecodeEvent::Decoded("012345678905".into())).await;
        collect_until(&mut rx, is_scan_of("012345678905")).await;

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(manager.state().await, SessionState::Active);
        assert_eq!(decoder.stop_count(), 0);
        while let Ok(event) = rx.try_recv() {
            assert!(!matches!(event, SessionEvent::Error(_)), "unexpected {:?}", event);
        }

        manager.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_frame_noise_disarms_watchdog() {
        let decoder = FakeDecoder::with_cameras(Vec::new());
        let (manager, _rx) = manager(&decoder);

        manager.start(None, true).await.unwrap();
        decoder.emit(DecodeEvent::FrameNoise("no code".into())).await;

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(manager.state().await, SessionState::Active);
        assert_eq!(decoder.stop_count(), 0);

        manager.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_decoded_values_are_trimmed() {
        let decoder = FakeDecoder::with_cameras(Vec::new());
        let (manager, mut rx) = manager(&decoder);

        manager.start(None, true).await.unwrap();
        decoder.emit(DecodeEvent::VideoReady).await;
        decoder.emit(DecodeEvent::Decoded("   ".into())).await;
        decoder.emit(DecodeEvent::Decoded(" 012345678905\r\n".into())).await;
        decoder.emit(DecodeEvent::Decoded("012345678905".into())).await;
        decoder.emit(DecodeEvent::Decoded("B".into())).await;

        let (before, _) = collect_until(&mut rx, is_scan_of("B")).await;
        assert_eq!(scans(&before), vec!["012345678905"]);
        assert!(before.contains(&SessionEvent::Haptic(HapticPulse::Suppressed)));

        manager.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_watchdog_stops_session_without_video() {
        let decoder = FakeDecoder::with_cameras(Vec::new());
        let (manager, mut rx) = manager(&decoder);

        manager.start(None, true).await.unwrap();

        let (_, event) = collect_until(&mut rx, |e| matches!(e, SessionEvent::Error(_))).await;
        assert_eq!(
            event,
            SessionEvent::Error(SessionError::InitializationTimeout { timeout_ms: 4000 })
        );
        assert_eq!(manager.state().await, SessionState::Ready);
        assert_eq!(decoder.stop_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_watchdog_disarmed_by_video() {
        let decoder = FakeDecoder::with_cameras(Vec::new());
        let (manager, _rx) = manager(&decoder);

        manager.start(None, true).await.unwrap();
        decoder.emit(DecodeEvent::VideoReady).await;
        tokio::time::sleep(Duration::from_secs(10)).await;

        assert_eq!(manager.state().await, SessionState::Active);
        assert_eq!(decoder.stop_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_old_watchdog_does_not_touch_new_session() {
        let decoder = FakeDecoder::with_cameras(Vec::new());
        let (manager, _rx) = manager(&decoder);

        let first = manager.start(None, true).await.unwrap();
        tokio::time::sleep(Duration::from_millis(3000)).await;
        manager.stop().await;

        let second = manager.start(None, true).await.unwrap();
        assert_eq!(second.generation, first.generation + 1);
        decoder.emit(DecodeEvent::VideoReady).await;

        // Past the first session's deadline.
        tokio::time::sleep(Duration::from_millis(2000)).await;
        assert_eq!(manager.state().await, SessionState::Active);
        assert_eq!(decoder.stop_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_is_idempotent_under_concurrency() {
        let decoder = FakeDecoder::with_cameras(Vec::new());
        let (manager, _rx) = manager(&decoder);

        manager.stop().await;
        assert_eq!(decoder.stop_count(), 0);

        manager.start(None, true).await.unwrap();
        decoder.emit(DecodeEvent::VideoReady).await;

        tokio::join!(manager.stop(), manager.stop(), manager.stop());
        manager.stop().await;

        assert_eq!(decoder.stop_count(), 1);
        assert_eq!(manager.state().await, SessionState::Ready);
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_while_active_is_noop() {
        let decoder = FakeDecoder::with_cameras(Vec::new());
        let (manager, _rx) = manager(&decoder);

        let first = manager.start(None, true).await.unwrap();
        let again = manager.start(None, false).await.unwrap();

        assert_eq!(first, again);
        let requests = decoder.start_requests();
        assert_eq!(requests.len(), 1);
        let request = &requests[0];
        assert_eq!(request.symbologies, scanlist_core::Symbology::RETAIL.to_vec());
        assert_eq!(request.fps, 10);
    }

    #[tokio::test]
    async fn test_camera_start_failure_routes_back() {
        let decoder = FakeDecoder::with_cameras(vec![CameraDevice::new("cam", "USB Camera")]);
        decoder.fail_start(DecoderError::Unavailable("in use".into()));
        let (manager, _rx) = manager(&decoder);

        let err = manager.start(None, false).await.unwrap_err();
        assert!(matches!(err, SessionError::CameraStart(_)));
        assert_eq!(manager.state().await, SessionState::Idle);

        manager.list_devices().await.unwrap();
        assert!(manager.start(Some("cam"), false).await.is_err());
        assert_eq!(manager.state().await, SessionState::Ready);

        assert_eq!(
            manager.start(Some("nope"), false).await,
            Err(SessionError::UnknownDevice("nope".into()))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_stream_end_is_reported() {
        let decoder = FakeDecoder::with_cameras(Vec::new());
        let (manager, mut rx) = manager(&decoder);

        manager.start(None, true).await.unwrap();
        decoder.emit(DecodeEvent::VideoReady).await;
        decoder.close_stream();

        let (_, event) = collect_until(&mut rx, |e| matches!(e, SessionEvent::Error(_))).await;
        assert_eq!(event, SessionEvent::Error(SessionError::StreamEnded));
        assert_eq!(manager.state().await, SessionState::Ready);
        assert_eq!(decoder.stop_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_tears_down_session() {
        let decoder = FakeDecoder::with_cameras(Vec::new());
        let (manager, mut rx) = manager(&decoder);

        manager.start(None, true).await.unwrap();
        decoder.emit(DecodeEvent::VideoReady).await;
        drop(manager);

        collect_until(&mut rx, is_state(SessionState::Ready)).await;
        assert_eq!(decoder.stop_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_torch_toggle() {
        let decoder = FakeDecoder::with_cameras(Vec::new());
        let (manager, _rx) = manager(&decoder);

        assert_eq!(manager.toggle_torch().await, Err(SessionError::NoActiveSession));

        let info = manager.start(None, true).await.unwrap();
        assert!(!info.torch_supported);
        assert_eq!(manager.toggle_torch().await, Err(SessionError::TorchUnsupported));
        manager.stop().await;

        decoder.set_torch_capable(true);
        let info = manager.start(None, true).await.unwrap();
        assert!(info.torch_supported);
        assert_eq!(manager.toggle_torch().await, Ok(true));
        assert_eq!(manager.toggle_torch().await, Ok(false));
        assert_eq!(decoder.torch_calls(), vec![true, false]);

        decoder.reject_torch(DecoderError::ConstraintRejected("torch".into()));
        assert!(matches!(manager.toggle_torch().await, Err(SessionError::Torch(_))));
        assert_eq!(manager.state().await, SessionState::Active);
    }

    #[tokio::test(start_paused = true)]
    async fn test_retail_filter_drops_other_codes() {
        let decoder = FakeDecoder::with_cameras(Vec::new());
        let config = SessionConfig {
            require_retail_length: true,
            haptics: false,
            ..Default::default()
        };
        let (manager, mut rx) = ScanSessionManager::new(decoder.clone(), config);

        manager.start(None, true).await.unwrap();
        decoder.emit(DecodeEvent::VideoReady).await;
        decoder.emit(DecodeEvent::Decoded("https://example.com".into())).await;
        decoder.emit(DecodeEvent::Decoded("7501234567890".into())).await;

        let (before, _) = collect_until(&mut rx, is_scan_of("7501234567890")).await;
        assert!(scans(&before).is_empty());
        assert!(!before.iter().any(|e| matches!(e, SessionEvent::Haptic(_))));
    }
}
