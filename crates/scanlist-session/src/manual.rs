//! # Manual Entry
//!
//! Typed codes enter through the same channel as camera decodes, as
//! `SessionEvent::Scan` with `ScanSource::Manual`. They never pass through
//! the duplicate window: typing a code is deliberate.

use tokio::sync::mpsc;
use tracing::{debug, warn};

use scanlist_core::validation::normalize_manual_code;
use scanlist_core::{ScanEvent, ScanSource};

use crate::session::SessionEvent;

/// Result of [`ManualEntryHandler::submit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManualSubmit {
    Submitted(ScanEvent),
    /// Nothing but whitespace was typed; no event was sent.
    Empty,
}

/// Holds the text being typed and submits it.
#[derive(Debug, Clone)]
pub struct ManualEntryHandler {
    events: mpsc::UnboundedSender<SessionEvent>,
    input: String,
}

impl ManualEntryHandler {
    pub(crate) fn new(events: mpsc::UnboundedSender<SessionEvent>) -> Self {
        ManualEntryHandler {
            events,
            input: String::new(),
        }
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    /// Trims the input and forwards it. The buffer is cleared on submission.
    pub fn submit(&mut self) -> ManualSubmit {
        let Some(code) = normalize_manual_code(&self.input) else {
            return ManualSubmit::Empty;
        };
        self.input.clear();

        let event = ScanEvent::now(code, ScanSource::Manual);
        debug!(value = event.value(), "Manual code submitted");
        if self.events.send(SessionEvent::Scan(event.clone())).is_err() {
            warn!("Scan listener is gone; manual code not delivered");
        }
        ManualSubmit::Submitted(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SessionConfig;
    use crate::decoder::DecodeEvent;
    use crate::fake::FakeDecoder;
    use crate::session::ScanSessionManager;

    #[tokio::test]
    async fn test_submit_trims_and_forwards() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut handler = ManualEntryHandler::new(tx);

        handler.set_input("  ean-999  ");
        let ManualSubmit::Submitted(event) = handler.submit() else {
            panic!("expected submission");
        };
        assert_eq!(event.value(), "ean-999");
        assert_eq!(event.source(), ScanSource::Manual);
        assert_eq!(handler.input(), "");

        assert_eq!(rx.recv().await, Some(SessionEvent::Scan(event)));
    }

    #[test]
    fn test_empty_input_is_a_noop() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut handler = ManualEntryHandler::new(tx);

        handler.set_input("   ");
        assert_eq!(handler.submit(), ManualSubmit::Empty);
        assert_eq!(handler.input(), "   ");
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_manual_bypasses_duplicate_window() {
        let decoder = FakeDecoder::with_cameras(Vec::new());
        let (manager, mut rx) = ScanSessionManager::new(decoder.clone(), SessionConfig::default());
        let mut handler = manager.manual_entry();

        manager.start(None, true).await.unwrap();
        decoder.emit(DecodeEvent::VideoReady).await;
        decoder.emit(DecodeEvent::Decoded("ean-999".into())).await;

        // Wait for the camera decode to land.
        loop {
            if let Some(SessionEvent::Scan(scan)) = rx.recv().await {
                assert_eq!(scan.source(), ScanSource::Camera);
                break;
            }
        }

        for _ in 0..2 {
            handler.set_input("ean-999");
            assert!(matches!(handler.submit(), ManualSubmit::Submitted(_)));
        }

        let mut manual = 0;
        while let Ok(event) = rx.try_recv() {
            if let SessionEvent::Scan(scan) = event {
                assert_eq!(scan.source(), ScanSource::Manual);
                manual += 1;
            }
        }
        assert_eq!(manual, 2);
    }
}
