//! Scriptable in-memory decoder for tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::mpsc;

use scanlist_core::CameraDevice;

use crate::decoder::{
    DecodeEvent, DecodeRequest, DecoderAdapter, DecoderError, DecoderStream, TrackCapabilities,
};

#[derive(Default)]
struct Script {
    cameras: Vec<CameraDevice>,
    camera_error: Option<DecoderError>,
    start_error: Option<DecoderError>,
    torch_error: Option<DecoderError>,
    torch_capable: bool,
    feed: Option<mpsc::Sender<DecodeEvent>>,
    requests: Vec<DecodeRequest>,
    torch_calls: Vec<bool>,
}

#[derive(Default)]
pub struct FakeDecoder {
    script: Mutex<Script>,
    stops: AtomicUsize,
}

impl FakeDecoder {
    pub fn with_cameras(cameras: Vec<CameraDevice>) -> Arc<Self> {
        let decoder = FakeDecoder::default();
        decoder.script.lock().unwrap().cameras = cameras;
        Arc::new(decoder)
    }

    pub fn deny_cameras(&self, error: DecoderError) {
        self.script.lock().unwrap().camera_error = Some(error);
    }

    pub fn fail_start(&self, error: DecoderError) {
        self.script.lock().unwrap().start_error = Some(error);
    }

    pub fn reject_torch(&self, error: DecoderError) {
        self.script.lock().unwrap().torch_error = Some(error);
    }

    pub fn set_torch_capable(&self, capable: bool) {
        self.script.lock().unwrap().torch_capable = capable;
    }

    /// Feeds an event to the running stream. Ignored when nothing is running.
    pub async fn emit(&self, event: DecodeEvent) {
        let feed = self.script.lock().unwrap().feed.clone();
        if let Some(feed) = feed {
            let _ = feed.send(event).await;
        }
    }

    /// Drops the stream sender as a decoder crash would.
    pub fn close_stream(&self) {
        self.script.lock().unwrap().feed = None;
    }

    pub fn stop_count(&self) -> usize {
        self.stops.load(Ordering::SeqCst)
    }

    pub fn start_requests(&self) -> Vec<DecodeRequest> {
        self.script.lock().unwrap().requests.clone()
    }

    pub fn torch_calls(&self) -> Vec<bool> {
        self.script.lock().unwrap().torch_calls.clone()
    }
}

#[async_trait]
impl DecoderAdapter for FakeDecoder {
    async fn list_cameras(&self) -> Result<Vec<CameraDevice>, DecoderError> {
        let script = self.script.lock().unwrap();
        match &script.camera_error {
            Some(error) => Err(error.clone()),
            None => Ok(script.cameras.clone()),
        }
    }

    async fn start(&self, request: DecodeRequest) -> Result<DecoderStream, DecoderError> {
        let mut script = self.script.lock().unwrap();
        script.requests.push(request);
        if let Some(error) = &script.start_error {
            return Err(error.clone());
        }

        let (tx, rx) = mpsc::channel(16);
        script.feed = Some(tx);
        Ok(DecoderStream {
            events: rx,
            capabilities: TrackCapabilities {
                torch: script.torch_capable,
            },
        })
    }

    async fn stop(&self) -> Result<(), DecoderError> {
        self.stops.fetch_add(1, Ordering::SeqCst);
        self.script.lock().unwrap().feed = None;
        Ok(())
    }

    async fn set_torch(&self, on: bool) -> Result<(), DecoderError> {
        let mut script = self.script.lock().unwrap();
        if let Some(error) = &script.torch_error {
            return Err(error.clone());
        }
        script.torch_calls.push(on);
        Ok(())
    }
}
