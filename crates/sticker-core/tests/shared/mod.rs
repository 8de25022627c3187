//! Recording sticker service and image fixtures shared by integration tests

#![allow(dead_code)]

use std::io::Cursor;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use image::{ImageFormat, Rgba, RgbaImage};
use sticker_core::pack::{
    ConnectOptions, CredentialStore, NoticeSink, PackError, ProgressCallback, ServiceError,
    StickerService, StickerSession, UploadProgress,
};

/// How the mock service should behave
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Failure {
    #[default]
    None,
    Connect,
    Upload,
}

/// Everything the service saw
#[derive(Debug, Default)]
pub struct Recording {
    pub connects: AtomicUsize,
    pub put_stickers: AtomicUsize,
    pub options: Mutex<Option<ConnectOptions>>,
    pub manifest: Mutex<Vec<u8>>,
    pub stickers: Mutex<Vec<Vec<u8>>>,
}

impl Recording {
    pub fn connect_count(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }

    pub fn put_count(&self) -> usize {
        self.put_stickers.load(Ordering::SeqCst)
    }
}

/// Sticker service that records calls and never touches the network
pub struct RecordingService {
    pub recording: Arc<Recording>,
    failure: Failure,
}

impl RecordingService {
    pub fn new(failure: Failure) -> Self {
        Self {
            recording: Arc::new(Recording::default()),
            failure,
        }
    }
}

struct RecordingSession {
    recording: Arc<Recording>,
    failure: Failure,
}

#[async_trait]
impl StickerService for RecordingService {
    async fn connect(
        &self,
        options: ConnectOptions,
    ) -> Result<Box<dyn StickerSession>, ServiceError> {
        self.recording.connects.fetch_add(1, Ordering::SeqCst);
        *self.recording.options.lock().unwrap() = Some(options);
        if self.failure == Failure::Connect {
            return Err(ServiceError::Connect("connection refused".to_string()));
        }
        Ok(Box::new(RecordingSession {
            recording: Arc::clone(&self.recording),
            failure: self.failure,
        }))
    }
}

#[async_trait]
impl StickerSession for RecordingSession {
    async fn put_stickers(
        &self,
        manifest: Vec<u8>,
        stickers: Vec<Vec<u8>>,
        on_progress: ProgressCallback,
    ) -> Result<String, ServiceError> {
        self.recording.put_stickers.fetch_add(1, Ordering::SeqCst);

        let total = (manifest.len() + stickers.iter().map(Vec::len).sum::<usize>()) as u64;
        let mut sent = manifest.len() as u64;
        on_progress(UploadProgress { sent, total });

        // Assets finish out of order; report each completion plus a stale value
        for sticker in stickers.iter().rev() {
            on_progress(UploadProgress {
                sent: sent / 2,
                total,
            });
            sent += sticker.len() as u64;
            on_progress(UploadProgress { sent, total });
        }

        *self.recording.manifest.lock().unwrap() = manifest;
        *self.recording.stickers.lock().unwrap() = stickers;

        if self.failure == Failure::Upload {
            return Err(ServiceError::Upload("HTTP 413".to_string()));
        }
        Ok("0123456789abcdef0123456789abcdef".to_string())
    }
}

/// Credential store over a fixed list of entries
pub struct StaticStore(pub Vec<(&'static str, &'static str)>);

impl CredentialStore for StaticStore {
    fn get(&self, key: &str) -> Result<Option<String>, PackError> {
        Ok(self
            .0
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.to_string()))
    }
}

/// Notice sink that remembers what it was asked to show
#[derive(Default)]
pub struct RecordingNotices(pub Mutex<Vec<&'static str>>);

impl NoticeSink for RecordingNotices {
    fn show_blocking_notice(&self, message_key: &'static str) {
        self.0.lock().unwrap().push(message_key);
    }
}

/// Install a `RUST_LOG`-driven log subscriber for the test process
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_test_writer()
        .try_init();
}

/// PNG of a single opaque color
pub fn solid_png(width: u32, height: u32, color: [u8; 4]) -> Vec<u8> {
    let img = RgbaImage::from_pixel(width, height, Rgba(color));
    let mut buffer = Vec::new();
    img.write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)
        .unwrap();
    buffer
}
