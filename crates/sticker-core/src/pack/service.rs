//! Sticker service seam
//!
//! The transport that talks to the sticker service lives in the host
//! application. This module defines the traits it implements and the
//! progress plumbing between it and the caller.

use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;

use crate::pack::types::{ServiceError, UploadProgress};
use crate::secret::Secret;

/// Callback receiving upload progress
pub type ProgressCallback = Arc<dyn Fn(UploadProgress) + Send + Sync>;

/// Parameters for opening an authenticated session
#[derive(Debug, Clone)]
pub struct ConnectOptions {
    /// Account identifier
    pub username: String,
    /// Session password
    pub password: Secret<String>,
    /// Whether the transport should use a websocket connection
    pub use_websocket: bool,
    /// Service endpoint; `None` selects the transport's default
    pub server_url: Option<String>,
}

/// Entry point of the external sticker service
#[async_trait]
pub trait StickerService: Send + Sync {
    /// Open an authenticated session
    async fn connect(&self, options: ConnectOptions) -> Result<Box<dyn StickerSession>, ServiceError>;
}

/// An authenticated session with the sticker service
#[async_trait]
pub trait StickerSession: Send + Sync {
    /// Upload an encrypted manifest and its encrypted stickers
    ///
    /// `stickers[i]` is the asset with manifest id `i`. Returns the pack id
    /// assigned by the service.
    async fn put_stickers(
        &self,
        manifest: Vec<u8>,
        stickers: Vec<Vec<u8>>,
        on_progress: ProgressCallback,
    ) -> Result<String, ServiceError>;
}

/// Where blocking user notices go (e.g. a modal dialog)
pub trait NoticeSink: Send + Sync {
    /// Show the message identified by `message_key`
    fn show_blocking_notice(&self, message_key: &'static str);
}

/// [`NoticeSink`] that only logs
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNoticeSink;

impl NoticeSink for LogNoticeSink {
    fn show_blocking_notice(&self, message_key: &'static str) {
        tracing::warn!(target: "sticker_core::pack", message_key, "Blocking notice");
    }
}

/// Wrap `callback` so it only sees strictly increasing `sent` values
///
/// Services may report progress from several tasks at once; anything at or
/// below the last forwarded value is dropped.
pub fn monotonic_progress(callback: ProgressCallback) -> ProgressCallback {
    let last_sent: Mutex<Option<u64>> = Mutex::new(None);
    Arc::new(move |progress: UploadProgress| {
        // A panicking callback must not stop later updates
        let mut last = last_sent.lock().unwrap_or_else(PoisonError::into_inner);
        if last.is_some_and(|sent| progress.sent <= sent) {
            return;
        }
        *last = Some(progress.sent);
        callback(progress);
    })
}
