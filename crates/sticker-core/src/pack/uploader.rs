//! Pack upload pipeline

use std::sync::Arc;

use crate::config::StickerPackConfig;
use crate::error::ErrorKind;
use crate::normalize::NormalizedSticker;
use crate::pack::credentials::{CredentialStore, resolve_credentials};
use crate::pack::crypto::{derive_pack_keys, generate_iv, generate_pack_key};
use crate::pack::manifest::{assemble_pack, encrypt_pack};
use crate::pack::service::{
    ConnectOptions, NoticeSink, ProgressCallback, StickerService, monotonic_progress,
};
use crate::pack::types::{ManifestInfo, PackError, StickerInput, UploadedPack};

/// Encrypts packs and uploads them through a [`StickerService`]
pub struct PackUploader {
    config: StickerPackConfig,
    service: Arc<dyn StickerService>,
    credentials: Arc<dyn CredentialStore>,
    notices: Arc<dyn NoticeSink>,
}

impl PackUploader {
    /// Create an uploader
    pub fn new(
        config: StickerPackConfig,
        service: Arc<dyn StickerService>,
        credentials: Arc<dyn CredentialStore>,
        notices: Arc<dyn NoticeSink>,
    ) -> Self {
        Self {
            config,
            service,
            credentials,
            notices,
        }
    }

    /// Encrypt a pack and upload it
    ///
    /// Credentials, key material, deduplication and encryption all complete
    /// before the service is contacted, so any failure up to that point sends
    /// nothing. Connection and upload failures are returned as `Upload`
    /// errors without retry; a retry should start over with this call so the
    /// pack gets fresh keys.
    ///
    /// The returned hex key is the pack's shareable secret.
    pub async fn encrypt_and_upload(
        &self,
        manifest: &ManifestInfo,
        stickers: &[StickerInput],
        cover: &NormalizedSticker,
        on_progress: ProgressCallback,
    ) -> Result<UploadedPack, PackError> {
        let credentials = resolve_credentials(
            self.credentials.as_ref(),
            &self.config.identity_keys,
            &self.config.password_key,
        )
        .inspect_err(|e| {
            if e.kind() == ErrorKind::Authentication {
                tracing::warn!(target: "sticker_core::pack", error = %e, "Missing credentials");
                if let Some(key) = e.message_key() {
                    self.notices.show_blocking_notice(key);
                }
            }
        })?;

        let pack_key = generate_pack_key()?;
        let iv = generate_iv()?;
        let keys = derive_pack_keys(&pack_key)?;

        let layout = assemble_pack(manifest, stickers, cover)?;
        // One IV for every asset of the pack; installed clients expect it
        let encrypted = encrypt_pack(&layout, &keys, &iv)?;
        drop(keys);

        tracing::info!(
            target: "sticker_core::pack",
            stickers = stickers.len(),
            assets = encrypted.stickers.len(),
            "Uploading sticker pack"
        );

        let session = self
            .service
            .connect(ConnectOptions {
                username: credentials.username,
                password: credentials.password,
                use_websocket: self.config.use_websocket,
                server_url: self.config.server_url.clone(),
            })
            .await
            .inspect_err(|e| {
                tracing::warn!(target: "sticker_core::pack", error = %e, "Connect failed");
            })?;

        let pack_id = session
            .put_stickers(
                encrypted.manifest,
                encrypted.stickers,
                monotonic_progress(on_progress),
            )
            .await
            .inspect_err(|e| {
                tracing::warn!(target: "sticker_core::pack", error = %e, "Upload failed");
            })?;

        tracing::info!(target: "sticker_core::pack", pack_id = %pack_id, "Uploaded sticker pack");

        Ok(UploadedPack {
            pack_id,
            key: hex::encode(pack_key.as_ref()),
        })
    }
}
