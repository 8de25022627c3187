//! Sticker pack assembly and upload
//!
//! This module turns normalized stickers into an encrypted pack:
//! - Credential lookup for the upload session
//! - Content deduplication and manifest assembly
//! - Per-pack key generation and asset encryption
//! - Upload through a host-provided [`StickerService`]

pub mod credentials;
pub mod crypto;
pub mod manifest;
pub mod service;
pub mod types;
mod uploader;

pub use credentials::{CredentialStore, Credentials, KeyringCredentialStore, resolve_credentials};
pub use crypto::{
    EncryptedAttachment, PackKey, PackKeys, decrypt_attachment, derive_pack_keys,
    encrypt_attachment, generate_iv, generate_pack_key, pack_key_from_hex,
};
pub use manifest::{
    EncryptedPack, PackLayout, StickerEntry, StickerPackManifest, assemble_pack, decode_manifest,
    encode_manifest, encrypt_pack,
};
pub use service::{
    ConnectOptions, LogNoticeSink, NoticeSink, ProgressCallback, StickerService, StickerSession,
    monotonic_progress,
};
pub use types::{
    ManifestInfo, PackError, ServiceError, StickerInput, UploadProgress, UploadedPack,
};
pub use uploader::PackUploader;
