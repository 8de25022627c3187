//! Sticker core prelude
//!
//! ```rust
//! use sticker_core::prelude::*;
//!
//! let normalizer = StickerNormalizer::new(NormalizeOptions::default());
//! assert_eq!(normalizer.options().webp_quality, 80.0);
//! ```

// === Errors ===
/// Crate error and its machine-readable kind
pub use crate::error::{Error, ErrorKind};

// === Configuration ===
/// Pack configuration
pub use crate::config::{StickerPackConfig, load_config};

// === Normalizer ===
/// Image normalization
pub use crate::normalize::{
    NormalizeError, NormalizeOptions, NormalizedSticker, StickerKind, StickerNormalizer,
};

// === Pack upload ===
/// Pack assembly and upload
pub use crate::pack::{
    ConnectOptions, CredentialStore, KeyringCredentialStore, ManifestInfo, NoticeSink, PackError,
    PackUploader, ProgressCallback, ServiceError, StickerInput, StickerService, StickerSession,
    UploadProgress, UploadedPack,
};
