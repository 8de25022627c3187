//! Type definitions for sticker pack assembly and upload

use crate::error::ErrorKind;
use crate::normalize::NormalizedSticker;

/// Title and author of a pack
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestInfo {
    /// Pack title
    pub title: String,
    /// Pack author
    pub author: String,
}

/// One sticker slot as selected by the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StickerInput {
    /// Normalized image, `None` while the slot is still empty
    pub image_data: Option<NormalizedSticker>,
    /// Emoji the sticker is associated with
    pub emoji: Option<String>,
}

impl StickerInput {
    /// A filled slot
    pub fn new(image_data: NormalizedSticker, emoji: Option<String>) -> Self {
        Self {
            image_data: Some(image_data),
            emoji,
        }
    }
}

/// Result of a successful upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedPack {
    /// Identifier assigned by the sticker service
    pub pack_id: String,
    /// Hex-encoded pack key (64 characters); the pack's shareable secret
    pub key: String,
}

/// Upload progress as reported by the sticker service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadProgress {
    /// Bytes (or assets) sent so far
    pub sent: u64,
    /// Total bytes (or assets) to send
    pub total: u64,
}

impl UploadProgress {
    /// Completion in the range 0.0..=1.0
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        (self.sent as f64 / self.total as f64).clamp(0.0, 1.0)
    }
}

/// Errors reported by the external sticker service
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ServiceError {
    /// The authenticated session could not be opened
    #[error("Failed to connect to sticker service: {0}")]
    Connect(String),
    /// The service rejected or aborted the upload
    #[error("Sticker upload failed: {0}")]
    Upload(String),
}

/// Errors that can occur while assembling or uploading a pack
///
/// These are terminal for the whole pack. Nothing is sent to the service
/// unless every step before the upload succeeded.
#[derive(Debug, thiserror::Error)]
pub enum PackError {
    /// Session credentials are missing
    #[error("Authentication failed: {reason}")]
    Authentication {
        /// What was missing
        reason: String,
    },

    /// The credential store could not be read
    #[error("Credential store unavailable: {reason}")]
    CredentialStore {
        /// The reason the store failed
        reason: String,
    },

    /// A sticker slot (or the cover, at index == sticker count) has no image
    #[error("Sticker {index} has no image data")]
    MissingImageData {
        /// Position of the offending slot
        index: usize,
    },

    /// Key generation or encryption failed
    #[error("Encryption failed: {reason}")]
    Encryption {
        /// The reason for encryption failure
        reason: String,
    },

    /// Decryption or authentication of a pack asset failed
    #[error("Decryption failed: {reason}")]
    Decryption {
        /// The reason for decryption failure
        reason: String,
    },

    /// Connecting to or uploading through the service failed
    #[error(transparent)]
    Upload(#[from] ServiceError),
}

impl PackError {
    /// Machine-readable kind of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Authentication { .. } | Self::CredentialStore { .. } => ErrorKind::Authentication,
            Self::MissingImageData { .. } => ErrorKind::MissingImageData,
            Self::Encryption { .. } | Self::Decryption { .. } => ErrorKind::Encryption,
            Self::Upload(_) => ErrorKind::Upload,
        }
    }

    /// Localization key for the message shown to the user
    pub fn message_key(&self) -> Option<&'static str> {
        match self {
            Self::Authentication { .. } | Self::CredentialStore { .. } => {
                Some("StickerCreator--Authentication--error")
            }
            Self::MissingImageData { .. } => Some("StickerCreator--Toasts--errorProcessing"),
            Self::Encryption { .. } | Self::Upload(_) => {
                Some("StickerCreator--Toasts--errorUploading")
            }
            Self::Decryption { .. } => None,
        }
    }
}
