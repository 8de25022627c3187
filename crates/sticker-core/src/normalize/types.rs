//! Types produced and consumed by the sticker normalizer

use crate::error::ErrorKind;

/// Default quality for the lossy static encoder (0-100)
pub const DEFAULT_WEBP_QUALITY: f32 = 80.0;

/// Options for sticker normalization
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizeOptions {
    /// Quality passed to the lossy WebP encoder for static stickers (0-100)
    pub webp_quality: f32,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            webp_quality: DEFAULT_WEBP_QUALITY,
        }
    }
}

/// Which normalization policy produced a sticker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StickerKind {
    /// Decoded, fitted onto a 512x512 transparent canvas and re-encoded as WebP
    Static,
    /// Infinitely looping APNG, validated and passed through untouched
    AnimatedLoopable,
}

/// Metadata read from the source image before normalization
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageMeta {
    /// Source width in pixels
    pub width: u32,
    /// Source height in pixels
    pub height: u32,
    /// Source format as detected from the file header (e.g. "image/jpeg")
    pub format: Option<String>,
    /// Whether an APNG animation control chunk was found
    pub animated: bool,
}

/// A sticker ready to be placed in a pack
///
/// Immutable once produced. The `buffer` is exactly what gets encrypted and
/// uploaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedSticker {
    /// Path or identifier of the source image
    pub path: String,
    /// Encoded sticker bytes
    pub buffer: Vec<u8>,
    /// Content type of `buffer`
    pub content_type: String,
    /// `data:<mime>;base64,<...>` preview of `buffer`
    pub data_uri: String,
    /// Policy that produced this sticker
    pub kind: StickerKind,
    /// Metadata of the source image
    pub meta: ImageMeta,
}

/// Errors that can occur while normalizing a single image
///
/// These are terminal for that one image only; a batch may continue with the
/// next one.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NormalizeError {
    /// The image could not be decoded
    #[error("Failed to decode image: {reason}")]
    Decode {
        /// The reason for the decode failure
        reason: String,
    },

    /// The sticker is larger than the service accepts
    #[error("Sticker size {size} exceeds maximum allowed size {max_size}")]
    TooLarge {
        /// Encoded size in bytes
        size: usize,
        /// Maximum allowed size in bytes
        max_size: usize,
    },

    /// Animated sticker is not square
    #[error("Animated sticker must be square, got {width}x{height}")]
    NotSquare {
        /// The image width in pixels
        width: u32,
        /// The image height in pixels
        height: u32,
    },

    /// Animated sticker is too large
    #[error("Animated sticker dimension {dimension} exceeds maximum {max_dimension}")]
    DimensionsTooLarge {
        /// Edge length in pixels
        dimension: u32,
        /// Maximum allowed edge length
        max_dimension: u32,
    },

    /// Animated sticker is too small
    #[error("Animated sticker dimension {dimension} is below minimum {min_dimension}")]
    DimensionsTooSmall {
        /// Edge length in pixels
        dimension: u32,
        /// Minimum allowed edge length
        min_dimension: u32,
    },

    /// Animated sticker stops after a finite number of plays
    #[error("Animated sticker must loop forever, plays {plays} times")]
    MustLoopForever {
        /// Play count declared by the animation control chunk
        plays: u32,
    },

    /// The static sticker could not be encoded
    #[error("Failed to encode sticker: {reason}")]
    Encode {
        /// The reason for the encode failure
        reason: String,
    },
}

impl NormalizeError {
    /// Machine-readable kind of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Decode { .. } => ErrorKind::Decode,
            Self::TooLarge { .. } => ErrorKind::TooLarge,
            Self::NotSquare { .. } => ErrorKind::NotSquare,
            Self::DimensionsTooLarge { .. } => ErrorKind::DimensionsTooLarge,
            Self::DimensionsTooSmall { .. } => ErrorKind::DimensionsTooSmall,
            Self::MustLoopForever { .. } => ErrorKind::MustLoopForever,
            Self::Encode { .. } => ErrorKind::Encode,
        }
    }

    /// Localization key for the toast shown to the user
    pub fn message_key(&self) -> Option<&'static str> {
        let key = match self {
            Self::Decode { .. } | Self::Encode { .. } => "StickerCreator--Toasts--errorProcessing",
            Self::TooLarge { .. } => "StickerCreator--Toasts--tooLarge",
            Self::NotSquare { .. } => "StickerCreator--Toasts--APNG--notSquare",
            Self::DimensionsTooLarge { .. } => "StickerCreator--Toasts--APNG--dimensionsTooLarge",
            Self::DimensionsTooSmall { .. } => "StickerCreator--Toasts--APNG--dimensionsTooSmall",
            Self::MustLoopForever { .. } => "StickerCreator--Toasts--mustLoopForever",
        };
        Some(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_options_default() {
        let options = NormalizeOptions::default();
        assert_eq!(options.webp_quality, DEFAULT_WEBP_QUALITY);
    }

    #[test]
    fn test_every_error_has_a_message_key() {
        let errors = vec![
            NormalizeError::Decode {
                reason: "truncated".to_string(),
            },
            NormalizeError::TooLarge {
                size: 400_000,
                max_size: 307_200,
            },
            NormalizeError::NotSquare {
                width: 100,
                height: 200,
            },
            NormalizeError::DimensionsTooLarge {
                dimension: 600,
                max_dimension: 512,
            },
            NormalizeError::DimensionsTooSmall {
                dimension: 5,
                min_dimension: 10,
            },
            NormalizeError::MustLoopForever { plays: 3 },
            NormalizeError::Encode {
                reason: "encoder refused input".to_string(),
            },
        ];

        for error in errors {
            assert!(error.message_key().is_some());
            assert!(!error.to_string().is_empty());
        }
    }
}
