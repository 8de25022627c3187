//! Sticker normalizer
//!
//! Turns a raw user image into a [`NormalizedSticker`]. The policy is chosen
//! by sniffing the bytes, never by file extension:
//!
//! - APNG (an `acTL` chunk before the image data): validated and passed
//!   through unchanged, since the image library cannot re-encode animation.
//! - Anything else the decoder understands: fitted onto a transparent
//!   512x512 canvas and re-encoded as lossy WebP.

use std::io::Cursor;

use image::{ImageFormat, ImageReader};

use crate::constant::{ANIMATED_CONTENT_TYPE, STATIC_CONTENT_TYPE, STICKER_SIZE};
use crate::normalize::apng::{self, AnimationControl};
use crate::normalize::encode::{contain, data_uri, encode_webp};
use crate::normalize::types::{
    ImageMeta, NormalizeError, NormalizeOptions, NormalizedSticker, StickerKind,
};
use crate::normalize::validation::{validate_animated, validate_byte_length};

/// Normalization policy selected by content sniffing
#[derive(Debug, Clone, Copy)]
enum Policy {
    Static,
    AnimatedLoopable(AnimationControl),
}

impl Policy {
    fn sniff(data: &[u8]) -> Self {
        match apng::find_animation_control(data) {
            Some(control) => Self::AnimatedLoopable(control),
            None => Self::Static,
        }
    }

    fn kind(&self) -> StickerKind {
        match self {
            Self::Static => StickerKind::Static,
            Self::AnimatedLoopable(_) => StickerKind::AnimatedLoopable,
        }
    }
}

/// Converts raw images into stickers
#[derive(Debug, Clone, Default)]
pub struct StickerNormalizer {
    options: NormalizeOptions,
}

impl StickerNormalizer {
    /// Create a normalizer with the given options
    pub fn new(options: NormalizeOptions) -> Self {
        Self { options }
    }

    /// Options this normalizer was built with
    pub fn options(&self) -> &NormalizeOptions {
        &self.options
    }

    /// Normalize one image
    ///
    /// `path` is carried through to the result so callers can match stickers
    /// back to the files they picked.
    ///
    /// # Errors
    /// * `Decode` - the header or pixel data cannot be read
    /// * `TooLarge` - the (final) buffer exceeds 300 KiB
    /// * `NotSquare` / `DimensionsTooLarge` / `DimensionsTooSmall` /
    ///   `MustLoopForever` - APNG constraints
    /// * `Encode` - the WebP encoder failed
    pub fn normalize(&self, path: &str, data: &[u8]) -> Result<NormalizedSticker, NormalizeError> {
        let reader = ImageReader::new(Cursor::new(data))
            .with_guessed_format()
            .map_err(|e| NormalizeError::Decode {
                reason: format!("Failed to read image: {}", e),
            })?;
        let format = reader.format();
        let (width, height) = reader
            .into_dimensions()
            .map_err(|e| NormalizeError::Decode {
                reason: format!("Failed to get image dimensions: {}", e),
            })?;
        if width == 0 || height == 0 {
            return Err(NormalizeError::Decode {
                reason: format!("Image has empty dimensions {}x{}", width, height),
            });
        }

        let policy = Policy::sniff(data);
        let meta = ImageMeta {
            width,
            height,
            format: format.map(|f| f.to_mime_type().to_string()),
            animated: matches!(policy, Policy::AnimatedLoopable(_)),
        };

        tracing::debug!(
            target: "sticker_core::normalize",
            path,
            width,
            height,
            size = data.len(),
            kind = ?policy.kind(),
            "Normalizing sticker"
        );

        let (buffer, content_type) = match policy {
            Policy::AnimatedLoopable(control) => {
                validate_animated(data.len(), width, height, &control)?;
                (data.to_vec(), ANIMATED_CONTENT_TYPE)
            }
            Policy::Static => (self.encode_static(data, format)?, STATIC_CONTENT_TYPE),
        };

        Ok(NormalizedSticker {
            path: path.to_string(),
            data_uri: data_uri(content_type, &buffer),
            buffer,
            content_type: content_type.to_string(),
            kind: policy.kind(),
            meta,
        })
    }

    /// Normalize one image on the blocking thread pool
    ///
    /// Decoding and resizing are CPU-bound; async callers should use this
    /// instead of [`StickerNormalizer::normalize`].
    pub async fn normalize_blocking(
        &self,
        path: String,
        data: Vec<u8>,
    ) -> Result<NormalizedSticker, NormalizeError> {
        let normalizer = self.clone();
        tokio::task::spawn_blocking(move || normalizer.normalize(&path, &data))
            .await
            .map_err(|e| NormalizeError::Decode {
                reason: format!("Normalizer task failed: {}", e),
            })?
    }

    fn encode_static(
        &self,
        data: &[u8],
        format: Option<ImageFormat>,
    ) -> Result<Vec<u8>, NormalizeError> {
        let decoded = match format {
            Some(format) => image::load_from_memory_with_format(data, format),
            None => image::load_from_memory(data),
        }
        .map_err(|e| NormalizeError::Decode {
            reason: format!("Failed to decode image: {}", e),
        })?;

        let canvas = contain(&decoded, STICKER_SIZE);
        let encoded = encode_webp(&canvas, self.options.webp_quality)?;
        validate_byte_length(encoded.len())?;
        Ok(encoded)
    }
}
