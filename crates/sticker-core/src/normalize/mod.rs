//! Image normalization for sticker packs
//!
//! This module validates user-supplied images and converts them into the
//! canonical sticker formats:
//! - APNG detection by chunk scan
//! - Validation of animated stickers (size, shape, looping)
//! - Contain-fit resize and lossy WebP encoding of static stickers

pub mod apng;
mod encode;
mod normalizer;
pub mod types;
mod validation;

pub use encode::data_uri;
pub use normalizer::StickerNormalizer;
pub use types::{ImageMeta, NormalizeError, NormalizeOptions, NormalizedSticker, StickerKind};
