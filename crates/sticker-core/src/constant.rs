//! Constants shared with installing clients and the sticker service

/// Edge length (pixels) of every static sticker after normalization
pub const STICKER_SIZE: u32 = 512;

/// Smallest accepted edge length for animated stickers
pub const MIN_STICKER_DIMENSION: u32 = 10;

/// Largest accepted edge length for animated stickers
pub const MAX_STICKER_DIMENSION: u32 = 512;

/// Largest encoded sticker accepted by the service (300 KiB)
pub const MAX_STICKER_BYTE_LENGTH: usize = 300 * 1024;

/// Content type of animated stickers (APNG, uploaded untouched)
pub const ANIMATED_CONTENT_TYPE: &str = "image/png";

/// Content type of re-encoded static stickers
pub const STATIC_CONTENT_TYPE: &str = "image/webp";

/// Length of the per-pack random key
pub const PACK_KEY_LEN: usize = 32;

/// Length of the per-pack CBC initialization vector
pub const PACK_IV_LEN: usize = 16;

/// HKDF info label used to expand the pack key
pub(crate) const PACK_KEY_INFO: &[u8] = b"Sticker Pack";
