//! Fixtures for unit tests

use std::io::Cursor;
use std::sync::OnceLock;

use image::{ImageFormat, Rgba, RgbaImage};

use crate::normalize::{ImageMeta, NormalizedSticker, StickerKind};

/// Encode an opaque gradient of the given size as PNG
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = RgbaImage::from_fn(width, height, |x, y| {
        Rgba([(x % 256) as u8, (y % 256) as u8, 128, 255])
    });
    encode_png(&img)
}

/// Encode pseudo-random opaque pixels as PNG (does not compress well)
pub fn noise_png_bytes(width: u32, height: u32, seed: u32) -> Vec<u8> {
    let mut state = seed.max(1);
    let img = RgbaImage::from_fn(width, height, |_, _| {
        state ^= state << 13;
        state ^= state >> 17;
        state ^= state << 5;
        let [r, g, b, _] = state.to_le_bytes();
        Rgba([r, g, b, 255])
    });
    encode_png(&img)
}

/// Encode pseudo-random pixels with random alpha as PNG
pub fn noise_rgba_png_bytes(width: u32, height: u32, seed: u32) -> Vec<u8> {
    let mut state = seed.max(1);
    let img = RgbaImage::from_fn(width, height, |_, _| {
        state ^= state << 13;
        state ^= state >> 17;
        state ^= state << 5;
        Rgba(state.to_le_bytes())
    });
    encode_png(&img)
}

fn encode_png(img: &RgbaImage) -> Vec<u8> {
    let mut buffer = Vec::new();
    img.write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)
        .unwrap();
    buffer
}

/// Turn a still PNG into a single-frame APNG with the given play count
///
/// Inserts `acTL` and `fcTL` right after `IHDR`, so the default image becomes
/// the first animation frame.
pub fn apng_from_png(png: &[u8], num_plays: u32) -> Vec<u8> {
    // signature (8) + IHDR chunk (4 + 4 + 13 + 4)
    let ihdr_end = 33;
    let width = &png[16..20];
    let height = &png[20..24];

    let mut actl = Vec::new();
    actl.extend_from_slice(&1u32.to_be_bytes());
    actl.extend_from_slice(&num_plays.to_be_bytes());

    let mut fctl = Vec::new();
    fctl.extend_from_slice(&0u32.to_be_bytes()); // sequence number
    fctl.extend_from_slice(width);
    fctl.extend_from_slice(height);
    fctl.extend_from_slice(&0u32.to_be_bytes()); // x offset
    fctl.extend_from_slice(&0u32.to_be_bytes()); // y offset
    fctl.extend_from_slice(&1u16.to_be_bytes()); // delay numerator
    fctl.extend_from_slice(&10u16.to_be_bytes()); // delay denominator
    fctl.push(0); // dispose op
    fctl.push(0); // blend op

    let mut out = png[..ihdr_end].to_vec();
    out.extend_from_slice(&chunk(b"acTL", &actl));
    out.extend_from_slice(&chunk(b"fcTL", &fctl));
    out.extend_from_slice(&png[ihdr_end..]);
    out
}

/// Frame a PNG chunk (length, type, data, CRC)
pub fn chunk(chunk_type: &[u8; 4], data: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(data.len() + 12);
    out.extend_from_slice(&(data.len() as u32).to_be_bytes());
    out.extend_from_slice(chunk_type);
    out.extend_from_slice(data);
    let mut hasher = crc32fast::Hasher::new();
    hasher.update(chunk_type);
    hasher.update(data);
    out.extend_from_slice(&hasher.finalize().to_be_bytes());
    out
}

/// A normalized sticker with arbitrary bytes, for pack assembly tests
pub fn sticker(path: &str, buffer: Vec<u8>) -> NormalizedSticker {
    NormalizedSticker {
        path: path.to_string(),
        buffer,
        content_type: "image/webp".to_string(),
        data_uri: String::new(),
        kind: StickerKind::Static,
        meta: ImageMeta {
            width: 512,
            height: 512,
            format: Some("image/webp".to_string()),
            animated: false,
        },
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

/// Install the in-memory keyring store once per test process
pub fn ensure_mock_store() {
    static MOCK_STORE_INIT: OnceLock<()> = OnceLock::new();
    MOCK_STORE_INIT.get_or_init(|| {
        keyring_core::set_default_store(keyring_core::mock::Store::new().unwrap());
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_iend_chunk_matches_png_encoder() {
        let png = png_bytes(4, 4);
        assert_eq!(chunk(b"IEND", &[]), png[png.len() - 12..]);
    }
}
