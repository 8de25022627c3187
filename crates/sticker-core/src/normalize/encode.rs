//! Static sticker canvas fitting and encoding

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use image::imageops::{self, FilterType};
use image::{DynamicImage, GenericImageView, Rgba, RgbaImage};

use crate::normalize::types::NormalizeError;

/// Fit an image inside a `size`x`size` transparent canvas
///
/// The image is scaled (up or down) until its longer edge equals `size`,
/// keeping its aspect ratio, then centered. Nothing is cropped; the shorter
/// axis is padded with fully transparent pixels.
pub(crate) fn contain(img: &DynamicImage, size: u32) -> RgbaImage {
    let (width, height) = img.dimensions();
    let scale = f64::min(
        f64::from(size) / f64::from(width),
        f64::from(size) / f64::from(height),
    );
    let fit_width = ((f64::from(width) * scale).round() as u32).clamp(1, size);
    let fit_height = ((f64::from(height) * scale).round() as u32).clamp(1, size);

    let resized = img
        .resize_exact(fit_width, fit_height, FilterType::Lanczos3)
        .to_rgba8();

    let mut canvas = RgbaImage::from_pixel(size, size, Rgba([0, 0, 0, 0]));
    let x = (size - fit_width) / 2;
    let y = (size - fit_height) / 2;
    // Copy rather than blend so source alpha is preserved as-is
    imageops::replace(&mut canvas, &resized, i64::from(x), i64::from(y));
    canvas
}

/// Encode an RGBA canvas as lossy WebP
pub(crate) fn encode_webp(canvas: &RgbaImage, quality: f32) -> Result<Vec<u8>, NormalizeError> {
    let encoder = webp::Encoder::from_rgba(canvas.as_raw(), canvas.width(), canvas.height());
    let encoded = encoder
        .encode_simple(false, quality.clamp(0.0, 100.0))
        .map_err(|e| NormalizeError::Encode {
            reason: format!("WebP encoder failed: {:?}", e),
        })?;
    Ok(encoded.to_vec())
}

/// Build a `data:` URI previewing an encoded sticker
pub fn data_uri(content_type: &str, buffer: &[u8]) -> String {
    format!("data:{};base64,{}", content_type, STANDARD.encode(buffer))
}
