//! Image derivative pass: decode, resize to fit the display bound, re-encode
//! as lossy WebP. CPU-bound; callers run it on a blocking thread.

use std::path::Path;

use anyhow::{Context, Result};
use image::imageops::FilterType;
use image::GenericImageView;

/// Longest allowed side of a derivative. Larger originals are scaled down to
/// fit, preserving aspect ratio; smaller ones are never upscaled.
pub const MAX_DIMENSION: u32 = 1920;

pub const WEBP_QUALITY: f32 = 85.0;

/// Derivative name for a stored original: `opt-<stem>.webp`.
pub fn optimized_filename(stored_name: &str) -> String {
    let stem = Path::new(stored_name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(stored_name);
    format!("opt-{stem}.webp")
}

/// Produces the encoded derivative bytes for an uploaded image.
pub fn encode_derivative(bytes: &[u8]) -> Result<Vec<u8>> {
    let img = image::load_from_memory(bytes).context("decode uploaded image")?;

    let img = if img.width() > MAX_DIMENSION || img.height() > MAX_DIMENSION {
        img.resize(MAX_DIMENSION, MAX_DIMENSION, FilterType::Lanczos3)
    } else {
        img
    };

    // Re-encoding from raw pixels also drops any EXIF metadata.
    let rgba = img.to_rgba8();
    let encoded = webp::Encoder::from_rgba(&rgba, img.width(), img.height()).encode(WEBP_QUALITY);
    Ok(encoded.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbImage;
    use std::io::Cursor;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = RgbImage::from_fn(width, height, |x, y| {
            image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
        });
        let mut out = Cursor::new(Vec::new());
        image::DynamicImage::ImageRgb8(img)
            .write_to(&mut out, image::ImageFormat::Png)
            .expect("encode png");
        out.into_inner()
    }

    #[test]
    fn large_image_is_scaled_to_fit_preserving_aspect() {
        let derivative = encode_derivative(&png_bytes(3840, 1920)).unwrap();
        let img = image::load_from_memory(&derivative).unwrap();
        assert_eq!(img.dimensions(), (1920, 960));
    }

    #[test]
    fn small_image_is_not_upscaled() {
        let derivative = encode_derivative(&png_bytes(120, 60)).unwrap();
        let img = image::load_from_memory(&derivative).unwrap();
        assert_eq!(img.dimensions(), (120, 60));
    }

    #[test]
    fn derivative_is_webp() {
        let derivative = encode_derivative(&png_bytes(64, 64)).unwrap();
        assert_eq!(&derivative[..4], b"RIFF");
        assert_eq!(&derivative[8..12], b"WEBP");
    }

    #[test]
    fn garbage_bytes_fail_to_decode() {
        assert!(encode_derivative(b"definitely not an image").is_err());
    }

    #[test]
    fn optimized_filename_swaps_extension() {
        assert_eq!(
            optimized_filename("1700000000000-abc123def.png"),
            "opt-1700000000000-abc123def.webp"
        );
        assert_eq!(optimized_filename("noext"), "opt-noext.webp");
    }
}
