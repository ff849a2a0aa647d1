//! Lossy WebP encoding via libwebp.
//!
//! Unlike JPEG, WebP carries alpha, so RGBA pixels are passed through as-is.

use super::EncodeError;
use crate::decode::DecodedImage;

/// Encode a decoded RGBA image to lossy WebP.
///
/// # Arguments
///
/// * `image` - RGBA image to encode
/// * `quality` - Encoder quality (1-100); out-of-range values are clamped
///
/// # Errors
///
/// Returns `EncodeError::InvalidDimensions` for a zero-sized image,
/// `EncodeError::InvalidPixelData` if the buffer length is wrong, and
/// `EncodeError::EncodingFailed` if libwebp rejects the input.
pub fn encode_webp(image: &DecodedImage, quality: u8) -> Result<Vec<u8>, EncodeError> {
    if image.width == 0 || image.height == 0 {
        return Err(EncodeError::InvalidDimensions {
            width: image.width,
            height: image.height,
        });
    }

    let expected = (image.width as usize) * (image.height as usize) * 4;
    if image.pixels.len() != expected {
        return Err(EncodeError::InvalidPixelData {
            expected,
            actual: image.pixels.len(),
        });
    }

    let encoder = ::webp::Encoder::from_rgba(&image.pixels, image.width, image.height);
    let encoded = encoder
        .encode_simple(false, quality.clamp(1, 100) as f32)
        .map_err(|e| EncodeError::EncodingFailed(format!("{e:?}")))?;

    Ok(encoded.to_vec())
}
