//! Lossless re-encoding for PNG, GIF and BMP.
//!
//! These codecs have no quality parameter in the `image` crate, so the
//! quality factor is accepted upstream and ignored here.

use std::io::Cursor;

use image::DynamicImage;

use super::EncodeError;
use crate::decode::DecodedImage;
use crate::ImageFormat;

/// Encode a decoded RGBA image into a lossless container.
///
/// # Errors
///
/// Returns `EncodeError::Unsupported` if `format` is a lossy target,
/// `EncodeError::InvalidPixelData` if the buffer does not match the
/// dimensions, and `EncodeError::EncodingFailed` on codec failure.
pub fn encode_lossless(image: &DecodedImage, format: ImageFormat) -> Result<Vec<u8>, EncodeError> {
    if format.supports_quality() {
        return Err(EncodeError::Unsupported(format.mime_type().to_string()));
    }
    if image.width == 0 || image.height == 0 {
        return Err(EncodeError::InvalidDimensions {
            width: image.width,
            height: image.height,
        });
    }

    let expected = (image.width as usize) * (image.height as usize) * 4;
    let actual = image.pixels.len();
    let rgba = image
        .to_rgba_image()
        .ok_or(EncodeError::InvalidPixelData { expected, actual })?;

    let mut buffer = Cursor::new(Vec::new());
    DynamicImage::ImageRgba8(rgba)
        .write_to(&mut buffer, format.to_image_format())
        .map_err(|e| EncodeError::EncodingFailed(e.to_string()))?;

    Ok(buffer.into_inner())
}
