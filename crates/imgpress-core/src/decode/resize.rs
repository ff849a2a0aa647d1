//! Image resizing for the transcode pipeline.
//!
//! All functions return new `DecodedImage` instances without modifying the input.

use super::{DecodeError, DecodedImage, FilterType};

/// Resize an image to exact dimensions.
///
/// # Errors
///
/// Returns `DecodeError::EmptyImage` if a target dimension is zero, and
/// `DecodeError::CorruptedFile` if the pixel buffer does not match the
/// declared dimensions.
pub fn resize(
    image: &DecodedImage,
    width: u32,
    height: u32,
    filter: FilterType,
) -> Result<DecodedImage, DecodeError> {
    if width == 0 || height == 0 {
        return Err(DecodeError::EmptyImage { width, height });
    }

    // Fast path: if dimensions match, just clone
    if image.width == width && image.height == height {
        return Ok(image.clone());
    }

    let rgba_image = image
        .to_rgba_image()
        .ok_or_else(|| DecodeError::CorruptedFile("Failed to create RgbaImage".to_string()))?;

    let resized = image::imageops::resize(&rgba_image, width, height, filter.to_image_filter());

    Ok(DecodedImage::from_rgba_image(resized))
}

/// Resize an image so it fits within `max_width` x `max_height`.
///
/// Uses the width-then-height clamp from [`crate::Dimensions::fit_within`]. Images
/// that already fit are returned unchanged (never upscaled).
pub fn resize_to_bounds(
    image: &DecodedImage,
    max_width: u32,
    max_height: u32,
    filter: FilterType,
) -> Result<DecodedImage, DecodeError> {
    let target = image.dimensions().fit_within(max_width, max_height);
    resize(image, target.width, target.height, filter)
}
