//! Image encoding for the transcode pipeline.
//!
//! This module provides functionality for:
//! - Encoding images to JPEG and WebP with a configurable quality
//! - Re-encoding PNG, GIF and BMP losslessly
//!
//! [`encode_image`] picks the codec from the target [`ImageFormat`], so the
//! output container always matches the source container.
//!
//! # Examples
//!
//! ```ignore
//! use imgpress_core::encode::encode_jpeg;
//!
//! let pixels = vec![128u8; 100 * 100 * 3]; // Gray image
//! let jpeg_bytes = encode_jpeg(&pixels, 100, 100, 90).unwrap();
//! println!("Encoded {} bytes", jpeg_bytes.len());
//! ```

mod jpeg;
mod lossless;
mod webp;

use thiserror::Error;

use crate::decode::DecodedImage;
use crate::{ImageFormat, Quality};

pub use jpeg::{encode_jpeg, encode_jpeg_image};
pub use lossless::encode_lossless;
pub use self::webp::encode_webp;

/// Errors that can occur during encoding.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    /// Pixel data length doesn't match expected dimensions
    #[error("Invalid pixel data: expected {expected} bytes, got {actual}")]
    InvalidPixelData { expected: usize, actual: usize },

    /// Width or height is zero
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// The codec cannot produce this target
    #[error("Encoding to {0} is not supported")]
    Unsupported(String),

    /// The codec reported a failure
    #[error("Encoding failed: {0}")]
    EncodingFailed(String),

    /// The codec finished without producing any bytes
    #[error("Encoder produced no data")]
    EmptyOutput,
}

/// Encode an image into `format`, applying `quality` where the codec supports it.
pub fn encode_image(
    image: &DecodedImage,
    format: ImageFormat,
    quality: Quality,
) -> Result<Vec<u8>, EncodeError> {
    let bytes = match format {
        ImageFormat::Jpeg => {
            if image.has_transparency() {
                log::debug!("flattening alpha over black for JPEG output");
            }
            encode_jpeg_image(image, quality.to_percent())?
        }
        ImageFormat::WebP => encode_webp(image, quality.to_percent())?,
        _ => encode_lossless(image, format)?,
    };

    if bytes.is_empty() {
        return Err(EncodeError::EmptyOutput);
    }
    Ok(bytes)
}
