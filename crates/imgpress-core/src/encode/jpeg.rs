//! Lossy JPEG encoding.
//!
//! Quality maps to the 1-100 JPEG encoder scale. The
//! encoder has no alpha channel, so RGBA input is composited over black first,
//! matching what a canvas `toBlob("image/jpeg")` call produces.

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::{ExtendedColorType, ImageEncoder};

use super::EncodeError;
use crate::decode::DecodedImage;

/// Encode RGB pixel data to JPEG bytes.
///
/// # Arguments
///
/// * `pixels` - RGB pixel data (3 bytes per pixel, row-major order)
/// * `width` - Image width in pixels
/// * `height` - Image height in pixels
/// * `quality` - Encoder quality (1-100); out-of-range values are clamped
///
/// # Errors
///
/// Returns `EncodeError::InvalidDimensions` for a zero-sized image,
/// `EncodeError::InvalidPixelData` if the buffer length is wrong, and
/// `EncodeError::EncodingFailed` if the codec rejects the input.
pub fn encode_jpeg(
    pixels: &[u8],
    width: u32,
    height: u32,
    quality: u8,
) -> Result<Vec<u8>, EncodeError> {
    if width == 0 || height == 0 {
        return Err(EncodeError::InvalidDimensions { width, height });
    }

    let expected = (width as usize) * (height as usize) * 3;
    if pixels.len() != expected {
        return Err(EncodeError::InvalidPixelData {
            expected,
            actual: pixels.len(),
        });
    }

    let mut buffer = Cursor::new(Vec::new());
    JpegEncoder::new_with_quality(&mut buffer, quality.clamp(1, 100))
        .write_image(pixels, width, height, ExtendedColorType::Rgb8)
        .map_err(|e| EncodeError::EncodingFailed(e.to_string()))?;

    Ok(buffer.into_inner())
}

/// Encode a decoded RGBA image to JPEG, flattening alpha over black.
pub fn encode_jpeg_image(image: &DecodedImage, quality: u8) -> Result<Vec<u8>, EncodeError> {
    let expected = (image.width as usize) * (image.height as usize) * 4;
    if image.pixels.len() != expected {
        return Err(EncodeError::InvalidPixelData {
            expected,
            actual: image.pixels.len(),
        });
    }

    let rgb = flatten_over_black(&image.pixels);
    encode_jpeg(&rgb, image.width, image.height, quality)
}

/// Composite RGBA pixels over an opaque black background.
fn flatten_over_black(rgba: &[u8]) -> Vec<u8> {
    let mut rgb = Vec::with_capacity(rgba.len() / 4 * 3);
    for px in rgba.chunks_exact(4) {
        let alpha = px[3] as u32;
        if alpha == 255 {
            rgb.extend_from_slice(&px[..3]);
        } else {
            for &channel in &px[..3] {
                rgb.push(((channel as u32 * alpha + 127) / 255) as u8);
            }
        }
    }
    rgb
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient_rgb(width: u32, height: u32) -> Vec<u8> {
        let mut pixels = Vec::with_capacity((width * height * 3) as usize);
        for y in 0..height {
            for x in 0..width {
                pixels.push((x * 255 / width) as u8);
                pixels.push((y * 255 / height) as u8);
                pixels.push(((x ^ y) & 0xFF) as u8);
            }
        }
        pixels
    }

    #[test]
    fn test_encode_jpeg_markers() {
        let jpeg = encode_jpeg(&gradient_rgb(40, 30), 40, 30, 90).unwrap();

        assert_eq!(&jpeg[0..2], &[0xFF, 0xD8]);
        assert_eq!(&jpeg[jpeg.len() - 2..], &[0xFF, 0xD9]);
    }

    #[test]
    fn test_encode_jpeg_quality_affects_size() {
        let pixels = gradient_rgb(64, 64);

        let low = encode_jpeg(&pixels, 64, 64, 10).unwrap();
        let high = encode_jpeg(&pixels, 64, 64, 100).unwrap();

        assert!(high.len() > low.len(), "low={} high={}", low.len(), high.len());
    }

    #[test]
    fn test_encode_jpeg_quality_clamping() {
        let pixels = vec![128u8; 10 * 10 * 3];

        assert!(encode_jpeg(&pixels, 10, 10, 0).is_ok());
        assert!(encode_jpeg(&pixels, 10, 10, 255).is_ok());
    }

    #[test]
    fn test_encode_jpeg_invalid_pixel_data() {
        let pixels = vec![128u8; 99 * 100 * 3];

        let result = encode_jpeg(&pixels, 100, 100, 90);
        assert!(matches!(result, Err(EncodeError::InvalidPixelData { .. })));
    }

    #[test]
    fn test_encode_jpeg_zero_dimensions() {
        assert!(matches!(
            encode_jpeg(&[], 0, 10, 90),
            Err(EncodeError::InvalidDimensions { .. })
        ));
        assert!(matches!(
            encode_jpeg(&[], 10, 0, 90),
            Err(EncodeError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn test_encode_jpeg_image_from_rgba() {
        let image = DecodedImage::new(8, 8, vec![200u8; 8 * 8 * 4]);
        let jpeg = encode_jpeg_image(&image, 80).unwrap();
        assert_eq!(&jpeg[0..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn test_encode_jpeg_image_bad_buffer() {
        let image = DecodedImage {
            width: 8,
            height: 8,
            pixels: vec![0u8; 8 * 8 * 3],
        };
        assert!(matches!(
            encode_jpeg_image(&image, 80),
            Err(EncodeError::InvalidPixelData { .. })
        ));
    }

    #[test]
    fn test_flatten_over_black() {
        let rgba = [
            255, 255, 255, 255, // opaque white
            255, 255, 255, 0, // transparent white
            200, 100, 50, 128, // half alpha
        ];
        let rgb = flatten_over_black(&rgba);

        assert_eq!(&rgb[0..3], &[255, 255, 255]);
        assert_eq!(&rgb[3..6], &[0, 0, 0]);
        assert_eq!(&rgb[6..9], &[100, 50, 25]);
    }
}
