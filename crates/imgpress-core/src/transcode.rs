//! Decode, fit and re-encode in one call.
//!
//! [`transcode`] is the single operation the browser UI drives. It is a pure
//! request/response transform: nothing is cached between calls, so every
//! request decodes the source again.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::decode::{self, DecodeError, FilterType};
use crate::dimensions::{Dimensions, MAX_HEIGHT, MAX_WIDTH};
use crate::encode::{self, EncodeError};
use crate::{format_file_size, ImageFormat, Quality};

/// Errors a transcode request can end with. All are terminal for that request.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TranscodeError {
    /// The selected file is not an image at all.
    #[error("Not an image file: {0}")]
    InvalidInput(String),

    /// The declared MIME type has no matching encoder.
    #[error("Unsupported image format: {0}")]
    UnsupportedFormat(String),

    /// The quality factor is outside (0, 1].
    #[error("Quality must be in (0, 1], got {0}")]
    InvalidQuality(f64),

    #[error("Invalid transcode options: {0}")]
    InvalidOptions(String),

    #[error("Failed to decode image: {0}")]
    Decode(#[from] DecodeError),

    #[error("Failed to encode image: {0}")]
    Encode(#[from] EncodeError),
}

/// Raw bytes of a user-selected file plus what the browser declared about it.
///
/// Immutable once built; sessions share it behind an `Arc` and replace it
/// wholesale when a new file is picked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceImage {
    bytes: Vec<u8>,
    mime_type: String,
    name: String,
}

impl SourceImage {
    pub fn new(bytes: Vec<u8>, mime_type: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            bytes,
            mime_type: mime_type.into(),
            name: name.into(),
        }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// Original file name, used to derive the download name.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn byte_len(&self) -> usize {
        self.bytes.len()
    }

    /// The re-encodable format the MIME type declares, if any.
    pub fn format(&self) -> Option<ImageFormat> {
        ImageFormat::from_mime(&self.mime_type)
    }
}

/// Tunables for [`transcode_with_options`].
///
/// Deserializes from a partial object; missing fields fall back to the
/// defaults of 1920 x 1080 and Lanczos3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TranscodeOptions {
    pub max_width: u32,
    pub max_height: u32,
    pub filter: FilterType,
}

impl Default for TranscodeOptions {
    fn default() -> Self {
        Self {
            max_width: MAX_WIDTH,
            max_height: MAX_HEIGHT,
            filter: FilterType::default(),
        }
    }
}

impl TranscodeOptions {
    pub fn validate(&self) -> Result<(), TranscodeError> {
        if self.max_width == 0 || self.max_height == 0 {
            return Err(TranscodeError::InvalidOptions(format!(
                "bounds must be non-zero, got {}x{}",
                self.max_width, self.max_height
            )));
        }
        Ok(())
    }
}

/// Encoded output of one transcode request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressionResult {
    bytes: Vec<u8>,
    format: ImageFormat,
    dimensions: Dimensions,
}

impl CompressionResult {
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn byte_len(&self) -> usize {
        self.bytes.len()
    }

    /// Always the source's format.
    pub fn format(&self) -> ImageFormat {
        self.format
    }

    pub fn mime_type(&self) -> &'static str {
        self.format.mime_type()
    }

    pub fn dimensions(&self) -> Dimensions {
        self.dimensions
    }
}

/// Transcode with the default 1920 x 1080 bounds and Lanczos3 filter.
pub fn transcode(
    source: &SourceImage,
    quality: Quality,
) -> Result<CompressionResult, TranscodeError> {
    transcode_with_options(source, quality, &TranscodeOptions::default())
}

/// Decode `source`, shrink it to fit the bounds in `options` and re-encode
/// it in the source's own format at `quality`.
///
/// # Errors
///
/// - `UnsupportedFormat` if the declared MIME type cannot be re-encoded
/// - `InvalidOptions` for zero bounds
/// - `Decode` if the bytes are not a readable image
/// - `Encode` if the codec fails or yields no bytes
pub fn transcode_with_options(
    source: &SourceImage,
    quality: Quality,
    options: &TranscodeOptions,
) -> Result<CompressionResult, TranscodeError> {
    options.validate()?;
    let format = source
        .format()
        .ok_or_else(|| TranscodeError::UnsupportedFormat(source.mime_type().to_string()))?;

    let decoded = decode::decode_image(source.bytes())?;
    let fitted = decode::resize_to_bounds(
        &decoded,
        options.max_width,
        options.max_height,
        options.filter,
    )?;
    let bytes = encode::encode_image(&fitted, format, quality)?;

    log::debug!(
        "transcoded {} {}x{} -> {}x{} at {}: {} -> {}",
        format,
        decoded.width,
        decoded.height,
        fitted.width,
        fitted.height,
        quality,
        format_file_size(source.byte_len() as u64),
        format_file_size(bytes.len() as u64),
    );

    Ok(CompressionResult {
        bytes,
        format,
        dimensions: fitted.dimensions(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, Rgba, RgbaImage};
    use std::io::Cursor;

    fn encoded(width: u32, height: u32, format: image::ImageFormat) -> Vec<u8> {
        let img = RgbaImage::from_fn(width, height, |x, y| {
            Rgba([
                (x * 255 / width) as u8,
                (y * 255 / height) as u8,
                ((x * 7 + y * 13) % 256) as u8,
                255,
            ])
        });
        let mut buf = Cursor::new(Vec::new());
        let dynamic = match format {
            image::ImageFormat::Jpeg => DynamicImage::from(DynamicImage::ImageRgba8(img).into_rgb8()),
            _ => DynamicImage::ImageRgba8(img),
        };
        dynamic.write_to(&mut buf, format).unwrap();
        buf.into_inner()
    }

    fn jpeg_source(width: u32, height: u32) -> SourceImage {
        SourceImage::new(
            encoded(width, height, image::ImageFormat::Jpeg),
            "image/jpeg",
            "photo.jpg",
        )
    }

    fn small_bounds() -> TranscodeOptions {
        TranscodeOptions {
            max_width: 192,
            max_height: 108,
            ..Default::default()
        }
    }

    #[test]
    fn test_small_image_keeps_dimensions() {
        let result = transcode(&jpeg_source(120, 80), Quality::default()).unwrap();

        assert_eq!(result.dimensions(), Dimensions::new(120, 80));
        assert_eq!(result.mime_type(), "image/jpeg");
        assert_eq!(result.byte_len(), result.bytes().len());
    }

    #[test]
    fn test_wide_image_default_bounds() {
        let source = SourceImage::new(
            encoded(2400, 600, image::ImageFormat::Png),
            "image/png",
            "wide.png",
        );
        let result = transcode(&source, Quality::MAX).unwrap();

        assert_eq!(result.dimensions(), Dimensions::new(1920, 480));
        let decoded = image::load_from_memory(result.bytes()).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (1920, 480));
    }

    #[test]
    fn test_tall_image_clamped_by_height() {
        let result =
            transcode_with_options(&jpeg_source(100, 400), Quality::MAX, &small_bounds()).unwrap();
        assert_eq!(result.dimensions(), Dimensions::new(27, 108));
    }

    #[test]
    fn test_output_format_matches_source() {
        for (format, mime) in [
            (image::ImageFormat::Png, "image/png"),
            (image::ImageFormat::WebP, "image/webp"),
            (image::ImageFormat::Gif, "image/gif"),
            (image::ImageFormat::Bmp, "image/bmp"),
            (image::ImageFormat::Jpeg, "image/jpeg"),
        ] {
            let source = SourceImage::new(encoded(40, 30, format), mime, "f");
            let result = transcode(&source, Quality::default()).unwrap();

            assert_eq!(result.mime_type(), mime);
            let guessed = image::guess_format(result.bytes()).unwrap();
            assert_eq!(guessed, format);
        }
    }

    #[test]
    fn test_jpeg_quality_affects_size() {
        let source = jpeg_source(160, 120);
        let high = transcode(&source, Quality::MAX).unwrap();
        let low = transcode(&source, Quality::new(0.1).unwrap()).unwrap();

        assert!(high.byte_len() >= low.byte_len());
    }

    #[test]
    fn test_webp_quality_affects_size() {
        let mut state = 0x2545_F491u32;
        let noisy = RgbaImage::from_fn(200, 150, |_, _| {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            let [r, g, b, _] = state.to_le_bytes();
            Rgba([r, g, b, 255])
        });
        let mut buf = Cursor::new(Vec::new());
        DynamicImage::ImageRgba8(noisy)
            .write_to(&mut buf, image::ImageFormat::WebP)
            .unwrap();
        let source = SourceImage::new(buf.into_inner(), "image/webp", "noise.webp");

        let high = transcode(&source, Quality::MAX).unwrap();
        let low = transcode(&source, Quality::new(0.1).unwrap()).unwrap();

        assert_eq!(low.mime_type(), "image/webp");
        assert!(low.byte_len() < high.byte_len());
    }

    #[test]
    fn test_repeat_transcode_same_length() {
        let source = jpeg_source(90, 60);
        let q = Quality::from_percent(55).unwrap();

        let a = transcode(&source, q).unwrap();
        let b = transcode(&source, q).unwrap();
        assert_eq!(a.byte_len(), b.byte_len());
        assert_eq!(a.bytes(), b.bytes());
    }

    #[test]
    fn test_declared_mime_drives_output_format() {
        // PNG bytes declared as JPEG re-encode as JPEG.
        let source = SourceImage::new(
            encoded(20, 20, image::ImageFormat::Png),
            "image/jpeg",
            "mislabeled.jpg",
        );
        let result = transcode(&source, Quality::default()).unwrap();
        assert_eq!(&result.bytes()[0..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn test_decode_error() {
        let source = SourceImage::new(vec![1, 2, 3, 4], "image/png", "broken.png");
        assert!(matches!(
            transcode(&source, Quality::default()),
            Err(TranscodeError::Decode(_))
        ));
    }

    #[test]
    fn test_unsupported_format() {
        let source = SourceImage::new(
            encoded(4, 4, image::ImageFormat::Png),
            "image/svg+xml",
            "x.svg",
        );
        assert_eq!(
            transcode(&source, Quality::default()),
            Err(TranscodeError::UnsupportedFormat("image/svg+xml".to_string()))
        );
    }

    #[test]
    fn test_zero_bounds_rejected() {
        let options = TranscodeOptions {
            max_width: 0,
            ..Default::default()
        };
        assert!(matches!(
            transcode_with_options(&jpeg_source(4, 4), Quality::MAX, &options),
            Err(TranscodeError::InvalidOptions(_))
        ));
    }

    #[test]
    fn test_png_alpha_survives() {
        let mut img = RgbaImage::from_pixel(8, 8, Rgba([10, 20, 30, 255]));
        img.put_pixel(3, 3, Rgba([0, 0, 0, 0]));
        let mut buf = Cursor::new(Vec::new());
        DynamicImage::ImageRgba8(img)
            .write_to(&mut buf, image::ImageFormat::Png)
            .unwrap();

        let source = SourceImage::new(buf.into_inner(), "image/png", "alpha.png");
        let result = transcode(&source, Quality::default()).unwrap();
        let out = image::load_from_memory(result.bytes()).unwrap().into_rgba8();
        assert_eq!(out.get_pixel(3, 3)[3], 0);
    }

    #[test]
    fn test_options_deserialize_partial() {
        use serde::de::value::{Error as ValueError, MapDeserializer};

        let fields = vec![("maxWidth", 640u32)];
        let options =
            TranscodeOptions::deserialize(MapDeserializer::<_, ValueError>::new(fields.into_iter()))
                .unwrap();
        assert_eq!(options.max_width, 640);
        assert_eq!(options.max_height, MAX_HEIGHT);
        assert_eq!(options.filter, FilterType::Lanczos3);
    }

    #[test]
    fn test_error_display() {
        let err = TranscodeError::from(DecodeError::InvalidFormat);
        assert_eq!(
            err.to_string(),
            "Failed to decode image: Invalid or unsupported image format"
        );
        let err = TranscodeError::from(EncodeError::EmptyOutput);
        assert_eq!(err.to_string(), "Failed to encode image: Encoder produced no data");
    }
}
