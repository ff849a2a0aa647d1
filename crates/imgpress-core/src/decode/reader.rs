//! Container-agnostic decoding with EXIF orientation handling.

use std::io::Cursor;

use exif::{In, Reader, Tag};
use image::{DynamicImage, ImageError, ImageReader};

use super::{DecodeError, DecodedImage, Orientation};

/// Decode image bytes in any supported container, applying EXIF orientation.
///
/// The container is sniffed from the bytes rather than trusted from the
/// declared MIME type, the same way a browser `<img>` element decodes.
///
/// # Errors
///
/// Returns `DecodeError::InvalidFormat` if the bytes are not a recognized image.
/// Returns `DecodeError::CorruptedFile` if the image is corrupted or truncated.
pub fn decode_image(bytes: &[u8]) -> Result<DecodedImage, DecodeError> {
    let orientation = read_orientation(bytes);
    let img = decode_dynamic(bytes)?;
    let oriented = apply_orientation(img, orientation);

    let decoded = DecodedImage::from_rgba_image(oriented.into_rgba8());
    if decoded.is_empty() {
        return Err(DecodeError::EmptyImage {
            width: decoded.width,
            height: decoded.height,
        });
    }

    log::debug!(
        "decoded {}x{} image (orientation {:?})",
        decoded.width,
        decoded.height,
        orientation
    );
    Ok(decoded)
}

fn decode_dynamic(bytes: &[u8]) -> Result<DynamicImage, DecodeError> {
    if bytes.is_empty() {
        return Err(DecodeError::InvalidFormat);
    }

    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;

    if reader.format().is_none() {
        return Err(DecodeError::InvalidFormat);
    }

    reader.decode().map_err(|e| match e {
        ImageError::Unsupported(_) => DecodeError::InvalidFormat,
        other => DecodeError::CorruptedFile(other.to_string()),
    })
}

/// Extract EXIF orientation from image bytes.
///
/// Returns `Orientation::Normal` if no EXIF data is found or orientation
/// cannot be determined.
fn read_orientation(bytes: &[u8]) -> Orientation {
    let mut cursor = Cursor::new(bytes);

    match Reader::new().read_from_container(&mut cursor) {
        Ok(exif) => exif
            .get_field(Tag::Orientation, In::PRIMARY)
            .and_then(|field| field.value.get_uint(0))
            .map(Orientation::from)
            .unwrap_or_default(),
        Err(_) => Orientation::Normal,
    }
}

/// Apply EXIF orientation transformation to an image.
fn apply_orientation(img: DynamicImage, orientation: Orientation) -> DynamicImage {
    match orientation {
        Orientation::Normal => img,
        Orientation::FlipHorizontal => img.fliph(),
        Orientation::Rotate180 => img.rotate180(),
        Orientation::FlipVertical => img.flipv(),
        Orientation::Transpose => img.rotate90().fliph(),
        Orientation::Rotate90CW => img.rotate90(),
        Orientation::Transverse => img.rotate270().fliph(),
        Orientation::Rotate270CW => img.rotate270(),
    }
}
