//! Container formats the transcoder can re-encode, keyed by MIME type.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A container format the pipeline can both decode and encode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ImageFormat {
    Jpeg,
    Png,
    WebP,
    Gif,
    Bmp,
}

impl ImageFormat {
    /// Parse a MIME type such as `image/png` or `image/jpeg; charset=binary`.
    ///
    /// Matching is case-insensitive and ignores parameters. Returns `None`
    /// for types the encoder cannot produce.
    pub fn from_mime(mime: &str) -> Option<Self> {
        let essence = mime.split(';').next().unwrap_or_default().trim();
        match essence.to_ascii_lowercase().as_str() {
            "image/jpeg" | "image/jpg" | "image/pjpeg" => Some(Self::Jpeg),
            "image/png" => Some(Self::Png),
            "image/webp" => Some(Self::WebP),
            "image/gif" => Some(Self::Gif),
            "image/bmp" | "image/x-ms-bmp" => Some(Self::Bmp),
            _ => None,
        }
    }

    /// Canonical MIME type.
    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::WebP => "image/webp",
            Self::Gif => "image/gif",
            Self::Bmp => "image/bmp",
        }
    }

    /// Whether the encoder honours a quality factor for this format.
    pub fn supports_quality(self) -> bool {
        matches!(self, Self::Jpeg | Self::WebP)
    }

    /// Convert to the image crate's ImageFormat.
    pub fn to_image_format(self) -> image::ImageFormat {
        match self {
            Self::Jpeg => image::ImageFormat::Jpeg,
            Self::Png => image::ImageFormat::Png,
            Self::WebP => image::ImageFormat::WebP,
            Self::Gif => image::ImageFormat::Gif,
            Self::Bmp => image::ImageFormat::Bmp,
        }
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mime_type())
    }
}

/// True if `mime` declares an image of any kind.
///
/// This is the caller-side gate applied before a file reaches the
/// transcoder; it does not imply the format can be re-encoded.
pub fn is_image_mime(mime: &str) -> bool {
    mime.trim()
        .get(..6)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("image/"))
}
