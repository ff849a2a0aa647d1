//! Image decoding for the transcode pipeline.
//!
//! This module provides functionality for:
//! - Decoding JPEG, PNG, WebP, GIF and BMP images into RGBA pixels
//! - Applying EXIF orientation the way a browser canvas does
//! - Resizing decoded images to fit output bounds
//!
//! All operations are synchronous and single-threaded, so they run unchanged
//! inside WASM.
//!
//! # Examples
//!
//! ```ignore
//! use imgpress_core::decode::{decode_image, resize_to_bounds, FilterType};
//!
//! let bytes = std::fs::read("photo.jpg").unwrap();
//! let image = decode_image(&bytes).unwrap();
//! let fitted = resize_to_bounds(&image, 1920, 1080, FilterType::Lanczos3).unwrap();
//! println!("Fitted {}x{} image", fitted.width, fitted.height);
//! ```

mod reader;
mod resize;
mod types;

pub use reader::decode_image;
pub use resize::{resize, resize_to_bounds};
pub use types::{DecodeError, DecodedImage, FilterType, Orientation};
