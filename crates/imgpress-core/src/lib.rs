//! imgpress core - in-browser image compression pipeline
//!
//! This crate decodes a user-selected image, shrinks it to fit 1920 x 1080
//! if needed, and re-encodes it in its original format at a chosen quality.
//! A [`CompressorSession`] wraps that transform with the state a preview UI
//! needs: the current file, a debounced quality slider, and a generation
//! counter that keeps late results from overwriting newer ones.

pub mod debounce;
pub mod decode;
pub mod dimensions;
mod display;
pub mod encode;
mod format;
mod quality;
pub mod session;
mod transcode;

pub use debounce::{Debouncer, DEFAULT_DEBOUNCE};
pub use decode::{DecodeError, FilterType};
pub use dimensions::{Dimensions, MAX_HEIGHT, MAX_WIDTH};
pub use display::{download_filename, format_file_size};
pub use encode::EncodeError;
pub use format::{is_image_mime, ImageFormat};
pub use quality::Quality;
pub use session::{Completion, CompressorSession, Preview, TranscodeTicket};
pub use transcode::{
    transcode, transcode_with_options, CompressionResult, SourceImage, TranscodeError,
    TranscodeOptions,
};
