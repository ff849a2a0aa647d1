//! One-shot compression bindings.
//!
//! These are stateless: each call decodes, fits and re-encodes from scratch.
//! Use [`crate::Compressor`] for the interactive slider workflow.
//!
//! # Example
//!
//! ```typescript
//! import { transcode, format_file_size, download_filename } from '@imgpress/wasm';
//!
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! const result = transcode(bytes, file.type, 0.8, undefined);
//! const blob = new Blob([result.bytes()], { type: result.mime_type });
//! label.textContent = format_file_size(result.byte_length);
//! link.download = download_filename(80, file.name);
//! ```

use crate::types::{parse_options, JsCompressionResult};
use imgpress_core::{self as imgpress, Quality, SourceImage};
use wasm_bindgen::prelude::*;

/// Decode, fit within the bounds and re-encode in the same format.
///
/// # Arguments
///
/// * `bytes` - Raw file bytes as a `Uint8Array`
/// * `mime_type` - The file's declared MIME type (`file.type`)
/// * `quality` - Quality fraction in (0, 1]; JPEG and WebP use it
/// * `options` - Optional `{ maxWidth, maxHeight, filter }` object
///
/// # Errors
///
/// Returns an error string if the quality or options are invalid, the format
/// cannot be re-encoded, or decoding/encoding fails.
#[wasm_bindgen]
pub fn transcode(
    bytes: Vec<u8>,
    mime_type: &str,
    quality: f64,
    options: JsValue,
) -> Result<JsCompressionResult, JsValue> {
    let options = parse_options(options)?;
    let quality = Quality::new(quality).map_err(to_js)?;
    let source = SourceImage::new(bytes, mime_type, "");

    imgpress::transcode_with_options(&source, quality, &options)
        .map(JsCompressionResult::from_result)
        .map_err(to_js)
}

/// Format a byte count as "0 Bytes", "1 KB", "1.5 KB", ...
///
/// Takes a JS number; negative and fractional inputs are truncated to
/// whole non-negative bytes.
#[wasm_bindgen]
pub fn format_file_size(bytes: f64) -> String {
    imgpress::format_file_size(bytes.max(0.0) as u64)
}

/// Download name for a result: `compressed_<percent>%_<original>`.
#[wasm_bindgen]
pub fn download_filename(quality_percent: u32, original_name: &str) -> Result<String, JsValue> {
    let quality = Quality::from_percent(quality_percent).map_err(to_js)?;
    Ok(imgpress::download_filename(quality, original_name))
}

/// True if the MIME type names an image; gate files before loading them.
#[wasm_bindgen]
pub fn is_image_mime(mime_type: &str) -> bool {
    imgpress::is_image_mime(mime_type)
}

/// True if the MIME type can be re-encoded in place.
#[wasm_bindgen]
pub fn is_supported_mime(mime_type: &str) -> bool {
    imgpress::ImageFormat::from_mime(mime_type).is_some()
}

pub(crate) fn to_js(err: imgpress::TranscodeError) -> JsValue {
    JsValue::from_str(&err.to_string())
}
