//! WASM-compatible wrapper types for compression results and options.

use imgpress_core::{format_file_size, CompressionResult, Preview, TranscodeOptions};
use wasm_bindgen::prelude::*;

/// A compressed image ready for preview and download.
///
/// # Memory Management
///
/// The encoded bytes live in WASM memory. `bytes()` copies them into a
/// JavaScript `Uint8Array`, which is what `new Blob([...])` needs anyway.
#[wasm_bindgen]
pub struct JsCompressionResult {
    bytes: Vec<u8>,
    mime_type: String,
    width: u32,
    height: u32,
    download_name: Option<String>,
}

#[wasm_bindgen]
impl JsCompressionResult {
    /// Encoded bytes as a Uint8Array (copy).
    pub fn bytes(&self) -> Vec<u8> {
        self.bytes.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn byte_length(&self) -> usize {
        self.bytes.len()
    }

    /// MIME type of the encoded bytes; always the source's type.
    #[wasm_bindgen(getter)]
    pub fn mime_type(&self) -> String {
        self.mime_type.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Human-readable size, e.g. "1.5 KB".
    #[wasm_bindgen(getter)]
    pub fn size_label(&self) -> String {
        format_file_size(self.bytes.len() as u64)
    }

    /// Suggested download file name, when the result came from a session.
    #[wasm_bindgen(getter)]
    pub fn download_name(&self) -> Option<String> {
        self.download_name.clone()
    }

    /// Explicitly free WASM memory.
    ///
    /// This is optional - wasm-bindgen's finalizer will handle cleanup automatically.
    pub fn free(self) {
        // Dropping self releases the memory
    }
}

impl JsCompressionResult {
    pub(crate) fn from_result(result: CompressionResult) -> Self {
        let dims = result.dimensions();
        Self {
            mime_type: result.mime_type().to_string(),
            width: dims.width,
            height: dims.height,
            bytes: result.into_bytes(),
            download_name: None,
        }
    }

    pub(crate) fn from_preview(preview: &Preview) -> Self {
        Self {
            download_name: Some(preview.download_name.clone()),
            ..Self::from_result(preview.result.clone())
        }
    }
}

/// Parse a JS options object (`{ maxWidth, maxHeight, filter }`).
///
/// `null` and `undefined` give the defaults; missing fields do too.
pub(crate) fn parse_options(options: JsValue) -> Result<TranscodeOptions, JsValue> {
    if options.is_null() || options.is_undefined() {
        return Ok(TranscodeOptions::default());
    }

    serde_wasm_bindgen::from_value(options)
        .map_err(|e| JsValue::from_str(&format!("Invalid options: {}", e)))
}
