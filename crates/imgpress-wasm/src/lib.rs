//! imgpress WASM - WebAssembly bindings for imgpress
//!
//! This crate exposes the imgpress-core compression pipeline to the
//! browser page that previews and downloads compressed images.
//!
//! # Module Structure
//!
//! - `compress` - Stateless `transcode` plus size/name/MIME helpers
//! - `session` - The `Compressor` class driving the quality slider
//! - `types` - WASM-compatible wrapper types for results and options
//! - `logger` - Console backend for the `log` facade
//!
//! # Usage
//!
//! ```typescript
//! import init, { Compressor, is_image_mime } from '@imgpress/wasm';
//!
//! // Initialize WASM module (must call first)
//! await init();
//!
//! const compressor = new Compressor(undefined, 300);
//! if (is_image_mime(file.type)) {
//!   compressor.load(new Uint8Array(await file.arrayBuffer()), file.type, file.name);
//!   const preview = compressor.preview();
//! }
//! ```

use wasm_bindgen::prelude::*;

mod compress;
mod logger;
mod session;
mod types;

pub use compress::{download_filename, format_file_size, is_image_mime, is_supported_mime, transcode};
pub use logger::set_log_level;
pub use session::Compressor;
pub use types::JsCompressionResult;

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    logger::install(logger::default_level());
    log::debug!("imgpress-wasm {} ready", env!("CARGO_PKG_VERSION"));
}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
