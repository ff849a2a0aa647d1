//! Interactive compression session for the preview page.
//!
//! One `Compressor` per page replaces the global "current file" and the
//! global debounce timer. The page calls `set_quality` on every slider
//! `input` event and arms a `setTimeout` for `next_due_ms()`; when it fires
//! it calls `poll()` and re-renders if that returns true.
//!
//! ```typescript
//! const compressor = new Compressor(undefined, 300);
//! if (!is_image_mime(file.type)) return;
//! compressor.load(new Uint8Array(await file.arrayBuffer()), file.type, file.name);
//!
//! slider.oninput = () => {
//!   compressor.set_quality(Number(slider.value));
//!   clearTimeout(timer);
//!   timer = setTimeout(() => { if (compressor.poll()) render(); }, compressor.next_due_ms() ?? 0);
//! };
//! ```

use std::time::Duration;

use crate::compress::to_js;
use crate::types::{parse_options, JsCompressionResult};
use imgpress_core::{
    format_file_size, is_image_mime, Completion, CompressorSession, Quality, SourceImage,
    TranscodeError, DEFAULT_DEBOUNCE,
};
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
pub struct Compressor {
    session: CompressorSession,
}

#[wasm_bindgen]
impl Compressor {
    /// Create a session.
    ///
    /// # Arguments
    /// * `options` - Optional `{ maxWidth, maxHeight, filter }` object
    /// * `debounce_ms` - Slider quiescence window, 300 ms when omitted
    #[wasm_bindgen(constructor)]
    pub fn new(options: JsValue, debounce_ms: Option<u32>) -> Result<Compressor, JsValue> {
        let options = parse_options(options)?;
        options.validate().map_err(to_js)?;
        let debounce = debounce_ms
            .map(|ms| Duration::from_millis(ms as u64))
            .unwrap_or(DEFAULT_DEBOUNCE);
        Ok(Compressor {
            session: CompressorSession::new(options, debounce),
        })
    }

    /// Replace the current file and compress it at the current quality.
    ///
    /// Returns true if a preview is available afterwards. Non-image files
    /// are rejected with an error and leave the session untouched.
    pub fn load(&mut self, bytes: Vec<u8>, mime_type: &str, name: &str) -> Result<bool, JsValue> {
        self.load_source(SourceImage::new(bytes, mime_type, name))
            .map(|completion| matches!(completion, Completion::Applied { .. }))
            .map_err(to_js)
    }

    /// Record a slider value (1-100) and schedule a debounced compression.
    ///
    /// Returns true if a compression was scheduled (a file is loaded).
    pub fn set_quality(&mut self, percent: u32) -> Result<bool, JsValue> {
        self.set_quality_at(percent, now()).map_err(to_js)
    }

    /// Run the scheduled compression if its window has elapsed.
    ///
    /// Returns true if the preview changed.
    pub fn poll(&mut self) -> bool {
        self.poll_at(now())
    }

    /// Compress immediately at the current quality, bypassing the debounce.
    ///
    /// Returns true if the preview changed.
    pub fn compress_now(&mut self) -> bool {
        matches!(
            self.session.compress_now(),
            Some(Completion::Applied { .. })
        )
    }

    /// Milliseconds until the scheduled compression is due, if one is pending.
    pub fn next_due_ms(&self) -> Option<f64> {
        self.due_in(now()).map(|d| d.as_millis() as f64)
    }

    #[wasm_bindgen(getter)]
    pub fn quality_percent(&self) -> u8 {
        self.session.quality().to_percent()
    }

    /// The latest applied result, with its download name.
    pub fn preview(&self) -> Option<JsCompressionResult> {
        self.session.preview().map(JsCompressionResult::from_preview)
    }

    /// Message for the most recent failed compression, cleared by the next success.
    pub fn last_error(&self) -> Option<String> {
        self.session.last_error().map(|e| e.to_string())
    }

    /// Size label of the loaded file, e.g. "2.4 MB".
    pub fn original_size_label(&self) -> Option<String> {
        self.session
            .source()
            .map(|source| format_file_size(source.byte_len() as u64))
    }

    /// Original file bytes for the "before" preview.
    pub fn original_bytes(&self) -> Option<Vec<u8>> {
        self.session.source().map(|source| source.bytes().to_vec())
    }
}

impl Compressor {
    #[cfg(test)]
    pub(crate) fn with_session(session: CompressorSession) -> Self {
        Self { session }
    }

    pub(crate) fn load_source(&mut self, source: SourceImage) -> Result<Completion, TranscodeError> {
        if !is_image_mime(source.mime_type()) {
            log::warn!("rejected non-image file {} ({})", source.name(), source.mime_type());
            return Err(TranscodeError::InvalidInput(source.mime_type().to_string()));
        }
        let ticket = self.session.load(source);
        Ok(self.session.run(ticket))
    }

    pub(crate) fn set_quality_at(
        &mut self,
        percent: u32,
        now: Duration,
    ) -> Result<bool, TranscodeError> {
        let quality = Quality::from_percent(percent)?;
        Ok(self.session.set_quality(quality, now))
    }

    pub(crate) fn poll_at(&mut self, now: Duration) -> bool {
        matches!(self.session.poll(now), Some(Completion::Applied { .. }))
    }

    pub(crate) fn due_in(&self, now: Duration) -> Option<Duration> {
        self.session
            .pending_deadline()
            .map(|deadline| deadline.saturating_sub(now))
    }
}

/// Wall-clock time from the JS host.
fn now() -> Duration {
    Duration::from_millis(js_sys::Date::now().max(0.0) as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use imgpress_core::decode::DecodedImage;
    use imgpress_core::encode::encode_jpeg_image;

    fn jpeg_bytes() -> Vec<u8> {
        let mut pixels = Vec::with_capacity(32 * 32 * 4);
        for i in 0..32 * 32u32 {
            pixels.extend_from_slice(&[(i % 251) as u8, (i % 13 * 19) as u8, 77, 255]);
        }
        encode_jpeg_image(&DecodedImage::new(32, 32, pixels), 95).unwrap()
    }

    fn compressor() -> Compressor {
        Compressor::with_session(CompressorSession::default())
    }

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn test_load_produces_preview() {
        let mut c = compressor();
        let completion = c
            .load_source(SourceImage::new(jpeg_bytes(), "image/jpeg", "pic.jpg"))
            .unwrap();

        assert!(matches!(completion, Completion::Applied { .. }));
        let preview = c.preview().unwrap();
        assert_eq!(preview.mime_type(), "image/jpeg");
        assert_eq!(preview.download_name().as_deref(), Some("compressed_80%_pic.jpg"));
        assert!(c.original_size_label().is_some());
        assert_eq!(c.original_bytes().unwrap(), jpeg_bytes());
    }

    #[test]
    fn test_load_rejects_non_image() {
        let mut c = compressor();
        let err = c
            .load_source(SourceImage::new(vec![1, 2, 3], "text/plain", "notes.txt"))
            .unwrap_err();

        assert_eq!(err, TranscodeError::InvalidInput("text/plain".to_string()));
        assert!(c.original_bytes().is_none());
    }

    #[test]
    fn test_broken_file_reports_error() {
        let mut c = compressor();
        let completion = c
            .load_source(SourceImage::new(vec![0u8; 8], "image/jpeg", "bad.jpg"))
            .unwrap();

        assert!(matches!(completion, Completion::Failed { .. }));
        assert!(c.preview().is_none());
        assert!(c.last_error().unwrap().starts_with("Failed to decode image"));
    }

    #[test]
    fn test_debounced_slider() {
        let mut c = compressor();
        c.load_source(SourceImage::new(jpeg_bytes(), "image/jpeg", "pic.jpg"))
            .unwrap();

        assert!(c.set_quality_at(30, ms(1_000)).unwrap());
        assert_eq!(c.due_in(ms(1_100)), Some(ms(200)));
        assert!(!c.poll_at(ms(1_100)));

        assert!(c.poll_at(ms(1_300)));
        assert_eq!(c.quality_percent(), 30);
        assert_eq!(
            c.preview().unwrap().download_name().as_deref(),
            Some("compressed_30%_pic.jpg")
        );
        assert_eq!(c.due_in(ms(1_300)), None);
    }

    #[test]
    fn test_set_quality_rejects_out_of_range() {
        let mut c = compressor();
        assert!(c.set_quality_at(0, ms(0)).is_err());
        assert!(c.set_quality_at(101, ms(0)).is_err());
        // 300 must not wrap to 44.
        assert!(c.set_quality_at(300, ms(0)).is_err());
        assert_eq!(c.quality_percent(), 80);
        assert!(!c.set_quality_at(50, ms(0)).unwrap());
    }

    #[test]
    fn test_compress_now() {
        let mut c = compressor();
        assert!(!c.compress_now());

        c.load_source(SourceImage::new(jpeg_bytes(), "image/jpeg", "pic.jpg"))
            .unwrap();
        c.set_quality_at(90, ms(0)).unwrap();
        assert!(c.compress_now());
        assert_eq!(c.due_in(ms(0)), None);
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_constructor_defaults() {
        let c = Compressor::new(JsValue::UNDEFINED, None).unwrap();
        assert_eq!(c.quality_percent(), 80);
        assert!(c.preview().is_none());
        assert!(c.next_due_ms().is_none());
    }

    #[wasm_bindgen_test]
    fn test_constructor_rejects_zero_bounds() {
        let options = js_sys::Object::new();
        js_sys::Reflect::set(&options, &"maxHeight".into(), &0.into()).unwrap();
        assert!(Compressor::new(options.into(), Some(100)).is_err());
    }

    #[wasm_bindgen_test]
    fn test_load_non_image_errors() {
        let mut c = Compressor::new(JsValue::NULL, None).unwrap();
        assert!(c.load(vec![1, 2, 3], "application/pdf", "doc.pdf").is_err());
    }
}
