//! Per-UI compression session.
//!
//! A session owns the current source image, the slider quality, the debounce
//! state and the last preview. Every request gets a monotonically increasing
//! generation; a completion is applied only if it is newer than anything
//! already applied and was issued against the current source. Once all
//! in-flight requests settle, the preview therefore reflects the last
//! request issued, whatever order the completions arrived in.
//!
//! Failures never touch the preview. They are kept in
//! [`CompressorSession::last_error`] so the UI can show a message.

use std::sync::Arc;
use std::time::Duration;

use crate::debounce::{Debouncer, DEFAULT_DEBOUNCE};
use crate::transcode::{transcode_with_options, CompressionResult, SourceImage, TranscodeOptions};
use crate::{download_filename, Quality, TranscodeError};

/// A successfully applied result and what the UI shows next to it.
#[derive(Debug, Clone, PartialEq)]
pub struct Preview {
    pub result: CompressionResult,
    pub quality: Quality,
    pub download_name: String,
    pub generation: u64,
}

/// An issued request: the source it was taken against and its generation.
#[derive(Debug, Clone)]
pub struct TranscodeTicket {
    generation: u64,
    source: Arc<SourceImage>,
    quality: Quality,
}

impl TranscodeTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn source(&self) -> &SourceImage {
        &self.source
    }

    pub fn quality(&self) -> Quality {
        self.quality
    }

    /// Execute the transcode this ticket describes.
    pub fn run(&self, options: &TranscodeOptions) -> Result<CompressionResult, TranscodeError> {
        transcode_with_options(&self.source, self.quality, options)
    }
}

/// How a finished request was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// The result replaced the preview.
    Applied { generation: u64 },
    /// The request failed; the preview is unchanged and the error is recorded.
    Failed { generation: u64 },
    /// A newer request or a new source superseded this one.
    Stale { generation: u64 },
}

impl Completion {
    pub fn generation(self) -> u64 {
        match self {
            Completion::Applied { generation }
            | Completion::Failed { generation }
            | Completion::Stale { generation } => generation,
        }
    }
}

#[derive(Debug)]
pub struct CompressorSession {
    options: TranscodeOptions,
    quality: Quality,
    source: Option<Arc<SourceImage>>,
    /// Generation of the request issued together with the current source.
    source_generation: u64,
    issued: u64,
    applied: u64,
    preview: Option<Preview>,
    last_error: Option<TranscodeError>,
    debouncer: Debouncer<Quality>,
}

impl Default for CompressorSession {
    fn default() -> Self {
        Self::new(TranscodeOptions::default(), DEFAULT_DEBOUNCE)
    }
}

impl CompressorSession {
    pub fn new(options: TranscodeOptions, debounce: Duration) -> Self {
        Self {
            options,
            quality: Quality::default(),
            source: None,
            source_generation: 0,
            issued: 0,
            applied: 0,
            preview: None,
            last_error: None,
            debouncer: Debouncer::new(debounce),
        }
    }

    pub fn options(&self) -> &TranscodeOptions {
        &self.options
    }

    pub fn quality(&self) -> Quality {
        self.quality
    }

    pub fn source(&self) -> Option<&SourceImage> {
        self.source.as_deref()
    }

    pub fn preview(&self) -> Option<&Preview> {
        self.preview.as_ref()
    }

    pub fn last_error(&self) -> Option<&TranscodeError> {
        self.last_error.as_ref()
    }

    pub fn has_pending(&self) -> bool {
        self.debouncer.is_pending()
    }

    /// When a debounced request becomes due.
    pub fn pending_deadline(&self) -> Option<Duration> {
        self.debouncer.deadline()
    }

    /// Replace the current source and issue its first request at the
    /// current quality.
    ///
    /// The previous preview, error and any pending debounce belong to the
    /// old file and are dropped.
    pub fn load(&mut self, source: SourceImage) -> TranscodeTicket {
        log::debug!(
            "loading {} ({}, {} bytes)",
            source.name(),
            source.mime_type(),
            source.byte_len()
        );
        let source = Arc::new(source);
        self.source = Some(Arc::clone(&source));
        self.preview = None;
        self.last_error = None;
        self.debouncer.cancel();

        let ticket = self.issue(source, self.quality);
        self.source_generation = ticket.generation;
        ticket
    }

    /// Issue a request for the current source at `quality`.
    ///
    /// Returns `None` when no source is loaded.
    pub fn begin(&mut self, quality: Quality) -> Option<TranscodeTicket> {
        let source = self.source.clone()?;
        self.quality = quality;
        Some(self.issue(source, quality))
    }

    /// Apply the outcome of a request issued by [`load`](Self::load) or
    /// [`begin`](Self::begin).
    pub fn finish(
        &mut self,
        ticket: TranscodeTicket,
        outcome: Result<CompressionResult, TranscodeError>,
    ) -> Completion {
        let generation = ticket.generation;
        if generation < self.source_generation || generation <= self.applied {
            log::debug!(
                "discarding stale result (generation {}, applied {})",
                generation,
                self.applied
            );
            return Completion::Stale { generation };
        }
        self.applied = generation;

        match outcome {
            Ok(result) => {
                let download_name = download_filename(ticket.quality, ticket.source.name());
                self.preview = Some(Preview {
                    result,
                    quality: ticket.quality,
                    download_name,
                    generation,
                });
                self.last_error = None;
                Completion::Applied { generation }
            }
            Err(err) => {
                log::warn!("compression request {} failed: {}", generation, err);
                self.last_error = Some(err);
                Completion::Failed { generation }
            }
        }
    }

    /// Run a ticket synchronously and apply its outcome.
    pub fn run(&mut self, ticket: TranscodeTicket) -> Completion {
        let outcome = ticket.run(&self.options);
        self.finish(ticket, outcome)
    }

    /// Record a slider move and schedule a debounced request.
    ///
    /// Returns false when no source is loaded; the quality is still kept
    /// for the next file.
    pub fn set_quality(&mut self, quality: Quality, now: Duration) -> bool {
        self.quality = quality;
        if self.source.is_none() {
            return false;
        }
        self.debouncer.schedule(quality, now);
        true
    }

    /// Run the debounced request if its window has elapsed.
    pub fn poll(&mut self, now: Duration) -> Option<Completion> {
        let quality = self.debouncer.poll(now)?;
        let ticket = self.begin(quality)?;
        Some(self.run(ticket))
    }

    /// Skip the debounce window and compress at the current quality.
    pub fn compress_now(&mut self) -> Option<Completion> {
        self.debouncer.cancel();
        let ticket = self.begin(self.quality)?;
        Some(self.run(ticket))
    }

    fn issue(&mut self, source: Arc<SourceImage>, quality: Quality) -> TranscodeTicket {
        self.issued += 1;
        TranscodeTicket {
            generation: self.issued,
            source,
            quality,
        }
    }
}
