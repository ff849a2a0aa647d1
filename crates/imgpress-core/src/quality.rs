//! Validated quality factor.

use std::fmt;

use crate::TranscodeError;

/// Lossy-compression quality as a fraction in `(0.0, 1.0]`.
///
/// Codecs without a quality parameter accept it and ignore it.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Quality(f64);

impl Quality {
    /// Highest quality (1.0).
    pub const MAX: Quality = Quality(1.0);

    /// Validate a fraction. NaN, zero, negatives and values above 1.0 are rejected.
    pub fn new(fraction: f64) -> Result<Self, TranscodeError> {
        if fraction > 0.0 && fraction <= 1.0 {
            Ok(Self(fraction))
        } else {
            Err(TranscodeError::InvalidQuality(fraction))
        }
    }

    /// Build from a slider percentage in `[1, 100]`.
    ///
    /// Takes a `u32` so out-of-range values coming from JS numbers are
    /// rejected instead of wrapping.
    pub fn from_percent(percent: u32) -> Result<Self, TranscodeError> {
        if (1..=100).contains(&percent) {
            Ok(Self(percent as f64 / 100.0))
        } else {
            Err(TranscodeError::InvalidQuality(percent as f64 / 100.0))
        }
    }

    pub fn fraction(self) -> f64 {
        self.0
    }

    /// Encoder quality on the 1-100 scale used by JPEG codecs.
    pub fn to_percent(self) -> u8 {
        (self.0 * 100.0).round().clamp(1.0, 100.0) as u8
    }

    /// `fraction * 100` rounded to two decimals, for display and file names.
    pub fn percent_label(self) -> String {
        crate::display::trim_decimals(self.0 * 100.0)
    }
}

impl Default for Quality {
    /// The slider's initial position in the browser UI (80%).
    fn default() -> Self {
        Self(0.8)
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.percent_label())
    }
}
