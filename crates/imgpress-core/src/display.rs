//! Human-readable labels shown next to the previews.

use crate::Quality;

const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];

/// Format a byte count with binary (1024) units and at most two decimals.
///
/// Trailing zeros are dropped: `1024` is `"1 KB"`, `1536` is `"1.5 KB"`.
/// Sizes beyond the gigabyte range stay in GB.
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    format!("{} {}", trim_decimals(value), UNITS[unit])
}

/// Download name for a compressed file: `compressed_<percent>%_<original>`.
pub fn download_filename(quality: Quality, original_name: &str) -> String {
    format!("compressed_{}%_{}", quality.percent_label(), original_name)
}

/// Round to two decimals and strip trailing zeros.
pub(crate) fn trim_decimals(value: f64) -> String {
    let fixed = format!("{:.2}", value);
    let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
    if trimmed == "-0" {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}
