//! Output dimension calculation.

use serde::{Deserialize, Serialize};

/// Default output bounds.
pub const MAX_WIDTH: u32 = 1920;
pub const MAX_HEIGHT: u32 = 1080;

/// Image width x height in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn fits_within(self, max_width: u32, max_height: u32) -> bool {
        self.width <= max_width && self.height <= max_height
    }

    /// Shrink to fit `max_width` x `max_height`, preserving aspect ratio.
    ///
    /// The clamp is sequential: width first, then the (possibly already
    /// scaled) height. Each step rounds half away from zero. This is not a
    /// simultaneous best-fit and can differ from one by a pixel in edge
    /// cases. Dimensions that already fit are returned unchanged, and no
    /// side is ever reduced below 1.
    pub fn fit_within(self, max_width: u32, max_height: u32) -> Self {
        let max_width = max_width.max(1);
        let max_height = max_height.max(1);
        if self.fits_within(max_width, max_height) {
            return self;
        }

        let Self {
            mut width,
            mut height,
        } = self;

        if width > max_width {
            height = scale_side(height, max_width, width);
            width = max_width;
        }
        if height > max_height {
            width = scale_side(width, max_height, height);
            height = max_height;
        }

        Self { width, height }
    }
}

/// `round(side * numerator / denominator)`, floored at 1.
fn scale_side(side: u32, numerator: u32, denominator: u32) -> u32 {
    let scaled = (side as f64 * numerator as f64) / denominator as f64;
    (scaled.round() as u32).max(1)
}
