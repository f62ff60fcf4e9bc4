//! Aspect-ratio-preserving resize for printer output.
//!
//! Uses bilinear (Triangle) filtering for resampling.

use image::imageops::{self, FilterType};
use tracing::{debug, warn};

use crate::buffer::PixelBuffer;

/// Compute one side of a target size that fits a bounding box.
///
/// Call it twice with the arguments swapped to get the width and the height:
/// `resized_dimension(max_w, max_h, w, h)` and `resized_dimension(max_h, max_w, h, w)`.
/// A zero maximum means "unconstrained".
pub fn resized_dimension(
    max_primary: u32,
    max_secondary: u32,
    actual_primary: u32,
    actual_secondary: u32,
) -> u32 {
    if max_primary == 0 && max_secondary == 0 {
        return actual_primary;
    }

    if max_primary == 0 {
        let ratio = f64::from(max_secondary) / f64::from(actual_secondary);
        return (f64::from(actual_primary) * ratio) as u32;
    }

    if max_secondary == 0 {
        return max_primary;
    }

    let ratio = f64::from(actual_secondary) / f64::from(actual_primary);
    if f64::from(max_primary) * ratio > f64::from(max_secondary) {
        return (f64::from(max_secondary) / ratio) as u32;
    }
    max_primary
}

impl PixelBuffer {
    /// Resample to `width`x`height`.
    ///
    /// A zero target dimension returns the buffer unchanged.
    pub fn scale(self, width: u32, height: u32) -> PixelBuffer {
        if width == 0 || height == 0 {
            warn!(width, height, "Ignoring scale to an empty size");
            return self;
        }
        if self.dimensions() == (width, height) {
            debug!(width, height, "Image already at target size, skipping resize");
            return self;
        }

        debug!(
            orig_w = self.width(),
            orig_h = self.height(),
            new_width = width,
            new_height = height,
            "Resizing image"
        );

        let resized = imageops::resize(self.as_image(), width, height, FilterType::Triangle);
        PixelBuffer::new(resized).unwrap_or(self)
    }
}
