//! Per-pixel color filters.
//!
//! Filters carry no cross-pixel state; each output pixel depends only on the
//! matching input pixel.

use image::Rgba;
use serde::{Deserialize, Serialize};

/// Weighted grayscale reduction.
///
/// `gray = clamp((r*wr + g*wg + b*wb) / 100, 0, 255)`. Weights need not sum
/// to 100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrayScale {
    pub r: u32,
    pub g: u32,
    pub b: u32,
}

impl GrayScale {
    /// Perceptual luminance weights.
    pub const DEFAULT: GrayScale = GrayScale::new(30, 59, 11);
    pub const DARK_GRAY: GrayScale = GrayScale::new(50, 50, 50);
    pub const MEDIUM_GRAY: GrayScale = GrayScale::new(120, 120, 120);
    pub const LIGHT_GRAY: GrayScale = GrayScale::new(200, 200, 200);

    pub const fn new(r: u32, g: u32, b: u32) -> Self {
        Self { r, g, b }
    }

    pub fn apply(&self, pixel: Rgba<u8>) -> Rgba<u8> {
        let [r, g, b, a] = pixel.0;
        let total = u64::from(r) * u64::from(self.r)
            + u64::from(g) * u64::from(self.g)
            + u64::from(b) * u64::from(self.b);
        let gray = (total / 100).min(255) as u8;
        Rgba([gray, gray, gray, a])
    }
}

impl Default for GrayScale {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// The closed set of filters a conversion can apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ColorFilter {
    GrayScale(GrayScale),
    Sepia,
}

impl ColorFilter {
    pub fn apply(&self, pixel: Rgba<u8>) -> Rgba<u8> {
        match self {
            ColorFilter::GrayScale(gray) => gray.apply(pixel),
            ColorFilter::Sepia => sepia(pixel),
        }
    }
}

impl From<GrayScale> for ColorFilter {
    fn from(gray: GrayScale) -> Self {
        ColorFilter::GrayScale(gray)
    }
}

fn sepia(pixel: Rgba<u8>) -> Rgba<u8> {
    let [r, g, b, a] = pixel.0;
    let (r, g, b) = (f32::from(r), f32::from(g), f32::from(b));
    let tone = |wr: f32, wg: f32, wb: f32| (wr * r + wg * g + wb * b).min(255.0) as u8;
    Rgba([
        tone(0.393, 0.769, 0.189),
        tone(0.349, 0.686, 0.168),
        tone(0.272, 0.534, 0.131),
        a,
    ])
}
