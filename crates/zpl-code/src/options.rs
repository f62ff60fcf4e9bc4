//! Conversion options.
//!
//! Mirrors the props a host passes when asking for an image field: an
//! optional bounding box, placement, and the processing toggles.

use pixel_image::{BayerMatrix, ColorFilter, DEFAULT_THRESHOLD, Ditherer, Palette, PixelBuffer};
use serde::{Deserialize, Serialize};

/// Which dithering algorithm to run when dithering is enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DitherMode {
    #[default]
    FloydSteinberg,
    Palette,
    Ordered,
}

impl DitherMode {
    pub fn ditherer(&self) -> Ditherer {
        match self {
            DitherMode::FloydSteinberg => Ditherer::FloydSteinberg,
            DitherMode::Palette => Ditherer::Palette(Palette::EIGHT_COLOR),
            DitherMode::Ordered => Ditherer::Ordered(BayerMatrix::Bayer4),
        }
    }
}

/// How the ink/paper cut point is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ThresholdMode {
    Fixed(u8),
    Otsu,
}

impl Default for ThresholdMode {
    fn default() -> Self {
        ThresholdMode::Fixed(DEFAULT_THRESHOLD)
    }
}

impl ThresholdMode {
    pub fn resolve(&self, buffer: &PixelBuffer) -> u8 {
        match self {
            ThresholdMode::Fixed(value) => *value,
            ThresholdMode::Otsu => pixel_image::otsu_threshold(buffer),
        }
    }
}

/// Options for converting an image into a graphic field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ConvertOptions {
    /// Maximum width in dots; `None` or 0 keeps the image width.
    pub width: Option<u32>,

    /// Maximum height in dots; `None` or 0 follows the width's scale.
    pub height: Option<u32>,

    /// Field origin. Both must be set (or derived by `center`) for `^FO`.
    pub x: Option<i32>,
    pub y: Option<i32>,

    /// Center the image inside the bounding box. Only applies when both
    /// `x` and `y` are unset; explicit offsets always win.
    pub center: bool,

    /// Apply dithering before binarization.
    pub dither: bool,

    pub dither_mode: DitherMode,

    pub threshold: ThresholdMode,

    /// Filter applied before dithering. When unset and dithering is on,
    /// the default grayscale weights are used.
    pub filter: Option<ColorFilter>,

    /// Wrap the field in `^XA`/`^XZ` instead of returning a fragment.
    pub standalone: bool,
}

impl ConvertOptions {
    /// Create options with sensible defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: set the bounding box.
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    /// Builder: set the field origin.
    pub fn with_origin(mut self, x: i32, y: i32) -> Self {
        self.x = Some(x);
        self.y = Some(y);
        self
    }

    /// Builder: set center flag.
    pub fn with_center(mut self, val: bool) -> Self {
        self.center = val;
        self
    }

    /// Builder: set dither flag.
    pub fn with_dither(mut self, val: bool) -> Self {
        self.dither = val;
        self
    }

    /// Builder: set dithering algorithm.
    pub fn with_dither_mode(mut self, mode: DitherMode) -> Self {
        self.dither_mode = mode;
        self
    }

    /// Builder: set threshold mode.
    pub fn with_threshold(mut self, mode: ThresholdMode) -> Self {
        self.threshold = mode;
        self
    }

    /// Builder: set color filter.
    pub fn with_filter(mut self, filter: impl Into<ColorFilter>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    /// Builder: set standalone flag.
    pub fn with_standalone(mut self, val: bool) -> Self {
        self.standalone = val;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pixel_image::GrayScale;

    #[test]
    fn test_defaults() {
        let options = ConvertOptions::new();
        assert_eq!(options.threshold, ThresholdMode::Fixed(127));
        assert_eq!(options.dither_mode, DitherMode::FloydSteinberg);
        assert!(!options.dither && !options.center && !options.standalone);
        assert!(options.filter.is_none());
    }

    #[test]
    fn test_deserialize_host_props() {
        let json = serde_json::json!({
            "width": 200,
            "height": 100,
            "x": 5,
            "y": 7,
            "dither": true,
            "ditherMode": "palette",
            "threshold": "otsu",
            "filter": { "type": "grayScale", "r": 50, "g": 50, "b": 50 }
        });
        let options: ConvertOptions = serde_json::from_value(json).unwrap();
        assert_eq!(options.width, Some(200));
        assert_eq!(options.x, Some(5));
        assert!(options.dither);
        assert_eq!(options.dither_mode, DitherMode::Palette);
        assert_eq!(options.threshold, ThresholdMode::Otsu);
        assert_eq!(
            options.filter,
            Some(ColorFilter::GrayScale(GrayScale::DARK_GRAY))
        );
        assert!(!options.center);
    }

    #[test]
    fn test_deserialize_fixed_threshold() {
        let json = serde_json::json!({ "threshold": { "fixed": 90 }, "center": true });
        let options: ConvertOptions = serde_json::from_value(json).unwrap();
        assert_eq!(options.threshold, ThresholdMode::Fixed(90));
        assert!(options.center);
    }

    #[test]
    fn test_builder() {
        let options = ConvertOptions::new()
            .with_size(300, 200)
            .with_origin(1, 2)
            .with_dither(true)
            .with_dither_mode(DitherMode::Ordered)
            .with_filter(GrayScale::DEFAULT)
            .with_standalone(true);
        assert_eq!((options.width, options.height), (Some(300), Some(200)));
        assert_eq!((options.x, options.y), (Some(1), Some(2)));
        assert_eq!(
            options.dither_mode.ditherer(),
            Ditherer::Ordered(BayerMatrix::Bayer4)
        );
        assert!(options.standalone);
    }
}
