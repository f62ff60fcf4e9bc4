//! Binarization threshold estimation using Otsu's method.

use tracing::debug;

use crate::buffer::{PixelBuffer, luminance};

/// Count of pixels per luminance value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Histogram {
    buckets: [u64; 256],
    total: u64,
}

impl Histogram {
    /// Build the luminance histogram of a buffer in one pass.
    pub fn from_buffer(buffer: &PixelBuffer) -> Self {
        let mut buckets = [0u64; 256];
        for pixel in buffer.as_image().pixels() {
            buckets[usize::from(luminance(*pixel))] += 1;
        }
        let total = u64::from(buffer.width()) * u64::from(buffer.height());
        Self { buckets, total }
    }

    /// Build a histogram from raw bucket counts.
    pub fn from_buckets(buckets: [u64; 256]) -> Self {
        let total = buckets.iter().sum();
        Self { buckets, total }
    }

    pub fn buckets(&self) -> &[u64; 256] {
        &self.buckets
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    /// Threshold maximizing the between-class variance.
    ///
    /// The background class holds luminance values `<= t`. Thresholds with an
    /// empty class are skipped, and the first maximum wins.
    pub fn otsu(&self) -> u8 {
        let total = self.total as f64;
        let sum: u64 = self
            .buckets
            .iter()
            .enumerate()
            .map(|(i, &count)| i as u64 * count)
            .sum();

        let mut max_variance = 0.0;
        let mut threshold = 0u8;
        let mut count_bg = 0u64;
        let mut sum_bg = 0u64;

        for (i, &count) in self.buckets.iter().enumerate() {
            count_bg += count;
            if count_bg == 0 {
                continue;
            }
            let count_fg = self.total - count_bg;
            if count_fg == 0 {
                break;
            }

            sum_bg += i as u64 * count;
            let sum_fg = sum - sum_bg;

            let mean_bg = sum_bg as f64 / count_bg as f64;
            let mean_fg = sum_fg as f64 / count_fg as f64;

            let variance =
                count_bg as f64 * count_fg as f64 * (mean_bg - mean_fg).powi(2) / (total * total);

            if variance > max_variance {
                max_variance = variance;
                threshold = i as u8;
            }
        }

        threshold
    }
}

/// Estimate the optimal binarization threshold of a buffer.
pub fn otsu_threshold(buffer: &PixelBuffer) -> u8 {
    let threshold = Histogram::from_buffer(buffer).otsu();
    debug!(
        width = buffer.width(),
        height = buffer.height(),
        threshold,
        "Estimated Otsu threshold"
    );
    threshold
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn bimodal(low: u8, high: u8) -> PixelBuffer {
        let img = RgbaImage::from_fn(8, 8, |x, _| {
            let v = if x < 4 { low } else { high };
            Rgba([v, v, v, 255])
        });
        PixelBuffer::new(img).unwrap()
    }

    #[test]
    fn test_histogram_counts_every_pixel() {
        let buffer = bimodal(10, 240);
        let histogram = Histogram::from_buffer(&buffer);
        assert_eq!(histogram.total(), 64);
        assert_eq!(histogram.buckets()[10], 32);
        assert_eq!(histogram.buckets()[240], 32);
    }

    #[test]
    fn test_otsu_separates_bimodal() {
        let threshold = otsu_threshold(&bimodal(10, 240));
        // Background is `<= t`, so the cut sits on the lower mode.
        assert!((10..240).contains(&threshold), "threshold {threshold}");
        assert_eq!(threshold, 10);
    }

    #[test]
    fn test_otsu_spread_modes() {
        let mut buckets = [0u64; 256];
        for v in 20..=40 {
            buckets[v] = 5;
        }
        for v in 200..=220 {
            buckets[v] = 5;
        }
        let threshold = Histogram::from_buckets(buckets).otsu();
        assert!(threshold >= 40 && threshold < 200, "threshold {threshold}");
    }

    #[test]
    fn test_otsu_uniform_image_is_zero() {
        let buffer = PixelBuffer::from_pixel(4, 4, Rgba([90, 90, 90, 255])).unwrap();
        assert_eq!(otsu_threshold(&buffer), 0);
    }

    #[test]
    fn test_transparent_pixels_count_as_white() {
        let buffer = PixelBuffer::from_pixel(2, 2, Rgba([0, 0, 0, 0])).unwrap();
        let histogram = Histogram::from_buffer(&buffer);
        assert_eq!(histogram.buckets()[255], 4);
    }
}
