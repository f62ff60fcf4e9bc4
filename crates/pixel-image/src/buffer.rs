//! RGBA pixel buffer with bounds-checked access.

use image::{Rgba, RgbaImage};
use tracing::debug;

use crate::filter::ColorFilter;
use crate::{ImageError, Result};

/// Luminance of a pixel in the range 0..=255.
///
/// Pixels with alpha below 128 count as white so transparent areas never
/// print.
pub fn luminance(pixel: Rgba<u8>) -> u8 {
    let [r, g, b, a] = pixel.0;
    if a < 128 {
        return 255;
    }
    let value = 0.2989 * f64::from(r) + 0.5870 * f64::from(g) + 0.1140 * f64::from(b);
    value.round().clamp(0.0, 255.0) as u8
}

/// Dense row-major RGBA image owned by a single conversion.
///
/// Width and height are always non-zero.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelBuffer {
    image: RgbaImage,
}

impl PixelBuffer {
    /// Wrap an RGBA image, rejecting zero-sized images.
    pub fn new(image: RgbaImage) -> Result<Self> {
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(ImageError::InvalidBuffer(format!(
                "dimensions must be non-zero, got {width}x{height}"
            )));
        }
        Ok(Self { image })
    }

    /// Create a buffer filled with a single color.
    pub fn from_pixel(width: u32, height: u32, pixel: Rgba<u8>) -> Result<Self> {
        Self::new(RgbaImage::from_pixel(width, height, pixel))
    }

    /// Build a buffer from a packed `0xAARRGGBB` accessor.
    pub fn from_argb_fn<F>(width: u32, height: u32, mut argb: F) -> Result<Self>
    where
        F: FnMut(u32, u32) -> u32,
    {
        Self::new(RgbaImage::from_fn(width, height, |x, y| {
            let v = argb(x, y);
            Rgba([(v >> 16) as u8, (v >> 8) as u8, v as u8, (v >> 24) as u8])
        }))
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    /// Borrow the underlying image.
    pub fn as_image(&self) -> &RgbaImage {
        &self.image
    }

    fn check_bounds(&self, x: u32, y: u32) -> Result<()> {
        let (width, height) = self.dimensions();
        if x >= width || y >= height {
            return Err(ImageError::OutOfBounds {
                x,
                y,
                width,
                height,
            });
        }
        Ok(())
    }

    /// Read the pixel at `(x, y)`.
    pub fn get(&self, x: u32, y: u32) -> Result<Rgba<u8>> {
        self.check_bounds(x, y)?;
        Ok(*self.image.get_pixel(x, y))
    }

    /// Write `[r, g, b, a]` at `(x, y)`, clamping each channel to 0..=255.
    pub fn set(&mut self, x: u32, y: u32, channels: [i32; 4]) -> Result<()> {
        self.check_bounds(x, y)?;
        self.image
            .put_pixel(x, y, Rgba(channels.map(|c| c.clamp(0, 255) as u8)));
        Ok(())
    }

    /// Apply a color filter to every pixel in place.
    pub fn apply_filter(&mut self, filter: &ColorFilter) {
        debug!(
            width = self.width(),
            height = self.height(),
            ?filter,
            "Applying color filter"
        );
        for pixel in self.image.pixels_mut() {
            *pixel = filter.apply(*pixel);
        }
    }

    /// Copy every channel into a signed working buffer, row-major.
    pub(crate) fn to_channels(&self) -> Vec<[i32; 4]> {
        self.image
            .pixels()
            .map(|p| p.0.map(i32::from))
            .collect()
    }

    pub(crate) fn pixels_mut(&mut self) -> impl Iterator<Item = &mut Rgba<u8>> {
        self.image.pixels_mut()
    }
}
