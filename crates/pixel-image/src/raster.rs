//! 1-bit raster packing.
//!
//! Each row starts on a fresh byte, bits are MSB-first, and a set bit means
//! ink. Unused low bits of a row's last byte are zero.

use image::{Rgba, RgbaImage};
use tracing::debug;

use crate::buffer::{PixelBuffer, luminance};
use crate::Result;

const INK: Rgba<u8> = Rgba([0, 0, 0, 255]);
const PAPER: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Row-aligned 1-bit-per-pixel raster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterBytes {
    bytes: Vec<u8>,
    width: u32,
    height: u32,
}

impl RasterBytes {
    /// Pack a buffer; pixels with luminance `<= threshold` become ink.
    pub fn pack(buffer: &PixelBuffer, threshold: u8) -> Self {
        let (width, height) = buffer.dimensions();
        let bytes_per_row = bytes_per_row(width);
        let mut bytes = vec![0u8; bytes_per_row * height as usize];

        for (x, y, pixel) in buffer.as_image().enumerate_pixels() {
            if luminance(*pixel) <= threshold {
                let idx = y as usize * bytes_per_row + x as usize / 8;
                bytes[idx] |= 0x80 >> (x % 8);
            }
        }

        debug!(
            width,
            height,
            threshold,
            bytes = bytes.len(),
            "Packed raster"
        );

        Self {
            bytes,
            width,
            height,
        }
    }

    /// Rebuild an opaque black-and-white buffer from the packed bits.
    pub fn unpack(&self) -> Result<PixelBuffer> {
        let bytes_per_row = self.bytes_per_row();
        PixelBuffer::new(RgbaImage::from_fn(self.width, self.height, |x, y| {
            let byte = self.bytes[y as usize * bytes_per_row + x as usize / 8];
            if byte & (0x80 >> (x % 8)) != 0 { INK } else { PAPER }
        }))
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn bytes_per_row(&self) -> usize {
        bytes_per_row(self.width)
    }

    /// Uncompressed bit-plane size, `width * height / 8`.
    ///
    /// Differs from `bytes_per_row * height` when the width is not a
    /// multiple of 8.
    pub fn total_byte_count(&self) -> usize {
        self.width as usize * self.height as usize / 8
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn rows(&self) -> impl Iterator<Item = &[u8]> {
        self.bytes.chunks(self.bytes_per_row())
    }
}

fn bytes_per_row(width: u32) -> usize {
    (width as usize).div_ceil(8)
}
