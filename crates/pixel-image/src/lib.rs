//! Pixel buffer processing for label printer graphics.
//!
//! Provides an RGBA pixel buffer with bounded access and resampling,
//! per-pixel color filters, error-diffusion and ordered dithering,
//! Otsu threshold estimation and 1-bit raster packing.

pub mod buffer;
pub mod dither;
pub mod filter;
pub mod load;
pub mod raster;
pub mod resize;
pub mod threshold;

// Re-exports for convenience
pub use buffer::{PixelBuffer, luminance};
pub use dither::{BayerMatrix, Ditherer, Palette};
pub use filter::{ColorFilter, GrayScale};
pub use raster::RasterBytes;
pub use resize::resized_dimension;
pub use threshold::{Histogram, otsu_threshold};

/// Threshold used by the printer graphics pipeline when none is estimated.
pub const DEFAULT_THRESHOLD: u8 = 127;

/// Errors that can occur while building or reading a pixel buffer.
#[derive(Debug, thiserror::Error)]
pub enum ImageError {
    #[error("Invalid pixel buffer: {0}")]
    InvalidBuffer(String),

    #[error("Pixel ({x}, {y}) is outside the {width}x{height} buffer")]
    OutOfBounds {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },

    #[error("Could not decode the image: {0}")]
    DecodeFailure(String),
}

/// Result type alias for pixel buffer operations.
pub type Result<T> = std::result::Result<T, ImageError>;
