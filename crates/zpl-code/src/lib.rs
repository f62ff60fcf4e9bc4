//! ZPL graphic field encoding.
//!
//! Converts a pixel buffer into a compressed, CRC-protected `^GFA` command
//! for Zebra label printers.

pub mod command;
pub mod compress;
pub mod convert;
pub mod crc;
pub mod options;

// Re-exports for convenience
pub use command::GraphicField;
pub use compress::{deflate, encode_z64};
pub use convert::image_to_zpl;
pub use crc::{crc16_ccitt, crc_hex};
pub use options::{ConvertOptions, DitherMode, ThresholdMode};

/// Errors that can occur while encoding a graphic field.
#[derive(Debug, thiserror::Error)]
pub enum ZplError {
    #[error(transparent)]
    Image(#[from] pixel_image::ImageError),

    #[error("Compression failed: {0}")]
    CompressionFailure(#[from] std::io::Error),
}

/// Result type alias for ZPL encoding operations.
pub type Result<T> = std::result::Result<T, ZplError>;
