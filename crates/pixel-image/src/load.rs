//! Decoding source images into pixel buffers.
//!
//! Accepts encoded image bytes, a base64 payload, or a `data:` URI carrying
//! a base64 payload.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use tracing::debug;

use crate::buffer::PixelBuffer;
use crate::{ImageError, Result};

/// Decode an encoded image (PNG, JPEG, ...) into a buffer.
pub fn from_bytes(bytes: &[u8]) -> Result<PixelBuffer> {
    let img = image::load_from_memory(bytes)
        .map_err(|e| ImageError::DecodeFailure(e.to_string()))?;
    debug!(width = img.width(), height = img.height(), "Decoded image");
    PixelBuffer::new(img.to_rgba8())
}

/// Decode a base64 payload, with or without a `data:<mime>;base64,` prefix.
pub fn from_base64(payload: &str) -> Result<PixelBuffer> {
    let data = match payload.strip_prefix("data:") {
        Some(uri) => uri
            .split_once(',')
            .map(|(_, data)| data)
            .ok_or_else(|| ImageError::DecodeFailure("data URI has no payload".into()))?,
        None => payload,
    };

    let cleaned: String = data.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    let bytes = STANDARD
        .decode(cleaned)
        .map_err(|e| ImageError::DecodeFailure(e.to_string()))?;
    from_bytes(&bytes)
}
