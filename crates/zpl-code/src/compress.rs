//! Raster compression for the `:Z64:` encoding.
//!
//! The raster is zlib-compressed at the default level and the result is
//! base64-encoded with the standard padded alphabet, without line breaks.

use std::io::Write;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use flate2::Compression;
use flate2::write::ZlibEncoder;
use tracing::debug;

use crate::Result;

/// zlib-compress a byte slice.
pub fn deflate(data: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::with_capacity(data.len()), Compression::default());
    encoder.write_all(data)?;
    let compressed = encoder.finish()?;
    debug!(
        input = data.len(),
        output = compressed.len(),
        "Compressed raster"
    );
    Ok(compressed)
}

/// Compress and base64-encode a byte slice.
pub fn encode_z64(data: &[u8]) -> Result<String> {
    Ok(STANDARD.encode(deflate(data)?))
}
