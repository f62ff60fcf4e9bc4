//! `^GFA` graphic field assembly.
//!
//! Grammar:
//! `[^XA][^FOx,y]^GFA,<total>,<total>,<bytesPerRow>,:Z64:<payload>:<crc>[^XZ]`

use pixel_image::RasterBytes;
use tracing::debug;

use crate::compress::encode_z64;
use crate::crc::crc_hex;
use crate::Result;

/// A compressed graphic field ready to be written into a label format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphicField {
    origin_x: Option<i32>,
    origin_y: Option<i32>,
    total_bytes: usize,
    bytes_per_row: usize,
    payload: String,
    crc: String,
}

impl GraphicField {
    /// Compress a raster and checksum its base64 text.
    pub fn from_raster(raster: &RasterBytes) -> Result<Self> {
        let payload = encode_z64(raster.as_bytes())?;
        let crc = crc_hex(&payload);
        debug!(
            total_bytes = raster.total_byte_count(),
            bytes_per_row = raster.bytes_per_row(),
            payload_len = payload.len(),
            crc = %crc,
            "Encoded graphic field"
        );
        Ok(Self {
            origin_x: None,
            origin_y: None,
            total_bytes: raster.total_byte_count(),
            bytes_per_row: raster.bytes_per_row(),
            payload,
            crc,
        })
    }

    /// Set the field origin. `^FO` is only written when both are present.
    pub fn with_origin(mut self, x: Option<i32>, y: Option<i32>) -> Self {
        self.origin_x = x;
        self.origin_y = y;
        self
    }

    pub fn total_bytes(&self) -> usize {
        self.total_bytes
    }

    pub fn bytes_per_row(&self) -> usize {
        self.bytes_per_row
    }

    pub fn payload(&self) -> &str {
        &self.payload
    }

    pub fn crc(&self) -> &str {
        &self.crc
    }

    /// Render the command.
    ///
    /// `standalone` wraps the field in `^XA`/`^XZ`; otherwise the result is a
    /// fragment for embedding in a larger format.
    pub fn to_zpl(&self, standalone: bool) -> String {
        let mut zpl = String::with_capacity(self.payload.len() + 64);

        if standalone {
            zpl.push_str("^XA");
        }
        if let (Some(x), Some(y)) = (self.origin_x, self.origin_y) {
            zpl.push_str(&format!("^FO{x},{y}"));
        }
        zpl.push_str(&format!(
            "^GFA,{total},{total},{row},:Z64:{payload}:{crc}",
            total = self.total_bytes,
            row = self.bytes_per_row,
            payload = self.payload,
            crc = self.crc,
        ));
        if standalone {
            zpl.push_str("^XZ");
        }

        zpl
    }
}
