//! CRC-16/CCITT checksum for `:Z64:` payloads.
//!
//! Polynomial 0x1021 (x^16 + x^12 + x^5 + 1), initial value 0x0000, no final
//! XOR, processed MSB-first.

const POLYNOMIAL: u16 = 0x1021;

/// Compute the CRC-16/CCITT (XModem) checksum over a byte slice.
pub fn crc16_ccitt(data: &[u8]) -> u16 {
    let mut crc: u16 = 0x0000;
    for &byte in data {
        for i in 0..8 {
            let bit = (byte >> (7 - i)) & 1 == 1;
            let c15 = (crc >> 15) & 1 == 1;
            crc <<= 1;
            if c15 ^ bit {
                crc ^= POLYNOMIAL;
            }
        }
    }
    crc
}

/// Checksum of a payload's characters as lowercase hex without padding.
///
/// Each character contributes its low byte. Printers parse the value as
/// written, so `0x0abc` renders as `abc`.
pub fn crc_hex(text: &str) -> String {
    let bytes: Vec<u8> = text.chars().map(|c| c as u32 as u8).collect();
    format!("{:x}", crc16_ccitt(&bytes))
}
