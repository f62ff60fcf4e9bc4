//! Dithering algorithms for reducing a continuous-tone buffer.
//!
//! Error-diffusion variants scan rows top to bottom and columns left to
//! right, reading neighbors from a signed working copy and writing quantized
//! pixels to the output buffer. Error distribution pattern:
//! - Right:        7/16
//! - Bottom-left:  3/16
//! - Bottom:       5/16
//! - Bottom-right: 1/16

use image::Rgba;
use tracing::debug;

use crate::buffer::PixelBuffer;

/// Channel cut point for bilevel quantization.
const THRESHOLD: i32 = 128;

/// Floyd-Steinberg kernel as `(dx, dy, weight)`.
const KERNEL: [(isize, usize, f64); 4] = [
    (1, 0, 7.0 / 16.0),
    (-1, 1, 3.0 / 16.0),
    (0, 1, 5.0 / 16.0),
    (1, 1, 1.0 / 16.0),
];

/// Fixed set of reference colors for palette quantization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    colors: &'static [Rgba<u8>],
}

impl Palette {
    /// Black, the primaries and secondaries, and white, all opaque.
    pub const EIGHT_COLOR: Palette = Palette::new(&[
        Rgba([0, 0, 0, 255]),
        Rgba([255, 0, 0, 255]),
        Rgba([0, 255, 0, 255]),
        Rgba([0, 0, 255, 255]),
        Rgba([255, 255, 0, 255]),
        Rgba([255, 0, 255, 255]),
        Rgba([0, 255, 255, 255]),
        Rgba([255, 255, 255, 255]),
    ]);

    pub const fn new(colors: &'static [Rgba<u8>]) -> Self {
        Self { colors }
    }

    pub fn colors(&self) -> &'static [Rgba<u8>] {
        self.colors
    }

    /// Entry with the smallest squared distance over all four channels.
    /// The first minimal entry wins.
    pub fn nearest(&self, channels: [i32; 4]) -> Option<Rgba<u8>> {
        let mut best: Option<(i64, Rgba<u8>)> = None;
        for &color in self.colors {
            let distance: i64 = (0..4)
                .map(|c| {
                    let d = i64::from(channels[c]) - i64::from(color.0[c]);
                    d * d
                })
                .sum();
            if best.is_none_or(|(min, _)| distance < min) {
                best = Some((distance, color));
            }
        }
        best.map(|(_, color)| color)
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::EIGHT_COLOR
    }
}

/// Threshold matrix for ordered dithering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BayerMatrix {
    Bayer2,
    Bayer4,
    Bayer8,
}

#[rustfmt::skip]
const BAYER_2: [u8; 4] = [
    1, 3,
    4, 2,
];

#[rustfmt::skip]
const BAYER_4: [u8; 16] = [
     1,  9,  3, 11,
    13,  5, 15,  7,
     4, 12,  2, 10,
    16,  8, 14,  6,
];

#[rustfmt::skip]
const BAYER_8: [u8; 64] = [
     1, 49, 13, 61,  4, 52, 16, 64,
    33, 17, 45, 29, 36, 20, 48, 32,
     9, 57,  5, 53, 12, 60,  8, 56,
    41, 25, 37, 21, 44, 28, 40, 24,
     3, 51, 15, 63,  2, 50, 14, 62,
    35, 19, 47, 31, 34, 18, 46, 30,
    11, 59,  7, 55, 10, 58,  6, 54,
    43, 27, 39, 23, 42, 26, 38, 22,
];

impl BayerMatrix {
    pub fn size(&self) -> usize {
        match self {
            BayerMatrix::Bayer2 => 2,
            BayerMatrix::Bayer4 => 4,
            BayerMatrix::Bayer8 => 8,
        }
    }

    /// Normalized threshold in (0, 1) for a pixel position.
    pub fn threshold(&self, x: usize, y: usize) -> f64 {
        let n = self.size();
        let entries: &[u8] = match self {
            BayerMatrix::Bayer2 => &BAYER_2,
            BayerMatrix::Bayer4 => &BAYER_4,
            BayerMatrix::Bayer8 => &BAYER_8,
        };
        f64::from(entries[(y % n) * n + x % n]) / (n * n + 1) as f64
    }
}

/// The closed set of dithering algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ditherer {
    /// Bilevel per-channel Floyd-Steinberg; diffused values are clamped.
    FloydSteinberg,
    /// Nearest-palette-color Floyd-Steinberg; diffused error is not clamped.
    Palette(Palette),
    /// Position-dependent thresholds, no error diffusion.
    Ordered(BayerMatrix),
}

impl Ditherer {
    /// Dither the buffer in place.
    pub fn apply(&self, buffer: &mut PixelBuffer) {
        let (width, height) = buffer.dimensions();
        debug!(width, height, ditherer = ?self, "Applying dithering");

        match self {
            Ditherer::FloydSteinberg => {
                floyd_steinberg(buffer);
            }
            Ditherer::Palette(palette) => {
                palette_dither(buffer, palette);
            }
            Ditherer::Ordered(matrix) => ordered_dither(buffer, matrix),
        }

        debug!("Dithering complete");
    }
}

/// Returns the working copy, which holds every pre-quantization value.
fn floyd_steinberg(buffer: &mut PixelBuffer) -> Vec<[i32; 4]> {
    let (width, height) = (buffer.width() as usize, buffer.height() as usize);
    let mut work = buffer.to_channels();

    for (idx, pixel) in buffer.pixels_mut().enumerate() {
        let old = work[idx];
        let new = old.map(|c| if c < THRESHOLD { 0 } else { 255 });
        *pixel = Rgba(new.map(|c| c as u8));

        let error = std::array::from_fn(|c| old[c] - new[c]);
        distribute_error(&mut work, idx, width, height, error, |current, delta| {
            ((f64::from(current) + delta) as i32).clamp(0, 255)
        });
    }

    work
}

fn palette_dither(buffer: &mut PixelBuffer, palette: &Palette) -> Vec<[i32; 4]> {
    let (width, height) = (buffer.width() as usize, buffer.height() as usize);
    let mut work = buffer.to_channels();

    for (idx, pixel) in buffer.pixels_mut().enumerate() {
        let old = work[idx];
        let Some(new) = palette.nearest(old) else {
            debug!("Empty palette, leaving buffer unchanged");
            break;
        };
        *pixel = new;

        let error = std::array::from_fn(|c| old[c] - i32::from(new.0[c]));
        distribute_error(&mut work, idx, width, height, error, |current, delta| {
            current.saturating_add(delta as i32)
        });
    }

    work
}

fn ordered_dither(buffer: &mut PixelBuffer, matrix: &BayerMatrix) {
    let width = buffer.width() as usize;

    for (idx, pixel) in buffer.pixels_mut().enumerate() {
        let threshold = matrix.threshold(idx % width, idx / width);
        *pixel = Rgba(pixel.0.map(|c| {
            if f64::from(c) / 255.0 < threshold { 0 } else { 255 }
        }));
    }
}

/// Distribute quantization error to the not-yet-visited neighbors of `idx`.
fn distribute_error(
    work: &mut [[i32; 4]],
    idx: usize,
    width: usize,
    height: usize,
    error: [i32; 4],
    combine: impl Fn(i32, f64) -> i32,
) {
    let (x, y) = (idx % width, idx / width);

    for (dx, dy, weight) in KERNEL {
        let Some(nx) = x.checked_add_signed(dx) else {
            continue;
        };
        let ny = y + dy;
        if nx >= width || ny >= height {
            continue;
        }
        let neighbor = &mut work[ny * width + nx];
        for c in 0..4 {
            neighbor[c] = combine(neighbor[c], f64::from(error[c]) * weight);
        }
    }
}
