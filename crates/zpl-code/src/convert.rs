//! Image to `^GFA` conversion pipeline.
//!
//! resize -> filter -> dither -> threshold -> pack -> compress -> checksum -> command

use pixel_image::{ColorFilter, GrayScale, PixelBuffer, RasterBytes, resized_dimension};
use tracing::debug;

use crate::command::GraphicField;
use crate::options::ConvertOptions;
use crate::Result;

/// Convert a decoded image into a ZPL graphic field.
pub fn image_to_zpl(image: PixelBuffer, options: &ConvertOptions) -> Result<String> {
    let (actual_width, actual_height) = image.dimensions();

    let max_width = options
        .width
        .filter(|&w| w > 0)
        .unwrap_or(actual_width);
    let max_height = options.height.filter(|&h| h > 0).unwrap_or_else(|| {
        (u64::from(actual_height) * u64::from(max_width) / u64::from(actual_width)) as u32
    });

    let desired_width = resized_dimension(max_width, max_height, actual_width, actual_height);
    let desired_height = resized_dimension(max_height, max_width, actual_height, actual_width);

    debug!(
        actual_width,
        actual_height,
        max_width,
        max_height,
        desired_width,
        desired_height,
        "Converting image to graphic field"
    );

    let mut image = image.scale(desired_width, desired_height);

    match options.filter {
        Some(filter) => image.apply_filter(&filter),
        None if options.dither => image.apply_filter(&ColorFilter::GrayScale(GrayScale::DEFAULT)),
        None => {}
    }

    if options.dither {
        options.dither_mode.ditherer().apply(&mut image);
    }

    let threshold = options.threshold.resolve(&image);
    let raster = RasterBytes::pack(&image, threshold);

    let (x, y) = match (options.x, options.y) {
        (None, None) if options.center => (
            Some((max_width as i32 - image.width() as i32) / 2),
            Some((max_height as i32 - image.height() as i32) / 2),
        ),
        offsets => offsets,
    };

    let field = GraphicField::from_raster(&raster)?.with_origin(x, y);
    Ok(field.to_zpl(options.standalone))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crc::crc_hex;
    use crate::options::{DitherMode, ThresholdMode};
    use base64::Engine;
    use base64::engine::general_purpose::STANDARD;
    use flate2::read::ZlibDecoder;
    use image::{Rgba, RgbaImage};
    use std::io::Read;

    const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);
    const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

    /// Split `^GFA,total,total,row,:Z64:payload:crc` into its parts.
    fn parse_field(zpl: &str) -> (usize, usize, String, String) {
        let start = zpl.find("^GFA,").expect("no ^GFA") + 5;
        let body = zpl[start..].trim_end_matches("^XZ");
        let (header, rest) = body.split_once(":Z64:").unwrap();
        let counts: Vec<usize> = header
            .trim_end_matches(',')
            .split(',')
            .map(|v| v.parse().unwrap())
            .collect();
        assert_eq!(counts[0], counts[1]);
        let (payload, crc) = rest.rsplit_once(':').unwrap();
        (counts[0], counts[2], payload.to_string(), crc.to_string())
    }

    fn inflate_payload(payload: &str) -> Vec<u8> {
        let compressed = STANDARD.decode(payload).unwrap();
        let mut out = Vec::new();
        ZlibDecoder::new(&compressed[..])
            .read_to_end(&mut out)
            .unwrap();
        out
    }

    #[test]
    fn test_black_square_end_to_end() {
        let image = PixelBuffer::from_pixel(16, 16, BLACK).unwrap();
        let zpl = image_to_zpl(image, &ConvertOptions::new()).unwrap();

        assert!(zpl.starts_with("^GFA,32,32,2,:Z64:"));
        assert!(!zpl.contains("^XA") && !zpl.contains("^FO"));

        let (total, row, payload, crc) = parse_field(&zpl);
        assert_eq!((total, row), (32, 2));
        assert_eq!(crc, crc_hex(&payload));
        assert_eq!(inflate_payload(&payload), vec![0xFF; 32]);
    }

    #[test]
    fn test_standalone_with_explicit_origin() {
        let image = PixelBuffer::from_pixel(8, 8, WHITE).unwrap();
        let options = ConvertOptions::new().with_origin(30, 40).with_standalone(true);
        let zpl = image_to_zpl(image, &options).unwrap();
        assert!(zpl.starts_with("^XA^FO30,40^GFA,8,8,1,:Z64:"));
        assert!(zpl.ends_with("^XZ"));

        let (_, _, payload, _) = parse_field(&zpl);
        assert_eq!(inflate_payload(&payload), vec![0x00; 8]);
    }

    #[test]
    fn test_resizes_into_bounding_box() {
        let image = PixelBuffer::from_pixel(200, 100, BLACK).unwrap();
        let options = ConvertOptions::new().with_size(100, 100);
        let zpl = image_to_zpl(image, &options).unwrap();

        // 100x50 -> 13 bytes per row, 625 bit-plane bytes
        let (total, row, payload, _) = parse_field(&zpl);
        assert_eq!((total, row), (625, 13));
        assert_eq!(inflate_payload(&payload).len(), 13 * 50);
    }

    #[test]
    fn test_center_offsets() {
        let image = PixelBuffer::from_pixel(200, 100, BLACK).unwrap();
        let options = ConvertOptions::new().with_size(100, 100).with_center(true);
        let zpl = image_to_zpl(image, &options).unwrap();
        assert!(zpl.starts_with("^FO0,25^GFA,"), "{zpl}");
    }

    #[test]
    fn test_explicit_offsets_override_center() {
        let image = PixelBuffer::from_pixel(200, 100, BLACK).unwrap();
        let options = ConvertOptions::new()
            .with_size(100, 100)
            .with_center(true)
            .with_origin(3, 4);
        let zpl = image_to_zpl(image, &options).unwrap();
        assert!(zpl.starts_with("^FO3,4^GFA,"));
    }

    #[test]
    fn test_center_ignored_with_single_offset() {
        let image = PixelBuffer::from_pixel(200, 100, BLACK).unwrap();
        let mut options = ConvertOptions::new().with_size(100, 100).with_center(true);
        options.x = Some(3);
        let zpl = image_to_zpl(image, &options).unwrap();
        assert!(zpl.starts_with("^GFA,"), "{zpl}");
    }

    #[test]
    fn test_dithered_gray_is_mixed() {
        let image = PixelBuffer::from_pixel(16, 16, Rgba([128, 128, 128, 255])).unwrap();
        let zpl = image_to_zpl(image, &ConvertOptions::new().with_dither(true)).unwrap();
        let (_, _, payload, _) = parse_field(&zpl);
        let raster = inflate_payload(&payload);
        let ink: u32 = raster.iter().map(|b| b.count_ones()).sum();
        assert!(ink > 0 && ink < 256, "ink dots {ink}");
    }

    #[test]
    fn test_palette_and_ordered_modes_encode() {
        for mode in [DitherMode::Palette, DitherMode::Ordered] {
            let image = PixelBuffer::from_pixel(12, 6, Rgba([90, 140, 200, 255])).unwrap();
            let options = ConvertOptions::new().with_dither(true).with_dither_mode(mode);
            let (total, row, payload, crc) = parse_field(&image_to_zpl(image, &options).unwrap());
            assert_eq!((total, row), (9, 2));
            assert_eq!(crc, crc_hex(&payload));
        }
    }

    #[test]
    fn test_otsu_threshold_mode() {
        // Dark gray on light gray: a fixed 127 cut would print nothing.
        let img = RgbaImage::from_fn(16, 4, |x, _| {
            if x < 8 { Rgba([140, 140, 140, 255]) } else { Rgba([230, 230, 230, 255]) }
        });
        let image = PixelBuffer::new(img).unwrap();

        let fixed = image_to_zpl(image.clone(), &ConvertOptions::new()).unwrap();
        let (_, _, payload, _) = parse_field(&fixed);
        assert!(inflate_payload(&payload).iter().all(|&b| b == 0));

        let options = ConvertOptions::new().with_threshold(ThresholdMode::Otsu);
        let (_, _, payload, _) = parse_field(&image_to_zpl(image, &options).unwrap());
        for row in inflate_payload(&payload).chunks(2) {
            assert_eq!(row, &[0xFF, 0x00]);
        }
    }
}
