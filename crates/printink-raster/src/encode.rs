//! PNG encoding of rendered pixmaps.

use crate::error::ExportResult;
use base64::{engine::general_purpose::STANDARD, Engine};
use tiny_skia::Pixmap;

const INCHES_PER_METER: f64 = 39.3701;

/// Encode a rendered pixmap as PNG with the print density recorded in
/// the pHYs chunk, so print software sizes the file correctly.
pub fn encode_png(pixmap: &Pixmap, dpi: f64) -> ExportResult<Vec<u8>> {
    let mut buf = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut buf, pixmap.width(), pixmap.height());
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        if dpi.is_finite() && dpi > 0.0 {
            let ppm = (dpi * INCHES_PER_METER).round() as u32;
            encoder.set_pixel_dims(Some(png::PixelDimensions {
                xppu: ppm,
                yppu: ppm,
                unit: png::Unit::Meter,
            }));
        }

        let mut writer = encoder.write_header()?;
        // tiny-skia stores premultiplied alpha; PNG wants straight
        writer.write_image_data(&demultiply(pixmap.data()))?;
    }
    Ok(buf)
}

/// Wrap encoded PNG bytes in a `data:` URI for direct embedding.
pub fn png_data_url(png_bytes: &[u8]) -> String {
    format!("data:image/png;base64,{}", STANDARD.encode(png_bytes))
}

fn demultiply(data: &[u8]) -> Vec<u8> {
    let mut out = data.to_vec();
    for px in out.chunks_exact_mut(4) {
        let a = px[3];
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
        } else if a != 255 {
            let alpha_f = a as f32 / 255.0;
            px[0] = (px[0] as f32 / alpha_f).min(255.0) as u8;
            px[1] = (px[1] as f32 / alpha_f).min(255.0) as u8;
            px[2] = (px[2] as f32 / alpha_f).min(255.0) as u8;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_png_signature_and_round_trip() {
        let mut pixmap = Pixmap::new(4, 4).unwrap();
        pixmap.fill(tiny_skia::Color::from_rgba8(10, 20, 30, 255));

        let bytes = encode_png(&pixmap, 300.0).unwrap();
        assert!(bytes.starts_with(&[0x89, 0x50, 0x4E, 0x47]));

        let decoder = png::Decoder::new(bytes.as_slice());
        let mut reader = decoder.read_info().unwrap();
        let mut pixels = vec![0u8; reader.output_buffer_size()];
        let info = reader.next_frame(&mut pixels).unwrap();
        assert_eq!(info.width, 4);
        assert_eq!(info.height, 4);
        assert_eq!(&pixels[0..4], &[10, 20, 30, 255]);
    }

    #[test]
    fn test_phys_chunk_carries_density() {
        let pixmap = Pixmap::new(2, 2).unwrap();
        let bytes = encode_png(&pixmap, 300.0).unwrap();

        let decoder = png::Decoder::new(bytes.as_slice());
        let reader = decoder.read_info().unwrap();
        let dims = reader.info().pixel_dims.unwrap();
        // 300 dpi is 11811 dots per meter
        assert_eq!(dims.xppu, 11811);
        assert_eq!(dims.yppu, 11811);
        assert_eq!(dims.unit, png::Unit::Meter);
    }

    #[test]
    fn test_demultiply_restores_straight_alpha() {
        // Premultiplied half-alpha red: (127, 0, 0, 127)
        let straight = demultiply(&[127, 0, 0, 127]);
        assert!(straight[0] >= 254);
        assert_eq!(straight[3], 127);

        // Fully transparent pixels normalize to zero
        let cleared = demultiply(&[55, 66, 77, 0]);
        assert_eq!(cleared, vec![0, 0, 0, 0]);
    }

    #[test]
    fn test_data_url_prefix() {
        let url = png_data_url(&[1, 2, 3]);
        assert!(url.starts_with("data:image/png;base64,"));
    }
}
