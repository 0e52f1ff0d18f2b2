//! Decoded image assets for export.
//!
//! Document JSON carries encoded image payloads; the rasterizer only
//! consumes decoded pixels. Decoding happens here, once per export, so
//! the render pass itself stays codec-free.

use crate::error::{ExportError, ExportResult};
use printink_core::nodes::{ImageFormat, NodeTrait};
use printink_core::{DesignDoc, DesignNode, NodeId};
use std::collections::HashMap;
use tiny_skia::{IntSize, Pixmap};

/// Map of decoded, premultiplied image pixels keyed by node id.
#[derive(Debug, Default)]
pub struct ImageAssets {
    pixmaps: HashMap<NodeId, Pixmap>,
}

impl ImageAssets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode every visible image node's payload in one pass.
    pub fn resolve(doc: &DesignDoc) -> ExportResult<Self> {
        let mut assets = Self::new();
        for node in &doc.nodes {
            let DesignNode::Image(image) = node else {
                continue;
            };
            if !image.visible {
                continue;
            }
            let encoded = image.data().ok_or_else(|| ExportError::ImageDecode {
                id: image.id(),
                reason: "payload is not valid base64".to_string(),
            })?;
            let decoded = decode_pixels(&encoded, image.format).map_err(|reason| {
                ExportError::ImageDecode {
                    id: image.id(),
                    reason,
                }
            })?;
            assets.insert_rgba(image.id(), decoded.width(), decoded.height(), decoded.into_raw())?;
        }
        log::debug!("resolved {} image asset(s)", assets.len());
        Ok(assets)
    }

    /// Insert straight-alpha RGBA pixels for a node, premultiplying for
    /// the rasterizer.
    pub fn insert_rgba(
        &mut self,
        id: NodeId,
        width: u32,
        height: u32,
        mut rgba: Vec<u8>,
    ) -> ExportResult<()> {
        let size = IntSize::from_wh(width, height)
            .ok_or(ExportError::InvalidDimensions { width, height })?;
        for px in rgba.chunks_exact_mut(4) {
            let a = px[3] as u16;
            if a < 255 {
                px[0] = ((px[0] as u16 * a) / 255) as u8;
                px[1] = ((px[1] as u16 * a) / 255) as u8;
                px[2] = ((px[2] as u16 * a) / 255) as u8;
            }
        }
        let pixmap = Pixmap::from_vec(rgba, size)
            .ok_or(ExportError::InvalidDimensions { width, height })?;
        self.pixmaps.insert(id, pixmap);
        Ok(())
    }

    pub fn get(&self, id: NodeId) -> Option<&Pixmap> {
        self.pixmaps.get(&id)
    }

    pub fn len(&self) -> usize {
        self.pixmaps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pixmaps.is_empty()
    }
}

fn decode_pixels(encoded: &[u8], format: ImageFormat) -> Result<image::RgbaImage, String> {
    let format = match format {
        ImageFormat::Png => image::ImageFormat::Png,
        ImageFormat::Jpeg => image::ImageFormat::Jpeg,
        ImageFormat::WebP => image::ImageFormat::WebP,
    };
    image::load_from_memory_with_format(encoded, format)
        .map(|img| img.to_rgba8())
        .map_err(|err| err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Point;
    use printink_core::nodes::Image;
    use uuid::Uuid;

    fn png_bytes(width: u32, height: u32, color: [u8; 4]) -> Vec<u8> {
        let pixels: Vec<u8> = color
            .iter()
            .copied()
            .cycle()
            .take((width * height * 4) as usize)
            .collect();
        let mut buf = Vec::new();
        {
            let mut encoder = png::Encoder::new(&mut buf, width, height);
            encoder.set_color(png::ColorType::Rgba);
            encoder.set_depth(png::BitDepth::Eight);
            let mut writer = encoder.write_header().unwrap();
            writer.write_image_data(&pixels).unwrap();
        }
        buf
    }

    #[test]
    fn test_resolve_decodes_image_nodes() {
        let bytes = png_bytes(4, 4, [255, 0, 0, 255]);
        let mut doc = DesignDoc::default();
        let id = doc.add_node(DesignNode::Image(Image::new(
            Point::ZERO,
            &bytes,
            4,
            4,
            ImageFormat::Png,
        )));

        let assets = ImageAssets::resolve(&doc).unwrap();
        let pixmap = assets.get(id).unwrap();
        assert_eq!(pixmap.width(), 4);
        assert_eq!(pixmap.height(), 4);
        assert_eq!(pixmap.data()[0], 255);
    }

    #[test]
    fn test_resolve_rejects_garbage_payload() {
        let mut doc = DesignDoc::default();
        let mut image = Image::new(Point::ZERO, &[1, 2, 3], 4, 4, ImageFormat::Png);
        image.data_base64 = "not real pixels".to_string();
        doc.add_node(DesignNode::Image(image));

        assert!(matches!(
            ImageAssets::resolve(&doc),
            Err(ExportError::ImageDecode { .. })
        ));
    }

    #[test]
    fn test_insert_rgba_premultiplies() {
        let mut assets = ImageAssets::new();
        let id = Uuid::new_v4();
        // Half-transparent white premultiplies to ~127
        assets
            .insert_rgba(id, 1, 1, vec![255, 255, 255, 127])
            .unwrap();
        let data = assets.get(id).unwrap().data();
        assert_eq!(data[3], 127);
        assert!(data[0] <= 127);
    }

    #[test]
    fn test_zero_size_rejected() {
        let mut assets = ImageAssets::new();
        assert!(assets.insert_rgba(Uuid::new_v4(), 0, 4, vec![]).is_err());
    }
}
