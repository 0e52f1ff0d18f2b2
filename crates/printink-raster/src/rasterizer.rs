//! CPU rasterization of design documents.
//!
//! The renderer walks the document in paint order and draws every
//! visible node into a tiny-skia pixmap. All node geometry stays in
//! canvas-local pixels; the export density is applied as a single
//! uniform scale transform, so a 300 DPI export of an 800x1000 canvas
//! produces a 2500x3125 pixel image with identical layout.

use crate::assets::ImageAssets;
use crate::error::{ExportError, ExportResult};
use crate::text::draw_text;
use cosmic_text::{FontSystem, SwashCache};
use kurbo::Rect;
use printink_core::nodes::{Circle, Freehand, Image, NodeStyle, NodeTrait, Rectangle, SerializableColor, Triangle};
use printink_core::{export_scale, BackgroundMode, DesignDoc, DesignNode};
use tiny_skia::{Paint, Path, PathBuilder, Pixmap, PixmapPaint, Transform};

/// Hard cap on either output dimension.
const MAX_DIMENSION: u32 = 32767;

/// Output geometry for one export.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExportTarget {
    /// Canvas width in canvas-local pixels.
    pub width: f64,
    /// Canvas height in canvas-local pixels.
    pub height: f64,
    /// Target print density in dots per inch.
    pub dpi: f64,
}

impl ExportTarget {
    pub fn new(width: f64, height: f64, dpi: f64) -> Self {
        Self { width, height, dpi }
    }

    /// Target covering the document's whole canvas at its configured DPI.
    pub fn from_doc(doc: &DesignDoc) -> Self {
        Self {
            width: doc.canvas.width,
            height: doc.canvas.height,
            dpi: doc.canvas.dpi,
        }
    }

    /// Output dimensions in device pixels, rounded once at this
    /// boundary. Rejects empty and oversized outputs.
    pub fn pixel_size(&self) -> ExportResult<(u32, u32)> {
        let scale = export_scale(self.dpi);
        if !scale.is_finite() || scale <= 0.0 {
            return Err(ExportError::InvalidDimensions { width: 0, height: 0 });
        }
        let width = (self.width * scale).round();
        let height = (self.height * scale).round();
        if !(width >= 1.0 && height >= 1.0) {
            return Err(ExportError::InvalidDimensions { width: 0, height: 0 });
        }
        let (width, height) = (width as u32, height as u32);
        if width > MAX_DIMENSION || height > MAX_DIMENSION {
            return Err(ExportError::InvalidDimensions { width, height });
        }
        Ok((width, height))
    }
}

pub(crate) fn color_paint(color: SerializableColor, opacity: f64) -> Option<Paint<'static>> {
    let color = color.with_opacity(opacity);
    if color.a == 0 {
        return None;
    }
    let mut paint = Paint {
        anti_alias: true,
        ..Default::default()
    };
    paint.set_color_rgba8(color.r, color.g, color.b, color.a);
    Some(paint)
}

/// Stateful renderer owning the font system.
///
/// Font loading is expensive and `FontSystem` is not `Sync`, so one
/// rasterizer lives on one thread and is reused across exports (see
/// [`crate::worker`]).
pub struct Rasterizer {
    font_system: FontSystem,
    swash_cache: SwashCache,
}

impl Default for Rasterizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Rasterizer {
    pub fn new() -> Self {
        Self {
            font_system: FontSystem::new(),
            swash_cache: SwashCache::new(),
        }
    }

    /// Register an in-memory font (TTF/OTF bytes) with the font
    /// database, alongside whatever the host system provides.
    pub fn load_font_data(&mut self, data: Vec<u8>) {
        self.font_system.db_mut().load_font_data(data);
    }

    /// Render a document into a premultiplied RGBA pixmap.
    ///
    /// Image nodes must have decoded pixels in `assets`; a visible image
    /// without one fails the whole export rather than silently dropping
    /// artwork from a print.
    pub fn render(
        &mut self,
        doc: &DesignDoc,
        assets: &ImageAssets,
        target: &ExportTarget,
    ) -> ExportResult<Pixmap> {
        let (width, height) = target.pixel_size()?;
        let mut pixmap =
            Pixmap::new(width, height).ok_or(ExportError::InvalidDimensions { width, height })?;

        if let BackgroundMode::Solid { color } = doc.canvas.background {
            pixmap.fill(tiny_skia::Color::from_rgba8(
                color.r, color.g, color.b, color.a,
            ));
        }

        let scale = export_scale(target.dpi) as f32;
        log::debug!(
            "rendering {} node(s) at {}x{} ({} dpi)",
            doc.len(),
            width,
            height,
            target.dpi
        );

        for node in &doc.nodes {
            if !node.is_visible() {
                continue;
            }
            let transform = node_transform(node.rotation(), node.bounds(), scale);
            match node {
                DesignNode::Rect(rect) => self.draw_rect(&mut pixmap, rect, transform),
                DesignNode::Circle(circle) => self.draw_circle(&mut pixmap, circle, transform),
                DesignNode::Triangle(tri) => self.draw_triangle(&mut pixmap, tri, transform),
                DesignNode::Text(text) => draw_text(
                    &mut self.font_system,
                    &mut self.swash_cache,
                    &mut pixmap,
                    text,
                    transform,
                ),
                DesignNode::Image(image) => {
                    self.draw_image(&mut pixmap, image, assets, transform)?
                }
                DesignNode::Path(freehand) => self.draw_freehand(&mut pixmap, freehand, transform),
            }
        }

        Ok(pixmap)
    }

    fn draw_rect(&mut self, pixmap: &mut Pixmap, rect: &Rectangle, transform: Transform) {
        let Some(ts_rect) = tiny_skia::Rect::from_xywh(
            rect.position.x as f32,
            rect.position.y as f32,
            rect.width as f32,
            rect.height as f32,
        ) else {
            return;
        };
        let path = PathBuilder::from_rect(ts_rect);
        fill_and_stroke(pixmap, &path, &rect.style, transform);
    }

    fn draw_circle(&mut self, pixmap: &mut Pixmap, circle: &Circle, transform: Transform) {
        let Some(oval) = tiny_skia::Rect::from_xywh(
            circle.position.x as f32,
            circle.position.y as f32,
            circle.width as f32,
            circle.height as f32,
        ) else {
            return;
        };
        let Some(path) = PathBuilder::from_oval(oval) else {
            return;
        };
        fill_and_stroke(pixmap, &path, &circle.style, transform);
    }

    fn draw_triangle(&mut self, pixmap: &mut Pixmap, tri: &Triangle, transform: Transform) {
        let [a, b, c] = tri.vertices();
        let mut builder = PathBuilder::new();
        builder.move_to(a.x as f32, a.y as f32);
        builder.line_to(b.x as f32, b.y as f32);
        builder.line_to(c.x as f32, c.y as f32);
        builder.close();
        let Some(path) = builder.finish() else {
            return;
        };
        fill_and_stroke(pixmap, &path, &tri.style, transform);
    }

    fn draw_freehand(&mut self, pixmap: &mut Pixmap, freehand: &Freehand, transform: Transform) {
        if freehand.points.len() < 2 {
            return;
        }
        let mut builder = PathBuilder::new();
        builder.move_to(freehand.points[0].x as f32, freehand.points[0].y as f32);
        for point in &freehand.points[1..] {
            builder.line_to(point.x as f32, point.y as f32);
        }
        let Some(path) = builder.finish() else {
            return;
        };

        let style = &freehand.style;
        if let Some(paint) = style.stroke.and_then(|c| color_paint(c, style.opacity)) {
            let stroke = tiny_skia::Stroke {
                width: style.stroke_width.max(1.0) as f32,
                line_cap: tiny_skia::LineCap::Round,
                line_join: tiny_skia::LineJoin::Round,
                ..Default::default()
            };
            pixmap.stroke_path(&path, &paint, &stroke, transform, None);
        }
    }

    fn draw_image(
        &mut self,
        pixmap: &mut Pixmap,
        image: &Image,
        assets: &ImageAssets,
        transform: Transform,
    ) -> ExportResult<()> {
        let asset = assets.get(image.id()).ok_or(ExportError::MissingAsset(image.id()))?;
        if asset.width() == 0 || asset.height() == 0 {
            return Ok(());
        }
        let paint = PixmapPaint {
            opacity: image.style.opacity.clamp(0.0, 1.0) as f32,
            ..Default::default()
        };
        // Place the decoded pixels into the node's display rect
        let transform = transform
            .pre_translate(image.position.x as f32, image.position.y as f32)
            .pre_scale(
                (image.width / asset.width() as f64) as f32,
                (image.height / asset.height() as f64) as f32,
            );
        pixmap.draw_pixmap(0, 0, asset.as_ref(), &paint, transform, None);
        Ok(())
    }
}

/// Local-to-device transform for a node: rotate around the bounds
/// center in canvas space, then scale to the export density.
fn node_transform(rotation_deg: f64, bounds: Rect, scale: f32) -> Transform {
    let base = Transform::from_scale(scale, scale);
    if rotation_deg == 0.0 {
        return base;
    }
    let center = bounds.center();
    Transform::from_rotate_at(rotation_deg as f32, center.x as f32, center.y as f32)
        .post_concat(base)
}

/// Fill first, stroke over it. Stroke width is in canvas-local pixels
/// and scales with the export transform.
fn fill_and_stroke(pixmap: &mut Pixmap, path: &Path, style: &NodeStyle, transform: Transform) {
    if let Some(paint) = style.fill.and_then(|c| color_paint(c, style.opacity)) {
        pixmap.fill_path(path, &paint, tiny_skia::FillRule::Winding, transform, None);
    }
    if style.stroke_width > 0.0 {
        if let Some(paint) = style.stroke.and_then(|c| color_paint(c, style.opacity)) {
            let stroke = tiny_skia::Stroke {
                width: style.stroke_width as f32,
                ..Default::default()
            };
            pixmap.stroke_path(path, &paint, &stroke, transform, None);
        }
    }
}
