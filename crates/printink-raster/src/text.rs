//! Glyph rendering for text nodes.
//!
//! Glyphs are shaped with cosmic-text and drawn as vector outlines, so
//! text scales cleanly to any export density instead of being blitted
//! from a low-resolution mask.

use crate::rasterizer::color_paint;
use cosmic_text::{Attrs, Buffer, CacheKeyFlags, Command, Family, FontSystem, Metrics, Shaping, SwashCache};
use printink_core::nodes::{Text, LINE_HEIGHT_FACTOR};
use tiny_skia::{PathBuilder, Pixmap, Transform};

/// Map a document font family to a cosmic-text family.
fn resolve_family(name: &str) -> Family<'_> {
    match name {
        "sans-serif" => Family::SansSerif,
        "serif" => Family::Serif,
        "monospace" => Family::Monospace,
        "cursive" => Family::Cursive,
        other => Family::Name(other),
    }
}

/// Draw a text node's glyphs into the pixmap.
///
/// The fill paints the glyph bodies first; the optional text stroke is
/// drawn over the fill. Without a fill the bodies are skipped but the
/// stroke still renders.
pub(crate) fn draw_text(
    font_system: &mut FontSystem,
    swash_cache: &mut SwashCache,
    pixmap: &mut Pixmap,
    text: &Text,
    transform: Transform,
) {
    if text.content.is_empty() {
        return;
    }

    let font_size = text.font_size as f32;
    let metrics = Metrics::new(font_size, font_size * LINE_HEIGHT_FACTOR as f32);
    let mut buffer = Buffer::new(font_system, metrics);

    // Disable hinting so outlines stay resolution-independent
    let mut attrs = Attrs::new()
        .family(resolve_family(&text.font_family))
        .cache_key_flags(CacheKeyFlags::DISABLE_HINTING);
    if let Some(spacing) = text.letter_spacing {
        attrs = attrs.letter_spacing(spacing as f32);
    }

    buffer.set_text(font_system, &text.content, &attrs, Shaping::Advanced, None);
    buffer.shape_until_scroll(font_system, false);

    let base_x = text.position.x as f32;
    let base_y = text.position.y as f32;

    // Collect positioned glyph outlines once, then run the paint passes
    let mut glyph_paths = Vec::new();
    for run in buffer.layout_runs() {
        for glyph in run.glyphs.iter() {
            let physical = glyph.physical((base_x, base_y + run.line_y), 1.0);
            let glyph_x = base_x + glyph.x + glyph.font_size * glyph.x_offset;
            let glyph_y = base_y + run.line_y + glyph.y - glyph.font_size * glyph.y_offset;

            let Some(commands) = swash_cache.get_outline_commands(font_system, physical.cache_key)
            else {
                continue;
            };

            // Font outlines have Y up; the canvas has Y down
            let mut builder = PathBuilder::new();
            for cmd in commands {
                match cmd {
                    Command::MoveTo(p) => builder.move_to(p.x, -p.y),
                    Command::LineTo(p) => builder.line_to(p.x, -p.y),
                    Command::QuadTo(ctrl, end) => builder.quad_to(ctrl.x, -ctrl.y, end.x, -end.y),
                    Command::CurveTo(c1, c2, end) => {
                        builder.cubic_to(c1.x, -c1.y, c2.x, -c2.y, end.x, -end.y)
                    }
                    Command::Close => builder.close(),
                }
            }
            if let Some(path) = builder.finish() {
                let glyph_transform =
                    Transform::from_translate(glyph_x, glyph_y).post_concat(transform);
                glyph_paths.push((path, glyph_transform));
            }
        }
    }

    let opacity = text.style.opacity;
    if let Some(paint) = text.style.fill.and_then(|fill| color_paint(fill, opacity)) {
        for (path, glyph_transform) in &glyph_paths {
            pixmap.fill_path(
                path,
                &paint,
                tiny_skia::FillRule::Winding,
                *glyph_transform,
                None,
            );
        }
    }

    if let Some(text_stroke) = text.text_stroke {
        if let Some(paint) = color_paint(text_stroke.color, opacity) {
            let stroke = tiny_skia::Stroke {
                width: text_stroke.width as f32,
                ..Default::default()
            };
            for (path, glyph_transform) in &glyph_paths {
                pixmap.stroke_path(path, &paint, &stroke, *glyph_transform, None);
            }
        }
    }
}
