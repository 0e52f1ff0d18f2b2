//! Text node.

use super::{default_true, NodeId, NodeStyle, NodeTrait, SerializableColor};
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Line height multiplier applied on top of the font size.
pub const LINE_HEIGHT_FACTOR: f64 = 1.2;

/// Optional outline drawn around text glyphs, after the fill.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextStroke {
    pub color: SerializableColor,
    pub width: f64,
}

/// A text node. The fill color paints the glyphs; without a fill the
/// glyphs themselves are not drawn.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Text {
    pub(crate) id: NodeId,
    /// Top-left corner of the text block in canvas-local pixels.
    pub position: Point,
    pub content: String,
    /// Font size in canvas-local pixels.
    pub font_size: f64,
    /// Font family name as resolved by the rasterizer's font database.
    pub font_family: String,
    /// Extra advance between characters in pixels. When set, glyphs are
    /// positioned one at a time instead of as a shaped run.
    #[serde(default)]
    pub letter_spacing: Option<f64>,
    /// Optional glyph outline, drawn over the fill.
    #[serde(default)]
    pub text_stroke: Option<TextStroke>,
    /// Rotation in degrees around the bounds center.
    #[serde(default)]
    pub rotation: f64,
    #[serde(default = "default_true")]
    pub visible: bool,
    #[serde(default)]
    pub locked: bool,
    pub style: NodeStyle,
}

impl Text {
    pub const DEFAULT_FONT_SIZE: f64 = 24.0;

    pub fn new(position: Point, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            position,
            content: content.into(),
            font_size: Self::DEFAULT_FONT_SIZE,
            font_family: "sans-serif".to_string(),
            letter_spacing: None,
            text_stroke: None,
            rotation: 0.0,
            visible: true,
            locked: false,
            style: NodeStyle::default(),
        }
    }

    pub fn with_font_size(mut self, size: f64) -> Self {
        self.font_size = size;
        self
    }

    pub fn with_font_family(mut self, family: impl Into<String>) -> Self {
        self.font_family = family.into();
        self
    }

    pub fn with_letter_spacing(mut self, spacing: f64) -> Self {
        self.letter_spacing = Some(spacing);
        self
    }

    /// Approximate width from character count and font size.
    /// Accurate layout lives in the rasterizer; this only serves
    /// selection bounds in the interactive editor.
    fn approximate_width(&self) -> f64 {
        let max_line_len = self
            .content
            .lines()
            .map(|line| line.chars().count())
            .max()
            .unwrap_or(0);
        let spacing = self.letter_spacing.unwrap_or(0.0);
        max_line_len as f64 * (self.font_size * 0.55 + spacing)
    }

    fn approximate_height(&self) -> f64 {
        let line_count = self.content.lines().count().max(1);
        let line_count = if self.content.ends_with('\n') {
            line_count + 1
        } else {
            line_count
        };
        line_count as f64 * self.font_size * LINE_HEIGHT_FACTOR
    }
}

impl NodeTrait for Text {
    fn id(&self) -> NodeId {
        self.id
    }

    fn bounds(&self) -> Rect {
        let width = self.approximate_width().max(20.0);
        let height = self.approximate_height();
        Rect::new(
            self.position.x,
            self.position.y,
            self.position.x + width,
            self.position.y + height,
        )
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        self.bounds().inflate(tolerance, tolerance).contains(point)
    }

    fn style(&self) -> &NodeStyle {
        &self.style
    }

    fn style_mut(&mut self) -> &mut NodeStyle {
        &mut self.style
    }

    fn translate(&mut self, delta: Vec2) {
        self.position += delta;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_creation() {
        let text = Text::new(Point::new(100.0, 100.0), "Hello");
        assert_eq!(text.content, "Hello");
        assert!((text.font_size - Text::DEFAULT_FONT_SIZE).abs() < f64::EPSILON);
        assert!(text.letter_spacing.is_none());
    }

    #[test]
    fn test_builders() {
        let text = Text::new(Point::ZERO, "x")
            .with_font_size(32.0)
            .with_font_family("Inter")
            .with_letter_spacing(2.0);
        assert!((text.font_size - 32.0).abs() < f64::EPSILON);
        assert_eq!(text.font_family, "Inter");
        assert_eq!(text.letter_spacing, Some(2.0));
    }

    #[test]
    fn test_bounds_grow_with_content() {
        let short = Text::new(Point::ZERO, "Hi");
        let long = Text::new(Point::ZERO, "Hello wide world");
        assert!(long.bounds().width() > short.bounds().width());
    }

    #[test]
    fn test_multiline_height() {
        let one = Text::new(Point::ZERO, "a");
        let three = Text::new(Point::ZERO, "a\nb\nc");
        assert!(three.bounds().height() > one.bounds().height() * 2.0);
    }
}
