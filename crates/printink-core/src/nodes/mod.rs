//! Design node definitions for the print canvas.

mod circle;
mod image;
mod path;
mod rectangle;
mod text;
mod triangle;

pub use circle::Circle;
pub use image::{Image, ImageFormat};
pub use path::Freehand;
pub use rectangle::Rectangle;
pub use text::{Text, TextStroke, LINE_HEIGHT_FACTOR};
pub use triangle::Triangle;

use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for design nodes.
pub type NodeId = Uuid;

/// Serializable color representation (RGBA8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializableColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl SerializableColor {
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn black() -> Self {
        Self::new(0, 0, 0, 255)
    }

    pub fn white() -> Self {
        Self::new(255, 255, 255, 255)
    }

    pub fn transparent() -> Self {
        Self::new(0, 0, 0, 0)
    }

    /// Parse a CSS-style hex color (`#rgb`, `#rrggbb`, or `#rrggbbaa`).
    pub fn from_hex(color: &str) -> Option<Self> {
        if color == "transparent" {
            return Some(Self::transparent());
        }
        let hex = color.strip_prefix('#')?.trim();
        match hex.len() {
            3 => {
                let r = u8::from_str_radix(&hex[0..1], 16).ok()? * 17;
                let g = u8::from_str_radix(&hex[1..2], 16).ok()? * 17;
                let b = u8::from_str_radix(&hex[2..3], 16).ok()? * 17;
                Some(Self::new(r, g, b, 255))
            }
            6 => {
                let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
                let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
                let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
                Some(Self::new(r, g, b, 255))
            }
            8 => {
                let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
                let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
                let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
                let a = u8::from_str_radix(&hex[6..8], 16).ok()?;
                Some(Self::new(r, g, b, a))
            }
            _ => None,
        }
    }

    /// Apply an opacity multiplier to the alpha channel.
    pub fn with_opacity(self, opacity: f64) -> Self {
        let a = (self.a as f64 * opacity.clamp(0.0, 1.0)).round() as u8;
        Self { a, ..self }
    }
}

/// Style properties shared by all node variants.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeStyle {
    /// Fill color (None = no fill).
    pub fill: Option<SerializableColor>,
    /// Stroke color (None = no stroke).
    pub stroke: Option<SerializableColor>,
    /// Stroke width in canvas-local pixels.
    pub stroke_width: f64,
    /// Overall opacity (0.0 = fully transparent, 1.0 = fully opaque).
    #[serde(default = "default_opacity")]
    pub opacity: f64,
}

fn default_opacity() -> f64 {
    1.0
}

impl Default for NodeStyle {
    fn default() -> Self {
        Self {
            fill: Some(SerializableColor::black()),
            stroke: None,
            stroke_width: 0.0,
            opacity: 1.0,
        }
    }
}

pub(crate) fn default_true() -> bool {
    true
}

/// Common trait for all design nodes.
pub trait NodeTrait {
    /// Get the unique identifier.
    fn id(&self) -> NodeId;

    /// Get the unrotated bounding box in canvas-local coordinates.
    fn bounds(&self) -> Rect;

    /// Check if a canvas-local point hits this node.
    fn hit_test(&self, point: Point, tolerance: f64) -> bool;

    /// Get the style.
    fn style(&self) -> &NodeStyle;

    /// Get mutable style.
    fn style_mut(&mut self) -> &mut NodeStyle;

    /// Move the node by a canvas-local delta.
    fn translate(&mut self, delta: Vec2);
}

/// Discriminated union over all node variants.
///
/// The serialized form carries an explicit `"type"` tag so documents stay
/// readable at the persistence boundary; matching on the enum keeps the
/// rasterizer exhaustive when a variant is added.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum DesignNode {
    Rect(Rectangle),
    Circle(Circle),
    Triangle(Triangle),
    Text(Text),
    Image(Image),
    Path(Freehand),
}

impl DesignNode {
    pub fn id(&self) -> NodeId {
        match self {
            DesignNode::Rect(n) => n.id(),
            DesignNode::Circle(n) => n.id(),
            DesignNode::Triangle(n) => n.id(),
            DesignNode::Text(n) => n.id(),
            DesignNode::Image(n) => n.id(),
            DesignNode::Path(n) => n.id(),
        }
    }

    pub fn bounds(&self) -> Rect {
        match self {
            DesignNode::Rect(n) => n.bounds(),
            DesignNode::Circle(n) => n.bounds(),
            DesignNode::Triangle(n) => n.bounds(),
            DesignNode::Text(n) => n.bounds(),
            DesignNode::Image(n) => n.bounds(),
            DesignNode::Path(n) => n.bounds(),
        }
    }

    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        match self {
            DesignNode::Rect(n) => n.hit_test(point, tolerance),
            DesignNode::Circle(n) => n.hit_test(point, tolerance),
            DesignNode::Triangle(n) => n.hit_test(point, tolerance),
            DesignNode::Text(n) => n.hit_test(point, tolerance),
            DesignNode::Image(n) => n.hit_test(point, tolerance),
            DesignNode::Path(n) => n.hit_test(point, tolerance),
        }
    }

    pub fn style(&self) -> &NodeStyle {
        match self {
            DesignNode::Rect(n) => n.style(),
            DesignNode::Circle(n) => n.style(),
            DesignNode::Triangle(n) => n.style(),
            DesignNode::Text(n) => n.style(),
            DesignNode::Image(n) => n.style(),
            DesignNode::Path(n) => n.style(),
        }
    }

    pub fn style_mut(&mut self) -> &mut NodeStyle {
        match self {
            DesignNode::Rect(n) => n.style_mut(),
            DesignNode::Circle(n) => n.style_mut(),
            DesignNode::Triangle(n) => n.style_mut(),
            DesignNode::Text(n) => n.style_mut(),
            DesignNode::Image(n) => n.style_mut(),
            DesignNode::Path(n) => n.style_mut(),
        }
    }

    pub fn translate(&mut self, delta: Vec2) {
        match self {
            DesignNode::Rect(n) => n.translate(delta),
            DesignNode::Circle(n) => n.translate(delta),
            DesignNode::Triangle(n) => n.translate(delta),
            DesignNode::Text(n) => n.translate(delta),
            DesignNode::Image(n) => n.translate(delta),
            DesignNode::Path(n) => n.translate(delta),
        }
    }

    /// Rotation in degrees around the node's own bounds center.
    pub fn rotation(&self) -> f64 {
        match self {
            DesignNode::Rect(n) => n.rotation,
            DesignNode::Circle(n) => n.rotation,
            DesignNode::Triangle(n) => n.rotation,
            DesignNode::Text(n) => n.rotation,
            DesignNode::Image(n) => n.rotation,
            DesignNode::Path(n) => n.rotation,
        }
    }

    pub fn set_rotation(&mut self, degrees: f64) {
        match self {
            DesignNode::Rect(n) => n.rotation = degrees,
            DesignNode::Circle(n) => n.rotation = degrees,
            DesignNode::Triangle(n) => n.rotation = degrees,
            DesignNode::Text(n) => n.rotation = degrees,
            DesignNode::Image(n) => n.rotation = degrees,
            DesignNode::Path(n) => n.rotation = degrees,
        }
    }

    pub fn is_visible(&self) -> bool {
        match self {
            DesignNode::Rect(n) => n.visible,
            DesignNode::Circle(n) => n.visible,
            DesignNode::Triangle(n) => n.visible,
            DesignNode::Text(n) => n.visible,
            DesignNode::Image(n) => n.visible,
            DesignNode::Path(n) => n.visible,
        }
    }

    pub fn set_visible(&mut self, visible: bool) {
        match self {
            DesignNode::Rect(n) => n.visible = visible,
            DesignNode::Circle(n) => n.visible = visible,
            DesignNode::Triangle(n) => n.visible = visible,
            DesignNode::Text(n) => n.visible = visible,
            DesignNode::Image(n) => n.visible = visible,
            DesignNode::Path(n) => n.visible = visible,
        }
    }

    /// Locked nodes refuse interactive edits; rendering is unaffected.
    pub fn is_locked(&self) -> bool {
        match self {
            DesignNode::Rect(n) => n.locked,
            DesignNode::Circle(n) => n.locked,
            DesignNode::Triangle(n) => n.locked,
            DesignNode::Text(n) => n.locked,
            DesignNode::Image(n) => n.locked,
            DesignNode::Path(n) => n.locked,
        }
    }

    pub fn set_locked(&mut self, locked: bool) {
        match self {
            DesignNode::Rect(n) => n.locked = locked,
            DesignNode::Circle(n) => n.locked = locked,
            DesignNode::Triangle(n) => n.locked = locked,
            DesignNode::Text(n) => n.locked = locked,
            DesignNode::Image(n) => n.locked = locked,
            DesignNode::Path(n) => n.locked = locked,
        }
    }

    /// Assign a fresh unique identifier.
    /// Used when duplicating or pasting nodes so copies stay distinct.
    pub fn regenerate_id(&mut self) {
        let new_id = Uuid::new_v4();
        match self {
            DesignNode::Rect(n) => n.id = new_id,
            DesignNode::Circle(n) => n.id = new_id,
            DesignNode::Triangle(n) => n.id = new_id,
            DesignNode::Text(n) => n.id = new_id,
            DesignNode::Image(n) => n.id = new_id,
            DesignNode::Path(n) => n.id = new_id,
        }
    }

    /// Center of the unrotated bounds, the pivot for rotation.
    pub fn center(&self) -> Point {
        self.bounds().center()
    }

    pub fn is_image(&self) -> bool {
        matches!(self, DesignNode::Image(_))
    }

    pub fn as_image(&self) -> Option<&Image> {
        match self {
            DesignNode::Image(img) => Some(img),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_parsing() {
        assert_eq!(
            SerializableColor::from_hex("#000"),
            Some(SerializableColor::black())
        );
        assert_eq!(
            SerializableColor::from_hex("#ffffff"),
            Some(SerializableColor::white())
        );
        assert_eq!(
            SerializableColor::from_hex("#ff000080"),
            Some(SerializableColor::new(255, 0, 0, 128))
        );
        assert_eq!(
            SerializableColor::from_hex("transparent"),
            Some(SerializableColor::transparent())
        );
        assert_eq!(SerializableColor::from_hex("red"), None);
        assert_eq!(SerializableColor::from_hex("#12345"), None);
    }

    #[test]
    fn test_with_opacity() {
        let c = SerializableColor::new(10, 20, 30, 200).with_opacity(0.5);
        assert_eq!(c.a, 100);
        assert_eq!(c.r, 10);
    }

    #[test]
    fn test_node_tag_serialization() {
        let node = DesignNode::Rect(Rectangle::new(Point::new(0.0, 0.0), 10.0, 10.0));
        let json = serde_json::to_string(&node).unwrap();
        assert!(json.contains("\"type\":\"rect\""));

        let back: DesignNode = serde_json::from_str(&json).unwrap();
        assert_eq!(back.id(), node.id());
    }

    #[test]
    fn test_regenerate_id() {
        let mut node = DesignNode::Circle(Circle::new(Point::new(0.0, 0.0), 40.0, 40.0));
        let before = node.id();
        node.regenerate_id();
        assert_ne!(node.id(), before);
    }

    #[test]
    fn test_rotation_accessors() {
        let mut node = DesignNode::Triangle(Triangle::new(Point::new(0.0, 0.0), 30.0, 30.0));
        assert!((node.rotation()).abs() < f64::EPSILON);
        node.set_rotation(45.0);
        assert!((node.rotation() - 45.0).abs() < f64::EPSILON);
    }
}
