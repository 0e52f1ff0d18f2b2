//! Circle/ellipse node.

use super::{default_true, NodeId, NodeStyle, NodeTrait};
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A circle, stored as the bounding box it is inscribed in.
/// Unequal width/height yields an ellipse.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Circle {
    pub(crate) id: NodeId,
    /// Top-left corner of the bounding box in canvas-local pixels.
    pub position: Point,
    pub width: f64,
    pub height: f64,
    /// Rotation in degrees around the bounds center.
    #[serde(default)]
    pub rotation: f64,
    #[serde(default = "default_true")]
    pub visible: bool,
    #[serde(default)]
    pub locked: bool,
    pub style: NodeStyle,
}

impl Circle {
    pub fn new(position: Point, width: f64, height: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            position,
            width,
            height,
            rotation: 0.0,
            visible: true,
            locked: false,
            style: NodeStyle::default(),
        }
    }

    /// Create from a center point and radius.
    pub fn from_center(center: Point, radius: f64) -> Self {
        Self::new(
            Point::new(center.x - radius, center.y - radius),
            radius * 2.0,
            radius * 2.0,
        )
    }

    pub fn radii(&self) -> (f64, f64) {
        (self.width / 2.0, self.height / 2.0)
    }
}

impl NodeTrait for Circle {
    fn id(&self) -> NodeId {
        self.id
    }

    fn bounds(&self) -> Rect {
        Rect::new(
            self.position.x,
            self.position.y,
            self.position.x + self.width,
            self.position.y + self.height,
        )
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        let center = self.bounds().center();
        let (rx, ry) = self.radii();
        if rx < f64::EPSILON || ry < f64::EPSILON {
            return false;
        }
        // Normalized ellipse equation with tolerance folded into the radii
        let dx = (point.x - center.x) / (rx + tolerance);
        let dy = (point.y - center.y) / (ry + tolerance);
        dx * dx + dy * dy <= 1.0
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
