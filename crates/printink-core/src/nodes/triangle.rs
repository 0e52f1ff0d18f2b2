//! Triangle node.

use super::{default_true, NodeId, NodeStyle, NodeTrait};
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An isosceles triangle inscribed in its bounding box:
/// apex at top-center, base along the bottom edge.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Triangle {
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

impl Triangle {
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

    /// The three vertices in canvas-local coordinates (apex first).
    pub fn vertices(&self) -> [Point; 3] {
        [
            Point::new(self.position.x + self.width / 2.0, self.position.y),
            Point::new(self.position.x + self.width, self.position.y + self.height),
            Point::new(self.position.x, self.position.y + self.height),
        ]
    }
}

impl NodeTrait for Triangle {
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
        if !self.bounds().inflate(tolerance, tolerance).contains(point) {
            return false;
        }
        let [a, b, c] = self.vertices();
        point_in_triangle(point, a, b, c)
            || crate::geometry::point_to_polygon_dist(point, &[a, b, c]) <= tolerance
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

/// Barycentric sign test.
fn point_in_triangle(p: Point, a: Point, b: Point, c: Point) -> bool {
    let sign = |p1: Point, p2: Point, p3: Point| -> f64 {
        (p1.x - p3.x) * (p2.y - p3.y) - (p2.x - p3.x) * (p1.y - p3.y)
    };
    let d1 = sign(p, a, b);
    let d2 = sign(p, b, c);
    let d3 = sign(p, c, a);
    let has_neg = d1 < 0.0 || d2 < 0.0 || d3 < 0.0;
    let has_pos = d1 > 0.0 || d2 > 0.0 || d3 > 0.0;
    !(has_neg && has_pos)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertices() {
        let tri = Triangle::new(Point::new(0.0, 0.0), 100.0, 100.0);
        let [a, b, c] = tri.vertices();
        assert!((a.x - 50.0).abs() < f64::EPSILON && a.y.abs() < f64::EPSILON);
        assert!((b.x - 100.0).abs() < f64::EPSILON && (b.y - 100.0).abs() < f64::EPSILON);
        assert!(c.x.abs() < f64::EPSILON && (c.y - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_hit_test() {
        let tri = Triangle::new(Point::new(0.0, 0.0), 100.0, 100.0);
        // Centroid is inside
        assert!(tri.hit_test(Point::new(50.0, 66.0), 0.0));
        // Top corners of the bounding box are outside the triangle
        assert!(!tri.hit_test(Point::new(5.0, 5.0), 0.0));
        assert!(!tri.hit_test(Point::new(95.0, 5.0), 0.0));
    }
}
