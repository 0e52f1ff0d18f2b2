//! Small geometry helpers shared by hit testing.

use kurbo::{Point, Vec2};

/// Distance from a point to a line segment (a→b).
pub fn point_to_segment_dist(point: Point, a: Point, b: Point) -> f64 {
    let seg = Vec2::new(b.x - a.x, b.y - a.y);
    let pv = Vec2::new(point.x - a.x, point.y - a.y);
    let len_sq = seg.hypot2();
    if len_sq < f64::EPSILON {
        return pv.hypot();
    }
    let t = (pv.dot(seg) / len_sq).clamp(0.0, 1.0);
    let proj = Point::new(a.x + t * seg.x, a.y + t * seg.y);
    ((point.x - proj.x).powi(2) + (point.y - proj.y).powi(2)).sqrt()
}

/// Minimum distance from a point to a polyline (sequence of connected segments).
pub fn point_to_polyline_dist(point: Point, points: &[Point]) -> f64 {
    points
        .windows(2)
        .map(|w| point_to_segment_dist(point, w[0], w[1]))
        .fold(f64::INFINITY, f64::min)
}

/// Minimum distance from a point to a closed polygon outline.
pub fn point_to_polygon_dist(point: Point, points: &[Point]) -> f64 {
    let open = point_to_polyline_dist(point, points);
    match (points.first(), points.last()) {
        (Some(&first), Some(&last)) if points.len() > 2 => {
            open.min(point_to_segment_dist(point, last, first))
        }
        _ => open,
    }
}
