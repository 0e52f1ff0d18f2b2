//! Viewport state and coordinate mapping.
//!
//! Three spaces are in play: screen space (device pixels relative to the
//! viewport element), canvas-local space (the document's logical pixels,
//! where all node geometry lives), and physical print space (see
//! [`crate::print`]). Node geometry never depends on zoom or pan; the
//! mapper is the only place the two interactive factors are applied.

use kurbo::{Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};

/// Baseline screen density against which print DPI scale factors are
/// computed.
pub const REFERENCE_DPI: f64 = 96.0;

/// Minimum interactive zoom.
pub const MIN_ZOOM: f64 = 0.1;
/// Maximum interactive zoom.
pub const MAX_ZOOM: f64 = 10.0;

/// Scale factor that maps canvas-local pixels to export pixels for a
/// target print density.
pub fn export_scale(target_dpi: f64) -> f64 {
    target_dpi / REFERENCE_DPI
}

/// Ephemeral view state owned by the interactive editor.
///
/// Never persisted with a document and never consulted by the export
/// rasterizer: exported pixels depend only on node geometry and the
/// explicit DPI scale factor.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ViewportState {
    /// Zoom factor (1.0 = one canvas pixel per screen pixel).
    pub zoom: f64,
    /// Pan offset in canvas-local space.
    pub pan: Vec2,
}

impl Default for ViewportState {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            pan: Vec2::ZERO,
        }
    }
}

impl ViewportState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Convert a screen-space point to canvas-local coordinates.
    ///
    /// The element offset is removed first, then the zoom is unscaled,
    /// then the pan offset (which lives in canvas space) is removed.
    /// No clamping is performed here: a zero zoom produces infinities,
    /// and keeping zoom positive is the caller's contract.
    pub fn screen_to_canvas(&self, screen: Point, element: Rect) -> Point {
        Point::new(
            (screen.x - element.x0) / self.zoom - self.pan.x,
            (screen.y - element.y0) / self.zoom - self.pan.y,
        )
    }

    /// Exact inverse of [`Self::screen_to_canvas`]. No rounding happens
    /// in either direction; rounding belongs to the raster boundary.
    pub fn canvas_to_screen(&self, canvas: Point, element: Rect) -> Point {
        Point::new(
            (canvas.x + self.pan.x) * self.zoom + element.x0,
            (canvas.y + self.pan.y) * self.zoom + element.y0,
        )
    }

    /// Set the zoom, clamped to the interactive range.
    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
    }

    /// Zoom while keeping the given screen point fixed on the canvas.
    pub fn zoom_at(&mut self, screen: Point, element: Rect, factor: f64) {
        let new_zoom = (self.zoom * factor).clamp(MIN_ZOOM, MAX_ZOOM);
        if (new_zoom - self.zoom).abs() < f64::EPSILON {
            return;
        }
        let anchor = self.screen_to_canvas(screen, element);
        self.zoom = new_zoom;
        let moved = self.screen_to_canvas(screen, element);
        self.pan += moved - anchor;
    }

    pub fn pan_by(&mut self, delta: Vec2) {
        self.pan += delta;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Whether a screen-space point falls inside the viewport element.
/// Used to gate pointer interaction; zoom and pan play no part here.
pub fn is_point_in_canvas(screen: Point, element: Rect) -> bool {
    element.contains(screen)
}

/// Backing-store dimensions for a crisp on-screen drawing surface.
///
/// This is the hi-DPI display concern: the surface carries
/// `logical * device_pixel_ratio` physical pixels with the context
/// pre-scaled by the same ratio so drawing stays in logical units.
/// Orthogonal to export DPI scaling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceSpec {
    pub backing_width: u32,
    pub backing_height: u32,
    /// Pre-scale to apply to the drawing context.
    pub context_scale: f64,
}

impl SurfaceSpec {
    /// Surface spec for interactive display at a device pixel ratio.
    pub fn for_display(logical: Size, device_pixel_ratio: f64) -> Self {
        Self {
            backing_width: (logical.width * device_pixel_ratio).round() as u32,
            backing_height: (logical.height * device_pixel_ratio).round() as u32,
            context_scale: device_pixel_ratio,
        }
    }

    /// Surface spec for a print export at a target DPI.
    pub fn for_export(logical: Size, target_dpi: f64) -> Self {
        let scale = export_scale(target_dpi);
        Self {
            backing_width: (logical.width * scale).round() as u32,
            backing_height: (logical.height * scale).round() as u32,
            context_scale: scale,
        }
    }
}
