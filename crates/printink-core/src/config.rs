//! Canvas configuration supplied per garment type/color/view.
//!
//! These values come from the catalog boundary and are treated as opaque
//! here: the mapper and rasterizer consume them, never compute them.

use crate::nodes::SerializableColor;
use kurbo::Rect;
use serde::{Deserialize, Serialize};

/// Axis-aligned zone rectangle in canvas-local pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl ZoneRect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn as_rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.x + self.width, self.y + self.height)
    }
}

/// Export background fill.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum BackgroundMode {
    /// No background; exported PNG keeps transparency.
    #[default]
    Transparent,
    /// Flat background color.
    Solid { color: SerializableColor },
}

/// Logical canvas configuration for one design.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanvasConfig {
    /// Logical canvas width in pixels.
    pub width: f64,
    /// Logical canvas height in pixels.
    pub height: f64,
    /// Target print density in dots per inch.
    pub dpi: f64,
    /// Printable region, if the garment defines one.
    #[serde(default)]
    pub print_area: Option<ZoneRect>,
    /// Region guaranteed not to be trimmed.
    #[serde(default)]
    pub safe_area: Option<ZoneRect>,
    #[serde(default)]
    pub background: BackgroundMode,
}

impl CanvasConfig {
    pub fn new(width: f64, height: f64, dpi: f64) -> Self {
        Self {
            width,
            height,
            dpi,
            print_area: None,
            safe_area: None,
            background: BackgroundMode::Transparent,
        }
    }

    pub fn with_print_area(mut self, area: ZoneRect) -> Self {
        self.print_area = Some(area);
        self
    }

    pub fn with_safe_area(mut self, area: ZoneRect) -> Self {
        self.safe_area = Some(area);
        self
    }

    pub fn with_background(mut self, background: BackgroundMode) -> Self {
        self.background = background;
        self
    }
}

impl Default for CanvasConfig {
    fn default() -> Self {
        // 800x1000 at 300 DPI matches the standard front-print garment view
        Self::new(800.0, 1000.0, 300.0)
    }
}
