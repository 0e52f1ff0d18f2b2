//! Print-physical utilities: DPI validity reporting and zone guides.
//!
//! Everything here is read-only and derived; none of it participates in
//! the exported image.

use crate::config::CanvasConfig;
use crate::nodes::Image;
use kurbo::Rect;
use serde::{Deserialize, Serialize};

const MM_PER_INCH: f64 = 25.4;

/// Classification of an effective print density against the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DpiStatus {
    /// The measurement itself is unusable (zero display size, etc.).
    Invalid,
    /// Below the configured target density; print quality will suffer.
    BelowTarget,
    /// At or above the target density.
    MeetsTarget,
}

/// Classify a measured density against a target.
pub fn classify_dpi(current: f64, target: f64, is_valid: bool) -> DpiStatus {
    if !is_valid || !current.is_finite() || current <= 0.0 {
        DpiStatus::Invalid
    } else if current < target {
        DpiStatus::BelowTarget
    } else {
        DpiStatus::MeetsTarget
    }
}

/// Effective print density of an image node at its current display size.
///
/// Source pixels spread over the displayed extent: an image scaled up
/// loses density. Returns the lower of the two axes, the one that
/// limits print quality.
pub fn image_effective_dpi(image: &Image, canvas_dpi: f64) -> f64 {
    if image.width <= 0.0 || image.height <= 0.0 {
        return 0.0;
    }
    let dpi_x = image.source_width as f64 / image.width * canvas_dpi;
    let dpi_y = image.source_height as f64 / image.height * canvas_dpi;
    dpi_x.min(dpi_y)
}

/// Kind of guide zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ZoneKind {
    PrintArea,
    SafeArea,
}

/// A non-interactive guide rectangle in canvas-local pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoneOverlay {
    pub kind: ZoneKind,
    pub rect: Rect,
}

/// Guide overlays for the configured zones, print area first.
pub fn zone_overlays(config: &CanvasConfig) -> Vec<ZoneOverlay> {
    let mut overlays = Vec::new();
    if let Some(area) = config.print_area {
        overlays.push(ZoneOverlay {
            kind: ZoneKind::PrintArea,
            rect: area.as_rect(),
        });
    }
    if let Some(area) = config.safe_area {
        overlays.push(ZoneOverlay {
            kind: ZoneKind::SafeArea,
            rect: area.as_rect(),
        });
    }
    overlays
}

/// Convert canvas-local pixels to millimeters at a print density.
pub fn px_to_mm(px: f64, dpi: f64) -> f64 {
    px / dpi * MM_PER_INCH
}

/// Convert canvas-local pixels to inches at a print density.
pub fn px_to_in(px: f64, dpi: f64) -> f64 {
    px / dpi
}

/// Physical print size of the whole canvas in millimeters.
pub fn physical_size_mm(config: &CanvasConfig) -> (f64, f64) {
    (
        px_to_mm(config.width, config.dpi),
        px_to_mm(config.height, config.dpi),
    )
}
