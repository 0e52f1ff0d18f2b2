//! PrintInk Core Library
//!
//! Platform-agnostic data model and logic for the PrintInk garment
//! design studio: design documents, undo history, viewport mapping, and
//! print-physical utilities. Rasterization lives in `printink-raster`.

pub mod config;
pub mod doc;
pub mod geometry;
pub mod history;
pub mod nodes;
pub mod print;
pub mod session;
pub mod viewport;

pub use config::{BackgroundMode, CanvasConfig, ZoneRect};
pub use doc::DesignDoc;
pub use history::{History, HistoryEntry, HistoryError, DEFAULT_MAX_ENTRIES};
pub use nodes::{DesignNode, NodeId, NodeStyle, SerializableColor};
pub use print::{classify_dpi, image_effective_dpi, zone_overlays, DpiStatus, ZoneKind, ZoneOverlay};
pub use session::EditorSession;
pub use viewport::{
    export_scale, is_point_in_canvas, SurfaceSpec, ViewportState, MAX_ZOOM, MIN_ZOOM, REFERENCE_DPI,
};
