//! PrintInk Raster Library
//!
//! CPU export pipeline for PrintInk design documents: tiny-skia
//! rasterization, cosmic-text glyph rendering, PNG encoding with print
//! density metadata, and a dedicated worker thread for off-loop
//! exports.

pub mod assets;
pub mod encode;
pub mod error;
pub mod rasterizer;
mod text;
pub mod worker;

pub use assets::ImageAssets;
pub use encode::{encode_png, png_data_url};
pub use error::{ExportError, ExportResult};
pub use rasterizer::{ExportTarget, Rasterizer};
pub use worker::{ExportRequest, ExportResponse, ExportWorker};

/// Render and encode a document in one call, on the current thread.
///
/// Interactive callers should prefer [`ExportWorker`]; this entry point
/// exists for batch tooling and tests.
pub fn export_to_data_url(
    doc: &printink_core::DesignDoc,
    target: &ExportTarget,
) -> ExportResult<String> {
    let assets = ImageAssets::resolve(doc)?;
    let mut rasterizer = Rasterizer::new();
    let pixmap = rasterizer.render(doc, &assets, target)?;
    let png = encode_png(&pixmap, target.dpi)?;
    Ok(png_data_url(&png))
}
