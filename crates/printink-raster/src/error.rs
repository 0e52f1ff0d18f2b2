//! Error types for printink-raster.

use printink_core::NodeId;
use thiserror::Error;

/// Result type alias using ExportError.
pub type ExportResult<T> = Result<T, ExportError>;

/// Errors that can occur while rasterizing and encoding an export.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Invalid output dimensions (must be positive and within limits).
    #[error("invalid export dimensions: width={width}, height={height}")]
    InvalidDimensions { width: u32, height: u32 },

    /// The document JSON did not deserialize.
    #[error("invalid document: {0}")]
    InvalidDocument(#[from] serde_json::Error),

    /// An image node has no decoded pixels in the asset map.
    #[error("no decoded asset for image node {0}")]
    MissingAsset(NodeId),

    /// An image payload failed to decode.
    #[error("failed to decode image payload for node {id}: {reason}")]
    ImageDecode { id: NodeId, reason: String },

    /// PNG encoding error.
    #[error("PNG encoding error: {0}")]
    PngEncode(#[from] png::EncodingError),

    /// The export worker thread is no longer running.
    #[error("export worker disconnected")]
    WorkerGone,
}
