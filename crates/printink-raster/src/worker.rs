//! Off-thread export worker.
//!
//! Rasterizing a 300 DPI export takes long enough to stall an
//! interactive editor, so exports run on a dedicated thread that owns
//! the [`Rasterizer`] (its font system is not `Sync`). Requests and
//! responses cross the boundary as serializable messages; responses
//! come back in submission order but callers should correlate by
//! content, not position.

use crate::assets::ImageAssets;
use crate::encode::{encode_png, png_data_url};
use crate::error::{ExportError, ExportResult};
use crate::rasterizer::{ExportTarget, Rasterizer};
use crossbeam_channel::{Receiver, Sender};
use printink_core::DesignDoc;
use serde::{Deserialize, Serialize};

/// A request sent to the export worker.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ExportRequest {
    #[serde(rename_all = "camelCase")]
    Export {
        /// Serialized document, decoded fresh on the worker so the two
        /// threads never share mutable state.
        design_json: String,
        width: f64,
        height: f64,
        dpi: f64,
    },
}

/// The worker's reply to one request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ExportResponse {
    #[serde(rename_all = "camelCase")]
    Complete { data_url: String },
    Error { error: String },
}

/// Run one export request to completion.
///
/// Failures become [`ExportResponse::Error`]; the worker never dies on
/// a bad document.
pub fn process_request(rasterizer: &mut Rasterizer, request: &ExportRequest) -> ExportResponse {
    match run_export(rasterizer, request) {
        Ok(data_url) => ExportResponse::Complete { data_url },
        Err(err) => {
            log::warn!("export failed: {err}");
            ExportResponse::Error {
                error: err.to_string(),
            }
        }
    }
}

fn run_export(rasterizer: &mut Rasterizer, request: &ExportRequest) -> ExportResult<String> {
    let ExportRequest::Export {
        design_json,
        width,
        height,
        dpi,
    } = request;

    let doc = DesignDoc::from_json(design_json)?;
    let assets = ImageAssets::resolve(&doc)?;
    let target = ExportTarget::new(*width, *height, *dpi);
    let pixmap = rasterizer.render(&doc, &assets, &target)?;
    let png = encode_png(&pixmap, *dpi)?;
    Ok(png_data_url(&png))
}

/// Handle to the export thread.
///
/// The thread is detached, never joined: dropping the handle closes
/// both channels, and the worker exits on its own after whatever render
/// it is in the middle of. Cancellation is coarse: [`Self::restart`]
/// swaps in a fresh thread and lets the old one wind down the same way.
pub struct ExportWorker {
    requests: Sender<ExportRequest>,
    responses: Receiver<ExportResponse>,
}

impl ExportWorker {
    pub fn spawn() -> Self {
        let (request_tx, request_rx) = crossbeam_channel::unbounded::<ExportRequest>();
        let (response_tx, response_rx) = crossbeam_channel::unbounded::<ExportResponse>();

        std::thread::spawn(move || {
            let mut rasterizer = Rasterizer::new();
            for request in request_rx {
                let response = process_request(&mut rasterizer, &request);
                // A dead receiver means the handle was dropped or
                // restarted; quit without draining the queue
                if response_tx.send(response).is_err() {
                    break;
                }
            }
            log::debug!("export worker shutting down");
        });

        Self {
            requests: request_tx,
            responses: response_rx,
        }
    }

    /// Queue an export. Returns immediately; the result arrives via
    /// [`Self::recv`] or [`Self::try_recv`].
    pub fn submit(&self, request: ExportRequest) -> ExportResult<()> {
        self.requests
            .send(request)
            .map_err(|_| ExportError::WorkerGone)
    }

    /// Block until the next response.
    pub fn recv(&self) -> ExportResult<ExportResponse> {
        self.responses.recv().map_err(|_| ExportError::WorkerGone)
    }

    /// Poll for a finished export without blocking.
    pub fn try_recv(&self) -> Option<ExportResponse> {
        self.responses.try_recv().ok()
    }

    /// Abandon all in-flight and queued work and start a fresh worker.
    ///
    /// Returns without waiting on the old thread: its channels are
    /// dropped here, so it finishes at most the render it already
    /// started, fails to deliver the result, and exits with the rest of
    /// its queue undelivered.
    pub fn restart(&mut self) {
        log::debug!("restarting export worker");
        *self = Self::spawn();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_wire_shape() {
        let request = ExportRequest::Export {
            design_json: "{}".to_string(),
            width: 800.0,
            height: 1000.0,
            dpi: 300.0,
        };
        let json = serde_json::to_string(&request).unwrap();
        assert!(json.contains("\"type\":\"export\""));
        assert!(json.contains("\"designJson\""));
    }

    #[test]
    fn test_response_wire_shape() {
        let complete = ExportResponse::Complete {
            data_url: "data:image/png;base64,AA==".to_string(),
        };
        let json = serde_json::to_string(&complete).unwrap();
        assert!(json.contains("\"type\":\"complete\""));
        assert!(json.contains("\"dataUrl\""));

        let error = ExportResponse::Error {
            error: "boom".to_string(),
        };
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"type\":\"error\""));
    }
}
