// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Snapshot capture from an already-rendered page image on disk.

use std::path::Path;

use snapfolio_core::error::{ExportError, Result};
use snapfolio_core::types::RasterSnapshot;
use snapfolio_document::SnapshotProcessor;
use snapfolio_export::{CaptureOptions, SnapshotCapture};
use tracing::{debug, instrument};

/// Loads a PNG/JPEG rendering of the document and prepares it for export.
///
/// Decoding and resampling run on the blocking pool.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageFileCapture;

impl SnapshotCapture for ImageFileCapture {
    type Content = Path;

    #[instrument(skip_all, fields(path = %content.display(), scale = options.scale))]
    async fn capture(&self, content: &Path, options: &CaptureOptions) -> Result<RasterSnapshot> {
        if options.margins.is_some() {
            // The rendering is fixed on disk; margins only affect layout.
            debug!("re-capture requested, reloading unchanged image");
        }

        let path = content.to_path_buf();
        let background = options.background;
        let scale = options.scale;
        tokio::task::spawn_blocking(move || {
            SnapshotProcessor::open(&path).map(|processor| {
                processor
                    .flatten(background)
                    .scale(scale)
                    .into_snapshot()
            })
        })
        .await
        .map_err(|err| ExportError::CaptureFailure(format!("capture task failed: {err}")))?
        .map_err(|err| ExportError::CaptureFailure(err.to_string()))
    }
}
