// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Collaborator traits for the export pipeline.
//
// The orchestrator never touches rendering, the filesystem or the UI
// directly; each of those sits behind one of these traits.

use std::future::Future;

use snapfolio_core::error::Result;
use snapfolio_core::human_errors::HumanError;
use snapfolio_core::types::{Color, DocumentBlob, MarginSet, PageGeometry, RasterSnapshot};
use snapfolio_document::{DocumentWriter, PdfDocumentWriter};

use crate::dialog::MarginDialog;
use crate::indicator::RequestId;

/// Settings passed to the snapshot capture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CaptureOptions {
    /// Device-pixel ratio to render at.
    pub scale: f32,
    /// Colour behind transparent content.
    pub background: Color,
    /// Committed margins, when re-capturing after the dialog.
    pub margins: Option<MarginSet>,
}

/// Rasterises rendered content.
pub trait SnapshotCapture {
    /// Whatever identifies the content to capture (a node, a file, ...).
    type Content: ?Sized;

    /// Capture `content`. Fails with `ExportError::CaptureFailure`.
    fn capture(
        &self,
        content: &Self::Content,
        options: &CaptureOptions,
    ) -> impl Future<Output = Result<RasterSnapshot>>;
}

/// Hands a finished document to the user.
pub trait Download {
    fn download(&self, blob: DocumentBlob, filename: &str) -> impl Future<Output = Result<()>>;
}

/// Busy indicator and error reporting, keyed per request.
pub trait ExportFeedback {
    /// Show a processing indicator owned by `id`.
    fn show_processing(&self, id: RequestId, label: &str);

    /// Remove the indicator owned by `id`, leaving any others alone.
    fn hide_processing(&self, id: RequestId);

    /// Tell the user an export failed.
    fn report_error(&self, error: &HumanError);
}

/// Shows the margin dialog to the user.
pub trait MarginDialogHost {
    /// Take ownership of the dialog and drive it until the user decides.
    ///
    /// Must not block; the orchestrator awaits the dialog's outcome afterwards.
    fn present(&self, dialog: MarginDialog);
}

/// Creates a fresh document writer per export.
pub trait WriterFactory {
    type Writer: DocumentWriter;

    fn create(&self, title: &str, geometry: &PageGeometry) -> Self::Writer;
}

/// PDF output through `printpdf`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfWriterFactory;

impl WriterFactory for PdfWriterFactory {
    type Writer = PdfDocumentWriter;

    fn create(&self, title: &str, geometry: &PageGeometry) -> PdfDocumentWriter {
        PdfDocumentWriter::new(title, geometry.page_width, geometry.page_height)
    }
}
