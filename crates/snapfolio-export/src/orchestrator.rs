// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Export orchestrator — runs one export request end to end:
//
//   precondition -> capture -> margin dialog -> (re-capture) -> plan -> emit
//   -> serialise -> download
//
// The processing indicator is held by a guard for capture and for everything
// after the dialog, so it disappears on success, cancellation and failure.
// Nothing is retried; a failed request is reported and returned.

use chrono::Local;
use snapfolio_core::ExportConfig;
use snapfolio_core::error::{ExportError, Result};
use snapfolio_core::human_errors::humanize_error;
use snapfolio_core::types::{DocumentKind, PageGeometry};
use snapfolio_document::{DocumentWriter, EmitOptions, compute_plan, emit};
use tracing::{error, info, instrument};

use crate::dialog::{DialogOutcome, open_margin_dialog};
use crate::filename::export_filename;
use crate::indicator::{ProcessingGuard, RequestId};
use crate::traits::{
    CaptureOptions, Download, ExportFeedback, MarginDialogHost, PdfWriterFactory,
    SnapshotCapture, WriterFactory,
};

/// What the caller wants exported.
pub struct ExportRequest<'a, T: ?Sized> {
    /// Handed to the capture collaborator unchanged.
    pub content: &'a T,
    /// Document title; also the base of the filename.
    pub title: &'a str,
    /// Number of rows for list-like documents; `Some(0)` means nothing to export.
    pub row_count: Option<usize>,
}

impl<'a, T: ?Sized> ExportRequest<'a, T> {
    pub fn new(content: &'a T, title: &'a str) -> Self {
        Self {
            content,
            title,
            row_count: None,
        }
    }

    pub fn with_rows(mut self, rows: usize) -> Self {
        self.row_count = Some(rows);
        self
    }
}

/// How a request that did not fail ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    Delivered { filename: String, page_count: usize },
    /// The user dismissed the margin dialog; nothing was exported.
    Cancelled,
}

/// Sequences capture, margin negotiation, pagination and delivery.
pub struct Exporter<C, D, F, H, W = PdfWriterFactory> {
    capture: C,
    download: D,
    feedback: F,
    host: H,
    writers: W,
    config: ExportConfig,
}

impl<C, D, F, H> Exporter<C, D, F, H>
where
    C: SnapshotCapture,
    D: Download,
    F: ExportFeedback,
    H: MarginDialogHost,
{
    /// Exporter producing PDFs.
    pub fn new(capture: C, download: D, feedback: F, host: H, config: ExportConfig) -> Self {
        Self {
            capture,
            download,
            feedback,
            host,
            writers: PdfWriterFactory,
            config,
        }
    }
}

impl<C, D, F, H, W> Exporter<C, D, F, H, W>
where
    C: SnapshotCapture,
    D: Download,
    F: ExportFeedback,
    H: MarginDialogHost,
    W: WriterFactory,
{
    /// Swap the document writer.
    pub fn with_writers<W2: WriterFactory>(self, writers: W2) -> Exporter<C, D, F, H, W2> {
        Exporter {
            capture: self.capture,
            download: self.download,
            feedback: self.feedback,
            host: self.host,
            writers,
            config: self.config,
        }
    }

    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    pub async fn export_minutes(
        &self,
        request: ExportRequest<'_, C::Content>,
    ) -> Result<ExportOutcome> {
        self.export_document(DocumentKind::Minutes, request).await
    }

    pub async fn export_material_list(
        &self,
        request: ExportRequest<'_, C::Content>,
    ) -> Result<ExportOutcome> {
        self.export_document(DocumentKind::MaterialList, request).await
    }

    pub async fn export_daily_report(
        &self,
        request: ExportRequest<'_, C::Content>,
    ) -> Result<ExportOutcome> {
        self.export_document(DocumentKind::DailyReport, request).await
    }

    /// Run one export. Failures are reported through the feedback
    /// collaborator before being returned.
    #[instrument(skip_all, fields(kind = ?kind, title = request.title))]
    pub async fn export_document(
        &self,
        kind: DocumentKind,
        request: ExportRequest<'_, C::Content>,
    ) -> Result<ExportOutcome> {
        let id = RequestId::new();
        let result = self.run(kind, &request, id).await;
        if let Err(err) = &result {
            error!(request = %id, error = %err, "export failed");
            self.feedback.report_error(&humanize_error(err));
        }
        result
    }

    async fn run(
        &self,
        kind: DocumentKind,
        request: &ExportRequest<'_, C::Content>,
        id: RequestId,
    ) -> Result<ExportOutcome> {
        let options = self.config.options(kind);

        if request.row_count == Some(0) {
            return Err(ExportError::EmptyContent(format!(
                "{} has no rows",
                request.title
            )));
        }

        let mut capture_options = CaptureOptions {
            scale: self.config.capture_scale,
            background: self.config.background,
            margins: None,
        };

        let snapshot = {
            let _busy = ProcessingGuard::show(&self.feedback, id, "Capturing document");
            self.capture.capture(request.content, &capture_options).await?
        };
        info!(request = %id, size = ?snapshot.size(), "snapshot captured");

        let (page_width, page_height) = options.page_size.oriented_mm(options.orientation);
        let (dialog, pending) = open_margin_dialog(
            snapshot.size(),
            page_width,
            page_height,
            options.mode,
            options.default_margins,
        );
        self.host.present(dialog);

        let margins = match pending.await {
            DialogOutcome::Confirmed(margins) => margins,
            DialogOutcome::Cancelled => {
                info!(request = %id, "export cancelled at margin dialog");
                return Ok(ExportOutcome::Cancelled);
            }
        };

        let _busy = ProcessingGuard::show(&self.feedback, id, "Creating PDF");

        let snapshot = if options.recapture_on_confirm {
            capture_options.margins = Some(margins);
            self.capture.capture(request.content, &capture_options).await?
        } else {
            snapshot
        };

        let geometry = PageGeometry::with_margins(page_width, page_height, margins);
        let plan = compute_plan(snapshot.size(), &geometry, options.mode)?;

        // A failed emission drops the writer here; partial output never leaves.
        let mut writer = self.writers.create(request.title, &geometry);
        emit(
            &mut writer,
            &snapshot,
            &plan,
            options.footer.as_ref(),
            &EmitOptions {
                mask_margins: options.mask_margins,
                background: self.config.background,
            },
        )?;
        let blob = writer.serialize()?;

        let filename = export_filename(kind, request.title, Local::now().date_naive());
        self.download.download(blob, &filename).await?;

        info!(request = %id, filename = %filename, pages = plan.page_count(), "export delivered");
        Ok(ExportOutcome::Delivered {
            filename,
            page_count: plan.page_count(),
        })
    }
}
