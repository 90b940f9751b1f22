// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// snapfolio-export — Margin negotiation and the export pipeline.
//
// The configurator holds the dialog state machine and live preview; the
// orchestrator sequences capture, margins, pagination and delivery behind
// the collaborator traits the embedding application implements.

pub mod dialog;
pub mod filename;
pub mod indicator;
pub mod margins;
pub mod orchestrator;
pub mod traits;

pub use dialog::{DialogOutcome, MarginDialog, PendingMargins, open_margin_dialog};
pub use filename::{export_filename, sanitize_filename};
pub use indicator::{ProcessingGuard, RequestId};
pub use margins::{DialogState, MarginAction, MarginConfigurator, MarginPreview};
pub use orchestrator::{ExportOutcome, ExportRequest, Exporter};
pub use traits::{
    CaptureOptions, Download, ExportFeedback, MarginDialogHost, PdfWriterFactory,
    SnapshotCapture, WriterFactory,
};
