// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// snapfolio-document — Pagination geometry and page emission.
//
// Provides the geometry calculator (snapshot + page geometry + mode -> plan),
// the page emitter driving an abstract document writer, the printpdf-backed
// writer, and snapshot preparation (alpha flattening, capture scaling).

pub mod emit;
pub mod geometry;
pub mod image;
pub mod pdf;
pub mod writer;

// Re-export the primary items so callers can use `snapfolio_document::compute_plan` etc.
pub use emit::{EmitOptions, emit};
pub use geometry::{FitBound, PaginationPlan, compute_plan};
pub use crate::image::processor::SnapshotProcessor;
pub use pdf::writer::PdfDocumentWriter;
pub use writer::{DocumentWriter, DrawCall, RecordingWriter, Rect, TextAlign};
