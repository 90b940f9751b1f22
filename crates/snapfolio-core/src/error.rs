// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Snapfolio.

use thiserror::Error;

/// Top-level error type for all export operations.
#[derive(Debug, Error)]
pub enum ExportError {
    // -- Pipeline errors --
    #[error("margins leave no usable area ({usable_width:.1}mm x {usable_height:.1}mm)")]
    InvalidGeometry { usable_width: f32, usable_height: f32 },

    #[error("snapshot capture failed: {0}")]
    CaptureFailure(String),

    #[error("writer rejected page {page_index}: {reason}")]
    RenderFailure { page_index: usize, reason: String },

    #[error("content needs {required} pages, more than the limit of {limit}")]
    TooManyPages { required: f64, limit: usize },

    #[error("nothing to export: {0}")]
    EmptyContent(String),

    // -- Output --
    #[error("document serialization failed: {0}")]
    Serialization(String),

    #[error("download failed: {0}")]
    Download(String),

    #[error("image processing failed: {0}")]
    ImageError(String),

    // -- Storage / configuration --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("configuration error: {0}")]
    Config(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, ExportError>;
