// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages for the export dialog.
//
// Every technical error is mapped to plain English with a clear suggestion.
// Nothing is retried automatically; `try_again` only tells the UI whether
// offering a "Try again" button makes sense.

use crate::error::ExportError;

/// Severity of an error from the user's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Something outside the user's control hiccupped; re-running may work.
    Transient,
    /// User must change something first (margins, selection, permissions).
    ActionRequired,
    /// Re-running with the same input will fail the same way.
    Permanent,
}

/// A human-readable error with plain English message and actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Plain English summary (shown as a heading).
    pub message: String,
    /// What the user should try (shown as body text).
    pub suggestion: String,
    /// Whether a manual "Try again" is worth offering.
    pub try_again: bool,
    /// Severity level (drives icon/colour in UI).
    pub severity: Severity,
}

/// Convert an `ExportError` into a `HumanError` suitable for a dialog.
pub fn humanize_error(err: &ExportError) -> HumanError {
    match err {
        ExportError::InvalidGeometry { .. } => HumanError {
            message: "The margins are too large for this page.".into(),
            suggestion: "Make the margins smaller so there is room left for the content, then export again.".into(),
            try_again: false,
            severity: Severity::ActionRequired,
        },

        ExportError::CaptureFailure(detail) => HumanError {
            message: "We couldn't take a picture of the document.".into(),
            suggestion: format!("Wait until the page has finished loading, then try again. ({detail})"),
            try_again: true,
            severity: Severity::Transient,
        },

        ExportError::RenderFailure { page_index, .. } => HumanError {
            message: format!("Page {} couldn't be created.", page_index + 1),
            suggestion: "Nothing was saved. Try again; if it keeps failing, try a smaller document.".into(),
            try_again: true,
            severity: Severity::Transient,
        },

        ExportError::EmptyContent(what) => HumanError {
            message: "There is nothing to export yet.".into(),
            suggestion: format!("Add at least one entry first. ({what})"),
            try_again: false,
            severity: Severity::ActionRequired,
        },

        ExportError::Serialization(_) => HumanError {
            message: "The PDF file couldn't be put together.".into(),
            suggestion: "Try again. If this keeps happening, please report it.".into(),
            try_again: true,
            severity: Severity::Transient,
        },

        ExportError::Download(_) => HumanError {
            message: "The finished PDF couldn't be saved.".into(),
            suggestion: "Check there is free space in the download folder, then try again.".into(),
            try_again: true,
            severity: Severity::Transient,
        },

        ExportError::TooManyPages { limit, .. } => HumanError {
            message: format!("The document would need more than {limit} pages."),
            suggestion: "Export a shorter section, or use a fixed page count.".into(),
            try_again: false,
            severity: Severity::ActionRequired,
        },

        ExportError::ImageError(_) => HumanError {
            message: "There's a problem with the page image.".into(),
            suggestion: "The image may be damaged or in an unusual format. Try saving it as a PNG first.".into(),
            try_again: false,
            severity: Severity::Permanent,
        },

        ExportError::Io(io_err) => {
            if io_err.kind() == std::io::ErrorKind::NotFound {
                HumanError {
                    message: "The file couldn't be found.".into(),
                    suggestion: "It may have been moved or deleted. Try choosing the file again.".into(),
                    try_again: false,
                    severity: Severity::ActionRequired,
                }
            } else if io_err.kind() == std::io::ErrorKind::PermissionDenied {
                HumanError {
                    message: "The app doesn't have permission to use that file.".into(),
                    suggestion: "Check the file permissions, or choose a different folder.".into(),
                    try_again: false,
                    severity: Severity::ActionRequired,
                }
            } else {
                HumanError {
                    message: "There was a problem reading or writing a file.".into(),
                    suggestion: "Try again. If this keeps happening, your storage may be full.".into(),
                    try_again: true,
                    severity: Severity::Transient,
                }
            }
        }

        ExportError::Config(_) => HumanError {
            message: "The export settings file couldn't be read.".into(),
            suggestion: "Fix or delete the settings file; defaults will be used when it is missing.".into(),
            try_again: false,
            severity: Severity::Permanent,
        },
    }
}
