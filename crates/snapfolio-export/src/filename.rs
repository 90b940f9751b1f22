// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Output filenames.

use chrono::NaiveDate;
use snapfolio_core::types::DocumentKind;

/// Longest sanitised name, in characters.
const MAX_NAME_LEN: usize = 50;

/// Make `name` safe for a filename.
///
/// Keeps `[A-Za-z0-9_- ]`, turns each run of spaces into one underscore and
/// cuts the result to 50 characters. Falls back to `untitled`.
pub fn sanitize_filename(name: &str) -> String {
    let kept: String = name
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | ' '))
        .collect();
    let joined = kept.split_whitespace().collect::<Vec<_>>().join("_");
    let truncated: String = joined.chars().take(MAX_NAME_LEN).collect();
    if truncated.is_empty() {
        "untitled".to_string()
    } else {
        truncated
    }
}

/// `{prefix}_{title}_{YYYY-MM-DD}.pdf`
pub fn export_filename(kind: DocumentKind, title: &str, date: NaiveDate) -> String {
    format!(
        "{}_{}_{}.pdf",
        kind.filename_prefix(),
        sanitize_filename(title),
        date.format("%Y-%m-%d")
    )
}
