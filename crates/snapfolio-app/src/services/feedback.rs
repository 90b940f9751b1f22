// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Terminal feedback: progress goes to the log, failures to stderr.

use snapfolio_core::human_errors::{HumanError, Severity};
use snapfolio_export::{ExportFeedback, RequestId};
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalFeedback;

impl ExportFeedback for TerminalFeedback {
    fn show_processing(&self, id: RequestId, label: &str) {
        info!(request = %id, "{label}...");
    }

    fn hide_processing(&self, id: RequestId) {
        debug!(request = %id, "done");
    }

    fn report_error(&self, error: &HumanError) {
        eprintln!("{}", render_error(error));
    }
}

fn render_error(error: &HumanError) -> String {
    let tag = match error.severity {
        Severity::Transient => "error",
        Severity::ActionRequired => "action needed",
        Severity::Permanent => "fatal",
    };
    let mut out = format!("{tag}: {}\n  {}", error.message, error.suggestion);
    if error.try_again {
        out.push_str("\n  Run the command again to retry.");
    }
    out
}
