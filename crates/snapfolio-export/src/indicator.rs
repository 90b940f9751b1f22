// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Per-request processing indicator with guaranteed teardown.

use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::traits::ExportFeedback;

/// Unique identifier for one export request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestId(pub Uuid);

impl RequestId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Shows the processing indicator for `id` while alive and hides it on drop,
/// whichever way the enclosing scope is left.
#[must_use = "the indicator is hidden as soon as the guard is dropped"]
pub struct ProcessingGuard<'a, F: ExportFeedback + ?Sized> {
    feedback: &'a F,
    id: RequestId,
}

impl<'a, F: ExportFeedback + ?Sized> ProcessingGuard<'a, F> {
    pub fn show(feedback: &'a F, id: RequestId, label: &str) -> Self {
        feedback.show_processing(id, label);
        debug!(request = %id, label, "processing indicator shown");
        Self { feedback, id }
    }
}

impl<F: ExportFeedback + ?Sized> Drop for ProcessingGuard<'_, F> {
    fn drop(&mut self) {
        self.feedback.hide_processing(self.id);
        debug!(request = %self.id, "processing indicator hidden");
    }
}
