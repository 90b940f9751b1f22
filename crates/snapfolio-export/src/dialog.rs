// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// One-shot margin dialog: a UI-side handle plus a future that resolves once
// the user confirms or dismisses it.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use snapfolio_core::types::{ExportMode, MarginSet, SnapshotSize};
use tokio::sync::oneshot;
use tracing::debug;

use crate::margins::{DialogState, MarginAction, MarginConfigurator, MarginPreview};

/// How the margin dialog ended.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DialogOutcome {
    Confirmed(MarginSet),
    Cancelled,
}

/// UI-side handle of an open margin dialog.
///
/// Dropping the handle before a decision resolves the dialog as cancelled.
pub struct MarginDialog {
    configurator: MarginConfigurator,
    resolve: Option<oneshot::Sender<DialogOutcome>>,
}

/// Future side of the dialog.
pub struct PendingMargins {
    outcome: oneshot::Receiver<DialogOutcome>,
}

/// Open a margin dialog for a snapshot on pages of the given size (mm).
pub fn open_margin_dialog(
    snapshot: SnapshotSize,
    page_width: f32,
    page_height: f32,
    mode: ExportMode,
    initial: MarginSet,
) -> (MarginDialog, PendingMargins) {
    let (tx, rx) = oneshot::channel();
    let mut configurator = MarginConfigurator::new(snapshot, page_width, page_height, mode, initial);
    configurator.open();
    (
        MarginDialog {
            configurator,
            resolve: Some(tx),
        },
        PendingMargins { outcome: rx },
    )
}

impl MarginDialog {
    /// Apply a user action; resolves the pending future on confirm or cancel.
    pub fn dispatch(&mut self, action: MarginAction) -> bool {
        let accepted = self.configurator.dispatch(action);
        match self.configurator.state() {
            DialogState::Confirmed(margins) => self.resolve(DialogOutcome::Confirmed(margins)),
            DialogState::Cancelled => self.resolve(DialogOutcome::Cancelled),
            _ => {}
        }
        accepted
    }

    /// See [`MarginConfigurator::refresh_preview`].
    pub fn refresh_preview(&mut self) -> Option<MarginPreview> {
        self.configurator.refresh_preview()
    }

    /// Read-only view for rendering fields, sliders and the preview.
    pub fn view(&self) -> &MarginConfigurator {
        &self.configurator
    }

    /// Whether the dialog has been decided.
    pub fn is_closed(&self) -> bool {
        self.resolve.is_none()
    }

    fn resolve(&mut self, outcome: DialogOutcome) {
        if let Some(tx) = self.resolve.take() {
            // The awaiting side may have gone away; nothing to do then.
            let _ = tx.send(outcome);
            debug!(?outcome, "margin dialog resolved");
        }
    }
}

impl Drop for MarginDialog {
    fn drop(&mut self) {
        self.resolve(DialogOutcome::Cancelled);
    }
}

impl Future for PendingMargins {
    type Output = DialogOutcome;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.outcome)
            .poll(cx)
            .map(|received| received.unwrap_or(DialogOutcome::Cancelled))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use snapfolio_core::types::MarginSide;

    fn open() -> (MarginDialog, PendingMargins) {
        open_margin_dialog(
            SnapshotSize::new(800, 1200),
            210.0,
            297.0,
            ExportMode::FlowFit,
            MarginSet::default(),
        )
    }

    #[tokio::test]
    async fn confirm_resolves_with_margins() {
        let (mut dialog, pending) = open();
        dialog.dispatch(MarginAction::SetMargin {
            side: MarginSide::Bottom,
            value: 25.0,
        });
        dialog.dispatch(MarginAction::Confirm);
        assert!(dialog.is_closed());

        assert_eq!(
            pending.await,
            DialogOutcome::Confirmed(MarginSet::new(15.0, 15.0, 25.0, 15.0))
        );
    }

    #[tokio::test]
    async fn cancel_resolves_cancelled() {
        let (mut dialog, pending) = open();
        dialog.dispatch(MarginAction::Cancel);
        assert_eq!(pending.await, DialogOutcome::Cancelled);
    }

    #[tokio::test]
    async fn dropping_undecided_dialog_cancels() {
        let (dialog, pending) = open();
        drop(dialog);
        assert_eq!(pending.await, DialogOutcome::Cancelled);
    }

    #[tokio::test]
    async fn resolves_from_another_task() {
        let (mut dialog, pending) = open();
        let ui = tokio::spawn(async move {
            dialog.dispatch(MarginAction::SetMarginFromSlider {
                side: MarginSide::Left,
                position: 0.0,
            });
            dialog.refresh_preview();
            dialog.dispatch(MarginAction::Confirm);
        });
        let outcome = pending.await;
        ui.await.unwrap();
        assert_eq!(
            outcome,
            DialogOutcome::Confirmed(MarginSet::new(15.0, 15.0, 15.0, 5.0))
        );
    }

    #[test]
    fn dialog_opens_with_preview() {
        let (dialog, _pending) = open();
        assert!(dialog.view().preview().is_some());
        assert!(!dialog.is_closed());
    }
}
