// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Margin configurator — the state machine behind the export margin dialog.
//
// Idle -> Open -> {Editing, Previewing} -> {Confirmed | Cancelled}
//
// Both the numeric field and the slider for a side dispatch actions against
// the one stored margin value; their displayed values are projections of it.
// Edits only mark the preview stale; `refresh_preview` recomputes once no
// matter how many edits arrived in between.

use snapfolio_core::error::ExportError;
use snapfolio_core::types::{
    DEFAULT_MARGIN_MM, ExportMode, MAX_MARGIN_MM, MIN_MARGIN_MM, MarginSet, MarginSide,
    PageGeometry, SnapshotSize,
};
use snapfolio_document::{FitBound, compute_plan};
use tracing::{debug, info, warn};

/// Where the dialog is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DialogState {
    Idle,
    Open,
    /// At least one edit since the last preview.
    Editing,
    /// Preview is current.
    Previewing,
    Confirmed(MarginSet),
    Cancelled,
}

impl DialogState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Confirmed(_) | Self::Cancelled)
    }

    fn accepts_input(&self) -> bool {
        matches!(self, Self::Open | Self::Editing | Self::Previewing)
    }
}

/// Something the user did in the dialog.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MarginAction {
    /// Numeric field entry, in millimetres.
    SetMargin { side: MarginSide, value: f32 },
    /// Slider drag, as a position in `[0, 1]`.
    SetMarginFromSlider { side: MarginSide, position: f32 },
    /// All four margins back to the default.
    Reset,
    Confirm,
    Cancel,
}

/// Live page-count impact of the current margins.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MarginPreview {
    Ready {
        page_count: usize,
        scale: f32,
        fit: FitBound,
    },
    /// The margins leave no room on the page.
    Invalid { usable_width: f32, usable_height: f32 },
}

/// Interactive margin editor with live pagination preview.
#[derive(Debug, Clone)]
pub struct MarginConfigurator {
    state: DialogState,
    margins: MarginSet,
    initial: MarginSet,
    snapshot: SnapshotSize,
    page_width: f32,
    page_height: f32,
    mode: ExportMode,
    preview: Option<MarginPreview>,
    stale: bool,
    recomputes: usize,
}

impl MarginConfigurator {
    /// A closed dialog for a snapshot on pages of the given size (mm).
    pub fn new(
        snapshot: SnapshotSize,
        page_width: f32,
        page_height: f32,
        mode: ExportMode,
        initial: MarginSet,
    ) -> Self {
        Self {
            state: DialogState::Idle,
            margins: initial,
            initial,
            snapshot,
            page_width,
            page_height,
            mode,
            preview: None,
            stale: false,
            recomputes: 0,
        }
    }

    /// Open the dialog: start from the initial margins and compute a preview.
    pub fn open(&mut self) {
        if self.state != DialogState::Idle {
            warn!(state = ?self.state, "margin dialog already opened");
            return;
        }
        self.margins = self.initial;
        self.state = DialogState::Open;
        self.recompute();
        info!(margins = ?self.margins, "margin dialog opened");
    }

    /// Apply a user action. Returns `false` if the dialog ignored it.
    pub fn dispatch(&mut self, action: MarginAction) -> bool {
        if !self.state.accepts_input() {
            warn!(state = ?self.state, ?action, "margin dialog rejected action");
            return false;
        }

        match action {
            MarginAction::SetMargin { side, value } => self.set(side, value),
            MarginAction::SetMarginFromSlider { side, position } => {
                self.set(side, slider_to_value(position))
            }
            MarginAction::Reset => {
                self.margins = MarginSet::uniform(DEFAULT_MARGIN_MM);
                self.recompute();
                debug!("margins reset");
            }
            MarginAction::Confirm => {
                self.state = DialogState::Confirmed(self.margins);
                info!(margins = ?self.margins, "margins confirmed");
            }
            MarginAction::Cancel => {
                self.state = DialogState::Cancelled;
                info!("margin dialog cancelled");
            }
        }
        true
    }

    fn set(&mut self, side: MarginSide, value: f32) {
        let stored = self.margins.set(side, value);
        if stored != value {
            debug!(side = side.label(), requested = value, stored, "margin clamped");
        }
        self.stale = true;
        self.state = DialogState::Editing;
    }

    /// Bring the preview up to date with the latest edits.
    ///
    /// Edits since the previous call are coalesced into a single recompute.
    pub fn refresh_preview(&mut self) -> Option<MarginPreview> {
        if self.stale && self.state.accepts_input() {
            self.recompute();
        }
        self.preview
    }

    fn recompute(&mut self) {
        let geometry = self.geometry();
        let preview = match compute_plan(self.snapshot, &geometry, self.mode) {
            Ok(plan) => MarginPreview::Ready {
                page_count: plan.page_count(),
                scale: plan.scale(),
                fit: plan.fit(),
            },
            Err(ExportError::InvalidGeometry {
                usable_width,
                usable_height,
            }) => MarginPreview::Invalid {
                usable_width,
                usable_height,
            },
            Err(err) => {
                // Content too tall to paginate; keep the old preview.
                warn!(error = %err, "preview recompute failed");
                return;
            }
        };
        self.preview = Some(preview);
        self.stale = false;
        self.recomputes += 1;
        if self.state.accepts_input() {
            self.state = DialogState::Previewing;
        }
        debug!(?preview, "margin preview updated");
    }

    // -- Projections ----------------------------------------------------------

    /// Value shown in a side's numeric field.
    pub fn field_value(&self, side: MarginSide) -> f32 {
        self.margins.get(side)
    }

    /// Position of a side's slider in `[0, 1]`.
    pub fn slider_position(&self, side: MarginSide) -> f32 {
        value_to_slider(self.margins.get(side))
    }

    pub fn state(&self) -> DialogState {
        self.state
    }

    pub fn margins(&self) -> MarginSet {
        self.margins
    }

    /// Last computed preview, which may lag behind pending edits.
    pub fn preview(&self) -> Option<MarginPreview> {
        self.preview
    }

    /// Whether edits are waiting for `refresh_preview`.
    pub fn is_stale(&self) -> bool {
        self.stale
    }

    /// How many preview plans have been computed.
    pub fn recompute_count(&self) -> usize {
        self.recomputes
    }

    /// Preview-only geometry for the current margins.
    pub fn geometry(&self) -> PageGeometry {
        PageGeometry::with_margins(self.page_width, self.page_height, self.margins)
    }
}

fn slider_to_value(position: f32) -> f32 {
    let position = if position.is_nan() { 0.0 } else { position.clamp(0.0, 1.0) };
    MIN_MARGIN_MM + position * (MAX_MARGIN_MM - MIN_MARGIN_MM)
}

fn value_to_slider(value: f32) -> f32 {
    (value - MIN_MARGIN_MM) / (MAX_MARGIN_MM - MIN_MARGIN_MM)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opened(mode: ExportMode) -> MarginConfigurator {
        let mut dialog = MarginConfigurator::new(
            SnapshotSize::new(1588, 4000),
            210.0,
            297.0,
            mode,
            MarginSet::default(),
        );
        dialog.open();
        dialog
    }

    #[test]
    fn opening_computes_initial_preview() {
        let dialog = opened(ExportMode::FlowFit);
        assert_eq!(dialog.state(), DialogState::Previewing);
        assert_eq!(dialog.margins(), MarginSet::uniform(15.0));
        assert!(matches!(
            dialog.preview(),
            Some(MarginPreview::Ready { page_count: 2, .. })
        ));
        assert_eq!(dialog.recompute_count(), 1);
    }

    #[test]
    fn actions_before_open_are_rejected() {
        let mut dialog = MarginConfigurator::new(
            SnapshotSize::new(10, 10),
            210.0,
            297.0,
            ExportMode::FlowFit,
            MarginSet::default(),
        );
        assert!(!dialog.dispatch(MarginAction::Confirm));
        assert_eq!(dialog.state(), DialogState::Idle);
    }

    #[test]
    fn field_and_slider_stay_in_sync() {
        let mut dialog = opened(ExportMode::FlowFit);

        dialog.dispatch(MarginAction::SetMargin {
            side: MarginSide::Left,
            value: 27.5,
        });
        assert_eq!(dialog.field_value(MarginSide::Left), 27.5);
        assert!((dialog.slider_position(MarginSide::Left) - 0.5).abs() < 1e-6);

        dialog.dispatch(MarginAction::SetMarginFromSlider {
            side: MarginSide::Left,
            position: 1.0,
        });
        assert_eq!(dialog.field_value(MarginSide::Left), 50.0);
        assert_eq!(dialog.slider_position(MarginSide::Left), 1.0);
    }

    #[test]
    fn edits_are_clamped_before_storage() {
        let mut dialog = opened(ExportMode::FlowFit);
        dialog.dispatch(MarginAction::SetMargin {
            side: MarginSide::Top,
            value: 0.0,
        });
        dialog.dispatch(MarginAction::SetMargin {
            side: MarginSide::Bottom,
            value: 400.0,
        });
        dialog.dispatch(MarginAction::SetMarginFromSlider {
            side: MarginSide::Right,
            position: -3.0,
        });
        assert_eq!(dialog.margins(), MarginSet::new(5.0, 5.0, 50.0, 15.0));
    }

    #[test]
    fn rapid_edits_coalesce_into_one_recompute() {
        let mut dialog = opened(ExportMode::FlowFit);
        for value in [16.0, 18.0, 21.0, 30.0, 44.0] {
            dialog.dispatch(MarginAction::SetMargin {
                side: MarginSide::Top,
                value,
            });
        }
        assert_eq!(dialog.state(), DialogState::Editing);
        assert!(dialog.is_stale());

        let preview = dialog.refresh_preview();
        assert!(matches!(preview, Some(MarginPreview::Ready { .. })));
        assert_eq!(dialog.recompute_count(), 2);
        assert_eq!(dialog.state(), DialogState::Previewing);

        // Nothing pending: no extra work.
        dialog.refresh_preview();
        assert_eq!(dialog.recompute_count(), 2);
    }

    #[test]
    fn wider_margins_can_add_pages() {
        let mut dialog = opened(ExportMode::FlowFit);
        for side in [MarginSide::Top, MarginSide::Bottom] {
            dialog.dispatch(MarginAction::SetMargin { side, value: 50.0 });
        }
        for side in [MarginSide::Left, MarginSide::Right] {
            dialog.dispatch(MarginAction::SetMargin { side, value: 5.0 });
        }
        // 200mm wide content, 4000px tall -> ~503mm over 197mm bands.
        assert!(matches!(
            dialog.refresh_preview(),
            Some(MarginPreview::Ready { page_count: 3, .. })
        ));
    }

    #[test]
    fn reset_restores_defaults_and_recomputes() {
        let mut dialog = opened(ExportMode::FlowFit);
        dialog.dispatch(MarginAction::SetMargin {
            side: MarginSide::Right,
            value: 40.0,
        });
        dialog.dispatch(MarginAction::Reset);
        assert_eq!(dialog.margins(), MarginSet::uniform(15.0));
        assert!(!dialog.is_stale());
        assert_eq!(dialog.state(), DialogState::Previewing);
    }

    #[test]
    fn tiny_page_shows_invalid_preview() {
        let mut dialog = MarginConfigurator::new(
            SnapshotSize::new(100, 100),
            60.0,
            60.0,
            ExportMode::FlowFit,
            MarginSet::default(),
        );
        dialog.open();
        dialog.dispatch(MarginAction::SetMargin {
            side: MarginSide::Left,
            value: 50.0,
        });
        assert!(matches!(
            dialog.refresh_preview(),
            Some(MarginPreview::Invalid { .. })
        ));
    }

    #[test]
    fn confirm_is_terminal() {
        let mut dialog = opened(ExportMode::FlowFit);
        dialog.dispatch(MarginAction::SetMargin {
            side: MarginSide::Top,
            value: 20.0,
        });
        assert!(dialog.dispatch(MarginAction::Confirm));
        let expected = MarginSet::new(20.0, 15.0, 15.0, 15.0);
        assert_eq!(dialog.state(), DialogState::Confirmed(expected));

        assert!(!dialog.dispatch(MarginAction::SetMargin {
            side: MarginSide::Top,
            value: 30.0,
        }));
        assert!(!dialog.dispatch(MarginAction::Cancel));
        assert_eq!(dialog.state(), DialogState::Confirmed(expected));
    }

    #[test]
    fn cancel_is_terminal() {
        let mut dialog = opened(ExportMode::fixed(2).unwrap());
        assert!(dialog.dispatch(MarginAction::Cancel));
        assert_eq!(dialog.state(), DialogState::Cancelled);
        assert!(!dialog.dispatch(MarginAction::Confirm));
    }
}
