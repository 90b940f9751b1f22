// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Geometry calculator — decides how a snapshot is laid across pages.
//
// The whole scaled image is drawn on every page, shifted up by one usable
// height per page; the page boundary clips it so each page shows one band.
// All lengths are millimetres with the origin at the top-left page corner.

use serde::Serialize;
use snapfolio_core::error::{ExportError, Result};
use snapfolio_core::types::{ExportMode, PageGeometry, SnapshotSize};
use tracing::{debug, instrument, warn};

/// Slack (mm) that keeps an exact fit from spilling onto an empty page.
const FIT_TOLERANCE_MM: f32 = 1e-3;

/// Upper bound on a flowed document; taller content is rejected.
pub const MAX_FLOW_PAGES: usize = 10_000;

/// Which constraint determined the scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FitBound {
    /// Content spans the full usable width.
    Width,
    /// Content was shrunk further to respect a page budget.
    Height,
    /// Degenerate snapshot; nothing is drawn.
    Empty,
}

/// How a snapshot maps onto pages.
///
/// `page_offsets.len() == page_count` always holds; the fields are private so
/// only [`compute_plan`] can build one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaginationPlan {
    scale: f32,
    scaled_width: f32,
    scaled_height: f32,
    page_count: usize,
    page_offsets: Vec<f32>,
    center_x: f32,
    geometry: PageGeometry,
    fit: FitBound,
}

impl PaginationPlan {
    /// Millimetres per pixel.
    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn scaled_width(&self) -> f32 {
        self.scaled_width
    }

    pub fn scaled_height(&self) -> f32 {
        self.scaled_height
    }

    pub fn page_count(&self) -> usize {
        self.page_count
    }

    /// Vertical draw position of the full image on each page.
    pub fn page_offsets(&self) -> &[f32] {
        &self.page_offsets
    }

    /// Horizontal draw position of the image.
    pub fn center_x(&self) -> f32 {
        self.center_x
    }

    pub fn geometry(&self) -> &PageGeometry {
        &self.geometry
    }

    pub fn fit(&self) -> FitBound {
        self.fit
    }

    /// Whether anything will be drawn.
    pub fn has_content(&self) -> bool {
        self.fit != FitBound::Empty
    }

    /// `(start, end)` of the scaled image visible on each page, measured from
    /// the image top. The last band is clipped to the image; pages past the
    /// end of the content get an empty band.
    pub fn visible_bands(&self) -> Vec<(f32, f32)> {
        let band = self.geometry.usable_height();
        (0..self.page_count)
            .map(|i| {
                let start = (i as f32 * band).min(self.scaled_height);
                let end = ((i + 1) as f32 * band).min(self.scaled_height);
                (start, end)
            })
            .collect()
    }
}

/// Compute the pagination plan for a snapshot.
///
/// Fails with `InvalidGeometry` when the margins leave no usable area. A
/// snapshot with a zero dimension yields a single blank page.
#[instrument(skip(geometry), fields(width_px = size.width_px, height_px = size.height_px))]
pub fn compute_plan(
    size: SnapshotSize,
    geometry: &PageGeometry,
    mode: ExportMode,
) -> Result<PaginationPlan> {
    let usable_width = geometry.usable_width();
    let usable_height = geometry.usable_height();

    // Also rejects NaN.
    if !(usable_width > 0.0 && usable_height > 0.0) {
        return Err(ExportError::InvalidGeometry {
            usable_width,
            usable_height,
        });
    }

    if size.is_degenerate() {
        debug!("degenerate snapshot, planning one blank page");
        return Ok(PaginationPlan {
            scale: 0.0,
            scaled_width: 0.0,
            scaled_height: 0.0,
            page_count: 1,
            page_offsets: vec![geometry.margin_top],
            center_x: geometry.margin_left,
            geometry: *geometry,
            fit: FitBound::Empty,
        });
    }

    let width_px = size.width_px as f32;
    let height_px = size.height_px as f32;
    let scale_by_width = usable_width / width_px;

    let (scale, page_count, fit) = match mode {
        ExportMode::FlowFit => {
            let scaled_height = height_px * scale_by_width;
            let pages = ((f64::from(scaled_height) - f64::from(FIT_TOLERANCE_MM))
                / f64::from(usable_height))
            .ceil();
            if pages > MAX_FLOW_PAGES as f64 {
                return Err(ExportError::TooManyPages {
                    required: pages,
                    limit: MAX_FLOW_PAGES,
                });
            }
            (scale_by_width, (pages as usize).max(1), FitBound::Width)
        }
        ExportMode::FixedPages(budget) => {
            let pages = budget.get();
            let total_usable_height = usable_height * pages as f32;
            let scale_by_height = total_usable_height / height_px;
            if scale_by_height < scale_by_width {
                warn!(
                    pages,
                    scale_by_width,
                    scale_by_height,
                    "content longer than page budget, shrinking below full width"
                );
                (scale_by_height, pages, FitBound::Height)
            } else {
                (scale_by_width, pages, FitBound::Width)
            }
        }
    };

    let scaled_width = width_px * scale;
    let scaled_height = height_px * scale;
    let center_x = if scaled_width < usable_width {
        geometry.margin_left + (usable_width - scaled_width) / 2.0
    } else {
        geometry.margin_left
    };

    let page_offsets = (0..page_count)
        .map(|i| geometry.margin_top - i as f32 * usable_height)
        .collect();

    debug!(
        scale,
        scaled_width, scaled_height, page_count, center_x, "pagination planned"
    );

    Ok(PaginationPlan {
        scale,
        scaled_width,
        scaled_height,
        page_count,
        page_offsets,
        center_x,
        geometry: *geometry,
        fit,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use snapfolio_core::types::{MarginSet, Orientation, PaperSize};

    fn a4(margins: MarginSet) -> PageGeometry {
        PageGeometry::new(PaperSize::A4, Orientation::Portrait, margins)
    }

    fn two_pages() -> ExportMode {
        ExportMode::fixed(2).unwrap()
    }

    #[test]
    fn scenario_flow_fit_a4_two_pages() {
        let plan = compute_plan(
            SnapshotSize::new(1588, 4000),
            &a4(MarginSet::default()),
            ExportMode::FlowFit,
        )
        .unwrap();

        assert!((plan.scale() - 0.1134).abs() < 1e-3);
        assert!((plan.scaled_width() - 180.0).abs() < 1e-3);
        assert!((plan.scaled_height() - 453.4).abs() < 0.5);
        assert_eq!(plan.page_count(), 2);
        assert_eq!(plan.page_offsets(), &[15.0, 15.0 - 267.0]);
        assert_eq!(plan.center_x(), 15.0);
        assert_eq!(plan.fit(), FitBound::Width);
    }

    #[test]
    fn scenario_fixed_pages_stays_width_bound() {
        let plan = compute_plan(
            SnapshotSize::new(1588, 4000),
            &a4(MarginSet::default()),
            two_pages(),
        )
        .unwrap();

        let scale_by_width = 180.0 / 1588.0;
        let scale_by_height = 534.0 / 4000.0;
        assert!(scale_by_height > scale_by_width);
        assert!((plan.scale() - scale_by_width).abs() < 1e-6);
        assert_eq!(plan.page_count(), 2);
        assert_eq!(plan.fit(), FitBound::Width);
        assert_eq!(plan.center_x(), 15.0);
    }

    #[test]
    fn scenario_oversized_margins_are_invalid() {
        // The dialog clamps to 50mm; raw geometry can still arrive from elsewhere.
        let geometry = PageGeometry {
            page_width: 210.0,
            page_height: 297.0,
            margin_left: 150.0,
            margin_right: 150.0,
            margin_top: 15.0,
            margin_bottom: 15.0,
        };
        let err = compute_plan(SnapshotSize::new(800, 600), &geometry, ExportMode::FlowFit)
            .unwrap_err();
        assert!(matches!(
            err,
            ExportError::InvalidGeometry { usable_width, .. } if usable_width <= 0.0
        ));
    }

    #[test]
    fn scenario_zero_height_snapshot_gives_one_blank_page() {
        let plan = compute_plan(
            SnapshotSize::new(1588, 0),
            &a4(MarginSet::default()),
            ExportMode::FlowFit,
        )
        .unwrap();
        assert_eq!(plan.page_count(), 1);
        assert_eq!(plan.page_offsets().len(), 1);
        assert!(!plan.has_content());
    }

    #[test]
    fn degenerate_snapshot_with_invalid_geometry_still_fails() {
        let geometry = PageGeometry::with_margins(40.0, 297.0, MarginSet::uniform(30.0));
        assert!(compute_plan(SnapshotSize::new(0, 0), &geometry, ExportMode::FlowFit).is_err());
    }

    #[test]
    fn zero_usable_height_is_invalid() {
        let geometry = PageGeometry::with_margins(210.0, 100.0, MarginSet::uniform(50.0));
        assert!(matches!(
            compute_plan(SnapshotSize::new(10, 10), &geometry, ExportMode::FlowFit),
            Err(ExportError::InvalidGeometry { .. })
        ));
    }

    #[test]
    fn offsets_always_match_page_count() {
        let geometry = a4(MarginSet::new(20.0, 10.0, 35.0, 12.0));
        for width in [1u32, 7, 320, 1588, 5000] {
            for height in [1u32, 99, 4000, 25_000] {
                for mode in [ExportMode::FlowFit, two_pages(), ExportMode::fixed(5).unwrap()] {
                    let plan =
                        compute_plan(SnapshotSize::new(width, height), &geometry, mode).unwrap();
                    assert!(plan.page_count() >= 1);
                    assert_eq!(plan.page_offsets().len(), plan.page_count());
                }
            }
        }
    }

    #[test]
    fn flow_fit_page_count_is_monotonic_in_height() {
        let geometry = a4(MarginSet::default());
        let mut previous = 0;
        for height in (100..20_000).step_by(137) {
            let plan =
                compute_plan(SnapshotSize::new(1588, height), &geometry, ExportMode::FlowFit)
                    .unwrap();
            assert!(plan.page_count() >= previous);
            previous = plan.page_count();
        }
    }

    #[test]
    fn absurdly_tall_snapshot_hits_page_limit() {
        let err = compute_plan(
            SnapshotSize::new(1, u32::MAX),
            &a4(MarginSet::default()),
            ExportMode::FlowFit,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ExportError::TooManyPages { limit: MAX_FLOW_PAGES, required } if required > 1e9
        ));
    }

    #[test]
    fn page_limit_is_inclusive() {
        // 180px wide at 1mm per px, exactly MAX_FLOW_PAGES usable heights tall.
        let height = 267 * MAX_FLOW_PAGES as u32;
        let plan = compute_plan(
            SnapshotSize::new(180, height),
            &a4(MarginSet::default()),
            ExportMode::FlowFit,
        )
        .unwrap();
        assert_eq!(plan.page_count(), MAX_FLOW_PAGES);
    }

    #[test]
    fn exact_fit_does_not_add_an_empty_page() {
        // 180mm wide at 1px == 1mm, 534px tall == exactly two usable heights.
        let plan = compute_plan(
            SnapshotSize::new(180, 534),
            &a4(MarginSet::default()),
            ExportMode::FlowFit,
        )
        .unwrap();
        assert_eq!(plan.page_count(), 2);
    }

    #[test]
    fn fixed_pages_returns_budget_regardless_of_length() {
        let geometry = a4(MarginSet::default());
        for height in [10u32, 4000, 90_000] {
            let plan = compute_plan(
                SnapshotSize::new(1588, height),
                &geometry,
                ExportMode::fixed(3).unwrap(),
            )
            .unwrap();
            assert_eq!(plan.page_offsets().len(), 3);
        }
    }

    #[test]
    fn fixed_pages_never_upscales_beyond_width_fit() {
        let geometry = a4(MarginSet::default());
        for (w, h) in [(100u32, 50u32), (1588, 4000), (1588, 40_000), (3000, 200)] {
            let plan = compute_plan(SnapshotSize::new(w, h), &geometry, two_pages()).unwrap();
            assert!(plan.scale() <= geometry.usable_width() / w as f32 + 1e-6);
            assert!(plan.scaled_height() <= geometry.usable_height() * 2.0 + 1e-3);
        }
    }

    #[test]
    fn long_content_in_fixed_pages_is_height_bound_and_centred() {
        let geometry = a4(MarginSet::default());
        let plan = compute_plan(SnapshotSize::new(1588, 40_000), &geometry, two_pages()).unwrap();
        assert_eq!(plan.fit(), FitBound::Height);
        assert!(plan.scaled_width() < geometry.usable_width());
        let expected_x = 15.0 + (180.0 - plan.scaled_width()) / 2.0;
        assert!((plan.center_x() - expected_x).abs() < 1e-4);
    }

    #[test]
    fn flow_fit_bands_cover_content_exactly() {
        let geometry = a4(MarginSet::new(12.0, 18.0, 22.0, 9.0));
        for height in [1u32, 333, 4000, 12_345] {
            let plan =
                compute_plan(SnapshotSize::new(1200, height), &geometry, ExportMode::FlowFit)
                    .unwrap();
            let bands = plan.visible_bands();
            assert_eq!(bands[0].0, 0.0);
            for pair in bands.windows(2) {
                assert!((pair[0].1 - pair[1].0).abs() < 1e-3, "gap or overlap");
            }
            let covered: f32 = bands.iter().map(|(start, end)| end - start).sum();
            // One pixel of rounding at the current scale.
            assert!((covered - plan.scaled_height()).abs() <= plan.scale());
            assert!(bands.last().unwrap().1 > bands.last().unwrap().0);
        }
    }
}
