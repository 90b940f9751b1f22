// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Page emitter — turns a pagination plan into writer calls.

use snapfolio_core::error::{ExportError, Result};
use snapfolio_core::types::{Color, FooterFormat, RasterSnapshot};
use tracing::{debug, info, instrument, warn};

use crate::geometry::PaginationPlan;
use crate::writer::{DocumentWriter, Rect, TextAlign};

/// Emitter switches that are not part of the plan itself.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EmitOptions {
    /// Cover the top and bottom margins after placing the image.
    pub mask_margins: bool,
    /// Colour used for margin masks.
    pub background: Color,
}

impl Default for EmitOptions {
    fn default() -> Self {
        Self {
            mask_margins: true,
            background: Color::WHITE,
        }
    }
}

/// Emit every page of `plan` into `writer`.
///
/// The same plan always produces the same call sequence. If the writer
/// rejects a page, emission stops there with `RenderFailure`; whatever the
/// writer holds at that point must be discarded by the caller.
#[instrument(skip_all, fields(pages = plan.page_count(), footer = footer.is_some()))]
pub fn emit<W: DocumentWriter + ?Sized>(
    writer: &mut W,
    snapshot: &RasterSnapshot,
    plan: &PaginationPlan,
    footer: Option<&FooterFormat>,
    options: &EmitOptions,
) -> Result<()> {
    let geometry = plan.geometry();
    let page_count = plan.page_count();

    for (page_index, &offset) in plan.page_offsets().iter().enumerate() {
        if page_index > 0 {
            writer
                .new_page()
                .map_err(|err| render_failure(page_index, err))?;
        }

        if plan.has_content() {
            let area = Rect::new(
                plan.center_x(),
                offset,
                plan.scaled_width(),
                plan.scaled_height(),
            );
            writer
                .place_image(snapshot, area)
                .map_err(|err| render_failure(page_index, err))?;

            if options.mask_margins {
                writer.fill_rect(
                    Rect::new(0.0, 0.0, geometry.page_width, geometry.margin_top),
                    options.background,
                );
                writer.fill_rect(
                    Rect::new(
                        0.0,
                        geometry.page_height - geometry.margin_bottom,
                        geometry.page_width,
                        geometry.margin_bottom,
                    ),
                    options.background,
                );
            }
        }

        if let Some(footer) = footer {
            writer.set_font(footer.font_size, footer.color);
            writer.draw_text(
                &footer.render(page_index + 1, page_count),
                geometry.page_width / 2.0,
                geometry.page_height - footer.bottom_offset,
                TextAlign::Center,
            );
        }

        debug!(page_index, offset, "page emitted");
    }

    info!(pages = page_count, "all pages emitted");
    Ok(())
}

fn render_failure(page_index: usize, err: ExportError) -> ExportError {
    warn!(page_index, error = %err, "writer rejected page");
    ExportError::RenderFailure {
        page_index,
        reason: err.to_string(),
    }
}
