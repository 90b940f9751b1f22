// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Document writer abstraction — the drawing primitives the page emitter needs.
//
// Coordinates are millimetres measured from the top-left corner of the current
// page. Implementations translate to their own coordinate systems.

use snapfolio_core::error::{ExportError, Result};
use snapfolio_core::types::{Color, DocumentBlob, RasterSnapshot};

/// Horizontal anchoring for `draw_text`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

/// Axis-aligned rectangle in page millimetres (top-left origin).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// Output document being assembled page by page.
///
/// A fresh writer already has its first page open; `new_page` closes the
/// current page and starts the next one.
pub trait DocumentWriter {
    /// Finish the current page and start a new one.
    fn new_page(&mut self) -> Result<()>;

    /// Draw the snapshot stretched to `area`. May lie partly off the page.
    fn place_image(&mut self, snapshot: &RasterSnapshot, area: Rect) -> Result<()>;

    /// Font size (points) and colour for subsequent text.
    fn set_font(&mut self, size_pt: f32, color: Color);

    /// Draw one line of text with its baseline at `y`.
    fn draw_text(&mut self, text: &str, x: f32, y: f32, align: TextAlign);

    /// Fill a rectangle with a solid colour.
    fn fill_rect(&mut self, area: Rect, color: Color);

    /// Close the last page and produce the finished document.
    fn serialize(self) -> Result<DocumentBlob>
    where
        Self: Sized;
}

// ---------------------------------------------------------------------------
// Recording writer
// ---------------------------------------------------------------------------

/// One primitive call, as seen by a [`RecordingWriter`].
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    NewPage,
    PlaceImage {
        width_px: u32,
        height_px: u32,
        area: Rect,
    },
    SetFont {
        size_pt: f32,
        color: Color,
    },
    DrawText {
        text: String,
        x: f32,
        y: f32,
        align: TextAlign,
    },
    FillRect {
        area: Rect,
        color: Color,
    },
}

/// Writer that records every primitive instead of producing a real document.
///
/// Used for dry runs and to check emitter output call by call.
#[derive(Debug, Default)]
pub struct RecordingWriter {
    calls: Vec<DrawCall>,
    page: usize,
    reject_images_on_page: Option<usize>,
}

impl RecordingWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `place_image` fail on the given zero-based page.
    pub fn rejecting_images_on_page(page_index: usize) -> Self {
        Self {
            reject_images_on_page: Some(page_index),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> &[DrawCall] {
        &self.calls
    }

    /// Number of pages opened so far.
    pub fn page_count(&self) -> usize {
        self.page + 1
    }

    pub fn into_calls(self) -> Vec<DrawCall> {
        self.calls
    }
}

impl DocumentWriter for RecordingWriter {
    fn new_page(&mut self) -> Result<()> {
        self.page += 1;
        self.calls.push(DrawCall::NewPage);
        Ok(())
    }

    fn place_image(&mut self, snapshot: &RasterSnapshot, area: Rect) -> Result<()> {
        if self.reject_images_on_page == Some(self.page) {
            return Err(ExportError::ImageError(format!(
                "image rejected on page {}",
                self.page
            )));
        }
        self.calls.push(DrawCall::PlaceImage {
            width_px: snapshot.width_px(),
            height_px: snapshot.height_px(),
            area,
        });
        Ok(())
    }

    fn set_font(&mut self, size_pt: f32, color: Color) {
        self.calls.push(DrawCall::SetFont { size_pt, color });
    }

    fn draw_text(&mut self, text: &str, x: f32, y: f32, align: TextAlign) {
        self.calls.push(DrawCall::DrawText {
            text: text.to_string(),
            x,
            y,
            align,
        });
    }

    fn fill_rect(&mut self, area: Rect, color: Color) {
        self.calls.push(DrawCall::FillRect { area, color });
    }

    /// One debug line per call, as plain text.
    fn serialize(self) -> Result<DocumentBlob> {
        let text: String = self
            .calls
            .iter()
            .map(|call| format!("{call:?}\n"))
            .collect();
        Ok(DocumentBlob {
            bytes: text.into_bytes(),
            mime_type: "text/plain",
        })
    }
}
