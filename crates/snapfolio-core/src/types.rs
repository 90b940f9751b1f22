// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the Snapfolio export engine.

use std::num::NonZeroUsize;
use std::sync::Arc;

use image::{DynamicImage, RgbImage};
use serde::{Deserialize, Serialize};

/// Smallest margin the dialog will store, in millimetres.
pub const MIN_MARGIN_MM: f32 = 5.0;
/// Largest margin the dialog will store, in millimetres.
pub const MAX_MARGIN_MM: f32 = 50.0;
/// Margin applied to every side when the dialog opens or is reset.
pub const DEFAULT_MARGIN_MM: f32 = 15.0;

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

/// Pixel capture of rendered document content.
///
/// Immutable once captured. The pixel buffer sits behind an `Arc`, so clones
/// are cheap and share identity (writers use that to embed the image once).
#[derive(Debug, Clone)]
pub struct RasterSnapshot {
    pixels: Arc<RgbImage>,
}

impl RasterSnapshot {
    /// Wrap an RGB pixel buffer.
    pub fn new(pixels: RgbImage) -> Self {
        Self {
            pixels: Arc::new(pixels),
        }
    }

    /// Flatten any decoded image to RGB.
    pub fn from_dynamic(image: DynamicImage) -> Self {
        Self::new(image.to_rgb8())
    }

    /// A white snapshot of the given size; `blank(0, 0)` is the empty capture.
    pub fn blank(width_px: u32, height_px: u32) -> Self {
        Self::new(RgbImage::from_pixel(
            width_px,
            height_px,
            image::Rgb([255, 255, 255]),
        ))
    }

    pub fn width_px(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height_px(&self) -> u32 {
        self.pixels.height()
    }

    pub fn size(&self) -> SnapshotSize {
        SnapshotSize {
            width_px: self.width_px(),
            height_px: self.height_px(),
        }
    }

    /// Borrow the pixel buffer.
    pub fn pixels(&self) -> &RgbImage {
        &self.pixels
    }

    /// Whether both snapshots are clones of the same capture.
    pub fn shares_pixels(&self, other: &RasterSnapshot) -> bool {
        Arc::ptr_eq(&self.pixels, &other.pixels)
    }
}

/// Pixel dimensions of a snapshot, all the geometry calculator needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotSize {
    pub width_px: u32,
    pub height_px: u32,
}

impl SnapshotSize {
    pub fn new(width_px: u32, height_px: u32) -> Self {
        Self {
            width_px,
            height_px,
        }
    }

    /// Either dimension is zero.
    pub fn is_degenerate(&self) -> bool {
        self.width_px == 0 || self.height_px == 0
    }
}

// ---------------------------------------------------------------------------
// Paper and geometry
// ---------------------------------------------------------------------------

/// Standard paper sizes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PaperSize {
    A4,
    A3,
    A5,
    Letter,
    Legal,
    Custom { width_mm: f32, height_mm: f32 },
}

impl PaperSize {
    /// Portrait dimensions in millimetres (width, height).
    pub fn dimensions_mm(&self) -> (f32, f32) {
        match self {
            Self::A4 => (210.0, 297.0),
            Self::A3 => (297.0, 420.0),
            Self::A5 => (148.0, 210.0),
            Self::Letter => (215.9, 279.4),
            Self::Legal => (215.9, 355.6),
            Self::Custom {
                width_mm,
                height_mm,
            } => (*width_mm, *height_mm),
        }
    }

    /// Dimensions after applying an orientation.
    pub fn oriented_mm(&self, orientation: Orientation) -> (f32, f32) {
        let (w, h) = self.dimensions_mm();
        match orientation {
            Orientation::Portrait => (w, h),
            Orientation::Landscape => (h, w),
        }
    }
}

/// Page orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Orientation {
    #[default]
    Portrait,
    Landscape,
}

/// Page size plus margins, all in millimetres.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageGeometry {
    pub page_width: f32,
    pub page_height: f32,
    pub margin_left: f32,
    pub margin_right: f32,
    pub margin_top: f32,
    pub margin_bottom: f32,
}

impl PageGeometry {
    /// Geometry for a paper size with the given margins.
    pub fn new(paper: PaperSize, orientation: Orientation, margins: MarginSet) -> Self {
        let (page_width, page_height) = paper.oriented_mm(orientation);
        Self::with_margins(page_width, page_height, margins)
    }

    /// Geometry from raw page dimensions.
    pub fn with_margins(page_width: f32, page_height: f32, margins: MarginSet) -> Self {
        Self {
            page_width,
            page_height,
            margin_left: margins.left,
            margin_right: margins.right,
            margin_top: margins.top,
            margin_bottom: margins.bottom,
        }
    }

    pub fn usable_width(&self) -> f32 {
        self.page_width - self.margin_left - self.margin_right
    }

    pub fn usable_height(&self) -> f32 {
        self.page_height - self.margin_top - self.margin_bottom
    }
}

/// Which side of the page a margin sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MarginSide {
    Top,
    Right,
    Bottom,
    Left,
}

impl MarginSide {
    pub const ALL: [MarginSide; 4] = [Self::Top, Self::Right, Self::Bottom, Self::Left];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Right => "right",
            Self::Bottom => "bottom",
            Self::Left => "left",
        }
    }
}

/// User-edited margins, each held within `[MIN_MARGIN_MM, MAX_MARGIN_MM]`.
///
/// Fields are private so the bound cannot be bypassed; every write goes
/// through [`MarginSet::set`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawMargins", into = "RawMargins")]
pub struct MarginSet {
    top: f32,
    right: f32,
    bottom: f32,
    left: f32,
}

impl MarginSet {
    /// Build a set, clamping each value.
    pub fn new(top: f32, right: f32, bottom: f32, left: f32) -> Self {
        Self {
            top: clamp_margin(top),
            right: clamp_margin(right),
            bottom: clamp_margin(bottom),
            left: clamp_margin(left),
        }
    }

    /// Same value on all four sides.
    pub fn uniform(value: f32) -> Self {
        Self::new(value, value, value, value)
    }

    pub fn get(&self, side: MarginSide) -> f32 {
        match side {
            MarginSide::Top => self.top,
            MarginSide::Right => self.right,
            MarginSide::Bottom => self.bottom,
            MarginSide::Left => self.left,
        }
    }

    /// Clamp and store. Returns the value actually stored.
    pub fn set(&mut self, side: MarginSide, value: f32) -> f32 {
        let clamped = clamp_margin(value);
        match side {
            MarginSide::Top => self.top = clamped,
            MarginSide::Right => self.right = clamped,
            MarginSide::Bottom => self.bottom = clamped,
            MarginSide::Left => self.left = clamped,
        }
        clamped
    }

    pub fn top(&self) -> f32 {
        self.top
    }

    pub fn right(&self) -> f32 {
        self.right
    }

    pub fn bottom(&self) -> f32 {
        self.bottom
    }

    pub fn left(&self) -> f32 {
        self.left
    }
}

impl Default for MarginSet {
    fn default() -> Self {
        Self::uniform(DEFAULT_MARGIN_MM)
    }
}

/// Clamp a margin into the allowed range. NaN falls back to the default.
pub fn clamp_margin(value: f32) -> f32 {
    if value.is_nan() {
        return DEFAULT_MARGIN_MM;
    }
    value.clamp(MIN_MARGIN_MM, MAX_MARGIN_MM)
}

/// Serde shape for `MarginSet`; deserialised values are clamped on the way in.
#[derive(Serialize, Deserialize)]
struct RawMargins {
    top: f32,
    right: f32,
    bottom: f32,
    left: f32,
}

impl From<RawMargins> for MarginSet {
    fn from(raw: RawMargins) -> Self {
        Self::new(raw.top, raw.right, raw.bottom, raw.left)
    }
}

impl From<MarginSet> for RawMargins {
    fn from(m: MarginSet) -> Self {
        Self {
            top: m.top,
            right: m.right,
            bottom: m.bottom,
            left: m.left,
        }
    }
}

// ---------------------------------------------------------------------------
// Export settings
// ---------------------------------------------------------------------------

/// Pagination policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExportMode {
    /// Page count grows until all content fits at full usable width.
    FlowFit,
    /// Content is scaled down (never up) to fit exactly this many pages.
    FixedPages(NonZeroUsize),
}

impl ExportMode {
    /// `FixedPages(n)`, or `None` when `n` is zero.
    pub fn fixed(pages: usize) -> Option<Self> {
        NonZeroUsize::new(pages).map(Self::FixedPages)
    }
}

/// 8-bit RGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const MID_GREY: Color = Color::rgb(128, 128, 128);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Page footer text and placement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FooterFormat {
    /// Text with `{page}` (1-based) and `{pages}` placeholders.
    pub template: String,
    /// Font size in points.
    pub font_size: f32,
    pub color: Color,
    /// Distance of the text baseline above the bottom page edge, in mm.
    pub bottom_offset: f32,
}

impl FooterFormat {
    /// Expand the template for one page.
    pub fn render(&self, page: usize, pages: usize) -> String {
        self.template
            .replace("{page}", &page.to_string())
            .replace("{pages}", &pages.to_string())
    }
}

impl Default for FooterFormat {
    fn default() -> Self {
        Self {
            template: "Page {page} of {pages}".into(),
            font_size: 9.0,
            color: Color::MID_GREY,
            bottom_offset: 8.0,
        }
    }
}

/// Kinds of document the export engine serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DocumentKind {
    /// Meeting minutes; flow across as many pages as needed.
    Minutes,
    /// Material listing; squeezed onto a fixed page budget.
    MaterialList,
    /// Daily site report; flow across as many pages as needed.
    DailyReport,
}

impl DocumentKind {
    /// Prefix used for generated filenames.
    pub fn filename_prefix(&self) -> &'static str {
        match self {
            Self::Minutes => "Minutes",
            Self::MaterialList => "Materials",
            Self::DailyReport => "DailyReport",
        }
    }
}

/// A serialized output document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentBlob {
    pub bytes: Vec<u8>,
    pub mime_type: &'static str,
}

impl DocumentBlob {
    pub fn pdf(bytes: Vec<u8>) -> Self {
        Self {
            bytes,
            mime_type: "application/pdf",
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}
