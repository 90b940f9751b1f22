// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF writer — the `DocumentWriter` primitives backed by `printpdf` 0.8.
//
// printpdf 0.8 uses a data-oriented API: documents are built by constructing
// `PdfPage` structs containing `Vec<Op>` operation lists, then serialised via
// `PdfDocument::save()`. PDF space has its origin at the bottom-left corner,
// so every top-left millimetre coordinate is flipped here.

use printpdf::{
    BuiltinFont, Color as PdfColor, LinePoint, Mm, Op, PaintMode, PdfDocument, PdfPage,
    PdfSaveOptions, PdfWarnMsg, Point, Polygon, PolygonRing, Pt, RawImage, RawImageData,
    RawImageFormat, Rgb, TextItem, WindingOrder, XObjectId, XObjectTransform,
};
use snapfolio_core::error::{ExportError, Result};
use snapfolio_core::types::{Color, DocumentBlob, RasterSnapshot};
use tracing::{debug, info, instrument};

use crate::writer::{DocumentWriter, Rect, TextAlign};

/// Images are embedded at 72 dpi so one pixel is one point before scaling.
const IMAGE_DPI: f32 = 72.0;

/// Average Helvetica glyph width as a fraction of the font size.
const AVG_GLYPH_WIDTH_EM: f32 = 0.50;

/// Millimetres per typographic point.
const MM_PER_PT: f32 = 0.3528;

/// Builds a PDF page by page through the `DocumentWriter` primitives.
///
/// All pages share one size. A snapshot placed on several pages is embedded
/// once and referenced from each page.
pub struct PdfDocumentWriter {
    doc: PdfDocument,
    page_width: Mm,
    page_height: Mm,
    /// Finished pages.
    pages: Vec<PdfPage>,
    /// Operations of the page currently open.
    ops: Vec<Op>,
    /// Embedded images. Holding the snapshot keeps its buffer alive, so
    /// pointer identity cannot be reused by a later capture.
    images: Vec<(RasterSnapshot, XObjectId)>,
    font_size_pt: f32,
    font_color: Color,
}

impl PdfDocumentWriter {
    /// Start a document whose pages measure `page_width` x `page_height` mm.
    pub fn new(title: &str, page_width: f32, page_height: f32) -> Self {
        Self {
            doc: PdfDocument::new(title),
            page_width: Mm(page_width),
            page_height: Mm(page_height),
            pages: Vec::new(),
            ops: Vec::new(),
            images: Vec::new(),
            font_size_pt: 10.0,
            font_color: Color::BLACK,
        }
    }

    /// Pages finished or open so far.
    pub fn page_count(&self) -> usize {
        self.pages.len() + 1
    }

    /// Convert a top-left millimetre y coordinate to a PDF point y coordinate.
    fn flip_y(&self, y_mm: f32) -> Pt {
        Mm(self.page_height.0 - y_mm).into_pt()
    }

    fn image_id(&mut self, snapshot: &RasterSnapshot) -> XObjectId {
        if let Some((_, id)) = self
            .images
            .iter()
            .find(|(embedded, _)| embedded.shares_pixels(snapshot))
        {
            return id.clone();
        }
        let raw = RawImage {
            pixels: RawImageData::U8(snapshot.pixels().as_raw().clone()),
            width: snapshot.width_px() as usize,
            height: snapshot.height_px() as usize,
            data_format: RawImageFormat::RGB8,
            tag: Vec::new(),
        };
        let id = self.doc.add_image(&raw);
        debug!(
            width = snapshot.width_px(),
            height = snapshot.height_px(),
            "embedded snapshot image"
        );
        self.images.push((snapshot.clone(), id.clone()));
        id
    }
}

fn pdf_color(color: Color) -> PdfColor {
    PdfColor::Rgb(Rgb {
        r: f32::from(color.r) / 255.0,
        g: f32::from(color.g) / 255.0,
        b: f32::from(color.b) / 255.0,
        icc_profile: None,
    })
}

/// Rough rendered width of `text` in Helvetica, in millimetres.
fn estimate_text_width_mm(text: &str, size_pt: f32) -> f32 {
    text.chars().count() as f32 * AVG_GLYPH_WIDTH_EM * size_pt * MM_PER_PT
}

impl DocumentWriter for PdfDocumentWriter {
    fn new_page(&mut self) -> Result<()> {
        let ops = std::mem::take(&mut self.ops);
        self.pages
            .push(PdfPage::new(self.page_width, self.page_height, ops));
        Ok(())
    }

    fn place_image(&mut self, snapshot: &RasterSnapshot, area: Rect) -> Result<()> {
        if snapshot.size().is_degenerate() {
            return Err(ExportError::ImageError("snapshot has no pixels".into()));
        }
        if !(area.width > 0.0 && area.height > 0.0 && area.x.is_finite() && area.y.is_finite()) {
            return Err(ExportError::ImageError(format!(
                "cannot place image in {:?}",
                area
            )));
        }

        let id = self.image_id(snapshot);
        let width_pt = Mm(area.width).into_pt().0;
        let height_pt = Mm(area.height).into_pt().0;
        let scale_x = width_pt / snapshot.width_px() as f32;
        let scale_y = height_pt / snapshot.height_px() as f32;
        // PDF anchors the image at its bottom-left corner.
        let bottom = self.flip_y(area.y + area.height);

        self.ops.push(Op::UseXobject {
            id,
            transform: XObjectTransform {
                translate_x: Some(Mm(area.x).into_pt()),
                translate_y: Some(bottom),
                scale_x: Some(scale_x),
                scale_y: Some(scale_y),
                dpi: Some(IMAGE_DPI),
                rotate: None,
            },
        });
        Ok(())
    }

    fn set_font(&mut self, size_pt: f32, color: Color) {
        self.font_size_pt = size_pt;
        self.font_color = color;
    }

    fn draw_text(&mut self, text: &str, x: f32, y: f32, align: TextAlign) {
        let width = estimate_text_width_mm(text, self.font_size_pt);
        let left = match align {
            TextAlign::Left => x,
            TextAlign::Center => x - width / 2.0,
            TextAlign::Right => x - width,
        };

        // Masks may have changed the fill colour since `set_font`.
        self.ops.push(Op::SetFillColor {
            col: pdf_color(self.font_color),
        });
        self.ops.push(Op::StartTextSection);
        self.ops.push(Op::SetTextCursor {
            pos: Point {
                x: Mm(left).into_pt(),
                y: self.flip_y(y),
            },
        });
        self.ops.push(Op::SetFontSizeBuiltinFont {
            size: Pt(self.font_size_pt),
            font: BuiltinFont::Helvetica,
        });
        self.ops.push(Op::WriteTextBuiltinFont {
            items: vec![TextItem::Text(text.to_string())],
            font: BuiltinFont::Helvetica,
        });
        self.ops.push(Op::EndTextSection);
    }

    fn fill_rect(&mut self, area: Rect, color: Color) {
        if area.width <= 0.0 || area.height <= 0.0 {
            return;
        }
        let left = Mm(area.x).into_pt();
        let right = Mm(area.x + area.width).into_pt();
        let top = self.flip_y(area.y);
        let bottom = self.flip_y(area.y + area.height);
        let corner = |x: Pt, y: Pt| LinePoint {
            p: Point { x, y },
            bezier: false,
        };

        self.ops.push(Op::SetFillColor {
            col: pdf_color(color),
        });
        self.ops.push(Op::DrawPolygon {
            polygon: Polygon {
                rings: vec![PolygonRing {
                    points: vec![
                        corner(left, bottom),
                        corner(right, bottom),
                        corner(right, top),
                        corner(left, top),
                    ],
                }],
                mode: PaintMode::Fill,
                winding_order: WindingOrder::NonZero,
            },
        });
    }

    #[instrument(skip(self), fields(pages = self.page_count()))]
    fn serialize(mut self) -> Result<DocumentBlob> {
        let last = std::mem::take(&mut self.ops);
        self.pages
            .push(PdfPage::new(self.page_width, self.page_height, last));
        let pages = std::mem::take(&mut self.pages);
        let page_count = pages.len();
        self.doc.with_pages(pages);

        let mut warnings: Vec<PdfWarnMsg> = Vec::new();
        let bytes = self.doc.save(&PdfSaveOptions::default(), &mut warnings);
        if bytes.is_empty() {
            return Err(ExportError::Serialization(format!(
                "printpdf produced no output ({} warnings)",
                warnings.len()
            )));
        }

        info!(
            pages = page_count,
            bytes = bytes.len(),
            warnings = warnings.len(),
            "PDF serialised"
        );
        Ok(DocumentBlob::pdf(bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emit::{EmitOptions, emit};
    use crate::geometry::compute_plan;
    use snapfolio_core::types::{
        ExportMode, FooterFormat, MarginSet, Orientation, PageGeometry, PaperSize,
    };

    fn page_count_of(blob: &DocumentBlob) -> usize {
        lopdf::Document::load_mem(&blob.bytes)
            .expect("valid PDF")
            .get_pages()
            .len()
    }

    #[test]
    fn emitted_pdf_has_one_page_per_offset() {
        let snapshot = RasterSnapshot::blank(160, 400);
        let geometry =
            PageGeometry::new(PaperSize::A4, Orientation::Portrait, MarginSet::default());
        let plan = compute_plan(snapshot.size(), &geometry, ExportMode::FlowFit).unwrap();
        assert_eq!(plan.page_count(), 2);

        let mut writer = PdfDocumentWriter::new("test", 210.0, 297.0);
        emit(
            &mut writer,
            &snapshot,
            &plan,
            Some(&FooterFormat::default()),
            &EmitOptions::default(),
        )
        .unwrap();
        let blob = writer.serialize().unwrap();

        assert_eq!(blob.mime_type, "application/pdf");
        assert!(blob.bytes.starts_with(b"%PDF"));
        assert_eq!(page_count_of(&blob), 2);
    }

    #[test]
    fn fresh_writer_serialises_one_blank_page() {
        let blob = PdfDocumentWriter::new("blank", 148.0, 210.0)
            .serialize()
            .unwrap();
        assert_eq!(page_count_of(&blob), 1);
    }

    #[test]
    fn repeated_snapshot_is_embedded_once() {
        let snapshot = RasterSnapshot::blank(20, 20);
        let mut writer = PdfDocumentWriter::new("dedupe", 210.0, 297.0);
        let area = Rect::new(15.0, 15.0, 180.0, 180.0);
        writer.place_image(&snapshot, area).unwrap();
        writer.new_page().unwrap();
        writer.place_image(&snapshot.clone(), area).unwrap();
        assert_eq!(writer.images.len(), 1);
        assert_eq!(writer.page_count(), 2);
    }

    #[test]
    fn distinct_snapshots_are_never_aliased() {
        let mut writer = PdfDocumentWriter::new("distinct", 210.0, 297.0);
        let area = Rect::new(15.0, 15.0, 60.0, 60.0);
        for shade in 0..50u8 {
            // Each snapshot is dropped right after placement, freeing its address.
            let snapshot = RasterSnapshot::new(::image::RgbImage::from_pixel(
                64,
                64,
                ::image::Rgb([shade, 0, 0]),
            ));
            writer.place_image(&snapshot, area).unwrap();
        }
        assert_eq!(writer.images.len(), 50);
        for (i, (embedded, _)) in writer.images.iter().enumerate() {
            assert_eq!(embedded.pixels().get_pixel(0, 0).0, [i as u8, 0, 0]);
        }
    }

    #[test]
    fn empty_snapshot_is_rejected() {
        let mut writer = PdfDocumentWriter::new("empty", 210.0, 297.0);
        let err = writer
            .place_image(&RasterSnapshot::blank(0, 10), Rect::new(0.0, 0.0, 10.0, 10.0))
            .unwrap_err();
        assert!(matches!(err, ExportError::ImageError(_)));
    }

    #[test]
    fn text_width_estimate_is_plausible() {
        let width = estimate_text_width_mm("Page 1 of 2", 9.0);
        assert!(width > 10.0 && width < 25.0);
    }
}
