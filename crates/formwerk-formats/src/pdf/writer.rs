// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF generation: lay out text, tables, and images on US Letter pages.

use image::DynamicImage;
use printpdf::{
    BuiltinFont, Mm, Op, PdfDocument, PdfPage, PdfSaveOptions, PdfWarnMsg, Point, Pt, RawImage,
    RawImageData, RawImageFormat, TextItem, XObjectTransform,
};

use formwerk_core::error::Result;

/// US Letter width in PDF points.
const PAGE_WIDTH_PT: f32 = 612.0;
/// US Letter height in PDF points.
const PAGE_HEIGHT_PT: f32 = 792.0;
/// US Letter in millimetres, for page construction.
const PAGE_WIDTH_MM: f32 = 215.9;
const PAGE_HEIGHT_MM: f32 = 279.4;
/// Margin kept clear on every edge of a text page.
const MARGIN_PT: f32 = 50.0;
/// Vertical advance per text line and per table row.
const LINE_PITCH_PT: f32 = 20.0;
/// Extra vertical gap under a table header row.
const HEADER_GAP_PT: f32 = 30.0;
/// Horizontal advance per table column.
const COLUMN_PITCH_PT: f32 = 100.0;
/// Table cells are clipped to this many characters. Headers are not clipped.
const CELL_CHAR_LIMIT: usize = 15;
/// Body font size.
const FONT_SIZE_PT: f32 = 12.0;
/// Images are placed at this resolution before fit scaling.
const IMAGE_DPI: f32 = 150.0;
/// Margin around a placed image, in millimetres.
const IMAGE_MARGIN_MM: f32 = 15.0;

/// Renders plain text, tabular data, and raster images as PDF documents.
///
/// Layout is deliberately simple: Helvetica throughout, a fixed line
/// pitch, and a new page whenever the cursor crosses the bottom margin.
pub struct PdfWriter {
    title: String,
}

impl PdfWriter {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
        }
    }

    // -- Text ------------------------------------------------------------

    /// Render text one line per row, paginating at the bottom margin.
    ///
    /// Lines are trimmed of surrounding whitespace. Empty input still
    /// produces one blank page.
    pub fn create_from_text(&self, text: &str) -> Result<Vec<u8>> {
        let doc = PdfDocument::new(&self.title);
        let mut pages = Vec::new();
        let mut ops = Vec::new();
        let mut y = PAGE_HEIGHT_PT - MARGIN_PT;

        for line in text.lines() {
            if y < MARGIN_PT {
                pages.push(page_from_ops(std::mem::take(&mut ops)));
                y = PAGE_HEIGHT_PT - MARGIN_PT;
            }
            push_text_ops(&mut ops, MARGIN_PT, y, line.trim());
            y -= LINE_PITCH_PT;
        }
        pages.push(page_from_ops(ops));
        finish(doc, pages)
    }

    // -- Tables ----------------------------------------------------------

    /// Render a table with a header row on the first page only.
    ///
    /// Headers are written in full; data cells are clipped to
    /// [`CELL_CHAR_LIMIT`] characters. Continuation pages restart at the
    /// top margin without repeating the header.
    pub fn create_from_table(&self, headers: &[String], rows: &[Vec<String>]) -> Result<Vec<u8>> {
        let doc = PdfDocument::new(&self.title);
        let mut pages = Vec::new();
        let mut ops = Vec::new();
        let mut y = PAGE_HEIGHT_PT - MARGIN_PT;

        for (index, header) in headers.iter().enumerate() {
            push_text_ops(&mut ops, column_x(index), y, header);
        }
        y -= HEADER_GAP_PT;

        for row in rows {
            if y < MARGIN_PT {
                pages.push(page_from_ops(std::mem::take(&mut ops)));
                y = PAGE_HEIGHT_PT - MARGIN_PT;
            }
            for (index, cell) in row.iter().enumerate() {
                let clipped: String = cell.chars().take(CELL_CHAR_LIMIT).collect();
                push_text_ops(&mut ops, column_x(index), y, &clipped);
            }
            y -= LINE_PITCH_PT;
        }
        pages.push(page_from_ops(ops));
        finish(doc, pages)
    }

    // -- Images ----------------------------------------------------------

    /// Place an image centred on a single page, scaled down to fit within
    /// the margins but never scaled up.
    pub fn create_from_image(&self, image: &DynamicImage) -> Result<Vec<u8>> {
        let mut doc = PdfDocument::new(&self.title);

        let rgb = image.to_rgb8();
        let (px_width, px_height) = rgb.dimensions();
        let raw = RawImage {
            pixels: RawImageData::U8(rgb.into_raw()),
            width: px_width as usize,
            height: px_height as usize,
            data_format: RawImageFormat::RGB8,
            tag: Vec::new(),
        };
        let image_id = doc.add_image(&raw);

        let natural_width = px_width as f32 * 72.0 / IMAGE_DPI;
        let natural_height = px_height as f32 * 72.0 / IMAGE_DPI;
        let available_width = Mm(PAGE_WIDTH_MM - 2.0 * IMAGE_MARGIN_MM).into_pt().0;
        let available_height = Mm(PAGE_HEIGHT_MM - 2.0 * IMAGE_MARGIN_MM).into_pt().0;
        let scale = (available_width / natural_width)
            .min(available_height / natural_height)
            .min(1.0);

        let ops = vec![Op::UseXobject {
            id: image_id,
            transform: XObjectTransform {
                translate_x: Some(Pt((PAGE_WIDTH_PT - natural_width * scale) / 2.0)),
                translate_y: Some(Pt((PAGE_HEIGHT_PT - natural_height * scale) / 2.0)),
                rotate: None,
                scale_x: Some(scale),
                scale_y: Some(scale),
                dpi: Some(IMAGE_DPI),
            },
        }];
        finish(doc, vec![page_from_ops(ops)])
    }
}

// -- Helpers -------------------------------------------------------------

fn column_x(index: usize) -> f32 {
    MARGIN_PT + index as f32 * COLUMN_PITCH_PT
}

fn page_from_ops(ops: Vec<Op>) -> PdfPage {
    PdfPage::new(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), ops)
}

fn push_text_ops(ops: &mut Vec<Op>, x: f32, y: f32, text: &str) {
    ops.push(Op::StartTextSection);
    ops.push(Op::SetTextCursor {
        pos: Point {
            x: Pt(x),
            y: Pt(y),
        },
    });
    ops.push(Op::SetFontSizeBuiltinFont {
        size: Pt(FONT_SIZE_PT),
        font: BuiltinFont::Helvetica,
    });
    ops.push(Op::WriteTextBuiltinFont {
        items: vec![TextItem::Text(text.to_string())],
        font: BuiltinFont::Helvetica,
    });
    ops.push(Op::EndTextSection);
}

fn finish(mut doc: PdfDocument, pages: Vec<PdfPage>) -> Result<Vec<u8>> {
    doc.with_pages(pages);
    let mut warnings: Vec<PdfWarnMsg> = Vec::new();
    Ok(doc.save(&PdfSaveOptions::default(), &mut warnings))
}
