// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Document stream: an open PDF being filled top-to-bottom, built on
// `printpdf` 0.8.
//
// printpdf 0.8 uses a data-oriented API: pages are `PdfPage` structs holding
// `Vec<Op>` operation lists, serialised in one go by `PdfDocument::save()`.
// `DocumentStream` keeps a flowing cursor on top of that so callers can write
// text and place images the way a page-description API would, with automatic
// page breaks. Nothing is emitted until `finish()`, so a caller never sees a
// partial document.

use intake_core::RenderConfig;
use intake_core::error::IntakeError;
use printpdf::{
    BuiltinFont, Mm, Op, PdfDocument, PdfPage, PdfSaveOptions, PdfWarnMsg, Point, Pt, RawImage,
    TextItem, XObjectTransform,
};
use tracing::{debug, instrument};

use crate::image::processor::Fit;
use crate::pdf::metrics::{char_units, text_units, text_width, units_to_pt};

/// Line advance as a multiple of the font size.
const LINE_HEIGHT_FACTOR: f32 = 1.2;
/// Distance from the top of a line box to the baseline, in ems.
const ASCENT_EM: f32 = 0.8;
/// Images are placed at one pixel per point before scaling.
const IMAGE_DPI: f32 = 72.0;

/// Horizontal alignment of a text block within its width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
}

/// A PDF document under construction.
///
/// Coordinates handed to callers are measured from the top-left corner of the
/// page in points; conversion to PDF's bottom-left origin happens here.
pub struct DocumentStream {
    doc: PdfDocument,
    page_w_mm: f32,
    page_h_mm: f32,
    page_w_pt: f32,
    page_h_pt: f32,
    margin_pt: f32,
    /// Finished pages.
    pages: Vec<PdfPage>,
    /// Operations for the page currently being filled.
    ops: Vec<Op>,
    /// Distance from the top edge to the top of the next line.
    cursor_y: f32,
    /// Advance used by `move_down`, taken from the last text written.
    line_height: f32,
}

impl DocumentStream {
    /// Open a new document with one empty page.
    pub fn new(title: &str, config: &RenderConfig) -> Self {
        let (page_w_pt, page_h_pt) = config.paper_size.dimensions_pt();
        let (page_w_mm, page_h_mm) = config.paper_size.dimensions_mm();
        Self {
            doc: PdfDocument::new(title),
            page_w_mm,
            page_h_mm,
            page_w_pt,
            page_h_pt,
            margin_pt: config.margin_pt,
            pages: Vec::new(),
            ops: Vec::new(),
            cursor_y: config.margin_pt,
            line_height: config.body_font_size_pt * LINE_HEIGHT_FACTOR,
        }
    }

    /// Page width in points.
    pub fn page_width(&self) -> f32 {
        self.page_w_pt
    }

    /// Page height in points.
    pub fn page_height(&self) -> f32 {
        self.page_h_pt
    }

    /// Width between the left and right margins.
    pub fn content_width(&self) -> f32 {
        self.page_w_pt - 2.0 * self.margin_pt
    }

    /// Pages so far, including the one being filled.
    pub fn page_count(&self) -> usize {
        self.pages.len() + 1
    }

    /// Current cursor position, measured from the top edge.
    pub fn cursor_y(&self) -> f32 {
        self.cursor_y
    }

    /// Close the current page and start a fresh one.
    pub fn add_page(&mut self) {
        let ops = std::mem::take(&mut self.ops);
        self.pages
            .push(PdfPage::new(Mm(self.page_w_mm), Mm(self.page_h_mm), ops));
        self.cursor_y = self.margin_pt;
    }

    /// Start a new page if `height` more points would run past the bottom
    /// margin. A fresh page never breaks, so oversized items still land.
    fn ensure_room(&mut self, height: f32) {
        let at_top = self.cursor_y <= self.margin_pt;
        if !at_top && self.cursor_y + height > self.page_h_pt - self.margin_pt {
            self.add_page();
        }
    }

    /// Write a block of text starting at the cursor.
    ///
    /// Lines are word-wrapped to `width` points using Helvetica advance
    /// widths, broken across pages as needed, and aligned within a column
    /// that starts at the left margin.
    pub fn text(&mut self, text: &str, font_size: f32, width: f32, align: Align) {
        let line_height = font_size * LINE_HEIGHT_FACTOR;
        self.line_height = line_height;

        for line in wrap_text(text, width, font_size) {
            self.ensure_room(line_height);
            if !line.is_empty() {
                let x = match align {
                    Align::Left => self.margin_pt,
                    Align::Center => {
                        let slack = width - text_width(&line, font_size);
                        self.margin_pt + (slack / 2.0).max(0.0)
                    }
                };
                let baseline = self.page_h_pt - self.cursor_y - font_size * ASCENT_EM;
                self.push_line(line, x, baseline, font_size);
            }
            self.cursor_y += line_height;
        }
    }

    /// Write one or more lines centered between the margins.
    pub fn centered_text(&mut self, text: &str, font_size: f32) {
        let width = self.content_width();
        self.text(text, font_size, width, Align::Center);
    }

    /// Advance the cursor by one line of the most recent font size.
    pub fn move_down(&mut self) {
        self.cursor_y += self.line_height;
    }

    /// Place an image at the cursor using a precomputed fit.
    ///
    /// The fit box starts at the left margin and the current cursor; the
    /// cursor moves below the drawn image.
    pub fn place_image(&mut self, image: &RawImage, fit: &Fit) {
        self.ensure_room(fit.height);
        let id = self.doc.add_image(image);

        let left = self.margin_pt + fit.offset_x;
        let top = self.cursor_y + fit.offset_y;
        let bottom = self.page_h_pt - top - fit.height;

        self.ops.push(Op::UseXobject {
            id,
            transform: XObjectTransform {
                translate_x: Some(Pt(left)),
                translate_y: Some(Pt(bottom)),
                scale_x: Some(fit.scale),
                scale_y: Some(fit.scale),
                dpi: Some(IMAGE_DPI),
                rotate: None,
            },
        });

        debug!(left, bottom, width = fit.width, height = fit.height, "Image placed");
        self.cursor_y = top + fit.height;
    }

    fn push_line(&mut self, line: String, x: f32, baseline: f32, font_size: f32) {
        self.ops.push(Op::StartTextSection);
        self.ops.push(Op::SetTextCursor {
            pos: Point {
                x: Pt(x),
                y: Pt(baseline),
            },
        });
        self.ops.push(Op::SetFontSizeBuiltinFont {
            size: Pt(font_size),
            font: BuiltinFont::Helvetica,
        });
        self.ops.push(Op::WriteTextBuiltinFont {
            items: vec![TextItem::Text(line)],
            font: BuiltinFont::Helvetica,
        });
        self.ops.push(Op::EndTextSection);
    }

    /// Close the last page and serialise the whole document.
    #[instrument(skip(self), fields(pages = self.page_count()))]
    pub fn finish(mut self) -> Result<Vec<u8>, IntakeError> {
        let ops = std::mem::take(&mut self.ops);
        self.pages
            .push(PdfPage::new(Mm(self.page_w_mm), Mm(self.page_h_mm), ops));
        self.doc.with_pages(self.pages);

        let mut warnings: Vec<PdfWarnMsg> = Vec::new();
        let output = self.doc.save(&PdfSaveOptions::default(), &mut warnings);

        if !warnings.is_empty() {
            debug!(warnings = warnings.len(), "PDF serialised with warnings");
        }
        if output.is_empty() {
            return Err(IntakeError::Render(
                "PDF serialisation produced no bytes".into(),
            ));
        }

        debug!(bytes = output.len(), "Document finalised");
        Ok(output)
    }
}

// -- Text wrapping helper -----------------------------------------------------

fn fits(units: u32, max_width: f32, font_size: f32) -> bool {
    units_to_pt(units, font_size) <= max_width
}

/// Wrap a multi-line string so that no line is wider than `max_width` points
/// at `font_size`.
///
/// Splits on existing newlines first (dropping carriage returns), then performs
/// word-wrap within each paragraph. Words wider than the column are
/// force-broken on character boundaries; a single glyph wider than the column
/// still gets a line of its own. Empty paragraphs become empty lines.
pub(crate) fn wrap_text(text: &str, max_width: f32, font_size: f32) -> Vec<String> {
    let space = u32::from(char_units(' '));
    let mut result = Vec::new();

    for paragraph in text.split('\n') {
        let paragraph = paragraph.strip_suffix('\r').unwrap_or(paragraph);
        let mut current_line = String::new();
        let mut current_units = 0u32;

        for word in paragraph.split_whitespace() {
            let word_units = text_units(word);

            if !current_line.is_empty() {
                if fits(current_units + space + word_units, max_width, font_size) {
                    current_line.push(' ');
                    current_line.push_str(word);
                    current_units += space + word_units;
                    continue;
                }
                result.push(std::mem::take(&mut current_line));
                current_units = 0;
            }

            if fits(word_units, max_width, font_size) {
                current_line.push_str(word);
                current_units = word_units;
                continue;
            }

            for c in word.chars() {
                let c_units = u32::from(char_units(c));
                let overflows = !fits(current_units + c_units, max_width, font_size);
                if !current_line.is_empty() && overflows {
                    result.push(std::mem::take(&mut current_line));
                    current_units = 0;
                }
                current_line.push(c);
                current_units += c_units;
            }
        }

        result.push(current_line);
    }

    result
}
