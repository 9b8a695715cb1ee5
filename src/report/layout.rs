//! A4 page flow and drawing primitives over a printpdf layer.
//!
//! Coordinates are millimetres from the bottom-left corner, as printpdf uses.
//! [`PageCursor`] tracks the current baseline `y` and starts a new page when
//! content would run into the bottom margin.

use printpdf::path::{PaintMode, WindingOrder};
use printpdf::{
    IndirectFontRef, Line, Mm, PdfDocumentReference, PdfLayerIndex, PdfLayerReference,
    PdfPageIndex, Point, Polygon,
};

use super::theme::Rgb8;

pub const PAGE_WIDTH: f32 = 210.0;
pub const PAGE_HEIGHT: f32 = 297.0;
pub const MARGIN: f32 = 15.0;
pub const CONTENT_WIDTH: f32 = PAGE_WIDTH - 2.0 * MARGIN;

const PT_TO_MM: f32 = 0.352_778;
/// Average glyph advance as a fraction of the font size. Good enough for
/// centring and wrapping with Helvetica-like faces.
const AVG_GLYPH_EM: f32 = 0.5;

/// Approximate rendered width of `text` in mm.
pub fn text_width(text: &str, size_pt: f32) -> f32 {
    text.chars().count() as f32 * size_pt * AVG_GLYPH_EM * PT_TO_MM
}

/// How many characters fit on one line of `width_mm`.
pub fn chars_per_line(width_mm: f32, size_pt: f32) -> usize {
    (width_mm / (size_pt * AVG_GLYPH_EM * PT_TO_MM)).floor().max(1.0) as usize
}

/// Line height for body text at `size_pt`.
pub fn line_height(size_pt: f32) -> f32 {
    size_pt * PT_TO_MM * 1.4
}

/// Simple word-wrap helper for PDF text rendering.
pub fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let current_len = current.chars().count();
        if current_len + word.chars().count() + 1 > max_chars && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

/// Whether a block of `needed` mm starting at `y` would cross the bottom margin.
pub fn needs_break(y: f32, needed: f32) -> bool {
    y - needed < MARGIN
}

fn pt(x: f32, y: f32) -> (Point, bool) {
    (Point::new(Mm(x), Mm(y)), false)
}

/// Closed polygon through `points`.
pub fn polygon(layer: &PdfLayerReference, points: &[(f32, f32)], mode: PaintMode) {
    layer.add_polygon(Polygon {
        rings: vec![points.iter().map(|&(x, y)| pt(x, y)).collect()],
        mode,
        winding_order: WindingOrder::NonZero,
    });
}

/// Open stroked path.
pub fn polyline(layer: &PdfLayerReference, points: &[(f32, f32)]) {
    layer.add_line(Line {
        points: points.iter().map(|&(x, y)| pt(x, y)).collect(),
        is_closed: false,
    });
}

pub fn line(layer: &PdfLayerReference, from: (f32, f32), to: (f32, f32), color: Rgb8, width_pt: f32) {
    layer.set_outline_color(color.color());
    layer.set_outline_thickness(width_pt);
    polyline(layer, &[from, to]);
}

/// Filled rectangle with its bottom-left corner at `(x, y)`.
pub fn fill_rect(layer: &PdfLayerReference, x: f32, y: f32, w: f32, h: f32, color: Rgb8) {
    layer.set_fill_color(color.color());
    polygon(layer, &rect_points(x, y, w, h), PaintMode::Fill);
}

/// Stroked rectangle outline.
pub fn stroke_rect(
    layer: &PdfLayerReference,
    x: f32,
    y: f32,
    w: f32,
    h: f32,
    color: Rgb8,
    width_pt: f32,
) {
    layer.set_outline_color(color.color());
    layer.set_outline_thickness(width_pt);
    layer.add_line(Line {
        points: rect_points(x, y, w, h).iter().map(|&(x, y)| pt(x, y)).collect(),
        is_closed: true,
    });
}

pub fn rect_points(x: f32, y: f32, w: f32, h: f32) -> [(f32, f32); 4] {
    [(x, y), (x + w, y), (x + w, y + h), (x, y + h)]
}

pub fn text(
    layer: &PdfLayerReference,
    font: &IndirectFontRef,
    size_pt: f32,
    x: f32,
    y: f32,
    color: Rgb8,
    content: &str,
) {
    layer.set_fill_color(color.color());
    layer.use_text(content, size_pt, Mm(x), Mm(y), font);
}

/// Text centred on `center_x`.
pub fn text_centered(
    layer: &PdfLayerReference,
    font: &IndirectFontRef,
    size_pt: f32,
    center_x: f32,
    y: f32,
    color: Rgb8,
    content: &str,
) {
    let x = center_x - text_width(content, size_pt) / 2.0;
    text(layer, font, size_pt, x, y, color, content);
}

/// Vertical flow over A4 pages.
pub struct PageCursor<'a> {
    doc: &'a PdfDocumentReference,
    layer: PdfLayerReference,
    y: f32,
    pages: usize,
}

impl<'a> PageCursor<'a> {
    pub fn new(doc: &'a PdfDocumentReference, page: PdfPageIndex, layer: PdfLayerIndex) -> Self {
        Self {
            doc,
            layer: doc.get_page(page).get_layer(layer),
            y: PAGE_HEIGHT - MARGIN,
            pages: 1,
        }
    }

    pub fn layer(&self) -> &PdfLayerReference {
        &self.layer
    }

    pub fn y(&self) -> f32 {
        self.y
    }

    pub fn page_count(&self) -> usize {
        self.pages
    }

    pub fn advance(&mut self, mm: f32) {
        self.y -= mm;
    }

    /// Start a new page unless `needed` mm still fit on this one.
    pub fn ensure_space(&mut self, needed: f32) {
        if needs_break(self.y, needed) {
            self.new_page();
        }
    }

    pub fn new_page(&mut self) {
        self.pages += 1;
        let (page, layer) = self.doc.add_page(
            Mm(PAGE_WIDTH),
            Mm(PAGE_HEIGHT),
            format!("Page {}", self.pages),
        );
        self.layer = self.doc.get_page(page).get_layer(layer);
        self.y = PAGE_HEIGHT - MARGIN;
    }

    /// Wrapped paragraph at `x`, `width` mm wide. Breaks pages between lines.
    pub fn paragraph(
        &mut self,
        font: &IndirectFontRef,
        size_pt: f32,
        x: f32,
        width: f32,
        color: Rgb8,
        content: &str,
    ) {
        let step = line_height(size_pt);
        for row in wrap_text(content, chars_per_line(width, size_pt)) {
            self.ensure_space(step);
            self.advance(step);
            text(&self.layer, font, size_pt, x, self.y, color, &row);
        }
    }
}
