use printpdf::path::PaintMode;
use printpdf::PdfLayerReference;

use super::fonts::ReportFonts;
use super::layout::{line, polygon, text_centered};
use super::theme::{LIGHT_BLUE, PRIMARY};

/// Foot outline on a 200x200 design grid, y pointing down.
const FOOT_OUTLINE: [(f32, f32); 7] = [
    (60.0, 100.0),
    (90.0, 50.0),
    (120.0, 30.0),
    (150.0, 40.0),
    (160.0, 80.0),
    (140.0, 120.0),
    (100.0, 130.0),
];
const GRID: f32 = 200.0;

/// Foot outline scaled into a `size` mm square whose top-left corner is `(left, top)`.
pub fn foot_outline(left: f32, top: f32, size: f32) -> Vec<(f32, f32)> {
    let scale = size / GRID;
    FOOT_OUTLINE
        .iter()
        .map(|&(x, y)| (left + x * scale, top - y * scale))
        .collect()
}

/// Foot mark with the wordmark under it, centred on `center_x`.
pub fn draw_logo(layer: &PdfLayerReference, fonts: &ReportFonts, center_x: f32, top: f32, size: f32) {
    let left = center_x - size / 2.0;
    let scale = size / GRID;

    layer.set_fill_color(LIGHT_BLUE.color());
    layer.set_outline_color(PRIMARY.color());
    layer.set_outline_thickness(2.0);
    polygon(layer, &foot_outline(left, top, size), PaintMode::FillStroke);

    // 36 grid units of cap height, converted to points
    let word_size = 36.0 * scale / 0.352_778;
    text_centered(layer, &fonts.bold, word_size, center_x, top - 175.0 * scale, PRIMARY, "FootScan");
    text_centered(layer, &fonts.bold, word_size, center_x, top - 215.0 * scale, PRIMARY, "Analytics");

    let underline_y = top - 230.0 * scale;
    line(
        layer,
        (center_x - 50.0 * scale, underline_y),
        (center_x + 50.0 * scale, underline_y),
        PRIMARY,
        1.0,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outline_fits_the_box() {
        let points = foot_outline(10.0, 100.0, 40.0);
        assert_eq!(points.len(), 7);
        for (x, y) in &points {
            assert!((10.0..=50.0).contains(x));
            assert!((60.0..=100.0).contains(y));
        }
        // First grid point (60, 100) at scale 0.2
        let (x, y) = points[0];
        assert!((x - 22.0).abs() < 1e-4);
        assert!((y - 80.0).abs() < 1e-4);
    }

    #[test]
    fn outline_flips_y_axis() {
        let points = foot_outline(0.0, 200.0, 200.0);
        // (120, 30) is the top of the foot on the grid, so highest on the page
        let highest = points.iter().cloned().fold(f32::MIN, |m, (_, y)| m.max(y));
        assert_eq!(highest, 170.0);
    }
}
