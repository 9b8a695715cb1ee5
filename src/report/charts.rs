//! Vector charts drawn straight onto the page.
//!
//! Geometry lives in pure functions so it can be tested without a document;
//! the `draw_*` functions only turn that geometry into paths and text.

use std::f32::consts::PI;

use printpdf::path::PaintMode;
use printpdf::PdfLayerReference;

use super::fonts::ReportFonts;
use super::layout::{fill_rect, line, polygon, text, text_centered, text_width};
use super::theme::{self, Rgb8};
use crate::models::{FootScanData, RiskCategory, RiskScores};

// ═══════════════════════════════════════════════════════════
// Radar
// ═══════════════════════════════════════════════════════════

/// Risk bands shaded behind the radar, outermost first so inner ones paint over.
pub const RADAR_BANDS: [(f64, Rgb8); 3] = [
    (100.0, theme::HIGH_RISK),
    (70.0, theme::MED_RISK),
    (40.0, theme::LOW_RISK),
];

/// Axis `index` of `count`, starting at 12 o'clock and going clockwise.
pub fn radar_angle(index: usize, count: usize) -> f32 {
    PI / 2.0 - index as f32 * 2.0 * PI / count as f32
}

/// Point for `value` (0..=100) along the axis at `angle`.
pub fn radar_point(center: (f32, f32), radius: f32, angle: f32, value: f64) -> (f32, f32) {
    let r = radius * (value.clamp(0.0, 100.0) as f32) / 100.0;
    (center.0 + r * angle.cos(), center.1 + r * angle.sin())
}

pub fn radar_polygon(center: (f32, f32), radius: f32, values: &[f64]) -> Vec<(f32, f32)> {
    values
        .iter()
        .enumerate()
        .map(|(i, &v)| radar_point(center, radius, radar_angle(i, values.len()), v))
        .collect()
}

/// Second line under each radar axis label.
fn axis_caption(category: RiskCategory) -> &'static str {
    match category {
        RiskCategory::Degenerative => "(joints)",
        RiskCategory::Spinal => "(posture)",
        RiskCategory::Traumatic => "(injury risk)",
        RiskCategory::Comfort => "(footwear)",
        RiskCategory::Progression => "(deformity)",
    }
}

pub fn draw_radar(
    layer: &PdfLayerReference,
    fonts: &ReportFonts,
    scores: &RiskScores,
    center: (f32, f32),
    radius: f32,
) {
    let count = RiskCategory::ALL.len();

    text_centered(
        layer,
        &fonts.bold,
        12.0,
        center.0,
        center.1 + radius + 16.0,
        theme::PRIMARY_DARK,
        "Biomechanical risk profile",
    );

    for (level, color) in RADAR_BANDS {
        layer.set_fill_color(color.tint(0.12).color());
        polygon(layer, &radar_polygon(center, radius, &vec![level; count]), PaintMode::Fill);
    }

    // Grid rings and spokes
    for level in [25.0, 50.0, 75.0, 100.0] {
        let ring = radar_polygon(center, radius, &vec![level; count]);
        layer.set_outline_color(theme::BORDER.color());
        layer.set_outline_thickness(0.5);
        polygon(layer, &ring, PaintMode::Stroke);
    }
    for i in 0..count {
        let tip = radar_point(center, radius, radar_angle(i, count), 100.0);
        line(layer, center, tip, theme::BORDER, 0.5);
    }
    for level in [0.0_f64, 25.0, 50.0, 75.0, 100.0] {
        let (x, y) = radar_point(center, radius, PI / 2.0, level);
        text(layer, &fonts.regular, 6.0, x + 1.0, y, theme::TEXT_MUTED, &format!("{level:.0}"));
    }

    let values: Vec<f64> = scores.iter().map(|(_, s)| f64::from(s)).collect();
    let shape = radar_polygon(center, radius, &values);
    layer.set_fill_color(theme::PRIMARY.tint(0.15).color());
    layer.set_outline_color(theme::PRIMARY.color());
    layer.set_outline_thickness(2.0);
    polygon(layer, &shape, PaintMode::FillStroke);

    for (i, ((category, score), &(px, py))) in scores.iter().zip(shape.iter()).enumerate() {
        let angle = radar_angle(i, count);

        // Vertex marker
        fill_rect(layer, px - 0.9, py - 0.9, 1.8, 1.8, theme::WHITE);
        layer.set_outline_color(theme::PRIMARY.color());
        layer.set_outline_thickness(1.0);
        polygon(
            layer,
            &super::layout::rect_points(px - 0.9, py - 0.9, 1.8, 1.8),
            PaintMode::Stroke,
        );

        let (lx, ly) = radar_point(center, radius, angle, f64::from(score) + 8.0);
        text_centered(layer, &fonts.bold, 7.0, lx, ly - 1.0, theme::TEXT_DARK, &score.to_string());

        let label_r = radius + 9.0;
        let (ax, ay) = (center.0 + label_r * angle.cos(), center.1 + label_r * angle.sin());
        text_centered(layer, &fonts.regular, 8.0, ax, ay, theme::TEXT_DARK, category.label());
        text_centered(
            layer,
            &fonts.regular,
            7.0,
            ax,
            ay - 3.2,
            theme::TEXT_MUTED,
            axis_caption(category),
        );
    }
}

// ═══════════════════════════════════════════════════════════
// Left/right comparison bars
// ═══════════════════════════════════════════════════════════

pub const COMPARISON_LABELS: [(&str, &str); 5] = [
    ("Foot", "length, mm"),
    ("Foot", "width, mm"),
    ("Arch", "index (x100)"),
    ("Heel", "angle, deg"),
    ("Hallux", "angle, deg"),
];

/// Values plotted per foot, in [`COMPARISON_LABELS`] order.
pub fn comparison_values(data: &FootScanData) -> ([f64; 5], [f64; 5]) {
    let left = [
        data.foot_length.left,
        data.foot_width.left,
        data.arch_index.left * 100.0,
        f64::from(data.heel_angle.left),
        data.hallux_angle.left,
    ];
    let right = [
        data.foot_length.right,
        data.foot_width.right,
        data.arch_index.right * 100.0,
        f64::from(data.heel_angle.right),
        data.hallux_angle.right,
    ];
    (left, right)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bar {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub value: f64,
}

/// Top of the value axis: largest value plus 15% headroom for labels.
pub fn axis_max(left: &[f64], right: &[f64]) -> f64 {
    let max = left.iter().chain(right).copied().fold(0.0_f64, f64::max);
    if max <= 0.0 {
        1.0
    } else {
        max * 1.15
    }
}

/// Grouped bars inside the plot box `(x, y, width, height)`, `y` being the baseline.
/// Negative values draw as zero-height bars but keep their value for labelling.
pub fn bar_layout(
    left: &[f64],
    right: &[f64],
    x: f32,
    y: f32,
    width: f32,
    height: f32,
) -> (Vec<Bar>, Vec<Bar>) {
    let groups = left.len().max(right.len()).max(1);
    let slot = width / groups as f32;
    let bar_width = slot * 0.35;
    let top = axis_max(left, right);

    let bars = |values: &[f64], offset: f32| -> Vec<Bar> {
        values
            .iter()
            .enumerate()
            .map(|(i, &value)| {
                let center = x + slot * (i as f32 + 0.5);
                Bar {
                    x: center + offset,
                    y,
                    width: bar_width,
                    height: (value.max(0.0) / top) as f32 * height,
                    value,
                }
            })
            .collect()
    };

    (bars(left, -bar_width), bars(right, 0.0))
}

pub fn draw_comparison(
    layer: &PdfLayerReference,
    fonts: &ReportFonts,
    data: &FootScanData,
    origin: (f32, f32),
    width: f32,
    height: f32,
) {
    let (x, y) = origin;
    let (left, right) = comparison_values(data);
    let (left_bars, right_bars) = bar_layout(&left, &right, x, y, width, height);
    let top = axis_max(&left, &right);

    text_centered(
        layer,
        &fonts.bold,
        12.0,
        x + width / 2.0,
        y + height + 8.0,
        theme::PRIMARY_DARK,
        "Left vs right foot",
    );

    for step in 1..=4 {
        let gy = y + height * step as f32 / 4.0;
        line(layer, (x, gy), (x + width, gy), theme::BORDER, 0.3);
        let label = format!("{:.0}", top * f64::from(step) / 4.0);
        text(
            layer,
            &fonts.regular,
            6.0,
            x - text_width(&label, 6.0) - 1.5,
            gy - 1.0,
            theme::TEXT_MUTED,
            &label,
        );
    }
    line(layer, (x, y), (x + width, y), theme::TEXT_MUTED, 0.8);

    for (bars, color) in [(&left_bars, theme::PRIMARY), (&right_bars, theme::SECONDARY)] {
        for bar in bars.iter() {
            if bar.height > 0.0 {
                fill_rect(layer, bar.x, bar.y, bar.width, bar.height, color.tint(0.85));
            }
            text_centered(
                layer,
                &fonts.bold,
                6.5,
                bar.x + bar.width / 2.0,
                bar.y + bar.height + 1.2,
                theme::TEXT_DARK,
                &format!("{:.1}", bar.value),
            );
        }
    }

    let slot = width / COMPARISON_LABELS.len() as f32;
    for (i, (first, second)) in COMPARISON_LABELS.iter().enumerate() {
        let cx = x + slot * (i as f32 + 0.5);
        text_centered(layer, &fonts.regular, 8.0, cx, y - 4.5, theme::TEXT_DARK, first);
        text_centered(layer, &fonts.regular, 8.0, cx, y - 8.0, theme::TEXT_DARK, second);
    }

    // Legend, top right
    let lx = x + width - 30.0;
    let ly = y + height - 2.0;
    for (row, (label, color)) in [("Left foot", theme::PRIMARY), ("Right foot", theme::SECONDARY)]
        .into_iter()
        .enumerate()
    {
        let ry = ly - row as f32 * 4.5;
        fill_rect(layer, lx, ry, 3.0, 3.0, color);
        text(layer, &fonts.regular, 8.0, lx + 4.5, ry + 0.4, theme::TEXT_DARK, label);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Bilateral;

    fn close(a: (f32, f32), b: (f32, f32)) -> bool {
        (a.0 - b.0).abs() < 1e-4 && (a.1 - b.1).abs() < 1e-4
    }

    #[test]
    fn first_axis_points_up_then_clockwise() {
        let top = radar_point((0.0, 0.0), 10.0, radar_angle(0, 4), 100.0);
        assert!(close(top, (0.0, 10.0)));
        let right = radar_point((0.0, 0.0), 10.0, radar_angle(1, 4), 100.0);
        assert!(close(right, (10.0, 0.0)));
    }

    #[test]
    fn radar_values_scale_and_clamp() {
        let half = radar_point((5.0, 5.0), 20.0, PI / 2.0, 50.0);
        assert!(close(half, (5.0, 15.0)));
        let over = radar_point((0.0, 0.0), 20.0, PI / 2.0, 140.0);
        assert!(close(over, (0.0, 20.0)));
        let under = radar_point((0.0, 0.0), 20.0, PI / 2.0, -10.0);
        assert!(close(under, (0.0, 0.0)));
    }

    #[test]
    fn radar_polygon_has_one_vertex_per_score() {
        let values: Vec<f64> = RiskScores::default().iter().map(|(_, s)| f64::from(s)).collect();
        let shape = radar_polygon((100.0, 100.0), 50.0, &values);
        assert_eq!(shape.len(), 5);
        // Baseline 20 puts every vertex 10 mm from the centre
        for (x, y) in shape {
            let d = ((x - 100.0).powi(2) + (y - 100.0).powi(2)).sqrt();
            assert!((d - 10.0).abs() < 1e-3);
        }
    }

    #[test]
    fn bands_paint_outermost_first() {
        let levels: Vec<f64> = RADAR_BANDS.iter().map(|(l, _)| *l).collect();
        assert_eq!(levels, vec![100.0, 70.0, 40.0]);
    }

    #[test]
    fn comparison_scales_arch_index() {
        let data = FootScanData {
            arch_index: Bilateral::new(0.27, 0.31),
            heel_angle: Bilateral::new(-3, 5),
            ..Default::default()
        };
        let (left, right) = comparison_values(&data);
        assert!((left[2] - 27.0).abs() < 1e-9);
        assert!((right[2] - 31.0).abs() < 1e-9);
        assert_eq!(left[3], -3.0);
    }

    #[test]
    fn bars_are_proportional_and_grouped() {
        let (l, r) = bar_layout(&[100.0, 50.0], &[50.0, 0.0], 0.0, 10.0, 100.0, 115.0);
        // axis max = 115, so 100 -> 100 mm
        assert!((l[0].height - 100.0).abs() < 1e-3);
        assert!((l[1].height - 50.0).abs() < 1e-3);
        assert_eq!(r[1].height, 0.0);
        // left bar sits just left of the slot centre, right bar just right
        assert!((l[0].x + l[0].width - 25.0).abs() < 1e-4);
        assert!((r[0].x - 25.0).abs() < 1e-4);
        assert!(l.iter().chain(&r).all(|b| b.y == 10.0));
    }

    #[test]
    fn negative_and_empty_values_stay_finite() {
        let (l, _) = bar_layout(&[-4.0], &[0.0], 0.0, 0.0, 50.0, 50.0);
        assert_eq!(l[0].height, 0.0);
        assert_eq!(l[0].value, -4.0);
        assert_eq!(axis_max(&[0.0], &[-1.0]), 1.0);
    }
}
