//! Report sections, drawn top to bottom through a [`PageCursor`].

use printpdf::IndirectFontRef;

use super::charts::{draw_comparison, draw_radar};
use super::fonts::ReportFonts;
use super::layout::{
    chars_per_line, fill_rect, line, line_height, stroke_rect, text, text_centered, text_width,
    wrap_text, PageCursor, CONTENT_WIDTH, MARGIN, PAGE_WIDTH,
};
use super::logo::draw_logo;
use super::theme::{self, NormRange, Rgb8};
use super::ReportContext;
use crate::config::{APP_NAME, APP_TAGLINE};
use crate::models::RiskLevel;
use crate::pipeline::risk::{LENGTH_ASYMMETRY_MM, WIDTH_ASYMMETRY_MM};

const CENTER_X: f32 = PAGE_WIDTH / 2.0;
const BODY_PT: f32 = 10.0;
const BOX_PAD: f32 = 4.0;

// ═══════════════════════════════════════════════════════════
// Building blocks
// ═══════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Align {
    Left,
    Center,
}

/// One table cell: a main line plus an optional smaller muted line.
#[derive(Debug, Clone)]
struct Cell {
    text: String,
    detail: Option<String>,
    color: Rgb8,
    bold: bool,
    fill: Option<Rgb8>,
    align: Align,
}

impl Cell {
    fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            detail: None,
            color: theme::TEXT_DARK,
            bold: false,
            fill: None,
            align: Align::Center,
        }
    }

    fn left(mut self) -> Self {
        self.align = Align::Left;
        self
    }

    fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    fn color(mut self, color: Rgb8) -> Self {
        self.color = color;
        self
    }

    fn fill(mut self, fill: Option<Rgb8>) -> Self {
        self.fill = fill;
        self
    }

    fn detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

struct Table<'a> {
    widths: &'a [f32],
    header: Option<&'a [&'a str]>,
    rows: Vec<Vec<Cell>>,
    row_height: f32,
    /// Alternate white / light grey rows.
    striped: bool,
}

impl Table<'_> {
    fn total_width(&self) -> f32 {
        self.widths.iter().sum()
    }

    /// Draw centred on the page starting at the cursor, one page break allowed per row.
    fn draw(&self, cursor: &mut PageCursor<'_>, fonts: &ReportFonts) {
        let x0 = CENTER_X - self.total_width() / 2.0;

        if let Some(header) = self.header {
            let h = 8.0;
            cursor.ensure_space(h);
            let top = cursor.y();
            fill_rect(cursor.layer(), x0, top - h, self.total_width(), h, theme::PRIMARY_DARK);
            let mut x = x0;
            for (title, w) in header.iter().zip(self.widths) {
                text_centered(cursor.layer(), &fonts.bold, 9.0, x + w / 2.0, top - 5.4, theme::WHITE, title);
                x += w;
            }
            cursor.advance(h);
        }

        for (i, row) in self.rows.iter().enumerate() {
            let h = self.row_height;
            cursor.ensure_space(h);
            let top = cursor.y();
            let stripe = if self.striped && i % 2 == 1 {
                theme::BG_LIGHT
            } else {
                theme::WHITE
            };

            let mut x = x0;
            for (cell, &w) in row.iter().zip(self.widths) {
                fill_rect(cursor.layer(), x, top - h, w, h, cell.fill.unwrap_or(stripe));
                stroke_rect(cursor.layer(), x, top - h, w, h, theme::BORDER, 0.5);
                draw_cell(cursor, fonts, cell, x, w, top, h);
                x += w;
            }
            cursor.advance(h);
        }
    }
}

fn draw_cell(cursor: &PageCursor<'_>, fonts: &ReportFonts, cell: &Cell, x: f32, w: f32, top: f32, h: f32) {
    let font = if cell.bold { &fonts.bold } else { &fonts.regular };
    let size = 9.0;
    let baseline = match cell.detail {
        Some(_) => top - h / 2.0 + 0.2,
        None => top - h / 2.0 - 1.2,
    };
    match cell.align {
        Align::Center => text_centered(cursor.layer(), font, size, x + w / 2.0, baseline, cell.color, &cell.text),
        Align::Left => text(cursor.layer(), font, size, x + 2.5, baseline, cell.color, &cell.text),
    }
    if let Some(detail) = &cell.detail {
        text(cursor.layer(), &fonts.regular, 7.0, x + 2.5, baseline - 3.4, theme::TEXT_MUTED, detail);
    }
}

fn section_title(cursor: &mut PageCursor<'_>, fonts: &ReportFonts, title: &str) {
    cursor.ensure_space(16.0);
    cursor.advance(8.0);
    text(cursor.layer(), &fonts.bold, 14.0, MARGIN, cursor.y(), theme::PRIMARY_DARK, title);
    cursor.advance(2.5);
    line(
        cursor.layer(),
        (MARGIN, cursor.y()),
        (MARGIN + CONTENT_WIDTH, cursor.y()),
        theme::PRIMARY,
        1.0,
    );
    cursor.advance(4.0);
}

/// Light blue box around wrapped lines. Bold lines use the bold face.
fn boxed_text(cursor: &mut PageCursor<'_>, fonts: &ReportFonts, lines: &[(String, bool)], size: f32) {
    let inner_width = CONTENT_WIDTH - 2.0 * BOX_PAD;
    let per_line = chars_per_line(inner_width, size);
    let rows: Vec<(String, bool)> = lines
        .iter()
        .flat_map(|(content, bold)| wrap_text(content, per_line).into_iter().map(move |r| (r, *bold)))
        .collect();
    let step = line_height(size);
    let height = rows.len() as f32 * step + 2.0 * BOX_PAD;

    cursor.ensure_space(height);
    let top = cursor.y();
    fill_rect(cursor.layer(), MARGIN, top - height, CONTENT_WIDTH, height, theme::LIGHT_BLUE);
    stroke_rect(cursor.layer(), MARGIN, top - height, CONTENT_WIDTH, height, theme::PRIMARY, 1.0);

    let mut y = top - BOX_PAD;
    for (row, bold) in &rows {
        y -= step;
        let font: &IndirectFontRef = if *bold { &fonts.bold } else { &fonts.regular };
        text(cursor.layer(), font, size, MARGIN + BOX_PAD, y + 1.0, theme::TEXT_DARK, row);
    }
    cursor.advance(height);
}

// ═══════════════════════════════════════════════════════════
// Title page
// ═══════════════════════════════════════════════════════════

pub fn title_page(cursor: &mut PageCursor<'_>, fonts: &ReportFonts, ctx: &ReportContext<'_>) {
    let data = ctx.data;
    let logo_size = 40.0;
    draw_logo(cursor.layer(), fonts, CENTER_X, cursor.y(), logo_size);
    cursor.advance(logo_size * 1.2 + 8.0);

    text_centered(cursor.layer(), &fonts.bold, 24.0, CENTER_X, cursor.y(), theme::PRIMARY_DARK, APP_NAME);
    cursor.advance(7.0);
    text_centered(cursor.layer(), &fonts.regular, 11.0, CENTER_X, cursor.y(), theme::TEXT_MUTED, APP_TAGLINE);
    cursor.advance(20.0);

    text_centered(cursor.layer(), &fonts.bold, 18.0, CENTER_X, cursor.y(), theme::PRIMARY, "PERSONALISED REPORT");
    cursor.advance(7.0);
    text_centered(
        cursor.layer(),
        &fonts.regular,
        11.0,
        CENTER_X,
        cursor.y(),
        theme::TEXT_DARK,
        "Biomechanical foot analysis",
    );
    cursor.advance(15.0);

    let patient_rows = [
        ("Patient", data.client_name.clone()),
        ("Gender", data.gender_label().to_string()),
        ("Examination date", data.scan_date.clone()),
        ("Report ID", ctx.report_id()),
        ("Scanner", data.scanner_id.clone()),
    ];
    let widths: [f32; 2] = [40.0, 90.0];
    let table_top = cursor.y();
    let table = Table {
        widths: &widths,
        header: None,
        rows: patient_rows
            .into_iter()
            .map(|(label, value)| {
                vec![
                    Cell::new(label).left().bold().fill(Some(theme::LIGHT_BLUE)),
                    Cell::new(value).left(),
                ]
            })
            .collect(),
        row_height: 9.0,
        striped: false,
    };
    table.draw(cursor, fonts);
    let x0 = CENTER_X - table.total_width() / 2.0;
    stroke_rect(
        cursor.layer(),
        x0,
        cursor.y(),
        table.total_width(),
        table_top - cursor.y(),
        theme::PRIMARY,
        1.0,
    );
    cursor.advance(18.0);

    boxed_text(
        cursor,
        fonts,
        &[
            ("This report contains:".to_string(), true),
            ("- A detailed analysis of your foot biomechanics".to_string(), false),
            ("- An assessment of your individual health risks".to_string(), false),
            ("- Personalised footwear recommendations".to_string(), false),
            ("- Advice on keeping your feet healthy and preventing problems".to_string(), false),
        ],
        BODY_PT,
    );
    cursor.advance(20.0);

    text_centered(
        cursor.layer(),
        &fonts.bold,
        9.0,
        CENTER_X,
        cursor.y(),
        theme::TEXT_MUTED,
        "CONFIDENTIAL MEDICAL DOCUMENT",
    );
    cursor.advance(4.5);
    text_centered(
        cursor.layer(),
        &fonts.regular,
        9.0,
        CENTER_X,
        cursor.y(),
        theme::TEXT_MUTED,
        "Intended only for the patient and their doctor",
    );
}

// ═══════════════════════════════════════════════════════════
// Risk analysis
// ═══════════════════════════════════════════════════════════

/// Score scale legend row: coloured range, then its meaning.
fn scale_row(cursor: &mut PageCursor<'_>, fonts: &ReportFonts, range: &str, meaning: &str, color: Rgb8) {
    let step = line_height(BODY_PT);
    cursor.ensure_space(step);
    cursor.advance(step);
    let x = MARGIN + 4.0;
    text(cursor.layer(), &fonts.regular, BODY_PT, x, cursor.y(), theme::TEXT_DARK, "-");
    text(cursor.layer(), &fonts.bold, BODY_PT, x + 4.0, cursor.y(), color, range);
    let after = x + 4.0 + text_width(range, BODY_PT) + 2.0;
    text(cursor.layer(), &fonts.regular, BODY_PT, after, cursor.y(), theme::TEXT_DARK, meaning);
}

pub fn risk_page(cursor: &mut PageCursor<'_>, fonts: &ReportFonts, ctx: &ReportContext<'_>) {
    let scores = &ctx.assessment.scores;

    section_title(cursor, fonts, "1. BIOMECHANICAL RISK ANALYSIS");
    cursor.paragraph(
        &fonts.regular,
        BODY_PT,
        MARGIN,
        CONTENT_WIDTH,
        theme::TEXT_DARK,
        "Based on the analysis of your foot parameters, the system has built your individual \
         risk profile. Each risk is scored from 0 to 100 points, where:",
    );
    scale_row(cursor, fonts, "0-49", "low risk", theme::LOW_RISK);
    scale_row(cursor, fonts, "50-69", "moderate risk", theme::MED_RISK);
    scale_row(cursor, fonts, "70-100", "high risk", theme::HIGH_RISK);
    cursor.advance(2.0);
    cursor.paragraph(
        &fonts.regular,
        BODY_PT,
        MARGIN,
        CONTENT_WIDTH,
        theme::TEXT_DARK,
        "Pay particular attention to categories scoring above 50 points.",
    );

    let radius = 42.0;
    let block = 2.0 * radius + 40.0;
    cursor.ensure_space(block);
    let center = (CENTER_X, cursor.y() - 24.0 - radius);
    draw_radar(cursor.layer(), fonts, scores, center, radius);
    cursor.advance(block);

    let widths: [f32; 3] = [80.0, 35.0, 40.0];
    let header = ["Risk category", "Score", "Level"];
    let rows = scores
        .iter()
        .map(|(category, score)| {
            let level = scores.level(category);
            let color = theme::level_color(level);
            vec![
                Cell::new(format!("{} risk", category.label()))
                    .left()
                    .bold()
                    .detail(category.description()),
                Cell::new(format!("{score}/100")).bold().color(color),
                Cell::new(level.label()).bold().color(color),
            ]
        })
        .collect();
    Table {
        widths: &widths,
        header: Some(&header[..]),
        rows,
        row_height: 11.0,
        striped: true,
    }
    .draw(cursor, fonts);
    cursor.advance(8.0);

    let total = ctx.assessment.total_risk();
    let overall = RiskLevel::from_score(total);
    overall_box(cursor, fonts, overall, total);
}

fn overall_box(cursor: &mut PageCursor<'_>, fonts: &ReportFonts, level: RiskLevel, total: f64) {
    let height = 16.0;
    cursor.ensure_space(height);
    let top = cursor.y();
    fill_rect(cursor.layer(), MARGIN, top - height, CONTENT_WIDTH, height, theme::LIGHT_BLUE);
    stroke_rect(cursor.layer(), MARGIN, top - height, CONTENT_WIDTH, height, theme::PRIMARY, 1.0);

    let x = MARGIN + BOX_PAD;
    let y = top - 6.5;
    let lead = "Overall assessment:";
    text(cursor.layer(), &fonts.bold, 11.0, x, y, theme::TEXT_DARK, lead);
    let mut after = x + text_width(lead, 11.0) + 2.0;
    text(cursor.layer(), &fonts.bold, 11.0, after, y, theme::level_color(level), level.label());
    after += text_width(level.label(), 11.0) + 2.0;
    text(cursor.layer(), &fonts.regular, 11.0, after, y, theme::TEXT_DARK, &format!("({total:.1}/100)"));
    text(
        cursor.layer(),
        &fonts.regular,
        9.0,
        x,
        y - 5.0,
        theme::TEXT_MUTED,
        "Based on the analysis of all foot parameters",
    );
    cursor.advance(height);
}

// ═══════════════════════════════════════════════════════════
// Detailed analysis
// ═══════════════════════════════════════════════════════════

/// Highlight for a measured value outside its reference range.
/// Magnitude only: heel angles are signed.
fn norm_fill(norm: &NormRange, value: f64) -> Option<Rgb8> {
    norm.is_outside(value.abs()).then_some(theme::WARNING_CELL)
}

fn measured_row(label: &str, left: f64, right: f64, decimals: usize, norm: &NormRange) -> Vec<Cell> {
    vec![
        Cell::new(label).left(),
        Cell::new(format!("{left:.decimals$}")).fill(norm_fill(norm, left)),
        Cell::new(format!("{right:.decimals$}")).fill(norm_fill(norm, right)),
        Cell::new(norm.label),
    ]
}

pub fn detail_page(cursor: &mut PageCursor<'_>, fonts: &ReportFonts, ctx: &ReportContext<'_>) {
    let data = ctx.data;
    section_title(cursor, fonts, "2. DETAILED BIOMECHANICAL ANALYSIS");

    let (chart_w, chart_h) = (150.0, 65.0);
    let block = chart_h + 26.0;
    cursor.ensure_space(block);
    let origin = (CENTER_X - chart_w / 2.0, cursor.y() - 14.0 - chart_h);
    draw_comparison(cursor.layer(), fonts, data, origin, chart_w, chart_h);
    cursor.advance(block);

    cursor.ensure_space(10.0);
    cursor.advance(6.0);
    text(cursor.layer(), &fonts.bold, 11.0, MARGIN, cursor.y(), theme::PRIMARY_DARK, "Measured foot parameters:");
    cursor.advance(3.0);

    let heel = data.heel_angle.map(f64::from);
    let mut rows = vec![
        measured_row("Foot length (mm)", data.foot_length.left, data.foot_length.right, 1, &theme::LENGTH_NORM),
        measured_row("Foot width (mm)", data.foot_width.left, data.foot_width.right, 1, &theme::WIDTH_NORM),
        measured_row("Ball girth (mm)", data.ball_girth.left, data.ball_girth.right, 1, &theme::GIRTH_NORM),
        measured_row("Arch index", data.arch_index.left, data.arch_index.right, 3, &theme::ARCH_NORM),
        measured_row("Heel angle (deg)", heel.left, heel.right, 0, &theme::HEEL_NORM),
        measured_row("Hallux angle (deg)", data.hallux_angle.left, data.hallux_angle.right, 1, &theme::HALLUX_NORM),
    ];
    rows.push(vec![
        Cell::new("Shoe size (EU)").left(),
        Cell::new(format!("{:.1}", data.shoe_size.left)),
        Cell::new(format!("{:.1}", data.shoe_size.right)),
        Cell::new("By measurement"),
    ]);
    rows.push(vec![
        Cell::new("Toe type").left(),
        Cell::new(data.toe_type_label()),
        Cell::new(data.toe_type_label()),
        Cell::new("-"),
    ]);

    let widths: [f32; 4] = [45.0, 32.0, 32.0, 32.0];
    let header = ["Parameter", "Left foot", "Right foot", "Norm"];
    Table {
        widths: &widths,
        header: Some(&header[..]),
        rows,
        row_height: 7.5,
        striped: true,
    }
    .draw(cursor, fonts);
    cursor.advance(8.0);

    let verdict = |diff: f64, limit: f64| if diff <= limit { "normal" } else { "needs attention" };
    let length_diff = ctx.assessment.length_diff;
    let width_diff = ctx.assessment.width_diff;
    boxed_text(
        cursor,
        fonts,
        &[
            ("Asymmetry analysis:".to_string(), true),
            (
                format!(
                    "- Length difference: {length_diff:.1} mm ({})",
                    verdict(length_diff, LENGTH_ASYMMETRY_MM)
                ),
                false,
            ),
            (
                format!(
                    "- Width difference: {width_diff:.1} mm ({})",
                    verdict(width_diff, WIDTH_ASYMMETRY_MM)
                ),
                false,
            ),
            (format!("- Toe type: {}", data.toe_type_label()), false),
            (format!("- Recommended shoe width: {}", data.shoe_width_label()), false),
        ],
        BODY_PT,
    );
    cursor.advance(8.0);
}

// ═══════════════════════════════════════════════════════════
// Recommendations, conclusion, footer
// ═══════════════════════════════════════════════════════════

pub fn recommendations(cursor: &mut PageCursor<'_>, fonts: &ReportFonts, ctx: &ReportContext<'_>) {
    section_title(cursor, fonts, "3. PERSONALISED RECOMMENDATIONS");
    cursor.paragraph(
        &fonts.regular,
        BODY_PT,
        MARGIN,
        CONTENT_WIDTH,
        theme::TEXT_DARK,
        "Based on the analysis of your data, the following recommendations have been prepared:",
    );
    cursor.advance(3.0);

    let indent = 4.0;
    for rec in &ctx.assessment.recommendations {
        // Keep a title together with at least two lines of its description.
        cursor.ensure_space(6.0 + 3.0 * line_height(BODY_PT));
        cursor.advance(6.0);
        let color = theme::priority_color(rec.priority);
        text(cursor.layer(), &fonts.bold, 11.0, MARGIN, cursor.y(), color, &rec.title);
        let tag = format!("[{}]", rec.priority.label());
        let tag_x = MARGIN + text_width(&rec.title, 11.0) + 3.0;
        text(cursor.layer(), &fonts.regular, 8.0, tag_x, cursor.y(), theme::TEXT_MUTED, &tag);

        cursor.paragraph(
            &fonts.regular,
            BODY_PT,
            MARGIN + indent,
            CONTENT_WIDTH - indent,
            theme::TEXT_DARK,
            &rec.description,
        );
    }
    cursor.advance(10.0);
}

pub fn conclusion(cursor: &mut PageCursor<'_>, fonts: &ReportFonts, ctx: &ReportContext<'_>) {
    boxed_text(
        cursor,
        fonts,
        &[(
            format!(
                "Important: these recommendations are based on the examination of {}. If pain, \
                 discomfort or changes in your gait appear, be sure to see an orthopaedist.",
                ctx.data.scan_date
            ),
            false,
        )],
        BODY_PT,
    );
    cursor.advance(10.0);
}

pub fn footer(cursor: &mut PageCursor<'_>, fonts: &ReportFonts, ctx: &ReportContext<'_>) {
    let lines = [
        (APP_NAME.to_string(), &fonts.bold, 9.0),
        (APP_TAGLINE.to_string(), &fonts.regular, 9.0),
        (
            format!(
                "Report generated automatically on {}.",
                ctx.generated_at.format("%d.%m.%Y %H:%M")
            ),
            &fonts.regular,
            8.0,
        ),
        (
            "This document is advisory and does not replace a specialist consultation.".to_string(),
            &fonts.regular,
            8.0,
        ),
        (
            format!("Scanner ID: {} | Patient: {}", ctx.data.scanner_id, ctx.data.client_name),
            &fonts.regular,
            8.0,
        ),
        (
            format!("(c) {} {APP_NAME}. All rights reserved.", ctx.generated_at.format("%Y")),
            &fonts.regular,
            8.0,
        ),
    ];

    let height = 8.0 + lines.iter().map(|(_, _, s)| line_height(*s)).sum::<f32>();
    cursor.ensure_space(height);
    line(
        cursor.layer(),
        (MARGIN + 20.0, cursor.y()),
        (MARGIN + CONTENT_WIDTH - 20.0, cursor.y()),
        theme::BORDER,
        0.8,
    );
    cursor.advance(4.0);
    for (content, font, size) in &lines {
        cursor.advance(line_height(*size));
        text_centered(cursor.layer(), font, *size, CENTER_X, cursor.y(), theme::TEXT_MUTED, content);
    }
}
