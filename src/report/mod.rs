//! PDF report rendering.
//!
//! A report is built in one pass over a fresh printpdf document: title page,
//! risk analysis with the radar chart, detailed measurements with the
//! left/right comparison, recommendations, conclusion and footer. Pages are
//! added by [`layout::PageCursor`] as content fills them.

pub mod charts;
pub mod fonts;
pub mod layout;
pub mod logo;
pub mod pages;
pub mod theme;

use std::io::BufWriter;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use printpdf::{Mm, PdfDocument};
use thiserror::Error;

use crate::config::APP_NAME;
use crate::models::{FootScanData, RiskAssessment};
use layout::{PageCursor, PAGE_HEIGHT, PAGE_WIDTH};

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("PDF font error: {0}")]
    Font(String),

    #[error("PDF render error: {0}")]
    Render(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Everything one report needs. `generated_at` drives the report ID and footer.
#[derive(Debug, Clone, Copy)]
pub struct ReportContext<'a> {
    pub data: &'a FootScanData,
    pub assessment: &'a RiskAssessment,
    pub generated_at: NaiveDateTime,
    pub font_path: Option<&'a Path>,
}

impl ReportContext<'_> {
    pub fn report_id(&self) -> String {
        format!("FSA-{}", self.generated_at.format("%Y%m%d%H%M"))
    }

    pub fn title(&self) -> String {
        format!("{APP_NAME} - {}", self.data.client_name)
    }
}

/// Render the full report. Returns PDF bytes.
pub fn generate_report_pdf(ctx: &ReportContext<'_>) -> Result<Vec<u8>, ReportError> {
    let (doc, page1, layer1) =
        PdfDocument::new(ctx.title(), Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
    let fonts = fonts::register_fonts(&doc, ctx.font_path)?;

    let mut cursor = PageCursor::new(&doc, page1, layer1);
    pages::title_page(&mut cursor, &fonts, ctx);
    cursor.new_page();
    pages::risk_page(&mut cursor, &fonts, ctx);
    cursor.new_page();
    pages::detail_page(&mut cursor, &fonts, ctx);
    pages::recommendations(&mut cursor, &fonts, ctx);
    pages::conclusion(&mut cursor, &fonts, ctx);
    pages::footer(&mut cursor, &fonts, ctx);

    tracing::debug!(
        pages = cursor.page_count(),
        font = ?fonts.source,
        recommendations = ctx.assessment.recommendations.len(),
        "Report laid out"
    );

    let mut buf = BufWriter::new(Vec::new());
    doc.save(&mut buf)
        .map_err(|e| ReportError::Render(format!("PDF save error: {e}")))?;
    buf.into_inner()
        .map_err(|e| ReportError::Render(format!("PDF buffer error: {e}")))
}

/// Write PDF bytes to `path`, creating parent directories.
pub fn export_pdf_to_file(pdf_bytes: &[u8], path: &Path) -> Result<PathBuf, ReportError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, pdf_bytes)?;
    Ok(path.to_path_buf())
}
