use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::ExtractionError;

/// Text read from one scanner export, ready for the measurement heuristics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionResult {
    /// Correlates the log lines of one extraction.
    pub document_id: Uuid,
    pub method: ExtractionMethod,
    pub pages: Vec<PageExtraction>,
    /// One normalized line per page, joined with `\n`.
    pub full_text: String,
    pub page_count: usize,
    /// Export named in the banner of a re-read text dump.
    pub dumped_from: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionMethod {
    /// Embedded text layer of a digital PDF.
    PdfTextLayer,
    /// Re-read of an earlier `*_extracted.txt` dump.
    TextDump,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageExtraction {
    /// 1-based.
    pub page_number: usize,
    pub text: String,
}

/// Source of per-page text for PDF bytes. Swapped out in tests.
pub trait PdfExtractor {
    fn extract_text(&self, pdf_bytes: &[u8]) -> Result<Vec<PageExtraction>, ExtractionError>;
}
