use std::path::Path;

use uuid::Uuid;

use super::format::{detect_format, InputKind};
use super::pdf::PdfTextExtractor;
use super::sanitize::{join_pages, normalize_page_text, split_dump_banner};
use super::types::{ExtractionMethod, ExtractionResult, PageExtraction, PdfExtractor};
use super::ExtractionError;

/// Reads a scanner export from disk and produces normalized text.
/// Uses a trait object for PDF extraction, enabling dependency injection.
pub struct DocumentExtractor {
    pdf_extractor: Box<dyn PdfExtractor + Send + Sync>,
}

impl Default for DocumentExtractor {
    fn default() -> Self {
        Self::new(Box::new(PdfTextExtractor))
    }
}

impl DocumentExtractor {
    pub fn new(pdf_extractor: Box<dyn PdfExtractor + Send + Sync>) -> Self {
        Self { pdf_extractor }
    }

    pub fn extract(&self, path: &Path) -> Result<ExtractionResult, ExtractionError> {
        if !path.exists() {
            return Err(ExtractionError::NotFound(path.to_path_buf()));
        }

        let document_id = Uuid::new_v4();
        let format = detect_format(path)?;

        tracing::info!(
            document_id = %document_id,
            file = %path.display(),
            kind = format.kind.as_str(),
            size_bytes = format.size_bytes,
            "Starting text extraction"
        );

        let mut dumped_from = None;
        let (method, mut pages) = match format.kind {
            InputKind::Pdf => {
                let bytes = std::fs::read(path)?;
                let pages = self.pdf_extractor.extract_text(&bytes)?;
                (ExtractionMethod::PdfTextLayer, pages)
            }
            InputKind::TextDump => {
                let bytes = std::fs::read(path)?;
                let text = String::from_utf8(bytes)
                    .map_err(|e| ExtractionError::EncodingError(e.to_string()))?;
                let (source, body) = split_dump_banner(&text);
                if let Some(source) = &source {
                    tracing::debug!(
                        document_id = %document_id,
                        source = %source.display(),
                        "Dump banner stripped"
                    );
                }
                // A text dump already holds one line per page.
                let pages = body
                    .lines()
                    .enumerate()
                    .map(|(i, line)| PageExtraction {
                        page_number: i + 1,
                        text: line.to_string(),
                    })
                    .collect();
                dumped_from = source;
                (ExtractionMethod::TextDump, pages)
            }
            InputKind::Unsupported => {
                return Err(ExtractionError::UnsupportedFormat(format!(
                    "{} ({} bytes)",
                    path.display(),
                    format.size_bytes
                )));
            }
        };

        for page in &mut pages {
            page.text = normalize_page_text(&page.text);
        }

        let full_text = join_pages(pages.iter().map(|p| p.text.as_str()));
        let page_count = pages.len();

        tracing::info!(
            document_id = %document_id,
            method = ?method,
            pages = page_count,
            text_length = full_text.len(),
            "Text extraction complete"
        );

        Ok(ExtractionResult {
            document_id,
            method,
            pages,
            full_text,
            page_count,
            dumped_from,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::extraction::pdf::make_test_pdf;

    struct FixedPdf(Vec<&'static str>);

    impl PdfExtractor for FixedPdf {
        fn extract_text(&self, _pdf_bytes: &[u8]) -> Result<Vec<PageExtraction>, ExtractionError> {
            Ok(self
                .0
                .iter()
                .enumerate()
                .map(|(i, t)| PageExtraction {
                    page_number: i + 1,
                    text: t.to_string(),
                })
                .collect())
        }
    }

    #[test]
    fn pdf_pages_are_flattened_to_lines() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("scan.pdf");
        std::fs::write(&path, b"%PDF-1.4 stub").unwrap();

        let extractor = DocumentExtractor::new(Box::new(FixedPdf(vec![
            "# Anna\nSmirnova",
            "Foot Length (mm)\n250.1\n251.3",
        ])));
        let result = extractor.extract(&path).unwrap();

        assert_eq!(result.method, ExtractionMethod::PdfTextLayer);
        assert_eq!(result.page_count, 2);
        assert_eq!(result.full_text, "# Anna Smirnova\nFoot Length (mm) 250.1 251.3\n");
    }

    #[test]
    fn real_pdf_round_trips_through_pdf_extract() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("scan.pdf");
        std::fs::write(&path, make_test_pdf(&[&["Foot Length (mm)", "271.7 273.8"]])).unwrap();

        let result = DocumentExtractor::default().extract(&path).unwrap();
        assert_eq!(result.page_count, 1);
        assert!(result.full_text.contains("271.7"));
        assert_eq!(result.full_text.lines().count(), 1);
    }

    #[test]
    fn text_dump_is_read_line_per_page() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("dump.txt");
        std::fs::write(&path, "# Anna\nArch Index 0.27   0.31\n").unwrap();

        let result = DocumentExtractor::default().extract(&path).unwrap();
        assert_eq!(result.method, ExtractionMethod::TextDump);
        assert_eq!(result.full_text, "# Anna\nArch Index 0.27 0.31\n");
    }

    #[test]
    fn dump_banner_is_not_read_as_text() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("Anna_extracted.txt");
        let banner = crate::pipeline::extraction::dump_banner(Path::new("/scans/Anna_2301_0042_Report.pdf"));
        std::fs::write(&path, format!("{banner}Anna Smirnova\nArch Index 0.27 0.31\n")).unwrap();

        let result = DocumentExtractor::default().extract(&path).unwrap();
        assert_eq!(result.full_text, "Anna Smirnova\nArch Index 0.27 0.31\n");
        assert_eq!(result.page_count, 2);
        assert_eq!(
            result.dumped_from.as_deref(),
            Some(Path::new("/scans/Anna_2301_0042_Report.pdf"))
        );
    }

    #[test]
    fn missing_file_is_not_found() {
        let result = DocumentExtractor::default().extract(Path::new("/nonexistent/a.pdf"));
        assert!(matches!(result, Err(ExtractionError::NotFound(_))));
    }

    #[test]
    fn binary_file_is_unsupported() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("blob.bin");
        std::fs::write(&path, b"\x00\x9F\x92\x96\xFF").unwrap();

        let result = DocumentExtractor::default().extract(&path);
        assert!(matches!(result, Err(ExtractionError::UnsupportedFormat(_))));
    }
}
