//! Scanner export processing orchestrator.
//!
//! Drives one document through the pipeline:
//! extract text → parse measurements → assess risk → render report → write.
//!
//! Batch mode repeats that over every discovered input and keeps going past
//! failures; the outcome of each file ends up in a [`BatchSummary`].

use std::collections::BTreeSet;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use chrono::NaiveDateTime;
use regex::Regex;
use serde::Serialize;

use crate::config::{ReportConfig, APP_NAME};
use crate::models::{Bilateral, FootScanData};
use crate::pipeline::diagnostic::{dump_extraction, dump_report_payload, ReportPayload};
use crate::pipeline::extraction::DocumentExtractor;
use crate::pipeline::measurements::{extract_measurements, MeasurementOutcome};
use crate::pipeline::risk::assess_risk;
use crate::report::{export_pdf_to_file, generate_report_pdf, ReportContext, ReportError};

static UNSAFE_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\s-]").unwrap());
static SEPARATOR_RUNS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[-\s]+").unwrap());

const RULE_WIDTH: usize = 70;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can occur while turning one export into a report.
#[derive(Debug, thiserror::Error)]
pub enum ProcessError {
    #[error("Input file not found: {0}")]
    NotFound(PathBuf),

    #[error("No usable measurements could be extracted from {0}")]
    Unusable(PathBuf),

    #[error("Report generation failed: {0}")]
    Report(#[from] ReportError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// One rendered report.
#[derive(Debug, Clone, Serialize)]
pub struct ProcessedReport {
    pub input_pdf: String,
    pub output_pdf: String,
    pub output_path: PathBuf,
    pub client_name: String,
    pub scan_date: String,
    pub foot_length: Bilateral<f64>,
    /// Mean of the five category scores.
    pub total_risk: f64,
    pub generated_time: String,
    /// bytes
    pub file_size: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct FailedInput {
    pub input_pdf: String,
    pub error: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchSummary {
    pub processed: usize,
    pub failed: usize,
    pub total: usize,
    pub reports: Vec<ProcessedReport>,
    pub failures: Vec<FailedInput>,
}

// ---------------------------------------------------------------------------
// Input discovery and naming
// ---------------------------------------------------------------------------

fn is_pdf(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("pdf"))
}

/// `*.pdf` files (any case) directly inside `dirs`, larger than `min_bytes`.
/// Sorted and de-duplicated. Missing or unreadable directories are skipped.
pub fn discover_inputs(dirs: &[PathBuf], min_bytes: u64) -> Vec<PathBuf> {
    let mut found = BTreeSet::new();

    for dir in dirs {
        let entries = match std::fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::debug!(dir = %dir.display(), error = %e, "Input directory skipped");
                continue;
            }
        };
        for entry in entries.flatten() {
            let path = entry.path();
            if !path.is_file() || !is_pdf(&path) {
                continue;
            }
            let size = entry.metadata().map(|m| m.len()).unwrap_or(0);
            if size > min_bytes {
                found.insert(path);
            } else {
                tracing::debug!(file = %path.display(), size_bytes = size, "Input too small, skipped");
            }
        }
    }

    found.into_iter().collect()
}

/// File-name-safe form of a patient name: punctuation removed, runs of
/// spaces and hyphens collapsed to `_`. Letters of any script are kept.
pub fn safe_file_name(name: &str) -> String {
    let stripped = UNSAFE_CHARS.replace_all(name, "");
    SEPARATOR_RUNS
        .replace_all(&stripped, "_")
        .trim_matches(|c| c == '-' || c == '_')
        .to_string()
}

/// Name stem for a report; `patient_<n>` in batch mode or `patient` for a
/// single file when the name has nothing usable in it.
pub fn report_stem(client_name: &str, batch_index: Option<usize>) -> String {
    let safe = safe_file_name(client_name);
    if !safe.is_empty() {
        return safe;
    }
    match batch_index {
        Some(n) => format!("patient_{n}"),
        None => "patient".to_string(),
    }
}

pub fn report_file_name(stem: &str, generated_at: NaiveDateTime) -> String {
    format!(
        "FootScan_Report_{stem}_{}.pdf",
        generated_at.format("%Y%m%d_%H%M%S")
    )
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Processing
// ---------------------------------------------------------------------------

/// Parse measurements out of one export. An unreadable document yields the
/// default record, which is never usable.
///
/// A re-read text dump is parsed under the name of the export it was dumped
/// from, so file-name fallbacks match the original run.
pub fn read_scan(
    extractor: &DocumentExtractor,
    path: &Path,
    now: NaiveDateTime,
) -> (String, MeasurementOutcome) {
    let source_name = file_name_of(path);
    match extractor.extract(path) {
        Ok(extraction) => {
            let source_name = extraction
                .dumped_from
                .as_deref()
                .map(file_name_of)
                .filter(|n| !n.is_empty())
                .unwrap_or(source_name);
            tracing::debug!(
                file = %path.display(),
                method = ?extraction.method,
                pages = extraction.page_count,
                chars = extraction.full_text.chars().count(),
                "Text extracted"
            );
            let outcome = extract_measurements(&extraction.full_text, &source_name);
            (extraction.full_text, outcome)
        }
        Err(e) => {
            tracing::warn!(file = %path.display(), error = %e, "Text extraction failed");
            let outcome = MeasurementOutcome {
                data: FootScanData::fallback(&source_name, now.date()),
                matches: Vec::new(),
            };
            (String::new(), outcome)
        }
    }
}

/// Turn one export into a report under `config.output_dir`.
///
/// `batch_index` is the 1-based position in a batch, `None` for a single file.
pub fn process_document(
    extractor: &DocumentExtractor,
    path: &Path,
    batch_index: Option<usize>,
    config: &ReportConfig,
    now: NaiveDateTime,
) -> Result<ProcessedReport, ProcessError> {
    if !path.is_file() {
        return Err(ProcessError::NotFound(path.to_path_buf()));
    }

    let (text, outcome) = read_scan(extractor, path, now);
    if config.write_debug_dumps {
        dump_extraction(&config.extraction_debug_dir, path, &text, &outcome);
    }

    let data = outcome.data;
    if !data.is_usable() {
        return Err(ProcessError::Unusable(path.to_path_buf()));
    }

    let assessment = assess_risk(&data);
    let stem = report_stem(&data.client_name, batch_index);
    let output_pdf = report_file_name(&stem, now);
    let output_path = config.output_dir.join(&output_pdf);

    let ctx = ReportContext {
        data: &data,
        assessment: &assessment,
        generated_at: now,
        font_path: config.font_path.as_deref(),
    };
    let bytes = generate_report_pdf(&ctx)?;
    let output_path = export_pdf_to_file(&bytes, &output_path)?;

    if config.write_debug_dumps {
        let payload = ReportPayload {
            data: &data,
            risk_scores: &assessment.scores,
            findings: &assessment.findings,
            recommendations: &assessment.recommendations,
            generated: now.format("%Y-%m-%dT%H:%M:%S").to_string(),
            pdf_file: output_path.display().to_string(),
        };
        dump_report_payload(&config.report_debug_dir, &stem, now, &payload);
    }

    tracing::info!(
        input = %path.display(),
        output = %output_path.display(),
        client = %data.client_name,
        total_risk = assessment.total_risk(),
        "Report generated"
    );

    Ok(ProcessedReport {
        input_pdf: file_name_of(path),
        output_pdf,
        output_path,
        client_name: data.client_name.clone(),
        scan_date: data.scan_date.clone(),
        foot_length: data.foot_length,
        total_risk: assessment.total_risk(),
        generated_time: now.format("%Y-%m-%d %H:%M:%S").to_string(),
        file_size: bytes.len() as u64,
    })
}

/// Process every input, continuing past failures. `clock` is read once per file.
pub fn process_batch(
    paths: &[PathBuf],
    config: &ReportConfig,
    mut clock: impl FnMut() -> NaiveDateTime,
) -> BatchSummary {
    let extractor = DocumentExtractor::default();
    let mut summary = BatchSummary {
        total: paths.len(),
        ..BatchSummary::default()
    };

    for (i, path) in paths.iter().enumerate() {
        tracing::info!(
            file = %path.display(),
            index = i + 1,
            total = paths.len(),
            "Processing scanner export"
        );
        match process_document(&extractor, path, Some(i + 1), config, clock()) {
            Ok(report) => {
                summary.processed += 1;
                summary.reports.push(report);
            }
            Err(e) => {
                tracing::error!(file = %path.display(), error = %e, "Processing failed");
                summary.failed += 1;
                summary.failures.push(FailedInput {
                    input_pdf: file_name_of(path),
                    error: e.to_string(),
                });
            }
        }
    }

    tracing::info!(
        processed = summary.processed,
        failed = summary.failed,
        total = summary.total,
        "Batch finished"
    );
    summary
}

// ---------------------------------------------------------------------------
// Summary file and cleanup
// ---------------------------------------------------------------------------

/// `1234567` -> `1,234,567`.
fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

pub fn render_summary(summary: &BatchSummary, now: NaiveDateTime) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    let mut out = String::new();

    // Writing to a String cannot fail.
    let _ = writeln!(out, "{rule}\n{APP_NAME} - processing summary\n{rule}\n");
    let _ = writeln!(out, "Processed on: {}", now.format("%d.%m.%Y %H:%M:%S"));
    let _ = writeln!(out, "Processed successfully: {} files", summary.processed);
    let _ = writeln!(out, "Failed: {} files", summary.failed);
    let _ = writeln!(out, "Total files: {}\n", summary.total);
    let _ = writeln!(out, "{rule}\nDETAILED RESULTS:\n{rule}\n");

    for (i, report) in summary.reports.iter().enumerate() {
        let _ = writeln!(out, "{:2}. {}", i + 1, report.client_name);
        let _ = writeln!(out, "    Input file: {}", report.input_pdf);
        let _ = writeln!(out, "    Output file: {}", report.output_pdf);
        let _ = writeln!(
            out,
            "    Foot length: L={:.1}mm, R={:.1}mm",
            report.foot_length.left, report.foot_length.right
        );
        let _ = writeln!(out, "    Total risk: {:.1}/100", report.total_risk);
        let _ = writeln!(out, "    Scan date: {}", report.scan_date);
        let _ = writeln!(out, "    File size: {} bytes", group_thousands(report.file_size));
        let _ = writeln!(out, "{}", "-".repeat(50));
    }
    out
}

/// Write `processing_summary_<ts>.txt` into `dir`. Nothing is written when
/// no report was produced.
pub fn write_summary(
    summary: &BatchSummary,
    dir: &Path,
    now: NaiveDateTime,
) -> Result<Option<PathBuf>, ProcessError> {
    if summary.reports.is_empty() {
        return Ok(None);
    }
    std::fs::create_dir_all(dir)?;
    let path = dir.join(format!(
        "processing_summary_{}.txt",
        now.format("%Y%m%d_%H%M%S")
    ));
    std::fs::write(&path, render_summary(summary, now))?;
    tracing::info!(path = %path.display(), "Processing summary written");
    Ok(Some(path))
}

/// Remove the debug dump directories. Failures are logged, not returned.
pub fn clean_debug_dirs(config: &ReportConfig) -> Vec<PathBuf> {
    let mut removed = Vec::new();
    for dir in config.debug_dirs() {
        if !dir.exists() {
            continue;
        }
        match std::fs::remove_dir_all(dir) {
            Ok(()) => {
                tracing::info!(dir = %dir.display(), "Removed debug directory");
                removed.push(dir.to_path_buf());
            }
            Err(e) => tracing::warn!(dir = %dir.display(), error = %e, "Could not remove debug directory"),
        }
    }
    removed
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    const EXPORT: &str = "\
# Anna Smirnova
Foot Snapshot Left Right
Foot Length (mm) 271.7 273.8
Foot Width (mm) 101.2 102.9
Ball Girth (mm) 245.1 247.6
Arch Index 0.27 0.31
Heel Angle (deg) 5 Inv 3 Eve
Hallux Angle (deg) 12.5 16.0
Shoe Width E
Toe type Greek
Gender Female
Scan date 2024/05/12 Scanner No 2301_0042
";

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 15)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    fn config_in(root: &Path) -> ReportConfig {
        ReportConfig {
            input_dirs: vec![root.join("in")],
            output_dir: root.join("out"),
            extraction_debug_dir: root.join("debug_extract"),
            report_debug_dir: root.join("debug_report"),
            font_path: None,
            min_input_bytes: 0,
            write_debug_dumps: true,
        }
    }

    #[test]
    fn safe_file_name_cleans_names() {
        assert_eq!(safe_file_name("Anna Smirnova"), "Anna_Smirnova");
        assert_eq!(safe_file_name("  O'Neil -  Jr. "), "ONeil_Jr");
        assert_eq!(safe_file_name("Иванов Иван"), "Иванов_Иван");
        assert_eq!(safe_file_name("!!!"), "");
    }

    #[test]
    fn empty_names_fall_back_to_patient() {
        assert_eq!(report_stem("???", Some(3)), "patient_3");
        assert_eq!(report_stem("", None), "patient");
        assert_eq!(report_stem("Anna", Some(3)), "Anna");
    }

    #[test]
    fn report_file_name_has_timestamp() {
        assert_eq!(
            report_file_name("Anna_Smirnova", at(9, 5, 7)),
            "FootScan_Report_Anna_Smirnova_20240315_090507.pdf"
        );
    }

    #[test]
    fn discovery_filters_extension_and_size() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b.pdf"), vec![b'x'; 2000]).unwrap();
        std::fs::write(dir.path().join("A.PDF"), vec![b'x'; 2000]).unwrap();
        std::fs::write(dir.path().join("tiny.pdf"), b"%PDF").unwrap();
        std::fs::write(dir.path().join("notes.txt"), vec![b'x'; 2000]).unwrap();
        std::fs::create_dir(dir.path().join("nested.pdf")).unwrap();

        let dirs = vec![
            dir.path().to_path_buf(),
            dir.path().to_path_buf(),
            dir.path().join("missing"),
        ];
        let found = discover_inputs(&dirs, 1000);
        let names: Vec<String> = found.iter().map(|p| file_name_of(p)).collect();
        assert_eq!(names, vec!["A.PDF", "b.pdf"]);
    }

    #[test]
    fn processes_text_export_end_to_end() {
        let root = tempfile::tempdir().unwrap();
        let config = config_in(root.path());
        let input = root.path().join("anna.txt");
        std::fs::write(&input, EXPORT).unwrap();

        let extractor = DocumentExtractor::default();
        let report = process_document(&extractor, &input, None, &config, at(10, 0, 0)).unwrap();

        assert_eq!(report.client_name, "Anna Smirnova");
        assert_eq!(report.output_pdf, "FootScan_Report_Anna_Smirnova_20240315_100000.pdf");
        assert!(report.output_path.is_file());
        assert!(report.file_size > 0);
        assert!(report.foot_length.left > 0.0);

        assert!(config.extraction_debug_dir.join("anna_extracted.txt").is_file());
        assert!(config.extraction_debug_dir.join("anna_data.json").is_file());
        let payload = std::fs::read_to_string(
            config.report_debug_dir.join("Anna_Smirnova_20240315_100000_data.json"),
        )
        .unwrap();
        let value: serde_json::Value = serde_json::from_str(&payload).unwrap();
        assert!(!value["findings"].as_array().unwrap().is_empty());
    }

    #[test]
    fn unusable_export_is_an_error_without_report() {
        let root = tempfile::tempdir().unwrap();
        let mut config = config_in(root.path());
        config.write_debug_dumps = false;
        let input = root.path().join("empty.txt");
        std::fs::write(&input, "nothing to see here\n").unwrap();

        let extractor = DocumentExtractor::default();
        let err = process_document(&extractor, &input, Some(1), &config, at(10, 0, 0)).unwrap_err();
        assert!(matches!(err, ProcessError::Unusable(_)));
        assert!(!config.output_dir.exists());
        assert!(!config.extraction_debug_dir.exists());
    }

    #[test]
    fn text_dump_reads_back_like_the_export() {
        let root = tempfile::tempdir().unwrap();
        let config = config_in(root.path());
        let input = root.path().join("Anna_2301_0042_Report.pdf");
        // No `# ` heading and no scanner label: name and scanner id depend on
        // the first line and the export's file name.
        let export = EXPORT
            .replace("# Anna Smirnova", "Anna Smirnova")
            .replace(" Scanner No 2301_0042", "");
        std::fs::write(&input, export).unwrap();

        let extractor = DocumentExtractor::default();
        let (text, direct) = read_scan(&extractor, &input, at(10, 0, 0));
        dump_extraction(&config.extraction_debug_dir, &input, &text, &direct);

        let dump = config.extraction_debug_dir.join("Anna_2301_0042_Report_extracted.txt");
        let (reread_text, reread) = read_scan(&extractor, &dump, at(10, 0, 0));

        assert_eq!(direct.data.client_name, "Anna Smirnova");
        assert_eq!(direct.data.scanner_id, "2301_0042");
        assert_eq!(reread_text, text);
        assert_eq!(reread.data, direct.data);
    }

    #[test]
    fn unreadable_export_falls_back_to_file_name_record() {
        let root = tempfile::tempdir().unwrap();
        let config = config_in(root.path());
        let input = root.path().join("Ivan_Petrov_Report.pdf");
        std::fs::write(&input, b"MZ\x90\x00\x03\x00\xFF\xFE").unwrap();

        let extractor = DocumentExtractor::default();
        let err = process_document(&extractor, &input, Some(1), &config, at(10, 0, 0)).unwrap_err();
        assert!(matches!(err, ProcessError::Unusable(_)));
        assert!(!config.output_dir.exists());

        let json = std::fs::read_to_string(
            config.extraction_debug_dir.join("Ivan_Petrov_Report_data.json"),
        )
        .unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["data"]["client_name"], "Ivan Petrov");
        assert_eq!(value["data"]["scan_date"], "15.03.2024");
        assert_eq!(value["matches"].as_array().unwrap().len(), 0);
    }

    #[test]
    fn missing_input_is_not_found() {
        let root = tempfile::tempdir().unwrap();
        let config = config_in(root.path());
        let extractor = DocumentExtractor::default();
        let err = process_document(
            &extractor,
            &root.path().join("nope.pdf"),
            None,
            &config,
            at(10, 0, 0),
        )
        .unwrap_err();
        assert!(matches!(err, ProcessError::NotFound(_)));
    }

    #[test]
    fn batch_counts_failures_and_successes() {
        let root = tempfile::tempdir().unwrap();
        let config = config_in(root.path());
        let good = root.path().join("good.txt");
        let bad = root.path().join("bad.txt");
        std::fs::write(&good, EXPORT).unwrap();
        std::fs::write(&bad, "no measurements\n").unwrap();

        let mut second = 0;
        let summary = process_batch(&[good, bad], &config, || {
            second += 1;
            at(11, 0, second)
        });

        assert_eq!(summary.total, 2);
        assert_eq!(summary.processed, 1);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.failures[0].input_pdf, "bad.txt");
        assert_eq!(summary.reports[0].generated_time, "2024-03-15 11:00:01");

        let path = write_summary(&summary, &config.output_dir, at(12, 0, 0))
            .unwrap()
            .unwrap();
        assert!(path.ends_with("processing_summary_20240315_120000.txt"));
        let text = std::fs::read_to_string(path).unwrap();
        assert!(text.contains("Processed successfully: 1 files"));
        assert!(text.contains(" 1. Anna Smirnova"));
    }

    #[test]
    fn summary_skipped_when_nothing_processed() {
        let dir = tempfile::tempdir().unwrap();
        let written = write_summary(&BatchSummary::default(), dir.path(), at(12, 0, 0)).unwrap();
        assert!(written.is_none());
    }

    #[test]
    fn thousands_grouping() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1000), "1,000");
        assert_eq!(group_thousands(1234567), "1,234,567");
    }

    #[test]
    fn clean_removes_only_existing_debug_dirs() {
        let root = tempfile::tempdir().unwrap();
        let config = config_in(root.path());
        std::fs::create_dir_all(config.extraction_debug_dir.join("sub")).unwrap();

        let removed = clean_debug_dirs(&config);
        assert_eq!(removed, vec![config.extraction_debug_dir.clone()]);
        assert!(!config.extraction_debug_dir.exists());
    }
}
