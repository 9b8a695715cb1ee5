//! Debug dumps of intermediate pipeline artifacts.
//!
//! Enables inspection of what the heuristics saw and produced for each export.
//! Disabled with `--no-debug` / `write_debug_dumps: false`.
//!
//! **Output structure**:
//! ```text
//! {extraction_debug_dir}/
//!   {stem}_extracted.txt        banner + normalized text
//!   {stem}_data.json            parsed record + field matches
//! {report_debug_dir}/
//!   {safe_name}_{ts}_data.json  record, scores, findings, recommendations, output path
//! ```

use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::models::{FootScanData, Recommendation, RiskScores};
use crate::pipeline::extraction::dump_banner;
use crate::pipeline::measurements::MeasurementOutcome;

// ──────────────────────────────────────────────
// Dump directories
// ──────────────────────────────────────────────

/// Create `dir` if needed. Returns `None` (with a warning) on failure;
/// never panics, never blocks the pipeline.
pub fn ensure_dump_dir(dir: &Path) -> Option<PathBuf> {
    if let Err(e) = std::fs::create_dir_all(dir) {
        tracing::warn!(
            path = %dir.display(),
            error = %e,
            "Debug dump: failed to create directory"
        );
        return None;
    }
    Some(dir.to_path_buf())
}

/// File stem used for per-export dumps: `scan_01.pdf` -> `scan_01`.
pub fn dump_stem(source: &Path) -> String {
    source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document".to_string())
}

// ──────────────────────────────────────────────
// Dump writers
// ──────────────────────────────────────────────

/// Write a JSON artifact. Pretty-printed. Never panics.
pub fn dump_json<T: Serialize>(dir: &Path, filename: &str, value: &T) {
    let path = dir.join(filename);
    match serde_json::to_string_pretty(value) {
        Ok(json) => match std::fs::write(&path, json.as_bytes()) {
            Ok(()) => tracing::debug!(
                path = %path.display(),
                size = json.len(),
                "Debug dump: JSON written"
            ),
            Err(e) => tracing::warn!(
                path = %path.display(),
                error = %e,
                "Debug dump: failed to write JSON"
            ),
        },
        Err(e) => tracing::warn!(
            path = %path.display(),
            error = %e,
            "Debug dump: failed to serialize JSON"
        ),
    }
}

/// Write a text artifact. Never panics.
pub fn dump_text(dir: &Path, filename: &str, text: &str) {
    let path = dir.join(filename);
    match std::fs::write(&path, text.as_bytes()) {
        Ok(()) => tracing::debug!(
            path = %path.display(),
            size = text.len(),
            "Debug dump: text written"
        ),
        Err(e) => tracing::warn!(
            path = %path.display(),
            error = %e,
            "Debug dump: failed to write text"
        ),
    }
}

// ──────────────────────────────────────────────
// Pipeline artifacts
// ──────────────────────────────────────────────

/// `{stem}_extracted.txt` with a banner naming the source, plus `{stem}_data.json`.
pub fn dump_extraction(debug_dir: &Path, source: &Path, text: &str, outcome: &MeasurementOutcome) {
    let Some(dir) = ensure_dump_dir(debug_dir) else {
        return;
    };
    let stem = dump_stem(source);

    let dump = format!("{}{text}", dump_banner(source));
    dump_text(&dir, &format!("{stem}_extracted.txt"), &dump);
    dump_json(&dir, &format!("{stem}_data.json"), outcome);
}

#[derive(Debug, Serialize)]
pub struct ReportPayload<'a> {
    pub data: &'a FootScanData,
    pub risk_scores: &'a RiskScores,
    pub findings: &'a [String],
    pub recommendations: &'a [Recommendation],
    pub generated: String,
    pub pdf_file: String,
}

/// `{safe_name}_{%Y%m%d_%H%M%S}_data.json` describing a rendered report.
pub fn dump_report_payload(
    debug_dir: &Path,
    safe_name: &str,
    generated_at: NaiveDateTime,
    payload: &ReportPayload<'_>,
) {
    let Some(dir) = ensure_dump_dir(debug_dir) else {
        return;
    };
    let ts = generated_at.format("%Y%m%d_%H%M%S");
    dump_json(&dir, &format!("{safe_name}_{ts}_data.json"), payload);
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────
