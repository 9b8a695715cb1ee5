use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Application-level constants
pub const APP_NAME: &str = "FootScan Analytics";
pub const APP_TAGLINE: &str = "Digital foot health laboratory";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Env var overriding the extraction debug directory.
pub const DUMP_DIR_ENV: &str = "FOOTSCAN_DUMP_DIR";

/// Env var pointing at a TrueType font to embed in reports.
pub const FONT_ENV: &str = "FOOTSCAN_FONT";

/// Scanner exports below this size are placeholders, not real scans.
pub const DEFAULT_MIN_INPUT_BYTES: u64 = 1000;

/// Default `EnvFilter` directive when `RUST_LOG` is unset.
pub fn default_log_filter() -> &'static str {
    if is_dev() {
        "footscan=debug,footscan_lib=debug"
    } else {
        "footscan=info,footscan_lib=info"
    }
}

/// Debug builds (including tests) count as dev.
pub fn is_dev() -> bool {
    cfg!(debug_assertions)
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("I/O error reading config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Runtime settings for a report run.
///
/// Loaded from an optional JSON file, then environment overrides, then CLI flags.
/// Missing keys fall back to [`ReportConfig::default`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Directories scanned (non-recursively) for scanner PDF exports.
    pub input_dirs: Vec<PathBuf>,
    /// Where generated reports and processing summaries go.
    pub output_dir: PathBuf,
    /// Raw extracted text and parsed measurement dumps.
    pub extraction_debug_dir: PathBuf,
    /// Report payload dumps (data + scores + recommendations).
    pub report_debug_dir: PathBuf,
    /// TrueType font embedded in reports; builtin Helvetica when unset/unloadable.
    pub font_path: Option<PathBuf>,
    pub min_input_bytes: u64,
    pub write_debug_dumps: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            input_dirs: vec![PathBuf::from("reports/students"), PathBuf::from("reports")],
            output_dir: PathBuf::from("reports/students_result"),
            extraction_debug_dir: PathBuf::from("extracted_data_debug"),
            report_debug_dir: PathBuf::from("generated_reports_debug"),
            font_path: None,
            min_input_bytes: DEFAULT_MIN_INPUT_BYTES,
            write_debug_dumps: true,
        }
    }
}

impl ReportConfig {
    /// Load a JSON config file. Keys not present keep their defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Apply `FOOTSCAN_DUMP_DIR` / `FOOTSCAN_FONT` overrides.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(dir) = std::env::var(DUMP_DIR_ENV) {
            if !dir.trim().is_empty() {
                self.extraction_debug_dir = PathBuf::from(dir);
            }
        }
        if let Ok(font) = std::env::var(FONT_ENV) {
            if !font.trim().is_empty() {
                self.font_path = Some(PathBuf::from(font));
            }
        }
        self
    }

    /// Directories removed by `--clean`.
    pub fn debug_dirs(&self) -> [&Path; 2] {
        [
            self.extraction_debug_dir.as_path(),
            self.report_debug_dir.as_path(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_legacy_layout() {
        let config = ReportConfig::default();
        assert_eq!(config.output_dir, PathBuf::from("reports/students_result"));
        assert_eq!(config.extraction_debug_dir, PathBuf::from("extracted_data_debug"));
        assert_eq!(config.min_input_bytes, 1000);
        assert!(config.write_debug_dumps);
        assert!(config.font_path.is_none());
    }

    #[test]
    fn load_partial_json_keeps_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("footscan.json");
        std::fs::write(&path, r#"{ "output_dir": "out", "write_debug_dumps": false }"#).unwrap();

        let config = ReportConfig::load(&path).unwrap();
        assert_eq!(config.output_dir, PathBuf::from("out"));
        assert!(!config.write_debug_dumps);
        assert_eq!(config.min_input_bytes, DEFAULT_MIN_INPUT_BYTES);
    }

    #[test]
    fn load_invalid_json_is_parse_error() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("broken.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = ReportConfig::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let err = ReportConfig::load(Path::new("/nonexistent/footscan.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn log_filter_is_debug_in_tests() {
        assert!(default_log_filter().contains("debug"));
    }

    #[test]
    fn app_name_is_footscan() {
        assert_eq!(APP_NAME, "FootScan Analytics");
    }
}
