pub mod types;
pub mod format;
pub mod sanitize;
pub mod pdf;
pub mod orchestrator;

pub use types::*;
pub use format::*;
pub use sanitize::*;
pub use pdf::*;
pub use orchestrator::*;

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Input file not found: {0}")]
    NotFound(PathBuf),

    #[error("PDF parsing failed: {0}")]
    PdfParsing(String),

    #[error("Text encoding error: {0}")]
    EncodingError(String),

    #[error("Unsupported format for extraction: {0}")]
    UnsupportedFormat(String),
}
