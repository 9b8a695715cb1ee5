use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::ExtractionError;

/// Scanner exports are a few hundred KB; anything past this is not one.
const MAX_INPUT_BYTES: u64 = 25 * 1024 * 1024;
/// Bytes sniffed from the head of a file.
const SNIFF_WINDOW: usize = 4096;
const PDF_MAGIC: &[u8] = b"%PDF";
const MIN_PRINTABLE_RATIO: f64 = 0.8;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum InputKind {
    Pdf,
    /// Text saved by an earlier run (`*_extracted.txt`), re-parsed without the PDF.
    TextDump,
    Unsupported,
}

impl InputKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::TextDump => "text_dump",
            Self::Unsupported => "unsupported",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputFormat {
    pub kind: InputKind,
    pub size_bytes: u64,
}

/// Classify an input by content. The extension is ignored: exports get renamed.
pub fn detect_format(path: &Path) -> Result<InputFormat, ExtractionError> {
    let size_bytes = std::fs::metadata(path)?.len();
    if size_bytes > MAX_INPUT_BYTES {
        return Ok(InputFormat {
            kind: InputKind::Unsupported,
            size_bytes,
        });
    }

    let mut head = Vec::with_capacity(SNIFF_WINDOW);
    std::fs::File::open(path)?
        .take(SNIFF_WINDOW as u64)
        .read_to_end(&mut head)?;

    let kind = if head.starts_with(PDF_MAGIC) {
        InputKind::Pdf
    } else if looks_like_text(&head) {
        InputKind::TextDump
    } else {
        InputKind::Unsupported
    };

    Ok(InputFormat { kind, size_bytes })
}

/// UTF-8 and mostly printable. The window may cut the last multi-byte char.
fn looks_like_text(head: &[u8]) -> bool {
    let text = match std::str::from_utf8(head) {
        Ok(t) => t,
        Err(e) if e.error_len().is_none() => match std::str::from_utf8(&head[..e.valid_up_to()]) {
            Ok(t) => t,
            Err(_) => return false,
        },
        Err(_) => return false,
    };
    if text.is_empty() {
        return false;
    }

    let (printable, total) = text.chars().fold((0usize, 0usize), |(p, t), c| {
        let ok = !c.is_control() || c.is_whitespace();
        (p + usize::from(ok), t + 1)
    });
    printable as f64 / total as f64 > MIN_PRINTABLE_RATIO
}
