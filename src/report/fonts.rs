//! Font selection for reports.
//!
//! Patient names and scanner labels can be Cyrillic, which the PDF base-14
//! fonts cannot show. A TrueType face is embedded when one can be found;
//! otherwise the report falls back to builtin Helvetica.

use std::fs::File;
use std::path::{Path, PathBuf};

use printpdf::{BuiltinFont, IndirectFontRef, PdfDocumentReference};

use super::ReportError;

/// Searched in order after the configured font.
const SYSTEM_FONT_CANDIDATES: &[&str] = &[
    "DejaVuSans.ttf",
    "fonts/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/Library/Fonts/DejaVuSans.ttf",
    "/System/Library/Fonts/DejaVuSans.ttf",
    "C:/Windows/Fonts/dejavusans.ttf",
    "C:/Windows/Fonts/arial.ttf",
    "/usr/share/fonts/truetype/msttcorefonts/arial.ttf",
];

/// Checked first on macOS.
const MACOS_FONT_CANDIDATES: &[&str] = &[
    "/Library/Fonts/Arial.ttf",
    "/System/Library/Fonts/Arial.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial Unicode.ttf",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FontSource {
    /// Embedded TrueType file.
    Embedded(PathBuf),
    /// Helvetica / Helvetica-Bold.
    Builtin,
}

/// Regular and bold faces registered on one document.
#[derive(Debug, Clone)]
pub struct ReportFonts {
    pub regular: IndirectFontRef,
    pub bold: IndirectFontRef,
    pub source: FontSource,
}

/// Paths tried in order: configured font, platform candidates, generic candidates.
pub fn candidate_paths(configured: Option<&Path>) -> Vec<PathBuf> {
    let mut paths: Vec<PathBuf> = configured.map(Path::to_path_buf).into_iter().collect();
    if cfg!(target_os = "macos") {
        paths.extend(MACOS_FONT_CANDIDATES.iter().map(PathBuf::from));
    }
    paths.extend(SYSTEM_FONT_CANDIDATES.iter().map(PathBuf::from));
    paths
}

/// `DejaVuSans.ttf` -> `DejaVuSans-Bold.ttf`, next to the regular face.
pub fn bold_sibling(path: &Path) -> Option<PathBuf> {
    let stem = path.file_stem()?.to_str()?;
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("ttf");
    Some(path.with_file_name(format!("{stem}-Bold.{ext}")))
}

fn load_external(doc: &PdfDocumentReference, path: &Path) -> Option<IndirectFontRef> {
    let file = File::open(path).ok()?;
    match doc.add_external_font(file) {
        Ok(font) => Some(font),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Font file could not be embedded");
            None
        }
    }
}

/// Register the first loadable TrueType face, or builtin Helvetica.
pub fn register_fonts(
    doc: &PdfDocumentReference,
    configured: Option<&Path>,
) -> Result<ReportFonts, ReportError> {
    for path in candidate_paths(configured) {
        if !path.is_file() {
            continue;
        }
        let Some(regular) = load_external(doc, &path) else {
            continue;
        };
        // No bold face on disk: reuse the regular one.
        let bold = bold_sibling(&path)
            .filter(|p| p.is_file())
            .and_then(|p| load_external(doc, &p))
            .unwrap_or_else(|| regular.clone());

        tracing::debug!(path = %path.display(), "Embedded report font");
        return Ok(ReportFonts {
            regular,
            bold,
            source: FontSource::Embedded(path),
        });
    }

    if let Some(path) = configured {
        tracing::warn!(
            path = %path.display(),
            "Configured font unavailable, using builtin Helvetica"
        );
    }

    let regular = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| ReportError::Font(e.to_string()))?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| ReportError::Font(e.to_string()))?;

    Ok(ReportFonts {
        regular,
        bold,
        source: FontSource::Builtin,
    })
}
