use std::path::{Path, PathBuf};

/// Label of the banner line naming the export a text dump came from.
pub const DUMP_BANNER_LABEL: &str = "EXTRACTION DEBUG: ";
const DUMP_RULE_WIDTH: usize = 80;

/// Normalize one page of extracted text into a single line.
///
/// Strips control characters and collapses every whitespace run (including
/// newlines) to one space. Scanner exports lay tables out in arbitrary line
/// orders, so downstream heuristics work on one flat line per page.
pub fn normalize_page_text(raw: &str) -> String {
    raw.chars()
        .map(|c| if c.is_control() && !c.is_whitespace() { ' ' } else { c })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Join normalized pages: one line per page.
pub fn join_pages<'a, I>(pages: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    pages
        .into_iter()
        .map(|p| format!("{p}\n"))
        .collect()
}

/// Header written above the text in `*_extracted.txt` dumps.
pub fn dump_banner(source: &Path) -> String {
    let rule = "=".repeat(DUMP_RULE_WIDTH);
    format!("{rule}\n{DUMP_BANNER_LABEL}{}\n{rule}\n\n", source.display())
}

/// Split a text dump into the export path named in its banner and the text
/// below it. Text without a banner comes back whole.
pub fn split_dump_banner(text: &str) -> (Option<PathBuf>, &str) {
    match parse_dump_banner(text) {
        Some((source, body)) => (Some(source), body),
        None => (None, text),
    }
}

fn parse_dump_banner(text: &str) -> Option<(PathBuf, &str)> {
    let rule = "=".repeat(DUMP_RULE_WIDTH);
    let rest = text.strip_prefix(rule.as_str())?.strip_prefix('\n')?;
    let (source, rest) = rest.strip_prefix(DUMP_BANNER_LABEL)?.split_once('\n')?;
    let rest = rest.strip_prefix(rule.as_str())?.strip_prefix('\n')?;
    let body = rest.strip_prefix('\n').unwrap_or(rest);
    Some((PathBuf::from(source.trim_end_matches('\r')), body))
}
