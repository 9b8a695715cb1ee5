use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Two consecutive Latin or Cyrillic letters.
static HAS_LETTERS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[а-яА-ЯёЁa-zA-Z]{2,}").unwrap());
static ONLY_SYMBOLS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\W*$").unwrap());
static BARE_NUMBER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+\.?\d*$").unwrap());
static FILE_NAME_COUNTERS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"_\d+_\d+").unwrap());

/// Words that mark a `# ` heading as a section title rather than a name.
const HEADING_STOPWORDS: &[&str] = &["snapshot", "foot", "length", "width", "scan", "report", "page"];

/// Words that mark a leading line as data rather than a name.
const LINE_STOPWORDS: &[&str] = &[
    "left", "right", "foot", "length", "width", "girth", "snapshot", "scan", "date", "scanner",
    "gender", "male", "female",
];

/// Toe-type words (Russian and English) that look like names but are not.
const TOE_TYPE_WORDS: &[&str] = &[
    "египетский",
    "римский",
    "греческий",
    "квадратный",
    "egyptian",
    "roman",
    "greek",
    "square",
];

const HEADING_SCAN_LINES: usize = 20;
const LEADING_SCAN_LINES: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NameSource {
    /// `# Name` heading near the top.
    Heading,
    /// First plausible line near the top.
    LeadingLine,
    /// Derived from the export's file name.
    FileName,
}

fn contains_any(haystack_lower: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| haystack_lower.contains(n))
}

/// Find the patient name, trying heading, leading lines, then file name.
pub fn find_client_name(text: &str, file_name: &str) -> Option<(String, NameSource)> {
    name_from_heading(text)
        .map(|n| (n, NameSource::Heading))
        .or_else(|| name_from_leading_lines(text).map(|n| (n, NameSource::LeadingLine)))
        .or_else(|| name_from_file_name(file_name).map(|n| (n, NameSource::FileName)))
}

fn name_from_heading(text: &str) -> Option<String> {
    text.lines().take(HEADING_SCAN_LINES).find_map(|line| {
        let clean = line.trim();
        let name = clean.strip_prefix("# ")?.trim();
        let plausible = name.chars().count() > 2
            && !contains_any(&name.to_lowercase(), HEADING_STOPWORDS)
            && HAS_LETTERS.is_match(name);
        plausible.then(|| name.to_string())
    })
}

fn name_from_leading_lines(text: &str) -> Option<String> {
    text.lines().take(LEADING_SCAN_LINES).find_map(|line| {
        let clean = line.trim();
        let lower = clean.to_lowercase();
        let plausible = clean.chars().count() > 2
            && !ONLY_SYMBOLS.is_match(clean)
            && !BARE_NUMBER.is_match(clean)
            && !contains_any(&lower, LINE_STOPWORDS)
            && HAS_LETTERS.is_match(clean)
            && !contains_any(&lower, TOE_TYPE_WORDS);
        plausible.then(|| clean.to_string())
    })
}

/// `Ivan_Petrov_2301_0042_Report.pdf` -> `Ivan Petrov`
pub fn name_from_file_name(file_name: &str) -> Option<String> {
    let stem = file_name.replace("_Report.pdf", "").replace(".pdf", "");
    let stem = FILE_NAME_COUNTERS.replace_all(&stem, "");
    let name = stem.replace('_', " ").trim().to_string();
    (!name.is_empty() && HAS_LETTERS.is_match(&name)).then_some(name)
}
