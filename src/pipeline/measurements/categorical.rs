use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

use crate::models::{Gender, ToeType};

static SHOE_WIDTH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)Shoe Width.*?([A-G])").unwrap());
static LABELED_SCAN_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Scan date\s*(\d{4}/\d{2}/\d{2})").unwrap());
static ANY_DATE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\d{4}/\d{2}/\d{2})").unwrap());
static LABELED_SCANNER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Scanner No\s*(\d+_\d+)").unwrap());
static FILE_NAME_SCANNER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"_(\d+_\d+)_").unwrap());

/// Width letter after a "Shoe Width" label. Case-insensitive, normalized to uppercase.
pub fn find_shoe_width(text: &str) -> Option<char> {
    SHOE_WIDTH
        .captures(text)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().chars().next())
        .map(|c| c.to_ascii_uppercase())
}

/// First toe-type keyword present, checked in [`ToeType::DETECTION_ORDER`].
pub fn find_toe_type(text: &str) -> Option<ToeType> {
    ToeType::DETECTION_ORDER
        .into_iter()
        .find(|t| text.contains(t.label()))
}

/// English labels are matched case-sensitively so "Female" never reads as "Male";
/// Russian labels are matched on the lowercased text.
pub fn find_gender(text: &str) -> Option<Gender> {
    let lower = text.to_lowercase();
    if text.contains("Male") || lower.contains("мужской") {
        Some(Gender::Male)
    } else if text.contains("Female") || lower.contains("женский") {
        Some(Gender::Female)
    } else {
        None
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanDate {
    /// Labeled `Scan date YYYY/MM/DD`, reformatted to `DD.MM.YYYY`.
    Labeled(String),
    /// Labeled but not a real calendar date; kept verbatim.
    LabeledRaw(String),
    /// First `YYYY/MM/DD` anywhere in the text; kept verbatim.
    Unlabeled(String),
}

impl ScanDate {
    pub fn value(&self) -> &str {
        match self {
            Self::Labeled(v) | Self::LabeledRaw(v) | Self::Unlabeled(v) => v,
        }
    }
}

pub fn find_scan_date(text: &str) -> Option<ScanDate> {
    if let Some(raw) = LABELED_SCAN_DATE.captures(text).and_then(|c| c.get(1)) {
        let raw = raw.as_str();
        return Some(match NaiveDate::parse_from_str(raw, "%Y/%m/%d") {
            Ok(date) => ScanDate::Labeled(date.format("%d.%m.%Y").to_string()),
            Err(_) => ScanDate::LabeledRaw(raw.to_string()),
        });
    }

    ANY_DATE
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| ScanDate::Unlabeled(m.as_str().to_string()))
}

/// Scanner id from a `Scanner No` label.
pub fn find_scanner_id(text: &str) -> Option<String> {
    LABELED_SCANNER
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

/// Scanner id embedded in an export file name, e.g. `Anna_2301_0042_Report.pdf`.
pub fn scanner_id_from_file_name(file_name: &str) -> Option<String> {
    FILE_NAME_SCANNER
        .captures(file_name)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}
