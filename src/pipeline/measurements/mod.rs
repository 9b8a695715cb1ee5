//! Measurement extraction from scanner export text.
//!
//! Extractors run in a fixed order and each one only overwrites the fields it
//! matches. Every successful match is logged as a [`FieldMatch`] so a debug
//! dump shows which heuristic produced each value.

pub mod categorical;
pub mod labeled;
pub mod name;
pub mod numeric;

pub use categorical::*;
pub use labeled::*;
pub use name::*;
pub use numeric::*;

use serde::{Deserialize, Serialize};

use crate::models::{Bilateral, FootScanData};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeasurementField {
    FootLength,
    FootWidth,
    BallGirth,
    ArchIndex,
    HeelAngle,
    HalluxAngle,
    ShoeSize,
}

impl MeasurementField {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FootLength => "foot_length",
            Self::FootWidth => "foot_width",
            Self::BallGirth => "ball_girth",
            Self::ArchIndex => "arch_index",
            Self::HeelAngle => "heel_angle",
            Self::HalluxAngle => "hallux_angle",
            Self::ShoeSize => "shoe_size",
        }
    }

    /// Fields the labeled fallback knows a decimal pattern for.
    pub const LABELED_DECIMAL: [MeasurementField; 5] = [
        Self::FootLength,
        Self::FootWidth,
        Self::BallGirth,
        Self::ArchIndex,
        Self::HalluxAngle,
    ];
}

/// Which heuristic produced a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStrategy {
    Name(NameSource),
    RangedTable,
    RangedSingleMirrored,
    DerivedFromLength,
    PrintedShoeSize,
    LabeledScanDate,
    UnlabeledScanDate,
    ScannerLabel,
    ScannerFileName,
    Keyword,
    LabeledLine,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldMatch {
    pub field: String,
    pub strategy: MatchStrategy,
    pub value: String,
}

impl FieldMatch {
    fn new(field: &str, strategy: MatchStrategy, value: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            strategy,
            value: value.into(),
        }
    }

    fn pair<T: std::fmt::Display>(
        field: MeasurementField,
        strategy: MatchStrategy,
        values: &Bilateral<T>,
    ) -> Self {
        Self::new(
            field.as_str(),
            strategy,
            format!("{} / {}", values.left, values.right),
        )
    }
}

/// Parsed record plus the trail of matches that built it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MeasurementOutcome {
    pub data: FootScanData,
    pub matches: Vec<FieldMatch>,
}

fn set_decimal(data: &mut FootScanData, field: MeasurementField, values: Bilateral<f64>) {
    match field {
        MeasurementField::FootLength => data.foot_length = values,
        MeasurementField::FootWidth => data.foot_width = values,
        MeasurementField::BallGirth => data.ball_girth = values,
        MeasurementField::ArchIndex => data.arch_index = values,
        MeasurementField::HalluxAngle => data.hallux_angle = values,
        MeasurementField::ShoeSize => data.shoe_size = values,
        // Scanner prints whole degrees; the fractional part is dropped.
        MeasurementField::HeelAngle => data.heel_angle = values.map(|v| v as i32),
    }
}

/// Parse a scanner export's text into a [`FootScanData`].
///
/// `source_name` is the export's file name; it supplies the patient name and
/// scanner id when the text does not.
pub fn extract_measurements(text: &str, source_name: &str) -> MeasurementOutcome {
    let mut data = FootScanData::default();
    let mut matches = Vec::new();

    if let Some((name, source)) = find_client_name(text, source_name) {
        matches.push(FieldMatch::new("client_name", MatchStrategy::Name(source), &name));
        data.client_name = name;
    }

    let tokens = NumericTokens::scan(text);
    for rule in &RANGE_RULES {
        let candidates = rule.candidates(&tokens);
        if let Some(values) = rule.resolve(&candidates) {
            let strategy = if candidates.len() == 1 {
                MatchStrategy::RangedSingleMirrored
            } else {
                MatchStrategy::RangedTable
            };
            matches.push(FieldMatch::pair(rule.field, strategy, &values));
            set_decimal(&mut data, rule.field, values);
        }
    }

    apply_shoe_size(&mut data, &tokens, &mut matches);
    apply_categoricals(&mut data, text, source_name, &mut matches);

    if data.foot_length.left == 0.0 {
        tracing::debug!(source = source_name, "Ranged table found no foot length, trying labeled lines");
        apply_labeled_fallback(&mut data, text, &mut matches);
    }

    if !data.is_usable() {
        tracing::warn!(source = source_name, "No foot length found in document text");
    }

    for m in &matches {
        tracing::debug!(
            source = source_name,
            field = %m.field,
            strategy = ?m.strategy,
            value = %m.value,
            "Field matched"
        );
    }

    MeasurementOutcome { data, matches }
}

fn apply_shoe_size(data: &mut FootScanData, tokens: &NumericTokens, matches: &mut Vec<FieldMatch>) {
    let derived = data.foot_length.map(eu_shoe_size);
    data.shoe_size = derived;
    if data.foot_length.left > 0.0 {
        matches.push(FieldMatch::pair(
            MeasurementField::ShoeSize,
            MatchStrategy::DerivedFromLength,
            &derived,
        ));
    }

    if let Some(printed) = printed_shoe_size(tokens) {
        data.shoe_size = Bilateral::both(printed);
        matches.push(FieldMatch::pair(
            MeasurementField::ShoeSize,
            MatchStrategy::PrintedShoeSize,
            &data.shoe_size,
        ));
    }
}

fn apply_categoricals(
    data: &mut FootScanData,
    text: &str,
    source_name: &str,
    matches: &mut Vec<FieldMatch>,
) {
    if let Some(width) = find_shoe_width(text) {
        data.shoe_width = Some(width);
        matches.push(FieldMatch::new("shoe_width", MatchStrategy::Keyword, width));
    }

    if let Some(toe) = find_toe_type(text) {
        data.toe_type = Some(toe);
        matches.push(FieldMatch::new("toe_type", MatchStrategy::Keyword, toe.as_str()));
    }

    if let Some(gender) = find_gender(text) {
        data.gender = Some(gender);
        matches.push(FieldMatch::new("gender", MatchStrategy::Keyword, gender.as_str()));
    }

    if let Some(date) = find_scan_date(text) {
        let strategy = match date {
            ScanDate::Labeled(_) | ScanDate::LabeledRaw(_) => MatchStrategy::LabeledScanDate,
            ScanDate::Unlabeled(_) => MatchStrategy::UnlabeledScanDate,
        };
        matches.push(FieldMatch::new("scan_date", strategy, date.value()));
        data.scan_date = date.value().to_string();
    }

    let scanner = find_scanner_id(text)
        .map(|id| (id, MatchStrategy::ScannerLabel))
        .or_else(|| {
            scanner_id_from_file_name(source_name).map(|id| (id, MatchStrategy::ScannerFileName))
        });
    if let Some((id, strategy)) = scanner {
        matches.push(FieldMatch::new("scanner_id", strategy, &id));
        data.scanner_id = id;
    }
}

fn apply_labeled_fallback(data: &mut FootScanData, text: &str, matches: &mut Vec<FieldMatch>) {
    for field in MeasurementField::LABELED_DECIMAL {
        if let Some(values) = find_labeled_pair(text, field) {
            matches.push(FieldMatch::pair(field, MatchStrategy::LabeledLine, &values));
            set_decimal(data, field, values);
        }
    }

    if let Some(heel) = find_labeled_heel_angle(text) {
        matches.push(FieldMatch::pair(
            MeasurementField::HeelAngle,
            MatchStrategy::LabeledLine,
            &heel,
        ));
        data.heel_angle = heel;
    }

    if data.foot_length.left > 0.0 && data.shoe_size.left == 0.0 {
        data.shoe_size = data.foot_length.map(eu_shoe_size);
        matches.push(FieldMatch::pair(
            MeasurementField::ShoeSize,
            MatchStrategy::DerivedFromLength,
            &data.shoe_size,
        ));
    }
}
