use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::enums::{Gender, ToeType};

/// A left/right measurement pair.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Bilateral<T> {
    pub left: T,
    pub right: T,
}

impl<T: Copy> Bilateral<T> {
    pub fn new(left: T, right: T) -> Self {
        Self { left, right }
    }

    /// Same value on both sides.
    pub fn both(value: T) -> Self {
        Self { left: value, right: value }
    }

    pub fn map<U, F: Fn(T) -> U>(self, f: F) -> Bilateral<U> {
        Bilateral {
            left: f(self.left),
            right: f(self.right),
        }
    }

    /// `(side label, value)` pairs, left first.
    pub fn sides(&self) -> [(&'static str, T); 2] {
        [("Left", self.left), ("Right", self.right)]
    }
}

impl Bilateral<f64> {
    pub fn abs_diff(&self) -> f64 {
        (self.left - self.right).abs()
    }

    pub fn mean(&self) -> f64 {
        (self.left + self.right) / 2.0
    }

    pub fn max(&self) -> f64 {
        self.left.max(self.right)
    }
}

/// Measurements parsed from one scanner export.
///
/// Every field starts at zero/empty and is overwritten as heuristics match.
/// Nothing ties the fields together: left may equal right, values may be implausible.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FootScanData {
    pub client_name: String,
    /// mm
    pub foot_length: Bilateral<f64>,
    /// mm
    pub foot_width: Bilateral<f64>,
    /// mm
    pub ball_girth: Bilateral<f64>,
    pub arch_index: Bilateral<f64>,
    /// degrees, whole numbers on scanner exports
    pub heel_angle: Bilateral<i32>,
    /// degrees
    pub hallux_angle: Bilateral<f64>,
    /// EU sizing
    pub shoe_size: Bilateral<f64>,
    /// Width letter A..G
    pub shoe_width: Option<char>,
    pub toe_type: Option<ToeType>,
    pub gender: Option<Gender>,
    pub scan_date: String,
    pub scanner_id: String,
}

impl FootScanData {
    /// A report needs at least the left foot length.
    pub fn is_usable(&self) -> bool {
        self.foot_length.left > 0.0
    }

    /// Record used when the document could not be read at all:
    /// name derived from the file name, scan date set to `today`.
    pub fn fallback(source_name: &str, today: NaiveDate) -> Self {
        let client_name = source_name
            .replace("_Report.pdf", "")
            .replace('_', " ")
            .trim()
            .to_string();
        Self {
            client_name,
            scan_date: today.format("%d.%m.%Y").to_string(),
            ..Self::default()
        }
    }

    pub fn shoe_width_label(&self) -> String {
        self.shoe_width.map(String::from).unwrap_or_default()
    }

    pub fn toe_type_label(&self) -> &'static str {
        self.toe_type.map(|t| t.label()).unwrap_or("")
    }

    pub fn gender_label(&self) -> &'static str {
        self.gender.map(|g| g.label()).unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_record_is_empty_and_unusable() {
        let data = FootScanData::default();
        assert!(data.client_name.is_empty());
        assert_eq!(data.foot_length, Bilateral::new(0.0, 0.0));
        assert_eq!(data.heel_angle, Bilateral::new(0, 0));
        assert!(data.shoe_width.is_none());
        assert!(!data.is_usable());
    }

    #[test]
    fn usable_once_left_length_known() {
        let data = FootScanData {
            foot_length: Bilateral::new(250.0, 0.0),
            ..Default::default()
        };
        assert!(data.is_usable());
    }

    #[test]
    fn fallback_uses_file_name_and_today() {
        let today = NaiveDate::from_ymd_opt(2026, 3, 9).unwrap();
        let data = FootScanData::fallback("Ivan_Petrov_Report.pdf", today);
        assert_eq!(data.client_name, "Ivan Petrov");
        assert_eq!(data.scan_date, "09.03.2026");
        assert!(!data.is_usable());
    }

    #[test]
    fn bilateral_helpers() {
        let pair = Bilateral::new(271.7, 273.8);
        assert!((pair.abs_diff() - 2.1).abs() < 1e-9);
        assert!((pair.mean() - 272.75).abs() < 1e-9);
        assert_eq!(pair.max(), 273.8);
        assert_eq!(pair.map(|v| v > 272.0), Bilateral::new(false, true));
        assert_eq!(Bilateral::both(3).sides(), [("Left", 3), ("Right", 3)]);
    }

    #[test]
    fn labels_for_missing_categoricals_are_empty() {
        let data = FootScanData::default();
        assert_eq!(data.shoe_width_label(), "");
        assert_eq!(data.toe_type_label(), "");
        assert_eq!(data.gender_label(), "");
    }

    #[test]
    fn serializes_with_nested_sides() {
        let data = FootScanData {
            client_name: "Anna".into(),
            foot_length: Bilateral::new(250.5, 251.0),
            toe_type: Some(ToeType::Greek),
            ..Default::default()
        };
        let json = serde_json::to_value(&data).unwrap();
        assert_eq!(json["foot_length"]["left"], 250.5);
        assert_eq!(json["toe_type"], "greek");
        assert_eq!(json["shoe_width"], serde_json::Value::Null);
    }
}
