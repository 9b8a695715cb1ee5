//! Ranged numeric matching.
//!
//! Scanner exports print measurement tables whose labels and values drift apart
//! during text extraction. Values of each kind still land in a characteristic
//! range, so candidates are bucketed by range and taken in document order:
//! first in-range value is the left foot, second the right.

use std::sync::LazyLock;

use regex::Regex;

use super::MeasurementField;
use crate::models::Bilateral;

static FLOAT_TOKEN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+\.\d+").unwrap());
static INT_TOKEN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b\d+\b").unwrap());

/// Every numeric token in the text, in document order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NumericTokens {
    /// Tokens with a decimal point (`271.7`).
    pub floats: Vec<f64>,
    /// Word-bounded digit runs. `271.7` yields both `271` and `7`.
    pub ints: Vec<i64>,
}

impl NumericTokens {
    pub fn scan(text: &str) -> Self {
        let floats = FLOAT_TOKEN
            .find_iter(text)
            .filter_map(|m| m.as_str().parse::<f64>().ok())
            .collect();
        let ints = INT_TOKEN
            .find_iter(text)
            .filter_map(|m| m.as_str().parse::<i64>().ok())
            .collect();
        Self { floats, ints }
    }

    /// Floats followed by ints, as plain values.
    pub fn all_values(&self) -> impl Iterator<Item = f64> + '_ {
        self.floats
            .iter()
            .copied()
            .chain(self.ints.iter().map(|&i| i as f64))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenPool {
    Floats,
    Ints,
}

/// What to do when exactly one candidate is in range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SingleCandidate {
    Ignore,
    /// Use it for the left foot and `value + offset` for the right.
    MirrorWithOffset(f64),
}

/// One row of the range decision table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeRule {
    pub field: MeasurementField,
    pub pool: TokenPool,
    pub min: f64,
    pub max: f64,
    pub single: SingleCandidate,
}

impl RangeRule {
    pub fn contains(&self, value: f64) -> bool {
        (self.min..=self.max).contains(&value)
    }

    /// In-range candidates from this rule's token pool, in document order.
    pub fn candidates(&self, tokens: &NumericTokens) -> Vec<f64> {
        let values: Box<dyn Iterator<Item = f64> + '_> = match self.pool {
            TokenPool::Floats => Box::new(tokens.floats.iter().copied()),
            TokenPool::Ints => Box::new(tokens.ints.iter().map(|&i| i as f64)),
        };
        values.filter(|v| self.contains(*v)).collect()
    }

    /// Left/right pair from candidates, if the rule can produce one.
    pub fn resolve(&self, candidates: &[f64]) -> Option<Bilateral<f64>> {
        match (candidates, self.single) {
            ([left, right, ..], _) => Some(Bilateral::new(*left, *right)),
            ([only], SingleCandidate::MirrorWithOffset(offset)) => {
                Some(Bilateral::new(*only, *only + offset))
            }
            _ => None,
        }
    }
}

/// Range table, applied top to bottom. Later rows may overlap earlier ones
/// (arch index values also fall inside the hallux range); each field keeps
/// its own first two candidates regardless.
pub const RANGE_RULES: [RangeRule; 6] = [
    RangeRule {
        field: MeasurementField::FootLength,
        pool: TokenPool::Floats,
        min: 230.0,
        max: 300.0,
        single: SingleCandidate::MirrorWithOffset(1.0),
    },
    RangeRule {
        field: MeasurementField::FootWidth,
        pool: TokenPool::Floats,
        min: 80.0,
        max: 120.0,
        single: SingleCandidate::Ignore,
    },
    RangeRule {
        field: MeasurementField::BallGirth,
        pool: TokenPool::Floats,
        min: 220.0,
        max: 270.0,
        single: SingleCandidate::Ignore,
    },
    RangeRule {
        field: MeasurementField::ArchIndex,
        pool: TokenPool::Floats,
        min: 0.2,
        max: 0.4,
        single: SingleCandidate::Ignore,
    },
    RangeRule {
        field: MeasurementField::HeelAngle,
        pool: TokenPool::Ints,
        min: 0.0,
        max: 10.0,
        single: SingleCandidate::Ignore,
    },
    RangeRule {
        field: MeasurementField::HalluxAngle,
        pool: TokenPool::Floats,
        min: 0.0,
        max: 30.0,
        single: SingleCandidate::Ignore,
    },
];

/// Printed shoe sizes on scanner exports fall in this EU range.
pub const SHOE_SIZE_RANGE: (f64, f64) = (35.0, 50.0);

/// EU shoe size from foot length: `(len * 1.5 + 15.5) / 10`, to the nearest half size.
pub fn eu_shoe_size(foot_length_mm: f64) -> f64 {
    if foot_length_mm <= 0.0 {
        return 0.0;
    }
    let eu = (foot_length_mm * 1.5 + 15.5) / 10.0;
    (eu * 2.0).round_ties_even() / 2.0
}

/// First printed value that looks like a shoe size (floats searched before ints).
pub fn printed_shoe_size(tokens: &NumericTokens) -> Option<f64> {
    let (min, max) = SHOE_SIZE_RANGE;
    tokens.all_values().find(|v| (min..=max).contains(v))
}
