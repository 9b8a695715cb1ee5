//! Label-anchored fallback for exports whose tables survived extraction intact.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use super::MeasurementField;
use crate::models::Bilateral;

static FOOT_LENGTH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)Foot Length.*?\(mm\).*?(\d+\.\d+).*?(\d+\.\d+)").unwrap()
});
static FOOT_WIDTH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)Foot Width.*?\(mm\).*?(\d+\.\d+).*?(\d+\.\d+)").unwrap()
});
static BALL_GIRTH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)Ball Girth.*?\(mm\).*?(\d+\.\d+).*?(\d+\.\d+)").unwrap()
});
static ARCH_INDEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)Arch Index.*?(\d+\.\d+).*?(\d+\.\d+)").unwrap());
static HALLUX_ANGLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)Hallux Angle.*?(\d+\.\d+).*?(\d+\.\d+)").unwrap());
static HEEL_ANGLE_INV_EVE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)Heel Angle.*?(\d+).*?Inv.*?(\d+).*?Eve").unwrap());
static HEEL_ANGLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)Heel Angle.*?(\d+).*?(\d+)").unwrap());

fn pair<T: std::str::FromStr + Copy>(caps: Captures<'_>) -> Option<Bilateral<T>> {
    let left = caps.get(1)?.as_str().parse().ok()?;
    let right = caps.get(2)?.as_str().parse().ok()?;
    Some(Bilateral::new(left, right))
}

/// Left/right pair following the label for `field`, for the fields printed in
/// decimal form.
pub fn find_labeled_pair(text: &str, field: MeasurementField) -> Option<Bilateral<f64>> {
    let pattern = match field {
        MeasurementField::FootLength => &FOOT_LENGTH,
        MeasurementField::FootWidth => &FOOT_WIDTH,
        MeasurementField::BallGirth => &BALL_GIRTH,
        MeasurementField::ArchIndex => &ARCH_INDEX,
        MeasurementField::HalluxAngle => &HALLUX_ANGLE,
        MeasurementField::HeelAngle | MeasurementField::ShoeSize => return None,
    };
    pattern.captures(text).and_then(pair)
}

/// Heel angles, preferring the `... Inv ... Eve` layout over a bare pair.
pub fn find_labeled_heel_angle(text: &str) -> Option<Bilateral<i32>> {
    HEEL_ANGLE_INV_EVE
        .captures(text)
        .and_then(pair)
        .or_else(|| HEEL_ANGLE.captures(text).and_then(pair))
}
