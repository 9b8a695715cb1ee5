//! Report palette and reference ranges.

use printpdf::{Color, Rgb};

use crate::models::{Priority, RiskLevel};

/// 8-bit sRGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb8(pub u8, pub u8, pub u8);

impl Rgb8 {
    /// `#RRGGBB` or `RRGGBB`.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        Some(Self(channel(0)?, channel(2)?, channel(4)?))
    }

    /// Mix with white; `amount` 0.0 is white, 1.0 is the colour itself.
    /// Stands in for alpha, which plain PDF fills don't carry.
    pub fn tint(self, amount: f32) -> Self {
        let amount = amount.clamp(0.0, 1.0);
        let mix = |c: u8| (255.0 - (255.0 - f32::from(c)) * amount).round() as u8;
        Self(mix(self.0), mix(self.1), mix(self.2))
    }

    pub fn color(self) -> Color {
        Color::Rgb(Rgb::new(
            f32::from(self.0) / 255.0,
            f32::from(self.1) / 255.0,
            f32::from(self.2) / 255.0,
            None,
        ))
    }
}

pub const WHITE: Rgb8 = Rgb8(0xFF, 0xFF, 0xFF);
pub const BG_LIGHT: Rgb8 = Rgb8(0xF8, 0xF9, 0xFA);
pub const TEXT_DARK: Rgb8 = Rgb8(0x1F, 0x29, 0x33);
pub const TEXT_MUTED: Rgb8 = Rgb8(0x6C, 0x75, 0x7D);
pub const PRIMARY: Rgb8 = Rgb8(0x2E, 0x86, 0xAB);
pub const PRIMARY_DARK: Rgb8 = Rgb8(0x1B, 0x5E, 0x6E);
pub const SECONDARY: Rgb8 = Rgb8(0xF1, 0x8F, 0x01);
pub const HIGH_RISK: Rgb8 = Rgb8(0xDC, 0x35, 0x45);
pub const MED_RISK: Rgb8 = Rgb8(0xFD, 0x7E, 0x14);
pub const LOW_RISK: Rgb8 = Rgb8(0x28, 0xA7, 0x45);
pub const BORDER: Rgb8 = Rgb8(0xDE, 0xE2, 0xE6);
pub const LIGHT_BLUE: Rgb8 = Rgb8(0xE8, 0xF4, 0xF8);
/// Parameter cells outside the reference range.
pub const WARNING_CELL: Rgb8 = Rgb8(0xFF, 0xF3, 0xCD);

pub fn level_color(level: RiskLevel) -> Rgb8 {
    match level {
        RiskLevel::High => HIGH_RISK,
        RiskLevel::Elevated => MED_RISK,
        RiskLevel::Low => LOW_RISK,
    }
}

pub fn priority_color(priority: Priority) -> Rgb8 {
    match priority {
        Priority::High => HIGH_RISK,
        Priority::Medium => MED_RISK,
        Priority::Low => LOW_RISK,
    }
}

/// Reference range printed in the parameter table. Values outside it are highlighted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormRange {
    pub min: f64,
    pub max: f64,
    pub label: &'static str,
}

impl NormRange {
    pub fn is_outside(&self, value: f64) -> bool {
        value < self.min || value > self.max
    }
}

pub const LENGTH_NORM: NormRange = NormRange { min: 230.0, max: 260.0, label: "230-260 mm" };
pub const WIDTH_NORM: NormRange = NormRange { min: 90.0, max: 105.0, label: "90-105 mm" };
pub const GIRTH_NORM: NormRange = NormRange { min: 230.0, max: 250.0, label: "230-250 mm" };
pub const ARCH_NORM: NormRange = NormRange { min: 0.26, max: 0.29, label: "0.26-0.29" };
pub const HEEL_NORM: NormRange = NormRange { min: 0.0, max: 4.0, label: "0-4 deg" };
pub const HALLUX_NORM: NormRange = NormRange { min: 0.0, max: 8.0, label: "0-8 deg" };

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_parsing() {
        assert_eq!(Rgb8::from_hex("#2E86AB"), Some(PRIMARY));
        assert_eq!(Rgb8::from_hex("fff3cd"), Some(WARNING_CELL));
        assert_eq!(Rgb8::from_hex("#12345"), None);
        assert_eq!(Rgb8::from_hex("#GGGGGG"), None);
    }

    #[test]
    fn tint_bounds() {
        assert_eq!(PRIMARY.tint(1.0), PRIMARY);
        assert_eq!(PRIMARY.tint(0.0), WHITE);
        let pale = HIGH_RISK.tint(0.1);
        assert!(pale.0 > HIGH_RISK.0 && pale.1 > HIGH_RISK.1);
    }

    #[test]
    fn level_colors() {
        assert_eq!(level_color(RiskLevel::High), HIGH_RISK);
        assert_eq!(level_color(RiskLevel::Elevated), MED_RISK);
        assert_eq!(priority_color(Priority::Low), LOW_RISK);
    }

    #[test]
    fn norm_bounds_are_inclusive() {
        assert!(!LENGTH_NORM.is_outside(230.0));
        assert!(!LENGTH_NORM.is_outside(260.0));
        assert!(LENGTH_NORM.is_outside(271.7));
        assert!(ARCH_NORM.is_outside(0.31));
        assert!(HEEL_NORM.is_outside(-5.0));
    }
}
