use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid {field} value: {value}")]
pub struct InvalidEnum {
    pub field: String,
    pub value: String,
}

/// Macro to generate enum with as_str + label + std::str::FromStr pattern
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal, $label:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }

            /// Human-readable label used in rendered reports.
            pub fn label(&self) -> &'static str {
                match self {
                    $(Self::$variant => $label),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = InvalidEnum;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(InvalidEnum {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.label())
            }
        }
    };
}

str_enum!(ToeType {
    Egyptian => "egyptian", "Egyptian",
    Roman => "roman", "Roman",
    Greek => "greek", "Greek",
    Square => "square", "Square",
});

str_enum!(Gender {
    Male => "male", "Male",
    Female => "female", "Female",
});

str_enum!(RiskCategory {
    Degenerative => "degenerative", "Degenerative",
    Spinal => "spinal", "Spinal",
    Traumatic => "traumatic", "Traumatic",
    Comfort => "comfort", "Comfort",
    Progression => "progression", "Progression",
});

str_enum!(RiskLevel {
    Low => "low", "LOW",
    Elevated => "elevated", "MODERATE",
    High => "high", "HIGH",
});

str_enum!(ArchStatus {
    HighArch => "high_arch", "High arch (pes cavus)",
    LowArch => "low_arch", "Low arch (flat foot)",
    Normal => "normal", "Normal arch",
});

str_enum!(Priority {
    High => "high", "High priority",
    Medium => "medium", "Medium priority",
    Low => "low", "General advice",
});

impl ToeType {
    /// Order matters: the first keyword found in the text wins.
    pub const DETECTION_ORDER: [ToeType; 4] =
        [Self::Egyptian, Self::Roman, Self::Greek, Self::Square];
}

impl RiskCategory {
    /// Fixed display order (radar axes, score table rows).
    pub const ALL: [RiskCategory; 5] = [
        Self::Degenerative,
        Self::Spinal,
        Self::Traumatic,
        Self::Comfort,
        Self::Progression,
    ];

    pub fn description(&self) -> &'static str {
        match self {
            Self::Degenerative => "Risk of arthrosis and degenerative joint changes",
            Self::Spinal => "Impact on posture and spinal health",
            Self::Traumatic => "Likelihood of injury under load",
            Self::Comfort => "Difficulty finding comfortable footwear",
            Self::Progression => "Likelihood of existing traits worsening",
        }
    }
}

impl RiskLevel {
    pub fn from_score(score: f64) -> Self {
        if score >= 70.0 {
            Self::High
        } else if score >= 50.0 {
            Self::Elevated
        } else {
            Self::Low
        }
    }
}

impl Priority {
    /// Sort key: high first.
    pub fn rank(&self) -> u8 {
        match self {
            Self::High => 0,
            Self::Medium => 1,
            Self::Low => 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn toe_type_round_trip() {
        for (variant, s) in [
            (ToeType::Egyptian, "egyptian"),
            (ToeType::Roman, "roman"),
            (ToeType::Greek, "greek"),
            (ToeType::Square, "square"),
        ] {
            assert_eq!(variant.as_str(), s);
            assert_eq!(ToeType::from_str(s).unwrap(), variant);
        }
    }

    #[test]
    fn unknown_value_is_rejected() {
        let err = Gender::from_str("other").unwrap_err();
        assert_eq!(err.field, "Gender");
        assert_eq!(err.value, "other");
    }

    #[test]
    fn risk_level_thresholds() {
        assert_eq!(RiskLevel::from_score(0.0), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(49.9), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(50.0), RiskLevel::Elevated);
        assert_eq!(RiskLevel::from_score(69.9), RiskLevel::Elevated);
        assert_eq!(RiskLevel::from_score(70.0), RiskLevel::High);
        assert_eq!(RiskLevel::from_score(100.0), RiskLevel::High);
    }

    #[test]
    fn priority_rank_orders_high_first() {
        assert!(Priority::High.rank() < Priority::Medium.rank());
        assert!(Priority::Medium.rank() < Priority::Low.rank());
    }

    #[test]
    fn serializes_snake_case() {
        let json = serde_json::to_string(&ArchStatus::HighArch).unwrap();
        assert_eq!(json, "\"high_arch\"");
    }

    #[test]
    fn display_uses_label() {
        assert_eq!(ToeType::Greek.to_string(), "Greek");
        assert_eq!(RiskLevel::Elevated.to_string(), "MODERATE");
    }
}
