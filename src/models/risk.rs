use serde::{Deserialize, Serialize};

use super::enums::{ArchStatus, Priority, RiskCategory, RiskLevel};

/// Every category starts here before findings add to it.
pub const BASELINE_SCORE: u32 = 20;
pub const MAX_SCORE: u32 = 100;

/// Five biomechanical risk scores on a 0..=100 scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskScores {
    pub degenerative: u32,
    pub spinal: u32,
    pub traumatic: u32,
    pub comfort: u32,
    pub progression: u32,
}

impl Default for RiskScores {
    fn default() -> Self {
        Self {
            degenerative: BASELINE_SCORE,
            spinal: BASELINE_SCORE,
            traumatic: BASELINE_SCORE,
            comfort: BASELINE_SCORE,
            progression: BASELINE_SCORE,
        }
    }
}

impl RiskScores {
    pub fn get(&self, category: RiskCategory) -> u32 {
        match category {
            RiskCategory::Degenerative => self.degenerative,
            RiskCategory::Spinal => self.spinal,
            RiskCategory::Traumatic => self.traumatic,
            RiskCategory::Comfort => self.comfort,
            RiskCategory::Progression => self.progression,
        }
    }

    pub fn add(&mut self, category: RiskCategory, points: u32) {
        let slot = match category {
            RiskCategory::Degenerative => &mut self.degenerative,
            RiskCategory::Spinal => &mut self.spinal,
            RiskCategory::Traumatic => &mut self.traumatic,
            RiskCategory::Comfort => &mut self.comfort,
            RiskCategory::Progression => &mut self.progression,
        };
        *slot = slot.saturating_add(points);
    }

    pub fn clamp(&mut self) {
        for category in RiskCategory::ALL {
            let score = self.get(category).min(MAX_SCORE);
            self.set(category, score);
        }
    }

    fn set(&mut self, category: RiskCategory, value: u32) {
        match category {
            RiskCategory::Degenerative => self.degenerative = value,
            RiskCategory::Spinal => self.spinal = value,
            RiskCategory::Traumatic => self.traumatic = value,
            RiskCategory::Comfort => self.comfort = value,
            RiskCategory::Progression => self.progression = value,
        }
    }

    /// `(category, score)` in display order.
    pub fn iter(&self) -> impl Iterator<Item = (RiskCategory, u32)> + '_ {
        RiskCategory::ALL.into_iter().map(|c| (c, self.get(c)))
    }

    /// Mean of the five scores.
    pub fn total(&self) -> f64 {
        let sum: u32 = self.iter().map(|(_, s)| s).sum();
        f64::from(sum) / RiskCategory::ALL.len() as f64
    }

    pub fn level(&self, category: RiskCategory) -> RiskLevel {
        RiskLevel::from_score(f64::from(self.get(category)))
    }

    pub fn overall_level(&self) -> RiskLevel {
        RiskLevel::from_score(self.total())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub title: String,
    pub description: String,
    pub priority: Priority,
}

/// Output of risk assessment: scores, arch classification and what drove them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub scores: RiskScores,
    pub arch_status: ArchStatus,
    pub average_arch_index: f64,
    pub length_diff: f64,
    pub width_diff: f64,
    /// Human-readable findings, one per triggered rule.
    pub findings: Vec<String>,
    pub recommendations: Vec<Recommendation>,
}

impl RiskAssessment {
    pub fn total_risk(&self) -> f64 {
        self.scores.total()
    }
}
