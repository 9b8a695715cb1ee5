//! Biomechanical risk scoring and personalised recommendations.
//!
//! Pure functions over a parsed [`FootScanData`]. Scores start at a
//! baseline, rules add points, and every score is clamped at the end.

use crate::models::{
    ArchStatus, Bilateral, FootScanData, Priority, Recommendation, RiskAssessment, RiskCategory,
    RiskScores,
};

// ═══════════════════════════════════════════════════════════
// Thresholds
// ═══════════════════════════════════════════════════════════

/// Average arch index below this is a high arch.
pub const HIGH_ARCH_BELOW: f64 = 0.26;
/// Average arch index above this is a low (flat) arch.
pub const LOW_ARCH_ABOVE: f64 = 0.29;
/// mm
pub const LENGTH_ASYMMETRY_MM: f64 = 3.0;
/// mm
pub const WIDTH_ASYMMETRY_MM: f64 = 2.0;
/// degrees, absolute
pub const HEEL_DEVIATION_DEG: i32 = 4;
/// degrees
pub const HALLUX_MODERATE_DEG: f64 = 8.0;
/// degrees
pub const HALLUX_PRONOUNCED_DEG: f64 = 15.0;

pub fn classify_arch(average_arch_index: f64) -> ArchStatus {
    if average_arch_index < HIGH_ARCH_BELOW {
        ArchStatus::HighArch
    } else if average_arch_index > LOW_ARCH_ABOVE {
        ArchStatus::LowArch
    } else {
        ArchStatus::Normal
    }
}

fn has_heel_deviation(heel: &Bilateral<i32>) -> bool {
    heel.sides().iter().any(|(_, a)| a.abs() > HEEL_DEVIATION_DEG)
}

fn has_hallux_deviation(hallux: &Bilateral<f64>) -> bool {
    hallux.sides().iter().any(|(_, a)| *a > HALLUX_MODERATE_DEG)
}

// ═══════════════════════════════════════════════════════════
// Scoring
// ═══════════════════════════════════════════════════════════

pub fn assess_risk(data: &FootScanData) -> RiskAssessment {
    let mut scores = RiskScores::default();
    let mut findings = Vec::new();

    let average_arch_index = data.arch_index.mean();
    let arch_status = classify_arch(average_arch_index);
    match arch_status {
        ArchStatus::HighArch => {
            scores.add(RiskCategory::Degenerative, 25);
            scores.add(RiskCategory::Spinal, 20);
        }
        ArchStatus::LowArch => {
            scores.add(RiskCategory::Traumatic, 20);
            scores.add(RiskCategory::Comfort, 15);
        }
        ArchStatus::Normal => {}
    }
    findings.push(format!("{}: {:.3}", arch_status.label(), average_arch_index));

    let length_diff = data.foot_length.abs_diff();
    if length_diff > LENGTH_ASYMMETRY_MM {
        scores.add(RiskCategory::Spinal, 15);
        scores.add(RiskCategory::Progression, 10);
        findings.push(format!("Length asymmetry: {length_diff:.1} mm"));
    }

    let width_diff = data.foot_width.abs_diff();
    if width_diff > WIDTH_ASYMMETRY_MM {
        scores.add(RiskCategory::Comfort, 15);
        findings.push(format!("Width asymmetry: {width_diff:.1} mm"));
    }

    for (side, angle) in data.heel_angle.sides() {
        if angle.abs() > HEEL_DEVIATION_DEG {
            scores.add(RiskCategory::Traumatic, 10);
            scores.add(RiskCategory::Comfort, 8);
            findings.push(format!("{side} heel deviation: {angle}°"));
        }
    }

    for (side, angle) in data.hallux_angle.sides() {
        if angle > HALLUX_PRONOUNCED_DEG {
            scores.add(RiskCategory::Degenerative, 20);
            scores.add(RiskCategory::Comfort, 15);
            findings.push(format!("{side} hallux valgus: {angle:.1}° (pronounced)"));
        } else if angle > HALLUX_MODERATE_DEG {
            scores.add(RiskCategory::Degenerative, 10);
            scores.add(RiskCategory::Comfort, 8);
            findings.push(format!("{side} hallux valgus: {angle:.1}° (moderate)"));
        }
    }

    scores.clamp();

    for finding in &findings {
        tracing::debug!(client = %data.client_name, finding = %finding, "Risk finding");
    }

    for (category, score) in scores.iter() {
        tracing::debug!(
            category = category.as_str(),
            score,
            level = scores.level(category).as_str(),
            "Risk score"
        );
    }

    let recommendations = generate_recommendations(data, &scores, arch_status);

    tracing::info!(
        client = %data.client_name,
        arch = arch_status.as_str(),
        total_risk = scores.total(),
        findings = findings.len(),
        recommendations = recommendations.len(),
        "Risk assessment complete"
    );

    RiskAssessment {
        scores,
        arch_status,
        average_arch_index,
        length_diff,
        width_diff,
        findings,
        recommendations,
    }
}

// ═══════════════════════════════════════════════════════════
// Recommendations
// ═══════════════════════════════════════════════════════════

fn rec(title: &str, description: String, priority: Priority) -> Recommendation {
    Recommendation {
        title: title.to_string(),
        description,
        priority,
    }
}

/// Personalised advice, sorted high priority first. Scores are accepted for
/// parity with the rendered report but the rules only look at measurements.
pub fn generate_recommendations(
    data: &FootScanData,
    _scores: &RiskScores,
    arch_status: ArchStatus,
) -> Vec<Recommendation> {
    let mut recs = Vec::new();

    recs.push(match arch_status {
        ArchStatus::HighArch => rec(
            "Footwear for a high arch",
            "Choose shoes with extra cushioning and a soft insole. Look for models \
             labelled 'Neutral Cushioning' or 'High Arch Support'. Avoid rigid shoes \
             with flat soles."
                .into(),
            Priority::High,
        ),
        ArchStatus::LowArch => rec(
            "Footwear for flat feet",
            "Choose shoes with arch support and stabilisation. Look for models labelled \
             'Stability' or 'Motion Control'. Orthotic insoles with arch support are \
             essential."
                .into(),
            Priority::High,
        ),
        ArchStatus::Normal => rec(
            "Standard footwear",
            "Most shoe types are suitable. Models with moderate arch support and \
             cushioning are recommended."
                .into(),
            Priority::Medium,
        ),
    });

    if let Some(width) = data.shoe_width {
        recs.push(rec(
            "Shoe width",
            format!(
                "Your size: {:.1} EU. Recommended width: {width}.",
                data.shoe_size.left
            ),
            Priority::Medium,
        ));
    }

    if has_heel_deviation(&data.heel_angle) {
        recs.push(rec(
            "Heel position correction",
            "With heel deviation, exercises that strengthen the ankle muscles and \
             custom orthotic insoles with rearfoot correction are recommended."
                .into(),
            Priority::Medium,
        ));
    }

    if has_hallux_deviation(&data.hallux_angle) {
        let hallux_max = data.hallux_angle.max();
        let severity = if hallux_max > HALLUX_PRONOUNCED_DEG {
            "pronounced"
        } else {
            "moderate"
        };
        recs.push(rec(
            "Hallux valgus prevention",
            format!(
                "With {severity} valgus deformity ({hallux_max:.1} deg) the following is \
                 recommended: shoes with a wide toe box, toe separators and exercises \
                 to strengthen the foot muscles."
            ),
            Priority::High,
        ));
    }

    let length_diff = data.foot_length.abs_diff();
    let width_diff = data.foot_width.abs_diff();
    if length_diff > LENGTH_ASYMMETRY_MM || width_diff > WIDTH_ASYMMETRY_MM {
        recs.push(rec(
            "Asymmetry correction",
            format!(
                "Noticeable foot asymmetry (length: {length_diff:.1} mm, width: \
                 {width_diff:.1} mm). Recommended: individual insoles for each foot, \
                 posture control and an orthopaedic consultation."
            ),
            Priority::Medium,
        ));
    }

    recs.push(rec(
        "Foot exercises",
        "Daily exercises: rolling a ball under the foot, calf raises and calf \
         stretches. Walk barefoot on uneven surfaces such as sand or grass."
            .into(),
        Priority::Low,
    ));

    recs.push(rec(
        "Regular monitoring",
        format!(
            "Repeat the examination in 6-12 months. See an orthopaedist if pain or \
             discomfort appears. Your scan ID: {}",
            data.scanner_id
        ),
        Priority::Low,
    ));

    // Vec::sort_by_key is stable, so rules keep their order within a priority.
    recs.sort_by_key(|r| r.priority.rank());
    recs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RiskLevel;

    fn normal_feet() -> FootScanData {
        FootScanData {
            client_name: "Anna".into(),
            foot_length: Bilateral::new(250.0, 251.0),
            foot_width: Bilateral::new(100.0, 101.0),
            arch_index: Bilateral::new(0.27, 0.28),
            heel_angle: Bilateral::new(2, 3),
            hallux_angle: Bilateral::new(5.0, 6.0),
            scanner_id: "2301_0042".into(),
            ..Default::default()
        }
    }

    #[test]
    fn healthy_feet_stay_at_baseline() {
        let assessment = assess_risk(&normal_feet());
        assert_eq!(assessment.scores, RiskScores::default());
        assert_eq!(assessment.arch_status, ArchStatus::Normal);
        assert_eq!(assessment.scores.overall_level(), RiskLevel::Low);
        assert!((assessment.total_risk() - 20.0).abs() < f64::EPSILON);
    }

    #[test]
    fn arch_boundaries_are_normal() {
        assert_eq!(classify_arch(0.26), ArchStatus::Normal);
        assert_eq!(classify_arch(0.29), ArchStatus::Normal);
        assert_eq!(classify_arch(0.259), ArchStatus::HighArch);
        assert_eq!(classify_arch(0.291), ArchStatus::LowArch);
    }

    #[test]
    fn high_arch_scores() {
        let data = FootScanData {
            arch_index: Bilateral::new(0.22, 0.24),
            ..normal_feet()
        };
        let scores = assess_risk(&data).scores;
        assert_eq!(scores.degenerative, 45);
        assert_eq!(scores.spinal, 40);
        assert_eq!(scores.traumatic, 20);
    }

    #[test]
    fn worst_case_is_clamped() {
        let data = FootScanData {
            foot_length: Bilateral::new(250.0, 260.0),
            foot_width: Bilateral::new(95.0, 100.0),
            arch_index: Bilateral::new(0.35, 0.38),
            heel_angle: Bilateral::new(-7, 8),
            hallux_angle: Bilateral::new(18.0, 22.0),
            ..normal_feet()
        };
        let assessment = assess_risk(&data);
        let scores = assessment.scores;
        // comfort: 20 + 15 (arch) + 15 (width) + 16 (heel) + 30 (hallux) = 96
        assert_eq!(scores.comfort, 96);
        // degenerative: 20 + 40 (hallux)
        assert_eq!(scores.degenerative, 60);
        // traumatic: 20 + 20 (arch) + 20 (heel)
        assert_eq!(scores.traumatic, 60);
        assert_eq!(scores.spinal, 35);
        assert_eq!(scores.progression, 30);
        assert!(scores.iter().all(|(_, s)| s <= 100));
        assert_eq!(scores.level(RiskCategory::Comfort), RiskLevel::High);
        assert!((assessment.length_diff - 10.0).abs() < 1e-9);
    }

    #[test]
    fn negative_heel_angle_counts_by_magnitude() {
        let data = FootScanData {
            heel_angle: Bilateral::new(-5, 0),
            ..normal_feet()
        };
        let scores = assess_risk(&data).scores;
        assert_eq!(scores.traumatic, 30);
        assert_eq!(scores.comfort, 28);
    }

    #[test]
    fn moderate_and_pronounced_hallux() {
        let data = FootScanData {
            hallux_angle: Bilateral::new(10.0, 16.0),
            ..normal_feet()
        };
        let assessment = assess_risk(&data);
        assert_eq!(assessment.scores.degenerative, 50);
        assert_eq!(assessment.scores.comfort, 43);
        assert!(assessment.findings.iter().any(|f| f.contains("(moderate)")));
        assert!(assessment.findings.iter().any(|f| f.contains("(pronounced)")));
    }

    #[test]
    fn unusable_record_is_high_arch() {
        // Zero arch index averages below the high-arch threshold.
        let assessment = assess_risk(&FootScanData::default());
        assert_eq!(assessment.arch_status, ArchStatus::HighArch);
    }

    #[test]
    fn baseline_recommendations() {
        let data = normal_feet();
        let recs = generate_recommendations(&data, &RiskScores::default(), ArchStatus::Normal);
        let titles: Vec<&str> = recs.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(
            titles,
            vec!["Standard footwear", "Foot exercises", "Regular monitoring"]
        );
        assert!(recs[2].description.ends_with("Your scan ID: 2301_0042"));
    }

    #[test]
    fn recommendations_sorted_by_priority_stably() {
        let data = FootScanData {
            foot_length: Bilateral::new(250.0, 256.0),
            heel_angle: Bilateral::new(6, 0),
            hallux_angle: Bilateral::new(9.0, 16.5),
            shoe_size: Bilateral::both(39.5),
            shoe_width: Some('E'),
            ..normal_feet()
        };
        let recs = generate_recommendations(&data, &RiskScores::default(), ArchStatus::LowArch);
        let titles: Vec<&str> = recs.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(
            titles,
            vec![
                "Footwear for flat feet",
                "Hallux valgus prevention",
                "Shoe width",
                "Heel position correction",
                "Asymmetry correction",
                "Foot exercises",
                "Regular monitoring",
            ]
        );
        assert_eq!(recs[1].priority, Priority::High);
        assert!(recs[1].description.contains("pronounced"));
        assert!(recs[1].description.contains("16.5 deg"));
        assert_eq!(
            recs[2].description,
            "Your size: 39.5 EU. Recommended width: E."
        );
    }
}
