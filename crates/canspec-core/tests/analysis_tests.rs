#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use canspec_core::analysis::{
    analyze_spec_diff, score_compatibility, CompatibilityAnalysis, CompatibilityIssue,
    CompatibilityLevel, IssueCategory, IssueSeverity, RiskLevel,
};
use canspec_core::diff::{compute_diff, DiffOptions};
use canspec_core::model::{CanSpecDiff, ChangeCategory, ChangeSeverity, DiffType, EntityType, MessageId};
use common::{message, powertrain_v1, signal};

fn breaking_issue(n: u64) -> CompatibilityIssue {
    CompatibilityIssue::from_diff(&CanSpecDiff {
        diff_type: DiffType::Removed,
        entity_type: EntityType::Message,
        entity_name: format!("Msg{n}"),
        message_id: Some(MessageId::new(n)),
        change_category: ChangeCategory::MessageRemoved,
        severity: ChangeSeverity::Critical,
        impacted_subsystem: None,
        old_value: None,
        new_value: None,
        summary: format!("Message Msg{n} removed"),
    })
}

#[test]
fn test_calculate_is_idempotent() {
    let mut analysis = CompatibilityAnalysis::new("v1", "v2", "qa");
    analysis.add_issue(breaking_issue(1));
    analysis.add_issue(breaking_issue(2));

    analysis.calculate_compatibility();
    let first = analysis.clone();
    analysis.calculate_compatibility();
    assert_eq!(analysis, first);
    assert_eq!(analysis.compatibility_score(), 80);
    assert_eq!(analysis.migration_risk(), RiskLevel::Medium);
}

#[test]
fn test_scores_are_stale_until_recalculated() {
    let mut analysis = CompatibilityAnalysis::new("v1", "v2", "qa");
    analysis.calculate_compatibility();
    analysis.add_issue(breaking_issue(1));
    assert_eq!(analysis.compatibility_score(), 100);
    analysis.calculate_compatibility();
    assert_eq!(analysis.compatibility_score(), 90);
}

#[test]
fn test_penalty_weights() {
    assert_eq!(score_compatibility(1, 0, 0).score, 90);
    assert_eq!(score_compatibility(0, 1, 0).score, 97);
    assert_eq!(score_compatibility(0, 0, 1).score, 99);
    assert_eq!(score_compatibility(2, 3, 4).score, 67);
}

#[test]
fn test_summary_and_recommendations_follow_counts() {
    let mut analysis = CompatibilityAnalysis::new("v1", "v2", "qa");
    assert_eq!(analysis.recommendations(), &["No action required".to_string()]);

    analysis.add_issue(breaking_issue(1));
    analysis.calculate_compatibility();
    assert!(analysis.summary().contains("90/100"));
    assert!(analysis.summary().contains("1 breaking"));
    assert!(analysis.recommendations()[0].contains("1 breaking change"));
    assert!(analysis
        .recommendations()
        .iter()
        .any(|r| r == IssueCategory::MessageRemoved.recommendation()));
}

#[test]
fn test_analyze_spec_diff_end_to_end() {
    let old = powertrain_v1();
    let mut new = old.clone();
    // Breaking: layout change on RPM
    new[0].signals[0].start_bit = 4;
    // Warning: scaling change on Speed
    new[1].signals[0].factor = 0.02;
    // Info: new message
    new.push(message(0x300, "Brake", vec![signal("Pressure", 0, 12, "bar")]));

    let diff = compute_diff(&old, &new, &DiffOptions::for_subsystem("Powertrain"));
    let analysis = analyze_spec_diff("spec-v1", "spec-v2", "release-bot", &diff);

    assert_eq!(analysis.old_spec_id(), "spec-v1");
    assert_eq!(analysis.analyzed_by(), "release-bot");
    assert_eq!(analysis.breaking_change_count(), 1);
    assert_eq!(analysis.warning_count(), 1);
    assert_eq!(analysis.info_count(), 1);
    assert_eq!(analysis.compatibility_score(), 86);
    assert_eq!(
        analysis.compatibility_level(),
        CompatibilityLevel::MinorIncompatibility
    );
    assert_eq!(analysis.migration_risk(), RiskLevel::Medium);

    let categories: Vec<IssueCategory> = analysis.issues().iter().map(|i| i.category).collect();
    assert_eq!(
        categories,
        vec![
            IssueCategory::MessageAdded,
            IssueCategory::BitLayoutChanged,
            IssueCategory::ScalingChanged
        ]
    );
    assert_eq!(analysis.issues()[2].severity, IssueSeverity::Warning);

    assert_eq!(analysis.impacts().len(), 1);
    let impact = &analysis.impacts()[0];
    assert_eq!(impact.affected_area, "Powertrain");
    assert_eq!(impact.affected_message_count, 3);
    assert_eq!(impact.affected_signal_count, 2);
    assert_eq!(impact.risk_level, RiskLevel::Critical);
    assert_eq!(impact.estimated_effort_hours, 10.0);
}

#[test]
fn test_warnings_only_is_compatible() {
    let old = powertrain_v1();
    let mut new = old.clone();
    new[0].signals[1].offset = -45.0;
    let analysis = analyze_spec_diff("a", "b", "qa", &compute_diff(&old, &new, &DiffOptions::default()));
    assert_eq!(analysis.compatibility_level(), CompatibilityLevel::Compatible);
    assert_eq!(analysis.migration_risk(), RiskLevel::Low);
    assert_eq!(analysis.compatibility_score(), 97);
    assert_eq!(analysis.impacts()[0].affected_area, "Unassigned");
}

#[test]
fn test_analysis_serializes_for_reporting() {
    let old = powertrain_v1();
    let analysis = analyze_spec_diff("a", "b", "qa", &compute_diff(&old, &[], &DiffOptions::default()));
    let json = serde_json::to_value(&analysis).unwrap();
    assert_eq!(json["compatibility_score"], 80);
    assert_eq!(json["compatibility_level"], "MinorIncompatibility");
    assert_eq!(json["migration_risk"], "Medium");
    assert_eq!(json["issues"].as_array().unwrap().len(), 2);

    let back: CompatibilityAnalysis = serde_json::from_value(json).unwrap();
    assert_eq!(back, analysis);
}
