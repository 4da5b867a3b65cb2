use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::scoring::{score_compatibility, CompatibilityOutcome};
use crate::model::{EntityType, MessageId};

/// How strongly an issue affects consumers of the specification
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum IssueSeverity {
    Info,
    Warning,
    Breaking,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IssueCategory {
    MessageRemoved,
    MessageAdded,
    MessageModified,
    SignalRemoved,
    SignalAdded,
    SignalModified,
    DataTypeChanged,
    RangeChanged,
    BitLayoutChanged,
    ScalingChanged,
}

/// Ordered from most to least compatible
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CompatibilityLevel {
    FullyCompatible,
    Compatible,
    MinorIncompatibility,
    MajorIncompatibility,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

display_as_debug!(IssueSeverity, IssueCategory, CompatibilityLevel, RiskLevel);

/// One finding of a compatibility analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompatibilityIssue {
    pub severity: IssueSeverity,
    pub category: IssueCategory,
    pub entity_type: EntityType,
    pub entity_name: String,
    pub message_id: Option<MessageId>,
    pub description: String,
    pub details: String,
    pub recommendation: String,
    pub old_value: Option<String>,
    pub new_value: Option<String>,
}

/// Migration impact on one subsystem
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImpactAssessment {
    pub affected_area: String,
    pub affected_message_count: usize,
    pub affected_signal_count: usize,
    pub risk_level: RiskLevel,
    pub impact_description: String,
    pub mitigation_strategy: Option<String>,
    pub estimated_effort_hours: f64,
}

/// Aggregate root for comparing two specification versions
///
/// Counters move only through [`add_issue`](Self::add_issue); score, level
/// and risk move only through
/// [`calculate_compatibility`](Self::calculate_compatibility).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompatibilityAnalysis {
    id: String,
    old_spec_id: String,
    new_spec_id: String,
    analyzed_at: DateTime<Utc>,
    analyzed_by: String,
    breaking_change_count: usize,
    warning_count: usize,
    info_count: usize,
    compatibility_score: u8,
    compatibility_level: CompatibilityLevel,
    migration_risk: RiskLevel,
    summary: String,
    recommendations: Vec<String>,
    issues: Vec<CompatibilityIssue>,
    impacts: Vec<ImpactAssessment>,
}

impl CompatibilityAnalysis {
    pub fn new(
        old_spec_id: impl Into<String>,
        new_spec_id: impl Into<String>,
        analyzed_by: impl Into<String>,
    ) -> Self {
        let mut analysis = Self {
            id: Uuid::now_v7().to_string(),
            old_spec_id: old_spec_id.into(),
            new_spec_id: new_spec_id.into(),
            analyzed_at: Utc::now(),
            analyzed_by: analyzed_by.into(),
            breaking_change_count: 0,
            warning_count: 0,
            info_count: 0,
            compatibility_score: 100,
            compatibility_level: CompatibilityLevel::FullyCompatible,
            migration_risk: RiskLevel::Low,
            summary: String::new(),
            recommendations: Vec::new(),
            issues: Vec::new(),
            impacts: Vec::new(),
        };
        analysis.refresh_narrative();
        analysis
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn old_spec_id(&self) -> &str {
        &self.old_spec_id
    }

    pub fn new_spec_id(&self) -> &str {
        &self.new_spec_id
    }

    pub fn analyzed_at(&self) -> DateTime<Utc> {
        self.analyzed_at
    }

    pub fn analyzed_by(&self) -> &str {
        &self.analyzed_by
    }

    pub fn breaking_change_count(&self) -> usize {
        self.breaking_change_count
    }

    pub fn warning_count(&self) -> usize {
        self.warning_count
    }

    pub fn info_count(&self) -> usize {
        self.info_count
    }

    pub fn total_issues(&self) -> usize {
        self.breaking_change_count + self.warning_count + self.info_count
    }

    pub fn compatibility_score(&self) -> u8 {
        self.compatibility_score
    }

    pub fn compatibility_level(&self) -> CompatibilityLevel {
        self.compatibility_level
    }

    pub fn migration_risk(&self) -> RiskLevel {
        self.migration_risk
    }

    pub fn summary(&self) -> &str {
        &self.summary
    }

    pub fn recommendations(&self) -> &[String] {
        &self.recommendations
    }

    pub fn issues(&self) -> &[CompatibilityIssue] {
        &self.issues
    }

    pub fn impacts(&self) -> &[ImpactAssessment] {
        &self.impacts
    }

    /// Record an issue and bump the counter for its severity
    ///
    /// Score and level are left untouched until the next
    /// [`calculate_compatibility`](Self::calculate_compatibility).
    pub fn add_issue(&mut self, issue: CompatibilityIssue) {
        match issue.severity {
            IssueSeverity::Breaking => self.breaking_change_count += 1,
            IssueSeverity::Warning => self.warning_count += 1,
            IssueSeverity::Info => self.info_count += 1,
        }
        self.issues.push(issue);
    }

    pub fn add_impact(&mut self, impact: ImpactAssessment) {
        self.impacts.push(impact);
    }

    /// Recompute score, level, risk, summary and recommendations
    ///
    /// Depends only on the counters and issues, so repeated calls without
    /// new issues leave the analysis unchanged.
    pub fn calculate_compatibility(&mut self) -> CompatibilityOutcome {
        let outcome = score_compatibility(
            self.breaking_change_count,
            self.warning_count,
            self.info_count,
        );
        self.compatibility_score = outcome.score;
        self.compatibility_level = outcome.level;
        self.migration_risk = outcome.risk;
        self.refresh_narrative();
        outcome
    }

    fn refresh_narrative(&mut self) {
        self.summary = if self.total_issues() == 0 {
            format!(
                "No compatibility issues between {} and {}; score {}/100",
                self.old_spec_id, self.new_spec_id, self.compatibility_score
            )
        } else {
            format!(
                "Score {}/100 ({}), migration risk {}: {} breaking, {} warning, {} info",
                self.compatibility_score,
                self.compatibility_level,
                self.migration_risk,
                self.breaking_change_count,
                self.warning_count,
                self.info_count
            )
        };
        self.recommendations = super::issues::recommendations_for(
            self.breaking_change_count,
            self.warning_count,
            &self.issues,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issue(severity: IssueSeverity) -> CompatibilityIssue {
        CompatibilityIssue {
            severity,
            category: IssueCategory::SignalModified,
            entity_type: EntityType::Signal,
            entity_name: "S".to_string(),
            message_id: Some(MessageId::new(1)),
            description: String::new(),
            details: String::new(),
            recommendation: "Check S".to_string(),
            old_value: None,
            new_value: None,
        }
    }

    #[test]
    fn test_new_analysis_is_fully_compatible() {
        let analysis = CompatibilityAnalysis::new("v1", "v2", "alice");
        assert_eq!(analysis.compatibility_score(), 100);
        assert_eq!(
            analysis.compatibility_level(),
            CompatibilityLevel::FullyCompatible
        );
        assert_eq!(analysis.migration_risk(), RiskLevel::Low);
        assert_eq!(analysis.total_issues(), 0);
        assert_eq!(analysis.id().len(), 36);
    }

    #[test]
    fn test_add_issue_counts_but_does_not_score() {
        let mut analysis = CompatibilityAnalysis::new("v1", "v2", "alice");
        analysis.add_issue(issue(IssueSeverity::Breaking));
        analysis.add_issue(issue(IssueSeverity::Warning));
        analysis.add_issue(issue(IssueSeverity::Info));
        assert_eq!(analysis.breaking_change_count(), 1);
        assert_eq!(analysis.warning_count(), 1);
        assert_eq!(analysis.info_count(), 1);
        assert_eq!(analysis.compatibility_score(), 100);

        let outcome = analysis.calculate_compatibility();
        assert_eq!(outcome.score, 86);
        assert_eq!(analysis.compatibility_score(), 86);
        assert_eq!(
            analysis.compatibility_level(),
            CompatibilityLevel::MinorIncompatibility
        );
    }

    #[test]
    fn test_add_impact_leaves_counts_alone() {
        let mut analysis = CompatibilityAnalysis::new("v1", "v2", "alice");
        analysis.add_impact(ImpactAssessment {
            affected_area: "Body".to_string(),
            affected_message_count: 1,
            affected_signal_count: 0,
            risk_level: RiskLevel::Low,
            impact_description: String::new(),
            mitigation_strategy: None,
            estimated_effort_hours: 0.5,
        });
        assert_eq!(analysis.impacts().len(), 1);
        assert_eq!(analysis.total_issues(), 0);
    }

    #[test]
    fn test_level_ordering() {
        assert!(CompatibilityLevel::MajorIncompatibility > CompatibilityLevel::MinorIncompatibility);
        assert!(CompatibilityLevel::Compatible > CompatibilityLevel::FullyCompatible);
        assert!(RiskLevel::Critical > RiskLevel::High);
    }
}
