//! Translation of diffs into compatibility issues.

use super::model::{CompatibilityIssue, IssueCategory, IssueSeverity};
use crate::model::{CanSpecDiff, ChangeCategory, ChangeSeverity, DiffType, EntityType};

impl From<ChangeSeverity> for IssueSeverity {
    fn from(severity: ChangeSeverity) -> Self {
        match severity {
            ChangeSeverity::Critical | ChangeSeverity::High => IssueSeverity::Breaking,
            ChangeSeverity::Medium => IssueSeverity::Warning,
            ChangeSeverity::Low | ChangeSeverity::Informational => IssueSeverity::Info,
        }
    }
}

impl IssueCategory {
    /// Category for a diff, keyed on entity, diff type and change category
    pub fn for_diff(diff: &CanSpecDiff) -> Self {
        match (diff.entity_type, diff.diff_type) {
            (EntityType::Message, DiffType::Added) => IssueCategory::MessageAdded,
            (EntityType::Message, DiffType::Removed) => IssueCategory::MessageRemoved,
            (EntityType::Message, DiffType::Modified) => IssueCategory::MessageModified,
            (EntityType::Signal, DiffType::Added) => IssueCategory::SignalAdded,
            (EntityType::Signal, DiffType::Removed) => IssueCategory::SignalRemoved,
            (EntityType::Signal, DiffType::Modified) => match diff.change_category {
                ChangeCategory::BitLayout => IssueCategory::BitLayoutChanged,
                ChangeCategory::DataType => IssueCategory::DataTypeChanged,
                ChangeCategory::Range => IssueCategory::RangeChanged,
                ChangeCategory::Scaling => IssueCategory::ScalingChanged,
                _ => IssueCategory::SignalModified,
            },
        }
    }

    /// Standard advice attached to issues of this category
    pub fn recommendation(&self) -> &'static str {
        match self {
            IssueCategory::MessageRemoved => {
                "Confirm no receiving ECU still consumes this message before release"
            }
            IssueCategory::MessageAdded => {
                "Add the message to receiver filters and gateway routing tables where needed"
            }
            IssueCategory::MessageModified => {
                "Update frame definitions and schedules on every node that sends or receives this message"
            }
            IssueCategory::SignalRemoved => {
                "Remove or replace every consumer of this signal"
            }
            IssueCategory::SignalAdded => "Regenerate codecs to expose the new signal",
            IssueCategory::SignalModified => {
                "Update display and logging code that relies on the engineering unit"
            }
            IssueCategory::DataTypeChanged => {
                "Regenerate signal codecs; signedness and byte-order changes alter decoded values"
            }
            IssueCategory::RangeChanged => {
                "Re-validate plausibility checks and limits against the new range"
            }
            IssueCategory::BitLayoutChanged => {
                "Regenerate pack/unpack code on all nodes; old and new layouts cannot interoperate"
            }
            IssueCategory::ScalingChanged => {
                "Update calibration tables and conversion code for the new factor/offset"
            }
        }
    }
}

impl CompatibilityIssue {
    /// Translate one diff into an issue
    pub fn from_diff(diff: &CanSpecDiff) -> Self {
        let category = IssueCategory::for_diff(diff);
        let details = match (&diff.old_value, &diff.new_value) {
            (Some(old), Some(new)) => format!("{}: {} -> {}", diff.change_category, old, new),
            (Some(old), None) => format!("{}: was {}", diff.change_category, old),
            (None, Some(new)) => format!("{}: now {}", diff.change_category, new),
            (None, None) => diff.change_category.to_string(),
        };
        Self {
            severity: IssueSeverity::from(diff.severity),
            category,
            entity_type: diff.entity_type,
            entity_name: diff.entity_name.clone(),
            message_id: diff.message_id,
            description: diff.summary.clone(),
            details,
            recommendation: category.recommendation().to_string(),
            old_value: diff.old_value.clone(),
            new_value: diff.new_value.clone(),
        }
    }
}

/// Analysis-level advice: a headline from the counts, then each distinct
/// issue recommendation in first-appearance order
pub(crate) fn recommendations_for(
    breaking: usize,
    warning: usize,
    issues: &[CompatibilityIssue],
) -> Vec<String> {
    let mut out = Vec::new();
    if issues.is_empty() {
        out.push("No action required".to_string());
        return out;
    }
    if breaking > 0 {
        out.push(format!(
            "Coordinate a synchronized rollout: {} breaking change(s) require updates on all affected nodes",
            breaking
        ));
    } else if warning > 0 {
        out.push(format!(
            "Schedule validation of {} warning-level change(s) before release",
            warning
        ));
    } else {
        out.push("Changes are informational; update documentation".to_string());
    }
    for issue in issues {
        if !out.iter().any(|r| r == &issue.recommendation) {
            out.push(issue.recommendation.clone());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::MessageId;

    fn diff(
        entity_type: EntityType,
        diff_type: DiffType,
        category: ChangeCategory,
        severity: ChangeSeverity,
    ) -> CanSpecDiff {
        CanSpecDiff {
            diff_type,
            entity_type,
            entity_name: "RPM".to_string(),
            message_id: Some(MessageId::new(0x200)),
            change_category: category,
            severity,
            impacted_subsystem: None,
            old_value: Some("factor=0.25".to_string()),
            new_value: Some("factor=0.5".to_string()),
            summary: "Signal RPM changed".to_string(),
        }
    }

    #[test]
    fn test_severity_mapping() {
        assert_eq!(IssueSeverity::from(ChangeSeverity::Critical), IssueSeverity::Breaking);
        assert_eq!(IssueSeverity::from(ChangeSeverity::High), IssueSeverity::Breaking);
        assert_eq!(IssueSeverity::from(ChangeSeverity::Medium), IssueSeverity::Warning);
        assert_eq!(IssueSeverity::from(ChangeSeverity::Low), IssueSeverity::Info);
        assert_eq!(IssueSeverity::from(ChangeSeverity::Informational), IssueSeverity::Info);
    }

    #[test]
    fn test_category_mapping() {
        let cases = [
            (EntityType::Message, DiffType::Added, ChangeCategory::MessageAdded, IssueCategory::MessageAdded),
            (EntityType::Message, DiffType::Removed, ChangeCategory::MessageRemoved, IssueCategory::MessageRemoved),
            (EntityType::Message, DiffType::Modified, ChangeCategory::MessageLength, IssueCategory::MessageModified),
            (EntityType::Message, DiffType::Modified, ChangeCategory::MessageMetadata, IssueCategory::MessageModified),
            (EntityType::Signal, DiffType::Added, ChangeCategory::SignalAdded, IssueCategory::SignalAdded),
            (EntityType::Signal, DiffType::Removed, ChangeCategory::SignalRemoved, IssueCategory::SignalRemoved),
            (EntityType::Signal, DiffType::Modified, ChangeCategory::BitLayout, IssueCategory::BitLayoutChanged),
            (EntityType::Signal, DiffType::Modified, ChangeCategory::DataType, IssueCategory::DataTypeChanged),
            (EntityType::Signal, DiffType::Modified, ChangeCategory::Range, IssueCategory::RangeChanged),
            (EntityType::Signal, DiffType::Modified, ChangeCategory::Scaling, IssueCategory::ScalingChanged),
            (EntityType::Signal, DiffType::Modified, ChangeCategory::Unit, IssueCategory::SignalModified),
        ];
        for (entity, kind, change, expected) in cases {
            let d = diff(entity, kind, change, ChangeSeverity::Low);
            assert_eq!(IssueCategory::for_diff(&d), expected, "{entity:?} {kind:?} {change:?}");
        }
    }

    #[test]
    fn test_from_diff_carries_values() {
        let d = diff(
            EntityType::Signal,
            DiffType::Modified,
            ChangeCategory::Scaling,
            ChangeSeverity::Medium,
        );
        let issue = CompatibilityIssue::from_diff(&d);
        assert_eq!(issue.severity, IssueSeverity::Warning);
        assert_eq!(issue.category, IssueCategory::ScalingChanged);
        assert_eq!(issue.message_id, Some(MessageId::new(0x200)));
        assert_eq!(issue.details, "Scaling: factor=0.25 -> factor=0.5");
        assert_eq!(issue.description, "Signal RPM changed");
        assert!(!issue.recommendation.is_empty());
    }

    #[test]
    fn test_recommendations_are_deduplicated() {
        let d = diff(
            EntityType::Signal,
            DiffType::Modified,
            ChangeCategory::Scaling,
            ChangeSeverity::Medium,
        );
        let issues = vec![CompatibilityIssue::from_diff(&d), CompatibilityIssue::from_diff(&d)];
        let recs = recommendations_for(0, 2, &issues);
        assert_eq!(recs.len(), 2);
        assert!(recs[0].contains("2 warning-level"));
        assert_eq!(recommendations_for(0, 0, &[]), vec!["No action required".to_string()]);
    }
}
