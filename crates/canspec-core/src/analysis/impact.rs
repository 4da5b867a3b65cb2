//! Per-subsystem migration impact.

use std::collections::{BTreeMap, BTreeSet};

use super::model::{ImpactAssessment, RiskLevel};
use crate::model::{CanSpecDiff, ChangeSeverity, EntityType, MessageId};

/// Area name used for diffs without a subsystem tag
pub const UNASSIGNED_AREA: &str = "Unassigned";

/// Estimated rework per diff, in hours
pub fn effort_hours(severity: ChangeSeverity) -> f64 {
    match severity {
        ChangeSeverity::Critical => 8.0,
        ChangeSeverity::High => 4.0,
        ChangeSeverity::Medium => 2.0,
        ChangeSeverity::Low => 0.5,
        ChangeSeverity::Informational => 0.0,
    }
}

fn risk_for(severity: ChangeSeverity) -> RiskLevel {
    match severity {
        ChangeSeverity::Critical => RiskLevel::Critical,
        ChangeSeverity::High => RiskLevel::High,
        ChangeSeverity::Medium => RiskLevel::Medium,
        ChangeSeverity::Low | ChangeSeverity::Informational => RiskLevel::Low,
    }
}

#[derive(Default)]
struct AreaTally {
    diffs: usize,
    messages: BTreeSet<MessageId>,
    signals: BTreeSet<(Option<MessageId>, String)>,
    worst: Option<ChangeSeverity>,
    hours: f64,
}

/// Group diffs by impacted subsystem, sorted by area name
pub fn assess_impacts(diffs: &[CanSpecDiff]) -> Vec<ImpactAssessment> {
    let mut areas: BTreeMap<&str, AreaTally> = BTreeMap::new();

    for diff in diffs {
        let area = diff.impacted_subsystem.as_deref().unwrap_or(UNASSIGNED_AREA);
        let tally = areas.entry(area).or_default();
        tally.diffs += 1;
        if let Some(id) = diff.message_id {
            tally.messages.insert(id);
        }
        if diff.entity_type == EntityType::Signal {
            tally
                .signals
                .insert((diff.message_id, diff.entity_name.clone()));
        }
        tally.worst = tally.worst.max(Some(diff.severity));
        tally.hours += effort_hours(diff.severity);
    }

    areas
        .into_iter()
        .map(|(area, tally)| {
            let worst = tally.worst.unwrap_or(ChangeSeverity::Informational);
            let risk_level = risk_for(worst);
            let mitigation_strategy = match risk_level {
                RiskLevel::Critical | RiskLevel::High => Some(format!(
                    "Stage the {} rollout behind a gateway translation layer and run HIL regression on all {} affected message(s)",
                    area,
                    tally.messages.len()
                )),
                _ => None,
            };
            ImpactAssessment {
                affected_area: area.to_string(),
                affected_message_count: tally.messages.len(),
                affected_signal_count: tally.signals.len(),
                risk_level,
                impact_description: format!(
                    "{} change(s) across {} message(s) and {} signal(s); worst severity {}",
                    tally.diffs,
                    tally.messages.len(),
                    tally.signals.len(),
                    worst
                ),
                mitigation_strategy,
                estimated_effort_hours: tally.hours,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ChangeCategory, DiffType};

    fn diff(
        subsystem: Option<&str>,
        entity_type: EntityType,
        id: u64,
        name: &str,
        severity: ChangeSeverity,
    ) -> CanSpecDiff {
        CanSpecDiff {
            diff_type: DiffType::Modified,
            entity_type,
            entity_name: name.to_string(),
            message_id: Some(MessageId::new(id)),
            change_category: ChangeCategory::Range,
            severity,
            impacted_subsystem: subsystem.map(str::to_string),
            old_value: None,
            new_value: None,
            summary: String::new(),
        }
    }

    #[test]
    fn test_empty_input_has_no_impacts() {
        assert!(assess_impacts(&[]).is_empty());
    }

    #[test]
    fn test_groups_by_subsystem() {
        let diffs = vec![
            diff(Some("Powertrain"), EntityType::Signal, 0x100, "RPM", ChangeSeverity::Critical),
            diff(Some("Powertrain"), EntityType::Signal, 0x100, "RPM", ChangeSeverity::High),
            diff(Some("Powertrain"), EntityType::Signal, 0x101, "Torque", ChangeSeverity::Medium),
            diff(None, EntityType::Message, 0x300, "Door", ChangeSeverity::Low),
        ];
        let impacts = assess_impacts(&diffs);
        assert_eq!(impacts.len(), 2);

        let powertrain = &impacts[0];
        assert_eq!(powertrain.affected_area, "Powertrain");
        assert_eq!(powertrain.affected_message_count, 2);
        assert_eq!(powertrain.affected_signal_count, 2);
        assert_eq!(powertrain.risk_level, RiskLevel::Critical);
        assert_eq!(powertrain.estimated_effort_hours, 14.0);
        assert!(powertrain.mitigation_strategy.is_some());

        let unassigned = &impacts[1];
        assert_eq!(unassigned.affected_area, UNASSIGNED_AREA);
        assert_eq!(unassigned.affected_signal_count, 0);
        assert_eq!(unassigned.risk_level, RiskLevel::Low);
        assert_eq!(unassigned.estimated_effort_hours, 0.5);
        assert!(unassigned.mitigation_strategy.is_none());
    }
}
