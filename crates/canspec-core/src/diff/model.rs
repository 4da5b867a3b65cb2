//! Diff output types.
//!
//! All types implement `Debug, Clone, Serialize, Deserialize, PartialEq`.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::model::{CanSpecDiff, ChangeSeverity, DiffType, EntityType};

/// Counters over a diff list
///
/// Built as a fold: [`DiffSummary::accumulate`] is pure, and
/// [`DiffSummary::merge`] combines partial summaries, so summarising chunks
/// independently and merging yields the same value as one pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiffSummary {
    pub messages_added: usize,
    pub messages_removed: usize,
    pub messages_modified: usize,
    pub signals_added: usize,
    pub signals_removed: usize,
    pub signals_modified: usize,
    pub by_severity: BTreeMap<ChangeSeverity, usize>,
    /// Sorted, without duplicates
    pub impacted_subsystems: BTreeSet<String>,
    pub summary: String,
}

impl DiffSummary {
    pub fn empty() -> Self {
        Self {
            summary: describe(&Self::default()),
            ..Self::default()
        }
    }

    pub fn from_diffs(diffs: &[CanSpecDiff]) -> Self {
        diffs.iter().fold(Self::empty(), Self::accumulate)
    }

    /// Fold one diff into the counters
    pub fn accumulate(mut self, diff: &CanSpecDiff) -> Self {
        let counter = match (diff.entity_type, diff.diff_type) {
            (EntityType::Message, DiffType::Added) => &mut self.messages_added,
            (EntityType::Message, DiffType::Removed) => &mut self.messages_removed,
            (EntityType::Message, DiffType::Modified) => &mut self.messages_modified,
            (EntityType::Signal, DiffType::Added) => &mut self.signals_added,
            (EntityType::Signal, DiffType::Removed) => &mut self.signals_removed,
            (EntityType::Signal, DiffType::Modified) => &mut self.signals_modified,
        };
        *counter += 1;
        *self.by_severity.entry(diff.severity).or_insert(0) += 1;
        if let Some(subsystem) = &diff.impacted_subsystem {
            self.impacted_subsystems.insert(subsystem.clone());
        }
        self.summary = describe(&self);
        self
    }

    /// Combine two partial summaries
    pub fn merge(mut self, other: Self) -> Self {
        self.messages_added += other.messages_added;
        self.messages_removed += other.messages_removed;
        self.messages_modified += other.messages_modified;
        self.signals_added += other.signals_added;
        self.signals_removed += other.signals_removed;
        self.signals_modified += other.signals_modified;
        for (severity, count) in other.by_severity {
            *self.by_severity.entry(severity).or_insert(0) += count;
        }
        self.impacted_subsystems.extend(other.impacted_subsystems);
        self.summary = describe(&self);
        self
    }

    /// Number of diffs folded in
    pub fn total(&self) -> usize {
        self.by_severity.values().sum()
    }

    pub fn count_for(&self, severity: ChangeSeverity) -> usize {
        self.by_severity.get(&severity).copied().unwrap_or(0)
    }

    /// Worst severity seen, if any
    pub fn max_severity(&self) -> Option<ChangeSeverity> {
        self.by_severity.keys().next_back().copied()
    }
}

fn describe(summary: &DiffSummary) -> String {
    if summary.total() == 0 {
        return "No changes".to_string();
    }
    format!(
        "Messages: {} added, {} removed, {} modified; Signals: {} added, {} removed, {} modified",
        summary.messages_added,
        summary.messages_removed,
        summary.messages_modified,
        summary.signals_added,
        summary.signals_removed,
        summary.signals_modified,
    )
}

/// Result of comparing two specification snapshots
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpecDiff {
    /// In emission order
    pub diffs: Vec<CanSpecDiff>,
    pub summary: DiffSummary,
}

impl SpecDiff {
    pub fn from_diffs(diffs: Vec<CanSpecDiff>) -> Self {
        let summary = DiffSummary::from_diffs(&diffs);
        Self { diffs, summary }
    }

    pub fn is_empty(&self) -> bool {
        self.diffs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.diffs.len()
    }

    pub fn max_severity(&self) -> Option<ChangeSeverity> {
        self.summary.max_severity()
    }
}
