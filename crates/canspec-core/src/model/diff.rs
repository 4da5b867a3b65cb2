//! Diff records emitted by the diff engine and owned by an import.
//!
//! All types implement `Debug, Clone, Serialize, Deserialize, PartialEq`.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::message::MessageId;

/// Kind of change a diff describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DiffType {
    Added,
    Removed,
    Modified,
}

/// Which model entity the diff refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EntityType {
    Message,
    Signal,
}

/// Severity assigned to a single diff
///
/// Ordered from least to most severe so `max()` yields the worst change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ChangeSeverity {
    Informational,
    Low,
    Medium,
    High,
    Critical,
}

impl ChangeSeverity {
    pub const ALL: [ChangeSeverity; 5] = [
        ChangeSeverity::Informational,
        ChangeSeverity::Low,
        ChangeSeverity::Medium,
        ChangeSeverity::High,
        ChangeSeverity::Critical,
    ];
}

/// What changed, named by its most significant aspect
///
/// For modified signals the variants are listed here in ascending
/// significance: `Unit` < `Scaling` < `Range` < `DataType` < `BitLayout`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChangeCategory {
    MessageAdded,
    MessageRemoved,
    /// Name, transmitter, cycle time or framing changed
    MessageMetadata,
    /// DLC changed
    MessageLength,
    SignalAdded,
    SignalRemoved,
    Unit,
    Scaling,
    Range,
    DataType,
    BitLayout,
}

impl ChangeCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeCategory::MessageAdded => "MessageAdded",
            ChangeCategory::MessageRemoved => "MessageRemoved",
            ChangeCategory::MessageMetadata => "MessageMetadata",
            ChangeCategory::MessageLength => "MessageLength",
            ChangeCategory::SignalAdded => "SignalAdded",
            ChangeCategory::SignalRemoved => "SignalRemoved",
            ChangeCategory::Unit => "Unit",
            ChangeCategory::Scaling => "Scaling",
            ChangeCategory::Range => "Range",
            ChangeCategory::DataType => "DataType",
            ChangeCategory::BitLayout => "BitLayout",
        }
    }
}

display_as_debug!(DiffType, EntityType, ChangeSeverity);

impl fmt::Display for ChangeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One difference between two specification snapshots
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanSpecDiff {
    pub diff_type: DiffType,
    pub entity_type: EntityType,
    /// Message name for message diffs, signal name for signal diffs
    pub entity_name: String,
    /// Owning message (always set by the diff engine)
    pub message_id: Option<MessageId>,
    pub change_category: ChangeCategory,
    pub severity: ChangeSeverity,
    pub impacted_subsystem: Option<String>,
    pub old_value: Option<String>,
    pub new_value: Option<String>,
    pub summary: String,
}

impl CanSpecDiff {
    pub fn is_message(&self) -> bool {
        self.entity_type == EntityType::Message
    }

    pub fn is_signal(&self) -> bool {
        self.entity_type == EntityType::Signal
    }

    /// Identity of the changed entity, independent of the change itself
    pub fn entity_key(&self) -> (EntityType, Option<MessageId>, &str) {
        (self.entity_type, self.message_id, self.entity_name.as_str())
    }
}
