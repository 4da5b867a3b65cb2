//! Snapshot comparison.
//!
//! The core entry point is [`compute_diff`], which compares the message list
//! of a previous snapshot with a freshly parsed one.

use std::collections::HashMap;
use std::fmt::Display;
use std::time::Instant;

use crate::diff::model::SpecDiff;
use crate::model::{
    CanSpecDiff, CanSpecMessage, CanSpecSignal, ChangeCategory, ChangeSeverity, DiffType,
    EntityType, MessageId,
};
use crate::{log_op_end, log_op_start};

/// Caller-supplied context stamped on every diff
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiffOptions {
    /// Impacted subsystem tag
    pub subsystem: Option<String>,
}

impl DiffOptions {
    pub fn for_subsystem(subsystem: impl Into<String>) -> Self {
        Self {
            subsystem: Some(subsystem.into()),
        }
    }
}

/// Compare two snapshots
///
/// Emission order is deterministic:
/// 1. messages only in `new`, in `new` order
/// 2. messages only in `old`, in `old` order
/// 3. for each message in both, in `new` order: message-level changes, then
///    added, removed and modified signals
///
/// A modified signal yields exactly one diff, categorised by its most
/// significant changed group (bit layout > data type > range > scaling > unit).
pub fn compute_diff(
    old: &[CanSpecMessage],
    new: &[CanSpecMessage],
    options: &DiffOptions,
) -> SpecDiff {
    let started = Instant::now();
    log_op_start!(
        "compute_diff",
        old_message_count = old.len(),
        new_message_count = new.len()
    );

    let old_by_id: HashMap<MessageId, &CanSpecMessage> = old.iter().map(|m| (m.id, m)).collect();
    let new_by_id: HashMap<MessageId, &CanSpecMessage> = new.iter().map(|m| (m.id, m)).collect();
    let mut emitter = Emitter::new(options);

    for msg in new.iter().filter(|m| !old_by_id.contains_key(&m.id)) {
        emitter.push(
            DiffType::Added,
            EntityType::Message,
            &msg.name,
            msg.id,
            ChangeCategory::MessageAdded,
            ChangeSeverity::Informational,
            None,
            Some(message_shape(msg)),
            format!("Message {} ({}) added", msg.name, msg.id),
        );
    }

    for msg in old.iter().filter(|m| !new_by_id.contains_key(&m.id)) {
        emitter.push(
            DiffType::Removed,
            EntityType::Message,
            &msg.name,
            msg.id,
            ChangeCategory::MessageRemoved,
            ChangeSeverity::Critical,
            Some(message_shape(msg)),
            None,
            format!("Message {} ({}) removed", msg.name, msg.id),
        );
    }

    for new_msg in new {
        if let Some(old_msg) = old_by_id.get(&new_msg.id) {
            diff_common_message(&mut emitter, old_msg, new_msg);
        }
    }

    let diff = SpecDiff::from_diffs(emitter.finish());
    log_op_end!(
        "compute_diff",
        duration_ms = started.elapsed().as_millis() as u64,
        diff_count = diff.len()
    );
    diff
}

fn diff_common_message(emitter: &mut Emitter<'_>, old: &CanSpecMessage, new: &CanSpecMessage) {
    if old.dlc != new.dlc {
        let (severity, verb) = if new.dlc < old.dlc {
            (ChangeSeverity::Critical, "shrank")
        } else {
            (ChangeSeverity::Low, "grew")
        };
        emitter.push(
            DiffType::Modified,
            EntityType::Message,
            &new.name,
            new.id,
            ChangeCategory::MessageLength,
            severity,
            Some(format!("dlc={}", old.dlc)),
            Some(format!("dlc={}", new.dlc)),
            format!(
                "Message {} ({}) payload {} from {} to {} bytes",
                new.name, new.id, verb, old.dlc, new.dlc
            ),
        );
    }

    let mut meta = FieldChanges::default();
    meta.compare("name", &old.name, &new.name);
    meta.compare(
        "transmitter",
        &OptText(old.transmitter.as_deref()),
        &OptText(new.transmitter.as_deref()),
    );
    meta.compare(
        "cycle_time_ms",
        &OptText(old.cycle_time_ms.map(|c| c.to_string()).as_deref()),
        &OptText(new.cycle_time_ms.map(|c| c.to_string()).as_deref()),
    );
    meta.compare("is_extended", &old.is_extended, &new.is_extended);
    if !meta.is_empty() {
        let summary = format!(
            "Message {} ({}) metadata changed: {}",
            new.name,
            new.id,
            meta.names()
        );
        let (old_value, new_value) = meta.into_values();
        emitter.push(
            DiffType::Modified,
            EntityType::Message,
            &new.name,
            new.id,
            ChangeCategory::MessageMetadata,
            ChangeSeverity::Informational,
            Some(old_value),
            Some(new_value),
            summary,
        );
    }

    for sig in new.signals.iter().filter(|s| !old.has_signal(&s.name)) {
        emitter.push(
            DiffType::Added,
            EntityType::Signal,
            &sig.name,
            new.id,
            ChangeCategory::SignalAdded,
            ChangeSeverity::Low,
            None,
            Some(signal_shape(sig)),
            format!("Signal {} added to message {}", sig.name, new.id),
        );
    }

    for sig in old.signals.iter().filter(|s| !new.has_signal(&s.name)) {
        emitter.push(
            DiffType::Removed,
            EntityType::Signal,
            &sig.name,
            new.id,
            ChangeCategory::SignalRemoved,
            ChangeSeverity::High,
            Some(signal_shape(sig)),
            None,
            format!("Signal {} removed from message {}", sig.name, new.id),
        );
    }

    for new_sig in &new.signals {
        let Some(old_sig) = old.signal(&new_sig.name) else {
            continue;
        };
        if let Some((category, severity, changes)) = classify_signal_change(old_sig, new_sig) {
            let summary = format!(
                "Signal {} in message {} changed ({}): {}",
                new_sig.name,
                new.id,
                category,
                changes.names()
            );
            let (old_value, new_value) = changes.into_values();
            emitter.push(
                DiffType::Modified,
                EntityType::Signal,
                &new_sig.name,
                new.id,
                category,
                severity,
                Some(old_value),
                Some(new_value),
                summary,
            );
        }
    }
}

/// Category and severity of a signal modification, or `None` if unchanged
///
/// Fields are compared with exact equality; the parser only admits finite
/// numbers so no NaN can produce a phantom change.
pub fn classify_signal_change(
    old: &CanSpecSignal,
    new: &CanSpecSignal,
) -> Option<(ChangeCategory, ChangeSeverity, FieldChanges)> {
    let mut changes = FieldChanges::default();
    let mut worst: Option<(ChangeCategory, ChangeSeverity)> = None;
    let mut note = |changed: bool, category: ChangeCategory, severity: ChangeSeverity| {
        if changed && worst.is_none() {
            worst = Some((category, severity));
        }
    };

    // Groups are visited from most to least significant.
    let layout = changes.compare("start_bit", &old.start_bit, &new.start_bit)
        | changes.compare("bit_length", &old.bit_length, &new.bit_length);
    note(layout, ChangeCategory::BitLayout, ChangeSeverity::Critical);

    let data_type = changes.compare("is_signed", &old.is_signed, &new.is_signed)
        | changes.compare("is_big_endian", &old.is_big_endian, &new.is_big_endian);
    note(data_type, ChangeCategory::DataType, ChangeSeverity::Critical);

    let range = changes.compare("min", &old.min, &new.min)
        | changes.compare("max", &old.max, &new.max);
    note(range, ChangeCategory::Range, ChangeSeverity::High);

    let scaling = changes.compare("factor", &old.factor, &new.factor)
        | changes.compare("offset", &old.offset, &new.offset);
    note(scaling, ChangeCategory::Scaling, ChangeSeverity::Medium);

    let unit = changes.compare("unit", &old.unit, &new.unit);
    note(unit, ChangeCategory::Unit, ChangeSeverity::Informational);

    worst.map(|(category, severity)| (category, severity, changes))
}

/// Changed fields rendered as `field=value` pairs
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldChanges {
    names: Vec<&'static str>,
    old: Vec<String>,
    new: Vec<String>,
}

impl FieldChanges {
    /// Record the field if the values differ; returns whether they did
    fn compare<T: PartialEq + Display + ?Sized>(
        &mut self,
        field: &'static str,
        old: &T,
        new: &T,
    ) -> bool {
        if old == new {
            return false;
        }
        self.names.push(field);
        self.old.push(format!("{}={}", field, old));
        self.new.push(format!("{}={}", field, new));
        true
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn fields(&self) -> &[&'static str] {
        &self.names
    }

    fn names(&self) -> String {
        self.names.join(", ")
    }

    fn into_values(self) -> (String, String) {
        (self.old.join("; "), self.new.join("; "))
    }
}

/// Renders an optional text as its value or `none`
#[derive(PartialEq)]
struct OptText<'a>(Option<&'a str>);

impl Display for OptText<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.0.unwrap_or("none"))
    }
}

fn message_shape(msg: &CanSpecMessage) -> String {
    format!("name={}; dlc={}; signals={}", msg.name, msg.dlc, msg.signal_count())
}

fn signal_shape(sig: &CanSpecSignal) -> String {
    format!(
        "start_bit={}; bit_length={}; unit={}",
        sig.start_bit, sig.bit_length, sig.unit
    )
}

struct Emitter<'a> {
    subsystem: Option<&'a str>,
    diffs: Vec<CanSpecDiff>,
}

impl<'a> Emitter<'a> {
    fn new(options: &'a DiffOptions) -> Self {
        Self {
            subsystem: options.subsystem.as_deref(),
            diffs: Vec::new(),
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn push(
        &mut self,
        diff_type: DiffType,
        entity_type: EntityType,
        entity_name: &str,
        message_id: MessageId,
        change_category: ChangeCategory,
        severity: ChangeSeverity,
        old_value: Option<String>,
        new_value: Option<String>,
        summary: String,
    ) {
        self.diffs.push(CanSpecDiff {
            diff_type,
            entity_type,
            entity_name: entity_name.to_string(),
            message_id: Some(message_id),
            change_category,
            severity,
            impacted_subsystem: self.subsystem.map(str::to_string),
            old_value,
            new_value,
            summary,
        });
    }

    fn finish(self) -> Vec<CanSpecDiff> {
        self.diffs
    }
}
