use std::collections::HashMap;

use super::{ParseIssue, ParseIssueKind};
use crate::model::{CanSpecMessage, CanSpecSignal, MessageId};

/// Collects messages in first-appearance order and applies the signal
/// layout rules shared by every input format.
#[derive(Debug, Default)]
pub(crate) struct MessageBatch {
    messages: Vec<CanSpecMessage>,
    index: HashMap<MessageId, usize>,
    issues: Vec<ParseIssue>,
    rows_read: usize,
    rows_skipped: usize,
}

impl MessageBatch {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Position of the message with `id`, creating it with `make` if unseen
    ///
    /// A repeated id keeps the message-level fields of its first occurrence.
    pub(crate) fn message_slot(
        &mut self,
        id: MessageId,
        make: impl FnOnce() -> CanSpecMessage,
    ) -> usize {
        if let Some(&slot) = self.index.get(&id) {
            return slot;
        }
        let slot = self.messages.len();
        self.messages.push(make());
        self.index.insert(id, slot);
        slot
    }

    /// Whether a message with `id` was already collected
    pub(crate) fn contains(&self, id: MessageId) -> bool {
        self.index.contains_key(&id)
    }

    /// Validate `signal` against its message and keep it if it passes
    ///
    /// Returns `false` when the signal was dropped; the reason is recorded
    /// as an issue.
    pub(crate) fn push_signal(
        &mut self,
        slot: usize,
        signal: CanSpecSignal,
        line: Option<usize>,
    ) -> bool {
        self.rows_read += 1;
        let Some(message) = self.messages.get_mut(slot) else {
            self.rows_skipped += 1;
            return false;
        };

        match layout_violation(message, &signal) {
            None => {
                message.signals.push(signal);
                true
            }
            Some(kind) => {
                let message_id = message.id;
                self.drop_signal(message_id, signal, kind, line);
                false
            }
        }
    }

    /// Like [`push_signal`](Self::push_signal), but the message for `id` is
    /// only created once a signal for it is accepted
    ///
    /// Used by row formats where a message has no existence of its own.
    pub(crate) fn push_row_signal(
        &mut self,
        id: MessageId,
        make: impl FnOnce() -> CanSpecMessage,
        signal: CanSpecSignal,
        line: Option<usize>,
    ) -> bool {
        if let Some(&slot) = self.index.get(&id) {
            return self.push_signal(slot, signal, line);
        }

        self.rows_read += 1;
        let mut message = make();
        if let Some(kind) = layout_violation(&message, &signal) {
            self.drop_signal(id, signal, kind, line);
            return false;
        }
        message.signals.push(signal);
        self.index.insert(id, self.messages.len());
        self.messages.push(message);
        true
    }

    fn drop_signal(
        &mut self,
        message_id: MessageId,
        signal: CanSpecSignal,
        kind: ParseIssueKind,
        line: Option<usize>,
    ) {
        tracing::debug!(
            message_id = %message_id,
            signal = %signal.name,
            reason = ?kind,
            "dropping signal"
        );
        self.issues.push(ParseIssue {
            line,
            message_id: Some(message_id),
            signal: Some(signal.name),
            kind,
        });
        self.rows_skipped += 1;
    }

    /// Record a row that could not be turned into a signal at all
    pub(crate) fn skip_row(&mut self, issue: ParseIssue) {
        tracing::debug!(line = ?issue.line, reason = ?issue.kind, "skipping row");
        self.rows_read += 1;
        self.rows_skipped += 1;
        self.issues.push(issue);
    }

    pub(crate) fn finish(self) -> (Vec<CanSpecMessage>, Vec<ParseIssue>, usize, usize) {
        (self.messages, self.issues, self.rows_read, self.rows_skipped)
    }
}

fn layout_violation(message: &CanSpecMessage, signal: &CanSpecSignal) -> Option<ParseIssueKind> {
    if signal.bit_length == 0 {
        Some(ParseIssueKind::ZeroBitLength)
    } else if !signal.fits_in(message.dlc) {
        Some(ParseIssueKind::LayoutOverflow {
            end_bit: signal.end_bit(),
            payload_bits: message.payload_bits(),
        })
    } else if message.has_signal(&signal.name) {
        Some(ParseIssueKind::DuplicateSignal)
    } else {
        None
    }
}
