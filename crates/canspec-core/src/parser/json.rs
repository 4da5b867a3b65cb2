//! Strict JSON reader.
//!
//! ```json
//! {
//!   "messages": [
//!     {
//!       "messageId": 256,
//!       "messageName": "EngineStatus",
//!       "dlc": 8,
//!       "signals": [
//!         { "name": "RPM", "startBit": 0, "bitLength": 16, "factor": 0.25, "unit": "rpm" }
//!       ]
//!     }
//!   ]
//! }
//! ```
//!
//! Any structural problem aborts the whole document.

use serde::Deserialize;

use super::batch::MessageBatch;
use super::{ParseResult, ParserOptions};
use crate::errors::{CanSpecError, Result};
use crate::model::{CanSpecMessage, CanSpecSignal, MessageId, SpecFormat};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SpecDocument {
    messages: Vec<MessageEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MessageEntry {
    message_id: u64,
    message_name: Option<String>,
    dlc: Option<u32>,
    #[serde(default)]
    is_extended: bool,
    transmitter: Option<String>,
    cycle_time: Option<u32>,
    #[serde(default)]
    signals: Vec<SignalEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignalEntry {
    name: String,
    start_bit: u32,
    bit_length: u32,
    #[serde(default)]
    is_signed: bool,
    #[serde(default)]
    is_big_endian: bool,
    #[serde(default)]
    min: f64,
    #[serde(default)]
    max: f64,
    #[serde(default = "unit_factor")]
    factor: f64,
    #[serde(default)]
    offset: f64,
    unit: Option<String>,
    receiver: Option<String>,
    description: Option<String>,
}

fn unit_factor() -> f64 {
    1.0
}

impl From<SignalEntry> for CanSpecSignal {
    fn from(entry: SignalEntry) -> Self {
        Self {
            name: entry.name,
            start_bit: entry.start_bit,
            bit_length: entry.bit_length,
            is_big_endian: entry.is_big_endian,
            is_signed: entry.is_signed,
            factor: entry.factor,
            offset: entry.offset,
            min: entry.min,
            max: entry.max,
            unit: entry.unit.unwrap_or_default(),
            receiver: entry.receiver,
            description: entry.description,
        }
    }
}

/// Parse a JSON document
///
/// # Errors
///
/// - `MalformedJson`: invalid syntax or UTF-8, missing `messages`, wrong
///   types, missing required fields
/// - `InvalidDlc`: a message declares a DLC above what its framing allows
pub fn parse_json(bytes: &[u8], options: &ParserOptions) -> Result<ParseResult> {
    let document: SpecDocument =
        serde_json::from_slice(bytes).map_err(|e| CanSpecError::MalformedJson {
            detail: e.to_string(),
        })?;

    let mut batch = MessageBatch::new();
    for entry in document.messages {
        let id = MessageId::new(entry.message_id);
        let dlc = resolve_dlc(id, entry.dlc, entry.is_extended, options)?;

        if batch.contains(id) {
            tracing::debug!(message_id = %id, "merging duplicate message entry, first occurrence wins");
        }
        let slot = batch.message_slot(id, || CanSpecMessage {
            id,
            name: entry
                .message_name
                .clone()
                .unwrap_or_else(|| id.synthetic_name()),
            dlc,
            is_extended: entry.is_extended,
            transmitter: entry.transmitter.clone(),
            cycle_time_ms: entry.cycle_time,
            signals: Vec::new(),
        });

        for signal in entry.signals {
            batch.push_signal(slot, signal.into(), None);
        }
    }

    let (messages, issues, rows_read, rows_skipped) = batch.finish();
    Ok(ParseResult {
        format: SpecFormat::Json,
        messages,
        issues,
        rows_read,
        rows_skipped,
    })
}

fn resolve_dlc(
    id: MessageId,
    declared: Option<u32>,
    is_extended: bool,
    options: &ParserOptions,
) -> Result<u8> {
    let Some(dlc) = declared else {
        return Ok(options.dlc_for(is_extended));
    };
    let max = CanSpecMessage::max_dlc(is_extended);
    match u8::try_from(dlc) {
        Ok(value) if value <= max => Ok(value),
        _ => Err(CanSpecError::InvalidDlc { message_id: id, dlc }),
    }
}
