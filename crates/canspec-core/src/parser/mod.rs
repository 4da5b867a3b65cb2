//! Specification parser.
//!
//! Turns raw file bytes plus a declared format tag into messages and signals.
//!
//! ## Entry point
//!
//! ```
//! use canspec_core::parser::parse;
//!
//! let result = parse(b"0x200,RPM,0,16,false,true,0,8000,0.25,0,rpm", "csv").unwrap();
//! assert_eq!(result.message_count(), 1);
//! assert_eq!(result.signal_count(), 1);
//! ```
//!
//! ## Failure policy
//!
//! - **CSV is lenient**: a row with too few columns or a failed numeric or
//!   boolean conversion is skipped and recorded as a [`ParseIssue`]; parsing
//!   never fails because of row content.
//! - **JSON is strict**: malformed syntax, a missing `messages` array, a
//!   wrong type or a missing required field aborts the parse with
//!   `MalformedJson` and no partial output.
//! - Both formats drop individual signals that violate the layout rules
//!   (zero length, overflow past `dlc * 8`, duplicate name) and record an
//!   issue instead of failing.

mod batch;
pub mod csv;
pub mod json;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Instant;

use crate::errors::Result;
use crate::model::message::total_signals;
use crate::model::{CanSpecMessage, MessageId, SpecFormat};
use crate::{log_op_end, log_op_error, log_op_start};

/// Parser tunables, normally taken from `EngineConfig`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserOptions {
    /// DLC for messages whose source declares none
    pub default_dlc: u8,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self { default_dlc: 8 }
    }
}

impl ParserOptions {
    /// Default DLC clamped to what the framing allows
    pub fn dlc_for(&self, is_extended: bool) -> u8 {
        self.default_dlc.min(CanSpecMessage::max_dlc(is_extended))
    }
}

/// Why a row or signal was dropped
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum ParseIssueKind {
    TooFewColumns { found: usize },
    InvalidMessageId,
    InvalidNumber { column: String },
    NonFiniteNumber { column: String },
    InvalidBoolean { column: String },
    ZeroBitLength,
    LayoutOverflow { end_bit: u64, payload_bits: u64 },
    DuplicateSignal,
}

/// A non-fatal problem found while parsing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseIssue {
    /// 1-based source line (CSV only)
    pub line: Option<usize>,
    pub message_id: Option<MessageId>,
    pub signal: Option<String>,
    pub kind: ParseIssueKind,
}

impl fmt::Display for ParseIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(line) = self.line {
            write!(f, "line {}: ", line)?;
        }
        match &self.kind {
            ParseIssueKind::TooFewColumns { found } => {
                write!(f, "expected 11 columns, found {}", found)?
            }
            ParseIssueKind::InvalidMessageId => write!(f, "invalid message id")?,
            ParseIssueKind::InvalidNumber { column } => {
                write!(f, "column {} is not a valid number", column)?
            }
            ParseIssueKind::NonFiniteNumber { column } => {
                write!(f, "column {} is not a finite number", column)?
            }
            ParseIssueKind::InvalidBoolean { column } => {
                write!(f, "column {} is not true/false", column)?
            }
            ParseIssueKind::ZeroBitLength => write!(f, "bit length must be greater than zero")?,
            ParseIssueKind::LayoutOverflow {
                end_bit,
                payload_bits,
            } => write!(
                f,
                "signal ends at bit {} but the payload has {} bits",
                end_bit, payload_bits
            )?,
            ParseIssueKind::DuplicateSignal => write!(f, "duplicate signal name")?,
        }
        if let Some(signal) = &self.signal {
            write!(f, " (signal {})", signal)?;
        }
        if let Some(message_id) = &self.message_id {
            write!(f, " (message {})", message_id)?;
        }
        Ok(())
    }
}

/// Output of a successful parse
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParseResult {
    pub format: SpecFormat,
    /// Messages in order of first appearance
    pub messages: Vec<CanSpecMessage>,
    pub issues: Vec<ParseIssue>,
    /// Data rows (CSV) or signal entries (JSON) examined
    pub rows_read: usize,
    /// Rows or entries that did not yield a signal
    pub rows_skipped: usize,
}

impl ParseResult {
    pub fn message_count(&self) -> usize {
        self.messages.len()
    }

    pub fn signal_count(&self) -> usize {
        total_signals(&self.messages)
    }

    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Parse `bytes` declared as `format_tag` with default options
///
/// # Errors
///
/// - `UnsupportedFormat`: the tag is neither CSV nor JSON
/// - `MalformedJson`: JSON input is structurally invalid
/// - `InvalidDlc`: JSON input declares a DLC the frame cannot carry
pub fn parse(bytes: &[u8], format_tag: &str) -> Result<ParseResult> {
    let format = SpecFormat::from_tag(format_tag).inspect_err(|err| {
        log_op_error!("parse", err.clone(), duration_ms = 0u64);
    })?;
    parse_with_format(bytes, format, &ParserOptions::default())
}

/// Parse `bytes` in an already resolved format
///
/// # Errors
///
/// As [`parse`], minus `UnsupportedFormat`.
pub fn parse_with_format(
    bytes: &[u8],
    format: SpecFormat,
    options: &ParserOptions,
) -> Result<ParseResult> {
    let started = Instant::now();
    log_op_start!("parse", format = format.tag(), input_bytes = bytes.len());

    let result = match format {
        SpecFormat::Csv => Ok(csv::parse_csv(bytes, options)),
        SpecFormat::Json => json::parse_json(bytes, options),
    };

    let duration_ms = started.elapsed().as_millis() as u64;
    match &result {
        Ok(parsed) => {
            log_op_end!(
                "parse",
                duration_ms = duration_ms,
                format = format.tag(),
                message_count = parsed.message_count(),
                signal_count = parsed.signal_count(),
                rows_skipped = parsed.rows_skipped,
            );
        }
        Err(err) => {
            log_op_error!(
                "parse",
                err.clone(),
                duration_ms = duration_ms,
                format = format.tag()
            );
        }
    }
    result
}
