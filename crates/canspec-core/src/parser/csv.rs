//! Lenient CSV reader.
//!
//! One row per signal:
//!
//! ```text
//! MessageId,SignalName,StartBit,BitLength,IsSigned,IsBigEndian,Min,Max,Factor,Offset,Unit
//! 0x200,RPM,0,16,false,true,0,8000,0.25,0,rpm
//! ```
//!
//! Row content never fails the parse; anything that cannot become a signal
//! is skipped and reported as a [`ParseIssue`].

use super::batch::MessageBatch;
use super::{ParseIssue, ParseIssueKind, ParseResult, ParserOptions};
use crate::model::{CanSpecMessage, CanSpecSignal, MessageId, SpecFormat};

/// Number of columns every data row must carry
pub const REQUIRED_COLUMNS: usize = 11;

const COLUMN_NAMES: [&str; REQUIRED_COLUMNS] = [
    "MessageId",
    "SignalName",
    "StartBit",
    "BitLength",
    "IsSigned",
    "IsBigEndian",
    "Min",
    "Max",
    "Factor",
    "Offset",
    "Unit",
];

/// Parse CSV bytes; never fails
pub fn parse_csv(bytes: &[u8], options: &ParserOptions) -> ParseResult {
    let text = String::from_utf8_lossy(bytes);
    let mut batch = MessageBatch::new();
    let mut seen_first_row = false;

    for (idx, raw_line) in text.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw_line.trim_start_matches('\u{feff}');
        if line.trim().is_empty() {
            continue;
        }
        if !seen_first_row {
            seen_first_row = true;
            if is_header(line) {
                continue;
            }
        }

        let cells: Vec<&str> = line.split(',').map(str::trim).collect();
        match row_to_signal(&cells) {
            Ok((id, signal)) => {
                if batch.contains(id) {
                    tracing::debug!(message_id = %id, line = line_no, "merging row into existing message");
                }
                batch.push_row_signal(
                    id,
                    || CanSpecMessage::new(id, id.synthetic_name(), options.dlc_for(false)),
                    signal,
                    Some(line_no),
                );
            }
            Err((message_id, kind)) => batch.skip_row(ParseIssue {
                line: Some(line_no),
                message_id,
                signal: cells.get(1).filter(|s| !s.is_empty()).map(|s| s.to_string()),
                kind,
            }),
        }
    }

    let (messages, issues, rows_read, rows_skipped) = batch.finish();
    ParseResult {
        format: SpecFormat::Csv,
        messages,
        issues,
        rows_read,
        rows_skipped,
    }
}

fn is_header(line: &str) -> bool {
    line.contains("MessageId") && line.contains("SignalName")
}

type RowError = (Option<MessageId>, ParseIssueKind);

fn row_to_signal(cells: &[&str]) -> Result<(MessageId, CanSpecSignal), RowError> {
    if cells.len() < REQUIRED_COLUMNS {
        return Err((
            None,
            ParseIssueKind::TooFewColumns { found: cells.len() },
        ));
    }

    let id = MessageId::parse_literal(cells[0]).ok_or((None, ParseIssueKind::InvalidMessageId))?;
    let with_id = |kind| (Some(id), kind);

    let mut signal = CanSpecSignal::new(
        cells[1],
        parse_u32(cells, 2).map_err(with_id)?,
        parse_u32(cells, 3).map_err(with_id)?,
    );
    signal.is_signed = parse_bool(cells, 4).map_err(with_id)?;
    signal.is_big_endian = parse_bool(cells, 5).map_err(with_id)?;
    signal.min = parse_f64(cells, 6).map_err(with_id)?;
    signal.max = parse_f64(cells, 7).map_err(with_id)?;
    signal.factor = parse_f64(cells, 8).map_err(with_id)?;
    signal.offset = parse_f64(cells, 9).map_err(with_id)?;
    signal.unit = cells[10].to_string();

    Ok((id, signal))
}

fn parse_u32(cells: &[&str], col: usize) -> Result<u32, ParseIssueKind> {
    cells[col]
        .parse::<u32>()
        .map_err(|_| ParseIssueKind::InvalidNumber {
            column: COLUMN_NAMES[col].to_string(),
        })
}

fn parse_f64(cells: &[&str], col: usize) -> Result<f64, ParseIssueKind> {
    let value = cells[col]
        .parse::<f64>()
        .map_err(|_| ParseIssueKind::InvalidNumber {
            column: COLUMN_NAMES[col].to_string(),
        })?;
    if !value.is_finite() {
        return Err(ParseIssueKind::NonFiniteNumber {
            column: COLUMN_NAMES[col].to_string(),
        });
    }
    Ok(value)
}

fn parse_bool(cells: &[&str], col: usize) -> Result<bool, ParseIssueKind> {
    let cell = cells[col];
    if cell.eq_ignore_ascii_case("true") {
        Ok(true)
    } else if cell.eq_ignore_ascii_case("false") {
        Ok(false)
    } else {
        Err(ParseIssueKind::InvalidBoolean {
            column: COLUMN_NAMES[col].to_string(),
        })
    }
}
