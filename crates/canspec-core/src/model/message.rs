use serde::{Deserialize, Serialize};
use std::fmt;

/// Largest payload of a classic CAN frame, in bytes
pub const CLASSIC_MAX_DLC: u8 = 8;

/// Largest payload once extended (FD) framing is declared, in bytes
pub const EXTENDED_MAX_DLC: u8 = 64;

/// CAN frame identifier
///
/// Covers both 11-bit standard and 29-bit extended identifiers. Displays in
/// the `0x{id:X}` form used throughout reports and synthetic message names.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct MessageId(u64);

impl MessageId {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn value(&self) -> u64 {
        self.0
    }

    /// Parse a `0x`-prefixed hexadecimal or a plain decimal literal
    ///
    /// Returns `None` for anything else, including an empty hex body.
    pub fn parse_literal(text: &str) -> Option<Self> {
        let text = text.trim();
        let hex = text
            .strip_prefix("0x")
            .or_else(|| text.strip_prefix("0X"));
        match hex {
            Some(digits) => u64::from_str_radix(digits, 16).ok().map(Self),
            None => text.parse::<u64>().ok().map(Self),
        }
    }

    /// Name given to messages whose source carries no message-level metadata
    pub fn synthetic_name(&self) -> String {
        format!("MSG_0x{:X}", self.0)
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:X}", self.0)
    }
}

impl From<u64> for MessageId {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

/// A named, bit-addressed field packed inside a message payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanSpecSignal {
    /// Unique within the owning message
    pub name: String,
    pub start_bit: u32,
    /// Always greater than zero for signals produced by the parser
    pub bit_length: u32,
    pub is_big_endian: bool,
    pub is_signed: bool,
    pub factor: f64,
    pub offset: f64,
    pub min: f64,
    pub max: f64,
    pub unit: String,
    pub receiver: Option<String>,
    pub description: Option<String>,
}

impl CanSpecSignal {
    /// Create a little-endian, unsigned, unscaled signal
    pub fn new(name: impl Into<String>, start_bit: u32, bit_length: u32) -> Self {
        Self {
            name: name.into(),
            start_bit,
            bit_length,
            is_big_endian: false,
            is_signed: false,
            factor: 1.0,
            offset: 0.0,
            min: 0.0,
            max: 0.0,
            unit: String::new(),
            receiver: None,
            description: None,
        }
    }

    /// First bit past the end of the signal
    pub fn end_bit(&self) -> u64 {
        u64::from(self.start_bit) + u64::from(self.bit_length)
    }

    /// Whether the signal fits in a payload of `dlc` bytes
    pub fn fits_in(&self, dlc: u8) -> bool {
        self.end_bit() <= u64::from(dlc) * 8
    }
}

/// A single addressable CAN frame definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanSpecMessage {
    pub id: MessageId,
    pub name: String,
    /// Payload length in bytes
    pub dlc: u8,
    pub is_extended: bool,
    pub transmitter: Option<String>,
    pub cycle_time_ms: Option<u32>,
    pub signals: Vec<CanSpecSignal>,
}

impl CanSpecMessage {
    /// Create a classic frame with no signals
    pub fn new(id: MessageId, name: impl Into<String>, dlc: u8) -> Self {
        Self {
            id,
            name: name.into(),
            dlc,
            is_extended: false,
            transmitter: None,
            cycle_time_ms: None,
            signals: Vec::new(),
        }
    }

    pub fn signal(&self, name: &str) -> Option<&CanSpecSignal> {
        self.signals.iter().find(|s| s.name == name)
    }

    pub fn has_signal(&self, name: &str) -> bool {
        self.signal(name).is_some()
    }

    pub fn signal_count(&self) -> usize {
        self.signals.len()
    }

    pub fn payload_bits(&self) -> u64 {
        u64::from(self.dlc) * 8
    }

    /// Largest DLC this message may declare given its framing
    pub fn max_dlc(is_extended: bool) -> u8 {
        if is_extended {
            EXTENDED_MAX_DLC
        } else {
            CLASSIC_MAX_DLC
        }
    }
}

/// Total number of signals across a message batch
pub fn total_signals(messages: &[CanSpecMessage]) -> usize {
    messages.iter().map(CanSpecMessage::signal_count).sum()
}
