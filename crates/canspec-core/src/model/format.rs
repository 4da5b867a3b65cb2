use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::{CanSpecError, Result};

/// Input formats understood by the parser
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpecFormat {
    /// One comma-separated row per signal; parsed leniently
    Csv,
    /// Object with a `messages` array; parsed strictly
    Json,
}

impl SpecFormat {
    /// Resolve a declared format tag, ignoring case and surrounding whitespace
    ///
    /// # Errors
    ///
    /// Returns `UnsupportedFormat` for any tag other than CSV or JSON.
    pub fn from_tag(tag: &str) -> Result<Self> {
        match tag.trim().to_ascii_uppercase().as_str() {
            "CSV" => Ok(SpecFormat::Csv),
            "JSON" => Ok(SpecFormat::Json),
            _ => Err(CanSpecError::UnsupportedFormat {
                format: tag.to_string(),
            }),
        }
    }

    /// Canonical tag, as stored on imports
    pub fn tag(&self) -> &'static str {
        match self {
            SpecFormat::Csv => "CSV",
            SpecFormat::Json => "JSON",
        }
    }
}

impl fmt::Display for SpecFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}
