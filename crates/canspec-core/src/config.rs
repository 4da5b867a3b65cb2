//! Engine configuration.
//!
//! Loaded from a TOML file by the CLI or built in code by an embedding
//! service. Every field has a default, so an empty file is valid.
//!
//! ```toml
//! max_input_bytes = 16777216
//! default_dlc = 8
//! default_subsystem = "Powertrain"
//! fail_on_major = true
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::errors::{CanSpecError, Result};
use crate::model::message::CLASSIC_MAX_DLC;

const DEFAULT_MAX_INPUT_BYTES: usize = 16 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Inputs larger than this are rejected before parsing
    pub max_input_bytes: usize,
    /// DLC assigned to messages whose source does not declare one; at most
    /// the classic frame maximum
    pub default_dlc: u8,
    /// Subsystem tag stamped on diffs when the caller supplies none
    pub default_subsystem: Option<String>,
    /// Whether the CLI exits non-zero on a major incompatibility
    pub fail_on_major: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_input_bytes: DEFAULT_MAX_INPUT_BYTES,
            default_dlc: 8,
            default_subsystem: None,
            fail_on_major: false,
        }
    }
}

impl EngineConfig {
    /// Parse and validate a TOML document
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` for malformed TOML, unknown keys, or values
    /// rejected by [`EngineConfig::validate`].
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: EngineConfig =
            toml::from_str(text).map_err(|e| CanSpecError::InvalidConfig {
                reason: e.to_string(),
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Read and validate a TOML file
    ///
    /// # Errors
    ///
    /// Returns `Io` if the file cannot be read, otherwise as
    /// [`EngineConfig::from_toml_str`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&text)
    }

    /// # Errors
    ///
    /// Returns `InvalidConfig` when `max_input_bytes` is zero or
    /// `default_dlc` exceeds the classic frame maximum.
    pub fn validate(&self) -> Result<()> {
        if self.max_input_bytes == 0 {
            return Err(CanSpecError::InvalidConfig {
                reason: "max_input_bytes must be greater than zero".to_string(),
            });
        }
        if self.default_dlc > CLASSIC_MAX_DLC {
            return Err(CanSpecError::InvalidConfig {
                reason: format!(
                    "default_dlc {} exceeds the maximum of {}",
                    self.default_dlc, CLASSIC_MAX_DLC
                ),
            });
        }
        Ok(())
    }
}
