use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::diff::CanSpecDiff;
use super::format::SpecFormat;
use super::message::{total_signals, CanSpecMessage};
use super::metadata::Metadata;
use crate::digest::content_hash;
use crate::errors::{CanSpecError, Result};

/// Metadata of the uploaded file an import was created from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportFile {
    pub name: String,
    pub format: SpecFormat,
    pub size_bytes: usize,
    /// SHA256 of the raw bytes, used for duplicate detection
    pub content_hash: String,
}

impl ImportFile {
    /// Describe `bytes` as an uploaded file, hashing its content
    pub fn from_bytes(name: impl Into<String>, format: SpecFormat, bytes: &[u8]) -> Self {
        Self {
            name: name.into(),
            format,
            size_bytes: bytes.len(),
            content_hash: content_hash(bytes),
        }
    }
}

/// Lifecycle of an import
///
/// Counts exist only on `Completed` and the reason only on `Failed`, so a
/// caller cannot read counts from an import that never finished.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ImportStatus {
    Pending,
    Parsing,
    Completed {
        message_count: usize,
        signal_count: usize,
    },
    Failed {
        reason: String,
    },
}

impl ImportStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ImportStatus::Completed { .. } | ImportStatus::Failed { .. }
        )
    }

    pub fn name(&self) -> &'static str {
        match self {
            ImportStatus::Pending => "Pending",
            ImportStatus::Parsing => "Parsing",
            ImportStatus::Completed { .. } => "Completed",
            ImportStatus::Failed { .. } => "Failed",
        }
    }
}

impl fmt::Display for ImportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Aggregate root for one uploaded specification file
///
/// Created `Pending`, moved to `Parsing` while the parser runs, and finished
/// with exactly one of `mark_as_completed` or `mark_as_failed`. Once terminal
/// every mutating call fails with `IllegalStatusTransition`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanSpecImport {
    id: String,
    file: ImportFile,
    imported_at: DateTime<Utc>,
    imported_by: String,
    status: ImportStatus,
    messages: Vec<CanSpecMessage>,
    diffs: Vec<CanSpecDiff>,
    attributes: Metadata,
}

impl CanSpecImport {
    /// Create a pending import with a fresh UUID v7 id
    pub fn new(file: ImportFile, imported_by: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7().to_string(),
            file,
            imported_at: Utc::now(),
            imported_by: imported_by.into(),
            status: ImportStatus::Pending,
            messages: Vec::new(),
            diffs: Vec::new(),
            attributes: Metadata::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn file(&self) -> &ImportFile {
        &self.file
    }

    pub fn imported_at(&self) -> DateTime<Utc> {
        self.imported_at
    }

    pub fn imported_by(&self) -> &str {
        &self.imported_by
    }

    pub fn status(&self) -> &ImportStatus {
        &self.status
    }

    pub fn messages(&self) -> &[CanSpecMessage] {
        &self.messages
    }

    pub fn diffs(&self) -> &[CanSpecDiff] {
        &self.diffs
    }

    pub fn attributes(&self) -> &Metadata {
        &self.attributes
    }

    /// Attributes may be edited until the import is terminal
    ///
    /// # Errors
    ///
    /// Returns `IllegalStatusTransition` once the import is terminal.
    pub fn attributes_mut(&mut self) -> Result<&mut Metadata> {
        self.ensure_open("Attributes")?;
        Ok(&mut self.attributes)
    }

    /// `(message_count, signal_count)` of a completed import
    pub fn counts(&self) -> Option<(usize, usize)> {
        match self.status {
            ImportStatus::Completed {
                message_count,
                signal_count,
            } => Some((message_count, signal_count)),
            _ => None,
        }
    }

    /// Failure reason of a failed import
    pub fn failure_reason(&self) -> Option<&str> {
        match &self.status {
            ImportStatus::Failed { reason } => Some(reason),
            _ => None,
        }
    }

    /// Pending → Parsing
    ///
    /// # Errors
    ///
    /// Returns `IllegalStatusTransition` unless the import is `Pending`.
    pub fn begin_parsing(&mut self) -> Result<()> {
        if self.status != ImportStatus::Pending {
            return Err(self.illegal("Parsing"));
        }
        self.status = ImportStatus::Parsing;
        Ok(())
    }

    /// Attach the diff against the previous snapshot
    ///
    /// # Errors
    ///
    /// Returns `IllegalStatusTransition` once the import is terminal.
    pub fn attach_diffs(&mut self, diffs: Vec<CanSpecDiff>) -> Result<()> {
        self.ensure_open("Diffs")?;
        self.diffs.extend(diffs);
        Ok(())
    }

    /// Store the parsed messages and move to `Completed`
    ///
    /// Counts are derived from `messages`, so they always agree with the
    /// owned collection.
    ///
    /// # Errors
    ///
    /// Returns `IllegalStatusTransition` once the import is terminal.
    pub fn mark_as_completed(&mut self, messages: Vec<CanSpecMessage>) -> Result<()> {
        self.ensure_open("Completed")?;
        self.status = ImportStatus::Completed {
            message_count: messages.len(),
            signal_count: total_signals(&messages),
        };
        self.messages = messages;
        Ok(())
    }

    /// Record a fatal failure
    ///
    /// # Errors
    ///
    /// Returns `IllegalStatusTransition` once the import is terminal.
    pub fn mark_as_failed(&mut self, reason: impl Into<String>) -> Result<()> {
        self.ensure_open("Failed")?;
        self.status = ImportStatus::Failed {
            reason: reason.into(),
        };
        Ok(())
    }

    fn ensure_open(&self, target: &str) -> Result<()> {
        if self.status.is_terminal() {
            return Err(self.illegal(target));
        }
        Ok(())
    }

    fn illegal(&self, target: &str) -> CanSpecError {
        CanSpecError::IllegalStatusTransition {
            import_id: self.id.clone(),
            from: self.status.name().to_string(),
            to: target.to_string(),
        }
    }
}
