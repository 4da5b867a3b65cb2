//! Import workflow.
//!
//! `run_import` drives one uploaded file through the import lifecycle:
//! admission checks, `Pending` → `Parsing`, parse, optional diff against a
//! baseline, and a terminal `Completed` or `Failed` state.

use std::time::Instant;

use canspec_core_types::RequestContext;

use crate::config::EngineConfig;
use crate::diff::{compute_diff, DiffOptions, SpecDiff};
use crate::digest::content_hash;
use crate::errors::{CanSpecError, ExError, Result};
use crate::model::{CanSpecImport, CanSpecMessage, ImportFile, SpecFormat};
use crate::ops::repository::ImportRepository;
use crate::parser::{parse_with_format, ParseIssue, ParserOptions};
use crate::{log_op_end, log_op_error, log_op_start};

/// One uploaded specification file
#[derive(Debug, Clone, PartialEq)]
pub struct ImportRequest {
    pub file_name: String,
    pub format_tag: String,
    pub bytes: Vec<u8>,
    pub imported_by: String,
    /// Previous snapshot to diff against
    pub baseline: Option<Vec<CanSpecMessage>>,
    /// Impacted subsystem stamped on diffs; falls back to the configured default
    pub subsystem: Option<String>,
    /// Correlation ids stamped on every event and error of this import
    pub context: RequestContext,
}

impl ImportRequest {
    pub fn new(
        file_name: impl Into<String>,
        format_tag: impl Into<String>,
        bytes: impl Into<Vec<u8>>,
        imported_by: impl Into<String>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            format_tag: format_tag.into(),
            bytes: bytes.into(),
            imported_by: imported_by.into(),
            baseline: None,
            subsystem: None,
            context: RequestContext::new(),
        }
    }

    pub fn with_baseline(mut self, baseline: Vec<CanSpecMessage>) -> Self {
        self.baseline = Some(baseline);
        self
    }

    pub fn with_subsystem(mut self, subsystem: impl Into<String>) -> Self {
        self.subsystem = Some(subsystem.into());
        self
    }

    /// Carry the caller's correlation ids instead of a fresh request id
    pub fn with_context(mut self, context: RequestContext) -> Self {
        self.context = context;
        self
    }
}

/// Result of an import attempt that got as far as creating an import
#[derive(Debug, Clone, PartialEq)]
pub struct ImportOutcome {
    /// Terminal: `Completed` or `Failed`
    pub import: CanSpecImport,
    pub parse_issues: Vec<ParseIssue>,
    /// Present when a baseline was supplied and parsing succeeded
    pub diff: Option<SpecDiff>,
    /// The fatal parse error behind a `Failed` import
    pub failure: Option<CanSpecError>,
    /// Context the import ran under
    pub context: RequestContext,
}

impl ImportOutcome {
    pub fn is_completed(&self) -> bool {
        self.failure.is_none()
    }

    /// Structured report of the failure, tied to this import and request
    pub fn failure_report(&self) -> Option<ExError> {
        let err = self.failure.clone()?;
        Some(
            ExError::from(err)
                .with_op("import")
                .with_entity_id(self.import.id())
                .with_context(&self.context),
        )
    }
}

/// Resolve the format and enforce the size cap, logging a rejection
fn admit(config: &EngineConfig, request: &ImportRequest, started: Instant) -> Result<SpecFormat> {
    let admitted = SpecFormat::from_tag(&request.format_tag).and_then(|format| {
        if request.bytes.len() > config.max_input_bytes {
            return Err(CanSpecError::InputTooLarge {
                size: request.bytes.len(),
                limit: config.max_input_bytes,
            });
        }
        Ok(format)
    });
    admitted.inspect_err(|err| {
        log_op_error!(
            "import",
            ExError::from(err.clone()).with_context(&request.context),
            duration_ms = started.elapsed().as_millis() as u64,
            file_name = %request.file_name
        );
    })
}

/// Run one import through its lifecycle
///
/// # Errors
///
/// - `UnsupportedFormat` / `InputTooLarge`: rejected before an import exists
///
/// A fatal parse error does not surface here: the import is marked
/// `Failed` and the error is carried in [`ImportOutcome::failure`].
pub fn run_import(config: &EngineConfig, request: ImportRequest) -> Result<ImportOutcome> {
    let started = Instant::now();
    let format = admit(config, &request, started)?;
    let hash = content_hash(&request.bytes);
    execute(config, request, format, hash, started)
}

/// The lifecycle after admission, with the content already hashed
fn execute(
    config: &EngineConfig,
    request: ImportRequest,
    format: SpecFormat,
    content_hash: String,
    started: Instant,
) -> Result<ImportOutcome> {
    let ImportRequest {
        file_name,
        bytes,
        imported_by,
        baseline,
        subsystem,
        context,
        ..
    } = request;

    let file = ImportFile {
        name: file_name,
        format,
        size_bytes: bytes.len(),
        content_hash,
    };
    let mut import = CanSpecImport::new(file, imported_by);
    log_op_start!(
        "import",
        import_id = import.id(),
        request_id = %context.request_id,
        format = format.tag(),
        input_bytes = bytes.len()
    );

    import.begin_parsing()?;
    let options = ParserOptions {
        default_dlc: config.default_dlc,
    };

    let parsed = match parse_with_format(&bytes, format, &options) {
        Ok(parsed) => parsed,
        Err(err) => {
            import.mark_as_failed(err.to_string())?;
            log_op_error!(
                "import",
                ExError::from(err.clone()).with_context(&context),
                duration_ms = started.elapsed().as_millis() as u64,
                import_id = import.id()
            );
            return Ok(ImportOutcome {
                import,
                parse_issues: Vec::new(),
                diff: None,
                failure: Some(err),
                context,
            });
        }
    };

    let attributes = import.attributes_mut()?;
    attributes.set("rows_read", parsed.rows_read as f64);
    attributes.set("rows_skipped", parsed.rows_skipped as f64);

    let diff = baseline.map(|old| {
        let options = DiffOptions {
            subsystem: subsystem.or_else(|| config.default_subsystem.clone()),
        };
        compute_diff(&old, &parsed.messages, &options)
    });
    if let Some(diff) = &diff {
        import.attach_diffs(diff.diffs.clone())?;
    }
    import.mark_as_completed(parsed.messages)?;

    let (message_count, signal_count) = import.counts().unwrap_or_default();
    log_op_end!(
        "import",
        duration_ms = started.elapsed().as_millis() as u64,
        import_id = import.id(),
        request_id = %context.request_id,
        message_count = message_count,
        signal_count = signal_count,
        diff_count = import.diffs().len()
    );

    Ok(ImportOutcome {
        import,
        parse_issues: parsed.issues,
        diff,
        failure: None,
        context,
    })
}

/// Run an import and store it, rejecting content that was already imported
///
/// Both completed and failed imports are stored.
///
/// # Errors
///
/// - `UnsupportedFormat` / `InputTooLarge`: as [`run_import`]
/// - `DuplicateImport`: a live import with the same content hash exists
/// - repository errors from `insert`
pub fn import_into<R: ImportRepository + ?Sized>(
    repo: &mut R,
    config: &EngineConfig,
    request: ImportRequest,
) -> Result<ImportOutcome> {
    let started = Instant::now();
    let format = admit(config, &request, started)?;
    let hash = content_hash(&request.bytes);
    if let Some(existing) = repo.find_by_content_hash(&hash)? {
        let err = CanSpecError::DuplicateImport {
            content_hash: hash,
            existing_import_id: existing.id().to_string(),
        };
        log_op_error!(
            "import",
            ExError::from(err.clone()).with_context(&request.context),
            duration_ms = started.elapsed().as_millis() as u64,
            file_name = %request.file_name
        );
        return Err(err);
    }

    let outcome = execute(config, request, format, hash, started)?;
    repo.insert(outcome.import.clone())?;
    Ok(outcome)
}

/// Repository plus configuration, for callers that import repeatedly
#[derive(Debug, Clone, Default)]
pub struct ImportService<R: ImportRepository> {
    repo: R,
    config: EngineConfig,
}

impl<R: ImportRepository> ImportService<R> {
    pub fn new(repo: R, config: EngineConfig) -> Self {
        Self { repo, config }
    }

    /// # Errors
    ///
    /// As [`import_into`].
    pub fn import(&mut self, request: ImportRequest) -> Result<ImportOutcome> {
        import_into(&mut self.repo, &self.config, request)
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ExErrorKind;
    use crate::model::ImportStatus;
    use crate::ops::repository::InMemoryImportRepository;
    use canspec_core_types::{RequestId, TraceId};

    const CSV: &[u8] = b"0x100,Speed,0,16,false,false,0,250,0.01,0,km/h\n";

    #[test]
    fn test_run_import_completes() {
        let outcome =
            run_import(&EngineConfig::default(), ImportRequest::new("a.csv", "csv", CSV, "ci")).unwrap();
        assert!(outcome.is_completed());
        assert_eq!(outcome.import.counts(), Some((1, 1)));
        assert!(outcome.diff.is_none());
        assert_eq!(outcome.import.file().format, SpecFormat::Csv);
    }

    #[test]
    fn test_unsupported_format_creates_no_import() {
        let err = run_import(&EngineConfig::default(), ImportRequest::new("a.dbc", "dbc", CSV, "ci"))
            .unwrap_err();
        assert!(matches!(err, CanSpecError::UnsupportedFormat { .. }));
    }

    #[test]
    fn test_size_cap() {
        let config = EngineConfig {
            max_input_bytes: 4,
            ..EngineConfig::default()
        };
        let err = run_import(&config, ImportRequest::new("a.csv", "csv", CSV, "ci")).unwrap_err();
        assert_eq!(
            err,
            CanSpecError::InputTooLarge {
                size: CSV.len(),
                limit: 4
            }
        );
    }

    #[test]
    fn test_malformed_json_marks_failed() {
        let outcome = run_import(
            &EngineConfig::default(),
            ImportRequest::new("a.json", "json", &b"{\"frames\": []}"[..], "ci"),
        )
        .unwrap();
        assert!(!outcome.is_completed());
        assert!(matches!(outcome.import.status(), ImportStatus::Failed { .. }));
        assert!(matches!(outcome.failure, Some(CanSpecError::MalformedJson { .. })));
    }

    #[test]
    fn test_duplicate_content_rejected() {
        let mut repo = InMemoryImportRepository::new();
        let config = EngineConfig::default();
        let first = import_into(&mut repo, &config, ImportRequest::new("a.csv", "csv", CSV, "ci")).unwrap();

        let err = import_into(&mut repo, &config, ImportRequest::new("b.csv", "CSV", CSV, "ci"))
            .unwrap_err();
        match err {
            CanSpecError::DuplicateImport {
                existing_import_id, ..
            } => assert_eq!(existing_import_id, first.import.id()),
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(repo.len(), 1);
    }

    #[test]
    fn test_failure_report_carries_request_context() {
        let context = RequestContext::with_request_id(RequestId::from_string("req-9"))
            .with_trace_id(TraceId::from_string("trace-9"));
        let request = ImportRequest::new("a.json", "json", &b"[1, 2"[..], "ci").with_context(context.clone());

        let outcome = run_import(&EngineConfig::default(), request).unwrap();
        assert_eq!(outcome.context, context);

        let report = outcome.failure_report().unwrap();
        assert_eq!(report.kind(), ExErrorKind::MalformedJson);
        assert_eq!(report.op(), Some("import"));
        assert_eq!(report.entity_id(), Some(outcome.import.id()));
        assert_eq!(report.request_id().map(|id| id.as_str()), Some("req-9"));
        assert_eq!(report.trace_id().map(|id| id.as_str()), Some("trace-9"));
    }

    #[test]
    fn test_completed_import_has_no_failure_report() {
        let outcome =
            run_import(&EngineConfig::default(), ImportRequest::new("a.csv", "csv", CSV, "ci")).unwrap();
        assert!(outcome.failure_report().is_none());
    }

    #[test]
    fn test_import_into_admits_once_and_keeps_the_hash() {
        let mut repo = InMemoryImportRepository::new();
        let config = EngineConfig::default();

        let err = import_into(&mut repo, &config, ImportRequest::new("a.dbc", "dbc", CSV, "ci"))
            .unwrap_err();
        assert!(matches!(err, CanSpecError::UnsupportedFormat { .. }));
        assert_eq!(repo.len(), 0);

        let outcome = import_into(&mut repo, &config, ImportRequest::new("a.csv", "csv", CSV, "ci")).unwrap();
        let file = outcome.import.file();
        assert_eq!(file.content_hash, content_hash(CSV));
        assert_eq!(file.size_bytes, CSV.len());
        assert_eq!(file.name, "a.csv");
        assert_eq!(file.format, SpecFormat::Csv);
        assert_eq!(repo.len(), 1);
    }
}
