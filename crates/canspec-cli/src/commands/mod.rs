pub mod analyze;
pub mod diff;
pub mod parse;

use std::path::Path;

use canspec_core::ops::{run_import, ImportOutcome, ImportRequest};
use canspec_core::{CanSpecMessage, EngineConfig, RequestContext};

pub type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

/// Load `--config` or fall back to defaults
pub fn load_config(path: Option<&Path>) -> CliResult<EngineConfig> {
    match path {
        Some(path) => Ok(EngineConfig::load(path)?),
        None => Ok(EngineConfig::default()),
    }
}

/// Format tag for a file: the explicit flag, else the file extension
pub fn format_tag(path: &Path, explicit: Option<&str>) -> CliResult<String> {
    if let Some(tag) = explicit {
        return Ok(tag.to_string());
    }
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_string)
        .ok_or_else(|| {
            format!(
                "cannot infer the format of {}; pass --format",
                path.display()
            )
            .into()
        })
}

/// Import one file, turning a failed import into an error
pub fn import_file(
    config: &EngineConfig,
    context: &RequestContext,
    path: &Path,
    format: Option<&str>,
    baseline: Option<Vec<CanSpecMessage>>,
    subsystem: Option<String>,
) -> CliResult<ImportOutcome> {
    let bytes = std::fs::read(path)?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    let mut request = ImportRequest::new(file_name, format_tag(path, format)?, bytes, "cli")
        .with_context(context.clone());
    if let Some(baseline) = baseline {
        request = request.with_baseline(baseline);
    }
    if let Some(subsystem) = subsystem {
        request = request.with_subsystem(subsystem);
    }

    let mut outcome = run_import(config, request)?;
    if let Some(err) = outcome.failure.take() {
        return Err(format!("{}: {}", path.display(), err).into());
    }
    Ok(outcome)
}

/// Print skipped rows to stderr
pub fn report_issues(path: &Path, outcome: &ImportOutcome) {
    for issue in &outcome.parse_issues {
        eprintln!("warning: {}: {}", path.display(), issue);
    }
}

/// Diff `new` against `old`, returning both outcomes
///
/// Both imports run under `context`.
pub fn import_pair(
    config: &EngineConfig,
    context: &RequestContext,
    old: &Path,
    new: &Path,
    format: Option<&str>,
    subsystem: Option<String>,
) -> CliResult<(ImportOutcome, ImportOutcome)> {
    let old_outcome = import_file(config, context, old, format, None, None)?;
    report_issues(old, &old_outcome);
    let baseline = old_outcome.import.messages().to_vec();
    let new_outcome = import_file(config, context, new, format, Some(baseline), subsystem)?;
    report_issues(new, &new_outcome);
    Ok((old_outcome, new_outcome))
}
