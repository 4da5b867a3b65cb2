//! Diff command
//!
//! Usage: canspec diff <OLD> <NEW> [--format <csv|json>] [--subsystem <NAME>] [--json] [--output <FILE>]

use clap::Args;
use std::path::PathBuf;

use canspec_core::diff::render_human_summary;
use canspec_core::{EngineConfig, RequestContext, SpecDiff};

use super::{import_pair, CliResult};

#[derive(Debug, Args)]
pub struct DiffArgs {
    /// Baseline specification file
    pub old: PathBuf,

    /// Candidate specification file
    pub new: PathBuf,

    /// Input format for both files (default: file extension)
    #[arg(short, long)]
    pub format: Option<String>,

    /// Subsystem impacted by the change
    #[arg(short, long)]
    pub subsystem: Option<String>,

    /// Print the diff as JSON instead of Markdown
    #[arg(long)]
    pub json: bool,

    /// Output file path (default: stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Execute diff command
pub fn execute(args: DiffArgs, config: &EngineConfig) -> CliResult<i32> {
    let (_, new_outcome) = import_pair(
        config,
        &RequestContext::new(),
        &args.old,
        &args.new,
        args.format.as_deref(),
        args.subsystem,
    )?;
    let diff = new_outcome
        .diff
        .unwrap_or_else(|| SpecDiff::from_diffs(Vec::new()));

    let rendered = if args.json {
        serde_json::to_string_pretty(&diff)?
    } else {
        render_human_summary(&diff)
    };

    if let Some(output_path) = args.output {
        std::fs::write(&output_path, rendered)?;
        println!("✓ Diff written to {}", output_path.display());
    } else {
        println!("{}", rendered);
    }

    Ok(0)
}
