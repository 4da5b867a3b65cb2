//! Analyze command
//!
//! Usage: canspec analyze <OLD> <NEW> [--format <csv|json>] [--analyst <NAME>] [--subsystem <NAME>] [--json]

use clap::Args;
use std::path::PathBuf;

use canspec_core::analysis::{analyze_spec_diff_with_context, CompatibilityLevel};
use canspec_core::{EngineConfig, RequestContext, SpecDiff};

use super::{import_pair, CliResult};

/// Exit code when `fail_on_major` is set and the change is a major incompatibility
pub const EXIT_MAJOR_INCOMPATIBILITY: i32 = 2;

#[derive(Debug, Args)]
pub struct AnalyzeArgs {
    /// Baseline specification file
    pub old: PathBuf,

    /// Candidate specification file
    pub new: PathBuf,

    /// Input format for both files (default: file extension)
    #[arg(short, long)]
    pub format: Option<String>,

    /// Name recorded as the analyst
    #[arg(short, long, default_value = "cli")]
    pub analyst: String,

    /// Subsystem impacted by the change
    #[arg(short, long)]
    pub subsystem: Option<String>,

    /// Print the full analysis as JSON
    #[arg(long)]
    pub json: bool,
}

/// Execute analyze command
pub fn execute(args: AnalyzeArgs, config: &EngineConfig) -> CliResult<i32> {
    let context = RequestContext::new();
    let (old_outcome, new_outcome) = import_pair(
        config,
        &context,
        &args.old,
        &args.new,
        args.format.as_deref(),
        args.subsystem,
    )?;
    let diff = new_outcome
        .diff
        .unwrap_or_else(|| SpecDiff::from_diffs(Vec::new()));

    let analysis = analyze_spec_diff_with_context(
        &context,
        old_outcome.import.id(),
        new_outcome.import.id(),
        &args.analyst,
        &diff,
    );

    if args.json {
        println!("{}", serde_json::to_string_pretty(&analysis)?);
    } else {
        println!("Compatibility score: {}/100", analysis.compatibility_score());
        println!("Level: {}", analysis.compatibility_level());
        println!("Migration risk: {}", analysis.migration_risk());
        println!(
            "Issues: {} breaking, {} warning, {} info",
            analysis.breaking_change_count(),
            analysis.warning_count(),
            analysis.info_count()
        );
        println!("{}", analysis.summary());
        for impact in analysis.impacts() {
            println!(
                "  {}: {} message(s), {} signal(s), risk {}, ~{}h",
                impact.affected_area,
                impact.affected_message_count,
                impact.affected_signal_count,
                impact.risk_level,
                impact.estimated_effort_hours
            );
        }
        println!("Recommendations:");
        for recommendation in analysis.recommendations() {
            println!("  - {}", recommendation);
        }
    }

    if config.fail_on_major
        && analysis.compatibility_level() == CompatibilityLevel::MajorIncompatibility
    {
        return Ok(EXIT_MAJOR_INCOMPATIBILITY);
    }
    Ok(0)
}
