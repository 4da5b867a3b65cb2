//! Parse command
//!
//! Usage: canspec parse <FILE> [--format <csv|json>] [--json]

use clap::Args;
use std::path::PathBuf;

use canspec_core::{EngineConfig, RequestContext};

use super::{import_file, report_issues, CliResult};

#[derive(Debug, Args)]
pub struct ParseArgs {
    /// Specification file to parse
    pub file: PathBuf,

    /// Input format (default: file extension)
    #[arg(short, long)]
    pub format: Option<String>,

    /// Print the import as JSON instead of a summary
    #[arg(long)]
    pub json: bool,
}

/// Execute parse command
pub fn execute(args: ParseArgs, config: &EngineConfig) -> CliResult<i32> {
    let context = RequestContext::new();
    let outcome = import_file(
        config,
        &context,
        &args.file,
        args.format.as_deref(),
        None,
        None,
    )?;
    report_issues(&args.file, &outcome);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&outcome.import)?);
        return Ok(0);
    }

    let import = &outcome.import;
    let (messages, signals) = import.counts().unwrap_or_default();
    println!(
        "✓ Parsed {} ({}): {} message(s), {} signal(s)",
        import.file().name,
        import.file().format,
        messages,
        signals
    );
    println!("  content hash: {}", import.file().content_hash);
    for message in import.messages() {
        println!(
            "  {} {} dlc={} signals={}",
            message.id,
            message.name,
            message.dlc,
            message.signal_count()
        );
    }

    Ok(0)
}
