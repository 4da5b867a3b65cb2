//! CanSpec CLI
//!
//! Command-line interface for the CAN specification engine

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use canspec_core::logging_facility::{self, Profile};

mod commands;

#[derive(Debug, Parser)]
#[command(name = "canspec")]
#[command(about = "CanSpec - CAN specification import and compatibility analysis", long_about = None)]
struct Cli {
    /// Engine configuration file (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log output format
    #[arg(long, global = true, default_value = "human", value_parser = ["human", "json"])]
    log_format: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Parse a specification file and report its contents
    Parse(commands::parse::ParseArgs),
    /// Diff two specification files
    Diff(commands::diff::DiffArgs),
    /// Score the compatibility of a new specification against an old one
    Analyze(commands::analyze::AnalyzeArgs),
}

fn main() {
    let cli = Cli::parse();

    logging_facility::init(
        Profile::from_log_format(&cli.log_format).unwrap_or(Profile::Development),
    );

    let result = commands::load_config(cli.config.as_deref()).and_then(|config| {
        match cli.command {
            Commands::Parse(args) => commands::parse::execute(args, &config),
            Commands::Diff(args) => commands::diff::execute(args, &config),
            Commands::Analyze(args) => commands::analyze::execute(args, &config),
        }
    });

    match result {
        Ok(0) => {}
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
