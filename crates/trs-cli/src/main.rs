//! TRS Command-Line Interface
//!
//! Builds an in-memory Tracked Resource Set from a resource list, replays a
//! change file into it and prints the resulting pages.
//!
//! # Usage
//!
//! ```bash
//! # Summarize a TRS seeded from a resource list
//! trs --resources resources.txt summary
//!
//! # Show base page 2 with a page size of 10
//! trs --resources resources.txt --base-page-size 10 base 2
//!
//! # Replay changes and print the newest change log page as JSON
//! trs --changes changes.txt -o json changelog
//!
//! # Print the effective configuration
//! trs --config trs.toml print-config
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;
use url::Url;

mod commands;
mod config;
mod formatter;

use commands::Command;
use config::ConfigOverrides;
use formatter::OutputFormat;

/// TRS command-line interface
#[derive(Parser, Debug)]
#[command(
    name = "trs",
    author = "TRS Engine Team",
    version,
    about = "Inspect an in-memory Tracked Resource Set",
    long_about = "Builds a Tracked Resource Set from a list of resource URIs, replays\n\
                  a file of change events into its change log and prints base pages,\n\
                  change log pages or a summary."
)]
struct Args {
    /// Configuration file path
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// URI of the tracked resource set
    #[arg(long, env = "TRS_URI")]
    trs_uri: Option<Url>,

    /// Maximum number of members per base page
    #[arg(long, env = "TRS_BASE_PAGE_SIZE")]
    base_page_size: Option<usize>,

    /// Maximum number of events per change log page
    #[arg(long, env = "TRS_CHANGELOG_PAGE_SIZE")]
    changelog_page_size: Option<usize>,

    /// File listing the initial resources, one URI per line
    #[arg(short = 'r', long, value_name = "FILE")]
    resources: Option<PathBuf>,

    /// File of changes to replay, one `create|modify|delete <uri>` per line
    #[arg(short = 'c', long, value_name = "FILE")]
    changes: Option<PathBuf>,

    /// Output format
    #[arg(short = 'o', long, value_enum, default_value = "table")]
    output: OutputFormatArg,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn", env = "TRS_LOG_LEVEL")]
    log_level: String,

    /// Enable verbose output
    #[arg(short = 'v', long)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

/// Output format argument
#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormatArg {
    /// Display results in a formatted table
    Table,
    /// Display results as JSON
    Json,
}

impl From<OutputFormatArg> for OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Table => OutputFormat::Table,
            OutputFormatArg::Json => OutputFormat::Json,
        }
    }
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    let args = Args::parse();

    init_logging(&args);

    let overrides = ConfigOverrides {
        trs_uri: args.trs_uri.clone(),
        base_page_size: args.base_page_size,
        changelog_page_size: args.changelog_page_size,
    };
    let config = config::load(args.config.as_deref(), overrides)?;

    let command = args.command.unwrap_or(Command::Summary);
    if let Command::PrintConfig = command {
        println!("{}", formatter::format_config(&config, args.output.into())?);
        return Ok(());
    }

    let resources = match &args.resources {
        Some(path) => commands::read_resources(path)?,
        None => Vec::new(),
    };
    let changes = match &args.changes {
        Some(path) => commands::read_changes(path)?,
        None => Vec::new(),
    };

    let engine = commands::build_engine(config, resources, changes)
        .context("Failed to build tracked resource set")?;

    let output = commands::execute(&engine, &command, args.output.into())?;
    println!("{output}");

    Ok(())
}

fn init_logging(args: &Args) {
    let level = if args.verbose {
        "debug"
    } else {
        &args.log_level
    };

    let filter = EnvFilter::try_new(format!("trs={level},trs_core={level}"))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_defaults() {
        let args = Args::parse_from(["trs"]);
        assert!(args.command.is_none());
        assert!(args.trs_uri.is_none());
        assert_eq!(args.log_level, "warn");
        assert!(matches!(args.output, OutputFormatArg::Table));
    }

    #[test]
    fn test_parse_subcommands() {
        let args = Args::parse_from(["trs", "-o", "json", "base", "2"]);
        assert!(matches!(args.command, Some(Command::Base { index: Some(2) })));
        assert!(matches!(args.output, OutputFormatArg::Json));

        let args = Args::parse_from(["trs", "changelog"]);
        assert!(matches!(args.command, Some(Command::Changelog { index: None })));

        let args = Args::parse_from(["trs", "--trs-uri", "http://host/trs/", "print-config"]);
        assert!(matches!(args.command, Some(Command::PrintConfig)));
        assert_eq!(args.trs_uri.unwrap().as_str(), "http://host/trs/");
    }

    #[test]
    fn test_rejects_invalid_uri() {
        assert!(Args::try_parse_from(["trs", "--trs-uri", "not a uri"]).is_err());
    }
}
