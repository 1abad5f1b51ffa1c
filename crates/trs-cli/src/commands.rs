//! Subcommands and the input files they are built from.
//!
//! Resource files list one URI per line. Change files list one change per
//! line as `<kind> <uri>`, where kind is `create`, `modify` or `delete`. In
//! both, blank lines and lines starting with `#` are ignored.

use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};
use clap::Subcommand;
use tracing::info;
use url::Url;

use trs_common::EngineConfig;
use trs_core::{BaseResource, ChangeKind, HistoryData, TrsEngine};

use crate::formatter::{self, OutputFormat};

/// A subcommand.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Show page counts and entry points
    Summary,
    /// Show a base page, or the base root when no index is given
    Base {
        /// 1-based page index
        index: Option<u64>,
    },
    /// Show a change log page, or the newest one when no index is given
    Changelog {
        /// 1-based page index
        index: Option<u64>,
    },
    /// Print the effective configuration
    PrintConfig,
}

/// A change read from a change file.
pub type Change = (ChangeKind, Url);

/// Reads a resource file.
pub fn read_resources(path: &Path) -> Result<Vec<Url>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read resource file {}", path.display()))?;
    parse_resources(&content).with_context(|| format!("In {}", path.display()))
}

/// Reads a change file.
pub fn read_changes(path: &Path) -> Result<Vec<Change>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read change file {}", path.display()))?;
    parse_changes(&content).with_context(|| format!("In {}", path.display()))
}

/// Parses resource file content.
pub fn parse_resources(content: &str) -> Result<Vec<Url>> {
    entries(content)
        .map(|(line, text)| {
            Url::parse(text).with_context(|| format!("line {line}: invalid URI '{text}'"))
        })
        .collect()
}

/// Parses change file content.
pub fn parse_changes(content: &str) -> Result<Vec<Change>> {
    entries(content)
        .map(|(line, text)| {
            let mut parts = text.split_whitespace();
            let (Some(kind), Some(uri), None) = (parts.next(), parts.next(), parts.next()) else {
                bail!("line {line}: expected '<kind> <uri>', got '{text}'");
            };

            let kind = kind
                .parse::<ChangeKind>()
                .map_err(|e| anyhow!("line {line}: {e}"))?;
            let uri = Url::parse(uri).with_context(|| format!("line {line}: invalid URI '{uri}'"))?;

            Ok((kind, uri))
        })
        .collect()
}

/// Yields non-blank, non-comment lines with their 1-based line numbers.
fn entries(content: &str) -> impl Iterator<Item = (usize, &str)> {
    content
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
}

/// Builds an engine and replays `changes` into its change log.
pub fn build_engine(
    config: EngineConfig,
    resources: Vec<Url>,
    changes: Vec<Change>,
) -> Result<TrsEngine> {
    let engine = TrsEngine::new(config, resources)?;

    let replayed = changes.len();
    for (kind, uri) in changes {
        engine.on_history_data(HistoryData::now(uri, kind));
    }
    info!("Replayed {} changes", replayed);

    Ok(engine)
}

/// Executes a subcommand against `engine` and returns the rendered output.
pub fn execute(engine: &TrsEngine, command: &Command, format: OutputFormat) -> Result<String> {
    match command {
        Command::Summary => Ok(formatter::format_summary(engine, format)),
        Command::Base { index: None } => {
            let root = BaseResource::Root(engine.root_base_descriptor());
            Ok(formatter::format_base(&root, format))
        }
        Command::Base { index: Some(index) } => {
            let resource = engine.get_base_resource(*index)?;
            Ok(formatter::format_base(&resource, format))
        }
        Command::Changelog { index: None } => Ok(match engine.latest_change_log() {
            Some(page) => formatter::format_changelog(&page, format),
            None => formatter::format_empty_changelog(format),
        }),
        Command::Changelog { index: Some(index) } => {
            let page = engine.get_change_log(*index)?;
            Ok(formatter::format_changelog(&page, format))
        }
        Command::PrintConfig => formatter::format_config(engine.config(), format),
    }
}
