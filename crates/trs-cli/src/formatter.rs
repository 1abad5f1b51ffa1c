//! Output formatting for engine views.
//!
//! Supports table and JSON output formats.

use anyhow::Result;
use comfy_table::{Cell, ContentArrangement, Table};
use serde_json::{json, Value as JsonValue};

use trs_common::EngineConfig;
use trs_core::{BaseResource, ChangeEvent, ChangeLogPage, TrsEngine};

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Formatted table output.
    Table,
    /// JSON output.
    Json,
}

/// Formats page counts and entry points.
pub fn format_summary(engine: &TrsEngine, format: OutputFormat) -> String {
    let trs = engine.tracked_resource_set();
    let latest_order = engine.latest_order().map(|o| o.as_u64());

    match format {
        OutputFormat::Table => {
            let mut table = new_table();
            table.set_header(vec!["Property", "Value"]);
            table.add_row(vec!["TRS".to_string(), trs.location.to_string()]);
            table.add_row(vec!["Base".to_string(), trs.base.to_string()]);
            table.add_row(vec!["Change log".to_string(), trs.change_log.to_string()]);
            table.add_row(vec![
                "Base pages".to_string(),
                engine.base_page_count().to_string(),
            ]);
            table.add_row(vec![
                "Base members".to_string(),
                engine.base().member_count().to_string(),
            ]);
            table.add_row(vec![
                "Change log pages".to_string(),
                engine.changelog_page_count().to_string(),
            ]);
            table.add_row(vec![
                "Change events".to_string(),
                engine.event_count().to_string(),
            ]);
            table.add_row(vec![
                "Latest order".to_string(),
                latest_order.map_or_else(|| "-".to_string(), |o| o.to_string()),
            ]);
            table.to_string()
        }
        OutputFormat::Json => pretty(&json!({
            "location": trs.location.as_str(),
            "base": trs.base.as_str(),
            "change_log": trs.change_log.as_str(),
            "base_page_count": engine.base_page_count(),
            "base_member_count": engine.base().member_count(),
            "changelog_page_count": engine.changelog_page_count(),
            "event_count": engine.event_count(),
            "latest_order": latest_order,
        })),
    }
}

/// Formats a base page or the base root.
pub fn format_base(resource: &BaseResource, format: OutputFormat) -> String {
    match format {
        OutputFormat::Table => {
            let mut header = new_table();
            header.set_header(vec!["Property", "Value"]);
            header.add_row(vec!["Location".to_string(), resource.location().to_string()]);
            header.add_row(vec!["Next".to_string(), resource.next().to_string()]);
            header.add_row(vec![
                "Cutoff event".to_string(),
                resource.cutoff_event().to_string(),
            ]);

            let mut members = new_table();
            members.set_header(vec!["#", "Member"]);
            for (i, member) in resource.members().enumerate() {
                members.add_row(vec![Cell::new(i + 1), Cell::new(member)]);
            }

            format!("{header}\n{members}")
        }
        OutputFormat::Json => pretty(&json!({
            "location": resource.location().as_str(),
            "next": resource.next().as_str(),
            "cutoff_event": resource.cutoff_event().as_str(),
            "root": resource.is_root(),
            "members": resource.members().map(|m| m.as_str()).collect::<Vec<_>>(),
        })),
    }
}

/// Formats a change log page.
pub fn format_changelog(page: &ChangeLogPage, format: OutputFormat) -> String {
    match format {
        OutputFormat::Table => {
            let mut header = new_table();
            header.set_header(vec!["Property", "Value"]);
            header.add_row(vec!["Page".to_string(), page.index().to_string()]);
            header.add_row(vec!["Location".to_string(), page.location().to_string()]);
            header.add_row(vec!["Previous".to_string(), page.previous().to_string()]);
            header.add_row(vec!["Closed".to_string(), page.is_closed().to_string()]);

            let mut changes = new_table();
            changes.set_header(vec!["Order", "Kind", "Resource", "Timestamp"]);
            for event in page.changes() {
                changes.add_row(vec![
                    Cell::new(event.order()),
                    Cell::new(event.kind()),
                    Cell::new(event.resource()),
                    Cell::new(event.timestamp()),
                ]);
            }

            format!("{header}\n{changes}")
        }
        OutputFormat::Json => pretty(&json!({
            "index": page.index(),
            "location": page.location().as_str(),
            "previous": page.previous().as_str(),
            "closed": page.is_closed(),
            "changes": page.changes().map(event_to_json).collect::<Vec<_>>(),
        })),
    }
}

/// Formats the answer for an empty change log.
pub fn format_empty_changelog(format: OutputFormat) -> String {
    match format {
        OutputFormat::Table => "Change log is empty".to_string(),
        OutputFormat::Json => JsonValue::Null.to_string(),
    }
}

/// Formats an engine configuration as TOML or JSON.
pub fn format_config(config: &EngineConfig, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Table => Ok(config.to_toml()?),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(config)?),
    }
}

fn event_to_json(event: &ChangeEvent) -> JsonValue {
    json!({
        "id": event.id().as_str(),
        "order": event.order().as_u64(),
        "kind": event.kind().as_str(),
        "resource": event.resource().as_str(),
        "timestamp": event.timestamp().to_string(),
    })
}

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .set_content_arrangement(ContentArrangement::Dynamic)
        .load_preset(comfy_table::presets::UTF8_FULL)
        .apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);
    table
}

fn pretty(value: &JsonValue) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "null".to_string())
}
