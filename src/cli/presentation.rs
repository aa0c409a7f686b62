//! CLI presentation: text and json formatters per command.

use crate::error::ApiError;
use crate::generation::GenerationState;
use crate::session::SessionSnapshot;
use crate::wrap::WRAP_CATALOG;
use comfy_table::presets::UTF8_FULL;
use comfy_table::Table;
use serde_json::json;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn parse(value: &str) -> Result<Self, ApiError> {
        match value {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            other => Err(ApiError::InvalidArgument(format!(
                "Invalid format: {} (must be 'text' or 'json')",
                other
            ))),
        }
    }
}

pub fn format_wraps(format: OutputFormat) -> Result<String, ApiError> {
    if format == OutputFormat::Json {
        return Ok(serde_json::to_string_pretty(&WRAP_CATALOG[..])?);
    }
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Wrap", "Finish", "Colour"]);
    for wrap in WRAP_CATALOG.iter() {
        table.add_row(vec![wrap.name, wrap.finish.as_str(), wrap.hex]);
    }
    Ok(table.to_string())
}

/// Plain list of names (makes or models)
pub fn format_list(title: &str, items: &[String], format: OutputFormat) -> Result<String, ApiError> {
    if format == OutputFormat::Json {
        let mut body = serde_json::Map::new();
        body.insert(title.to_string(), json!(items));
        return Ok(serde_json::to_string_pretty(&body)?);
    }
    if items.is_empty() {
        return Ok(format!("No {} available.", title));
    }
    let mut lines = vec![format!("{} ({}):", capitalize(title), items.len())];
    lines.extend(items.iter().map(|item| format!("  {}", item)));
    Ok(lines.join("\n"))
}

pub fn format_lookup(snapshot: &SessionSnapshot) -> String {
    let mut lines = vec![format!("Lookup: {}", snapshot.lookup.status.as_str())];
    if let Some(message) = &snapshot.lookup.message {
        lines.push(format!("  {}", message));
    }
    let selection = &snapshot.selection;
    if !selection.make().is_empty() {
        lines.push(format!("  Make:  {}", selection.make()));
    }
    if !selection.model().is_empty() {
        lines.push(format!("  Model: {}", selection.model()));
    }
    lines.join("\n")
}

pub fn format_preview(snapshot: &SessionSnapshot, format: OutputFormat) -> Result<String, ApiError> {
    if format == OutputFormat::Json {
        return Ok(serde_json::to_string_pretty(snapshot)?);
    }

    let mut lines = vec![snapshot.generation.headline().to_string()];
    match &snapshot.generation {
        GenerationState::Done { summary } => {
            lines.push(format!("  Vehicle: {}", summary.vehicle_label));
            lines.push(format!("  Wrap:    {}", summary.wrap_label));
            lines.push(format!("  Swatch:  {}", summary.swatch.to_hex()));
            if let Some(render) = &summary.render {
                lines.push(format!("  Render:  {}", render));
            }
        }
        GenerationState::Failed { message } => lines.push(format!("  {}", message)),
        GenerationState::Idle | GenerationState::Pending => {
            lines.push(format!("  {}", snapshot.readiness_hint));
        }
    }
    if let Some(message) = &snapshot.lookup.message {
        lines.push(format!("  Lookup: {}", message));
    }
    Ok(lines.join("\n"))
}

fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
