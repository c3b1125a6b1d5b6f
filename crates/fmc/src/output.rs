//! Output formatting: table, JSON, YAML.
//!
//! Resource states are rendered as a two-column field/value table; nested
//! collections are shown as compact JSON in the value column.

use std::io::{self, Write};

use serde::Serialize;
use tabled::{Table, Tabled, settings::Style};

use crate::cli::OutputFormat;
use crate::error::CliError;

#[derive(Tabled)]
struct FieldRow {
    #[tabled(rename = "Field")]
    field: String,
    #[tabled(rename = "Value")]
    value: String,
}

/// Render a resource state in the chosen format.
pub fn render_state<T: Serialize>(format: &OutputFormat, data: &T) -> Result<String, CliError> {
    match format {
        OutputFormat::Table => {
            let value = to_value(data)?;
            let rows: Vec<FieldRow> = match value {
                serde_json::Value::Object(map) => map
                    .into_iter()
                    .map(|(field, v)| FieldRow {
                        field,
                        value: cell(&v),
                    })
                    .collect(),
                other => vec![FieldRow {
                    field: "value".into(),
                    value: cell(&other),
                }],
            };
            Ok(render_table(&rows))
        }
        OutputFormat::Json => render_json(data, false),
        OutputFormat::JsonCompact => render_json(data, true),
        OutputFormat::Yaml => render_yaml(data),
    }
}

/// Render rows that already implement `Tabled`, or the raw data for
/// structured formats.
pub fn render_list<T, R>(format: &OutputFormat, data: &[T], to_row: impl Fn(&T) -> R) -> Result<String, CliError>
where
    T: Serialize,
    R: Tabled,
{
    match format {
        OutputFormat::Table => {
            let rows: Vec<R> = data.iter().map(to_row).collect();
            Ok(render_table(&rows))
        }
        OutputFormat::Json => render_json(data, false),
        OutputFormat::JsonCompact => render_json(data, true),
        OutputFormat::Yaml => render_yaml(data),
    }
}

/// Print the rendered output to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

// ── Format-specific renderers ────────────────────────────────────────

fn render_table<R: Tabled>(rows: &[R]) -> String {
    Table::new(rows).with(Style::rounded()).to_string()
}

fn cell(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn to_value<T: Serialize + ?Sized>(data: &T) -> Result<serde_json::Value, CliError> {
    serde_json::to_value(data).map_err(|e| CliError::Internal(format!("serialization failed: {e}")))
}

fn render_json<T: Serialize + ?Sized>(data: &T, compact: bool) -> Result<String, CliError> {
    let out = if compact {
        serde_json::to_string(data)
    } else {
        serde_json::to_string_pretty(data)
    };
    out.map_err(|e| CliError::Internal(format!("serialization failed: {e}")))
}

fn render_yaml<T: Serialize + ?Sized>(data: &T) -> Result<String, CliError> {
    serde_yaml::to_string(data).map_err(|e| CliError::Internal(format!("serialization failed: {e}")))
}
