pub mod csv_out;
pub mod json;
pub mod minimal;
pub mod table;

use crate::OutputFormat;
use serde_json::Value;
use trade_journal_core::schema::{CanonicalSchema, SourceFormat};

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, value: &Value) {
    match format {
        OutputFormat::Json => json::print_json(value),
        OutputFormat::Table => table::print_table(value),
        OutputFormat::Csv => csv_out::print_csv(value),
        OutputFormat::Minimal => minimal::print_minimal(value),
    }
}

/// Unwrap the computation envelope if present.
pub(crate) fn result_of(value: &Value) -> &Value {
    value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value)
}

/// Canonical (field, title) column pairs when the rows are enriched journal
/// rows; None for any other row shape.
pub(crate) fn journal_columns(rows: &[Value]) -> Option<Vec<(&'static str, &'static str)>> {
    let first = rows.first()?.as_object()?;
    let schema = CanonicalSchema::new(SourceFormat::Das).ok()?;
    let cols = schema.field_titles();
    if cols.iter().all(|(field, _)| first.contains_key(*field)) {
        Some(cols)
    } else {
        None
    }
}

pub(crate) fn scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
