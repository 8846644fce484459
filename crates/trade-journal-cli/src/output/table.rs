use serde_json::Value;
use tabled::{builder::Builder, Table};

use super::{journal_columns, result_of, scalar};

/// Render the processed day as tables: the enriched row table if present,
/// one table per trade, then the day summary, warnings and methodology.
pub fn print_table(value: &Value) {
    let result = result_of(value);

    match result {
        Value::Object(map) => {
            if let Some(Value::Array(rows)) = map.get("rows") {
                print_row_table(rows);
            }
            if let Some(Value::Array(trades)) = map.get("trades") {
                for trade in trades {
                    print_trade(trade);
                }
            }
            if let Some(summary) = map.get("summary") {
                println!("\nDay summary:");
                print_flat_object(summary);
            }
            if map.get("rows").is_none() && map.get("summary").is_none() {
                // plain object (e.g. the summary subcommand)
                print_flat_object(result);
            }
        }
        Value::Array(arr) => print_row_table(arr),
        _ => println!("{}", result),
    }

    if let Some(envelope) = value.as_object() {
        if let Some(Value::Array(warnings)) = envelope.get("warnings") {
            if !warnings.is_empty() {
                println!("\nWarnings:");
                for w in warnings {
                    if let Value::String(s) = w {
                        println!("  - {}", s);
                    }
                }
            }
        }
        if let Some(Value::String(meth)) = envelope.get("methodology") {
            println!("\nMethodology: {}", meth);
        }
    }
}

fn print_trade(trade: &Value) {
    let Some(map) = trade.as_object() else { return };
    if let Some(Value::String(label)) = map.get("label") {
        println!("\n{label}:");
    }
    if let Some(Value::Array(rows)) = map.get("rows") {
        print_row_table(rows);
    }
}

fn print_row_table(rows: &[Value]) {
    if rows.is_empty() {
        println!("(empty)");
        return;
    }

    // Enriched journal rows get the canonical column order and titles
    if let Some(cols) = journal_columns(rows) {
        let mut builder = Builder::default();
        builder.push_record(cols.iter().map(|(_, title)| *title));
        for row in rows {
            if let Value::Object(map) = row {
                let record: Vec<String> = cols
                    .iter()
                    .map(|(field, _)| map.get(*field).map(scalar).unwrap_or_default())
                    .collect();
                builder.push_record(record);
            }
        }
        println!("{}", Table::from(builder));
        return;
    }

    let Some(Value::Object(first)) = rows.first() else {
        for row in rows {
            println!("{}", scalar(row));
        }
        return;
    };

    let headers: Vec<String> = first.keys().cloned().collect();
    let mut builder = Builder::default();
    builder.push_record(&headers);
    for row in rows {
        if let Value::Object(map) = row {
            let record: Vec<String> = headers
                .iter()
                .map(|h| map.get(h.as_str()).map(scalar).unwrap_or_default())
                .collect();
            builder.push_record(record);
        }
    }
    println!("{}", Table::from(builder));
}

fn print_flat_object(value: &Value) {
    if let Value::Object(map) = value {
        let mut builder = Builder::default();
        builder.push_record(["Field", "Value"]);
        for (key, val) in map {
            builder.push_record([key.as_str(), &scalar(val)]);
        }
        println!("{}", Table::from(builder));
    }
}
