use serde_json::Value;
use std::io;

use super::{journal_columns, result_of, scalar};

/// Write output as CSV to stdout. For a processed day this emits the
/// enriched flat table (including trailer rows); for anything else, a
/// two-column field/value listing.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());
    let result = result_of(value);

    match result {
        Value::Object(map) => {
            if let Some(Value::Array(rows)) = map.get("rows") {
                write_rows(&mut wtr, rows);
            } else {
                let _ = wtr.write_record(["field", "value"]);
                for (key, val) in map {
                    let _ = wtr.write_record([key.as_str(), &scalar(val)]);
                }
            }
        }
        Value::Array(arr) => write_rows(&mut wtr, arr),
        _ => {
            let _ = wtr.write_record([&scalar(result)]);
        }
    }

    let _ = wtr.flush();
}

fn write_rows(wtr: &mut csv::Writer<io::StdoutLock<'_>>, rows: &[Value]) {
    if rows.is_empty() {
        return;
    }

    // Enriched journal rows get the canonical column order and titles
    if let Some(cols) = journal_columns(rows) {
        let _ = wtr.write_record(cols.iter().map(|(_, title)| *title));
        for row in rows {
            if let Value::Object(map) = row {
                let record: Vec<String> = cols
                    .iter()
                    .map(|(field, _)| map.get(*field).map(scalar).unwrap_or_default())
                    .collect();
                let _ = wtr.write_record(&record);
            }
        }
        return;
    }

    if let Some(Value::Object(first)) = rows.first() {
        let headers: Vec<&str> = first.keys().map(|k| k.as_str()).collect();
        let _ = wtr.write_record(&headers);

        for row in rows {
            if let Value::Object(map) = row {
                let record: Vec<String> = headers
                    .iter()
                    .map(|h| map.get(*h).map(scalar).unwrap_or_default())
                    .collect();
                let _ = wtr.write_record(&record);
            }
        }
    } else {
        for row in rows {
            let _ = wtr.write_record([&scalar(row)]);
        }
    }
}
