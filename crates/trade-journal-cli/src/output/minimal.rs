use serde_json::Value;

use super::{result_of, scalar};

/// Print just the key answer: the day's total P/L when available.
pub fn print_minimal(value: &Value) {
    let result = result_of(value);

    if let Value::Object(map) = result {
        // Processed day: the summary block carries the headline number
        let summary = map.get("summary").and_then(|s| s.as_object());
        let fields = summary.unwrap_or(map);

        for key in ["total_pl", "live", "simulated"] {
            if let Some(val) = fields.get(key) {
                if !val.is_null() {
                    println!("{}", scalar(val));
                    return;
                }
            }
        }

        if let Some((key, val)) = fields.iter().next() {
            println!("{}: {}", key, scalar(val));
            return;
        }
    }

    println!("{}", scalar(result));
}
