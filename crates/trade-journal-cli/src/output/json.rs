use serde_json::Value;

/// Pretty-print the enveloped day result (or summary object) to stdout.
/// The default output format; pipe-friendly for jq and downstream tooling.
pub fn print_json(value: &Value) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => println!("{}", s),
        Err(e) => eprintln!("Failed to serialize output: {}", e),
    }
}
