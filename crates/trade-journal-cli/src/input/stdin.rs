use serde_json::Value;
use std::io::{self, Read};

/// Read piped transaction JSON from stdin, for use as
/// `cat transactions.json | tjour process`.
/// Returns None when stdin is an interactive TTY or the pipe is empty.
pub fn read_stdin() -> Result<Option<Value>, Box<dyn std::error::Error>> {
    if atty::is(atty::Stream::Stdin) {
        return Ok(None);
    }

    let mut raw = String::new();
    io::stdin().read_to_string(&mut raw)?;

    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let value: Value = serde_json::from_str(trimmed)
        .map_err(|e| format!("Piped input is not valid transaction JSON: {e}"))?;
    Ok(Some(value))
}
