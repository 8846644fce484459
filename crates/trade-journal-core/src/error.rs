use thiserror::Error;

#[derive(Debug, Error)]
pub enum JournalError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Unsupported source format '{format}' for the {mapping} column mapping")]
    UnsupportedSource { format: String, mapping: String },

    #[error("Missing trade index: {0}")]
    MissingTradeIndex(String),

    #[error("Open trade at end of day: {trade} closed with balance {balance}, expected 0")]
    OpenTrade { trade: String, balance: i64 },

    #[error("Unknown account '{account}': expected a 'U' (live) or 'TR' (simulated) prefix")]
    UnknownAccount { account: String },

    #[error("Cross-midnight trade: {trade} starts on {start_date} and ends on {end_date}")]
    CrossMidnight {
        trade: String,
        start_date: chrono::NaiveDate,
        end_date: chrono::NaiveDate,
    },

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for JournalError {
    fn from(e: serde_json::Error) -> Self {
        JournalError::SerializationError(e.to_string())
    }
}
