pub mod error;
pub mod journal;
pub mod schema;
pub mod types;

pub use error::JournalError;
pub use types::*;

/// Standard result type for all trade-journal operations
pub type JournalResult<T> = Result<T, JournalError>;
