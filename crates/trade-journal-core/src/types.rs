use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::JournalError;

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Signed share counts. Positive = bought, negative = sold.
pub type Shares = i64;

/// Transaction side as it appears in broker statements.
///
/// Hold sides are non-transactional placeholders for positions carried
/// across the day boundary: `HOLD+` marks shares carried in from a previous
/// day (the row's share count is the carried position), `HOLD-` marks shares
/// carried out overnight (the row has zero share effect; the carried amount
/// is the previous row's balance).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    #[serde(rename = "B")]
    Buy,
    #[serde(rename = "S", alias = "SS")]
    Sell,
    #[serde(rename = "HOLD+")]
    HoldOpen,
    #[serde(rename = "HOLD-")]
    HoldClose,
}

impl Side {
    pub fn is_hold(&self) -> bool {
        matches!(self, Side::HoldOpen | Side::HoldClose)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Buy => "B",
            Side::Sell => "S",
            Side::HoldOpen => "HOLD+",
            Side::HoldClose => "HOLD-",
        }
    }
}

impl FromStr for Side {
    type Err = JournalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "B" => Ok(Side::Buy),
            "S" | "SS" => Ok(Side::Sell),
            "HOLD+" => Ok(Side::HoldOpen),
            "HOLD-" => Ok(Side::HoldClose),
            other => Err(JournalError::InvalidInput {
                field: "side".into(),
                reason: format!("Unrecognized side '{other}'"),
            }),
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Direction of a trade, derived from its closing transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Long,
    Short,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Long => f.write_str("Long"),
            Direction::Short => f.write_str("Short"),
        }
    }
}

/// Account classification by identifier prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccountKind {
    Live,
    Simulated,
}

impl AccountKind {
    /// Classify an account identifier: "TR…" is simulated, "U…" is live.
    /// Anything else indicates bad input or a segmentation bug upstream.
    pub fn classify(account: &str) -> Result<AccountKind, JournalError> {
        if account.starts_with("TR") {
            Ok(AccountKind::Simulated)
        } else if account.starts_with('U') {
            Ok(AccountKind::Live)
        } else {
            Err(JournalError::UnknownAccount {
                account: account.to_string(),
            })
        }
    }
}

/// Open/close marker carried by some statement formats. Not used by the
/// segmentation algorithm itself, but preserved through to the output table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OpenClose {
    #[serde(rename = "O")]
    Open,
    #[serde(rename = "C")]
    Close,
}

/// One immutable brokerage transaction record for a single trading day.
///
/// Everything the engine derives (trade index, start time, running balance,
/// summary P/L, duration, name) lives in a separate per-row arena; see
/// `journal::table::Derived`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub ticker: String,
    pub side: Side,
    pub price: Money,
    /// Signed quantity; the sign encodes buy/sell. Zero on HOLD- rows.
    pub shares: Shares,
    pub account: String,
    /// Realized P/L; zero except on closing transactions.
    #[serde(default)]
    pub pl: Money,
    pub date: NaiveDate,
    pub time: NaiveTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub open_close: Option<OpenClose>,
}

impl Transaction {
    /// Rows belong to the same scan group when ticker and account match.
    pub fn same_group(&self, other: &Transaction) -> bool {
        self.ticker == other.ticker && self.account == other.account
    }
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn side_round_trips_wire_codes() {
        for (code, side) in [
            ("B", Side::Buy),
            ("S", Side::Sell),
            ("HOLD+", Side::HoldOpen),
            ("HOLD-", Side::HoldClose),
        ] {
            assert_eq!(code.parse::<Side>().unwrap(), side);
            assert_eq!(side.as_str(), code);
        }
        // DAS writes short sales as SS
        assert_eq!("SS".parse::<Side>().unwrap(), Side::Sell);
    }

    #[test]
    fn side_rejects_unknown_code() {
        assert!("X".parse::<Side>().is_err());
    }

    #[test]
    fn account_classification() {
        assert_eq!(AccountKind::classify("U12345").unwrap(), AccountKind::Live);
        assert_eq!(
            AccountKind::classify("TR9999").unwrap(),
            AccountKind::Simulated
        );
        match AccountKind::classify("X777").unwrap_err() {
            JournalError::UnknownAccount { account } => assert_eq!(account, "X777"),
            other => panic!("Expected UnknownAccount, got {other:?}"),
        }
    }
}
