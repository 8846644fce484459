//! Column-name adapter between broker statement exports and the canonical
//! field set the engine works in.
//!
//! Each supported source format gets one concrete mapping, resolved once when
//! the schema is constructed. Field access after that point is a plain struct
//! field read, never a string lookup.

use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::JournalError;
use crate::types::{OpenClose, Side, Transaction};
use crate::JournalResult;

/// Statement source formats the adapter understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Das,
    IbHtml,
}

impl SourceFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceFormat::Das => "DAS",
            SourceFormat::IbHtml => "IB_HTML",
        }
    }
}

impl fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SourceFormat {
    type Err = JournalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "DAS" => Ok(SourceFormat::Das),
            "IB_HTML" | "IB" => Ok(SourceFormat::IbHtml),
            other => Err(JournalError::UnsupportedSource {
                format: other.to_string(),
                mapping: "canonical".into(),
            }),
        }
    }
}

/// Column titles for the canonical (output) field set: the raw input columns
/// plus the derived columns the engine fills in (tix, start, balance, sum,
/// duration, name).
#[derive(Debug, Clone)]
pub struct CanonicalSchema {
    pub format: SourceFormat,
    pub tix: &'static str,
    pub start: &'static str,
    pub time: &'static str,
    pub ticker: &'static str,
    pub side: &'static str,
    pub price: &'static str,
    pub shares: &'static str,
    pub balance: &'static str,
    pub account: &'static str,
    pub pl: &'static str,
    pub sum: &'static str,
    pub duration: &'static str,
    pub name: &'static str,
    pub date: &'static str,
    pub open_close: &'static str,
}

impl CanonicalSchema {
    /// Build the canonical mapping for a source format. DAS and IB_HTML are
    /// supported; both currently share one set of output titles.
    pub fn new(format: SourceFormat) -> JournalResult<Self> {
        match format {
            SourceFormat::Das | SourceFormat::IbHtml => Ok(CanonicalSchema {
                format,
                tix: "Tindex",
                start: "Start",
                time: "Time",
                ticker: "Symb",
                side: "Side",
                price: "Price",
                shares: "Qty",
                balance: "Balance",
                account: "Account",
                pl: "P / L",
                sum: "Sum",
                duration: "Duration",
                name: "Name",
                date: "Date",
                open_close: "O/C",
            }),
        }
    }

    /// All canonical column titles in output order.
    pub fn columns(&self) -> Vec<&'static str> {
        self.field_titles().into_iter().map(|(_, t)| t).collect()
    }

    /// Output-row field names paired with their display titles, in canonical
    /// column order. Renderers use this to title and order enriched rows.
    pub fn field_titles(&self) -> Vec<(&'static str, &'static str)> {
        vec![
            ("tix", self.tix),
            ("start", self.start),
            ("time", self.time),
            ("ticker", self.ticker),
            ("side", self.side),
            ("price", self.price),
            ("shares", self.shares),
            ("balance", self.balance),
            ("account", self.account),
            ("pl", self.pl),
            ("sum", self.sum),
            ("duration", self.duration),
            ("name", self.name),
            ("date", self.date),
            ("open_close", self.open_close),
        ]
    }
}

/// Column titles for the minimal required raw input set. Only DAS exports
/// carry these today; IB_HTML statements arrive pre-adapted upstream.
#[derive(Debug, Clone)]
pub struct RawSchema {
    pub format: SourceFormat,
    pub time: &'static str,
    pub ticker: &'static str,
    pub side: &'static str,
    pub price: &'static str,
    pub shares: &'static str,
    pub account: &'static str,
    pub pl: &'static str,
    pub date: &'static str,
}

impl RawSchema {
    pub fn new(format: SourceFormat) -> JournalResult<Self> {
        match format {
            SourceFormat::Das => Ok(RawSchema {
                format,
                time: "Time",
                ticker: "Symb",
                side: "Side",
                price: "Price",
                shares: "Qty",
                account: "Account",
                pl: "P / L",
                date: "Date",
            }),
            SourceFormat::IbHtml => Err(JournalError::UnsupportedSource {
                format: format.to_string(),
                mapping: "raw".into(),
            }),
        }
    }

    pub fn columns(&self) -> Vec<&'static str> {
        vec![
            self.time,
            self.ticker,
            self.side,
            self.price,
            self.shares,
            self.account,
            self.pl,
            self.date,
        ]
    }
}

/// Convert string-keyed statement records into typed transactions using a raw
/// schema's column mapping.
pub fn adapt_rows(
    schema: &RawSchema,
    rows: &[BTreeMap<String, String>],
) -> JournalResult<Vec<Transaction>> {
    rows.iter().map(|row| adapt_row(schema, row)).collect()
}

fn adapt_row(schema: &RawSchema, row: &BTreeMap<String, String>) -> JournalResult<Transaction> {
    let ticker = required(row, schema.ticker)?.to_string();
    let side: Side = required(row, schema.side)?.parse()?;
    let price = parse_decimal(row, schema.price)?;
    let shares = parse_shares(row, schema.shares)?;
    let account = required(row, schema.account)?.to_string();
    let pl = parse_decimal(row, schema.pl)?;
    let date = parse_date(required(row, schema.date)?, schema.date)?;
    let time = parse_time(required(row, schema.time)?, schema.time)?;
    // O/C is canonical-only; carry it through when the export happens to have it
    let open_close = match row.get("O/C").map(|s| s.trim()) {
        Some("O") => Some(OpenClose::Open),
        Some("C") => Some(OpenClose::Close),
        _ => None,
    };

    Ok(Transaction {
        ticker,
        side,
        price,
        shares,
        account,
        pl,
        date,
        time,
        open_close,
    })
}

fn required<'a>(row: &'a BTreeMap<String, String>, column: &str) -> JournalResult<&'a str> {
    row.get(column)
        .map(|s| s.trim())
        .ok_or_else(|| JournalError::InvalidInput {
            field: column.to_string(),
            reason: "Required column is missing".into(),
        })
}

fn parse_decimal(row: &BTreeMap<String, String>, column: &str) -> JournalResult<Decimal> {
    let raw = required(row, column)?;
    if raw.is_empty() {
        return Ok(Decimal::ZERO);
    }
    Decimal::from_str(raw).map_err(|e| JournalError::InvalidInput {
        field: column.to_string(),
        reason: format!("'{raw}' is not a decimal: {e}"),
    })
}

fn parse_shares(row: &BTreeMap<String, String>, column: &str) -> JournalResult<i64> {
    let raw = required(row, column)?;
    if raw.is_empty() {
        return Ok(0);
    }
    raw.parse::<i64>().map_err(|e| JournalError::InvalidInput {
        field: column.to_string(),
        reason: format!("'{raw}' is not a signed share count: {e}"),
    })
}

fn parse_date(raw: &str, column: &str) -> JournalResult<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(raw, "%m/%d/%Y"))
        .map_err(|e| JournalError::InvalidInput {
            field: column.to_string(),
            reason: format!("'{raw}' is not a date: {e}"),
        })
}

fn parse_time(raw: &str, column: &str) -> JournalResult<NaiveTime> {
    NaiveTime::parse_from_str(raw, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M"))
        .map_err(|e| JournalError::InvalidInput {
            field: column.to_string(),
            reason: format!("'{raw}' is not a time: {e}"),
        })
}
