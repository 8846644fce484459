//! The day table: an ordered sequence of immutable transaction records plus
//! a parallel arena of engine-derived fields keyed by row index. Stages
//! mutate the arena, never the transactions; the one exception (the
//! reconstructed entry price for carried-in holds) is modeled as an override.

use chrono::{Duration, NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{Money, OpenClose, Shares, Side, Transaction};

/// Render the canonical trade index label, e.g. "Trade 3".
pub fn trade_label(number: u32) -> String {
    format!("Trade {number}")
}

/// Engine-derived fields for one row. Everything starts empty; the pipeline
/// stages fill these in over successive passes.
#[derive(Debug, Clone, Default)]
pub struct Derived {
    /// 1-based trade number, dense within the day.
    pub trade_index: Option<u32>,
    /// Start time shared by every row of the trade.
    pub start: Option<NaiveTime>,
    /// Running signed share balance after this transaction.
    pub balance: Shares,
    /// Total realized P/L of the trade, written only on its last row.
    pub summary_pl: Option<Money>,
    /// Elapsed time from trade start, written only on its last row.
    pub duration: Option<Duration>,
    /// "{ticker} {direction}" plus any OVERNIGHT/FLIPPED annotation,
    /// written only on the last row.
    pub name: Option<String>,
    /// Synthetic average entry price reconstructed for carried-in holds.
    pub price_override: Option<Money>,
}

/// One day's transactions with their derived-field arena.
#[derive(Debug, Clone, Default)]
pub struct DayTable {
    txns: Vec<Transaction>,
    derived: Vec<Derived>,
}

impl DayTable {
    pub fn from_transactions(txns: Vec<Transaction>) -> Self {
        let derived = vec![Derived::default(); txns.len()];
        DayTable { txns, derived }
    }

    pub fn len(&self) -> usize {
        self.txns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.txns.is_empty()
    }

    pub fn txn(&self, i: usize) -> &Transaction {
        &self.txns[i]
    }

    pub fn txns(&self) -> &[Transaction] {
        &self.txns
    }

    pub fn derived(&self, i: usize) -> &Derived {
        &self.derived[i]
    }

    pub fn derived_mut(&mut self, i: usize) -> &mut Derived {
        &mut self.derived[i]
    }

    /// Ascending (ticker, account, time): the order the balance tracker and
    /// start-time propagator expect.
    pub fn sort_for_balance(&mut self) {
        self.sort_paired(|a, b| {
            a.0.ticker
                .cmp(&b.0.ticker)
                .then_with(|| a.0.account.cmp(&b.0.account))
                .then_with(|| a.0.time.cmp(&b.0.time))
        });
    }

    /// Ascending (ticker, account, start, date, time): groups each trade's
    /// rows contiguously before segmentation.
    pub fn sort_for_segmentation(&mut self) {
        self.sort_paired(|a, b| {
            a.0.ticker
                .cmp(&b.0.ticker)
                .then_with(|| a.0.account.cmp(&b.0.account))
                .then_with(|| a.1.start.cmp(&b.1.start))
                .then_with(|| a.0.date.cmp(&b.0.date))
                .then_with(|| a.0.time.cmp(&b.0.time))
        });
    }

    fn sort_paired<F>(&mut self, cmp: F)
    where
        F: Fn(&(Transaction, Derived), &(Transaction, Derived)) -> std::cmp::Ordering,
    {
        let mut paired: Vec<(Transaction, Derived)> = self
            .txns
            .drain(..)
            .zip(self.derived.drain(..))
            .collect();
        paired.sort_by(cmp);
        let (txns, derived): (Vec<_>, Vec<_>) = paired.into_iter().unzip();
        self.txns = txns;
        self.derived = derived;
    }

    /// The effective price for a row: the reconstructed entry price if the
    /// post-processor wrote one, else the transaction's own price.
    pub fn effective_price(&self, i: usize) -> Money {
        self.derived[i].price_override.unwrap_or(self.txns[i].price)
    }

    /// Flatten one row into its output form.
    pub fn render_row(&self, i: usize) -> JournalRow {
        let t = &self.txns[i];
        let d = &self.derived[i];
        JournalRow {
            tix: d.trade_index.map(trade_label).unwrap_or_default(),
            start: d.start,
            time: Some(t.time),
            ticker: t.ticker.clone(),
            side: Some(t.side),
            price: Some(self.effective_price(i)),
            shares: Some(t.shares),
            balance: Some(d.balance),
            account: t.account.clone(),
            pl: Some(t.pl),
            sum: d.summary_pl,
            duration: d.duration.map(format_duration),
            name: d.name.clone().unwrap_or_default(),
            date: Some(t.date),
            open_close: t.open_close,
        }
    }
}

/// Format an intraday elapsed time as H:MM:SS.
pub fn format_duration(d: Duration) -> String {
    let total = d.num_seconds();
    let (sign, total) = if total < 0 { ("-", -total) } else { ("", total) };
    let h = total / 3600;
    let m = (total % 3600) / 60;
    let s = total % 60;
    format!("{sign}{h}:{m:02}:{s:02}")
}

/// A trade as row indices into the day table. Rows are contiguous and in
/// table order; the last row's balance is zero once segmentation is correct.
#[derive(Debug, Clone)]
pub struct Trade {
    pub number: u32,
    pub rows: Vec<usize>,
}

/// One flattened output row of the final table. Trailer rows leave most
/// fields blank.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JournalRow {
    pub tix: String,
    pub start: Option<NaiveTime>,
    pub time: Option<NaiveTime>,
    pub ticker: String,
    pub side: Option<Side>,
    pub price: Option<Money>,
    pub shares: Option<Shares>,
    pub balance: Option<Shares>,
    pub account: String,
    pub pl: Option<Money>,
    pub sum: Option<Money>,
    pub duration: Option<String>,
    pub name: String,
    pub date: Option<NaiveDate>,
    pub open_close: Option<OpenClose>,
}

impl JournalRow {
    /// A synthetic trailer row carrying day-summary values only.
    pub fn trailer(pl: Option<Money>, sum: Money) -> Self {
        JournalRow {
            pl,
            sum: Some(sum),
            ..JournalRow::default()
        }
    }
}

/// One trade materialized as a sub-table of output rows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeTable {
    pub number: u32,
    pub label: String,
    pub rows: Vec<JournalRow>,
}

/// Day-level realized P/L totals, split by account classification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DaySummary {
    pub total_pl: Money,
    pub simulated: Money,
    pub live: Money,
}

impl DaySummary {
    pub fn zero() -> Self {
        DaySummary {
            total_pl: Decimal::ZERO,
            simulated: Decimal::ZERO,
            live: Decimal::ZERO,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trade_labels_are_one_based() {
        assert_eq!(trade_label(1), "Trade 1");
        assert_eq!(trade_label(12), "Trade 12");
    }

    #[test]
    fn duration_formatting() {
        assert_eq!(format_duration(Duration::seconds(0)), "0:00:00");
        assert_eq!(format_duration(Duration::seconds(75)), "0:01:15");
        assert_eq!(format_duration(Duration::seconds(3600 + 62)), "1:01:02");
        assert_eq!(format_duration(Duration::seconds(-90)), "-0:01:30");
    }

    #[test]
    fn trailer_rows_are_blank_except_totals() {
        let row = JournalRow::trailer(None, Decimal::from(40));
        assert!(row.ticker.is_empty());
        assert!(row.pl.is_none());
        assert_eq!(row.sum, Some(Decimal::from(40)));
    }
}
