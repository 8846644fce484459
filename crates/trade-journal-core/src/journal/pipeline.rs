//! The fixed processing pipeline for one trading day: each stage is a full
//! pass over the table, in a set order, single-threaded. Either the whole
//! day processes or the run errors; there is no partial success.

use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::debug;

use crate::error::JournalError;
use crate::journal::table::{trade_label, DaySummary, DayTable, JournalRow, TradeTable};
use crate::journal::{aggregate, balance, post_process, segment, summary};
use crate::types::{with_metadata, ComputationOutput, Transaction};
use crate::JournalResult;

/// Everything the rendering layer needs for one processed day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessedDay {
    /// Row count prior to trailer-row padding.
    pub transaction_count: usize,
    /// The enriched flat table, including the two trailer rows.
    pub rows: Vec<JournalRow>,
    /// Ordered per-trade sub-tables.
    pub trades: Vec<TradeTable>,
    pub summary: DaySummary,
    /// Data-quality findings (flips, approximate hold-in reconstructions).
    pub warnings: Vec<String>,
}

/// Run the full segmentation pipeline over one day's transactions.
pub fn process_day(transactions: Vec<Transaction>) -> JournalResult<ProcessedDay> {
    if transactions.is_empty() {
        return Err(JournalError::InvalidInput {
            field: "transactions".into(),
            reason: "At least one transaction is required.".into(),
        });
    }

    let mut table = DayTable::from_transactions(transactions);

    table.sort_for_balance();
    balance::write_share_balance(&mut table);
    balance::assign_start_times(&mut table);
    debug!(rows = table.len(), "balances and start times assigned");

    table.sort_for_segmentation();
    segment::assign_trade_indices(&mut table);
    aggregate::write_trade_pl(&mut table);
    aggregate::write_trade_durations(&mut table)?;
    aggregate::write_trade_names(&mut table);

    let trades = segment::build_trade_list(&table)?;
    debug!(trades = trades.len(), "trades segmented");

    let warnings = post_process::post_process(&mut table, &trades)?;
    let summary = summary::summarize_day(&table)?;

    let transaction_count = table.len();
    let rows = summary::render_with_trailer(&table, &summary);
    let trade_tables: Vec<TradeTable> = trades
        .iter()
        .map(|t| TradeTable {
            number: t.number,
            label: trade_label(t.number),
            rows: t.rows.iter().map(|&i| table.render_row(i)).collect(),
        })
        .collect();

    Ok(ProcessedDay {
        transaction_count,
        rows,
        trades: trade_tables,
        summary,
        warnings,
    })
}

/// [`process_day`] wrapped in the standard computation envelope.
pub fn analyze_day(
    transactions: Vec<Transaction>,
) -> JournalResult<ComputationOutput<ProcessedDay>> {
    let start = Instant::now();
    let output = process_day(transactions)?;
    let warnings = output.warnings.clone();

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "methodology": "Balance-zero-crossing trade segmentation",
        "trade_boundary": "running share balance returns to zero",
        "hold_rows": "HOLD+ carries shares in, HOLD- carries shares out",
        "accounts": "prefix U = live, prefix TR = simulated",
        "open_trades": "fail-fast: a trade must end flat",
    });

    Ok(with_metadata(
        "Daily Trade Segmentation",
        &assumptions,
        warnings,
        elapsed,
        output,
    ))
}
