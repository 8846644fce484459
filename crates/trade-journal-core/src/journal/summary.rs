//! Day-level realized P/L totals, split into live and simulated buckets by
//! account prefix, rendered as two synthetic trailer rows after the data.

use rust_decimal::Decimal;

use crate::journal::table::{DaySummary, DayTable, JournalRow};
use crate::types::AccountKind;
use crate::JournalResult;

/// Total all transaction P/L and, on each closing row, route the trade's
/// summary P/L into the live or simulated bucket. An account that is neither
/// is fatal: it means classification upstream is broken for this input.
pub fn summarize_day(table: &DayTable) -> JournalResult<DaySummary> {
    let mut summary = DaySummary::zero();
    for i in 0..table.len() {
        summary.total_pl += table.txn(i).pl;
        if table.derived(i).balance == 0 {
            let sum = table.derived(i).summary_pl.unwrap_or(Decimal::ZERO);
            match AccountKind::classify(&table.txn(i).account)? {
                AccountKind::Simulated => summary.simulated += sum,
                AccountKind::Live => summary.live += sum,
            }
        }
    }
    Ok(summary)
}

/// Flatten the table and append the two trailer rows: the first carries the
/// day's total P/L and the simulated bucket, the second the live bucket.
pub fn render_with_trailer(table: &DayTable, summary: &DaySummary) -> Vec<JournalRow> {
    let mut rows: Vec<JournalRow> = (0..table.len()).map(|i| table.render_row(i)).collect();
    rows.push(JournalRow::trailer(
        Some(summary.total_pl),
        summary.simulated,
    ));
    rows.push(JournalRow::trailer(None, summary.live));
    rows
}
