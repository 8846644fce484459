//! Per-trade summary values, written onto each trade's terminal (zero
//! balance) row: total realized P/L, holding duration, and the trade name.

use rust_decimal::Decimal;

use crate::error::JournalError;
use crate::journal::segment::row_trade_label;
use crate::journal::table::DayTable;
use crate::types::{Direction, Side};
use crate::JournalResult;

/// Direction implied by a trade's closing row. A buy closes a short, a sell
/// closes a long. A closing hold carries the position out, so its direction
/// is the sign of the carried balance (the previous row's).
pub fn close_direction(table: &DayTable, i: usize) -> Direction {
    match table.txn(i).side {
        Side::Buy => Direction::Short,
        Side::Sell => Direction::Long,
        Side::HoldOpen | Side::HoldClose => {
            if i > 0 && table.txn(i - 1).same_group(table.txn(i)) {
                if table.derived(i - 1).balance >= 0 {
                    Direction::Long
                } else {
                    Direction::Short
                }
            } else if table.txn(i).shares < 0 {
                Direction::Short
            } else {
                Direction::Long
            }
        }
    }
}

/// Accumulate each row's P/L into a running total while the balance is open;
/// write the trade total on the closing row and reset.
pub fn write_trade_pl(table: &mut DayTable) {
    let mut total = Decimal::ZERO;
    for i in 0..table.len() {
        if i > 0 && !table.txn(i).same_group(table.txn(i - 1)) {
            total = Decimal::ZERO;
        }
        if table.derived(i).balance != 0 {
            total += table.txn(i).pl;
        } else {
            table.derived_mut(i).summary_pl = Some(total + table.txn(i).pl);
            total = Decimal::ZERO;
        }
    }
}

/// Write the elapsed time between each trade's start and its closing row.
/// Cross-midnight trades are not modeled; a date mismatch is fatal.
pub fn write_trade_durations(table: &mut DayTable) -> JournalResult<()> {
    let mut first_row: Option<usize> = None;
    for i in 0..table.len() {
        if i > 0 && !table.txn(i).same_group(table.txn(i - 1)) {
            first_row = None;
        }
        let first = *first_row.get_or_insert(i);
        if table.derived(i).balance == 0 {
            let start_date = table.txn(first).date;
            let end_date = table.txn(i).date;
            if start_date != end_date {
                return Err(JournalError::CrossMidnight {
                    trade: row_trade_label(table, i),
                    start_date,
                    end_date,
                });
            }
            let start = table.derived(i).start.unwrap_or(table.txn(i).time);
            table.derived_mut(i).duration = Some(table.txn(i).time - start);
            first_row = None;
        }
    }
    Ok(())
}

/// Write "{ticker} {direction}" on each closing row. Overnight and flipped
/// annotations come later, in post-processing.
pub fn write_trade_names(table: &mut DayTable) {
    for i in 0..table.len() {
        if table.derived(i).balance == 0 {
            let dir = close_direction(table, i);
            let name = format!("{} {dir}", table.txn(i).ticker);
            table.derived_mut(i).name = Some(name);
        }
    }
}
