//! Running share-balance tracking and trade start-time propagation.
//!
//! Both passes scan the table in (ticker, account, time) order with explicit
//! group boundaries: state never leaks from one ticker/account group into the
//! next.

use chrono::NaiveTime;

use crate::journal::table::DayTable;
use crate::types::{Shares, Side};

/// Compute the running signed share balance after each transaction.
///
/// HOLD- rows carry shares out overnight: they get balance 0 and reset the
/// accumulator. HOLD+ rows carry shares in from a previous day: their share
/// count seeds the balance so the carried-in position closes to zero like any
/// other trade.
pub fn write_share_balance(table: &mut DayTable) {
    let mut running: Shares = 0;
    for i in 0..table.len() {
        if i > 0 && !table.txn(i).same_group(table.txn(i - 1)) {
            running = 0;
        }
        if table.txn(i).side == Side::HoldClose {
            running = 0;
            table.derived_mut(i).balance = 0;
        } else {
            running += table.txn(i).shares;
            table.derived_mut(i).balance = running;
        }
    }
}

/// Back-fill one shared start time across every row of a trade.
///
/// A trade opening with a hold has no meaningful entry time on the hold row
/// itself, so the next row's time is used; a hold with no successor in its
/// group falls back to its own time. A zero balance finalizes the trade and
/// re-arms the new-trade flag.
pub fn assign_start_times(table: &mut DayTable) {
    let mut new_trade = true;
    let mut start: Option<NaiveTime> = None;
    for i in 0..table.len() {
        if i > 0 && !table.txn(i).same_group(table.txn(i - 1)) {
            new_trade = true;
        }
        if new_trade {
            let t = if table.txn(i).side.is_hold() {
                match table.txns().get(i + 1) {
                    Some(next) if next.same_group(table.txn(i)) => next.time,
                    _ => table.txn(i).time,
                }
            } else {
                table.txn(i).time
            };
            start = Some(t);
            new_trade = false;
        }
        table.derived_mut(i).start = start;
        if table.derived(i).balance == 0 {
            new_trade = true;
        }
    }
}
