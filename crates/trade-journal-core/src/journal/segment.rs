//! Trade segmentation: assign a dense 1-based trade number to every row by
//! detecting balance-zero crossings, then slice the table into per-trade row
//! runs.

use crate::error::JournalError;
use crate::journal::table::{trade_label, DayTable, Trade};
use crate::JournalResult;

/// Assign "Trade N" indices over the (ticker, account, start, date, time)
/// sorted table. A zero balance closes the current trade; so does a
/// (ticker, account) group change, so a group that never closes keeps its
/// own index instead of bleeding into the next group, and surfaces as an
/// open trade downstream. An empty ticker is the end-of-data sentinel for
/// padded tables and stops assignment.
pub fn assign_trade_indices(table: &mut DayTable) {
    let mut count: u32 = 1;
    let mut prev_ended = false;
    for i in 0..table.len() {
        if table.txn(i).ticker.is_empty() {
            break;
        }
        let new_group = i > 0 && !table.txn(i).same_group(table.txn(i - 1));
        if prev_ended || new_group {
            count += 1;
            prev_ended = false;
        }
        table.derived_mut(i).trade_index = Some(count);
        if table.derived(i).balance == 0 {
            prev_ended = true;
        }
    }
}

/// Slice the table into ordered per-trade row runs.
///
/// Numbering must be dense: the scan starts at trade 1 and stops at the first
/// number with no matching rows, which is exactly the contract
/// [`assign_trade_indices`] upholds. Calling this before indices exist is a
/// structural error returned to the caller.
pub fn build_trade_list(table: &DayTable) -> JournalResult<Vec<Trade>> {
    if table.is_empty() {
        return Ok(Vec::new());
    }
    if table.derived(0).trade_index.is_none() {
        return Err(JournalError::MissingTradeIndex(
            "Cannot build a trade list before trade indices are assigned".into(),
        ));
    }

    let mut trades = Vec::new();
    let mut number: u32 = 1;
    loop {
        let rows: Vec<usize> = (0..table.len())
            .filter(|&i| table.derived(i).trade_index == Some(number))
            .collect();
        if rows.is_empty() {
            break;
        }
        trades.push(Trade { number, rows });
        number += 1;
    }
    Ok(trades)
}

/// Convenience for diagnostics: the label of the trade a row belongs to.
pub fn row_trade_label(table: &DayTable, i: usize) -> String {
    table
        .derived(i)
        .trade_index
        .map(trade_label)
        .unwrap_or_else(|| "unindexed trade".into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::journal::balance::write_share_balance;
    use crate::types::{Side, Transaction};
    use chrono::{NaiveDate, NaiveTime};
    use rust_decimal_macros::dec;

    fn tx(ticker: &str, side: Side, shares: i64, minute: u32) -> Transaction {
        Transaction {
            ticker: ticker.into(),
            side,
            price: dec!(10),
            shares,
            account: "U1".into(),
            pl: dec!(0),
            date: NaiveDate::from_ymd_opt(2018, 9, 5).unwrap(),
            time: NaiveTime::from_hms_opt(9, 30 + minute, 0).unwrap(),
            open_close: None,
        }
    }

    fn indices(table: &DayTable) -> Vec<Option<u32>> {
        (0..table.len())
            .map(|i| table.derived(i).trade_index)
            .collect()
    }

    #[test]
    fn consecutive_trades_get_consecutive_numbers() {
        let mut table = DayTable::from_transactions(vec![
            tx("XYZ", Side::Buy, 100, 0),
            tx("XYZ", Side::Sell, -100, 5),
            tx("XYZ", Side::Buy, 50, 10),
            tx("XYZ", Side::Sell, -50, 15),
        ]);
        write_share_balance(&mut table);
        assign_trade_indices(&mut table);
        assert_eq!(indices(&table), vec![Some(1), Some(1), Some(2), Some(2)]);
    }

    #[test]
    fn multi_leg_trade_shares_one_index() {
        let mut table = DayTable::from_transactions(vec![
            tx("XYZ", Side::Buy, 100, 0),
            tx("XYZ", Side::Buy, 100, 2),
            tx("XYZ", Side::Sell, -50, 5),
            tx("XYZ", Side::Sell, -150, 9),
        ]);
        write_share_balance(&mut table);
        assign_trade_indices(&mut table);
        assert_eq!(
            indices(&table),
            vec![Some(1), Some(1), Some(1), Some(1)]
        );
    }

    #[test]
    fn unclosed_group_keeps_its_own_index() {
        // AMD never closes; XYZ must still open a fresh trade rather than
        // inherit AMD's number and flatten the composite
        let mut table = DayTable::from_transactions(vec![
            tx("AMD", Side::Buy, 200, 0),
            tx("AMD", Side::Sell, -100, 5),
            tx("XYZ", Side::Buy, 50, 10),
            tx("XYZ", Side::Sell, -50, 15),
        ]);
        write_share_balance(&mut table);
        assign_trade_indices(&mut table);
        assert_eq!(
            indices(&table),
            vec![Some(1), Some(1), Some(2), Some(2)]
        );
    }

    #[test]
    fn empty_ticker_stops_assignment() {
        let mut table = DayTable::from_transactions(vec![
            tx("XYZ", Side::Buy, 100, 0),
            tx("XYZ", Side::Sell, -100, 5),
            tx("", Side::Buy, 0, 6),
        ]);
        write_share_balance(&mut table);
        assign_trade_indices(&mut table);
        assert_eq!(indices(&table), vec![Some(1), Some(1), None]);
    }

    #[test]
    fn trade_list_slices_in_order() {
        let mut table = DayTable::from_transactions(vec![
            tx("XYZ", Side::Buy, 100, 0),
            tx("XYZ", Side::Sell, -100, 5),
            tx("XYZ", Side::Sell, -50, 10),
            tx("XYZ", Side::Buy, 50, 15),
        ]);
        write_share_balance(&mut table);
        assign_trade_indices(&mut table);
        let trades = build_trade_list(&table).unwrap();
        assert_eq!(trades.len(), 2);
        assert_eq!(trades[0].rows, vec![0, 1]);
        assert_eq!(trades[1].rows, vec![2, 3]);
        assert_eq!(trades[1].number, 2);
    }

    #[test]
    fn trade_list_without_indices_is_a_structural_error() {
        let table = DayTable::from_transactions(vec![tx("XYZ", Side::Buy, 100, 0)]);
        match build_trade_list(&table).unwrap_err() {
            JournalError::MissingTradeIndex(_) => {}
            other => panic!("Expected MissingTradeIndex, got {other:?}"),
        }
    }

    #[test]
    fn empty_table_yields_no_trades() {
        let table = DayTable::from_transactions(vec![]);
        assert!(build_trade_list(&table).unwrap().is_empty());
    }
}
