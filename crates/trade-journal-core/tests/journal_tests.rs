use chrono::{NaiveDate, NaiveTime};
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::BTreeMap;

use trade_journal_core::journal::process_day;
use trade_journal_core::schema::{adapt_rows, RawSchema, SourceFormat};
use trade_journal_core::{JournalError, Side, Transaction};

// ===========================================================================
// End-to-end properties of the segmentation pipeline, checked over a messy
// multi-ticker, multi-account day: flatness, P/L conservation, start-time
// uniformity, duration correctness, index density, day-total conservation.
// ===========================================================================

fn time(h: u32, m: u32, s: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, s).unwrap()
}

fn tx(
    ticker: &str,
    account: &str,
    side: Side,
    shares: i64,
    price: Decimal,
    pl: Decimal,
    t: NaiveTime,
) -> Transaction {
    Transaction {
        ticker: ticker.into(),
        side,
        price,
        shares,
        account: account.into(),
        pl,
        date: NaiveDate::from_ymd_opt(2018, 9, 5).unwrap(),
        time: t,
        open_close: None,
    }
}

/// A day with five trades: two live AMD round trips (one scaled in), a live
/// XYZ short, a simulated NFLX long held out overnight, and a simulated ROKU
/// position carried in and closed.
fn busy_day() -> Vec<Transaction> {
    vec![
        // AMD trade 1: scale in, single exit
        tx("AMD", "U12345", Side::Buy, 100, dec!(25.00), dec!(0), time(9, 31, 0)),
        tx("AMD", "U12345", Side::Buy, 100, dec!(25.10), dec!(0), time(9, 33, 30)),
        tx("AMD", "U12345", Side::Sell, -200, dec!(25.40), dec!(70), time(9, 41, 15)),
        // AMD trade 2: quick scalp, loses
        tx("AMD", "U12345", Side::Buy, 50, dec!(25.50), dec!(0), time(10, 2, 0)),
        tx("AMD", "U12345", Side::Sell, -50, dec!(25.30), dec!(-10), time(10, 3, 45)),
        // XYZ short
        tx("XYZ", "U12345", Side::Sell, -300, dec!(14.00), dec!(0), time(9, 45, 0)),
        tx("XYZ", "U12345", Side::Buy, 300, dec!(13.80), dec!(60), time(10, 15, 0)),
        // NFLX long, partial exit, rest carried out
        tx("NFLX", "TR9999", Side::Buy, 40, dec!(350.00), dec!(0), time(11, 0, 0)),
        tx("NFLX", "TR9999", Side::Sell, -20, dec!(351.00), dec!(20), time(11, 30, 0)),
        tx("NFLX", "TR9999", Side::HoldClose, 0, dec!(0), dec!(0), time(16, 0, 0)),
        // ROKU carried in, closed on the first exit
        tx("ROKU", "TR9999", Side::HoldOpen, 60, dec!(0), dec!(0), time(9, 29, 0)),
        tx("ROKU", "TR9999", Side::Sell, -60, dec!(41.00), dec!(120), time(9, 50, 0)),
    ]
}

#[test]
fn every_trade_ends_flat() {
    let day = process_day(busy_day()).unwrap();
    assert_eq!(day.trades.len(), 5);
    for trade in &day.trades {
        assert_eq!(
            trade.rows.last().unwrap().balance,
            Some(0),
            "{} did not end flat",
            trade.label
        );
    }
}

#[test]
fn summary_pl_conserves_member_rows() {
    let day = process_day(busy_day()).unwrap();
    for trade in &day.trades {
        let member_total: Decimal = trade.rows.iter().filter_map(|r| r.pl).sum();
        let written = trade.rows.last().unwrap().sum.unwrap();
        assert_eq!(written, member_total, "{} P/L not conserved", trade.label);
    }
}

#[test]
fn start_times_are_uniform_per_trade() {
    let day = process_day(busy_day()).unwrap();
    for trade in &day.trades {
        let first = trade.rows[0].start;
        assert!(first.is_some());
        for row in &trade.rows {
            assert_eq!(row.start, first, "{} start not shared", trade.label);
        }
    }
}

#[test]
fn durations_span_start_to_close() {
    let day = process_day(busy_day()).unwrap();
    for trade in &day.trades {
        let close = trade.rows.last().unwrap();
        let elapsed = close.time.unwrap() - close.start.unwrap();
        let expect = trade_journal_core::journal::table::format_duration(elapsed);
        assert_eq!(close.duration.as_deref(), Some(expect.as_str()));
    }
}

#[test]
fn trade_indices_are_dense_and_ascending() {
    let day = process_day(busy_day()).unwrap();
    for (i, trade) in day.trades.iter().enumerate() {
        assert_eq!(trade.number, (i + 1) as u32);
        assert_eq!(trade.label, format!("Trade {}", i + 1));
        for row in &trade.rows {
            assert_eq!(row.tix, trade.label);
        }
    }
}

#[test]
fn day_totals_conserve_trade_sums() {
    let day = process_day(busy_day()).unwrap();
    let trade_total: Decimal = day
        .trades
        .iter()
        .map(|t| t.rows.last().unwrap().sum.unwrap())
        .sum();
    assert_eq!(day.summary.live + day.summary.simulated, trade_total);
    // live: AMD +70 -10, XYZ +60; simulated: NFLX +20, ROKU +120
    assert_eq!(day.summary.live, dec!(120));
    assert_eq!(day.summary.simulated, dec!(140));
    assert_eq!(day.summary.total_pl, dec!(260));
}

#[test]
fn edge_cases_are_annotated() {
    let day = process_day(busy_day()).unwrap();
    let names: Vec<&str> = day
        .trades
        .iter()
        .map(|t| t.rows.last().unwrap().name.as_str())
        .collect();
    assert!(names.contains(&"NFLX Long OVERNIGHT"));
    assert!(names.contains(&"XYZ Short"));
    assert!(names.contains(&"AMD Long"));
}

#[test]
fn carried_in_price_reconstructed_end_to_end() {
    let day = process_day(busy_day()).unwrap();
    let roku = day
        .trades
        .iter()
        .find(|t| t.rows[0].ticker == "ROKU")
        .unwrap();
    // exit 41.00 with +120 realized on -60 shares: carried entry was 39.00
    assert_eq!(roku.rows[0].price, Some(dec!(39.00)));
}

#[test]
fn trailer_rows_follow_the_data() {
    let day = process_day(busy_day()).unwrap();
    assert_eq!(day.rows.len(), day.transaction_count + 2);
    let totals = &day.rows[day.rows.len() - 2];
    assert_eq!(totals.pl, Some(dec!(260)));
    assert_eq!(totals.sum, Some(dec!(140)));
    assert_eq!(day.rows.last().unwrap().sum, Some(dec!(120)));
}

#[test]
fn unclosed_position_fails_the_day() {
    // AMD keeps 100 shares open with no closing fill and no hold row. The
    // day must abort instead of folding the open rows into XYZ's trade and
    // reporting a flat composite.
    let result = process_day(vec![
        tx("AMD", "U12345", Side::Buy, 200, dec!(25.00), dec!(0), time(9, 31, 0)),
        tx("AMD", "U12345", Side::Sell, -100, dec!(25.40), dec!(25), time(9, 41, 0)),
        tx("XYZ", "U12345", Side::Buy, 50, dec!(14.00), dec!(0), time(10, 0, 0)),
        tx("XYZ", "U12345", Side::Sell, -50, dec!(14.20), dec!(10), time(10, 15, 0)),
    ]);
    match result.unwrap_err() {
        JournalError::OpenTrade { trade, balance } => {
            assert_eq!(trade, "Trade 1");
            assert_eq!(balance, 100);
        }
        other => panic!("Expected OpenTrade, got {other:?}"),
    }
}

// ---------------------------------------------------------------------------
// Schema adapter feeding the pipeline
// ---------------------------------------------------------------------------

fn das_row(
    t: &str,
    symb: &str,
    side: &str,
    price: &str,
    qty: &str,
    account: &str,
    pl: &str,
) -> BTreeMap<String, String> {
    let mut row = BTreeMap::new();
    row.insert("Time".to_string(), t.to_string());
    row.insert("Symb".to_string(), symb.to_string());
    row.insert("Side".to_string(), side.to_string());
    row.insert("Price".to_string(), price.to_string());
    row.insert("Qty".to_string(), qty.to_string());
    row.insert("Account".to_string(), account.to_string());
    row.insert("P / L".to_string(), pl.to_string());
    row.insert("Date".to_string(), "2018-09-05".to_string());
    row
}

#[test]
fn das_export_processes_end_to_end() {
    let schema = RawSchema::new(SourceFormat::Das).unwrap();
    let txns = adapt_rows(
        &schema,
        &[
            das_row("09:31:02", "AMD", "B", "25.00", "100", "U12345", ""),
            das_row("09:41:15", "AMD", "S", "25.40", "-100", "U12345", "40.00"),
        ],
    )
    .unwrap();

    let day = process_day(txns).unwrap();
    assert_eq!(day.trades.len(), 1);
    let close = day.trades[0].rows.last().unwrap();
    assert_eq!(close.name, "AMD Long");
    assert_eq!(close.sum, Some(dec!(40.00)));
    assert_eq!(close.duration.as_deref(), Some("0:10:13"));
}
