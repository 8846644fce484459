//! Edge-case corrections applied per trade after segmentation: overnight
//! hold annotation, flipped-position annotation, and reconstruction of a
//! synthetic entry price for positions carried in from a previous day.

use rust_decimal::Decimal;
use tracing::warn;

use crate::error::JournalError;
use crate::journal::aggregate::close_direction;
use crate::journal::table::{trade_label, DayTable, Trade};
use crate::types::Side;
use crate::JournalResult;

/// Inspect each trade's boundary rows and correct names, prices and balances
/// for the hold and flip cases. Names are rebuilt from the ticker and the
/// freshly derived direction rather than suffix-appended, so reapplying this
/// pass never double-annotates.
///
/// Returns data-quality warnings for the caller; a trade whose last row has
/// a non-zero balance means segmentation itself went wrong and is fatal.
pub fn post_process(table: &mut DayTable, trades: &[Trade]) -> JournalResult<Vec<String>> {
    let mut warnings = Vec::new();

    for trade in trades {
        let (Some(&first), Some(&last)) = (trade.rows.first(), trade.rows.last()) else {
            continue;
        };
        let label = trade_label(trade.number);

        let end_balance = table.derived(last).balance;
        if end_balance != 0 {
            return Err(JournalError::OpenTrade {
                trade: label,
                balance: end_balance,
            });
        }

        let first_side = table.txn(first).side;
        let last_side = table.txn(last).side;
        let ticker = table.txn(last).ticker.clone();

        if first_side.is_hold() || last_side.is_hold() {
            // A trade can hold on both ends; handle each boundary on its own
            if last_side.is_hold() {
                let dir = close_direction(table, last);
                table.derived_mut(last).name = Some(format!("{ticker} {dir} OVERNIGHT"));
                // the carried-out shares are not an open position
                table.derived_mut(last).balance = 0;
            }
            if first_side.is_hold() {
                reconstruct_entry_price(table, trade, &label, &ticker, &mut warnings);
            }
        } else if first_side == Side::Buy && last_side == Side::Buy {
            annotate_flip(table, last, &ticker, &label, "long to short", &mut warnings);
        } else if first_side != Side::Buy && last_side != Side::Buy {
            annotate_flip(table, last, &ticker, &label, "short to long", &mut warnings);
        }
    }

    Ok(warnings)
}

/// A position carried in from a previous day has no recorded entry price.
/// Recover it from the first realized exit: the average entry satisfies
/// `entry = exit price + exit P/L / exit shares` with signed shares.
///
/// This is exact only when the carried-in hold is the sole entrance before
/// the first exit; with additional entrances the recovered figure is an
/// approximation and is flagged, not corrected.
fn reconstruct_entry_price(
    table: &mut DayTable,
    trade: &Trade,
    label: &str,
    ticker: &str,
    warnings: &mut Vec<String>,
) {
    let first = trade.rows[0];
    let mut entrances_after_hold = 0usize;
    for &i in &trade.rows[1..] {
        if table.txn(i).pl != Decimal::ZERO {
            let shares = table.txn(i).shares;
            if shares == 0 {
                break;
            }
            if entrances_after_hold > 0 {
                let msg = format!(
                    "{label} ({ticker}): {entrances_after_hold} extra entrance(s) before the \
                     first exit; reconstructed entry price is approximate"
                );
                warn!(trade = %label, ticker = %ticker, "{msg}");
                warnings.push(msg);
            }
            let entry = table.txn(i).price + table.txn(i).pl / Decimal::from(shares);
            table.derived_mut(first).price_override = Some(entry);
            break;
        }
        entrances_after_hold += 1;
    }
}

fn annotate_flip(
    table: &mut DayTable,
    last: usize,
    ticker: &str,
    label: &str,
    flavor: &str,
    warnings: &mut Vec<String>,
) {
    let dir = close_direction(table, last);
    table.derived_mut(last).name = Some(format!("{ticker} {dir} FLIPPED"));
    let msg = format!("{label} ({ticker}): position flipped {flavor}; review manually");
    warn!(trade = %label, ticker = %ticker, "{msg}");
    warnings.push(msg);
}
