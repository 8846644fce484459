//! The transaction-to-trade segmentation engine.
//!
//! Stages run as a fixed pipeline of full passes over one day's table:
//! balance tracking, start-time propagation, trade segmentation, per-trade
//! aggregation, trade-list slicing, post-processing of hold/flip edge cases,
//! and the day-level summary. See [`pipeline::process_day`].

pub mod aggregate;
pub mod balance;
pub mod pipeline;
pub mod post_process;
pub mod segment;
pub mod summary;
pub mod table;

pub use pipeline::{analyze_day, process_day, ProcessedDay};
pub use table::{DaySummary, DayTable, JournalRow, Trade, TradeTable};
