use clap::Args;
use serde_json::Value;

use trade_journal_core::journal::pipeline;
use trade_journal_core::schema::{adapt_rows, RawSchema, SourceFormat};
use trade_journal_core::Transaction;

use crate::input;

/// Arguments for processing one day's statement
#[derive(Args)]
pub struct ProcessArgs {
    /// Path to a statement export (.csv, adapted via --source) or a JSON
    /// transaction file; reads JSON from stdin when omitted
    #[arg(long)]
    pub input: Option<String>,

    /// Statement source format for CSV input
    #[arg(long, default_value = "das")]
    pub source: String,
}

pub fn run_process(args: ProcessArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let txns = load_transactions(&args)?;
    let result = pipeline::analyze_day(txns)?;
    Ok(serde_json::to_value(result)?)
}

/// Arguments for the day-totals summary
#[derive(Args)]
pub struct SummaryArgs {
    #[command(flatten)]
    pub process: ProcessArgs,
}

pub fn run_summary(args: SummaryArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let txns = load_transactions(&args.process)?;
    let day = pipeline::process_day(txns)?;
    Ok(serde_json::to_value(day.summary)?)
}

fn load_transactions(args: &ProcessArgs) -> Result<Vec<Transaction>, Box<dyn std::error::Error>> {
    if let Some(ref path) = args.input {
        if path.to_ascii_lowercase().ends_with(".csv") {
            let format: SourceFormat = args.source.parse()?;
            let schema = RawSchema::new(format)?;
            let records = input::file::read_csv_records(path)?;
            Ok(adapt_rows(&schema, &records)?)
        } else {
            Ok(input::file::read_json(path)?)
        }
    } else if let Some(data) = input::stdin::read_stdin()? {
        Ok(serde_json::from_value(data)?)
    } else {
        Err("--input <statement.csv|transactions.json> or stdin required".into())
    }
}
