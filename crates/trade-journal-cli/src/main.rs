mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::journal::{ProcessArgs, SummaryArgs};

/// Daily trade segmentation for brokerage statements
#[derive(Parser)]
#[command(
    name = "tjour",
    version,
    about = "Daily trade segmentation for brokerage statements",
    long_about = "Partitions one trading day's transaction records into discrete trades: \
                  running share balances, shared start times, per-trade realized P/L, \
                  durations and names, plus day totals split live/simulated."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Segment one day's transactions into trades
    Process(ProcessArgs),
    /// Day-level P/L totals only
    Summary(SummaryArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Process(args) => commands::journal::run_process(args),
        Commands::Summary(args) => commands::journal::run_summary(args),
        Commands::Version => {
            println!("tjour {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
