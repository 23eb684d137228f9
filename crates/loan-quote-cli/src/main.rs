mod commands;
mod config;
mod input;
mod logger;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use loan_quote_core::LoanQuoteError;
use std::process;
use tracing::debug;

use commands::lenders::LendersArgs;
use commands::quote::QuoteArgs;
use config::Config;

/// Multi-lender loan quotes
#[derive(Parser)]
#[command(
    name = "loanq",
    version,
    about = "Quote 36-month amortised loans funded by the cheapest available lenders",
    long_about = "Quotes a fixed-term amortised loan by drawing capital from the \
                  lowest-rate lenders in a market. Reports the blended annual rate, \
                  the monthly repayment and the total repayment with decimal precision."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Path to a YAML configuration file (falls back to $LOANQ_CONFIG)
    #[arg(long, global = true)]
    config: Option<String>,

    /// Enable debug logging on stderr
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Quote a loan amount against a market
    Quote(QuoteArgs),
    /// List a market's lenders in allocation order
    Lenders(LendersArgs),
    /// List the markets named in the configuration
    Markets,
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
    Text,
}

fn main() {
    let cli = Cli::parse();
    logger::init_cli_logger(cli.verbose);

    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => fail(e),
    };
    debug!(markets = config.markets.len(), "configuration loaded");

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Quote(args) => commands::quote::run_quote(args, &config),
        Commands::Lenders(args) => commands::lenders::run_lenders(args, &config),
        Commands::Markets => commands::markets::run_markets(&config),
        Commands::Version => {
            println!("loanq {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value, &config.currency_sign);
            process::exit(0);
        }
        Err(e) => fail(e),
    }
}

fn fail(e: Box<dyn std::error::Error>) -> ! {
    eprintln!("{}: {}", "error".red().bold(), describe(e.as_ref()));
    process::exit(1);
}

/// Borrower-facing wording for the failures a borrower can act on.
fn describe(e: &(dyn std::error::Error + 'static)) -> String {
    match e.downcast_ref::<LoanQuoteError>() {
        Some(LoanQuoteError::InsufficientCapacity { .. }) => format!(
            "{e}. Insufficient offers from lenders to satisfy the loan. Try a smaller loan amount."
        ),
        _ => e.to_string(),
    }
}
