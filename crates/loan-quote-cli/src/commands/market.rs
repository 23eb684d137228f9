use clap::Args;
use loan_quote_core::{LenderRecord, QuoteCalculator};
use std::path::PathBuf;
use tracing::info;

use crate::config::Config;
use crate::input;

/// Where to read a market's lenders from. With neither flag, a JSON array of
/// lenders is read from stdin.
#[derive(Args, Debug, Clone, Default)]
pub struct MarketArgs {
    /// Market data file (CSV with a Lender,Rate,Available header, or .json)
    #[arg(long, conflicts_with = "market")]
    pub market_file: Option<PathBuf>,

    /// Market id from the configuration file
    #[arg(long)]
    pub market: Option<String>,
}

impl MarketArgs {
    pub fn load_records(&self, config: &Config) -> Result<Vec<LenderRecord>, Box<dyn std::error::Error>> {
        if let Some(ref path) = self.market_file {
            return input::file::read_market(path);
        }
        if let Some(ref market) = self.market {
            return input::file::read_market(config.market_path(market)?);
        }
        input::stdin::read_stdin_market()?
            .ok_or_else(|| "--market-file or --market is required (or pipe lenders as JSON)".into())
    }
}

/// Load a market and build a calculator over it.
pub fn load_calculator(args: &MarketArgs, config: &Config) -> Result<QuoteCalculator, Box<dyn std::error::Error>> {
    let calculator = QuoteCalculator::from_records(args.load_records(config)?)?;
    info!(
        market = args.market.as_deref().unwrap_or("-"),
        lenders = calculator.catalog().len(),
        capacity = calculator.catalog().total_capacity(),
        "market loaded"
    );
    Ok(calculator)
}
