use clap::Args;
use serde_json::Value;

use crate::commands::market::{self, MarketArgs};
use crate::config::Config;

/// Arguments for quoting a loan
#[derive(Args)]
pub struct QuoteArgs {
    /// Loan amount: a plain integer within the configured range and increment
    #[arg(allow_hyphen_values = true)]
    pub amount: String,

    #[command(flatten)]
    pub market: MarketArgs,

    /// Also report the lender allocation and the unrounded figures
    #[arg(long)]
    pub breakdown: bool,
}

pub fn run_quote(args: QuoteArgs, config: &Config) -> Result<Value, Box<dyn std::error::Error>> {
    let calculator = market::load_calculator(&args.market, config)?;
    let principal = config.principal.parse(&args.amount)?;

    if args.breakdown {
        let result = calculator.explain(principal)?;
        Ok(serde_json::to_value(result)?)
    } else {
        let result = calculator.quote(principal)?;
        Ok(serde_json::to_value(result)?)
    }
}
