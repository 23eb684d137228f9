use clap::Args;
use serde_json::Value;

use crate::commands::market::{self, MarketArgs};
use crate::config::Config;

/// Arguments for listing a market's lenders
#[derive(Args)]
pub struct LendersArgs {
    #[command(flatten)]
    pub market: MarketArgs,
}

/// Lenders in the order they would be drawn on, with the market's capacity.
pub fn run_lenders(args: LendersArgs, config: &Config) -> Result<Value, Box<dyn std::error::Error>> {
    let calculator = market::load_calculator(&args.market, config)?;
    Ok(serde_json::to_value(calculator.catalog())?)
}
