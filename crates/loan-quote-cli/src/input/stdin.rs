use loan_quote_core::{LenderRecord, LoanQuoteError};
use std::io::{self, Read};

/// Read market records piped to stdin as a JSON array.
///
/// Returns None when stdin is a terminal or the pipe carries nothing, so the
/// caller can report that no market was given.
pub fn read_stdin_market() -> Result<Option<Vec<LenderRecord>>, Box<dyn std::error::Error>> {
    if atty::is(atty::Stream::Stdin) {
        return Ok(None);
    }

    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;
    parse_market_json(&buffer)
}

fn parse_market_json(buffer: &str) -> Result<Option<Vec<LenderRecord>>, Box<dyn std::error::Error>> {
    let trimmed = buffer.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let records: Vec<LenderRecord> = serde_json::from_str(trimmed).map_err(|e| {
        LoanQuoteError::InvalidMarketData(format!("stdin is not a JSON array of lenders: {e}"))
    })?;
    Ok(Some(records))
}
