use loan_quote_core::{LenderRecord, LoanQuoteError};
use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Read a market data file. `.json` files hold an array of records; anything
/// else is read as CSV with a `Lender,Rate,Available` header.
pub fn read_market(path: &Path) -> Result<Vec<LenderRecord>, Box<dyn std::error::Error>> {
    let resolved = resolve_path(path)?;
    let is_json = resolved
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    let records = if is_json {
        read_json(&resolved)?
    } else {
        read_csv(&resolved)?
    };

    debug!(path = %resolved.display(), records = records.len(), "market data read");
    Ok(records)
}

/// Deserialise a JSON file at an already resolved path.
fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, Box<dyn std::error::Error>> {
    let contents = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read '{}': {}", path.display(), e))?;
    let value: T = serde_json::from_str(&contents)
        .map_err(|e| format!("Failed to parse '{}': {}", path.display(), e))?;
    Ok(value)
}

fn read_csv(path: &Path) -> Result<Vec<LenderRecord>, Box<dyn std::error::Error>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| format!("Failed to read '{}': {}", path.display(), e))?;

    let mut records = Vec::new();
    for (idx, row) in reader.deserialize::<LenderRecord>().enumerate() {
        let record = row.map_err(|e| {
            LoanQuoteError::InvalidMarketData(format!(
                "{} row {}: {}",
                path.display(),
                idx + 1,
                e
            ))
        })?;
        records.push(record);
    }
    Ok(records)
}

/// Make `path` absolute against the working directory and check it names an
/// existing regular file.
fn resolve_path(path: &Path) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let resolved = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()?.join(path)
    };

    if !resolved.exists() {
        return Err(format!("File not found: {}", resolved.display()).into());
    }

    if !resolved.is_file() {
        return Err(format!("Not a file: {}", resolved.display()).into());
    }

    Ok(resolved)
}
