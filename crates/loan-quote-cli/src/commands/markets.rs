use serde_json::{json, Value};

use crate::config::Config;

/// Markets named in the configuration and the files backing them.
pub fn run_markets(config: &Config) -> Result<Value, Box<dyn std::error::Error>> {
    let markets: Vec<Value> = config
        .markets
        .iter()
        .map(|(id, path)| {
            json!({
                "market": id,
                "path": path.display().to_string(),
                "available": path.is_file(),
            })
        })
        .collect();
    Ok(Value::Array(markets))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_markets_listed_in_id_order() {
        let mut config = Config::default();
        config.markets.insert("it".into(), PathBuf::from("/nowhere/it.csv"));
        config.markets.insert("en".into(), PathBuf::from("/nowhere/en.csv"));
        let value = run_markets(&config).unwrap();
        assert_eq!(value[0]["market"], "en");
        assert_eq!(value[1]["market"], "it");
        assert_eq!(value[1]["available"], false);
    }

    #[test]
    fn test_no_markets() {
        let value = run_markets(&Config::default()).unwrap();
        assert_eq!(value, Value::Array(Vec::new()));
    }
}
