use loan_quote_core::PrincipalPolicy;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable consulted when `--config` is not given.
pub const CONFIG_ENV_VAR: &str = "LOANQ_CONFIG";

/// CLI configuration, read from YAML.
///
/// ```yaml
/// markets:
///   en: data/market-en.csv
///   it: data/market-it.csv
/// principal:
///   min: 1000
///   max: 15000
///   increment: 100
/// currency_sign: "£"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Market id to market data file. Relative paths resolve against the
    /// directory holding the configuration file.
    pub markets: BTreeMap<String, PathBuf>,
    pub principal: PrincipalPolicy,
    pub currency_sign: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            markets: BTreeMap::new(),
            principal: PrincipalPolicy::default(),
            currency_sign: "£".to_string(),
        }
    }
}

impl Config {
    /// Load from `path`, else from `$LOANQ_CONFIG`, else built-in defaults.
    pub fn load(path: Option<&str>) -> Result<Self, Box<dyn std::error::Error>> {
        let env_path = std::env::var(CONFIG_ENV_VAR).ok();
        match path.or(env_path.as_deref()) {
            Some(p) => Self::from_file(Path::new(p)),
            None => Ok(Self::default()),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let contents = fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config '{}': {}", path.display(), e))?;
        let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
        Self::from_yaml(&contents, base_dir)
            .map_err(|e| format!("Invalid config '{}': {}", path.display(), e).into())
    }

    pub fn from_yaml(contents: &str, base_dir: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let mut config: Config = serde_yaml::from_str(contents)?;
        config.principal.check()?;
        for market_path in config.markets.values_mut() {
            if market_path.is_relative() {
                *market_path = base_dir.join(&*market_path);
            }
        }
        Ok(config)
    }

    pub fn market_path(&self, market: &str) -> Result<&Path, Box<dyn std::error::Error>> {
        self.markets
            .get(market)
            .map(PathBuf::as_path)
            .ok_or_else(|| format!("Unknown market '{market}'").into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn test_defaults_when_empty() {
        let config = Config::from_yaml("{}", Path::new(".")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.principal.min, 1000);
        assert_eq!(config.currency_sign, "£");
    }

    #[test]
    fn test_markets_resolve_against_config_dir() {
        let yaml = "markets:\n  en: data/market-en.csv\n  it: /srv/market-it.csv\n";
        let config = Config::from_yaml(yaml, Path::new("/etc/loanq")).unwrap();
        assert_eq!(
            config.market_path("en").unwrap(),
            Path::new("/etc/loanq/data/market-en.csv")
        );
        assert_eq!(config.market_path("it").unwrap(), Path::new("/srv/market-it.csv"));
    }

    #[test]
    fn test_unknown_market() {
        let err = Config::default().market_path("BAD_MARKET").unwrap_err();
        assert!(err.to_string().contains("Unknown market"));
    }

    #[test]
    fn test_partial_principal_policy() {
        let yaml = "principal:\n  max: 25000\n";
        let config = Config::from_yaml(yaml, Path::new(".")).unwrap();
        assert_eq!(config.principal.min, 1000);
        assert_eq!(config.principal.max, 25000);
        assert_eq!(config.principal.increment, 100);
    }

    #[test]
    fn test_inconsistent_policy_rejected() {
        let yaml = "principal:\n  min: 5000\n  max: 1000\n";
        assert!(Config::from_yaml(yaml, Path::new(".")).is_err());
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "currency_sign: \"€\"\nmarkets:\n  it: market-it.csv").unwrap();
        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.currency_sign, "€");
        let expected = file.path().parent().unwrap().join("market-it.csv");
        assert_eq!(config.market_path("it").unwrap(), expected.as_path());
    }

    #[test]
    fn test_missing_file_reported() {
        let err = Config::from_file(Path::new("/definitely/not/here.yaml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read config"));
    }
}
