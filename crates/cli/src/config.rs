//! Configuration Loader
//!
//! Loads and validates the TOML run configuration.

use portfolio_benchmark_core::models::settings::AnalysisSettings;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Main configuration structure matching `config/portfolio.toml`
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub inputs: InputsSection,
    #[serde(default)]
    pub output: OutputSection,
    #[serde(default)]
    pub analysis: AnalysisSettings,
    #[serde(default)]
    pub providers: ProvidersSection,
}

/// Input files
#[derive(Debug, Clone, Deserialize)]
pub struct InputsSection {
    /// Holdings export (`.csv` or spreadsheet)
    pub holdings: PathBuf,
    /// Exchange equity listing CSV (`SYMBOL`, `NAME OF COMPANY`)
    #[serde(default)]
    pub listing: Option<PathBuf>,
    /// Model-fund weights sheet
    #[serde(default)]
    pub fund_weights: Option<PathBuf>,
    /// Worksheet of the weights file; first sheet when unset
    #[serde(default)]
    pub fund_weights_sheet: Option<String>,
    /// Extra `security_name,symbol` overrides merged over the built-in table
    #[serde(default)]
    pub overrides: Option<PathBuf>,
    /// Local archive of `<SYMBOL>_NS.csv` price files, consulted before the network
    #[serde(default)]
    pub price_dir: Option<PathBuf>,
}

/// Where reports are written
#[derive(Debug, Clone, Deserialize)]
pub struct OutputSection {
    pub dir: PathBuf,
}

impl Default for OutputSection {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("reports"),
        }
    }
}

/// Market data providers
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProvidersSection {
    /// Alpha Vantage key; `ALPHAVANTAGE_API_KEY` is used when empty
    #[serde(default)]
    pub alphavantage_api_key: Option<String>,
}

impl ProvidersSection {
    /// Get API key with environment variable fallback
    pub fn get_alphavantage_key(&self) -> Option<String> {
        if let Some(ref key) = self.alphavantage_api_key {
            if !key.is_empty() {
                return Some(key.clone());
            }
        }
        std::env::var("ALPHAVANTAGE_API_KEY")
            .ok()
            .filter(|k| !k.is_empty())
    }
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Validation failed: {0}")]
    ValidationError(String),
}

/// Load configuration from a TOML file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    config.validate()?;
    Ok(config)
}

impl Config {
    /// Validate all configuration parameters
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.inputs.holdings.as_os_str().is_empty() {
            return Err(ConfigError::ValidationError(
                "inputs.holdings must be set".into(),
            ));
        }

        if self.output.dir.as_os_str().is_empty() {
            return Err(ConfigError::ValidationError("output.dir must be set".into()));
        }

        if self.analysis.exchange_suffixes.is_empty() {
            return Err(ConfigError::ValidationError(
                "analysis.exchange_suffixes cannot be empty".into(),
            ));
        }

        if self.inputs.fund_weights.is_some() && self.analysis.fund_titles.is_empty() {
            return Err(ConfigError::ValidationError(
                "analysis.fund_titles is required when inputs.fund_weights is set".into(),
            ));
        }

        self.analysis
            .validate()
            .map_err(|e| ConfigError::ValidationError(e.to_string()))
    }
}
