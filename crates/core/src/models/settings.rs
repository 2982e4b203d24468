use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Column headers expected in the holdings export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HoldingColumns {
    pub investor: String,
    pub security: String,
    pub quantity: String,
    pub current_value: String,
    /// Worksheet to read for `.xlsx` inputs; the first sheet when unset
    pub sheet: Option<String>,
}

impl Default for HoldingColumns {
    fn default() -> Self {
        Self {
            investor: "NAME".to_string(),
            security: "Security Name".to_string(),
            quantity: "Holding".to_string(),
            // Header as exported by the depository, misspelling included.
            current_value: "Demat Holding Vlaue (Rs.)".to_string(),
            sheet: Some("DETAILED_HOLDING".to_string()),
        }
    }
}

/// Column headers of the exchange listing CSV.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListingColumns {
    pub symbol: String,
    pub company_name: String,
}

impl Default for ListingColumns {
    fn default() -> Self {
        Self {
            symbol: "SYMBOL".to_string(),
            company_name: "NAME OF COMPANY".to_string(),
        }
    }
}

/// A benchmark index shown next to the investors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Benchmark {
    pub name: String,
    pub symbol: String,
}

impl Benchmark {
    pub fn new(name: impl Into<String>, symbol: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            symbol: symbol.into(),
        }
    }
}

/// Tunables for resolution, fetching and valuation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisSettings {
    /// First month of the comparison window
    pub start_date: NaiveDate,

    /// Last day of the window; today when unset
    pub end_date: Option<NaiveDate>,

    pub holdings: HoldingColumns,
    pub listing: ListingColumns,

    /// Minimum similarity ratio for a fuzzy listing match
    pub fuzzy_threshold: f64,

    /// Score reported when the first word of a name is a listed symbol
    pub symbol_match_score: f64,

    /// Suffixes appended to exchange symbols for the price providers, in preference order
    pub exchange_suffixes: Vec<String>,

    /// How many heuristic guesses to probe per security
    pub max_probe_candidates: usize,

    /// Pause between live probes
    pub probe_delay_ms: u64,

    /// Pause between price downloads
    pub fetch_delay_ms: u64,

    /// Warn when the start price is older than this many days
    pub stale_price_days: i64,

    pub benchmarks: Vec<Benchmark>,

    /// Title rows that introduce each model fund in the weights sheet
    pub fund_titles: Vec<String>,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            start_date: NaiveDate::from_ymd_opt(2024, 4, 1).unwrap_or_default(),
            end_date: None,
            holdings: HoldingColumns::default(),
            listing: ListingColumns::default(),
            fuzzy_threshold: 0.8,
            symbol_match_score: 0.95,
            exchange_suffixes: vec![".NS".to_string(), ".BO".to_string()],
            max_probe_candidates: 3,
            probe_delay_ms: 100,
            fetch_delay_ms: 100,
            stale_price_days: 30,
            benchmarks: vec![
                Benchmark::new("NIFTY 50", "^NSEI"),
                Benchmark::new("NIFTY Midcap 100", "^NSEMDCP50"),
                Benchmark::new("NIFTY 100", "^CNX100"),
            ],
            fund_titles: vec![
                "GM Multi Cap".to_string(),
                "GM Mid & Small Cap".to_string(),
            ],
        }
    }
}

impl AnalysisSettings {
    /// Suffix used for symbols coming from the listing or override table.
    pub fn primary_suffix(&self) -> &str {
        self.exchange_suffixes
            .first()
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Turn a bare exchange symbol into a provider symbol.
    ///
    /// Symbols that already carry a suffix (`.NS`, `.BO`) or are indices (`^NSEI`)
    /// are returned unchanged.
    pub fn market_symbol(&self, exchange_symbol: &str) -> String {
        let symbol = exchange_symbol.trim().to_uppercase();
        if symbol.starts_with('^') || symbol.contains('.') {
            symbol
        } else {
            format!("{symbol}{}", self.primary_suffix())
        }
    }

    /// Check ranges before a run.
    pub fn validate(&self) -> Result<(), crate::errors::CoreError> {
        use crate::errors::CoreError;

        if !(0.0..=1.0).contains(&self.fuzzy_threshold) {
            return Err(CoreError::ValidationError(format!(
                "fuzzy_threshold must be within 0-1, got {}",
                self.fuzzy_threshold
            )));
        }
        if !(0.0..=1.0).contains(&self.symbol_match_score) {
            return Err(CoreError::ValidationError(format!(
                "symbol_match_score must be within 0-1, got {}",
                self.symbol_match_score
            )));
        }
        if let Some(end) = self.end_date {
            if end <= self.start_date {
                return Err(CoreError::ValidationError(format!(
                    "end_date {end} must be after start_date {}",
                    self.start_date
                )));
            }
        }
        if self.stale_price_days < 0 {
            return Err(CoreError::ValidationError(
                "stale_price_days cannot be negative".into(),
            ));
        }
        Ok(())
    }
}
