use serde::{Deserialize, Serialize};

/// Which resolution stage produced a ticker.
///
/// Variants are listed in the order the resolver tries them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchSource {
    /// Hand-maintained override table
    Override,
    /// Exact company-name match against the exchange listing (after cleaning)
    Exact,
    /// First word of the name is itself a listed symbol
    Symbol,
    /// Similarity ratio above the configured threshold
    Fuzzy,
    /// Guessed symbol confirmed by a live price probe
    Heuristic,
}

impl std::fmt::Display for MatchSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchSource::Override => write!(f, "override"),
            MatchSource::Exact => write!(f, "exact"),
            MatchSource::Symbol => write!(f, "symbol"),
            MatchSource::Fuzzy => write!(f, "fuzzy"),
            MatchSource::Heuristic => write!(f, "heuristic"),
        }
    }
}

/// A security name mapped to a market-data symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickerMatch {
    /// The security name exactly as it appeared in the input
    pub security_name: String,

    /// Symbol as understood by the price providers, e.g. "HDFCBANK.NS" or "^NSEI"
    pub symbol: String,

    pub source: MatchSource,

    /// Match confidence in `[0, 1]`; 1.0 for overrides and exact matches
    pub score: f64,
}

/// Outcome of resolving a batch of security names.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResolutionReport {
    pub resolved: Vec<TickerMatch>,

    /// Names for which no stage produced a symbol; kept for manual follow-up
    pub failed: Vec<String>,
}

impl ResolutionReport {
    pub fn total(&self) -> usize {
        self.resolved.len() + self.failed.len()
    }

    /// Fraction of names resolved, 0.0 for an empty report.
    pub fn success_ratio(&self) -> f64 {
        if self.total() == 0 {
            return 0.0;
        }
        self.resolved.len() as f64 / self.total() as f64
    }

    /// Look up the resolved symbol for a security name.
    pub fn symbol_for(&self, security_name: &str) -> Option<&str> {
        self.resolved
            .iter()
            .find(|m| m.security_name == security_name)
            .map(|m| m.symbol.as_str())
    }

    /// Number of matches produced by a given stage.
    pub fn count_by_source(&self, source: MatchSource) -> usize {
        self.resolved.iter().filter(|m| m.source == source).count()
    }
}

/// One row of the exchange's official equity listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListingEntry {
    /// Bare exchange symbol, e.g. "HDFCBANK"
    pub symbol: String,
    /// Registered company name, e.g. "HDFC Bank Limited"
    pub company_name: String,
}

impl ListingEntry {
    pub fn new(symbol: impl Into<String>, company_name: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into().trim().to_uppercase(),
            company_name: company_name.into().trim().to_string(),
        }
    }
}
