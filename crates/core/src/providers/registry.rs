use std::path::PathBuf;

use super::alphavantage::AlphaVantageProvider;
use super::local_csv::LocalCsvProvider;
use super::traits::PriceProvider;
use super::yahoo_finance::YahooFinanceProvider;

/// Ordered list of price providers.
///
/// The price service asks providers in registration order and falls back to
/// the next one when a provider errors or returns nothing. New sources can be
/// registered without touching the callers.
pub struct PriceProviderRegistry {
    providers: Vec<Box<dyn PriceProvider>>,
}

impl PriceProviderRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            providers: Vec::new(),
        }
    }

    /// Registry with the standard chain:
    /// local archive (if given) → Yahoo Finance → Alpha Vantage (if a key is given).
    pub fn new_with_defaults(local_dir: Option<PathBuf>, alphavantage_key: Option<String>) -> Self {
        let mut registry = Self::new();

        // Local archive first: no network, no rate limits
        if let Some(dir) = local_dir {
            registry.register(Box::new(LocalCsvProvider::new(dir)));
        }

        // Yahoo Finance, no API key needed
        match YahooFinanceProvider::new() {
            Ok(yahoo) => registry.register(Box::new(yahoo)),
            Err(e) => tracing::warn!(error = %e, "Yahoo Finance provider unavailable"),
        }

        // Alpha Vantage, requires API key
        if let Some(key) = alphavantage_key.filter(|k| !k.trim().is_empty()) {
            registry.register(Box::new(AlphaVantageProvider::new(key)));
        }

        registry
    }

    /// Register a new price provider at the end of the chain.
    pub fn register(&mut self, provider: Box<dyn PriceProvider>) {
        self.providers.push(provider);
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Names of all registered providers, in priority order.
    pub fn provider_names(&self) -> Vec<String> {
        self.providers.iter().map(|p| p.name().to_string()).collect()
    }

    /// Providers able to serve `symbol`, in priority order.
    pub fn providers_for(&self, symbol: &str) -> Vec<&dyn PriceProvider> {
        self.providers
            .iter()
            .filter(|p| p.supports(symbol))
            .map(|p| p.as_ref())
            .collect()
    }
}

impl Default for PriceProviderRegistry {
    fn default() -> Self {
        Self::new()
    }
}
