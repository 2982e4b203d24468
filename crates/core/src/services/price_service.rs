use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::time::Duration;

use crate::errors::CoreError;
use crate::models::price::{FetchFailure, FetchReport, PricePoint, PriceSeries};
use crate::models::settings::Benchmark;
use crate::models::ticker::TickerMatch;
use crate::providers::registry::PriceProviderRegistry;

/// Fetches closing prices from the provider chain.
///
/// Every request walks the registry in order and falls back to the next
/// provider when one fails or returns no usable points. Returned prices are
/// validated: non-finite or negative closes are dropped.
pub struct PriceService {
    registry: PriceProviderRegistry,
    fetch_delay: Duration,
}

impl PriceService {
    pub fn new(registry: PriceProviderRegistry) -> Self {
        Self {
            registry,
            fetch_delay: Duration::ZERO,
        }
    }

    /// Pause between consecutive symbols in the batch fetches.
    pub fn with_fetch_delay(mut self, delay: Duration) -> Self {
        self.fetch_delay = delay;
        self
    }

    /// Names of the registered providers, in priority order.
    pub fn provider_names(&self) -> Vec<String> {
        self.registry.provider_names()
    }

    /// Raw closes for `symbol` between `from` and `to`, from the first provider that has any.
    pub async fn fetch_range(
        &self,
        symbol: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<PriceSeries, CoreError> {
        let providers = self.registry.providers_for(symbol);
        if providers.is_empty() {
            return Err(CoreError::NoProvider);
        }

        let mut last_error = None;
        for provider in &providers {
            match provider.get_price_range(symbol, from, to).await {
                Ok(points) => {
                    let points = Self::validate(provider.name(), symbol, points);
                    if !points.is_empty() {
                        tracing::debug!(
                            symbol,
                            provider = provider.name(),
                            points = points.len(),
                            "Fetched price range"
                        );
                        return Ok(PriceSeries::new(points));
                    }
                }
                Err(e) => {
                    tracing::debug!(symbol, provider = provider.name(), error = %e, "Provider failed");
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| CoreError::PriceNotAvailable {
            symbol: symbol.to_string(),
            from: from.to_string(),
            to: to.to_string(),
        }))
    }

    /// Month-end closes for `symbol` between `from` and `to`.
    pub async fn fetch_monthly(
        &self,
        symbol: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<PriceSeries, CoreError> {
        Ok(self.fetch_range(symbol, from, to).await?.monthly_closes())
    }

    /// Monthly series for every resolved security, keyed by security name.
    ///
    /// Failures are collected instead of aborting the batch.
    pub async fn fetch_all(
        &self,
        matches: &[TickerMatch],
        from: NaiveDate,
        to: NaiveDate,
    ) -> FetchReport {
        tracing::info!(securities = matches.len(), %from, %to, "Fetching monthly prices");

        let mut report = FetchReport::default();
        for (idx, ticker) in matches.iter().enumerate() {
            if idx > 0 {
                self.pause().await;
            }
            match self.fetch_monthly(&ticker.symbol, from, to).await {
                Ok(series) => {
                    tracing::debug!(
                        security = %ticker.security_name,
                        symbol = %ticker.symbol,
                        months = series.len(),
                        "Prices loaded"
                    );
                    report.series.insert(ticker.security_name.clone(), series);
                }
                Err(e) => {
                    tracing::warn!(
                        security = %ticker.security_name,
                        symbol = %ticker.symbol,
                        error = %e,
                        "No prices for security"
                    );
                    report.failed.push(FetchFailure {
                        security_name: ticker.security_name.clone(),
                        symbol: ticker.symbol.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        tracing::info!(
            succeeded = report.succeeded(),
            failed = report.failed.len(),
            "Price fetch finished"
        );
        report
    }

    /// Monthly series per benchmark name. Benchmarks without data are left out.
    pub async fn fetch_benchmarks(
        &self,
        benchmarks: &[Benchmark],
        from: NaiveDate,
        to: NaiveDate,
    ) -> BTreeMap<String, PriceSeries> {
        let mut out = BTreeMap::new();
        for (idx, benchmark) in benchmarks.iter().enumerate() {
            if idx > 0 {
                self.pause().await;
            }
            match self.fetch_monthly(&benchmark.symbol, from, to).await {
                Ok(series) => {
                    out.insert(benchmark.name.clone(), series);
                }
                Err(e) => tracing::warn!(
                    benchmark = %benchmark.name,
                    symbol = %benchmark.symbol,
                    error = %e,
                    "Benchmark data unavailable"
                ),
            }
        }
        out
    }

    /// Whether any provider has a quote for `symbol` shortly after `since`.
    pub async fn probe(&self, symbol: &str, since: NaiveDate) -> bool {
        for provider in self.registry.providers_for(symbol) {
            match provider.probe(symbol, since).await {
                Ok(true) => return true,
                Ok(false) => {}
                Err(e) => {
                    tracing::debug!(symbol, provider = provider.name(), error = %e, "Probe failed")
                }
            }
        }
        false
    }

    async fn pause(&self) {
        if !self.fetch_delay.is_zero() {
            tokio::time::sleep(self.fetch_delay).await;
        }
    }

    /// Drop closes that are NaN, infinite or negative.
    fn validate(provider: &str, symbol: &str, points: Vec<PricePoint>) -> Vec<PricePoint> {
        let total = points.len();
        let valid: Vec<PricePoint> = points
            .into_iter()
            .filter(|p| p.price.is_finite() && p.price >= 0.0)
            .collect();
        if valid.len() < total {
            tracing::warn!(
                symbol,
                provider,
                dropped = total - valid.len(),
                "Discarded invalid prices"
            );
        }
        valid
    }
}
