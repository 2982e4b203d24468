//! Security name → market symbol resolution.
//!
//! Stages, in order: curated overrides, exact listing match, first-word
//! symbol match, fuzzy listing match, then heuristic guesses confirmed by a
//! live price probe. Bonds, preference shares and fund units never resolve.

pub mod heuristics;
pub mod listing;
pub mod normalize;
pub mod overrides;
pub mod similarity;

use std::time::Duration;

use crate::errors::CoreError;
use crate::models::settings::AnalysisSettings;
use crate::models::ticker::{MatchSource, ResolutionReport, TickerMatch};
use crate::services::price_service::PriceService;

use self::listing::ListingIndex;
use self::normalize::{clean_security_name, is_non_equity};
use self::overrides::OverrideTable;

/// Confidence reported for a probed guess: the symbol trades, but nothing ties it to the name.
const HEURISTIC_SCORE: f64 = 0.5;

pub struct TickerResolver {
    overrides: OverrideTable,
    listing: ListingIndex,
    settings: AnalysisSettings,
}

impl TickerResolver {
    pub fn new(overrides: OverrideTable, listing: ListingIndex, settings: AnalysisSettings) -> Self {
        Self {
            overrides,
            listing,
            settings,
        }
    }

    pub fn overrides(&self) -> &OverrideTable {
        &self.overrides
    }

    pub fn listing(&self) -> &ListingIndex {
        &self.listing
    }

    /// Resolve a single name. The heuristic stage only runs when a price
    /// service is supplied to probe the guesses.
    pub async fn resolve(
        &self,
        security_name: &str,
        prices: Option<&PriceService>,
    ) -> Result<TickerMatch, CoreError> {
        let name = security_name.trim();
        if name.is_empty() || is_non_equity(name) {
            return Err(CoreError::TickerNotFound(security_name.to_string()));
        }

        if let Some(symbol) = self.overrides.lookup(name) {
            return Ok(self.matched(security_name, symbol, MatchSource::Override, 1.0));
        }

        if let Some(hit) = self.listing.find(
            name,
            self.settings.fuzzy_threshold,
            self.settings.symbol_match_score,
        ) {
            return Ok(self.matched(security_name, &hit.symbol, hit.source, hit.score));
        }

        if let Some(prices) = prices {
            if let Some(symbol) = self.probe_candidates(name, prices).await {
                return Ok(TickerMatch {
                    security_name: security_name.to_string(),
                    symbol,
                    source: MatchSource::Heuristic,
                    score: HEURISTIC_SCORE,
                });
            }
        }

        Err(CoreError::TickerNotFound(security_name.to_string()))
    }

    /// Resolve every name; failures end up in `ResolutionReport::failed`.
    pub async fn resolve_all(
        &self,
        security_names: &[String],
        prices: Option<&PriceService>,
    ) -> ResolutionReport {
        tracing::info!(
            securities = security_names.len(),
            overrides = self.overrides.len(),
            listed = self.listing.len(),
            "Resolving tickers"
        );

        let mut report = ResolutionReport::default();
        for name in security_names {
            match self.resolve(name, prices).await {
                Ok(ticker) => {
                    tracing::debug!(
                        security = %name,
                        symbol = %ticker.symbol,
                        source = %ticker.source,
                        score = ticker.score,
                        "Resolved"
                    );
                    report.resolved.push(ticker);
                }
                Err(_) => {
                    tracing::debug!(security = %name, "Unresolved");
                    report.failed.push(name.clone());
                }
            }
        }

        tracing::info!(
            resolved = report.resolved.len(),
            failed = report.failed.len(),
            success_pct = report.success_ratio() * 100.0,
            "Ticker resolution finished"
        );
        report
    }

    async fn probe_candidates(&self, name: &str, prices: &PriceService) -> Option<String> {
        let base = clean_security_name(name);
        let candidates = heuristics::candidate_symbols(&base, &self.settings.exchange_suffixes);
        let delay = Duration::from_millis(self.settings.probe_delay_ms);

        for (idx, candidate) in candidates
            .into_iter()
            .take(self.settings.max_probe_candidates)
            .enumerate()
        {
            if idx > 0 && !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            if prices.probe(&candidate, self.settings.start_date).await {
                tracing::debug!(security = name, symbol = %candidate, "Heuristic guess confirmed");
                return Some(candidate);
            }
        }
        None
    }

    fn matched(&self, security_name: &str, symbol: &str, source: MatchSource, score: f64) -> TickerMatch {
        TickerMatch {
            security_name: security_name.to_string(),
            symbol: self.settings.market_symbol(symbol),
            source,
            score,
        }
    }
}
