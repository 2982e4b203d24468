use async_trait::async_trait;
use chrono::{Duration, NaiveDate};

use crate::errors::CoreError;
use crate::models::price::PricePoint;

/// How far past `since` a probe looks for quotes.
const PROBE_WINDOW_DAYS: i64 = 31;

/// Abstraction over every source of historical closing prices.
///
/// Yahoo Finance, Alpha Vantage and the local CSV archive each implement it;
/// the registry tries them in order, so replacing one source touches only its
/// own implementation.
#[async_trait]
pub trait PriceProvider: Send + Sync {
    /// Human-readable name of this provider (for logs/errors).
    fn name(&self) -> &str;

    /// Whether this provider can serve `symbol` at all (e.g. indices).
    fn supports(&self, _symbol: &str) -> bool {
        true
    }

    /// Closing prices between `from` and `to`, both inclusive, sorted by date.
    /// Granularity is whatever the source offers (daily or monthly).
    async fn get_price_range(
        &self,
        symbol: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<PricePoint>, CoreError>;

    /// Cheap existence check: does the symbol have any quote in the month after `since`?
    async fn probe(&self, symbol: &str, since: NaiveDate) -> Result<bool, CoreError> {
        let points = self
            .get_price_range(symbol, since, since + Duration::days(PROBE_WINDOW_DAYS))
            .await?;
        Ok(!points.is_empty())
    }
}
