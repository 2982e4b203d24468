use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

use super::traits::PriceProvider;
use crate::errors::CoreError;
use crate::models::price::PricePoint;

const BASE_URL: &str = "https://www.alphavantage.co/query";
const PROVIDER: &str = "Alpha Vantage";

/// Alpha Vantage provider, used as the fallback for listed equities.
///
/// - **Free tier**: 25 requests/day (across ALL endpoints).
/// - **Requires**: API key (`ALPHAVANTAGE_API_KEY` or config).
/// - **Coverage**: BSE-listed Indian equities as `SYMBOL.BSE`; no NSE indices.
/// - **Data**: full monthly series in one request (`TIME_SERIES_MONTHLY`).
pub struct AlphaVantageProvider {
    client: Client,
    api_key: String,
    base_url: String,
}

impl AlphaVantageProvider {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, BASE_URL)
    }

    /// Point the provider at a different endpoint (proxies, test servers).
    pub fn with_base_url(api_key: String, base_url: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| Client::new());
        Self {
            client,
            api_key,
            base_url: base_url.into(),
        }
    }

    /// Alpha Vantage names Indian listings `SYMBOL.BSE`; Yahoo-style
    /// `.NS` / `.BO` suffixes are rewritten to that.
    pub fn vendor_symbol(symbol: &str) -> String {
        let upper = symbol.trim().to_uppercase();
        match upper.rsplit_once('.') {
            Some((base, "NS" | "BO")) => format!("{base}.BSE"),
            _ => upper,
        }
    }
}

// ── Alpha Vantage API response types ────────────────────────────────

#[derive(Deserialize)]
struct MonthlySeriesResponse {
    #[serde(rename = "Monthly Time Series")]
    time_series: Option<HashMap<String, MonthlyData>>,

    #[serde(rename = "Note")]
    note: Option<String>,

    #[serde(rename = "Error Message")]
    error_message: Option<String>,
}

#[derive(Deserialize)]
struct MonthlyData {
    #[serde(rename = "4. close")]
    close: String,
}

#[async_trait]
impl PriceProvider for AlphaVantageProvider {
    fn name(&self) -> &str {
        PROVIDER
    }

    fn supports(&self, symbol: &str) -> bool {
        !symbol.starts_with('^')
    }

    async fn get_price_range(
        &self,
        symbol: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<PricePoint>, CoreError> {
        let time_series = self.fetch_monthly_series(symbol).await?;

        let mut points: Vec<PricePoint> = time_series
            .iter()
            .filter_map(|(date_str, data)| {
                let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d").ok()?;
                if date >= from && date <= to {
                    let price: f64 = data.close.parse().ok()?;
                    Some(PricePoint { date, price })
                } else {
                    None
                }
            })
            .collect();

        points.sort_by_key(|p| p.date);
        Ok(points)
    }
}

impl AlphaVantageProvider {
    async fn fetch_monthly_series(
        &self,
        symbol: &str,
    ) -> Result<HashMap<String, MonthlyData>, CoreError> {
        let vendor_symbol = Self::vendor_symbol(symbol);
        let resp: MonthlySeriesResponse = self
            .client
            .get(&self.base_url)
            .query(&[
                ("function", "TIME_SERIES_MONTHLY"),
                ("symbol", vendor_symbol.as_str()),
                ("apikey", self.api_key.as_str()),
            ])
            .send()
            .await?
            .json()
            .await
            .map_err(|e| CoreError::Api {
                provider: PROVIDER.into(),
                message: format!(
                    "Failed to parse monthly series for {vendor_symbol}: {}",
                    e.without_url()
                ),
            })?;

        if let Some(message) = resp.error_message.or(resp.note) {
            return Err(CoreError::Api {
                provider: PROVIDER.into(),
                message: format!("{vendor_symbol}: {message}"),
            });
        }

        resp.time_series.ok_or_else(|| CoreError::Api {
            provider: PROVIDER.into(),
            message: format!("No time series data for {vendor_symbol}. API limit may be exceeded."),
        })
    }
}
