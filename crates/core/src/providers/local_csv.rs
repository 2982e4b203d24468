use async_trait::async_trait;
use chrono::NaiveDate;
use std::path::{Path, PathBuf};

use super::traits::PriceProvider;
use crate::errors::CoreError;
use crate::models::price::PricePoint;

const PROVIDER: &str = "Local CSV";

/// Reads daily histories from a local archive of downloaded NSE quotes.
///
/// Layout: `<root>/<sector>/<SYMBOL>_NS.csv` or `_BO.csv` (files directly under `<root>`
/// are found too). Each file has a header row whose first column is `Price`
/// or `Date` and which contains a `Close` column; rows whose first column is
/// not a `YYYY-MM-DD` date (the extra `Ticker`/`Date` header rows) are skipped.
pub struct LocalCsvProvider {
    root: PathBuf,
}

impl LocalCsvProvider {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Archive file for a symbol, if one exists.
    ///
    /// `.BO` symbols look for a `_BO.csv` file first and fall back to the
    /// `_NS.csv` file of the same company.
    pub fn find_file(&self, symbol: &str) -> Option<PathBuf> {
        let names = Self::file_names(symbol);
        let found = names.iter().find_map(|name| self.locate(name));
        if let (Some(path), Some(preferred)) = (&found, names.first()) {
            if !path.ends_with(preferred) {
                tracing::debug!(symbol, file = %path.display(), "Using NSE archive for BSE symbol");
            }
        }
        found
    }

    fn locate(&self, file_name: &str) -> Option<PathBuf> {
        let direct = self.root.join(file_name);
        if direct.is_file() {
            return Some(direct);
        }

        let entries = std::fs::read_dir(&self.root).ok()?;
        let mut sectors: Vec<PathBuf> = entries
            .filter_map(Result::ok)
            .map(|e| e.path())
            .filter(|p| p.is_dir())
            .collect();
        sectors.sort();
        sectors
            .into_iter()
            .map(|dir| dir.join(file_name))
            .find(|candidate| candidate.is_file())
    }

    /// `HDFCBANK.NS` → `[HDFCBANK_NS.csv]`, `HDFCBANK.BO` →
    /// `[HDFCBANK_BO.csv, HDFCBANK_NS.csv]`. Indices have no archive file.
    fn file_names(symbol: &str) -> Vec<String> {
        let upper = symbol.trim().to_uppercase();
        if upper.is_empty() || upper.starts_with('^') {
            return Vec::new();
        }
        match upper.strip_suffix(".BO") {
            Some(base) => vec![format!("{base}_BO.csv"), format!("{base}_NS.csv")],
            None => {
                let base = upper.strip_suffix(".NS").unwrap_or(&upper);
                vec![format!("{base}_NS.csv")]
            }
        }
    }

    fn read_file(path: &Path) -> Result<Vec<PricePoint>, CoreError> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_path(path)?;

        let headers = reader.headers()?.clone();
        let close_idx = headers
            .iter()
            .position(|h| h.eq_ignore_ascii_case("close"))
            .ok_or_else(|| CoreError::MissingColumn {
                column: "Close".into(),
                file: path.display().to_string(),
            })?;

        let mut points = Vec::new();
        for record in reader.records() {
            let record = record?;
            let Some(date) = record.get(0).and_then(parse_date) else {
                continue;
            };
            let Some(price) = record
                .get(close_idx)
                .and_then(|v| v.parse::<f64>().ok())
                .filter(|p| p.is_finite())
            else {
                continue;
            };
            points.push(PricePoint { date, price });
        }
        Ok(points)
    }
}

/// Dates may carry a time and offset (`2024-01-02 00:00:00+05:30`); only the day matters.
fn parse_date(raw: &str) -> Option<NaiveDate> {
    let day = raw.get(..10)?;
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

#[async_trait]
impl PriceProvider for LocalCsvProvider {
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
        let path = self
            .find_file(symbol)
            .ok_or_else(|| CoreError::PriceNotAvailable {
                symbol: symbol.to_string(),
                from: from.to_string(),
                to: to.to_string(),
            })?;

        tracing::debug!(symbol, file = %path.display(), "Reading local price archive");
        let mut points: Vec<PricePoint> = Self::read_file(&path)?
            .into_iter()
            .filter(|p| p.date >= from && p.date <= to)
            .collect();
        points.sort_by_key(|p| p.date);
        Ok(points)
    }
}
