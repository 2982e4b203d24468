// ═══════════════════════════════════════════════════════════════════
// Provider Tests: Registry order, local CSV archive, Alpha Vantage
// ═══════════════════════════════════════════════════════════════════

use async_trait::async_trait;
use chrono::NaiveDate;
use std::path::Path;

use portfolio_benchmark_core::errors::CoreError;
use portfolio_benchmark_core::models::price::PricePoint;
use portfolio_benchmark_core::providers::alphavantage::AlphaVantageProvider;
use portfolio_benchmark_core::providers::local_csv::LocalCsvProvider;
use portfolio_benchmark_core::providers::registry::PriceProviderRegistry;
use portfolio_benchmark_core::providers::traits::PriceProvider;

// ═══════════════════════════════════════════════════════════════════
// Test Helpers
// ═══════════════════════════════════════════════════════════════════

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

/// A provider that only serves symbols with the given prefix.
struct PrefixProvider {
    name: String,
    prefix: String,
}

impl PrefixProvider {
    fn new(name: &str, prefix: &str) -> Self {
        Self {
            name: name.to_string(),
            prefix: prefix.to_string(),
        }
    }
}

#[async_trait]
impl PriceProvider for PrefixProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn supports(&self, symbol: &str) -> bool {
        symbol.starts_with(&self.prefix)
    }

    async fn get_price_range(
        &self,
        _symbol: &str,
        from: NaiveDate,
        _to: NaiveDate,
    ) -> Result<Vec<PricePoint>, CoreError> {
        Ok(vec![PricePoint {
            date: from,
            price: 1.0,
        }])
    }
}

/// Price file as written by yfinance: three header rows, then dated closes.
const YF_EXPORT: &str = "\
Price,Close,High,Low,Open,Volume
Ticker,INFY.NS,INFY.NS,INFY.NS,INFY.NS,INFY.NS
Date,,,,,
2024-01-02 00:00:00+05:30,1500.5,1510,1490,1495,100000
2024-01-03 00:00:00+05:30,1520.0,1525,1500,1501,120000
2024-02-01 00:00:00+05:30,1600.0,1610,1580,1590,90000
2024-02-02 00:00:00+05:30,nan,1610,1580,1590,90000
";

fn write_archive(root: &Path, sector: &str, symbol: &str, content: &str) {
    let dir = root.join(sector);
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join(format!("{symbol}_NS.csv")), content).unwrap();
}

// ═══════════════════════════════════════════════════════════════════
// Registry
// ═══════════════════════════════════════════════════════════════════

mod registry {
    use super::*;

    #[test]
    fn new_registry_is_empty() {
        let registry = PriceProviderRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.len(), 0);
        assert!(registry.providers_for("INFY.NS").is_empty());
    }

    #[test]
    fn keeps_registration_order() {
        let mut registry = PriceProviderRegistry::new();
        registry.register(Box::new(PrefixProvider::new("First", "")));
        registry.register(Box::new(PrefixProvider::new("Second", "")));
        assert_eq!(registry.provider_names(), vec!["First", "Second"]);
    }

    #[test]
    fn filters_by_supported_symbol() {
        let mut registry = PriceProviderRegistry::new();
        registry.register(Box::new(PrefixProvider::new("Indices", "^")));
        registry.register(Box::new(PrefixProvider::new("Everything", "")));

        let names = |symbol: &str| -> Vec<String> {
            registry
                .providers_for(symbol)
                .iter()
                .map(|p| p.name().to_string())
                .collect()
        };
        assert_eq!(names("^NSEI"), vec!["Indices", "Everything"]);
        assert_eq!(names("INFY.NS"), vec!["Everything"]);
    }

    #[test]
    fn default_chain_order() {
        let dir = tempfile::tempdir().unwrap();
        let registry = PriceProviderRegistry::new_with_defaults(
            Some(dir.path().to_path_buf()),
            Some("demo".to_string()),
        );
        let names = registry.provider_names();
        assert_eq!(names.first().map(String::as_str), Some("Local CSV"));
        assert_eq!(names.last().map(String::as_str), Some("Alpha Vantage"));

        // neither the archive nor Alpha Vantage carries indices
        let index_providers: Vec<String> = registry
            .providers_for("^NSEI")
            .iter()
            .map(|p| p.name().to_string())
            .collect();
        assert!(!index_providers.iter().any(|n| n == "Local CSV"));
        assert!(!index_providers.iter().any(|n| n == "Alpha Vantage"));
    }

    #[test]
    fn blank_alphavantage_key_is_ignored() {
        let registry = PriceProviderRegistry::new_with_defaults(None, Some("  ".to_string()));
        assert!(!registry.provider_names().iter().any(|n| n == "Alpha Vantage"));
        assert!(!registry.provider_names().iter().any(|n| n == "Local CSV"));
    }

    #[tokio::test]
    async fn default_probe_uses_price_range() {
        let provider = PrefixProvider::new("Any", "");
        assert!(provider.probe("X.NS", d(2024, 4, 1)).await.unwrap());
    }
}

// ═══════════════════════════════════════════════════════════════════
// Local CSV Archive
// ═══════════════════════════════════════════════════════════════════

mod local_csv {
    use super::*;

    #[test]
    fn finds_file_in_sector_directory() {
        let dir = tempfile::tempdir().unwrap();
        write_archive(dir.path(), "IT", "INFY", YF_EXPORT);
        let provider = LocalCsvProvider::new(dir.path());

        let found = provider.find_file("INFY.NS").unwrap();
        assert!(found.ends_with("IT/INFY_NS.csv"));
        // the exchange suffix does not matter
        assert_eq!(provider.find_file("infy.bo"), Some(found));
        assert_eq!(provider.find_file("TCS.NS"), None);
        assert_eq!(provider.find_file("^NSEI"), None);
    }

    #[test]
    fn bse_symbol_prefers_bse_file() {
        let dir = tempfile::tempdir().unwrap();
        write_archive(dir.path(), "IT", "INFY", YF_EXPORT);
        std::fs::write(dir.path().join("IT").join("INFY_BO.csv"), YF_EXPORT).unwrap();
        let provider = LocalCsvProvider::new(dir.path());

        assert!(provider.find_file("INFY.BO").unwrap().ends_with("IT/INFY_BO.csv"));
        assert!(provider.find_file("INFY.NS").unwrap().ends_with("IT/INFY_NS.csv"));
    }

    #[test]
    fn finds_file_directly_under_root() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("TCS_NS.csv"), YF_EXPORT).unwrap();
        let provider = LocalCsvProvider::new(dir.path());
        assert!(provider.find_file("TCS.NS").is_some());
    }

    #[tokio::test]
    async fn reads_closes_within_range() {
        let dir = tempfile::tempdir().unwrap();
        write_archive(dir.path(), "IT", "INFY", YF_EXPORT);
        let provider = LocalCsvProvider::new(dir.path());

        let points = provider
            .get_price_range("INFY.NS", d(2024, 1, 3), d(2024, 12, 31))
            .await
            .unwrap();
        // header rows and the NaN close are skipped
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].date, d(2024, 1, 3));
        assert_eq!(points[0].price, 1520.0);
        assert_eq!(points[1].date, d(2024, 2, 1));
    }

    #[tokio::test]
    async fn missing_file_is_price_not_available() {
        let dir = tempfile::tempdir().unwrap();
        let provider = LocalCsvProvider::new(dir.path());
        let err = provider
            .get_price_range("TCS.NS", d(2024, 1, 1), d(2024, 1, 31))
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::PriceNotAvailable { .. }));
    }

    #[tokio::test]
    async fn file_without_close_column() {
        let dir = tempfile::tempdir().unwrap();
        write_archive(dir.path(), "Auto", "TATAMOTORS", "Date,Open\n2024-01-02,900\n");
        let provider = LocalCsvProvider::new(dir.path());
        let err = provider
            .get_price_range("TATAMOTORS.NS", d(2024, 1, 1), d(2024, 1, 31))
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::MissingColumn { .. }));
    }

    #[test]
    fn indices_are_not_supported() {
        let provider = LocalCsvProvider::new("/nonexistent");
        assert!(!provider.supports("^NSEI"));
        assert!(provider.supports("INFY.NS"));
    }
}

// ═══════════════════════════════════════════════════════════════════
// Alpha Vantage
// ═══════════════════════════════════════════════════════════════════

mod alphavantage {
    use super::*;

    #[test]
    fn skips_indices() {
        let provider = AlphaVantageProvider::new("demo".to_string());
        assert_eq!(provider.name(), "Alpha Vantage");
        assert!(!provider.supports("^NSEI"));
        assert!(provider.supports("INFY.NS"));
    }

    #[tokio::test]
    async fn request_errors_hide_the_api_key() {
        // nothing listens on the discard port
        let provider =
            AlphaVantageProvider::with_base_url("secret".to_string(), "http://127.0.0.1:9/query");
        let err = provider
            .get_price_range("INFY.NS", d(2024, 1, 1), d(2024, 3, 31))
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::Network(_) | CoreError::Api { .. }));
        assert!(!err.to_string().contains("secret"));
    }
}
