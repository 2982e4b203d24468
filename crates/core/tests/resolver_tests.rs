// ═══════════════════════════════════════════════════════════════════
// Resolver Tests: overrides, listing stages, non-equity filter,
// heuristic probes through the price service
// ═══════════════════════════════════════════════════════════════════

use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use portfolio_benchmark_core::errors::CoreError;
use portfolio_benchmark_core::models::price::PricePoint;
use portfolio_benchmark_core::models::settings::AnalysisSettings;
use portfolio_benchmark_core::models::ticker::{ListingEntry, MatchSource};
use portfolio_benchmark_core::providers::registry::PriceProviderRegistry;
use portfolio_benchmark_core::providers::traits::PriceProvider;
use portfolio_benchmark_core::resolver::listing::ListingIndex;
use portfolio_benchmark_core::resolver::normalize::{
    aggressive_clean, clean_company_name, clean_security_name, is_non_equity,
};
use portfolio_benchmark_core::resolver::overrides::OverrideTable;
use portfolio_benchmark_core::resolver::similarity::ratio;
use portfolio_benchmark_core::resolver::TickerResolver;
use portfolio_benchmark_core::services::price_service::PriceService;

// ═══════════════════════════════════════════════════════════════════
// Test Helpers
// ═══════════════════════════════════════════════════════════════════

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

/// Answers only for the symbols it was given and counts every request.
struct ProbeProvider {
    known: HashMap<String, Vec<PricePoint>>,
    calls: Arc<AtomicUsize>,
}

impl ProbeProvider {
    fn new(symbols: &[&str], calls: Arc<AtomicUsize>) -> Self {
        let known = symbols
            .iter()
            .map(|s| {
                (
                    s.to_string(),
                    vec![PricePoint {
                        date: d(2024, 4, 5),
                        price: 42.0,
                    }],
                )
            })
            .collect();
        Self { known, calls }
    }
}

#[async_trait]
impl PriceProvider for ProbeProvider {
    fn name(&self) -> &str {
        "Probe"
    }

    async fn get_price_range(
        &self,
        symbol: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<PricePoint>, CoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.known.get(symbol) {
            Some(points) => Ok(points
                .iter()
                .filter(|p| p.date >= from && p.date <= to)
                .cloned()
                .collect()),
            None => Err(CoreError::Api {
                provider: "Probe".into(),
                message: format!("unknown symbol {symbol}"),
            }),
        }
    }
}

fn settings() -> AnalysisSettings {
    AnalysisSettings {
        start_date: d(2024, 4, 1),
        probe_delay_ms: 0,
        fetch_delay_ms: 0,
        ..AnalysisSettings::default()
    }
}

fn listing() -> Vec<ListingEntry> {
    vec![
        ListingEntry::new("TATAMOTORS", "Tata Motors Limited"),
        ListingEntry::new("WIPRO", "Wipro Limited"),
        ListingEntry::new("KPITTECH", "KPIT Technologies Limited"),
        ListingEntry::new("ZOMATO", "Zomato Limited"),
    ]
}

fn resolver(overrides: OverrideTable) -> TickerResolver {
    TickerResolver::new(overrides, ListingIndex::new(listing()), settings())
}

fn price_service(symbols: &[&str]) -> (PriceService, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let mut registry = PriceProviderRegistry::new();
    registry.register(Box::new(ProbeProvider::new(symbols, calls.clone())));
    (PriceService::new(registry), calls)
}

// ═══════════════════════════════════════════════════════════════════
// Normalization
// ═══════════════════════════════════════════════════════════════════

mod normalization {
    use super::*;

    #[test]
    fn security_name_drops_equity_marker_but_keeps_legal_suffix() {
        assert_eq!(clean_security_name("  infosys limited eq "), "INFOSYS LIMITED");
    }

    #[test]
    fn company_name_drops_legal_suffix_and_punctuation() {
        assert_eq!(clean_company_name("Dr. Reddy's Laboratories Ltd."), "DR REDDY S LABORATORIES");
        assert_eq!(clean_company_name("Tata Motors Limited"), "TATA MOTORS");
    }

    #[test]
    fn aggressive_clean_keeps_letters_only() {
        assert_eq!(aggressive_clean("Wipro Ltd 2/-"), "WIPRO");
    }

    #[test]
    fn non_equity_names() {
        assert!(is_non_equity("HDFC BANK BD 7.5% 2030"));
        assert!(is_non_equity("ABC Preference Shares"));
        assert!(is_non_equity("Nippon India ETF Nifty Bees"));
        assert!(is_non_equity("SBI Mutual Fund Units"));
        assert!(!is_non_equity("Bajaj Finance Limited"));
        // "BD" inside a word is not a bond marker
        assert!(!is_non_equity("ABDUL TRADERS LIMITED"));
    }
}

// ═══════════════════════════════════════════════════════════════════
// Similarity
// ═══════════════════════════════════════════════════════════════════

mod similarity {
    use super::*;

    #[test]
    fn identical_and_empty_strings() {
        assert_eq!(ratio("WIPRO", "WIPRO"), 1.0);
        assert_eq!(ratio("", ""), 1.0);
        assert_eq!(ratio("ABC", ""), 0.0);
    }

    #[test]
    fn disjoint_strings_score_zero() {
        assert_eq!(ratio("ABC", "XYZ"), 0.0);
    }

    #[test]
    fn partial_overlap() {
        // matching blocks "KPIT TECHNOLOG" = 14 chars of 15 + 17
        let score = ratio("KPIT TECHNOLOGY", "KPIT TECHNOLOGIES");
        assert!((score - 28.0 / 32.0).abs() < 1e-12);
    }
}

// ═══════════════════════════════════════════════════════════════════
// Override Table
// ═══════════════════════════════════════════════════════════════════

mod override_table {
    use super::*;

    #[test]
    fn defaults_are_loaded() {
        let table = OverrideTable::with_defaults();
        assert!(!table.is_empty());
        assert_eq!(table.lookup("Infosys Limited"), Some("INFY"));
    }

    #[test]
    fn lookup_ignores_case_and_equity_marker() {
        let table = OverrideTable::with_defaults();
        assert_eq!(table.lookup("infosys limited eq"), Some("INFY"));
    }

    #[test]
    fn later_entries_replace_earlier_ones() {
        let mut table = OverrideTable::with_defaults();
        table.extend([("Infosys Limited", "infy-new")]);
        assert_eq!(table.lookup("INFOSYS LIMITED"), Some("INFY-NEW"));
    }

    #[test]
    fn empty_symbol_is_ignored() {
        let mut table = OverrideTable::new();
        table.insert("Some Company", "  ");
        assert!(table.is_empty());
        assert_eq!(table.lookup("Some Company"), None);
    }
}

// ═══════════════════════════════════════════════════════════════════
// Listing Index
// ═══════════════════════════════════════════════════════════════════

mod listing_index {
    use super::*;

    #[test]
    fn exact_match_on_cleaned_name() {
        let index = ListingIndex::new(listing());
        let hit = index.find("TATA MOTORS LTD", 0.8, 0.95).unwrap();
        assert_eq!(hit.symbol, "TATAMOTORS");
        assert_eq!(hit.source, MatchSource::Exact);
        assert_eq!(hit.score, 1.0);
    }

    #[test]
    fn first_word_matches_listed_symbol() {
        let index = ListingIndex::new(listing());
        let hit = index.find("WIPRO LTD EQ", 0.8, 0.95).unwrap();
        assert_eq!(hit.symbol, "WIPRO");
        assert_eq!(hit.source, MatchSource::Symbol);
        assert_eq!(hit.score, 0.95);
    }

    #[test]
    fn fuzzy_match_above_threshold() {
        let index = ListingIndex::new(listing());
        let hit = index.find("KPIT Technology Limited", 0.8, 0.95).unwrap();
        assert_eq!(hit.symbol, "KPITTECH");
        assert_eq!(hit.source, MatchSource::Fuzzy);
        assert!(hit.score >= 0.8 && hit.score < 1.0);
    }

    #[test]
    fn fuzzy_match_below_threshold_is_rejected() {
        let index = ListingIndex::new(listing());
        assert!(index.find("KPIT Technology Limited", 0.95, 0.95).is_none());
        assert!(index.find("Completely Unrelated Name", 0.8, 0.95).is_none());
    }

    #[test]
    fn first_word_matches_lowercase_listed_symbol() {
        let index = ListingIndex::new(vec![ListingEntry {
            symbol: "wipro".into(),
            company_name: "Wipro Enterprises".into(),
        }]);
        let hit = index.find("WIPRO LTD EQ", 0.99, 0.95).unwrap();
        assert_eq!(hit.symbol, "wipro");
        assert_eq!(hit.source, MatchSource::Symbol);
    }

    #[test]
    fn symbols_are_case_insensitive() {
        let index = ListingIndex::new(listing());
        assert_eq!(index.len(), 4);
        assert!(index.contains_symbol("zomato"));
        assert!(!index.contains_symbol("INFY"));
    }

    #[test]
    fn empty_index_finds_nothing() {
        let index = ListingIndex::new(Vec::new());
        assert!(index.is_empty());
        assert!(index.find("Wipro Limited", 0.0, 0.95).is_none());
    }
}

// ═══════════════════════════════════════════════════════════════════
// Ticker Resolver
// ═══════════════════════════════════════════════════════════════════

mod ticker_resolver {
    use super::*;

    #[tokio::test]
    async fn override_wins_over_listing() {
        let mut overrides = OverrideTable::new();
        overrides.insert("Wipro Limited", "WIPRO-X");
        let resolved = resolver(overrides).resolve("Wipro Limited", None).await.unwrap();
        assert_eq!(resolved.symbol, "WIPRO-X.NS");
        assert_eq!(resolved.source, MatchSource::Override);
        assert_eq!(resolved.score, 1.0);
    }

    #[tokio::test]
    async fn listing_symbol_gets_market_suffix() {
        let resolved = resolver(OverrideTable::new())
            .resolve("Zomato Ltd", None)
            .await
            .unwrap();
        assert_eq!(resolved.symbol, "ZOMATO.NS");
        assert_eq!(resolved.security_name, "Zomato Ltd");
    }

    #[tokio::test]
    async fn non_equity_never_resolves() {
        let mut overrides = OverrideTable::new();
        overrides.insert("TATA MOTORS BD 2030", "TATAMOTORS");
        let err = resolver(overrides)
            .resolve("TATA MOTORS BD 2030", None)
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::TickerNotFound(_)));
    }

    #[tokio::test]
    async fn empty_name_is_not_found() {
        let err = resolver(OverrideTable::new()).resolve("   ", None).await.unwrap_err();
        assert!(matches!(err, CoreError::TickerNotFound(_)));
    }

    #[tokio::test]
    async fn heuristics_need_a_price_service() {
        let result = resolver(OverrideTable::new())
            .resolve("Acme Widgets Limited", None)
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn heuristic_guess_confirmed_by_probe() {
        let (prices, calls) = price_service(&["ACME.BO"]);
        let resolved = resolver(OverrideTable::new())
            .resolve("Acme Widgets Limited", Some(&prices))
            .await
            .unwrap();
        assert_eq!(resolved.symbol, "ACME.BO");
        assert_eq!(resolved.source, MatchSource::Heuristic);
        assert_eq!(resolved.score, 0.5);
        // ACME.NS failed first
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn probes_stop_at_candidate_limit() {
        let (prices, calls) = price_service(&["ACMEWIDGETS.BO"]);
        let result = resolver(OverrideTable::new())
            .resolve("Acme Widgets Limited", Some(&prices))
            .await;
        // ACMEWIDGETS.BO is the fourth guess, past the default limit of three
        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn resolve_all_splits_resolved_and_failed() {
        let names: Vec<String> = ["Tata Motors Limited", "Unlisted Thing Pvt", "HDFC BANK BD 2030"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let report = resolver(OverrideTable::new()).resolve_all(&names, None).await;

        assert_eq!(report.total(), 3);
        assert_eq!(report.resolved.len(), 1);
        assert_eq!(report.failed, vec!["Unlisted Thing Pvt", "HDFC BANK BD 2030"]);
        assert_eq!(report.symbol_for("Tata Motors Limited"), Some("TATAMOTORS.NS"));
        assert_eq!(report.count_by_source(MatchSource::Exact), 1);
        assert!((report.success_ratio() - 1.0 / 3.0).abs() < 1e-12);
    }
}
