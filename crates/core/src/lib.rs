pub mod errors;
pub mod loaders;
pub mod models;
pub mod providers;
pub mod resolver;
pub mod services;

use chrono::NaiveDate;
use std::path::{Path, PathBuf};
use std::time::Duration;

use errors::CoreError;
use models::{
    analytics::{
        AnalysisInputs, AnalysisOutcome, FinalReturn, FundLine, FundSimulation, MonthlyTable,
        NamedSeries,
    },
    chart::ChartKind,
    holding::unique_security_names,
    settings::AnalysisSettings,
    ticker::{ListingEntry, ResolutionReport},
    valuation::ValueSeries,
};
use providers::registry::PriceProviderRegistry;
use resolver::{listing::ListingIndex, overrides::OverrideTable, TickerResolver};
use services::{
    chart_service::ChartService, fund_service::FundService,
    performance_service::PerformanceService, price_service::PriceService,
    report_service::ReportService, valuation_service::ValuationService,
};

/// Chart label of the summed portfolio of all investors.
pub const COMBINED_PORTFOLIO: &str = "Investor Portfolio";

/// Main entry point of the library: resolves tickers, fetches prices and
/// compares investor portfolios against benchmarks and model funds.
#[must_use]
pub struct BenchmarkAnalysis {
    settings: AnalysisSettings,
    resolver: TickerResolver,
    price_service: PriceService,
    valuation_service: ValuationService,
    fund_service: FundService,
    performance_service: PerformanceService,
    chart_service: ChartService,
}

impl std::fmt::Debug for BenchmarkAnalysis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BenchmarkAnalysis")
            .field("start_date", &self.settings.start_date)
            .field("providers", &self.price_service.provider_names())
            .field("overrides", &self.resolver.overrides().len())
            .field("listed", &self.resolver.listing().len())
            .finish()
    }
}

impl BenchmarkAnalysis {
    /// Validate the settings and wire up the services.
    pub fn new(
        settings: AnalysisSettings,
        registry: PriceProviderRegistry,
        overrides: OverrideTable,
        listing: Vec<ListingEntry>,
    ) -> Result<Self, CoreError> {
        settings.validate()?;
        if registry.is_empty() {
            return Err(CoreError::NoProvider);
        }

        let price_service = PriceService::new(registry)
            .with_fetch_delay(Duration::from_millis(settings.fetch_delay_ms));
        let resolver = TickerResolver::new(overrides, ListingIndex::new(listing), settings.clone());

        Ok(Self {
            performance_service: PerformanceService::new(settings.stale_price_days),
            settings,
            resolver,
            price_service,
            valuation_service: ValuationService::new(),
            fund_service: FundService::new(),
            chart_service: ChartService::new(),
        })
    }

    pub fn settings(&self) -> &AnalysisSettings {
        &self.settings
    }

    pub fn resolver(&self) -> &TickerResolver {
        &self.resolver
    }

    pub fn price_service(&self) -> &PriceService {
        &self.price_service
    }

    /// Last day of the analysis window: the configured end date or today.
    pub fn end_date(&self) -> NaiveDate {
        self.settings
            .end_date
            .unwrap_or_else(|| chrono::Utc::now().date_naive())
    }

    /// Map security names to symbols. Heuristic guesses are only tried when
    /// `probe` is set, since they need live price requests.
    pub async fn resolve(&self, security_names: &[String], probe: bool) -> ResolutionReport {
        let prices = probe.then_some(&self.price_service);
        self.resolver.resolve_all(security_names, prices).await
    }

    /// Run the whole pipeline: resolve, fetch, value, compare, chart.
    ///
    /// Fails only when no security yields any price data; every other
    /// shortfall (unresolved names, missing prices, missing benchmarks)
    /// degrades the result instead.
    pub async fn run(&self, inputs: &AnalysisInputs) -> Result<AnalysisOutcome, CoreError> {
        let start = self.settings.start_date;
        let end = self.end_date();
        tracing::info!(%start, %end, holdings = inputs.holdings.len(), funds = inputs.funds.len(), "Starting analysis");

        // 1. Resolve holdings and fund constituents together
        let mut names = unique_security_names(&inputs.holdings);
        for fund in &inputs.funds {
            for name in fund.security_names() {
                if !names.iter().any(|n| n == name) {
                    names.push(name.to_string());
                }
            }
        }
        let resolution = self.resolve(&names, true).await;

        // 2. Monthly prices
        let fetch = self
            .price_service
            .fetch_all(&resolution.resolved, start, end)
            .await;
        if fetch.series.is_empty() {
            return Err(CoreError::NoPriceData);
        }
        let prices = &fetch.series;
        let grid = self.valuation_service.date_grid(prices.values());

        // 3. Portfolio values
        let investor_values: Vec<NamedSeries> = self
            .valuation_service
            .value_all(&inputs.holdings, prices, &grid)
            .into_iter()
            .map(|(name, series)| NamedSeries::new(name, series))
            .collect();
        let combined_returns = self
            .valuation_service
            .combined(investor_values.iter().map(|v| &v.series))
            .returns_from_start();
        let coverage = self.valuation_service.coverage(&inputs.holdings, prices);

        // 4. Funds and benchmarks on the same grid
        let fund_returns: Vec<FundLine> = inputs
            .funds
            .iter()
            .map(|fund| match self.fund_service.cumulative_returns(fund, prices, &grid) {
                Some(r) => FundLine {
                    name: r.name,
                    returns: r.returns,
                    coverage_pct: r.coverage * 100.0,
                },
                None => FundLine {
                    name: fund.name.clone(),
                    returns: ValueSeries::constant(&grid, 0.0),
                    coverage_pct: 0.0,
                },
            })
            .collect();

        let benchmark_prices = self
            .price_service
            .fetch_benchmarks(&self.settings.benchmarks, start, end)
            .await;
        let benchmark_returns: Vec<NamedSeries> = self
            .settings
            .benchmarks
            .iter()
            .map(|b| {
                let series = match benchmark_prices.get(&b.name) {
                    Some(p) => self.performance_service.benchmark_returns(p, &grid),
                    None => ValueSeries::constant(&grid, 0.0),
                };
                NamedSeries::new(b.name.clone(), series)
            })
            .collect();

        // 5. Investment values and monthly analytics
        let investments = self
            .performance_service
            .investment_values(&inputs.holdings, prices, start);
        let investor_investments = self.performance_service.investor_investments(&investments);

        // Each model fund bought with what the investors put in at the start
        let total_investment = investor_investments
            .iter()
            .fold(0.0, |acc, i| acc + i.investment_value);
        let fund_simulations: Vec<FundSimulation> = if total_investment > 0.0 {
            inputs
                .funds
                .iter()
                .map(|fund| {
                    let values = self
                        .fund_service
                        .simulate_portfolio(fund, prices, total_investment, start);
                    FundSimulation::new(fund.name.clone(), total_investment, values)
                })
                .collect()
        } else {
            tracing::warn!("No start-date investment to simulate model funds with");
            Vec::new()
        };

        let investor_monthly: Vec<MonthlyTable> = investor_values
            .iter()
            .map(|v| MonthlyTable {
                name: v.name.clone(),
                metrics: self.performance_service.monthly_metrics(&v.series, start),
            })
            .filter(|t| !t.metrics.is_empty())
            .collect();
        let benchmark_monthly: Vec<MonthlyTable> = benchmark_prices
            .iter()
            .map(|(name, series)| MonthlyTable {
                name: name.clone(),
                metrics: self
                    .performance_service
                    .monthly_metrics(&ValueSeries::from(series), start),
            })
            .filter(|t| !t.metrics.is_empty())
            .collect();
        let summaries = investor_monthly
            .iter()
            .map(|t| self.performance_service.summarize(&t.name, &t.metrics))
            .collect();
        let comparisons = self.performance_service.compare_with_benchmarks(
            &as_pairs(&investor_monthly),
            &as_pairs(&benchmark_monthly),
        );

        // 6. Final returns and chart
        let final_returns = final_returns(&combined_returns, &benchmark_returns, &fund_returns);
        let best_performer = final_returns
            .iter()
            .max_by(|a, b| a.return_pct.total_cmp(&b.return_pct))
            .cloned();
        if let Some(best) = &best_performer {
            tracing::info!(name = %best.name, return_pct = best.return_pct, "Best performer");
        }

        let investor_lines: Vec<(String, ValueSeries)> =
            std::iter::once((COMBINED_PORTFOLIO.to_string(), combined_returns.clone()))
                .chain(
                    investor_values
                        .iter()
                        .map(|v| (v.name.clone(), v.series.returns_from_start())),
                )
                .collect();
        let chart = self.chart_service.build_chart(
            &format!("Investment Comparison since {}", start.format("%B %Y")),
            &investor_lines,
            &benchmark_returns
                .iter()
                .map(|b| (b.name.clone(), b.series.clone()))
                .collect::<Vec<_>>(),
            &fund_returns
                .iter()
                .map(|f| (f.name.clone(), f.returns.clone()))
                .collect::<Vec<_>>(),
        );

        Ok(AnalysisOutcome {
            start_date: start,
            end_date: end,
            resolution,
            fetch_failures: fetch.failed.clone(),
            grid,
            investor_values,
            combined_returns,
            fund_returns,
            fund_simulations,
            benchmark_returns,
            coverage,
            investments,
            investor_investments,
            investor_monthly,
            benchmark_monthly,
            summaries,
            comparisons,
            final_returns,
            best_performer,
            chart,
        })
    }

    /// Write the reports and the chart page into `output_dir`.
    /// Returns the paths written.
    pub fn write_reports(
        &self,
        outcome: &AnalysisOutcome,
        output_dir: &Path,
    ) -> Result<Vec<PathBuf>, CoreError> {
        let reports = ReportService::new(output_dir);
        let monthly: Vec<(String, Vec<_>)> = as_pairs(&outcome.investor_monthly)
            .into_iter()
            .chain(as_pairs(&outcome.benchmark_monthly))
            .collect();

        let html = self.chart_service.render_html(&outcome.chart)?;
        Ok(vec![
            reports.write_successful_tickers(&outcome.resolution)?,
            reports.write_failed_tickers(&outcome.resolution)?,
            reports.write_fetch_failures(&outcome.fetch_failures)?,
            reports.write_coverage(&outcome.coverage)?,
            reports.write_investor_summary(&outcome.investor_investments)?,
            reports.write_monthly_performance(&monthly)?,
            reports.write_benchmark_comparison(&outcome.comparisons)?,
            reports.write_fund_simulations(&outcome.fund_simulations)?,
            reports.write_resolution_summary(&outcome.resolution)?,
            reports.write_summary(&outcome.summary())?,
            reports.write_chart(&html)?,
        ])
    }

    /// Write only the resolution reports (for resolve-only runs).
    pub fn write_resolution(
        &self,
        report: &ResolutionReport,
        output_dir: &Path,
    ) -> Result<Vec<PathBuf>, CoreError> {
        let reports = ReportService::new(output_dir);
        Ok(vec![
            reports.write_successful_tickers(report)?,
            reports.write_failed_tickers(report)?,
            reports.write_resolution_summary(report)?,
        ])
    }
}

fn as_pairs(tables: &[MonthlyTable]) -> Vec<(String, Vec<models::performance::MonthlyMetric>)> {
    tables
        .iter()
        .map(|t| (t.name.clone(), t.metrics.clone()))
        .collect()
}

fn final_returns(
    combined: &ValueSeries,
    benchmarks: &[NamedSeries],
    funds: &[FundLine],
) -> Vec<FinalReturn> {
    let last_pct = |s: &ValueSeries| s.last_value().unwrap_or(0.0) * 100.0;

    let mut out = vec![FinalReturn {
        name: COMBINED_PORTFOLIO.to_string(),
        kind: ChartKind::Investor,
        return_pct: last_pct(combined),
    }];
    out.extend(benchmarks.iter().map(|b| FinalReturn {
        name: b.name.clone(),
        kind: ChartKind::Benchmark,
        return_pct: last_pct(&b.series),
    }));
    out.extend(funds.iter().map(|f| FinalReturn {
        name: f.name.clone(),
        kind: ChartKind::Fund,
        return_pct: last_pct(&f.returns),
    }));
    out
}

