use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::chart::{ChartKind, ComparisonChart};
use super::fund::ModelFund;
use super::holding::Holding;
use super::performance::{
    BenchmarkComparison, HoldingInvestment, InvestorInvestment, MonthlyMetric, PerformanceSummary,
};
use super::price::FetchFailure;
use super::ticker::{MatchSource, ResolutionReport};
use super::valuation::{CoverageStats, ValueSeries};

/// Everything a full analysis run consumes.
#[derive(Debug, Clone, Default)]
pub struct AnalysisInputs {
    pub holdings: Vec<Holding>,
    pub funds: Vec<ModelFund>,
}

/// A named series on the shared date grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedSeries {
    pub name: String,
    pub series: ValueSeries,
}

impl NamedSeries {
    pub fn new(name: impl Into<String>, series: ValueSeries) -> Self {
        Self {
            name: name.into(),
            series,
        }
    }
}

/// Metric table of one investor or benchmark.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyTable {
    pub name: String,
    pub metrics: Vec<MonthlyMetric>,
}

/// A model fund's returns and how much of its weight had prices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FundLine {
    pub name: String,
    /// Fractional cumulative returns on the grid; zero when nothing could be computed
    pub returns: ValueSeries,
    /// Share of the fund's weight with price data, in percent
    pub coverage_pct: f64,
}

/// A model fund bought with the investors' combined start-date investment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FundSimulation {
    pub name: String,
    pub initial_investment: f64,
    /// Simulated portfolio value from the start date on
    pub values: ValueSeries,
    pub final_value: f64,
    pub return_pct: f64,
}

impl FundSimulation {
    pub fn new(name: impl Into<String>, initial_investment: f64, values: ValueSeries) -> Self {
        let final_value = values.last_value().unwrap_or(initial_investment);
        let return_pct = if initial_investment > 0.0 {
            (final_value / initial_investment - 1.0) * 100.0
        } else {
            0.0
        };
        Self {
            name: name.into(),
            initial_investment,
            values,
            final_value,
            return_pct,
        }
    }
}

/// Final cumulative return of one investor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvestorReturn {
    pub investor: String,
    pub return_pct: f64,
}

/// How many investors ended ahead of one benchmark.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkBeat {
    pub benchmark: String,
    pub benchmark_return_pct: f64,
    pub investors_ahead: usize,
    pub investors: usize,
    pub rate_pct: f64,
}

/// Final cumulative return of one chart line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinalReturn {
    pub name: String,
    pub kind: ChartKind,
    pub return_pct: f64,
}

/// Result of `BenchmarkAnalysis::run`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisOutcome {
    /// First and last date of the requested window
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,

    pub resolution: ResolutionReport,

    /// Resolved securities whose prices could not be fetched
    pub fetch_failures: Vec<FetchFailure>,

    /// Sorted union of all monthly price dates
    pub grid: Vec<NaiveDate>,

    /// Portfolio value per investor on the grid
    pub investor_values: Vec<NamedSeries>,

    /// Fractional return of all investors' portfolios summed together
    pub combined_returns: ValueSeries,

    pub fund_returns: Vec<FundLine>,

    /// Each model fund bought with the total start-date investment
    pub fund_simulations: Vec<FundSimulation>,

    /// Fractional return per benchmark; zero lines for benchmarks without data
    pub benchmark_returns: Vec<NamedSeries>,

    pub coverage: Vec<CoverageStats>,

    /// Holdings valued at the start date
    pub investments: Vec<HoldingInvestment>,

    /// Per-investor investment totals, best gain first
    pub investor_investments: Vec<InvestorInvestment>,

    pub investor_monthly: Vec<MonthlyTable>,
    pub benchmark_monthly: Vec<MonthlyTable>,
    pub summaries: Vec<PerformanceSummary>,
    pub comparisons: Vec<BenchmarkComparison>,

    /// Final returns of the combined portfolio, benchmarks and funds
    pub final_returns: Vec<FinalReturn>,
    pub best_performer: Option<FinalReturn>,

    pub chart: ComparisonChart,
}

/// Compact run summary written as `analysis_summary.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisSummary {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub securities: usize,
    pub resolved: usize,
    pub failed: usize,
    pub success_rate_pct: f64,
    pub resolved_by_source: Vec<(MatchSource, usize)>,
    pub prices_fetched: usize,
    pub price_failures: usize,
    pub months: usize,
    pub investors: usize,
    pub average_coverage_pct: f64,
    pub final_returns: Vec<FinalReturn>,
    pub best_performer: Option<FinalReturn>,
    /// Every investor's final return, best first
    pub investor_ranking: Vec<InvestorReturn>,
    pub average_investor_return_pct: Option<f64>,
    pub top_performers: Vec<InvestorReturn>,
    /// Only filled when there are more investors than fit in the top list
    pub bottom_performers: Vec<InvestorReturn>,
    pub benchmark_beats: Vec<BenchmarkBeat>,
    pub fund_simulations: Vec<FundSimulationSummary>,
}

/// Start and end value of a simulated fund, without the series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FundSimulationSummary {
    pub name: String,
    pub initial_investment: f64,
    pub final_value: f64,
    pub return_pct: f64,
}

/// Length of the top and bottom performer lists.
const PERFORMER_LIST_LEN: usize = 5;

impl AnalysisOutcome {
    /// Final cumulative return per investor, best first.
    pub fn investor_ranking(&self) -> Vec<InvestorReturn> {
        let mut ranking: Vec<InvestorReturn> = self
            .investor_monthly
            .iter()
            .filter_map(|t| {
                t.metrics.last().map(|m| InvestorReturn {
                    investor: t.name.clone(),
                    return_pct: m.cumulative_return_pct,
                })
            })
            .collect();
        ranking.sort_by(|a, b| b.return_pct.total_cmp(&a.return_pct));
        ranking
    }

    /// Investors ahead of each benchmark at the final month.
    pub fn benchmark_beats(&self) -> Vec<BenchmarkBeat> {
        let mut beats: Vec<BenchmarkBeat> = Vec::new();
        for row in &self.comparisons {
            let idx = match beats.iter().position(|b| b.benchmark == row.benchmark) {
                Some(idx) => idx,
                None => {
                    beats.push(BenchmarkBeat {
                        benchmark: row.benchmark.clone(),
                        benchmark_return_pct: row.final_benchmark_return_pct,
                        investors_ahead: 0,
                        investors: 0,
                        rate_pct: 0.0,
                    });
                    beats.len() - 1
                }
            };
            let beat = &mut beats[idx];
            beat.investors += 1;
            if row.alpha_pct > 0.0 {
                beat.investors_ahead += 1;
            }
        }
        for beat in &mut beats {
            beat.rate_pct = beat.investors_ahead as f64 / beat.investors as f64 * 100.0;
        }
        beats
    }

    pub fn summary(&self) -> AnalysisSummary {
        let sources = [
            MatchSource::Override,
            MatchSource::Exact,
            MatchSource::Symbol,
            MatchSource::Fuzzy,
            MatchSource::Heuristic,
        ];
        let average_coverage_pct = if self.coverage.is_empty() {
            0.0
        } else {
            self.coverage.iter().map(|c| c.coverage_pct).sum::<f64>() / self.coverage.len() as f64
        };

        let ranking = self.investor_ranking();
        let average_investor_return_pct = (!ranking.is_empty()).then(|| {
            ranking.iter().fold(0.0, |acc, r| acc + r.return_pct) / ranking.len() as f64
        });
        let bottom_performers = if ranking.len() > PERFORMER_LIST_LEN {
            ranking[ranking.len() - PERFORMER_LIST_LEN..].to_vec()
        } else {
            Vec::new()
        };

        AnalysisSummary {
            start_date: self.start_date,
            end_date: self.end_date,
            securities: self.resolution.total(),
            resolved: self.resolution.resolved.len(),
            failed: self.resolution.failed.len(),
            success_rate_pct: self.resolution.success_ratio() * 100.0,
            resolved_by_source: sources
                .into_iter()
                .map(|s| (s, self.resolution.count_by_source(s)))
                .collect(),
            prices_fetched: self.resolution.resolved.len().saturating_sub(self.fetch_failures.len()),
            price_failures: self.fetch_failures.len(),
            months: self.grid.len(),
            investors: self.investor_values.len(),
            average_coverage_pct,
            final_returns: self.final_returns.clone(),
            best_performer: self.best_performer.clone(),
            average_investor_return_pct,
            top_performers: ranking.iter().take(PERFORMER_LIST_LEN).cloned().collect(),
            bottom_performers,
            investor_ranking: ranking,
            benchmark_beats: self.benchmark_beats(),
            fund_simulations: self
                .fund_simulations
                .iter()
                .map(|f| FundSimulationSummary {
                    name: f.name.clone(),
                    initial_investment: f.initial_investment,
                    final_value: f.final_value,
                    return_pct: f.return_pct,
                })
                .collect(),
        }
    }
}
