use serde::Serialize;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use crate::errors::CoreError;
use crate::models::analytics::FundSimulation;
use crate::models::performance::{
    BenchmarkComparison, Direction, InvestorInvestment, MonthlyMetric,
};
use crate::models::price::FetchFailure;
use crate::models::ticker::{MatchSource, ResolutionReport};
use crate::models::valuation::CoverageStats;

pub const SUCCESSFUL_TICKERS_FILE: &str = "successful_tickers.csv";
pub const FAILED_TICKERS_FILE: &str = "failed_tickers.csv";
pub const FETCH_FAILURES_FILE: &str = "fetch_failures.csv";
pub const COVERAGE_FILE: &str = "coverage_report.csv";
pub const INVESTOR_SUMMARY_FILE: &str = "investor_summary.csv";
pub const MONTHLY_PERFORMANCE_FILE: &str = "monthly_performance.csv";
pub const BENCHMARK_COMPARISON_FILE: &str = "benchmark_comparison.csv";
pub const FUND_SIMULATION_FILE: &str = "fund_simulation.csv";
pub const RESOLUTION_SUMMARY_FILE: &str = "ticker_resolution_summary.txt";
pub const SUMMARY_FILE: &str = "analysis_summary.json";
pub const CHART_FILE: &str = "comparison_chart.html";

/// Failed names listed in the resolution summary before it cuts off.
const LISTED_FAILURES: usize = 20;

/// Writes analysis results into an output directory.
///
/// Tables go out as CSV with a header row, the run summary as pretty JSON.
/// The directory is created on first write.
pub struct ReportService {
    output_dir: PathBuf,
}

#[derive(Serialize)]
struct MonthlyRow<'a> {
    name: &'a str,
    month: String,
    month_name: &'a str,
    value: f64,
    monthly_return_pct: Option<f64>,
    cumulative_return_pct: f64,
    value_change: Option<f64>,
    direction: Direction,
    volatility_3m: Option<f64>,
    drawdown_pct: f64,
}

#[derive(Serialize)]
struct SimulationRow<'a> {
    fund: &'a str,
    date: String,
    value: f64,
    return_pct: f64,
}

impl ReportService {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// `security_name,symbol,source,score` for every resolved name.
    pub fn write_successful_tickers(&self, report: &ResolutionReport) -> Result<PathBuf, CoreError> {
        self.write_csv(SUCCESSFUL_TICKERS_FILE, &report.resolved)
    }

    /// One unresolved security name per row, for manual follow-up.
    pub fn write_failed_tickers(&self, report: &ResolutionReport) -> Result<PathBuf, CoreError> {
        let path = self.prepare(FAILED_TICKERS_FILE)?;
        let mut writer = csv::Writer::from_path(&path)?;
        writer.write_record(["security_name"])?;
        for name in &report.failed {
            writer.write_record([name.as_str()])?;
        }
        writer.flush()?;
        Ok(path)
    }

    pub fn write_fetch_failures(&self, failures: &[FetchFailure]) -> Result<PathBuf, CoreError> {
        self.write_csv(FETCH_FAILURES_FILE, failures)
    }

    pub fn write_coverage(&self, coverage: &[CoverageStats]) -> Result<PathBuf, CoreError> {
        self.write_csv(COVERAGE_FILE, coverage)
    }

    pub fn write_investor_summary(&self, investors: &[InvestorInvestment]) -> Result<PathBuf, CoreError> {
        self.write_csv(INVESTOR_SUMMARY_FILE, investors)
    }

    pub fn write_benchmark_comparison(&self, rows: &[BenchmarkComparison]) -> Result<PathBuf, CoreError> {
        self.write_csv(BENCHMARK_COMPARISON_FILE, rows)
    }

    /// Monthly metric tables of several series, stacked with a leading `name` column.
    pub fn write_monthly_performance(
        &self,
        metrics: &[(String, Vec<MonthlyMetric>)],
    ) -> Result<PathBuf, CoreError> {
        let rows: Vec<MonthlyRow<'_>> = metrics
            .iter()
            .flat_map(|(name, months)| {
                months.iter().map(move |m| MonthlyRow {
                    name,
                    month: m.month.format("%Y-%m-%d").to_string(),
                    month_name: &m.month_name,
                    value: m.value,
                    monthly_return_pct: m.monthly_return_pct,
                    cumulative_return_pct: m.cumulative_return_pct,
                    value_change: m.value_change,
                    direction: m.direction,
                    volatility_3m: m.volatility_3m,
                    drawdown_pct: m.drawdown_pct,
                })
            })
            .collect();
        self.write_csv(MONTHLY_PERFORMANCE_FILE, &rows)
    }

    /// Simulated fund values, one row per fund and date.
    pub fn write_fund_simulations(&self, simulations: &[FundSimulation]) -> Result<PathBuf, CoreError> {
        let rows: Vec<SimulationRow<'_>> = simulations
            .iter()
            .flat_map(|sim| {
                sim.values.points.iter().map(move |p| SimulationRow {
                    fund: &sim.name,
                    date: p.date.format("%Y-%m-%d").to_string(),
                    value: p.value,
                    return_pct: if sim.initial_investment > 0.0 {
                        (p.value / sim.initial_investment - 1.0) * 100.0
                    } else {
                        0.0
                    },
                })
            })
            .collect();
        self.write_csv(FUND_SIMULATION_FILE, &rows)
    }

    /// Plain-text digest of a resolution run for manual follow-up.
    pub fn write_resolution_summary(&self, report: &ResolutionReport) -> Result<PathBuf, CoreError> {
        let path = self.prepare(RESOLUTION_SUMMARY_FILE)?;
        std::fs::write(&path, resolution_summary_text(report, chrono::Local::now().naive_local()))?;
        Ok(path)
    }

    pub fn write_summary<T: Serialize>(&self, summary: &T) -> Result<PathBuf, CoreError> {
        let path = self.prepare(SUMMARY_FILE)?;
        let json = serde_json::to_string_pretty(summary)?;
        std::fs::write(&path, json)?;
        Ok(path)
    }

    pub fn write_chart(&self, html: &str) -> Result<PathBuf, CoreError> {
        let path = self.prepare(CHART_FILE)?;
        std::fs::write(&path, html)?;
        Ok(path)
    }

    fn write_csv<T: Serialize>(&self, file_name: &str, rows: &[T]) -> Result<PathBuf, CoreError> {
        let path = self.prepare(file_name)?;
        let mut writer = csv::Writer::from_path(&path)?;
        for row in rows {
            writer.serialize(row)?;
        }
        writer.flush()?;
        tracing::debug!(file = %path.display(), rows = rows.len(), "Report written");
        Ok(path)
    }

    fn prepare(&self, file_name: &str) -> Result<PathBuf, CoreError> {
        std::fs::create_dir_all(&self.output_dir)?;
        Ok(self.output_dir.join(file_name))
    }
}

/// Body of `ticker_resolution_summary.txt`.
pub fn resolution_summary_text(report: &ResolutionReport, generated: chrono::NaiveDateTime) -> String {
    let total = report.total();
    let pct = |n: usize| {
        if total == 0 {
            0.0
        } else {
            n as f64 / total as f64 * 100.0
        }
    };

    let mut out = String::new();
    let _ = writeln!(out, "TICKER RESOLUTION REPORT");
    let _ = writeln!(out, "Generated: {}", generated.format("%Y-%m-%d %H:%M:%S"));
    let _ = writeln!(out, "{}", "=".repeat(60));
    let _ = writeln!(out);
    let _ = writeln!(out, "Total securities: {total}");
    let _ = writeln!(
        out,
        "Resolved:         {} ({:.1}%)",
        report.resolved.len(),
        pct(report.resolved.len())
    );
    let _ = writeln!(
        out,
        "Failed:           {} ({:.1}%)",
        report.failed.len(),
        pct(report.failed.len())
    );
    let _ = writeln!(out);
    let _ = writeln!(out, "Resolved by source:");
    for source in [
        MatchSource::Override,
        MatchSource::Exact,
        MatchSource::Symbol,
        MatchSource::Fuzzy,
        MatchSource::Heuristic,
    ] {
        let _ = writeln!(out, "  {:<10} {}", source.to_string(), report.count_by_source(source));
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "Files: {SUCCESSFUL_TICKERS_FILE}, {FAILED_TICKERS_FILE}");

    if !report.failed.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Failed securities (add them to the overrides file):");
        for name in report.failed.iter().take(LISTED_FAILURES) {
            let _ = writeln!(out, "  - {name}");
        }
        if report.failed.len() > LISTED_FAILURES {
            let _ = writeln!(out, "  ... and {} more", report.failed.len() - LISTED_FAILURES);
        }
    }
    out
}
