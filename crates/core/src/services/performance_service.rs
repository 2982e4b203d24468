use chrono::NaiveDate;
use std::collections::{BTreeMap, BTreeSet};

use crate::models::holding::Holding;
use crate::models::performance::{
    BenchmarkComparison, Direction, HoldingInvestment, InvestorInvestment, MonthlyMetric,
    PerformanceSummary,
};
use crate::models::price::{month_end, PriceSeries};
use crate::models::valuation::{ValuePoint, ValueSeries};

/// Rolling window for the volatility column.
const VOLATILITY_WINDOW: usize = 3;

/// Month-by-month analytics over value and price series.
///
/// All computations are pure; the service only carries the stale-price
/// tolerance used when looking up start prices.
#[derive(Debug)]
pub struct PerformanceService {
    stale_price_days: i64,
}

impl Default for PerformanceService {
    fn default() -> Self {
        Self::new(30)
    }
}

impl PerformanceService {
    pub fn new(stale_price_days: i64) -> Self {
        Self { stale_price_days }
    }

    // ── Investment values ───────────────────────────────────────────

    /// Price at the investment start: the first close on or after `start`,
    /// otherwise the last close before it (logged when older than the tolerance).
    pub fn start_price(&self, security_name: &str, series: &PriceSeries, start: NaiveDate) -> Option<f64> {
        if let Some(point) = series.first_on_or_after(start) {
            return Some(point.price);
        }
        let point = series.last_before(start)?;
        let age = (start - point.date).num_days();
        if age > self.stale_price_days {
            tracing::warn!(
                security = security_name,
                days = age,
                "Start price is older than the investment date"
            );
        }
        Some(point.price)
    }

    /// Each holding valued at the start price, with the gain to its current value.
    ///
    /// Holdings without a start price keep zero investment and gain.
    pub fn investment_values(
        &self,
        holdings: &[Holding],
        prices: &BTreeMap<String, PriceSeries>,
        start: NaiveDate,
    ) -> Vec<HoldingInvestment> {
        holdings
            .iter()
            .map(|h| {
                let start_price = prices
                    .get(&h.security_name)
                    .and_then(|s| self.start_price(&h.security_name, s, start));

                let mut row = HoldingInvestment {
                    investor: h.investor.clone(),
                    security_name: h.security_name.clone(),
                    quantity: h.quantity,
                    start_price,
                    investment_value: 0.0,
                    current_value: h.current_value,
                    current_price: 0.0,
                    gain_loss: 0.0,
                    gain_loss_pct: 0.0,
                };

                match start_price {
                    Some(price) => {
                        row.investment_value = h.quantity * price;
                        if h.quantity > 0.0 {
                            row.current_price = h.current_value / h.quantity;
                            row.gain_loss = h.current_value - row.investment_value;
                            if row.investment_value > 0.0 {
                                row.gain_loss_pct = row.gain_loss / row.investment_value * 100.0;
                            }
                        }
                    }
                    None => tracing::debug!(security = %h.security_name, "No start price"),
                }
                row
            })
            .collect()
    }

    /// Per-investor totals, best gain percentage first.
    pub fn investor_investments(&self, rows: &[HoldingInvestment]) -> Vec<InvestorInvestment> {
        let mut order: Vec<&str> = Vec::new();
        let mut totals: BTreeMap<&str, InvestorInvestment> = BTreeMap::new();
        for row in rows {
            let entry = totals.entry(row.investor.as_str()).or_insert_with(|| {
                order.push(row.investor.as_str());
                InvestorInvestment {
                    investor: row.investor.clone(),
                    investment_value: 0.0,
                    current_value: 0.0,
                    gain_loss: 0.0,
                    gain_loss_pct: 0.0,
                    num_securities: 0,
                }
            });
            entry.investment_value += row.investment_value;
            entry.current_value += row.current_value;
            entry.gain_loss += row.gain_loss;
            entry.num_securities += 1;
        }

        let mut out: Vec<InvestorInvestment> = order
            .into_iter()
            .filter_map(|name| totals.remove(name))
            .map(|mut inv| {
                if inv.investment_value != 0.0 {
                    inv.gain_loss_pct = inv.gain_loss / inv.investment_value * 100.0;
                }
                inv
            })
            .collect();
        out.sort_by(|a, b| b.gain_loss_pct.total_cmp(&a.gain_loss_pct));
        out
    }

    // ── Monthly metrics ─────────────────────────────────────────────

    /// Month-end metrics for a value series from `start` on.
    ///
    /// Months run from the first positive value on or after `start`, which is
    /// also the base of the cumulative return. A series that never turns
    /// positive has no metrics.
    pub fn monthly_metrics(&self, series: &ValueSeries, start: NaiveDate) -> Vec<MonthlyMetric> {
        let window: Vec<ValuePoint> = series
            .points
            .iter()
            .copied()
            .filter(|p| p.date >= start)
            .skip_while(|p| p.value <= 0.0 || !p.value.is_finite())
            .collect();
        let Some(initial) = window.first().map(|p| p.value) else {
            return Vec::new();
        };

        // Last value of each calendar month
        let mut monthly: Vec<ValuePoint> = Vec::new();
        for point in window {
            let month = month_end(point.date);
            match monthly.last_mut() {
                Some(last) if last.date == month => last.value = point.value,
                _ => monthly.push(ValuePoint {
                    date: month,
                    value: point.value,
                }),
            }
        }

        let returns: Vec<Option<f64>> = monthly
            .iter()
            .enumerate()
            .map(|(idx, p)| {
                let prev = monthly.get(idx.checked_sub(1)?)?.value;
                (prev != 0.0).then(|| (p.value / prev - 1.0) * 100.0)
            })
            .collect();

        let mut peak = f64::NEG_INFINITY;
        monthly
            .iter()
            .enumerate()
            .map(|(idx, p)| {
                peak = peak.max(p.value);
                let drawdown_pct = if peak != 0.0 {
                    (p.value - peak) / peak * 100.0
                } else {
                    0.0
                };
                let cumulative_return_pct = (p.value / initial - 1.0) * 100.0;
                MonthlyMetric {
                    month: p.date,
                    month_name: p.date.format("%B %Y").to_string(),
                    value: p.value,
                    monthly_return_pct: returns[idx],
                    cumulative_return_pct,
                    value_change: idx.checked_sub(1).map(|prev| p.value - monthly[prev].value),
                    direction: Direction::from_return(returns[idx]),
                    volatility_3m: rolling_std(&returns, idx),
                    drawdown_pct,
                }
            })
            .collect()
    }

    /// Rise/fall counts and return extremes over a metric table.
    pub fn summarize(&self, name: &str, metrics: &[MonthlyMetric]) -> PerformanceSummary {
        let returns: Vec<f64> = metrics.iter().filter_map(|m| m.monthly_return_pct).collect();
        let vols: Vec<f64> = metrics.iter().filter_map(|m| m.volatility_3m).collect();
        let count = |d: Direction| metrics.iter().filter(|m| m.direction == d).count();

        PerformanceSummary {
            name: name.to_string(),
            total_months: metrics.len(),
            rising_months: count(Direction::Rise),
            falling_months: count(Direction::Fall),
            flat_months: count(Direction::Flat),
            avg_monthly_return_pct: mean(&returns),
            best_month_pct: returns.iter().copied().reduce(f64::max),
            worst_month_pct: returns.iter().copied().reduce(f64::min),
            current_return_pct: metrics.last().map_or(0.0, |m| m.cumulative_return_pct),
            max_drawdown_pct: metrics
                .iter()
                .map(|m| m.drawdown_pct)
                .reduce(f64::min)
                .unwrap_or(0.0),
            avg_volatility: mean(&vols),
        }
    }

    // ── Benchmarks ──────────────────────────────────────────────────

    /// Each investor against each benchmark over the union of all months.
    ///
    /// A month missing from either side counts as a 0% cumulative return.
    pub fn compare_with_benchmarks(
        &self,
        investors: &[(String, Vec<MonthlyMetric>)],
        benchmarks: &[(String, Vec<MonthlyMetric>)],
    ) -> Vec<BenchmarkComparison> {
        let months: BTreeSet<NaiveDate> = investors
            .iter()
            .chain(benchmarks)
            .flat_map(|(_, metrics)| metrics.iter().map(|m| m.month))
            .collect();
        if months.is_empty() {
            return Vec::new();
        }

        let aligned = |metrics: &[MonthlyMetric]| -> Vec<f64> {
            let by_month: BTreeMap<NaiveDate, f64> =
                metrics.iter().map(|m| (m.month, m.cumulative_return_pct)).collect();
            months
                .iter()
                .map(|m| by_month.get(m).copied().unwrap_or(0.0))
                .collect()
        };

        let mut out = Vec::new();
        for (investor, investor_metrics) in investors {
            let investor_returns = aligned(investor_metrics);
            for (benchmark, benchmark_metrics) in benchmarks {
                let benchmark_returns = aligned(benchmark_metrics);
                let alpha: Vec<f64> = investor_returns
                    .iter()
                    .zip(&benchmark_returns)
                    .map(|(i, b)| i - b)
                    .collect();
                let outperform_months = alpha.iter().filter(|a| **a > 0.0).count();
                let total_months = months.len();

                out.push(BenchmarkComparison {
                    investor: investor.clone(),
                    benchmark: benchmark.clone(),
                    final_investor_return_pct: investor_returns.last().copied().unwrap_or(0.0),
                    final_benchmark_return_pct: benchmark_returns.last().copied().unwrap_or(0.0),
                    alpha_pct: alpha.last().copied().unwrap_or(0.0),
                    outperform_months,
                    total_months,
                    outperform_rate_pct: outperform_months as f64 / total_months as f64 * 100.0,
                    avg_monthly_alpha_pct: mean(&alpha).unwrap_or(0.0),
                });
            }
        }
        out
    }

    /// Fractional cumulative return of an index, forward-filled onto `grid`.
    /// Dates before the first observation read 0.
    pub fn benchmark_returns(&self, series: &PriceSeries, grid: &[NaiveDate]) -> ValueSeries {
        let base = series.first().map(|p| p.price).filter(|p| *p != 0.0);
        ValueSeries::new(
            grid.iter()
                .map(|&date| {
                    let value = match (base, series.value_at(date)) {
                        (Some(base), Some(price)) => price / base - 1.0,
                        _ => 0.0,
                    };
                    ValuePoint { date, value }
                })
                .collect(),
        )
    }
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample standard deviation of the window ending at `idx`; `None` unless
/// every return in the window is known.
fn rolling_std(returns: &[Option<f64>], idx: usize) -> Option<f64> {
    let start = (idx + 1).checked_sub(VOLATILITY_WINDOW)?;
    let window: Vec<f64> = returns[start..=idx].iter().copied().collect::<Option<_>>()?;
    let avg = mean(&window)?;
    let variance = window.iter().map(|r| (r - avg).powi(2)).sum::<f64>() / (window.len() - 1) as f64;
    Some(variance.sqrt())
}

