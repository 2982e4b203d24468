use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Month-over-month movement of a value series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Rise,
    Fall,
    Flat,
}

impl Direction {
    pub fn from_return(monthly_return: Option<f64>) -> Self {
        match monthly_return {
            Some(r) if r > 0.0 => Direction::Rise,
            Some(r) if r < 0.0 => Direction::Fall,
            _ => Direction::Flat,
        }
    }
}

/// Metrics for one month of a value series.
///
/// Percentages are expressed in percent (5.0 means 5%). Fields that need
/// history (the first month, the first two months for volatility) are `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyMetric {
    /// Month-end date
    pub month: NaiveDate,
    /// e.g. "April 2024"
    pub month_name: String,
    pub value: f64,
    pub monthly_return_pct: Option<f64>,
    pub cumulative_return_pct: f64,
    pub value_change: Option<f64>,
    pub direction: Direction,
    /// Sample standard deviation of the last three monthly returns
    pub volatility_3m: Option<f64>,
    /// Distance from the running peak, ≤ 0
    pub drawdown_pct: f64,
}

/// Aggregated monthly performance for one investor (or benchmark).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceSummary {
    pub name: String,
    pub total_months: usize,
    pub rising_months: usize,
    pub falling_months: usize,
    pub flat_months: usize,
    pub avg_monthly_return_pct: Option<f64>,
    pub best_month_pct: Option<f64>,
    pub worst_month_pct: Option<f64>,
    pub current_return_pct: f64,
    pub max_drawdown_pct: f64,
    pub avg_volatility: Option<f64>,
}

/// An investor's cumulative return measured against one benchmark.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkComparison {
    pub investor: String,
    pub benchmark: String,
    pub final_investor_return_pct: f64,
    pub final_benchmark_return_pct: f64,
    /// Excess return at the final month
    pub alpha_pct: f64,
    pub outperform_months: usize,
    pub total_months: usize,
    pub outperform_rate_pct: f64,
    pub avg_monthly_alpha_pct: f64,
}

/// One holding valued at the analysis start date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoldingInvestment {
    pub investor: String,
    pub security_name: String,
    pub quantity: f64,
    pub start_price: Option<f64>,
    pub investment_value: f64,
    pub current_value: f64,
    pub current_price: f64,
    pub gain_loss: f64,
    pub gain_loss_pct: f64,
}

/// Per-investor totals of `HoldingInvestment`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvestorInvestment {
    pub investor: String,
    pub investment_value: f64,
    pub current_value: f64,
    pub gain_loss: f64,
    pub gain_loss_pct: f64,
    pub num_securities: usize,
}
