use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::price::PriceSeries;

/// A single point of a value-over-time series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValuePoint {
    pub date: NaiveDate,
    pub value: f64,
}

/// Portfolio value (or cumulative return) on each date of a date grid.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValueSeries {
    pub points: Vec<ValuePoint>,
}

impl ValueSeries {
    pub fn new(points: Vec<ValuePoint>) -> Self {
        Self { points }
    }

    /// A series that is `value` on every date of `grid`.
    pub fn constant(grid: &[NaiveDate], value: f64) -> Self {
        Self {
            points: grid.iter().map(|&date| ValuePoint { date, value }).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first_value(&self) -> Option<f64> {
        self.points.first().map(|p| p.value)
    }

    pub fn last_value(&self) -> Option<f64> {
        self.points.last().map(|p| p.value)
    }

    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|p| p.value)
    }

    /// Value on an exact date.
    pub fn get(&self, date: NaiveDate) -> Option<f64> {
        self.points
            .binary_search_by_key(&date, |p| p.date)
            .ok()
            .map(|idx| self.points[idx].value)
    }

    /// `value / base - 1` from the first positive value on; earlier points
    /// (a portfolio whose prices start later) are left out. Empty when no
    /// value is positive.
    pub fn returns_from_start(&self) -> ValueSeries {
        let Some(base_idx) = self.points.iter().position(|p| p.value > 0.0 && p.value.is_finite())
        else {
            return ValueSeries::default();
        };
        let base = self.points[base_idx].value;
        ValueSeries {
            points: self.points[base_idx..]
                .iter()
                .map(|p| ValuePoint {
                    date: p.date,
                    value: p.value / base - 1.0,
                })
                .collect(),
        }
    }

    /// Every value multiplied by `factor` (e.g. 100 for percentages).
    pub fn scaled(&self, factor: f64) -> ValueSeries {
        ValueSeries {
            points: self
                .points
                .iter()
                .map(|p| ValuePoint {
                    date: p.date,
                    value: p.value * factor,
                })
                .collect(),
        }
    }
}

impl From<&PriceSeries> for ValueSeries {
    fn from(prices: &PriceSeries) -> Self {
        Self {
            points: prices
                .points()
                .iter()
                .map(|p| ValuePoint {
                    date: p.date,
                    value: p.price,
                })
                .collect(),
        }
    }
}

/// How much of an investor's holdings value has price history behind it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoverageStats {
    pub investor: String,
    pub total_holdings: usize,
    pub holdings_with_data: usize,
    pub total_value: f64,
    pub value_with_data: f64,
    /// `value_with_data / total_value × 100`, 0 when the total is not positive
    pub coverage_pct: f64,
}
