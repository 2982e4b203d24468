use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::fund::ModelFund;
use crate::models::price::PriceSeries;
use crate::models::valuation::{ValuePoint, ValueSeries};

/// Cumulative returns of a model fund plus the weight share that had prices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FundReturns {
    pub name: String,
    /// Fractional cumulative return on each grid date (0.05 = +5%)
    pub returns: ValueSeries,
    /// Sum of normalized weights of constituents with price history, in `[0, 1]`
    pub coverage: f64,
}

/// Simulates model funds from their constituent weights.
#[derive(Debug, Default)]
pub struct FundService;

impl FundService {
    pub fn new() -> Self {
        Self
    }

    /// Weighted monthly returns compounded over the grid.
    ///
    /// Each constituent's price is forward-filled onto the grid; its period
    /// return is zero until it has two observations. Constituents without
    /// prices contribute nothing, so their weight acts as uninvested cash.
    /// `None` when the fund has no usable weights.
    pub fn cumulative_returns(
        &self,
        fund: &ModelFund,
        prices: &BTreeMap<String, PriceSeries>,
        grid: &[NaiveDate],
    ) -> Option<FundReturns> {
        let weights = fund.normalized_weights();
        if weights.is_empty() {
            tracing::warn!(fund = %fund.name, "Fund has no usable weights");
            return None;
        }

        let mut period_returns = vec![0.0; grid.len()];
        let mut coverage = 0.0;
        for weight in &weights {
            let Some(series) = prices.get(&weight.security_name) else {
                continue;
            };
            if series.is_empty() {
                continue;
            }
            coverage += weight.weight;

            let aligned: Vec<Option<f64>> = grid.iter().map(|&d| series.value_at(d)).collect();
            for idx in 1..grid.len() {
                if let (Some(prev), Some(curr)) = (aligned[idx - 1], aligned[idx]) {
                    if prev != 0.0 {
                        period_returns[idx] += (curr / prev - 1.0) * weight.weight;
                    }
                }
            }
        }

        tracing::info!(
            fund = %fund.name,
            coverage_pct = coverage * 100.0,
            "Fund returns computed"
        );

        let mut growth = 1.0;
        let points = grid
            .iter()
            .zip(period_returns)
            .map(|(&date, r)| {
                growth *= 1.0 + r;
                ValuePoint {
                    date,
                    value: growth - 1.0,
                }
            })
            .collect();

        Some(FundReturns {
            name: fund.name.clone(),
            returns: ValueSeries::new(points),
            coverage,
        })
    }

    /// Value of `initial_investment` split across the fund by weight and
    /// bought at each constituent's first price on or after `start`.
    ///
    /// Allocations for constituents without such a price stay as cash.
    /// Values are reported on the sorted union of constituent dates from `start`.
    pub fn simulate_portfolio(
        &self,
        fund: &ModelFund,
        prices: &BTreeMap<String, PriceSeries>,
        initial_investment: f64,
        start: NaiveDate,
    ) -> ValueSeries {
        let weights = fund.normalized_weights();
        let mut cash = 0.0;
        let mut positions: Vec<Position<'_>> = Vec::new();

        for weight in &weights {
            let allocation = initial_investment * weight.weight;
            let entry = prices
                .get(&weight.security_name)
                .and_then(|s| s.first_on_or_after(start).map(|p| (s, p.date, p.price)));
            match entry {
                Some((series, bought_on, price)) if price > 0.0 => positions.push(Position {
                    series,
                    bought_on,
                    allocation,
                    shares: allocation / price,
                }),
                _ => cash += allocation,
            }
        }

        let mut grid: Vec<NaiveDate> = positions
            .iter()
            .flat_map(|p| p.series.dates().filter(move |d| *d >= start))
            .collect();
        grid.sort();
        grid.dedup();

        ValueSeries::new(
            grid.into_iter()
                .map(|date| {
                    let invested = positions.iter().fold(0.0, |acc, p| acc + p.value_at(date));
                    ValuePoint {
                        date,
                        value: invested + cash,
                    }
                })
                .collect(),
        )
    }
}

/// A simulated holding; its allocation counts at cost until the purchase date.
struct Position<'a> {
    series: &'a PriceSeries,
    bought_on: NaiveDate,
    allocation: f64,
    shares: f64,
}

impl Position<'_> {
    fn value_at(&self, date: NaiveDate) -> f64 {
        if date < self.bought_on {
            return self.allocation;
        }
        self.series
            .value_at(date)
            .map_or(self.allocation, |price| price * self.shares)
    }
}
