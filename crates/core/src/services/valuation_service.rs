use chrono::NaiveDate;
use std::collections::{BTreeMap, BTreeSet};

use crate::models::holding::{group_by_investor, Holding};
use crate::models::price::PriceSeries;
use crate::models::valuation::{CoverageStats, ValuePoint, ValueSeries};

/// Turns holdings and monthly prices into portfolio value over time.
///
/// Holdings with price history are valued as quantity × forward-filled price
/// (zero before the first observation). Holdings without history keep their
/// current value, scaled by the growth of the tracked part of the same
/// portfolio, so a partially covered portfolio still tracks its market.
#[derive(Debug, Default)]
pub struct ValuationService;

impl ValuationService {
    pub fn new() -> Self {
        Self
    }

    /// Sorted union of the dates of all series.
    pub fn date_grid<'a, I>(&self, series: I) -> Vec<NaiveDate>
    where
        I: IntoIterator<Item = &'a PriceSeries>,
    {
        let dates: BTreeSet<NaiveDate> = series.into_iter().flat_map(|s| s.dates()).collect();
        dates.into_iter().collect()
    }

    /// Value series for one investor's holdings.
    ///
    /// `prices` is keyed by security name.
    pub fn value_investor(
        &self,
        holdings: &[&Holding],
        prices: &BTreeMap<String, PriceSeries>,
        grid: &[NaiveDate],
    ) -> ValueSeries {
        let (tracked, untracked): (Vec<&Holding>, Vec<&Holding>) = holdings
            .iter()
            .copied()
            .partition(|h| prices.get(&h.security_name).is_some_and(|s| !s.is_empty()));

        let mut values: Vec<f64> = grid
            .iter()
            .map(|&date| {
                // an empty f64 sum is -0.0
                tracked
                    .iter()
                    .filter_map(|h| {
                        let price = prices.get(&h.security_name)?.value_at(date)?;
                        Some(h.quantity * price)
                    })
                    .fold(0.0, |acc, v| acc + v)
            })
            .collect();

        let untracked_value = untracked.iter().fold(0.0, |acc, h| acc + h.current_value);
        let tracked_value = tracked.iter().fold(0.0, |acc, h| acc + h.current_value);

        if untracked_value > 0.0 && tracked_value > 0.0 {
            if let Some(base_idx) = values.iter().position(|v| *v > 0.0) {
                let base = values[base_idx];
                for (idx, value) in values.iter_mut().enumerate() {
                    let growth = if idx < base_idx { 1.0 } else { *value / base };
                    *value += untracked_value * growth;
                }
            }
        }

        ValueSeries::new(
            grid.iter()
                .zip(values)
                .map(|(&date, value)| ValuePoint { date, value })
                .collect(),
        )
    }

    /// Value series per investor, in first-seen investor order.
    pub fn value_all(
        &self,
        holdings: &[Holding],
        prices: &BTreeMap<String, PriceSeries>,
        grid: &[NaiveDate],
    ) -> Vec<(String, ValueSeries)> {
        group_by_investor(holdings)
            .into_iter()
            .map(|group| {
                let series = self.value_investor(&group.holdings, prices, grid);
                (group.investor.to_string(), series)
            })
            .collect()
    }

    /// Date-wise sum of several value series over the same grid.
    pub fn combined<'a, I>(&self, series: I) -> ValueSeries
    where
        I: IntoIterator<Item = &'a ValueSeries>,
    {
        let mut totals: BTreeMap<NaiveDate, f64> = BTreeMap::new();
        for s in series {
            for point in &s.points {
                *totals.entry(point.date).or_insert(0.0) += point.value;
            }
        }
        ValueSeries::new(
            totals
                .into_iter()
                .map(|(date, value)| ValuePoint { date, value })
                .collect(),
        )
    }

    /// Share of each investor's current value that has price history.
    pub fn coverage(
        &self,
        holdings: &[Holding],
        prices: &BTreeMap<String, PriceSeries>,
    ) -> Vec<CoverageStats> {
        group_by_investor(holdings)
            .into_iter()
            .map(|group| {
                let with_data: Vec<&&Holding> = group
                    .holdings
                    .iter()
                    .filter(|h| prices.get(&h.security_name).is_some_and(|s| !s.is_empty()))
                    .collect();
                let total_value = group.total_value();
                let value_with_data: f64 = with_data.iter().map(|h| h.current_value).sum();
                let coverage_pct = if total_value > 0.0 {
                    value_with_data / total_value * 100.0
                } else {
                    0.0
                };
                CoverageStats {
                    investor: group.investor.to_string(),
                    total_holdings: group.holdings.len(),
                    holdings_with_data: with_data.len(),
                    total_value,
                    value_with_data,
                    coverage_pct,
                }
            })
            .collect()
    }
}
