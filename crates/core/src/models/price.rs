use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single price data point (date → close).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub price: f64,
}

/// Date-sorted price history for one symbol.
///
/// Construction sorts the points and keeps the last point for duplicate dates,
/// so lookups can rely on binary search.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    points: Vec<PricePoint>,
}

impl PriceSeries {
    pub fn new(mut points: Vec<PricePoint>) -> Self {
        points.sort_by_key(|p| p.date);
        let mut deduped: Vec<PricePoint> = Vec::with_capacity(points.len());
        for point in points {
            match deduped.last_mut() {
                Some(last) if last.date == point.date => *last = point,
                _ => deduped.push(point),
            }
        }
        Self { points: deduped }
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> Option<&PricePoint> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&PricePoint> {
        self.points.last()
    }

    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.points.iter().map(|p| p.date)
    }

    /// Exact-date lookup. O(log n).
    pub fn get(&self, date: NaiveDate) -> Option<f64> {
        self.points
            .binary_search_by_key(&date, |p| p.date)
            .ok()
            .map(|idx| self.points[idx].price)
    }

    /// Forward-filled value: the last price on or before `date`.
    /// `None` before the first observation.
    pub fn value_at(&self, date: NaiveDate) -> Option<f64> {
        let idx = match self.points.binary_search_by_key(&date, |p| p.date) {
            Ok(idx) => idx,
            Err(0) => return None,
            Err(pos) => pos - 1,
        };
        Some(self.points[idx].price)
    }

    /// First point dated on or after `date`.
    pub fn first_on_or_after(&self, date: NaiveDate) -> Option<&PricePoint> {
        let idx = self
            .points
            .binary_search_by_key(&date, |p| p.date)
            .unwrap_or_else(|pos| pos);
        self.points.get(idx)
    }

    /// Last point dated strictly before `date`.
    pub fn last_before(&self, date: NaiveDate) -> Option<&PricePoint> {
        let idx = self
            .points
            .binary_search_by_key(&date, |p| p.date)
            .unwrap_or_else(|pos| pos);
        idx.checked_sub(1).and_then(|i| self.points.get(i))
    }

    /// Points dated on or after `date`.
    pub fn since(&self, date: NaiveDate) -> PriceSeries {
        let start = self
            .points
            .binary_search_by_key(&date, |p| p.date)
            .unwrap_or_else(|pos| pos);
        PriceSeries {
            points: self.points[start..].to_vec(),
        }
    }

    /// Resample to the last close of each calendar month, dated at month end.
    pub fn monthly_closes(&self) -> PriceSeries {
        let mut monthly: Vec<PricePoint> = Vec::new();
        for point in &self.points {
            let month_end = month_end(point.date);
            match monthly.last_mut() {
                Some(last) if last.date == month_end => last.price = point.price,
                _ => monthly.push(PricePoint {
                    date: month_end,
                    price: point.price,
                }),
            }
        }
        PriceSeries { points: monthly }
    }
}

impl From<Vec<PricePoint>> for PriceSeries {
    fn from(points: Vec<PricePoint>) -> Self {
        Self::new(points)
    }
}

/// A security whose prices could not be obtained.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FetchFailure {
    pub security_name: String,
    pub symbol: String,
    pub reason: String,
}

/// Monthly series for every security that returned data, keyed by security name.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FetchReport {
    pub series: BTreeMap<String, PriceSeries>,
    pub failed: Vec<FetchFailure>,
}

impl FetchReport {
    pub fn succeeded(&self) -> usize {
        self.series.len()
    }

    pub fn get(&self, security_name: &str) -> Option<&PriceSeries> {
        self.series.get(security_name)
    }
}

/// Last calendar day of the month containing `date`.
pub fn month_end(date: NaiveDate) -> NaiveDate {
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|first_of_next| first_of_next.pred_opt())
        .unwrap_or(date)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn month_end_handles_december_and_leap_years() {
        assert_eq!(month_end(d(2024, 12, 5)), d(2024, 12, 31));
        assert_eq!(month_end(d(2024, 2, 10)), d(2024, 2, 29));
        assert_eq!(month_end(d(2025, 2, 28)), d(2025, 2, 28));
    }

    #[test]
    fn duplicate_dates_keep_last_point() {
        let series = PriceSeries::new(vec![
            PricePoint { date: d(2024, 1, 2), price: 1.0 },
            PricePoint { date: d(2024, 1, 1), price: 5.0 },
            PricePoint { date: d(2024, 1, 2), price: 2.0 },
        ]);
        assert_eq!(series.len(), 2);
        assert_eq!(series.get(d(2024, 1, 2)), Some(2.0));
    }
}
