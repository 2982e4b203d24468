use serde::{Deserialize, Serialize};

use super::valuation::ValueSeries;

/// What a chart line represents; drives grouping in the rendered legend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChartKind {
    Investor,
    Benchmark,
    Fund,
}

/// One named line on a comparison chart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartSeries {
    pub name: String,
    pub kind: ChartKind,
    /// Cumulative return in percent on each date
    pub series: ValueSeries,
}

/// Chart-ready data set. The core computes all numbers; rendering only draws them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonChart {
    pub title: String,
    pub series: Vec<ChartSeries>,
}

impl ComparisonChart {
    pub fn lines_of(&self, kind: ChartKind) -> impl Iterator<Item = &ChartSeries> {
        self.series.iter().filter(move |s| s.kind == kind)
    }
}
