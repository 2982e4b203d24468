use serde::Serialize;

use crate::errors::CoreError;
use crate::models::chart::{ChartKind, ChartSeries, ComparisonChart};
use crate::models::valuation::ValueSeries;

const PLOTLY_CDN: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";

/// Builds comparison charts from cumulative-return series.
///
/// The core computes all the numbers; `render_html` only wraps them in a
/// self-contained page that draws them with Plotly.
#[derive(Debug, Default)]
pub struct ChartService;

/// One Plotly trace as embedded in the page.
#[derive(Serialize)]
struct Trace<'a> {
    name: &'a str,
    x: Vec<String>,
    y: Vec<f64>,
    mode: &'static str,
    #[serde(rename = "type")]
    trace_type: &'static str,
    line: TraceLine,
}

#[derive(Serialize)]
struct TraceLine {
    width: u8,
    dash: &'static str,
}

impl ChartService {
    pub fn new() -> Self {
        Self
    }

    /// Chart of cumulative returns in percent. Inputs are fractional
    /// (0.05 = +5%); empty series are left out.
    pub fn build_chart(
        &self,
        title: &str,
        investors: &[(String, ValueSeries)],
        benchmarks: &[(String, ValueSeries)],
        funds: &[(String, ValueSeries)],
    ) -> ComparisonChart {
        let groups = [
            (ChartKind::Investor, investors),
            (ChartKind::Benchmark, benchmarks),
            (ChartKind::Fund, funds),
        ];
        let series = groups
            .into_iter()
            .flat_map(|(kind, lines)| {
                lines
                    .iter()
                    .filter(|(_, s)| !s.is_empty())
                    .map(move |(name, s)| ChartSeries {
                        name: name.clone(),
                        kind,
                        series: s.scaled(100.0),
                    })
            })
            .collect();

        ComparisonChart {
            title: title.to_string(),
            series,
        }
    }

    /// Minimal standalone HTML page drawing the chart.
    pub fn render_html(&self, chart: &ComparisonChart) -> Result<String, CoreError> {
        let traces: Vec<Trace<'_>> = chart
            .series
            .iter()
            .map(|line| Trace {
                name: &line.name,
                x: line
                    .series
                    .points
                    .iter()
                    .map(|p| p.date.format("%Y-%m-%d").to_string())
                    .collect(),
                y: line.series.values().collect(),
                mode: "lines+markers",
                trace_type: "scatter",
                line: TraceLine {
                    width: if line.kind == ChartKind::Investor { 3 } else { 2 },
                    dash: match line.kind {
                        ChartKind::Investor => "solid",
                        ChartKind::Benchmark => "dash",
                        ChartKind::Fund => "dot",
                    },
                },
            })
            .collect();

        // `</` inside a script block would end it early
        let data = serde_json::to_string(&traces)?.replace("</", "<\\/");
        let layout = serde_json::to_string(&serde_json::json!({
            "title": { "text": chart.title },
            "xaxis": { "title": { "text": "Date" }, "tickformat": "%b %Y" },
            "yaxis": { "title": { "text": "Cumulative return (%)" }, "ticksuffix": "%" },
            "hovermode": "x unified",
        }))?
        .replace("</", "<\\/");
        let title = escape_html(&chart.title);

        Ok(format!(
            r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>{title}</title>
<script src="{PLOTLY_CDN}"></script>
</head>
<body>
<div id="chart" style="width:100%;height:90vh;"></div>
<script>
Plotly.newPlot("chart", {data}, {layout});
</script>
</body>
</html>
"#
        ))
    }
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
