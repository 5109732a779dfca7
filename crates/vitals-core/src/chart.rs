//! The end-to-end chart pipeline.
//!
//! [`build_chart`] runs one [`ChartConfig`] over a batch of records:
//!
//! ```text
//! records ──► aggregate ──► series set ──► downsample_set ──► labels + tooltips
//! ```
//!
//! The result, [`ChartData`], is what a renderer needs: aligned dates,
//! axis labels, tooltips and one value column per metric.

use serde::{Deserialize, Serialize};
use time::Date;
use tracing::debug;

use vitals_types::RawRecord;
use vitals_types::date::serde_date;

use crate::aggregate::{SkipReport, aggregate_within};
use crate::config::{ChartConfig, EngineConfig};
use crate::downsample::downsample_set;
use crate::labels::{LabelTier, format_labels, format_tooltip_label};
use crate::series::Dataset;

/// A downsampled, labelled chart ready for rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartData {
    /// Chart name.
    pub chart: String,
    /// Retained dates, ascending.
    #[serde(with = "serde_date::vec")]
    pub dates: Vec<Date>,
    /// One axis label per retained date (may be empty strings).
    pub labels: Vec<String>,
    /// One tooltip per retained date.
    pub tooltips: Vec<String>,
    /// One value column per metric, aligned with `dates`.
    pub datasets: Vec<Dataset>,
    /// Records skipped for date problems.
    pub skipped: SkipReport,
    /// Records outside the chart's date range.
    pub out_of_range: usize,
    /// Number of daily points before downsampling.
    pub original_len: usize,
}

impl ChartData {
    /// Number of plotted points.
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    /// Whether there is nothing to plot.
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Look up a value column by metric name.
    pub fn dataset(&self, name: &str) -> Option<&Dataset> {
        self.datasets.iter().find(|d| d.name == name)
    }

    /// The label tier used for the axis.
    pub fn tier(&self) -> LabelTier {
        LabelTier::for_len(self.dates.len())
    }

    /// Whether downsampling dropped any points.
    pub fn is_downsampled(&self) -> bool {
        self.dates.len() < self.original_len
    }
}

/// Aggregate, downsample and label `records` as described by `chart`.
///
/// Labels are chosen for the number of retained dates, so a year of data
/// thinned to 60 points is labelled weekly rather than monthly.
pub fn build_chart(records: &[RawRecord], chart: &ChartConfig, engine: &EngineConfig) -> ChartData {
    let aggregation = aggregate_within(records, &chart.metrics, engine.zone(), &chart.range);
    let full = aggregation.series_set();
    let original_len = full.len();

    let sampled = downsample_set(&full, chart.max_points.get());
    let (dates, datasets) = sampled.into_parts();
    let labels = format_labels(&dates);
    let tooltips = dates.iter().copied().map(format_tooltip_label).collect();

    debug!(
        chart = %chart.name,
        days = original_len,
        points = dates.len(),
        tier = %LabelTier::for_len(dates.len()),
        "Built chart"
    );

    ChartData {
        chart: chart.name.clone(),
        dates,
        labels,
        tooltips,
        datasets,
        skipped: aggregation.skipped,
        out_of_range: aggregation.out_of_range,
        original_len,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::MetricSpec;
    use time::Duration;
    use time::macros::date;
    use vitals_types::{Metric, SleepRecord};

    fn nights(n: usize) -> Vec<RawRecord> {
        let start = date!(2025 - 01 - 01);
        (0..n)
            .map(|i| {
                RawRecord::new(
                    start + Duration::days(i as i64),
                    SleepRecord {
                        score: Some(70.0 + (i % 20) as f64),
                        duration_min: Some(420.0),
                        ..Default::default()
                    },
                )
            })
            .collect()
    }

    #[test]
    fn test_short_chart_is_complete() {
        let chart = build_chart(&nights(5), &ChartConfig::sleep(), &EngineConfig::default());

        assert_eq!(chart.chart, "sleep");
        assert_eq!(chart.len(), 5);
        assert_eq!(chart.original_len, 5);
        assert!(!chart.is_downsampled());
        assert_eq!(chart.tier(), LabelTier::Weekday);
        assert_eq!(chart.labels[0], "Wed");
        assert_eq!(chart.tooltips[0], "Wednesday, January 1, 2025");
        assert_eq!(chart.datasets.len(), 4);
        assert_eq!(chart.dataset("sleep_score").unwrap().values[0], Some(70.0));
        assert_eq!(chart.dataset("hrv").unwrap().values[0], None);
    }

    #[test]
    fn test_long_chart_is_downsampled() {
        let chart = build_chart(&nights(365), &ChartConfig::sleep(), &EngineConfig::default());

        assert!(chart.len() <= 45);
        assert_eq!(chart.original_len, 365);
        assert!(chart.is_downsampled());
        assert_eq!(chart.dates[0], date!(2025 - 01 - 01));
        assert_eq!(chart.dates[chart.len() - 1], date!(2025 - 12 - 31));
        assert_eq!(chart.labels.len(), chart.len());
        assert_eq!(chart.tooltips.len(), chart.len());
        for dataset in &chart.datasets {
            assert_eq!(dataset.values.len(), chart.len());
        }
    }

    #[test]
    fn test_budget_override() {
        let config = ChartConfig::sleep().with_max_points(0);
        let chart = build_chart(&nights(30), &config, &EngineConfig::default());
        assert_eq!(chart.len(), 2);
    }

    #[test]
    fn test_empty_records() {
        let chart = build_chart(&[], &ChartConfig::activity(), &EngineConfig::default());
        assert!(chart.is_empty());
        assert!(chart.labels.is_empty());
        assert_eq!(chart.datasets.len(), 4);
        assert_eq!(chart.skipped.total(), 0);
    }

    #[test]
    fn test_chart_data_json() {
        let config = ChartConfig::new("score", 10).metric(MetricSpec::mean(Metric::SleepScore));
        let chart = build_chart(&nights(2), &config, &EngineConfig::default());

        let json = serde_json::to_value(&chart).unwrap();

        assert_eq!(json["chart"], "score");
        assert_eq!(json["dates"][0], "2025-01-01");
        assert_eq!(json["labels"][1], "Thu");
        assert_eq!(json["datasets"][0]["values"][1], 71.0);
        assert_eq!(json["skipped"]["missing_date"], 0);

        let back: ChartData = serde_json::from_value(json).unwrap();
        assert_eq!(back, chart);
    }
}
