//! Chart and engine configuration.
//!
//! Every chart on the dashboard runs the same pipeline; what differs between
//! them is captured in a [`ChartConfig`]: which metrics to aggregate, how to
//! reduce and filter them, and how many points to keep.
//!
//! # Example
//!
//! ```
//! use vitals_core::{ChartConfig, MetricSpec, PointBudget};
//! use vitals_types::Metric;
//!
//! // Use a built-in preset
//! let activity = ChartConfig::activity();
//! assert_eq!(activity.max_points.get(), 60);
//!
//! // Or describe a chart of your own
//! let hrv = ChartConfig::new("recovery", 90)
//!     .metric(MetricSpec::mean(Metric::Hrv))
//!     .metric(MetricSpec::mean(Metric::RestingHeartRate));
//! hrv.validate()?;
//!
//! // Budgets of zero or less fall back to the two endpoints
//! assert_eq!(PointBudget::new(-5).get(), 2);
//! # Ok::<(), vitals_core::Error>(())
//! ```

use std::collections::{BTreeSet, HashSet};

use serde::{Deserialize, Serialize};
use time::UtcOffset;

use vitals_types::{Metric, RawRecord, RecordKind, ReportingOffset, Sport};

use crate::aggregate::{DateRange, MetricSpec, RecordFilter};
use crate::error::{Error, Result};

/// Maximum number of plotted points.
///
/// Stored signed so configuration files may carry `0` or negative values;
/// anything below 1 means "endpoints only" and reads back as 2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PointBudget(i64);

impl PointBudget {
    /// Wrap a raw budget.
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    /// The configured value, as written.
    pub const fn raw(self) -> i64 {
        self.0
    }

    /// The effective budget: the configured value, or 2 when it is `<= 0`.
    pub fn get(self) -> usize {
        if self.0 <= 0 {
            2
        } else {
            usize::try_from(self.0).unwrap_or(usize::MAX)
        }
    }
}

impl Default for PointBudget {
    fn default() -> Self {
        Self(60)
    }
}

impl From<i64> for PointBudget {
    fn from(raw: i64) -> Self {
        Self(raw)
    }
}

/// One chart: its name, point budget, metrics and optional date window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartConfig {
    /// Chart name, used to select it from the CLI and config file.
    pub name: String,
    /// Maximum number of plotted points.
    #[serde(default)]
    pub max_points: PointBudget,
    /// Metric columns, in legend order.
    #[serde(default)]
    pub metrics: Vec<MetricSpec>,
    /// Dates to keep; unbounded by default.
    #[serde(default, skip_serializing_if = "DateRange::is_unbounded")]
    pub range: DateRange,
}

/// Names of the built-in presets accepted by [`ChartConfig::preset`].
pub const PRESET_NAMES: [&str; 4] = ["activity", "nutrition", "sleep", "blood_markers"];

impl ChartConfig {
    /// An empty chart with the given name and budget.
    pub fn new(name: impl Into<String>, max_points: i64) -> Self {
        Self {
            name: name.into(),
            max_points: PointBudget::new(max_points),
            metrics: Vec::new(),
            range: DateRange::default(),
        }
    }

    /// Add a metric column.
    pub fn metric(mut self, spec: MetricSpec) -> Self {
        self.metrics.push(spec);
        self
    }

    /// Restrict the chart to a date window.
    pub fn with_range(mut self, range: DateRange) -> Self {
        self.range = range;
        self
    }

    /// Change the point budget.
    pub fn with_max_points(mut self, max_points: i64) -> Self {
        self.max_points = PointBudget::new(max_points);
        self
    }

    /// Workouts: energy, distance and time summed per day, plus the average
    /// heart rate of the day's runs.
    pub fn activity() -> Self {
        Self::new("activity", 60)
            .metric(MetricSpec::sum(Metric::ActiveCalories))
            .metric(MetricSpec::sum(Metric::Distance))
            .metric(MetricSpec::sum(Metric::MovingTime))
            .metric(
                MetricSpec::mean(Metric::HeartRate).with_filter(RecordFilter::Sport(Sport::Run)),
            )
    }

    /// Food log: energy and macros summed per day.
    pub fn nutrition() -> Self {
        Self::new("nutrition", 30)
            .metric(MetricSpec::sum(Metric::CaloriesConsumed))
            .metric(MetricSpec::sum(Metric::Protein))
            .metric(MetricSpec::sum(Metric::Carbs))
            .metric(MetricSpec::sum(Metric::Fat))
    }

    /// Nightly sleep: score, duration and overnight recovery markers.
    pub fn sleep() -> Self {
        Self::new("sleep", 45)
            .metric(MetricSpec::mean(Metric::SleepScore))
            .metric(MetricSpec::sum(Metric::SleepDuration))
            .metric(MetricSpec::mean(Metric::RestingHeartRate))
            .metric(MetricSpec::mean(Metric::Hrv))
    }

    /// Lab results: one averaged column per marker.
    pub fn blood_markers(markers: &[&str]) -> Self {
        markers.iter().fold(Self::new("blood_markers", 20), |chart, marker| {
            chart.metric(MetricSpec::mean(Metric::blood_marker(marker)))
        })
    }

    /// The blood-marker preset covering every marker found in `records`,
    /// in alphabetical order.
    pub fn blood_markers_in(records: &[RawRecord]) -> Self {
        let markers: BTreeSet<String> = records
            .iter()
            .filter_map(|record| match &record.kind {
                RecordKind::BloodMarker(lab) if !lab.marker.trim().is_empty() => {
                    Some(lab.marker.trim().to_lowercase())
                }
                _ => None,
            })
            .collect();
        let names: Vec<&str> = markers.iter().map(String::as_str).collect();
        Self::blood_markers(&names)
    }

    /// Look up a preset by name. `blood_markers` has no columns until
    /// markers are supplied; see [`ChartConfig::blood_markers_in`].
    pub fn preset(name: &str) -> Option<Self> {
        match name {
            "activity" => Some(Self::activity()),
            "nutrition" => Some(Self::nutrition()),
            "sleep" => Some(Self::sleep()),
            "blood_markers" => Some(Self::blood_markers(&[])),
            _ => None,
        }
    }

    /// Check the chart is usable.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if the name is empty, there are no
    /// metrics, or two metrics share a name.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::invalid_config("chart name is empty"));
        }
        if self.metrics.is_empty() {
            return Err(Error::invalid_config(format!(
                "chart '{}' has no metrics",
                self.name
            )));
        }

        let mut seen = HashSet::new();
        for spec in &self.metrics {
            if spec.name.trim().is_empty() {
                return Err(Error::invalid_config(format!(
                    "chart '{}' has a metric with an empty name",
                    self.name
                )));
            }
            if !seen.insert(spec.name.as_str()) {
                return Err(Error::invalid_config(format!(
                    "chart '{}' has duplicate metric name '{}'",
                    self.name, spec.name
                )));
            }
        }

        if let DateRange {
            since: Some(since),
            until: Some(until),
        } = self.range
            && since > until
        {
            return Err(Error::invalid_config(format!(
                "chart '{}' range starts {since} after it ends {until}",
                self.name
            )));
        }

        Ok(())
    }
}

/// Settings shared by every chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Offset in which instants are turned into calendar dates.
    pub reporting_offset: ReportingOffset,
}

impl EngineConfig {
    /// Engine settings for a reporting offset.
    pub fn new(reporting_offset: impl Into<ReportingOffset>) -> Self {
        Self {
            reporting_offset: reporting_offset.into(),
        }
    }

    /// The reporting offset as a `time` offset.
    pub fn zone(&self) -> UtcOffset {
        self.reporting_offset.offset()
    }
}
