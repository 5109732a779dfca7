//! Daily series engine for personal health dashboards.
//!
//! This crate turns irregular, per-event health records (workouts, meals,
//! nights of sleep, lab results) into date-aligned daily series, thins them
//! to a point budget while keeping their exact endpoints, and produces axis
//! labels whose granularity adapts to the number of points.
//!
//! # Features
//!
//! - **Aggregation**: group records by calendar date and reduce each day per
//!   metric by sum or running mean ([`aggregate`])
//! - **Downsampling**: keep endpoints, evenly strided points and periodic
//!   markers within a budget ([`downsample`], [`downsample_set`])
//! - **Axis labels**: weekday, daily, weekly or monthly labels by series
//!   length ([`format_labels`], [`format_tooltip_label`])
//! - **Charts**: one parameterised pipeline driven by [`ChartConfig`] values
//!   ([`build_chart`])
//!
//! Everything here is synchronous and pure: inputs are borrowed, results are
//! returned by value, and nothing is cached between calls.
//!
//! # Quick Start
//!
//! ```
//! use vitals_core::{ChartConfig, EngineConfig, build_chart};
//! use vitals_types::RawRecord;
//!
//! let json = r#"[
//!     {"date": "2025-01-01", "type": "activity", "sport": "Run", "calories": 100, "average_heartrate": 150},
//!     {"date": "2025-01-01", "type": "activity", "sport": "Ride", "calories": 50},
//!     {"date": "2025-01-02", "type": "activity", "sport": "Run", "calories": 80},
//!     {"date": null, "type": "activity", "sport": "Run", "calories": 999}
//! ]"#;
//! let records: Vec<RawRecord> = serde_json::from_str(json)?;
//!
//! let chart = build_chart(&records, &ChartConfig::activity(), &EngineConfig::default());
//!
//! assert_eq!(chart.labels, vec!["Wed", "Thu"]);
//! assert_eq!(chart.dataset("active_calories").unwrap().values, vec![Some(150.0), Some(80.0)]);
//! assert_eq!(chart.dataset("heart_rate").unwrap().values, vec![Some(150.0), None]);
//! assert_eq!(chart.skipped.total(), 1);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod aggregate;
pub mod chart;
pub mod config;
pub mod downsample;
pub mod error;
pub mod labels;
pub mod series;

// Re-export types
pub use vitals_types;

pub use aggregate::{
    Accumulator, Aggregation, DailyBucket, DailyBucketMap, DateRange, MetricSpec, RecordFilter,
    SkipReport, aggregate, aggregate_within,
};
pub use chart::{ChartData, build_chart};
pub use config::{ChartConfig, EngineConfig, PRESET_NAMES, PointBudget};
pub use downsample::{downsample, downsample_set, retained_indices};
pub use error::{Error, Result, SeriesError};
pub use labels::{LabelTier, format_labels, format_tooltip_label, short_month, short_weekday};
pub use series::{Dataset, Series, SeriesSet};
