//! Platform-agnostic record types for personal health dashboards.
//!
//! This crate provides the shared data model consumed by the series engine
//! (vitals-core) and by anything that fetches or exports raw records.
//!
//! # Features
//!
//! - [`RawRecord`]: one observed event (workout, meal, night of sleep, lab
//!   result) as a tagged variant with typed optional metrics
//! - [`Metric`]: the closed set of chartable metrics plus open-ended blood markers
//! - [`RecordTime`] and [`ReportingOffset`]: explicit calendar-date resolution
//! - Error types for parsing names, dates and offsets
//!
//! # Example
//!
//! ```
//! use vitals_types::{Metric, RawRecord, ReportingOffset};
//!
//! let json = r#"{"date": "2025-01-01T06:30:00Z", "type": "sleep", "score": 82, "hrv_ms": 61.5}"#;
//! let record: RawRecord = serde_json::from_str(json)?;
//!
//! assert_eq!(record.value(&Metric::SleepScore), Some(82.0));
//! assert!(record.calendar_date(ReportingOffset::UTC.into()).is_ok());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod date;
pub mod error;
pub mod metric;
pub mod types;

pub use date::{RecordTime, ReportingOffset, parse_date};
pub use error::{ParseError, ParseResult};
pub use metric::{Metric, Reduction};
pub use types::{
    ActivityRecord, BloodMarkerRecord, DateIssue, NutritionRecord, RawRecord, RecordKind,
    RecordKindTag, SleepRecord, Sport,
};
