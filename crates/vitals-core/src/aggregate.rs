//! Grouping raw records into daily buckets.
//!
//! [`aggregate`] resolves every record to a calendar date in one reporting
//! offset, then folds each record into the bucket of that date once per
//! [`MetricSpec`] whose filter accepts it. Sums add up whatever was reported;
//! means are kept incrementally so a bucket never stores its inputs.
//!
//! Records without a usable date are not errors: they are counted in
//! [`SkipReport`] and logged at trace level.
//!
//! # Example
//!
//! ```
//! use vitals_core::{MetricSpec, aggregate};
//! use vitals_types::{ActivityRecord, Metric, RawRecord};
//! use time::UtcOffset;
//! use time::macros::date;
//!
//! let run = |day, kcal| RawRecord::new(day, ActivityRecord {
//!     calories: Some(kcal),
//!     ..Default::default()
//! });
//! let records = vec![
//!     run(date!(2025-01-01), 100.0),
//!     run(date!(2025-01-01), 50.0),
//!     run(date!(2025-01-02), 80.0),
//! ];
//!
//! let result = aggregate(&records, &[MetricSpec::sum(Metric::ActiveCalories)], UtcOffset::UTC);
//!
//! let calories = result.series("active_calories").unwrap();
//! assert_eq!(calories.values(), &[150.0, 80.0]);
//! assert_eq!(result.skipped.total(), 0);
//! ```

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use time::{Date, UtcOffset};
use tracing::{debug, trace, warn};

use vitals_types::date::serde_date;
use vitals_types::{DateIssue, Metric, RawRecord, RecordKindTag, Reduction, Sport};

use crate::series::{Dataset, Series, SeriesSet};

/// Which records a [`MetricSpec`] applies to.
///
/// Filters compose: `All` and `AnyOf` combine sub-filters, `Not` inverts one.
/// In TOML configuration they read naturally:
///
/// ```toml
/// filter = { sport = "run" }
/// filter = { all = [{ sport = "run" }, { not = { tag = "race" } }] }
/// ```
///
/// [`RecordFilter::Custom`] wraps an arbitrary predicate and cannot be
/// serialized.
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordFilter {
    /// Every record.
    #[default]
    Any,
    /// Activity records of one sport family.
    Sport(Sport),
    /// Activity records carrying a tag (case-insensitive).
    Tag(String),
    /// Records of one kind.
    Kind(RecordKindTag),
    /// Records matching every sub-filter.
    All(Vec<RecordFilter>),
    /// Records matching at least one sub-filter.
    AnyOf(Vec<RecordFilter>),
    /// Records not matching the sub-filter.
    Not(Box<RecordFilter>),
    /// Records accepted by a caller-supplied predicate.
    #[serde(skip)]
    Custom(Arc<dyn Fn(&RawRecord) -> bool + Send + Sync>),
}

impl RecordFilter {
    /// Wrap an arbitrary predicate.
    pub fn custom(predicate: impl Fn(&RawRecord) -> bool + Send + Sync + 'static) -> Self {
        RecordFilter::Custom(Arc::new(predicate))
    }

    /// Invert this filter.
    pub fn negate(self) -> Self {
        RecordFilter::Not(Box::new(self))
    }

    /// Whether the record passes this filter.
    pub fn matches(&self, record: &RawRecord) -> bool {
        match self {
            RecordFilter::Any => true,
            RecordFilter::Sport(sport) => record.sport() == Some(*sport),
            RecordFilter::Tag(tag) => record.has_tag(tag),
            RecordFilter::Kind(kind) => record.kind_tag() == *kind,
            RecordFilter::All(filters) => filters.iter().all(|f| f.matches(record)),
            RecordFilter::AnyOf(filters) => filters.iter().any(|f| f.matches(record)),
            RecordFilter::Not(filter) => !filter.matches(record),
            RecordFilter::Custom(predicate) => predicate(record),
        }
    }
}

impl fmt::Debug for RecordFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordFilter::Any => write!(f, "Any"),
            RecordFilter::Sport(sport) => f.debug_tuple("Sport").field(sport).finish(),
            RecordFilter::Tag(tag) => f.debug_tuple("Tag").field(tag).finish(),
            RecordFilter::Kind(kind) => f.debug_tuple("Kind").field(kind).finish(),
            RecordFilter::All(filters) => f.debug_tuple("All").field(filters).finish(),
            RecordFilter::AnyOf(filters) => f.debug_tuple("AnyOf").field(filters).finish(),
            RecordFilter::Not(filter) => f.debug_tuple("Not").field(filter).finish(),
            RecordFilter::Custom(_) => write!(f, "Custom(..)"),
        }
    }
}

/// One output column of an aggregation: which metric, how to reduce it, and
/// which records count.
///
/// When deserialized, `name` defaults to the metric name, `reduction` to the
/// metric's default reduction and `filter` to [`RecordFilter::Any`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "MetricSpecDef")]
pub struct MetricSpec {
    /// Column name; unique within one aggregation.
    pub name: String,
    /// Metric read from each record.
    pub metric: Metric,
    /// Daily reduction.
    pub reduction: Reduction,
    /// Applicability predicate.
    pub filter: RecordFilter,
}

#[derive(Deserialize)]
struct MetricSpecDef {
    #[serde(default)]
    name: Option<String>,
    metric: Metric,
    #[serde(default)]
    reduction: Option<Reduction>,
    #[serde(default)]
    filter: RecordFilter,
}

impl From<MetricSpecDef> for MetricSpec {
    fn from(def: MetricSpecDef) -> Self {
        let reduction = def.reduction.unwrap_or_else(|| def.metric.default_reduction());
        let mut spec = MetricSpec::with_reduction(def.metric, reduction).with_filter(def.filter);
        if let Some(name) = def.name {
            spec.name = name;
        }
        spec
    }
}

impl MetricSpec {
    /// A spec using the metric's default reduction.
    pub fn new(metric: Metric) -> Self {
        let reduction = metric.default_reduction();
        Self::with_reduction(metric, reduction)
    }

    /// A summed spec.
    pub fn sum(metric: Metric) -> Self {
        Self::with_reduction(metric, Reduction::Sum)
    }

    /// A spec averaging over records that report the metric.
    pub fn mean(metric: Metric) -> Self {
        Self::with_reduction(metric, Reduction::Mean)
    }

    /// A spec with an explicit reduction.
    pub fn with_reduction(metric: Metric, reduction: Reduction) -> Self {
        Self {
            name: metric.name(),
            metric,
            reduction,
            filter: RecordFilter::Any,
        }
    }

    /// Rename the output column.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Restrict which records count.
    pub fn with_filter(mut self, filter: RecordFilter) -> Self {
        self.filter = filter;
        self
    }
}

/// Inclusive calendar-date window.
///
/// ```
/// use vitals_core::DateRange;
/// use time::macros::date;
///
/// let january = DateRange::new()
///     .since(date!(2025-01-01))
///     .until(date!(2025-01-31));
///
/// assert!(january.contains(date!(2025-01-31)));
/// assert!(!january.contains(date!(2025-02-01)));
/// assert!(DateRange::new().contains(date!(1999-12-31)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DateRange {
    /// First date kept.
    #[serde(with = "serde_date::option", skip_serializing_if = "Option::is_none")]
    pub since: Option<Date>,
    /// Last date kept.
    #[serde(with = "serde_date::option", skip_serializing_if = "Option::is_none")]
    pub until: Option<Date>,
}

impl DateRange {
    /// An unbounded range.
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep dates on or after `date`.
    pub fn since(mut self, date: Date) -> Self {
        self.since = Some(date);
        self
    }

    /// Keep dates on or before `date`.
    pub fn until(mut self, date: Date) -> Self {
        self.until = Some(date);
        self
    }

    /// Whether the range has no bounds.
    pub fn is_unbounded(&self) -> bool {
        self.since.is_none() && self.until.is_none()
    }

    /// Whether `date` lies in the range.
    pub fn contains(&self, date: Date) -> bool {
        self.since.is_none_or(|since| date >= since) && self.until.is_none_or(|until| date <= until)
    }
}

/// Running reduction of one metric over one day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "reduction", rename_all = "lowercase")]
pub enum Accumulator {
    /// Running total.
    Sum {
        /// Sum of contributed values.
        total: f64,
        /// Number of contributing records.
        count: usize,
    },
    /// Incremental mean.
    Mean {
        /// Mean of contributed values (0 while `count` is 0).
        mean: f64,
        /// Number of contributing records.
        count: usize,
    },
}

impl Accumulator {
    /// An empty accumulator for the given reduction.
    pub fn new(reduction: Reduction) -> Self {
        match reduction {
            Reduction::Sum => Accumulator::Sum {
                total: 0.0,
                count: 0,
            },
            Reduction::Mean => Accumulator::Mean {
                mean: 0.0,
                count: 0,
            },
        }
    }

    /// Fold one value in.
    pub fn push(&mut self, value: f64) {
        match self {
            Accumulator::Sum { total, count } => {
                *total += value;
                *count += 1;
            }
            Accumulator::Mean { mean, count } => {
                let n = *count as f64;
                *mean = (*mean * n + value) / (n + 1.0);
                *count += 1;
            }
        }
    }

    /// The reduced value.
    ///
    /// Sums report their total even when nothing contributed (0). Means
    /// with no contributions report `None`, never 0.
    pub fn value(&self) -> Option<f64> {
        match *self {
            Accumulator::Sum { total, .. } => Some(total),
            Accumulator::Mean { count: 0, .. } => None,
            Accumulator::Mean { mean, .. } => Some(mean),
        }
    }

    /// Number of contributing records.
    pub fn count(&self) -> usize {
        match *self {
            Accumulator::Sum { count, .. } | Accumulator::Mean { count, .. } => count,
        }
    }

    /// Which reduction this accumulator performs.
    pub fn reduction(&self) -> Reduction {
        match self {
            Accumulator::Sum { .. } => Reduction::Sum,
            Accumulator::Mean { .. } => Reduction::Mean,
        }
    }
}

/// Aggregated values for one calendar date, one accumulator per spec.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyBucket {
    entries: Vec<(String, Accumulator)>,
}

impl DailyBucket {
    fn for_specs(specs: &[MetricSpec]) -> Self {
        Self {
            entries: specs
                .iter()
                .map(|spec| (spec.name.clone(), Accumulator::new(spec.reduction)))
                .collect(),
        }
    }

    /// The reduced value of the named spec.
    pub fn value(&self, name: &str) -> Option<f64> {
        self.accumulator(name)?.value()
    }

    /// The accumulator of the named spec.
    pub fn accumulator(&self, name: &str) -> Option<&Accumulator> {
        self.entries
            .iter()
            .find(|(entry, _)| entry == name)
            .map(|(_, acc)| acc)
    }

    /// Iterate over `(spec name, accumulator)` in spec order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Accumulator)> {
        self.entries.iter().map(|(name, acc)| (name.as_str(), acc))
    }

    /// Total number of record contributions across all specs.
    pub fn contributions(&self) -> usize {
        self.entries.iter().map(|(_, acc)| acc.count()).sum()
    }
}

/// Chronological map from calendar date to its bucket.
pub type DailyBucketMap = BTreeMap<Date, DailyBucket>;

/// Records left out of an aggregation because of their date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SkipReport {
    /// Records with a null, absent or blank date.
    pub missing_date: usize,
    /// Records whose date text could not be parsed.
    pub unparseable_date: usize,
}

impl SkipReport {
    /// Total number of skipped records.
    pub fn total(&self) -> usize {
        self.missing_date + self.unparseable_date
    }
}

/// Result of [`aggregate`].
#[derive(Debug, Clone)]
pub struct Aggregation {
    /// One bucket per distinct resolved date.
    pub buckets: DailyBucketMap,
    /// Records skipped for date problems.
    pub skipped: SkipReport,
    /// Records with a valid date outside the requested [`DateRange`].
    pub out_of_range: usize,
    specs: Vec<MetricSpec>,
}

impl Aggregation {
    /// The specs actually applied, after dropping duplicate names.
    pub fn specs(&self) -> &[MetricSpec] {
        &self.specs
    }

    /// Number of days.
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    /// Whether no record landed on any day.
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// All specs as one aligned [`SeriesSet`], in spec order.
    pub fn series_set(&self) -> SeriesSet {
        let dates: Vec<Date> = self.buckets.keys().copied().collect();
        let datasets = self
            .specs
            .iter()
            .enumerate()
            .map(|(slot, spec)| {
                let values = self
                    .buckets
                    .values()
                    .map(|bucket| bucket.entries[slot].1.value())
                    .collect();
                Dataset::new(spec.name.clone(), values)
            })
            .collect();
        SeriesSet::from_parts_unchecked(dates, datasets)
    }

    /// One spec as a dense [`Series`].
    ///
    /// Days on which a mean had no qualifying record are left out; sums keep
    /// their zeros.
    pub fn series(&self, name: &str) -> Option<Series> {
        let slot = self.specs.iter().position(|spec| spec.name == name)?;
        let (dates, values) = self
            .buckets
            .iter()
            .filter_map(|(date, bucket)| bucket.entries[slot].1.value().map(|v| (*date, v)))
            .unzip();
        Some(Series::from_parts_unchecked(dates, values))
    }
}

/// Drop specs whose name was already used, keeping the first.
fn dedup_specs(specs: &[MetricSpec]) -> Vec<MetricSpec> {
    let mut seen = HashSet::new();
    let mut unique = Vec::with_capacity(specs.len());
    for spec in specs {
        if seen.insert(spec.name.as_str()) {
            unique.push(spec.clone());
        } else {
            warn!(name = %spec.name, "Ignoring duplicate metric spec name");
        }
    }
    unique
}

/// Group records by calendar date and reduce each day per spec.
///
/// Equivalent to [`aggregate_within`] with an unbounded [`DateRange`].
pub fn aggregate(records: &[RawRecord], specs: &[MetricSpec], zone: UtcOffset) -> Aggregation {
    aggregate_within(records, specs, zone, &DateRange::default())
}

/// Group records by calendar date within `range` and reduce each day per spec.
///
/// - Every distinct resolved date in range gets a bucket, even if none of its
///   records contribute to any spec.
/// - A record is folded into a spec only if the spec's filter accepts it and
///   the record reports the metric.
/// - Records with missing or unparseable dates are counted in
///   [`Aggregation::skipped`]; dated records outside `range` are counted in
///   [`Aggregation::out_of_range`].
pub fn aggregate_within(
    records: &[RawRecord],
    specs: &[MetricSpec],
    zone: UtcOffset,
    range: &DateRange,
) -> Aggregation {
    let specs = dedup_specs(specs);
    let mut buckets = DailyBucketMap::new();
    let mut skipped = SkipReport::default();
    let mut out_of_range = 0;

    for (index, record) in records.iter().enumerate() {
        let date = match record.calendar_date(zone) {
            Ok(date) => date,
            Err(DateIssue::Missing) => {
                trace!(index, kind = %record.kind_tag(), "Skipping record without a date");
                skipped.missing_date += 1;
                continue;
            }
            Err(DateIssue::Unparseable) => {
                trace!(
                    index,
                    kind = %record.kind_tag(),
                    date = ?record.date,
                    "Skipping record with unparseable date"
                );
                skipped.unparseable_date += 1;
                continue;
            }
        };

        if !range.contains(date) {
            out_of_range += 1;
            continue;
        }

        let bucket = buckets
            .entry(date)
            .or_insert_with(|| DailyBucket::for_specs(&specs));

        for (slot, spec) in specs.iter().enumerate() {
            if !spec.filter.matches(record) {
                continue;
            }
            if let Some(value) = record.value(&spec.metric) {
                bucket.entries[slot].1.push(value);
            }
        }
    }

    debug!(
        records = records.len(),
        days = buckets.len(),
        specs = specs.len(),
        missing_date = skipped.missing_date,
        unparseable_date = skipped.unparseable_date,
        out_of_range,
        "Aggregated records into daily buckets"
    );

    Aggregation {
        buckets,
        skipped,
        out_of_range,
        specs,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{date, datetime, offset};
    use vitals_types::{ActivityRecord, BloodMarkerRecord, NutritionRecord, RecordTime, SleepRecord};

    fn activity(day: Date, sport: Sport, kcal: Option<f64>, hr: Option<f64>) -> RawRecord {
        RawRecord::new(
            day,
            ActivityRecord {
                sport,
                calories: kcal,
                average_heartrate: hr,
                ..Default::default()
            },
        )
    }

    // ===== Accumulator =====

    #[test]
    fn test_sum_accumulator() {
        let mut acc = Accumulator::new(Reduction::Sum);
        assert_eq!(acc.value(), Some(0.0));
        acc.push(100.0);
        acc.push(50.0);
        assert_eq!(acc.value(), Some(150.0));
        assert_eq!(acc.count(), 2);
        assert_eq!(acc.reduction(), Reduction::Sum);
    }

    #[test]
    fn test_mean_accumulator_empty_is_none() {
        let acc = Accumulator::new(Reduction::Mean);
        assert_eq!(acc.value(), None);
        assert_eq!(acc.count(), 0);
    }

    #[test]
    fn test_mean_accumulator_incremental() {
        let mut acc = Accumulator::new(Reduction::Mean);
        acc.push(150.0);
        assert_eq!(acc.value(), Some(150.0));
        acc.push(130.0);
        acc.push(150.0);
        let mean = acc.value().unwrap();
        assert!((mean - 143.333_333).abs() < 1e-4);
    }

    // ===== Sum and mean aggregation =====

    #[test]
    fn test_sum_per_day() {
        let records = vec![
            activity(date!(2025 - 01 - 01), Sport::Run, Some(100.0), None),
            activity(date!(2025 - 01 - 01), Sport::Ride, Some(50.0), None),
            activity(date!(2025 - 01 - 02), Sport::Run, Some(80.0), None),
        ];

        let result = aggregate(
            &records,
            &[MetricSpec::sum(Metric::ActiveCalories)],
            UtcOffset::UTC,
        );

        assert_eq!(result.len(), 2);
        assert_eq!(
            result.buckets[&date!(2025 - 01 - 01)].value("active_calories"),
            Some(150.0)
        );
        assert_eq!(
            result.buckets[&date!(2025 - 01 - 02)].value("active_calories"),
            Some(80.0)
        );
    }

    #[test]
    fn test_sum_of_day_with_only_absent_values_is_zero() {
        let records = vec![activity(date!(2025 - 01 - 01), Sport::Run, None, Some(140.0))];

        let result = aggregate(
            &records,
            &[MetricSpec::sum(Metric::ActiveCalories)],
            UtcOffset::UTC,
        );

        assert_eq!(
            result.buckets[&date!(2025 - 01 - 01)].value("active_calories"),
            Some(0.0)
        );
    }

    #[test]
    fn test_mean_filtered_to_runs() {
        let records = vec![
            activity(date!(2025 - 01 - 01), Sport::Run, None, Some(150.0)),
            activity(date!(2025 - 01 - 02), Sport::Run, None, Some(130.0)),
            activity(date!(2025 - 01 - 02), Sport::Run, None, Some(150.0)),
            activity(date!(2025 - 01 - 02), Sport::Ride, None, Some(110.0)),
        ];
        let spec = MetricSpec::mean(Metric::HeartRate).with_filter(RecordFilter::Sport(Sport::Run));

        let result = aggregate(&records, &[spec], UtcOffset::UTC);

        let hr = result.series("heart_rate").unwrap();
        assert_eq!(hr.values()[0], 150.0);
        assert!((hr.values()[1] - 140.0).abs() < 1e-9);
    }

    #[test]
    fn test_mean_without_qualifying_records_is_none_not_zero() {
        let records = vec![
            activity(date!(2025 - 01 - 01), Sport::Ride, Some(300.0), Some(120.0)),
            activity(date!(2025 - 01 - 02), Sport::Run, Some(200.0), Some(150.0)),
        ];
        let specs = [
            MetricSpec::sum(Metric::ActiveCalories),
            MetricSpec::mean(Metric::HeartRate).with_filter(RecordFilter::Sport(Sport::Run)),
        ];

        let result = aggregate(&records, &specs, UtcOffset::UTC);
        let set = result.series_set();

        assert_eq!(set.len(), 2);
        assert_eq!(
            set.dataset("heart_rate").unwrap().values,
            vec![None, Some(150.0)]
        );
        assert_eq!(
            set.dataset("active_calories").unwrap().values,
            vec![Some(300.0), Some(200.0)]
        );
        assert_eq!(result.series("heart_rate").unwrap().len(), 1);
    }

    #[test]
    fn test_dates_without_contributions_still_get_buckets() {
        let records = vec![
            RawRecord::new(date!(2025 - 01 - 01), SleepRecord::default()),
            RawRecord::new(
                date!(2025 - 01 - 03),
                NutritionRecord {
                    protein_g: Some(25.0),
                    ..Default::default()
                },
            ),
        ];

        let result = aggregate(&records, &[MetricSpec::sum(Metric::Protein)], UtcOffset::UTC);

        assert_eq!(
            result.buckets.keys().copied().collect::<Vec<_>>(),
            vec![date!(2025 - 01 - 01), date!(2025 - 01 - 03)]
        );
        assert_eq!(result.buckets[&date!(2025 - 01 - 01)].contributions(), 0);
    }

    #[test]
    fn test_blood_marker_means() {
        let lab = |day, value| {
            RawRecord::new(
                day,
                BloodMarkerRecord {
                    marker: "Ferritin".to_string(),
                    value: Some(value),
                    unit: None,
                },
            )
        };
        let records = vec![lab(date!(2025 - 03 - 01), 80.0), lab(date!(2025 - 03 - 01), 90.0)];

        let result = aggregate(
            &records,
            &[MetricSpec::new(Metric::blood_marker("ferritin"))],
            UtcOffset::UTC,
        );

        assert_eq!(
            result.buckets[&date!(2025 - 03 - 01)].value("blood:ferritin"),
            Some(85.0)
        );
    }

    // ===== Date handling =====

    #[test]
    fn test_skip_counts() {
        let records = vec![
            RawRecord::undated(SleepRecord::default()),
            RawRecord {
                date: Some(RecordTime::parse_lossy("not a date")),
                kind: SleepRecord::default().into(),
            },
            RawRecord::new(date!(2025 - 01 - 01), SleepRecord::default()),
        ];

        let result = aggregate(&records, &[MetricSpec::new(Metric::SleepScore)], UtcOffset::UTC);

        assert_eq!(result.skipped.missing_date, 1);
        assert_eq!(result.skipped.unparseable_date, 1);
        assert_eq!(result.skipped.total(), 2);
        assert_eq!(result.len(), 1);
    }

    #[test]
    fn test_reporting_offset_moves_instants() {
        let records = vec![RawRecord::new(
            datetime!(2025-01-01 23:30:00 UTC),
            NutritionRecord {
                calories: Some(500.0),
                ..Default::default()
            },
        )];
        let specs = [MetricSpec::sum(Metric::CaloriesConsumed)];

        let utc = aggregate(&records, &specs, UtcOffset::UTC);
        let east = aggregate(&records, &specs, offset!(+2));

        assert!(utc.buckets.contains_key(&date!(2025 - 01 - 01)));
        assert!(east.buckets.contains_key(&date!(2025 - 01 - 02)));
    }

    #[test]
    fn test_instant_shifted_past_calendar_end_is_skipped() {
        let records = vec![
            RawRecord::new(
                datetime!(9999-12-31 23:00:00 UTC),
                ActivityRecord {
                    calories: Some(999.0),
                    ..Default::default()
                },
            ),
            activity(date!(2025 - 01 - 01), Sport::Run, Some(100.0), None),
        ];

        let result = aggregate(&records, &[MetricSpec::sum(Metric::ActiveCalories)], offset!(+2));

        assert_eq!(result.skipped.unparseable_date, 1);
        assert_eq!(result.len(), 1);
        assert_eq!(
            result.buckets[&date!(2025 - 01 - 01)].value("active_calories"),
            Some(100.0)
        );
    }

    #[test]
    fn test_date_range_drops_without_skipping() {
        let records = vec![
            activity(date!(2024 - 12 - 31), Sport::Run, Some(1.0), None),
            activity(date!(2025 - 01 - 01), Sport::Run, Some(2.0), None),
            activity(date!(2025 - 01 - 02), Sport::Run, Some(3.0), None),
        ];
        let range = DateRange::new()
            .since(date!(2025 - 01 - 01))
            .until(date!(2025 - 01 - 01));

        let result = aggregate_within(
            &records,
            &[MetricSpec::sum(Metric::ActiveCalories)],
            UtcOffset::UTC,
            &range,
        );

        assert_eq!(result.len(), 1);
        assert_eq!(result.out_of_range, 2);
        assert_eq!(result.skipped.total(), 0);
    }

    // ===== Specs and filters =====

    #[test]
    fn test_duplicate_spec_names_first_wins() {
        let records = vec![activity(date!(2025 - 01 - 01), Sport::Run, Some(10.0), Some(100.0))];
        let specs = [
            MetricSpec::sum(Metric::ActiveCalories).named("x"),
            MetricSpec::mean(Metric::HeartRate).named("x"),
        ];

        let result = aggregate(&records, &specs, UtcOffset::UTC);

        assert_eq!(result.specs().len(), 1);
        assert_eq!(result.buckets[&date!(2025 - 01 - 01)].value("x"), Some(10.0));
    }

    #[test]
    fn test_composite_filters() {
        let mut tempo = activity(date!(2025 - 01 - 01), Sport::Run, None, None);
        if let vitals_types::RecordKind::Activity(a) = &mut tempo.kind {
            a.tags.push("tempo".to_string());
        }
        let easy = activity(date!(2025 - 01 - 01), Sport::Run, None, None);
        let ride = activity(date!(2025 - 01 - 01), Sport::Ride, None, None);

        let runs_not_tempo = RecordFilter::All(vec![
            RecordFilter::Sport(Sport::Run),
            RecordFilter::Tag("TEMPO".to_string()).negate(),
        ]);
        assert!(!runs_not_tempo.matches(&tempo));
        assert!(runs_not_tempo.matches(&easy));
        assert!(!runs_not_tempo.matches(&ride));

        let either = RecordFilter::AnyOf(vec![
            RecordFilter::Sport(Sport::Ride),
            RecordFilter::Tag("tempo".to_string()),
        ]);
        assert!(either.matches(&tempo));
        assert!(!either.matches(&easy));
        assert!(either.matches(&ride));

        assert!(RecordFilter::Kind(RecordKindTag::Activity).matches(&ride));
        assert!(RecordFilter::Any.matches(&ride));
    }

    #[test]
    fn test_custom_filter() {
        let long = RecordFilter::custom(|record| {
            record.value(&Metric::ActiveCalories).is_some_and(|kcal| kcal > 500.0)
        });
        assert!(long.matches(&activity(date!(2025 - 01 - 01), Sport::Run, Some(800.0), None)));
        assert!(!long.matches(&activity(date!(2025 - 01 - 01), Sport::Run, Some(200.0), None)));
        assert_eq!(format!("{long:?}"), "Custom(..)");
    }

    #[test]
    fn test_metric_spec_builders() {
        let spec = MetricSpec::new(Metric::HeartRate);
        assert_eq!(spec.name, "heart_rate");
        assert_eq!(spec.reduction, Reduction::Mean);

        let spec = MetricSpec::sum(Metric::Distance).named("km");
        assert_eq!(spec.name, "km");
        assert_eq!(spec.reduction, Reduction::Sum);
    }

    #[test]
    fn test_metric_spec_deserialize_defaults() {
        let spec: MetricSpec = serde_json::from_str(r#"{"metric": "resting_hr"}"#).unwrap();
        assert_eq!(spec.name, "resting_heart_rate");
        assert_eq!(spec.metric, Metric::RestingHeartRate);
        assert_eq!(spec.reduction, Reduction::Mean);
        assert!(matches!(spec.filter, RecordFilter::Any));

        let spec: MetricSpec = serde_json::from_str(
            r#"{"name": "run_hr", "metric": "heart_rate", "reduction": "mean", "filter": {"sport": "run"}}"#,
        )
        .unwrap();
        assert_eq!(spec.name, "run_hr");
        assert!(matches!(spec.filter, RecordFilter::Sport(Sport::Run)));
    }

    #[test]
    fn test_filter_serde_shapes() {
        let filter: RecordFilter =
            serde_json::from_str(r#"{"all": [{"kind": "activity"}, {"not": {"tag": "race"}}]}"#)
                .unwrap();
        assert!(matches!(filter, RecordFilter::All(ref parts) if parts.len() == 2));

        let any: RecordFilter = serde_json::from_str(r#""any""#).unwrap();
        assert!(matches!(any, RecordFilter::Any));

        assert!(serde_json::to_string(&RecordFilter::custom(|_| true)).is_err());
    }

    #[test]
    fn test_empty_input() {
        let result = aggregate(&[], &[MetricSpec::new(Metric::Hrv)], UtcOffset::UTC);
        assert!(result.is_empty());
        assert!(result.series_set().is_empty());
        assert_eq!(result.series_set().datasets().len(), 1);
    }
}
