//! Date-indexed series.
//!
//! A [`Series`] is one dense metric column: every date has a value. A
//! [`SeriesSet`] is several metric columns sharing one date axis, where a
//! missing value (`None`) marks a day on which a mean metric had no
//! qualifying record. Gaps are kept as gaps and never filled with zero.

use serde::{Deserialize, Serialize};
use time::Date;

use crate::error::SeriesError;

/// Check that dates are strictly increasing.
fn check_increasing(dates: &[Date]) -> Result<(), SeriesError> {
    for (index, pair) in dates.windows(2).enumerate() {
        if pair[1] <= pair[0] {
            return Err(SeriesError::NotIncreasing {
                index: index + 1,
                previous: pair[0],
                next: pair[1],
            });
        }
    }
    Ok(())
}

/// One metric as an ordered, date-indexed column.
///
/// # Example
///
/// ```
/// use vitals_core::Series;
/// use time::macros::date;
///
/// let series = Series::new(
///     vec![date!(2025-01-01), date!(2025-01-02)],
///     vec![150.0, 80.0],
/// )?;
/// assert_eq!(series.len(), 2);
/// assert_eq!(series.get(1), Some((date!(2025-01-02), 80.0)));
///
/// // Out-of-order dates are rejected.
/// assert!(Series::new(vec![date!(2025-01-02), date!(2025-01-01)], vec![1.0, 2.0]).is_err());
/// # Ok::<(), vitals_core::SeriesError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Series {
    #[serde(with = "vitals_types::date::serde_date::vec")]
    dates: Vec<Date>,
    values: Vec<f64>,
}

impl Series {
    /// Build a series, checking that both columns have the same length and
    /// that dates are strictly increasing.
    pub fn new(dates: Vec<Date>, values: Vec<f64>) -> Result<Self, SeriesError> {
        if dates.len() != values.len() {
            return Err(SeriesError::LengthMismatch {
                dates: dates.len(),
                values: values.len(),
            });
        }
        check_increasing(&dates)?;
        Ok(Self { dates, values })
    }

    /// Build a series from `(date, value)` pairs.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (Date, f64)>) -> Result<Self, SeriesError> {
        let (dates, values) = pairs.into_iter().unzip();
        Self::new(dates, values)
    }

    /// Build a series whose columns are already known to be consistent.
    pub(crate) fn from_parts_unchecked(dates: Vec<Date>, values: Vec<f64>) -> Self {
        debug_assert_eq!(dates.len(), values.len());
        debug_assert!(check_increasing(&dates).is_ok());
        Self { dates, values }
    }

    /// The date column.
    pub fn dates(&self) -> &[Date] {
        &self.dates
    }

    /// The value column.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Number of points.
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    /// Whether the series has no points.
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// The point at `index`.
    pub fn get(&self, index: usize) -> Option<(Date, f64)> {
        Some((*self.dates.get(index)?, *self.values.get(index)?))
    }

    /// Iterate over `(date, value)` points in date order.
    pub fn iter(&self) -> impl Iterator<Item = (Date, f64)> + '_ {
        self.dates.iter().copied().zip(self.values.iter().copied())
    }

    /// Keep only the points at the given ascending indices.
    pub(crate) fn select(&self, indices: &[usize]) -> Self {
        Self {
            dates: indices.iter().map(|&i| self.dates[i]).collect(),
            values: indices.iter().map(|&i| self.values[i]).collect(),
        }
    }

    /// Split into the date and value columns.
    pub fn into_parts(self) -> (Vec<Date>, Vec<f64>) {
        (self.dates, self.values)
    }
}

/// One named metric column of a [`SeriesSet`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    /// Metric spec name (e.g. `active_calories`).
    pub name: String,
    /// One value per date; `None` where a mean had nothing to average.
    pub values: Vec<Option<f64>>,
}

impl Dataset {
    /// Create a dataset.
    pub fn new(name: impl Into<String>, values: Vec<Option<f64>>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    /// Number of days with a value.
    pub fn defined_count(&self) -> usize {
        self.values.iter().filter(|value| value.is_some()).count()
    }

    /// Smallest and largest defined value.
    pub fn range(&self) -> Option<(f64, f64)> {
        self.values.iter().flatten().fold(None, |acc, &value| match acc {
            None => Some((value, value)),
            Some((lo, hi)) => Some((lo.min(value), hi.max(value))),
        })
    }
}

/// Several metric columns aligned on one date axis.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct SeriesSet {
    #[serde(with = "vitals_types::date::serde_date::vec")]
    dates: Vec<Date>,
    datasets: Vec<Dataset>,
}

impl SeriesSet {
    /// Build a set, checking that every dataset has one value per date and
    /// that dates are strictly increasing.
    pub fn new(dates: Vec<Date>, datasets: Vec<Dataset>) -> Result<Self, SeriesError> {
        check_increasing(&dates)?;
        if let Some(bad) = datasets.iter().find(|d| d.values.len() != dates.len()) {
            return Err(SeriesError::LengthMismatch {
                dates: dates.len(),
                values: bad.values.len(),
            });
        }
        Ok(Self { dates, datasets })
    }

    pub(crate) fn from_parts_unchecked(dates: Vec<Date>, datasets: Vec<Dataset>) -> Self {
        debug_assert!(datasets.iter().all(|d| d.values.len() == dates.len()));
        Self { dates, datasets }
    }

    /// The shared date axis.
    pub fn dates(&self) -> &[Date] {
        &self.dates
    }

    /// All datasets, in metric spec order.
    pub fn datasets(&self) -> &[Dataset] {
        &self.datasets
    }

    /// Look up a dataset by name.
    pub fn dataset(&self, name: &str) -> Option<&Dataset> {
        self.datasets.iter().find(|d| d.name == name)
    }

    /// Number of dates.
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    /// Whether the set has no dates.
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// One dataset as a dense [`Series`], omitting days without a value.
    pub fn series(&self, name: &str) -> Option<Series> {
        let dataset = self.dataset(name)?;
        let (dates, values) = self
            .dates
            .iter()
            .zip(&dataset.values)
            .filter_map(|(date, value)| value.map(|v| (*date, v)))
            .unzip();
        Some(Series::from_parts_unchecked(dates, values))
    }

    /// Keep only the dates at the given ascending indices, in every dataset.
    pub(crate) fn select(&self, indices: &[usize]) -> Self {
        Self {
            dates: indices.iter().map(|&i| self.dates[i]).collect(),
            datasets: self
                .datasets
                .iter()
                .map(|d| Dataset {
                    name: d.name.clone(),
                    values: indices.iter().map(|&i| d.values[i]).collect(),
                })
                .collect(),
        }
    }

    /// Split into the date axis and datasets.
    pub fn into_parts(self) -> (Vec<Date>, Vec<Dataset>) {
        (self.dates, self.datasets)
    }
}
