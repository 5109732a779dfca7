//! Core record types for health data.

use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use time::{Date, UtcOffset};

use crate::date::RecordTime;
use crate::metric::Metric;

/// Sport of an activity, normalised from provider-specific names.
///
/// Strava-style names map onto the closest family: `TrailRun` and
/// `VirtualRun` are [`Sport::Run`], `EBikeRide` is [`Sport::Ride`], and so on.
/// Unknown names become [`Sport::Other`].
///
/// ```
/// use vitals_types::Sport;
///
/// assert_eq!(Sport::from_name("TrailRun"), Sport::Run);
/// assert_eq!(Sport::from_name("virtual_ride"), Sport::Ride);
/// assert_eq!(Sport::from_name("Kitesurf"), Sport::Other);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(from = "String", into = "String")
)]
pub enum Sport {
    Run,
    Ride,
    Walk,
    Hike,
    Swim,
    Workout,
    #[default]
    Other,
}

impl Sport {
    /// Map a provider sport name onto a sport family (case- and separator-insensitive).
    pub fn from_name(name: &str) -> Self {
        let key: String = name
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_lowercase())
            .collect();

        match key.as_str() {
            "run" | "trailrun" | "virtualrun" | "treadmill" => Sport::Run,
            "ride" | "virtualride" | "ebikeride" | "gravelride" | "mountainbikeride"
            | "cycling" => Sport::Ride,
            "walk" => Sport::Walk,
            "hike" => Sport::Hike,
            "swim" | "openwaterswim" => Sport::Swim,
            "workout" | "weighttraining" | "crossfit" | "yoga" | "hiit" => Sport::Workout,
            _ => Sport::Other,
        }
    }
}

impl fmt::Display for Sport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Sport::Run => "run",
            Sport::Ride => "ride",
            Sport::Walk => "walk",
            Sport::Hike => "hike",
            Sport::Swim => "swim",
            Sport::Workout => "workout",
            Sport::Other => "other",
        };
        f.write_str(name)
    }
}

impl From<String> for Sport {
    fn from(value: String) -> Self {
        Sport::from_name(&value)
    }
}

impl From<Sport> for String {
    fn from(value: Sport) -> Self {
        value.to_string()
    }
}

/// One workout, as exported by an activity tracker.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct ActivityRecord {
    /// Sport family.
    pub sport: Sport,
    /// Free-form tags attached upstream (e.g. "easy", "tempo", "long").
    pub tags: Vec<String>,
    /// Distance in metres.
    pub distance_m: Option<f64>,
    /// Moving time in seconds.
    pub moving_time_s: Option<f64>,
    /// Energy burned in kcal.
    pub calories: Option<f64>,
    /// Average heart rate in bpm.
    pub average_heartrate: Option<f64>,
    /// Maximum heart rate in bpm.
    pub max_heartrate: Option<f64>,
    /// Elevation gain in metres.
    pub elevation_gain_m: Option<f64>,
}

/// One meal or food log entry.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct NutritionRecord {
    pub calories: Option<f64>,
    pub protein_g: Option<f64>,
    pub carbs_g: Option<f64>,
    pub fat_g: Option<f64>,
    pub fiber_g: Option<f64>,
}

/// One night of sleep.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct SleepRecord {
    /// Tracker sleep score, 0-100.
    pub score: Option<f64>,
    /// Total sleep in minutes.
    pub duration_min: Option<f64>,
    pub deep_min: Option<f64>,
    pub rem_min: Option<f64>,
    /// Overnight resting heart rate in bpm.
    pub resting_heartrate: Option<f64>,
    /// Heart-rate variability in ms.
    pub hrv_ms: Option<f64>,
}

/// One lab result.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BloodMarkerRecord {
    /// Marker name as reported by the lab (matched case-insensitively).
    pub marker: String,
    /// Measured value; absent if the lab reported a non-numeric result.
    #[cfg_attr(feature = "serde", serde(default))]
    pub value: Option<f64>,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub unit: Option<String>,
}

/// Discriminant of [`RecordKind`], used by filters and metric sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum RecordKindTag {
    Activity,
    Nutrition,
    Sleep,
    BloodMarker,
}

impl fmt::Display for RecordKindTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RecordKindTag::Activity => "activity",
            RecordKindTag::Nutrition => "nutrition",
            RecordKindTag::Sleep => "sleep",
            RecordKindTag::BloodMarker => "blood_marker",
        };
        f.write_str(name)
    }
}

/// The source-specific payload of a record.
///
/// Serialised with an internal `"type"` tag:
///
/// ```json
/// { "type": "activity", "sport": "Run", "distance_m": 5000.0 }
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(tag = "type", rename_all = "snake_case")
)]
pub enum RecordKind {
    Activity(ActivityRecord),
    Nutrition(NutritionRecord),
    Sleep(SleepRecord),
    BloodMarker(BloodMarkerRecord),
}

impl RecordKind {
    /// The discriminant of this payload.
    pub fn tag(&self) -> RecordKindTag {
        match self {
            RecordKind::Activity(_) => RecordKindTag::Activity,
            RecordKind::Nutrition(_) => RecordKindTag::Nutrition,
            RecordKind::Sleep(_) => RecordKindTag::Sleep,
            RecordKind::BloodMarker(_) => RecordKindTag::BloodMarker,
        }
    }
}

impl From<ActivityRecord> for RecordKind {
    fn from(value: ActivityRecord) -> Self {
        RecordKind::Activity(value)
    }
}

impl From<NutritionRecord> for RecordKind {
    fn from(value: NutritionRecord) -> Self {
        RecordKind::Nutrition(value)
    }
}

impl From<SleepRecord> for RecordKind {
    fn from(value: SleepRecord) -> Self {
        RecordKind::Sleep(value)
    }
}

impl From<BloodMarkerRecord> for RecordKind {
    fn from(value: BloodMarkerRecord) -> Self {
        RecordKind::BloodMarker(value)
    }
}

/// Why a record could not be placed on a calendar date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DateIssue {
    /// No date at all (null, absent or blank).
    Missing,
    /// Date text that is neither a day nor a timestamp.
    Unparseable,
}

/// One observed event from an upstream source.
///
/// ```
/// use vitals_types::{ActivityRecord, Metric, RawRecord, Sport};
/// use time::macros::date;
///
/// let run = RawRecord::new(
///     date!(2025-01-01),
///     ActivityRecord {
///         sport: Sport::Run,
///         calories: Some(420.0),
///         ..Default::default()
///     },
/// );
///
/// assert_eq!(run.value(&Metric::ActiveCalories), Some(420.0));
/// assert_eq!(run.value(&Metric::HeartRate), None);
/// assert_eq!(run.value(&Metric::Protein), None);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RawRecord {
    /// When the event happened; `None` when the source sent no date.
    #[cfg_attr(
        feature = "serde",
        serde(default, alias = "timestamp", skip_serializing_if = "Option::is_none")
    )]
    pub date: Option<RecordTime>,
    /// Source-specific payload.
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub kind: RecordKind,
}

impl RawRecord {
    /// Create a dated record.
    pub fn new(date: impl Into<RecordTime>, kind: impl Into<RecordKind>) -> Self {
        Self {
            date: Some(date.into()),
            kind: kind.into(),
        }
    }

    /// Create a record with no date (it will be skipped by aggregation).
    pub fn undated(kind: impl Into<RecordKind>) -> Self {
        Self {
            date: None,
            kind: kind.into(),
        }
    }

    /// The calendar date of this record in the given reporting offset.
    ///
    /// # Errors
    ///
    /// Returns [`DateIssue::Missing`] for absent or blank dates and
    /// [`DateIssue::Unparseable`] for text that is not a date.
    pub fn calendar_date(&self, offset: UtcOffset) -> Result<Date, DateIssue> {
        match &self.date {
            None => Err(DateIssue::Missing),
            Some(time) if time.is_blank() => Err(DateIssue::Missing),
            Some(time) => time.date_in(offset).ok_or(DateIssue::Unparseable),
        }
    }

    /// Discriminant of the payload.
    pub fn kind_tag(&self) -> RecordKindTag {
        self.kind.tag()
    }

    /// Sport, for activity records.
    pub fn sport(&self) -> Option<Sport> {
        match &self.kind {
            RecordKind::Activity(activity) => Some(activity.sport),
            _ => None,
        }
    }

    /// Whether the record carries the given tag (case-insensitive).
    pub fn has_tag(&self, tag: &str) -> bool {
        match &self.kind {
            RecordKind::Activity(activity) => activity
                .tags
                .iter()
                .any(|candidate| candidate.trim().eq_ignore_ascii_case(tag.trim())),
            _ => false,
        }
    }

    /// Read one metric.
    ///
    /// Returns `None` when the record is of another kind, does not report
    /// the metric, or reports a non-finite value.
    pub fn value(&self, metric: &Metric) -> Option<f64> {
        let raw = match (&self.kind, metric) {
            (RecordKind::Activity(a), Metric::ActiveCalories) => a.calories,
            (RecordKind::Activity(a), Metric::Distance) => a.distance_m,
            (RecordKind::Activity(a), Metric::MovingTime) => a.moving_time_s,
            (RecordKind::Activity(a), Metric::ElevationGain) => a.elevation_gain_m,
            (RecordKind::Activity(a), Metric::HeartRate) => a.average_heartrate,
            (RecordKind::Activity(a), Metric::MaxHeartRate) => a.max_heartrate,
            (RecordKind::Nutrition(n), Metric::CaloriesConsumed) => n.calories,
            (RecordKind::Nutrition(n), Metric::Protein) => n.protein_g,
            (RecordKind::Nutrition(n), Metric::Carbs) => n.carbs_g,
            (RecordKind::Nutrition(n), Metric::Fat) => n.fat_g,
            (RecordKind::Nutrition(n), Metric::Fiber) => n.fiber_g,
            (RecordKind::Sleep(s), Metric::SleepScore) => s.score,
            (RecordKind::Sleep(s), Metric::SleepDuration) => s.duration_min,
            (RecordKind::Sleep(s), Metric::DeepSleep) => s.deep_min,
            (RecordKind::Sleep(s), Metric::RemSleep) => s.rem_min,
            (RecordKind::Sleep(s), Metric::RestingHeartRate) => s.resting_heartrate,
            (RecordKind::Sleep(s), Metric::Hrv) => s.hrv_ms,
            (RecordKind::BloodMarker(b), Metric::BloodMarker(marker))
                if b.marker.trim().eq_ignore_ascii_case(marker) =>
            {
                b.value
            }
            _ => None,
        };
        raw.filter(|value| value.is_finite())
    }
}
