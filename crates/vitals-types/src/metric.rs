//! Named metrics and how a day's worth of them is reduced.

use core::fmt;
use core::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::ParseError;
use crate::types::RecordKindTag;

/// How several same-day values of one metric collapse into a daily value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum Reduction {
    /// Arithmetic sum (energy, distance, time, grams).
    Sum,
    /// Arithmetic mean over the records that report the metric (rates, scores).
    Mean,
}

impl FromStr for Reduction {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sum" | "total" => Ok(Reduction::Sum),
            "mean" | "avg" | "average" => Ok(Reduction::Mean),
            other => Err(ParseError::UnknownReduction(other.to_string())),
        }
    }
}

impl fmt::Display for Reduction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reduction::Sum => write!(f, "sum"),
            Reduction::Mean => write!(f, "mean"),
        }
    }
}

/// A metric that can be read from a [`RawRecord`](crate::RawRecord).
///
/// Each metric belongs to exactly one record kind (see [`Metric::source`]);
/// reading it from a record of another kind yields nothing.
///
/// Names are snake_case (`active_calories`, `heart_rate`, ...). Blood markers
/// are open-ended and spelled `blood:<marker>`, e.g. `blood:ldl`.
///
/// ```
/// use vitals_types::{Metric, Reduction};
///
/// let hr: Metric = "heart_rate".parse()?;
/// assert_eq!(hr, Metric::HeartRate);
/// assert_eq!(hr.default_reduction(), Reduction::Mean);
///
/// let ldl: Metric = "blood:LDL".parse()?;
/// assert_eq!(ldl, Metric::BloodMarker("ldl".to_string()));
/// assert_eq!(ldl.name(), "blood:ldl");
/// # Ok::<(), vitals_types::ParseError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(try_from = "String", into = "String")
)]
#[non_exhaustive]
pub enum Metric {
    /// Energy burned during an activity, kcal.
    ActiveCalories,
    /// Activity distance, metres.
    Distance,
    /// Activity moving time, seconds.
    MovingTime,
    /// Activity elevation gain, metres.
    ElevationGain,
    /// Average heart rate over an activity, bpm.
    HeartRate,
    /// Maximum heart rate over an activity, bpm.
    MaxHeartRate,
    /// Energy eaten, kcal.
    CaloriesConsumed,
    /// Protein, grams.
    Protein,
    /// Carbohydrates, grams.
    Carbs,
    /// Fat, grams.
    Fat,
    /// Fiber, grams.
    Fiber,
    /// Sleep score reported by the tracker, 0-100.
    SleepScore,
    /// Total sleep, minutes.
    SleepDuration,
    /// Deep sleep, minutes.
    DeepSleep,
    /// REM sleep, minutes.
    RemSleep,
    /// Resting heart rate measured overnight, bpm.
    RestingHeartRate,
    /// Heart-rate variability, milliseconds.
    Hrv,
    /// A lab value by (lowercase) marker name.
    BloodMarker(String),
}

impl Metric {
    /// Every metric except the open-ended [`Metric::BloodMarker`].
    pub const FIXED: [Metric; 17] = [
        Metric::ActiveCalories,
        Metric::Distance,
        Metric::MovingTime,
        Metric::ElevationGain,
        Metric::HeartRate,
        Metric::MaxHeartRate,
        Metric::CaloriesConsumed,
        Metric::Protein,
        Metric::Carbs,
        Metric::Fat,
        Metric::Fiber,
        Metric::SleepScore,
        Metric::SleepDuration,
        Metric::DeepSleep,
        Metric::RemSleep,
        Metric::RestingHeartRate,
        Metric::Hrv,
    ];

    /// Build a blood-marker metric; the name is trimmed and lowercased.
    pub fn blood_marker(name: &str) -> Self {
        Metric::BloodMarker(name.trim().to_lowercase())
    }

    /// Canonical snake_case name.
    pub fn name(&self) -> String {
        match self {
            Metric::BloodMarker(marker) => format!("blood:{marker}"),
            fixed => fixed.fixed_name().to_string(),
        }
    }

    fn fixed_name(&self) -> &'static str {
        match self {
            Metric::ActiveCalories => "active_calories",
            Metric::Distance => "distance",
            Metric::MovingTime => "moving_time",
            Metric::ElevationGain => "elevation_gain",
            Metric::HeartRate => "heart_rate",
            Metric::MaxHeartRate => "max_heart_rate",
            Metric::CaloriesConsumed => "calories_consumed",
            Metric::Protein => "protein",
            Metric::Carbs => "carbs",
            Metric::Fat => "fat",
            Metric::Fiber => "fiber",
            Metric::SleepScore => "sleep_score",
            Metric::SleepDuration => "sleep_duration",
            Metric::DeepSleep => "deep_sleep",
            Metric::RemSleep => "rem_sleep",
            Metric::RestingHeartRate => "resting_heart_rate",
            Metric::Hrv => "hrv",
            Metric::BloodMarker(_) => "blood",
        }
    }

    /// Human-readable label for legends and table headers.
    pub fn label(&self) -> String {
        let label = match self {
            Metric::ActiveCalories => "Active calories",
            Metric::Distance => "Distance",
            Metric::MovingTime => "Moving time",
            Metric::ElevationGain => "Elevation gain",
            Metric::HeartRate => "Heart rate",
            Metric::MaxHeartRate => "Max heart rate",
            Metric::CaloriesConsumed => "Calories eaten",
            Metric::Protein => "Protein",
            Metric::Carbs => "Carbs",
            Metric::Fat => "Fat",
            Metric::Fiber => "Fiber",
            Metric::SleepScore => "Sleep score",
            Metric::SleepDuration => "Sleep",
            Metric::DeepSleep => "Deep sleep",
            Metric::RemSleep => "REM sleep",
            Metric::RestingHeartRate => "Resting heart rate",
            Metric::Hrv => "HRV",
            Metric::BloodMarker(marker) => return marker.to_uppercase(),
        };
        label.to_string()
    }

    /// Display unit, empty when unitless or unknown.
    pub fn unit(&self) -> &'static str {
        match self {
            Metric::ActiveCalories | Metric::CaloriesConsumed => "kcal",
            Metric::Distance | Metric::ElevationGain => "m",
            Metric::MovingTime => "s",
            Metric::HeartRate | Metric::MaxHeartRate | Metric::RestingHeartRate => "bpm",
            Metric::Protein | Metric::Carbs | Metric::Fat | Metric::Fiber => "g",
            Metric::SleepDuration | Metric::DeepSleep | Metric::RemSleep => "min",
            Metric::Hrv => "ms",
            Metric::SleepScore | Metric::BloodMarker(_) => "",
        }
    }

    /// The reduction used when a chart does not ask for one explicitly.
    ///
    /// Quantities that accumulate over a day are summed; rates, scores and
    /// lab values are averaged.
    pub fn default_reduction(&self) -> Reduction {
        match self {
            Metric::ActiveCalories
            | Metric::Distance
            | Metric::MovingTime
            | Metric::ElevationGain
            | Metric::CaloriesConsumed
            | Metric::Protein
            | Metric::Carbs
            | Metric::Fat
            | Metric::Fiber
            | Metric::SleepDuration
            | Metric::DeepSleep
            | Metric::RemSleep => Reduction::Sum,
            Metric::HeartRate
            | Metric::MaxHeartRate
            | Metric::SleepScore
            | Metric::RestingHeartRate
            | Metric::Hrv
            | Metric::BloodMarker(_) => Reduction::Mean,
        }
    }

    /// The record kind this metric is read from.
    pub fn source(&self) -> RecordKindTag {
        match self {
            Metric::ActiveCalories
            | Metric::Distance
            | Metric::MovingTime
            | Metric::ElevationGain
            | Metric::HeartRate
            | Metric::MaxHeartRate => RecordKindTag::Activity,
            Metric::CaloriesConsumed
            | Metric::Protein
            | Metric::Carbs
            | Metric::Fat
            | Metric::Fiber => RecordKindTag::Nutrition,
            Metric::SleepScore
            | Metric::SleepDuration
            | Metric::DeepSleep
            | Metric::RemSleep
            | Metric::RestingHeartRate
            | Metric::Hrv => RecordKindTag::Sleep,
            Metric::BloodMarker(_) => RecordKindTag::BloodMarker,
        }
    }
}

impl FromStr for Metric {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();

        if let Some(marker) = lower
            .strip_prefix("blood:")
            .or_else(|| lower.strip_prefix("blood_marker:"))
        {
            if marker.trim().is_empty() {
                return Err(ParseError::UnknownMetric(s.to_string()));
            }
            return Ok(Metric::blood_marker(marker));
        }

        let normalized = lower.replace(['-', ' '], "_");
        Metric::FIXED
            .iter()
            .find(|metric| metric.fixed_name() == normalized)
            .cloned()
            .or(match normalized.as_str() {
                "calories" | "calories_burned" => Some(Metric::ActiveCalories),
                "hr" | "avg_hr" | "average_heartrate" => Some(Metric::HeartRate),
                "duration" => Some(Metric::MovingTime),
                "sleep" => Some(Metric::SleepDuration),
                "resting_hr" | "rhr" => Some(Metric::RestingHeartRate),
                _ => None,
            })
            .ok_or_else(|| ParseError::UnknownMetric(s.to_string()))
    }
}

impl TryFrom<String> for Metric {
    type Error = ParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Metric> for String {
    fn from(value: Metric) -> Self {
        value.name()
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}
