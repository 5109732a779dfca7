//! Calendar-date handling for raw records.
//!
//! Upstream services report "when" in several shapes: plain calendar days
//! (`2025-01-01`), RFC 3339 instants (`2025-01-01T06:30:00Z`) and naive local
//! timestamps (`2025-01-01T06:30:00`). [`RecordTime`] keeps whichever shape
//! arrived, and [`RecordTime::date_in`] truncates it to a calendar date in a
//! single reporting offset so every record lands in exactly one daily bucket.
//!
//! # Example
//!
//! ```
//! use vitals_types::{RecordTime, ReportingOffset};
//! use time::macros::date;
//!
//! let late_run: RecordTime = "2025-01-01T23:30:00Z".parse()?;
//!
//! // In UTC the run belongs to Jan 1 ...
//! assert_eq!(late_run.date_in(ReportingOffset::UTC.into()), Some(date!(2025-01-01)));
//!
//! // ... but in UTC+2 it is already Jan 2.
//! let berlin: ReportingOffset = "+02:00".parse()?;
//! assert_eq!(late_run.date_in(berlin.into()), Some(date!(2025-01-02)));
//! # Ok::<(), vitals_types::ParseError>(())
//! ```

use core::fmt;
use core::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, OffsetDateTime, PrimitiveDateTime, UtcOffset};

use crate::error::{ParseError, ParseResult};

/// Parse a `YYYY-MM-DD` calendar date.
///
/// # Errors
///
/// Returns [`ParseError::InvalidDate`] if the text is not a valid date.
pub fn parse_date(s: &str) -> ParseResult<Date> {
    let trimmed = s.trim();
    Date::parse(trimmed, format_description!("[year]-[month]-[day]"))
        .map_err(|_| ParseError::InvalidDate(trimmed.to_string()))
}

/// When a record happened, as reported by its source.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize),
    serde(into = "String")
)]
pub enum RecordTime {
    /// A calendar day with no time of day.
    Day(Date),
    /// An instant with an explicit UTC offset.
    Instant(OffsetDateTime),
    /// A wall-clock timestamp with no offset; already local to the reporter.
    Local(PrimitiveDateTime),
    /// Text that could not be read as any of the above.
    Unparsed(String),
}

impl RecordTime {
    /// Parse text, keeping unreadable input as [`RecordTime::Unparsed`].
    ///
    /// This never fails, so a single malformed date in an export does not
    /// abort deserialising the rest of it.
    pub fn parse_lossy(s: &str) -> Self {
        s.parse()
            .unwrap_or_else(|_| RecordTime::Unparsed(s.to_string()))
    }

    /// Truncate to a calendar date in the given reporting offset.
    ///
    /// - `Day` is returned as-is.
    /// - `Instant` is shifted into `offset` before truncating.
    /// - `Local` keeps its own date (it carries no offset to convert from).
    /// - `Unparsed` has no date, and neither has an instant whose shifted
    ///   date falls outside the supported calendar range.
    #[must_use]
    pub fn date_in(&self, offset: UtcOffset) -> Option<Date> {
        match self {
            RecordTime::Day(date) => Some(*date),
            RecordTime::Instant(instant) => {
                instant.checked_to_offset(offset).map(|shifted| shifted.date())
            }
            RecordTime::Local(local) => Some(local.date()),
            RecordTime::Unparsed(_) => None,
        }
    }

    /// Whether this value is unparsed text that is empty or only whitespace.
    pub fn is_blank(&self) -> bool {
        matches!(self, RecordTime::Unparsed(text) if text.trim().is_empty())
    }
}

impl FromStr for RecordTime {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();

        if let Ok(date) = parse_date(trimmed) {
            return Ok(RecordTime::Day(date));
        }

        if let Ok(instant) = OffsetDateTime::parse(trimmed, &Rfc3339) {
            return Ok(RecordTime::Instant(instant));
        }

        if let Ok(local) = PrimitiveDateTime::parse(
            trimmed,
            format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]"),
        ) {
            return Ok(RecordTime::Local(local));
        }

        Err(ParseError::InvalidDate(trimmed.to_string()))
    }
}

impl fmt::Display for RecordTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordTime::Day(date) => write!(f, "{date}"),
            RecordTime::Instant(instant) => match instant.format(&Rfc3339) {
                Ok(text) => f.write_str(&text),
                Err(_) => write!(f, "{instant}"),
            },
            RecordTime::Local(local) => match local.format(format_description!(
                "[year]-[month]-[day]T[hour]:[minute]:[second]"
            )) {
                Ok(text) => f.write_str(&text),
                Err(_) => write!(f, "{local}"),
            },
            RecordTime::Unparsed(text) => f.write_str(text),
        }
    }
}

impl From<String> for RecordTime {
    fn from(value: String) -> Self {
        RecordTime::parse_lossy(&value)
    }
}

/// Accepts any JSON-like value: text goes through [`RecordTime::parse_lossy`],
/// anything else is kept as [`RecordTime::Unparsed`].
#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for RecordTime {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(RecordTimeVisitor)
    }
}

#[cfg(feature = "serde")]
struct RecordTimeVisitor;

#[cfg(feature = "serde")]
impl<'de> serde::de::Visitor<'de> for RecordTimeVisitor {
    type Value = RecordTime;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a date or timestamp")
    }

    fn visit_str<E: serde::de::Error>(self, v: &str) -> Result<Self::Value, E> {
        Ok(RecordTime::parse_lossy(v))
    }

    fn visit_bool<E: serde::de::Error>(self, v: bool) -> Result<Self::Value, E> {
        Ok(RecordTime::Unparsed(v.to_string()))
    }

    fn visit_i64<E: serde::de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Ok(RecordTime::Unparsed(v.to_string()))
    }

    fn visit_u64<E: serde::de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(RecordTime::Unparsed(v.to_string()))
    }

    fn visit_f64<E: serde::de::Error>(self, v: f64) -> Result<Self::Value, E> {
        Ok(RecordTime::Unparsed(v.to_string()))
    }

    fn visit_unit<E: serde::de::Error>(self) -> Result<Self::Value, E> {
        Ok(RecordTime::Unparsed(String::new()))
    }

    fn visit_seq<A: serde::de::SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        while seq.next_element::<serde::de::IgnoredAny>()?.is_some() {}
        Ok(RecordTime::Unparsed("[...]".to_string()))
    }

    fn visit_map<A: serde::de::MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        while map
            .next_entry::<serde::de::IgnoredAny, serde::de::IgnoredAny>()?
            .is_some()
        {}
        Ok(RecordTime::Unparsed("{...}".to_string()))
    }
}

impl From<RecordTime> for String {
    fn from(value: RecordTime) -> Self {
        value.to_string()
    }
}

impl From<Date> for RecordTime {
    fn from(value: Date) -> Self {
        RecordTime::Day(value)
    }
}

impl From<OffsetDateTime> for RecordTime {
    fn from(value: OffsetDateTime) -> Self {
        RecordTime::Instant(value)
    }
}

/// The fixed UTC offset used to turn instants into calendar dates.
///
/// Defaults to UTC. Parses `UTC`, `Z`, `+HH:MM`, `-HH:MM` and `+HH`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(try_from = "String", into = "String")
)]
pub struct ReportingOffset(UtcOffset);

impl ReportingOffset {
    /// Coordinated Universal Time.
    pub const UTC: ReportingOffset = ReportingOffset(UtcOffset::UTC);

    /// Wrap an existing offset.
    pub const fn new(offset: UtcOffset) -> Self {
        Self(offset)
    }

    /// The wrapped offset.
    pub const fn offset(self) -> UtcOffset {
        self.0
    }
}

impl Default for ReportingOffset {
    fn default() -> Self {
        Self::UTC
    }
}

impl From<ReportingOffset> for UtcOffset {
    fn from(value: ReportingOffset) -> Self {
        value.0
    }
}

impl From<UtcOffset> for ReportingOffset {
    fn from(value: UtcOffset) -> Self {
        Self(value)
    }
}

impl FromStr for ReportingOffset {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("utc") || trimmed == "Z" || trimmed == "z" {
            return Ok(Self::UTC);
        }

        UtcOffset::parse(
            trimmed,
            format_description!("[offset_hour sign:mandatory]:[offset_minute]"),
        )
        .or_else(|_| {
            UtcOffset::parse(trimmed, format_description!("[offset_hour sign:mandatory]"))
        })
        .map(Self)
        .map_err(|_| ParseError::InvalidOffset(trimmed.to_string()))
    }
}

impl TryFrom<String> for ReportingOffset {
    type Error = ParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for ReportingOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_utc() {
            return f.write_str("UTC");
        }
        let (hours, minutes, _) = self.0.as_hms();
        let sign = if self.0.is_negative() { '-' } else { '+' };
        write!(f, "{sign}{:02}:{:02}", hours.unsigned_abs(), minutes.unsigned_abs())
    }
}

impl From<ReportingOffset> for String {
    fn from(value: ReportingOffset) -> Self {
        value.to_string()
    }
}

/// Serde helpers that write [`Date`] as `YYYY-MM-DD` text.
///
/// `time`'s own serde support encodes dates as tuples unless its
/// human-readable feature is on; renderers expect ISO strings.
#[cfg(feature = "serde")]
pub mod serde_date {
    use serde::{Deserialize, Deserializer, Serializer};
    use time::Date;

    use super::parse_date;

    /// Serialize a date as `YYYY-MM-DD`.
    pub fn serialize<S: Serializer>(date: &Date, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(date)
    }

    /// Deserialize a date from `YYYY-MM-DD`.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Date, D::Error> {
        let text = String::deserialize(deserializer)?;
        parse_date(&text).map_err(serde::de::Error::custom)
    }

    /// The same encoding for optional dates.
    pub mod option {
        use super::*;

        pub fn serialize<S: Serializer>(
            date: &Option<Date>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match date {
                Some(date) => serializer.collect_str(date),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<Date>, D::Error> {
            Option::<String>::deserialize(deserializer)?
                .map(|text| parse_date(&text).map_err(serde::de::Error::custom))
                .transpose()
        }
    }

    /// The same encoding for sequences of dates.
    pub mod vec {
        use super::*;

        pub fn serialize<S: Serializer>(dates: &[Date], serializer: S) -> Result<S::Ok, S::Error> {
            serializer.collect_seq(dates.iter().map(ToString::to_string))
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Vec<Date>, D::Error> {
            Vec::<String>::deserialize(deserializer)?
                .iter()
                .map(|text| parse_date(text).map_err(serde::de::Error::custom))
                .collect()
        }
    }
}
