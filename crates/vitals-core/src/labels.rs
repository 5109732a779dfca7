//! Axis and tooltip labels for date axes.
//!
//! The label granularity adapts to how many dates the axis shows:
//!
//! | Dates | Tier | Marked point | Other points |
//! |-------|------|--------------|--------------|
//! | up to 7 | [`LabelTier::Weekday`] | `Mon` | `Mon` |
//! | 8 to 30 | [`LabelTier::Daily`] | `Jan 5` | `5` |
//! | 31 to 90 | [`LabelTier::Weekly`] | `Jan 5` | (empty) |
//! | over 90 | [`LabelTier::Monthly`] | `Jan` | (empty) |
//!
//! A point is *marked* when it is the first day of its month, the first or
//! last point of the axis, or its index is a multiple of the tier's modulus.
//!
//! # Example
//!
//! ```
//! use vitals_core::{format_labels, format_tooltip_label};
//! use time::macros::date;
//!
//! let week = [date!(2025-01-01), date!(2025-01-02), date!(2025-01-03)];
//! assert_eq!(format_labels(&week), vec!["Wed", "Thu", "Fri"]);
//!
//! assert_eq!(format_tooltip_label(date!(2025-01-01)), "Wednesday, January 1, 2025");
//! ```

use serde::{Deserialize, Serialize};
use time::{Date, Month, Weekday};

/// Label granularity, chosen from the number of dates on the axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelTier {
    /// Short weekday on every point.
    Weekday,
    /// Month and day on marked points, day number elsewhere.
    Daily,
    /// Month and day on marked points only.
    Weekly,
    /// Month name on marked points only.
    Monthly,
}

impl LabelTier {
    /// The tier for an axis of `total` dates.
    pub fn for_len(total: usize) -> Self {
        match total {
            0..=7 => LabelTier::Weekday,
            8..=30 => LabelTier::Daily,
            31..=90 => LabelTier::Weekly,
            _ => LabelTier::Monthly,
        }
    }

    /// Index spacing of marked points; `None` when every point is labelled alike.
    pub fn modulus(self) -> Option<usize> {
        match self {
            LabelTier::Weekday => None,
            LabelTier::Daily => Some(3),
            LabelTier::Weekly => Some(7),
            LabelTier::Monthly => Some(30),
        }
    }

    /// The label of `date` at position `index` on an axis of `total` dates.
    pub fn label(self, date: Date, index: usize, total: usize) -> String {
        let Some(modulus) = self.modulus() else {
            return short_weekday(date.weekday()).to_string();
        };

        let marked =
            index == 0 || index + 1 == total || date.day() == 1 || index % modulus == 0;

        match (self, marked) {
            (LabelTier::Monthly, true) => short_month(date.month()).to_string(),
            (_, true) => month_day(date),
            (LabelTier::Daily, false) => date.day().to_string(),
            (_, false) => String::new(),
        }
    }
}

impl std::fmt::Display for LabelTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LabelTier::Weekday => write!(f, "weekday"),
            LabelTier::Daily => write!(f, "daily"),
            LabelTier::Weekly => write!(f, "weekly"),
            LabelTier::Monthly => write!(f, "monthly"),
        }
    }
}

/// Three-letter weekday abbreviation (`Mon`).
pub fn short_weekday(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Monday => "Mon",
        Weekday::Tuesday => "Tue",
        Weekday::Wednesday => "Wed",
        Weekday::Thursday => "Thu",
        Weekday::Friday => "Fri",
        Weekday::Saturday => "Sat",
        Weekday::Sunday => "Sun",
    }
}

/// Three-letter month abbreviation (`Jan`).
pub fn short_month(month: Month) -> &'static str {
    match month {
        Month::January => "Jan",
        Month::February => "Feb",
        Month::March => "Mar",
        Month::April => "Apr",
        Month::May => "May",
        Month::June => "Jun",
        Month::July => "Jul",
        Month::August => "Aug",
        Month::September => "Sep",
        Month::October => "Oct",
        Month::November => "Nov",
        Month::December => "Dec",
    }
}

fn month_day(date: Date) -> String {
    format!("{} {}", short_month(date.month()), date.day())
}

/// One axis label per date, using the tier for `dates.len()`.
pub fn format_labels(dates: &[Date]) -> Vec<String> {
    let total = dates.len();
    let tier = LabelTier::for_len(total);
    dates
        .iter()
        .enumerate()
        .map(|(index, date)| tier.label(*date, index, total))
        .collect()
}

/// Long-form tooltip text, e.g. `Wednesday, January 1, 2025`.
pub fn format_tooltip_label(date: Date) -> String {
    format!(
        "{}, {} {}, {}",
        date.weekday(),
        date.month(),
        date.day(),
        date.year()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::Duration;
    use time::macros::date;

    fn run_of(start: Date, n: usize) -> Vec<Date> {
        (0..n).map(|i| start + Duration::days(i as i64)).collect()
    }

    // ===== Tier selection =====

    #[test]
    fn test_tier_boundaries() {
        assert_eq!(LabelTier::for_len(0), LabelTier::Weekday);
        assert_eq!(LabelTier::for_len(7), LabelTier::Weekday);
        assert_eq!(LabelTier::for_len(8), LabelTier::Daily);
        assert_eq!(LabelTier::for_len(30), LabelTier::Daily);
        assert_eq!(LabelTier::for_len(31), LabelTier::Weekly);
        assert_eq!(LabelTier::for_len(90), LabelTier::Weekly);
        assert_eq!(LabelTier::for_len(91), LabelTier::Monthly);
    }

    // ===== Label text =====

    #[test]
    fn test_weekday_labels() {
        let labels = format_labels(&run_of(date!(2025 - 01 - 01), 7));
        assert_eq!(labels, vec!["Wed", "Thu", "Fri", "Sat", "Sun", "Mon", "Tue"]);
    }

    #[test]
    fn test_daily_labels() {
        // Dec 26 2024 .. Jan 2 2025, eight dates.
        let labels = format_labels(&run_of(date!(2024 - 12 - 26), 8));
        assert_eq!(
            labels,
            vec!["Dec 26", "27", "28", "Dec 29", "30", "31", "Jan 1", "Jan 2"]
        );
    }

    #[test]
    fn test_weekly_labels() {
        let dates = run_of(date!(2025 - 01 - 10), 40);
        let labels = format_labels(&dates);

        assert_eq!(labels.len(), 40);
        assert_eq!(labels[0], "Jan 10");
        assert_eq!(labels[1], "");
        assert_eq!(labels[7], "Jan 17");
        // Feb 1 is index 22, not a multiple of 7.
        assert_eq!(labels[22], "Feb 1");
        assert_eq!(labels[39], "Feb 18");
    }

    #[test]
    fn test_monthly_labels() {
        let dates = run_of(date!(2025 - 01 - 15), 91);
        let labels = format_labels(&dates);

        assert_eq!(labels[0], "Jan");
        assert_eq!(labels[1], "");
        assert_eq!(labels[17], "Feb");
        assert_eq!(labels[30], "Feb");
        assert_eq!(labels[90], "Apr");
        assert!(labels.iter().filter(|l| l.is_empty()).count() > 80);
    }

    #[test]
    fn test_empty_axis() {
        assert!(format_labels(&[]).is_empty());
    }

    #[test]
    fn test_single_date() {
        assert_eq!(format_labels(&[date!(2025 - 06 - 02)]), vec!["Mon"]);
    }

    #[test]
    fn test_tooltip() {
        assert_eq!(
            format_tooltip_label(date!(2025 - 01 - 01)),
            "Wednesday, January 1, 2025"
        );
        assert_eq!(
            format_tooltip_label(date!(2024 - 02 - 29)),
            "Thursday, February 29, 2024"
        );
    }

    #[test]
    fn test_short_names() {
        assert_eq!(short_weekday(Weekday::Sunday), "Sun");
        assert_eq!(short_month(Month::September), "Sep");
    }
}
