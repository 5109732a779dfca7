//! Error types for vitals-core.
//!
//! The engine itself does not fail on data problems: records with missing or
//! unreadable dates are counted in [`crate::SkipReport`], empty inputs give
//! empty outputs and a zero point budget means "endpoints only". Errors are
//! reserved for misuse of the API:
//!
//! | Error Type | Raised by | Fix |
//! |------------|-----------|-----|
//! | [`Error::InvalidConfig`] | [`crate::ChartConfig::validate`] | Correct the chart definition |
//! | [`Error::Series`] | [`crate::Series::new`] | Pass dates and values of equal length, ascending |
//! | [`Error::Parse`] | metric/offset/date names from configuration | Use a known name |

use thiserror::Error;
use time::Date;

/// Errors that can occur when configuring or feeding the engine.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new error variants
/// in future versions without breaking downstream code.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum Error {
    /// Invalid chart or metric configuration.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A series was built from inconsistent dates and values.
    #[error(transparent)]
    Series(#[from] SeriesError),

    /// A metric, reduction, date or offset name could not be parsed.
    #[error(transparent)]
    Parse(#[from] vitals_types::ParseError),
}

impl Error {
    /// Create a configuration error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig(message.into())
    }
}

/// Structural problems with a [`crate::Series`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum SeriesError {
    /// The date and value columns differ in length.
    #[error("Series length mismatch: {dates} dates, {values} values")]
    LengthMismatch {
        /// Number of dates supplied.
        dates: usize,
        /// Number of values supplied.
        values: usize,
    },

    /// Dates are not strictly increasing.
    #[error("Series dates must be strictly increasing: {previous} is followed by {next} at index {index}")]
    NotIncreasing {
        /// Position of the offending date.
        index: usize,
        /// The date before it.
        previous: Date,
        /// The offending date.
        next: Date,
    },
}

/// Result type alias using vitals-core's Error type.
pub type Result<T> = std::result::Result<T, Error>;
