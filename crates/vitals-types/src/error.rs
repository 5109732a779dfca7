//! Error types for parsing in vitals-types.

use thiserror::Error;

/// Errors that can occur when parsing record fields and metric names.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new error variants
/// in future versions without breaking downstream code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ParseError {
    /// The metric name is not one of the known metrics.
    #[error("Unknown metric: {0}")]
    UnknownMetric(String),

    /// The reduction name is neither `sum` nor `mean`.
    #[error("Unknown reduction '{0}' (expected 'sum' or 'mean')")]
    UnknownReduction(String),

    /// The text is not a calendar date or RFC 3339 timestamp.
    #[error("Invalid date '{0}': expected YYYY-MM-DD or RFC 3339")]
    InvalidDate(String),

    /// The text is not a UTC offset such as `UTC`, `+02:00` or `-05:30`.
    #[error("Invalid UTC offset '{0}': expected UTC, Z or +HH:MM")]
    InvalidOffset(String),
}

/// Result type alias using vitals-types' ParseError type.
pub type ParseResult<T> = std::result::Result<T, ParseError>;
