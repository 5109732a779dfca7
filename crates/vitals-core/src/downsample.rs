//! Reducing a daily series to a point budget.
//!
//! Charts cannot usefully plot hundreds of daily points, so a series is
//! thinned to at most `max_points` while keeping its shape readable:
//!
//! 1. The first and last points are always kept, so the chart spans the
//!    exact date range of the data.
//! 2. Evenly strided points (`step = len / max_points`) fill the budget.
//!    When there are more stride candidates than room, an evenly spaced
//!    subset of them is taken.
//! 3. Any budget left over goes to positional month markers (every 30th
//!    index) and then week markers (every 7th index).
//!
//! The same index set is applied to every dataset of a [`SeriesSet`], so
//! columns stay aligned with the date axis.
//!
//! # Example
//!
//! ```
//! use vitals_core::retained_indices;
//!
//! // Short series are returned whole.
//! assert_eq!(retained_indices(4, 10), vec![0, 1, 2, 3]);
//!
//! // Long series keep both ends and never exceed the budget.
//! let kept = retained_indices(365, 60);
//! assert!(kept.len() <= 60);
//! assert_eq!(kept.first(), Some(&0));
//! assert_eq!(kept.last(), Some(&364));
//! ```

use std::collections::BTreeSet;

use tracing::trace;

use crate::series::{Series, SeriesSet};

/// Positional month marker spacing.
const MONTH_MARKER_EVERY: usize = 30;

/// Positional week marker spacing.
const WEEK_MARKER_EVERY: usize = 7;

/// Budget used when the caller asks for zero points.
const MIN_POINTS: usize = 2;

/// Indices (ascending, unique) retained when thinning `len` points to
/// `max_points`.
///
/// - `len == 0` gives nothing; `len <= max_points` gives every index.
/// - `max_points == 0` is treated as 2.
/// - Otherwise the result holds `0` and `len - 1` and at most
///   `max(max_points, 2)` indices.
/// - Leftover budget goes to every 30th index first, then every 7th.
pub fn retained_indices(len: usize, max_points: usize) -> Vec<usize> {
    let max_points = if max_points == 0 {
        MIN_POINTS
    } else {
        max_points
    };

    if len <= max_points {
        return (0..len).collect();
    }

    // len >= 2 from here on, since max_points >= 1.
    let budget = max_points.max(MIN_POINTS);
    let last = len - 1;
    let mut kept = BTreeSet::from([0, last]);

    let step = (len / max_points).max(1);
    let stride: Vec<usize> = (0..len)
        .step_by(step)
        .filter(|index| !kept.contains(index))
        .collect();
    let room = budget - kept.len();

    if stride.len() <= room {
        kept.extend(stride);
    } else {
        // Evenly spaced picks; distinct because stride.len() > room.
        kept.extend((0..room).map(|j| stride[j * stride.len() / room]));
    }

    for every in [MONTH_MARKER_EVERY, WEEK_MARKER_EVERY] {
        for index in (0..len).step_by(every) {
            if kept.len() >= budget {
                break;
            }
            kept.insert(index);
        }
    }

    trace!(len, max_points, step, kept = kept.len(), "Computed retained indices");
    kept.into_iter().collect()
}

/// Thin a single series to at most `max_points` points.
///
/// The input is not modified.
pub fn downsample(series: &Series, max_points: usize) -> Series {
    let indices = retained_indices(series.len(), max_points);
    series.select(&indices)
}

/// Thin every dataset of a set with the same retained indices.
pub fn downsample_set(set: &SeriesSet, max_points: usize) -> SeriesSet {
    let indices = retained_indices(set.len(), max_points);
    set.select(&indices)
}
