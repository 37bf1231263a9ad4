//! Average interval between dated observations.

use crate::error::{ResolveError, Result};
use chrono::NaiveDate;

/// Truncated mean gap in days between consecutive observations.
///
/// `dates` must be ordered newest first; this is a precondition, not
/// verified here. The average runs over the first `count - 2` consecutive
/// pairs, excluding the oldest pair: press-release feeds trail off into a
/// partial period at the far end.
///
/// # Errors
///
/// [`ResolveError::EmptyObservationSet`] when fewer than 3 dates are
/// supplied, since the pair count would be zero.
pub fn average_release_interval(dates: &[NaiveDate]) -> Result<i64> {
    if dates.len() < 3 {
        return Err(ResolveError::EmptyObservationSet { count: dates.len() });
    }

    let pairs = dates.len() - 2;
    let total: i64 = dates
        .windows(2)
        .take(pairs)
        .map(|pair| (pair[0] - pair[1]).num_days())
        .sum();

    Ok(total / pairs as i64)
}
