//! Error types for resolution and return calculations.

use chrono::NaiveDate;
use thiserror::Error;

/// Result type for core calculations.
pub type Result<T> = std::result::Result<T, ResolveError>;

/// Errors that can occur during price resolution and derived calculations.
///
/// None of these are recovered internally; they indicate malformed input or
/// a genuine absence of data that the caller must decide how to present.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ResolveError {
    /// The price table has no entries at all for the ticker.
    #[error("price table has no entries")]
    EmptyPriceTable,

    /// Backward search exhausted its bound without finding a close.
    #[error("no close found before {start}; table starts at {earliest}")]
    NoPriorData {
        /// Date the search started from.
        start: NaiveDate,
        /// Earliest date present in the table.
        earliest: NaiveDate,
    },

    /// The previous close is zero, making percentage change undefined.
    #[error("previous close at {date} is zero; percentage change is undefined")]
    ZeroBaseline {
        /// Observation date with the zero baseline.
        date: NaiveDate,
    },

    /// Too few observations for an interval average.
    #[error("average interval needs at least 3 observations, got {count}")]
    EmptyObservationSet {
        /// Number of observations supplied.
        count: usize,
    },

    /// A date string was not canonical ISO `YYYY-MM-DD`.
    #[error("invalid ISO date: {value}")]
    InvalidDate {
        /// The offending input.
        value: String,
    },

    /// A screener ratio was requested with a zero denominator.
    #[error("zero denominator: {quantity} is undefined")]
    ZeroDenominator {
        /// Name of the undefined quantity.
        quantity: &'static str,
    },
}
