//! Derived percentage returns around dated observations.
//!
//! For each observation (typically a press release) the previous close is
//! resolved, then the close N days ahead for each configured offset, and
//! finally the percentage change from the previous close to each forward
//! close. No rounding happens here; display formatting is a presentation
//! concern.

use crate::error::{ResolveError, Result};
use crate::resolve::{resolve_backward, resolve_forward};
use crate::table::PriceTable;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Default forward offsets, in calendar days.
pub const DEFAULT_OFFSETS: [u32; 3] = [1, 3, 5];

/// A dated event of interest requiring a price lookup.
pub trait Dated {
    /// Calendar date of the event.
    fn date(&self) -> NaiveDate;
}

impl Dated for NaiveDate {
    fn date(&self) -> NaiveDate {
        *self
    }
}

/// The close and percentage change for one forward offset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForwardReturn {
    /// Offset from the observation date, in calendar days.
    pub offset_days: u32,
    /// Resolved forward close.
    pub close: f64,
    /// `(close - previous_close) / previous_close`, unrounded.
    pub pct_change: f64,
}

/// Resolved prices and returns for one observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedReturn {
    /// Observation date.
    pub date: NaiveDate,
    /// Close on the observation date if it was a trading day, otherwise
    /// the nearest prior close.
    pub previous_close: f64,
    /// One entry per configured offset, in input order.
    pub forward: Vec<ForwardReturn>,
}

/// Resolve the previous close, forward closes and percentage changes for a
/// single observation date.
///
/// # Errors
///
/// [`ResolveError::ZeroBaseline`] when the previous close is zero, plus any
/// error the underlying searches raise.
pub fn resolve_return(
    date: NaiveDate,
    table: &PriceTable,
    offsets: &[u32],
    today: NaiveDate,
) -> Result<ResolvedReturn> {
    let previous_close = match table.get(date) {
        Some(close) => close,
        None => resolve_backward(date, table)?,
    };

    if previous_close == 0.0 {
        return Err(ResolveError::ZeroBaseline { date });
    }

    let mut forward = Vec::with_capacity(offsets.len());
    for &offset_days in offsets {
        let close = resolve_forward(date, offset_days, table, today)?;
        forward.push(ForwardReturn {
            offset_days,
            close,
            pct_change: (close - previous_close) / previous_close,
        });
    }

    Ok(ResolvedReturn {
        date,
        previous_close,
        forward,
    })
}

/// Lazily derive a [`ResolvedReturn`] for each observation.
///
/// The iterator is a pure function of its inputs: it holds no mutable
/// state, so it can be re-created and re-run with identical results.
pub fn derive_returns<'a, T: Dated>(
    observations: &'a [T],
    table: &'a PriceTable,
    offsets: &'a [u32],
    today: NaiveDate,
) -> impl Iterator<Item = Result<ResolvedReturn>> + 'a {
    observations
        .iter()
        .map(move |obs| resolve_return(obs.date(), table, offsets, today))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::parse_iso_date;
    use approx::assert_relative_eq;

    fn d(s: &str) -> NaiveDate {
        parse_iso_date(s).unwrap()
    }

    fn sample_table() -> PriceTable {
        PriceTable::from_iso_pairs([
            ("2024-01-02", 100.0),
            ("2024-01-03", 102.0),
            ("2024-01-05", 105.0),
            ("2024-01-08", 110.0),
        ])
        .unwrap()
    }

    #[test]
    fn test_resolve_return_exact_date() {
        let table = sample_table();
        let resolved = resolve_return(
            d("2024-01-02"),
            &table,
            &DEFAULT_OFFSETS,
            d("2024-06-01"),
        )
        .unwrap();

        assert_eq!(resolved.previous_close, 100.0);
        assert_eq!(resolved.forward.len(), 3);
        // +1 hits 2024-01-03, +3 hits 2024-01-05, +5 falls to 2024-01-08.
        assert_eq!(resolved.forward[0].close, 102.0);
        assert_eq!(resolved.forward[1].close, 105.0);
        assert_eq!(resolved.forward[2].close, 110.0);
        assert_relative_eq!(resolved.forward[0].pct_change, 0.02);
        assert_relative_eq!(resolved.forward[1].pct_change, 0.05);
        assert_relative_eq!(resolved.forward[2].pct_change, 0.10);
    }

    #[test]
    fn test_resolve_return_weekend_date() {
        // 2024-01-06 is absent; the previous close comes from 2024-01-05.
        let table = sample_table();
        let resolved =
            resolve_return(d("2024-01-06"), &table, &[1], d("2024-06-01")).unwrap();
        assert_eq!(resolved.previous_close, 105.0);
        assert_eq!(resolved.forward[0].close, 110.0);
    }

    #[test]
    fn test_zero_baseline_propagates() {
        let table = PriceTable::from_iso_pairs([
            ("2024-01-02", 0.0),
            ("2024-01-03", 1.0),
        ])
        .unwrap();
        let result = resolve_return(d("2024-01-02"), &table, &[1], d("2024-06-01"));
        assert_eq!(
            result,
            Err(ResolveError::ZeroBaseline {
                date: d("2024-01-02")
            })
        );
    }

    #[test]
    fn test_derive_returns_is_lazy_and_restartable() {
        let table = sample_table();
        let observations = vec![d("2024-01-02"), d("2024-01-03"), d("2024-01-06")];

        let first: Vec<_> =
            derive_returns(&observations, &table, &DEFAULT_OFFSETS, d("2024-06-01")).collect();
        let second: Vec<_> =
            derive_returns(&observations, &table, &DEFAULT_OFFSETS, d("2024-06-01")).collect();

        assert_eq!(first.len(), 3);
        assert_eq!(first, second);
    }

    #[test]
    fn test_derive_returns_per_observation_errors() {
        // The first observation has no prior data; later ones still resolve.
        let table = sample_table();
        let observations = vec![d("2024-01-01"), d("2024-01-03")];

        let results: Vec<_> =
            derive_returns(&observations, &table, &[1], d("2024-06-01")).collect();
        assert!(matches!(
            results[0],
            Err(ResolveError::NoPriorData { .. })
        ));
        assert!(results[1].is_ok());
    }
}
