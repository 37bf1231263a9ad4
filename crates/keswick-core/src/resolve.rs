//! Nearest-trading-day price resolution.
//!
//! Maps an arbitrary calendar date to the best-available close in a sparse
//! [`PriceTable`] under two directional policies: forward search with a
//! most-recent-data fallback, and bounded backward search.

use crate::error::{ResolveError, Result};
use crate::table::PriceTable;
use chrono::{Days, NaiveDate};

/// Hard cap on how far back a backward search may walk, in days.
///
/// The historical-price feeds cover at most 30 years, so any search past
/// that is chasing data that cannot exist.
pub const MAX_LOOKBACK_DAYS: i64 = 30 * 365;

/// Resolve the close `offset_days` ahead of `start`, or the nearest
/// trading day after that, never crossing `today`.
///
/// The search prefers the earliest trading day at or after
/// `start + offset_days`. An exact hit on the target date is returned even
/// if the target has reached `today`; beyond that, reaching `today` means
/// no forward data can exist, so the policy switches to most recent known
/// data: the close at `start` itself if present, otherwise
/// [`resolve_backward`].
///
/// # Errors
///
/// [`ResolveError::EmptyPriceTable`] if the table has no entries, or
/// [`ResolveError::NoPriorData`] if the fallback chain also fails.
pub fn resolve_forward(
    start: NaiveDate,
    offset_days: u32,
    table: &PriceTable,
    today: NaiveDate,
) -> Result<f64> {
    if table.is_empty() {
        return Err(ResolveError::EmptyPriceTable);
    }

    let target = start
        .checked_add_days(Days::new(u64::from(offset_days)))
        .ok_or(ResolveError::InvalidDate {
            value: format!("{start} + {offset_days} days"),
        })?;

    if let Some(close) = table.get(target) {
        return Ok(close);
    }

    // Earliest key strictly after the target, provided it predates today.
    if let Some((date, close)) = table.nearest_after(target) {
        if date < today {
            return Ok(close);
        }
    }

    match table.get(start) {
        Some(close) => Ok(close),
        None => resolve_backward(start, table),
    }
}

/// Resolve the close on the nearest trading day strictly before `start`.
///
/// The walk is bounded by the earliest key present in the table and by
/// [`MAX_LOOKBACK_DAYS`]; an unbounded walk against a too-short table would
/// never terminate.
///
/// # Errors
///
/// [`ResolveError::EmptyPriceTable`] if the table has no entries, or
/// [`ResolveError::NoPriorData`] if no key lies within the bound.
pub fn resolve_backward(start: NaiveDate, table: &PriceTable) -> Result<f64> {
    let earliest = table
        .earliest_date()
        .ok_or(ResolveError::EmptyPriceTable)?;

    match table.nearest_before(start) {
        Some((date, close)) if (start - date).num_days() <= MAX_LOOKBACK_DAYS => Ok(close),
        _ => Err(ResolveError::NoPriorData { start, earliest }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::parse_iso_date;
    use rstest::rstest;

    fn d(s: &str) -> NaiveDate {
        parse_iso_date(s).unwrap()
    }

    fn sample_table() -> PriceTable {
        PriceTable::from_iso_pairs([
            ("2024-01-02", 100.0),
            ("2024-01-03", 102.0),
            ("2024-01-05", 105.0),
        ])
        .unwrap()
    }

    #[rstest]
    // Exact hit one day ahead.
    #[case("2024-01-02", 1, 102.0)]
    // 2024-01-04 absent, steps to 2024-01-05.
    #[case("2024-01-03", 1, 105.0)]
    // Zero offset on a present key returns that key's close.
    #[case("2024-01-02", 0, 100.0)]
    #[case("2024-01-05", 0, 105.0)]
    fn test_forward_search(#[case] start: &str, #[case] offset: u32, #[case] expected: f64) {
        let table = sample_table();
        let close = resolve_forward(d(start), offset, &table, d("2024-06-01")).unwrap();
        assert_eq!(close, expected);
    }

    #[test]
    fn test_forward_exact_hit_for_every_key() {
        let table = sample_table();
        for (date, close) in table.iter() {
            assert_eq!(
                resolve_forward(date, 0, &table, d("2024-06-01")).unwrap(),
                close
            );
        }
    }

    #[test]
    fn test_forward_past_today_falls_back_to_start() {
        // Target beyond today; start itself is a trading day.
        let table = sample_table();
        let close = resolve_forward(d("2024-01-05"), 3, &table, d("2024-01-06")).unwrap();
        assert_eq!(close, 105.0);
    }

    #[test]
    fn test_forward_past_today_falls_back_to_previous() {
        // Target beyond today and start absent from the table, so the
        // fallback chain ends at the nearest prior close.
        let table = sample_table();
        let close = resolve_forward(d("2024-01-06"), 5, &table, d("2024-01-07")).unwrap();
        assert_eq!(close, 105.0);
    }

    #[test]
    fn test_forward_exact_hit_wins_even_at_today() {
        // Membership is checked before the today comparison, so a close
        // dated today is still returned on an exact hit.
        let table = sample_table();
        let close = resolve_forward(d("2024-01-04"), 1, &table, d("2024-01-05")).unwrap();
        assert_eq!(close, 105.0);
    }

    #[test]
    fn test_forward_empty_table() {
        let table = PriceTable::default();
        let result = resolve_forward(d("2024-01-02"), 1, &table, d("2024-06-01"));
        assert_eq!(result, Err(ResolveError::EmptyPriceTable));
    }

    #[test]
    fn test_backward_walks_to_nearest_prior_close() {
        let table = PriceTable::from_iso_pairs([("2024-01-02", 100.0)]).unwrap();
        assert_eq!(resolve_backward(d("2024-01-10"), &table).unwrap(), 100.0);
    }

    #[test]
    fn test_backward_never_returns_future_close() {
        let table = sample_table();
        // Only 2024-01-02 lies strictly before 2024-01-03.
        assert_eq!(resolve_backward(d("2024-01-03"), &table).unwrap(), 100.0);
    }

    #[test]
    fn test_backward_no_prior_data() {
        let table = sample_table();
        let result = resolve_backward(d("2024-01-02"), &table);
        assert_eq!(
            result,
            Err(ResolveError::NoPriorData {
                start: d("2024-01-02"),
                earliest: d("2024-01-02"),
            })
        );
    }

    #[test]
    fn test_backward_empty_table() {
        let table = PriceTable::default();
        assert_eq!(
            resolve_backward(d("2024-01-10"), &table),
            Err(ResolveError::EmptyPriceTable)
        );
    }

    #[test]
    fn test_backward_lookback_cap() {
        // A close exists, but further back than the 30-year cap allows.
        let table = PriceTable::from_iso_pairs([("1990-01-02", 10.0)]).unwrap();
        let result = resolve_backward(d("2024-01-10"), &table);
        assert!(matches!(result, Err(ResolveError::NoPriorData { .. })));
    }
}
