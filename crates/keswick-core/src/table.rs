//! Sparse date-indexed closing-price tables.

use crate::error::{ResolveError, Result};
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// A sparse mapping from trading day to closing price for one ticker.
///
/// Only trading days are present; weekends and holidays are absent by
/// construction. The table is built once from a fetched historical series
/// and consulted read-only for the duration of a resolution pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceTable {
    closes: BTreeMap<NaiveDate, f64>,
}

impl PriceTable {
    /// Build a table from `(date, close)` pairs. Later duplicates win.
    pub fn from_closes<I>(closes: I) -> Self
    where
        I: IntoIterator<Item = (NaiveDate, f64)>,
    {
        Self {
            closes: closes.into_iter().collect(),
        }
    }

    /// Build a table from ISO `YYYY-MM-DD` string keys, as delivered by the
    /// historical-price APIs.
    pub fn from_iso_pairs<I, S>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, f64)>,
        S: AsRef<str>,
    {
        let mut closes = BTreeMap::new();
        for (date, close) in pairs {
            let date = parse_iso_date(date.as_ref())?;
            closes.insert(date, close);
        }
        Ok(Self { closes })
    }

    /// Closing price on `date`, if it was a trading day.
    pub fn get(&self, date: NaiveDate) -> Option<f64> {
        self.closes.get(&date).copied()
    }

    /// Whether `date` is present as a key.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.closes.contains_key(&date)
    }

    /// The nearest trading day strictly before `date`, with its close.
    pub fn nearest_before(&self, date: NaiveDate) -> Option<(NaiveDate, f64)> {
        self.closes
            .range(..date)
            .next_back()
            .map(|(d, c)| (*d, *c))
    }

    /// The nearest trading day strictly after `date`, with its close.
    pub fn nearest_after(&self, date: NaiveDate) -> Option<(NaiveDate, f64)> {
        use std::ops::Bound;
        self.closes
            .range((Bound::Excluded(date), Bound::Unbounded))
            .next()
            .map(|(d, c)| (*d, *c))
    }

    /// Earliest date present in the table.
    pub fn earliest_date(&self) -> Option<NaiveDate> {
        self.closes.keys().next().copied()
    }

    /// Latest date present in the table.
    pub fn latest_date(&self) -> Option<NaiveDate> {
        self.closes.keys().next_back().copied()
    }

    /// Number of trading days in the table.
    pub fn len(&self) -> usize {
        self.closes.len()
    }

    /// Whether the table has no entries (signals "ticker has no data").
    pub fn is_empty(&self) -> bool {
        self.closes.is_empty()
    }

    /// Iterate over `(date, close)` pairs in ascending date order.
    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, f64)> + '_ {
        self.closes.iter().map(|(d, c)| (*d, *c))
    }
}

impl FromIterator<(NaiveDate, f64)> for PriceTable {
    fn from_iter<I: IntoIterator<Item = (NaiveDate, f64)>>(iter: I) -> Self {
        Self::from_closes(iter)
    }
}

/// Parse a canonical ISO `YYYY-MM-DD` date.
pub fn parse_iso_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| ResolveError::InvalidDate {
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        parse_iso_date(s).unwrap()
    }

    #[test]
    fn test_from_iso_pairs() {
        let table = PriceTable::from_iso_pairs([("2024-01-02", 100.0), ("2024-01-03", 102.0)])
            .unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.get(d("2024-01-02")), Some(100.0));
        assert_eq!(table.get(d("2024-01-04")), None);
    }

    #[test]
    fn test_invalid_date_rejected() {
        let result = PriceTable::from_iso_pairs([("02/01/2024", 100.0)]);
        assert!(matches!(result, Err(ResolveError::InvalidDate { .. })));
    }

    #[test]
    fn test_nearest_lookups_are_strict() {
        let table = PriceTable::from_iso_pairs([
            ("2024-01-02", 100.0),
            ("2024-01-03", 102.0),
            ("2024-01-05", 105.0),
        ])
        .unwrap();

        // Strictly before / strictly after: the key itself never matches.
        assert_eq!(
            table.nearest_before(d("2024-01-03")),
            Some((d("2024-01-02"), 100.0))
        );
        assert_eq!(
            table.nearest_after(d("2024-01-03")),
            Some((d("2024-01-05"), 105.0))
        );
        assert_eq!(table.nearest_before(d("2024-01-02")), None);
        assert_eq!(table.nearest_after(d("2024-01-05")), None);
    }

    #[test]
    fn test_date_bounds() {
        let table = PriceTable::from_iso_pairs([
            ("2024-01-05", 105.0),
            ("2024-01-02", 100.0),
        ])
        .unwrap();
        assert_eq!(table.earliest_date(), Some(d("2024-01-02")));
        assert_eq!(table.latest_date(), Some(d("2024-01-05")));

        let empty = PriceTable::default();
        assert!(empty.is_empty());
        assert_eq!(empty.earliest_date(), None);
    }
}
