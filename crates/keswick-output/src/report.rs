//! Press-release return reports and ratio tables.

use chrono::NaiveDate;
use keswick_core::{
    DEFAULT_OFFSETS, PriceTable, ResolveError, average_release_interval, resolve_return,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while assembling a report.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ReportError {
    /// A price lookup or derived calculation failed.
    #[error("resolution error: {0}")]
    Resolve(#[from] ResolveError),

    /// The report would have no rows.
    #[error("no press releases for {symbol}")]
    NoReleases {
        /// Symbol the report was requested for.
        symbol: String,
    },
}

/// One dated press release headed for a report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PressEntry {
    /// Publication date.
    pub date: NaiveDate,
    /// Headline.
    pub title: String,
}

impl PressEntry {
    /// Create an entry.
    pub fn new(date: NaiveDate, title: impl Into<String>) -> Self {
        Self {
            date,
            title: title.into(),
        }
    }
}

/// One row of the press report. Field names mirror the report columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PressReportRow {
    /// Ticker symbol.
    #[serde(rename = "Symbol")]
    pub symbol: String,
    /// Release date.
    #[serde(rename = "Date")]
    pub date: NaiveDate,
    /// Release headline.
    #[serde(rename = "Title")]
    pub title: String,
    /// Close on or before the release date.
    #[serde(rename = "Previous Close")]
    pub previous_close: f64,
    /// Close one day ahead.
    #[serde(rename = "Days Ahead: 1")]
    pub ahead_1: f64,
    /// Close three days ahead.
    #[serde(rename = "Days Ahead: 3")]
    pub ahead_3: f64,
    /// Close five days ahead.
    #[serde(rename = "Days Ahead: 5")]
    pub ahead_5: f64,
    /// Change from previous close to one day ahead.
    #[serde(rename = "%: PC -> 1")]
    pub pct_1: f64,
    /// Change from previous close to three days ahead.
    #[serde(rename = "%: PC -> 3")]
    pub pct_3: f64,
    /// Change from previous close to five days ahead.
    #[serde(rename = "%: PC -> 5")]
    pub pct_5: f64,
}

/// Headline metrics for a press report: the cadence figure and the mean
/// percentage move per forward offset (the report's average cells).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PressSummary {
    /// Average days between consecutive releases.
    pub average_days_between_releases: i64,
    /// Mean of the 1-day percentage changes.
    pub mean_pct_1: f64,
    /// Mean of the 3-day percentage changes.
    pub mean_pct_3: f64,
    /// Mean of the 5-day percentage changes.
    pub mean_pct_5: f64,
}

/// A complete press-release return report for one symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PressReport {
    /// Ticker symbol.
    pub symbol: String,
    /// Headline metrics.
    pub summary: PressSummary,
    /// One row per release, newest first.
    pub rows: Vec<PressReportRow>,
}

impl PressReport {
    /// Assemble a report from press entries (newest first) and the
    /// symbol's close table.
    ///
    /// # Errors
    ///
    /// [`ReportError::NoReleases`] when `entries` is empty, and any
    /// resolution error from the per-row lookups. A report needs at least
    /// 3 releases for the cadence figure, per
    /// [`average_release_interval`].
    pub fn build(
        symbol: &str,
        entries: &[PressEntry],
        table: &PriceTable,
        today: NaiveDate,
    ) -> Result<Self, ReportError> {
        if entries.is_empty() {
            return Err(ReportError::NoReleases {
                symbol: symbol.to_string(),
            });
        }

        let dates: Vec<NaiveDate> = entries.iter().map(|entry| entry.date).collect();
        let average_days_between_releases = average_release_interval(&dates)?;

        let mut rows = Vec::with_capacity(entries.len());
        for entry in entries {
            let resolved = resolve_return(entry.date, table, &DEFAULT_OFFSETS, today)?;
            rows.push(PressReportRow {
                symbol: symbol.to_string(),
                date: entry.date,
                title: entry.title.clone(),
                previous_close: resolved.previous_close,
                ahead_1: resolved.forward[0].close,
                ahead_3: resolved.forward[1].close,
                ahead_5: resolved.forward[2].close,
                pct_1: resolved.forward[0].pct_change,
                pct_3: resolved.forward[1].pct_change,
                pct_5: resolved.forward[2].pct_change,
            });
        }

        let count = rows.len() as f64;
        let summary = PressSummary {
            average_days_between_releases,
            mean_pct_1: rows.iter().map(|r| r.pct_1).sum::<f64>() / count,
            mean_pct_3: rows.iter().map(|r| r.pct_3).sum::<f64>() / count,
            mean_pct_5: rows.iter().map(|r| r.pct_5).sum::<f64>() / count,
        };

        Ok(Self {
            symbol: symbol.to_string(),
            summary,
            rows,
        })
    }
}

/// One named ratio over the reported periods, newest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatioRow {
    /// Display name of the ratio.
    pub name: String,
    /// One value per period; `None` where the source had no figure.
    pub values: Vec<Option<f64>>,
}

/// Financial ratios for one ticker over its last annual periods.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatioTable {
    /// Ticker symbol.
    pub symbol: String,
    /// Number of periods covered.
    pub periods: usize,
    /// Ratio rows in display order.
    pub rows: Vec<RatioRow>,
}

impl RatioTable {
    /// Build a table from `(name, series)` pairs; `periods` is the longest
    /// series length.
    pub fn new(symbol: &str, rows: Vec<(String, Vec<Option<f64>>)>) -> Self {
        let periods = rows.iter().map(|(_, values)| values.len()).max().unwrap_or(0);
        Self {
            symbol: symbol.to_string(),
            periods,
            rows: rows
                .into_iter()
                .map(|(name, values)| RatioRow { name, values })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn d(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn sample_table() -> PriceTable {
        PriceTable::from_iso_pairs([
            ("2024-01-02", 100.0),
            ("2024-01-03", 102.0),
            ("2024-01-05", 105.0),
            ("2024-01-08", 110.0),
            ("2024-02-01", 120.0),
            ("2024-03-01", 130.0),
        ])
        .unwrap()
    }

    fn sample_entries() -> Vec<PressEntry> {
        vec![
            PressEntry::new(d("2024-03-01"), "third"),
            PressEntry::new(d("2024-02-01"), "second"),
            PressEntry::new(d("2024-01-02"), "first"),
        ]
    }

    #[test]
    fn test_build_press_report() {
        let report =
            PressReport::build("NVDA", &sample_entries(), &sample_table(), d("2024-06-01"))
                .unwrap();

        assert_eq!(report.rows.len(), 3);
        assert_eq!(report.summary.average_days_between_releases, 29);

        let first = &report.rows[2];
        assert_eq!(first.previous_close, 100.0);
        assert_eq!(first.ahead_1, 102.0);
        assert_eq!(first.ahead_3, 105.0);
        assert_eq!(first.ahead_5, 110.0);
        assert_relative_eq!(first.pct_1, 0.02);
        assert_relative_eq!(first.pct_3, 0.05);
        assert_relative_eq!(first.pct_5, 0.10);
    }

    #[test]
    fn test_summary_means() {
        let report =
            PressReport::build("NVDA", &sample_entries(), &sample_table(), d("2024-06-01"))
                .unwrap();

        let expected: f64 =
            report.rows.iter().map(|r| r.pct_1).sum::<f64>() / report.rows.len() as f64;
        assert_relative_eq!(report.summary.mean_pct_1, expected);
    }

    #[test]
    fn test_empty_entries_rejected() {
        let result = PressReport::build("NVDA", &[], &sample_table(), d("2024-06-01"));
        assert!(matches!(result, Err(ReportError::NoReleases { .. })));
    }

    #[test]
    fn test_too_few_entries_surface_core_error() {
        let entries = vec![PressEntry::new(d("2024-03-01"), "only")];
        let result = PressReport::build("NVDA", &entries, &sample_table(), d("2024-06-01"));
        assert!(matches!(
            result,
            Err(ReportError::Resolve(ResolveError::EmptyObservationSet { count: 1 }))
        ));
    }

    #[test]
    fn test_ratio_table_periods() {
        let table = RatioTable::new(
            "NVDA",
            vec![
                ("Current Ratio".to_string(), vec![Some(3.5), Some(2.8)]),
                ("P/E".to_string(), vec![Some(60.0), Some(55.0), None]),
            ],
        );
        assert_eq!(table.periods, 3);
        assert_eq!(table.rows.len(), 2);
    }
}
