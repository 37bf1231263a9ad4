//! Typed payloads for the FMP endpoints.

use crate::error::{DataError, Result};
use chrono::{NaiveDate, NaiveDateTime};
use keswick_core::{Dated, PriceTable};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One entry of the FMP symbol list.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SymbolListing {
    /// Ticker symbol.
    pub symbol: String,
    /// Company or instrument name.
    #[serde(default)]
    pub name: Option<String>,
    /// Last traded price.
    #[serde(default)]
    pub price: Option<f64>,
    /// Exchange name.
    #[serde(default)]
    pub exchange: Option<String>,
    /// Short exchange code.
    #[serde(default)]
    pub exchange_short_name: Option<String>,
    /// Instrument type as reported by FMP (stock, etf, trust, ...).
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
}

/// A single historical close.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistoricalClose {
    /// Trading day.
    pub date: NaiveDate,
    /// Closing price.
    pub close: f64,
}

/// Historical close series for one symbol, newest first as delivered.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceHistory {
    /// Ticker symbol.
    pub symbol: String,
    /// Close series; empty when FMP has no data for the symbol.
    #[serde(default)]
    pub historical: Vec<HistoricalClose>,
}

impl PriceHistory {
    /// Collapse the series into a date-keyed [`PriceTable`].
    pub fn to_price_table(&self) -> PriceTable {
        self.historical
            .iter()
            .map(|entry| (entry.date, entry.close))
            .collect()
    }
}

/// A company press release.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PressRelease {
    /// Ticker symbol.
    pub symbol: String,
    /// Publication timestamp, e.g. `2023-05-25 17:00:00`.
    #[serde(with = "fmp_datetime")]
    pub date: NaiveDateTime,
    /// Headline.
    pub title: String,
    /// Full body text.
    #[serde(default)]
    pub text: String,
}

impl Dated for PressRelease {
    fn date(&self) -> NaiveDate {
        self.date.date()
    }
}

/// Company profile for one symbol.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyProfile {
    /// Ticker symbol.
    pub symbol: String,
    /// Last traded price.
    #[serde(default)]
    pub price: Option<f64>,
    /// Registered company name.
    #[serde(default)]
    pub company_name: Option<String>,
    /// Listing exchange.
    #[serde(default)]
    pub exchange: Option<String>,
    /// GICS-style sector label.
    #[serde(default)]
    pub sector: Option<String>,
    /// Industry label.
    #[serde(default)]
    pub industry: Option<String>,
    /// Business description.
    #[serde(default)]
    pub description: Option<String>,
    /// Country of incorporation.
    #[serde(default)]
    pub country: Option<String>,
}

/// Revenue for one reporting period, broken down by segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentRevenue {
    /// Period end date.
    pub period: NaiveDate,
    /// Segment name to revenue.
    pub segments: BTreeMap<String, f64>,
}

impl SegmentRevenue {
    /// Parse FMP's v4 flat segmentation payload: a list of single-key
    /// objects mapping a period date to a `{segment: revenue}` object.
    pub fn from_rows(rows: &serde_json::Value) -> Result<Vec<Self>> {
        let rows = rows
            .as_array()
            .ok_or_else(|| DataError::Parse("segmentation payload is not an array".into()))?;

        let mut result = Vec::with_capacity(rows.len());
        for row in rows {
            let object = row
                .as_object()
                .ok_or_else(|| DataError::Parse("segmentation row is not an object".into()))?;
            for (date, segments) in object {
                let period = NaiveDate::parse_from_str(date, "%Y-%m-%d")
                    .map_err(|_| DataError::Parse(format!("invalid period date: {date}")))?;
                let segments = segments
                    .as_object()
                    .ok_or_else(|| DataError::Parse("segment map is not an object".into()))?
                    .iter()
                    .filter_map(|(name, value)| value.as_f64().map(|v| (name.clone(), v)))
                    .collect();
                result.push(Self { period, segments });
            }
        }
        Ok(result)
    }
}

/// Extract one numeric field from a list of statement rows, as returned by
/// the ratios, key-metrics and balance-sheet endpoints. Missing or
/// non-numeric values come back as `None`; `round2` rounds to 2 decimal
/// places at extraction, matching the report columns.
pub fn extract_series(rows: &[serde_json::Value], key: &str, round2: bool) -> Vec<Option<f64>> {
    rows.iter()
        .map(|row| {
            let value = row.get(key)?.as_f64()?;
            Some(if round2 {
                (value * 100.0).round() / 100.0
            } else {
                value
            })
        })
        .collect()
}

mod fmp_datetime {
    //! FMP timestamps come as `YYYY-MM-DD HH:MM:SS`, occasionally as a
    //! bare date.

    use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%d %H:%M:%S";

    pub(super) fn serialize<S: Serializer>(
        value: &NaiveDateTime,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.format(FORMAT).to_string())
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&raw, FORMAT)
            .or_else(|_| {
                NaiveDate::parse_from_str(&raw, "%Y-%m-%d").map(|d| d.and_time(NaiveTime::MIN))
            })
            .map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    #[test]
    fn test_price_history_to_table() {
        let json = r#"{
            "symbol": "NVDA",
            "historical": [
                {"date": "2023-05-26", "close": 389.0214},
                {"date": "2023-05-25", "close": 379.8}
            ]
        }"#;
        let history: PriceHistory = serde_json::from_str(json).unwrap();
        let table = history.to_price_table();
        assert_eq!(table.len(), 2);
        assert_eq!(
            table.get(NaiveDate::from_ymd_opt(2023, 5, 25).unwrap()),
            Some(379.8)
        );
    }

    #[test]
    fn test_press_release_dates() {
        let json = r#"{
            "symbol": "NVDA",
            "date": "2023-05-25 17:00:00",
            "title": "NVIDIA ANNOUNCES UPCOMING EVENTS",
            "text": "SANTA CLARA, CALIF. ..."
        }"#;
        let release: PressRelease = serde_json::from_str(json).unwrap();
        assert_eq!(
            Dated::date(&release),
            NaiveDate::from_ymd_opt(2023, 5, 25).unwrap()
        );

        // Bare dates are accepted too.
        let json = r#"{"symbol": "NVDA", "date": "2023-05-25", "title": "t"}"#;
        let release: PressRelease = serde_json::from_str(json).unwrap();
        assert_eq!(release.date.time(), NaiveTime::MIN);
    }

    #[test]
    fn test_extract_series() {
        let rows: Vec<serde_json::Value> = serde_json::from_str(
            r#"[
                {"currentRatio": 3.521, "peRatio": 60.0},
                {"currentRatio": 2.789},
                {"peRatio": 55.0}
            ]"#,
        )
        .unwrap();

        assert_eq!(
            extract_series(&rows, "currentRatio", true),
            vec![Some(3.52), Some(2.79), None]
        );
        assert_eq!(
            extract_series(&rows, "currentRatio", false),
            vec![Some(3.521), Some(2.789), None]
        );
    }

    #[test]
    fn test_segment_revenue_from_rows() {
        let rows: serde_json::Value = serde_json::from_str(
            r#"[
                {"2023-01-29": {"Gaming": 9067000000.0, "Data Center": 15005000000.0}},
                {"2022-01-30": {"Gaming": 12462000000.0}}
            ]"#,
        )
        .unwrap();

        let segments = SegmentRevenue::from_rows(&rows).unwrap();
        assert_eq!(segments.len(), 2);
        assert_eq!(
            segments[0].period,
            NaiveDate::from_ymd_opt(2023, 1, 29).unwrap()
        );
        assert_eq!(segments[0].segments["Gaming"], 9067000000.0);
    }
}
