//! Quote data fetching from Yahoo Finance.

use crate::error::{DataError, Result};
use chrono::{DateTime, NaiveDate, Utc};
use derive_more::Display;
use keswick_core::PriceTable;
use std::time::Duration;
use tokio::time::sleep;
use yahoo_finance_api as yahoo;

/// Sampling interval for historical quotes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Interval {
    /// Daily bars.
    #[display("1d")]
    Day,
    /// Weekly bars.
    #[display("1wk")]
    Week,
    /// Monthly bars.
    #[display("1mo")]
    Month,
}

impl Interval {
    /// Yahoo's wire representation of the interval.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Day => "1d",
            Self::Week => "1wk",
            Self::Month => "1mo",
        }
    }
}

/// One OHLCV bar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuoteBar {
    /// Trading day the bar covers.
    pub date: NaiveDate,
    /// Opening price.
    pub open: f64,
    /// Session high.
    pub high: f64,
    /// Session low.
    pub low: f64,
    /// Closing price.
    pub close: f64,
    /// Dividend/split adjusted close.
    pub adj_close: f64,
    /// Traded volume.
    pub volume: u64,
}

/// Yahoo Finance quote provider with rate limiting.
pub struct YahooQuoteProvider {
    provider: yahoo::YahooConnector,
    rate_limit_delay: Duration,
}

impl std::fmt::Debug for YahooQuoteProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("YahooQuoteProvider")
            .field("rate_limit_delay", &self.rate_limit_delay)
            .finish_non_exhaustive()
    }
}

impl YahooQuoteProvider {
    /// Create a provider with default rate limiting (1 req/sec).
    pub fn new() -> Result<Self> {
        Self::with_rate_limit(Duration::from_millis(1000))
    }

    /// Create a provider with custom rate limiting.
    pub fn with_rate_limit(rate_limit_delay: Duration) -> Result<Self> {
        Ok(Self {
            provider: yahoo::YahooConnector::new()?,
            rate_limit_delay,
        })
    }

    /// Fetch OHLCV bars for a single symbol at the given interval.
    ///
    /// # Errors
    ///
    /// [`DataError::InvalidSymbol`] on an empty symbol,
    /// [`DataError::MissingData`] when Yahoo has nothing for the range, and
    /// the transport errors otherwise.
    pub async fn fetch_quotes(
        &self,
        symbol: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        interval: Interval,
    ) -> Result<Vec<QuoteBar>> {
        if symbol.is_empty() {
            return Err(DataError::InvalidSymbol("Empty symbol".to_string()));
        }
        if start > end {
            return Err(DataError::InvalidDateRange {
                start: start.to_rfc3339(),
                end: end.to_rfc3339(),
            });
        }

        let start_time = time::OffsetDateTime::from_unix_timestamp(start.timestamp())
            .map_err(|e| DataError::TimeConversion(e.to_string()))?;
        let end_time = time::OffsetDateTime::from_unix_timestamp(end.timestamp())
            .map_err(|e| DataError::TimeConversion(e.to_string()))?;

        let response = self
            .provider
            .get_quote_history_interval(symbol, start_time, end_time, interval.as_str())
            .await?;

        let quotes = response
            .quotes()
            .map_err(|e| DataError::YahooApi(e.to_string()))?;

        if quotes.is_empty() {
            return Err(DataError::MissingData {
                symbol: symbol.to_string(),
                reason: "No data returned from Yahoo Finance".to_string(),
            });
        }

        let mut bars = Vec::with_capacity(quotes.len());
        for quote in &quotes {
            let date = DateTime::from_timestamp(quote.timestamp, 0)
                .ok_or_else(|| {
                    DataError::TimeConversion(format!("invalid timestamp: {}", quote.timestamp))
                })?
                .date_naive();
            bars.push(QuoteBar {
                date,
                open: quote.open,
                high: quote.high,
                low: quote.low,
                close: quote.close,
                adj_close: quote.adjclose,
                volume: quote.volume,
            });
        }

        // Apply rate limiting
        sleep(self.rate_limit_delay).await;

        Ok(bars)
    }

    /// Fetch a close table for a single symbol; convenience for feeding
    /// the resolver.
    pub async fn price_table(
        &self,
        symbol: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<PriceTable> {
        let bars = self
            .fetch_quotes(symbol, start, end, Interval::Day)
            .await?;
        Ok(bars.iter().map(|bar| (bar.date, bar.close)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Interval::Day, "1d")]
    #[case(Interval::Week, "1wk")]
    #[case(Interval::Month, "1mo")]
    fn test_interval_wire_format(#[case] interval: Interval, #[case] expected: &str) {
        assert_eq!(interval.as_str(), expected);
        assert_eq!(interval.to_string(), expected);
    }

    #[tokio::test]
    async fn test_empty_symbol_rejected() {
        let provider = YahooQuoteProvider::new().unwrap();
        let end = Utc::now();
        let start = end - chrono::Duration::days(30);
        let result = provider.fetch_quotes("", start, end, Interval::Day).await;
        assert!(matches!(result, Err(DataError::InvalidSymbol(_))));
    }

    #[tokio::test]
    async fn test_inverted_range_rejected() {
        let provider = YahooQuoteProvider::new().unwrap();
        let start = Utc::now();
        let end = start - chrono::Duration::days(30);
        let result = provider.fetch_quotes("AAPL", start, end, Interval::Day).await;
        assert!(matches!(result, Err(DataError::InvalidDateRange { .. })));
    }
}
