//! HTTP client for Financial Modeling Prep.

use crate::error::{DataError, Result};
use crate::fmp::types::{
    CompanyProfile, PressRelease, PriceHistory, SegmentRevenue, SymbolListing,
};
use futures::{StreamExt, stream};
use keswick_core::PriceTable;
use serde::de::DeserializeOwned;
use std::collections::HashSet;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

const BASE_V3: &str = "https://financialmodelingprep.com/api/v3";
const BASE_V4: &str = "https://financialmodelingprep.com/api/v4";

/// Statement endpoints default to the last 5 annual periods.
const DEFAULT_ROW_LIMIT: u32 = 5;

/// Per-request timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Configuration for [`FmpClient`]: the credential, the statement row
/// limit, and an optional per-client call budget.
#[derive(Debug, Clone)]
pub struct FmpConfig {
    /// FMP API key.
    pub api_key: String,
    /// Number of periods requested from statement endpoints.
    pub row_limit: u32,
    /// Maximum number of HTTP calls this client may make, if bounded.
    pub call_budget: Option<u32>,
}

impl FmpConfig {
    /// Configuration with the default row limit and no call budget.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            row_limit: DEFAULT_ROW_LIMIT,
            call_budget: None,
        }
    }

    /// Override the statement row limit.
    #[must_use]
    pub const fn with_row_limit(mut self, row_limit: u32) -> Self {
        self.row_limit = row_limit;
        self
    }

    /// Bound the number of calls this client may make.
    #[must_use]
    pub const fn with_call_budget(mut self, budget: u32) -> Self {
        self.call_budget = Some(budget);
        self
    }
}

/// Financial Modeling Prep client.
///
/// All calls are independent, side-effect-free GETs; a batch of tickers can
/// be fanned out concurrently with [`FmpClient::price_tables`].
pub struct FmpClient {
    http: reqwest::Client,
    config: FmpConfig,
    calls: AtomicU32,
}

impl std::fmt::Debug for FmpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FmpClient")
            .field("row_limit", &self.config.row_limit)
            .field("call_budget", &self.config.call_budget)
            .field("calls", &self.calls.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

impl FmpClient {
    /// Create a client from an explicit configuration.
    pub fn new(config: FmpConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            http,
            config,
            calls: AtomicU32::new(0),
        })
    }

    /// Number of HTTP calls made so far.
    pub fn calls_made(&self) -> u32 {
        self.calls.load(Ordering::Relaxed)
    }

    /// GET a URL and deserialize the JSON body, surfacing FMP's in-band
    /// error payload and enforcing the call budget.
    async fn get_json<T: DeserializeOwned>(&self, url: String) -> Result<T> {
        if let Some(budget) = self.config.call_budget {
            if self.calls.fetch_add(1, Ordering::SeqCst) >= budget {
                return Err(DataError::CallBudget { budget });
            }
        } else {
            self.calls.fetch_add(1, Ordering::SeqCst);
        }

        let body: serde_json::Value = self.http.get(url).send().await?.json().await?;

        // FMP reports failures as 200s with an "Error Message" field.
        if let Some(message) = body.get("Error Message").and_then(|m| m.as_str()) {
            return Err(DataError::Api(message.to_string()));
        }

        Ok(serde_json::from_value(body)?)
    }

    /// All symbols FMP supports.
    pub async fn symbol_list(&self) -> Result<Vec<SymbolListing>> {
        let url = format!("{BASE_V3}/stock/list?apikey={}", self.config.api_key);
        self.get_json(url).await
    }

    /// Uppercase the given tickers and keep those FMP supports, preserving
    /// input order.
    pub async fn check_symbols(&self, tickers: &[String]) -> Result<Vec<String>> {
        let supported: HashSet<String> = self
            .symbol_list()
            .await?
            .into_iter()
            .map(|listing| listing.symbol)
            .collect();

        Ok(tickers
            .iter()
            .map(|ticker| ticker.to_uppercase())
            .filter(|ticker| supported.contains(ticker))
            .collect())
    }

    /// Historical close series for one symbol (line serietype, up to 30
    /// years).
    pub async fn historical_prices(&self, ticker: &str) -> Result<PriceHistory> {
        let url = format!(
            "{BASE_V3}/historical-price-full/{ticker}?serietype=line&apikey={}",
            self.config.api_key
        );
        self.get_json(url).await
    }

    /// Historical closes for one symbol as a [`PriceTable`].
    pub async fn price_table(&self, ticker: &str) -> Result<PriceTable> {
        Ok(self.historical_prices(ticker).await?.to_price_table())
    }

    /// Fetch price tables for many tickers with bounded concurrency.
    ///
    /// Each ticker's fetch is independent; per-ticker failures are returned
    /// alongside the successes rather than aborting the batch.
    pub async fn price_tables(
        &self,
        tickers: &[String],
        concurrency: usize,
    ) -> Vec<(String, Result<PriceTable>)> {
        stream::iter(tickers)
            .map(|ticker| async move {
                let table = self.price_table(ticker).await;
                (ticker.clone(), table)
            })
            .buffer_unordered(concurrency.max(1))
            .collect()
            .await
    }

    /// Press releases for one symbol, newest first as delivered.
    pub async fn press_releases(&self, ticker: &str) -> Result<Vec<PressRelease>> {
        let url = format!(
            "{BASE_V3}/press-releases/{ticker}?apikey={}",
            self.config.api_key
        );
        self.get_json(url).await
    }

    /// Company profile for one symbol.
    pub async fn company_profile(&self, ticker: &str) -> Result<CompanyProfile> {
        let url = format!("{BASE_V3}/profile/{ticker}?apikey={}", self.config.api_key);
        let mut profiles: Vec<CompanyProfile> = self.get_json(url).await?;
        if profiles.is_empty() {
            return Err(DataError::MissingData {
                symbol: ticker.to_string(),
                reason: "no profile returned".to_string(),
            });
        }
        Ok(profiles.swap_remove(0))
    }

    /// Financial ratios for the last `row_limit` annual periods, as raw
    /// rows for [`extract_series`](crate::fmp::extract_series).
    pub async fn ratios(&self, ticker: &str) -> Result<Vec<serde_json::Value>> {
        let url = format!(
            "{BASE_V3}/ratios/{ticker}?apikey={}&limit={}",
            self.config.api_key, self.config.row_limit
        );
        self.get_json(url).await
    }

    /// Key metrics for the last `row_limit` annual periods.
    pub async fn key_metrics(&self, ticker: &str) -> Result<Vec<serde_json::Value>> {
        let url = format!(
            "{BASE_V3}/key-metrics/{ticker}?apikey={}&limit={}",
            self.config.api_key, self.config.row_limit
        );
        self.get_json(url).await
    }

    /// Annual balance sheets for the last `row_limit` periods.
    pub async fn balance_sheet_annual(&self, ticker: &str) -> Result<Vec<serde_json::Value>> {
        let url = format!(
            "{BASE_V3}/balance-sheet-statement/{ticker}?limit={}&apikey={}",
            self.config.row_limit, self.config.api_key
        );
        self.get_json(url).await
    }

    /// Annual revenue broken down by product segment.
    pub async fn sales_per_segment(&self, ticker: &str) -> Result<Vec<SegmentRevenue>> {
        let url = format!(
            "{BASE_V4}/revenue-product-segmentation?symbol={ticker}&structure=flat&period=annual&apikey={}",
            self.config.api_key
        );
        let rows: serde_json::Value = self.get_json(url).await?;
        SegmentRevenue::from_rows(&rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = FmpConfig::new("demo");
        assert_eq!(config.row_limit, DEFAULT_ROW_LIMIT);
        assert_eq!(config.call_budget, None);

        let config = FmpConfig::new("demo").with_row_limit(10).with_call_budget(250);
        assert_eq!(config.row_limit, 10);
        assert_eq!(config.call_budget, Some(250));
    }

    #[tokio::test]
    async fn test_call_budget_enforced_before_any_request() {
        let client = FmpClient::new(FmpConfig::new("demo").with_call_budget(0)).unwrap();
        let result = client.press_releases("NVDA").await;
        assert!(matches!(result, Err(DataError::CallBudget { budget: 0 })));
    }
}
