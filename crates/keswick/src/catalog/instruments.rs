//! Instrument records and the default catalog entries.

use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Broad category of a catalog instrument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
pub enum InstrumentCategory {
    /// Equity market index.
    #[display("Index")]
    Index,
    /// Implied-volatility gauge.
    #[display("Volatility")]
    Volatility,
    /// Exchange-traded fund.
    #[display("ETF")]
    Etf,
    /// Commodity benchmark.
    #[display("Commodity")]
    Commodity,
}

/// A catalog instrument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instrument {
    /// Quote symbol, e.g. `^GSPC`.
    pub symbol: String,
    /// Display name.
    pub name: String,
    /// Region or market the instrument covers.
    pub region: String,
    /// One-paragraph description for the report profile block.
    pub description: String,
    /// Broad category.
    pub category: InstrumentCategory,
}

impl Instrument {
    /// Create an instrument record.
    pub fn new(
        symbol: impl Into<String>,
        name: impl Into<String>,
        region: impl Into<String>,
        description: impl Into<String>,
        category: InstrumentCategory,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            name: name.into(),
            region: region.into(),
            description: description.into(),
            category,
        }
    }
}

/// The built-in catalog behind the index reports.
#[derive(Debug, Clone)]
pub struct IndexCatalog {
    instruments: Vec<Instrument>,
    by_symbol: HashMap<String, usize>,
}

impl IndexCatalog {
    /// Create the catalog with the default instruments.
    pub fn new() -> Self {
        let instruments = Self::default_instruments();
        let by_symbol = instruments
            .iter()
            .enumerate()
            .map(|(i, inst)| (inst.symbol.clone(), i))
            .collect();
        Self {
            instruments,
            by_symbol,
        }
    }

    /// All instruments in catalog order.
    pub fn instruments(&self) -> &[Instrument] {
        &self.instruments
    }

    /// All symbols in catalog order.
    pub fn symbols(&self) -> Vec<String> {
        self.instruments
            .iter()
            .map(|inst| inst.symbol.clone())
            .collect()
    }

    /// Look up an instrument by symbol.
    pub fn get(&self, symbol: &str) -> Option<&Instrument> {
        self.by_symbol
            .get(symbol)
            .map(|&index| &self.instruments[index])
    }

    /// Instruments in one category, in catalog order.
    pub fn by_category(&self, category: InstrumentCategory) -> Vec<&Instrument> {
        self.instruments
            .iter()
            .filter(|inst| inst.category == category)
            .collect()
    }

    /// Instruments whose region contains `region`, case-insensitively, so
    /// `"U.S."` also matches `"U.S. small cap"`.
    pub fn by_region(&self, region: &str) -> Vec<&Instrument> {
        let needle = region.to_lowercase();
        self.instruments
            .iter()
            .filter(|inst| inst.region.to_lowercase().contains(&needle))
            .collect()
    }

    fn default_instruments() -> Vec<Instrument> {
        use InstrumentCategory::{Etf, Index, Volatility};

        vec![
            Instrument::new(
                "^GSPC",
                "S&P 500",
                "U.S.",
                "Market-capitalization-weighted index of 500 leading publicly traded companies in the U.S.",
                Index,
            ),
            Instrument::new(
                "^IXIC",
                "Nasdaq Composite",
                "U.S.",
                "Market-capitalization-weighted index of more than 3,700 stocks listed on the Nasdaq stock exchange.",
                Index,
            ),
            Instrument::new(
                "^NDX",
                "Nasdaq 100",
                "U.S. tech stocks",
                "Basket of the 100 largest, most actively traded companies listed on the Nasdaq stock exchange.",
                Index,
            ),
            Instrument::new(
                "^DJI",
                "Dow Jones",
                "U.S. blue chip stocks",
                "Index of 30 large, publicly-owned blue-chip companies trading on the NYSE and Nasdaq.",
                Index,
            ),
            Instrument::new(
                "^RUT",
                "Russell 2000",
                "U.S. small cap",
                "Small-cap index covering the smallest 2,000 stocks in the Russell 3000.",
                Index,
            ),
            Instrument::new(
                "^RUA",
                "Russell 3000",
                "U.S. stock market",
                "Capitalization-weighted benchmark of the 3,000 largest publicly held companies incorporated in America.",
                Index,
            ),
            Instrument::new(
                "^STOXX50E",
                "Euro Stoxx 50",
                "Europe",
                "Capitalization-weighted index of 50 large, blue-chip European companies operating within eurozone nations.",
                Index,
            ),
            Instrument::new(
                "^STOXX",
                "Stoxx Europe 600",
                "Europe",
                "Fixed 600 components representing large, mid and small-capitalization companies from 17 European countries.",
                Index,
            ),
            Instrument::new(
                "^FTSE",
                "FTSE 100",
                "UK",
                "Share index of the 100 companies on the London Stock Exchange with the highest market capitalisation.",
                Index,
            ),
            Instrument::new(
                "^FTMC",
                "FTSE 250",
                "UK",
                "Capitalisation-weighted index of the 101st to the 350th largest companies on the London Stock Exchange.",
                Index,
            ),
            Instrument::new(
                "^GSPTSE",
                "S&P/TSX Composite",
                "Canada",
                "Headline index for the Canadian equity market.",
                Index,
            ),
            Instrument::new(
                "^GDAXI",
                "DAX 40",
                "Germany",
                "Index of 40 of the largest and most liquid German companies trading on the Frankfurt Exchange.",
                Index,
            ),
            Instrument::new(
                "^HSI",
                "Hang Seng",
                "Hong Kong",
                "Free-float market-capitalization-weighted index of the sixty largest companies on the Hong Kong Exchange.",
                Index,
            ),
            Instrument::new(
                "^N225",
                "Nikkei 225",
                "Japan",
                "Price-weighted index of Japan's top 225 blue-chip companies on the Tokyo Stock Exchange.",
                Index,
            ),
            Instrument::new(
                "^AXJO",
                "ASX 200",
                "Australia",
                "Benchmark institutional investable index of the 200 largest Australian stocks by float-adjusted market capitalization.",
                Index,
            ),
            Instrument::new(
                "^VIX",
                "VIX",
                "U.S.",
                "Real-time index of the market's expectation of volatility over the coming 30 days.",
                Volatility,
            ),
            Instrument::new(
                "^VXD",
                "Dow Jones Volatility",
                "U.S.",
                "VIX-style estimate of the expected 30-day volatility of DJIA returns.",
                Volatility,
            ),
            Instrument::new(
                "^VOLQ",
                "Nasdaq 100 Volatility",
                "U.S. tech",
                "Measures changes in 30-day implied volatility of the Nasdaq-100 index.",
                Volatility,
            ),
            Instrument::new(
                "^RVX",
                "Russell 2000 Volatility",
                "U.S. small cap",
                "VIX-style estimate of the expected 30-day volatility of Russell 2000 returns.",
                Volatility,
            ),
            Instrument::new(
                "^OVX",
                "Crude Oil Volatility",
                "Commodities",
                "Estimate of the expected 30-day volatility of crude oil as priced by the United States Oil Fund.",
                Volatility,
            ),
            Instrument::new(
                "^GVZ",
                "Gold Volatility",
                "Commodities",
                "Estimate of the expected 30-day volatility of returns on the SPDR Gold Shares ETF.",
                Volatility,
            ),
            Instrument::new(
                "XLY",
                "Consumer Discretionary",
                "U.S.",
                "Market-cap-weighted basket of consumer-discretionary stocks drawn from the S&P 500.",
                Etf,
            ),
            Instrument::new(
                "XLP",
                "Consumer Staples",
                "U.S.",
                "Consumer staples exposure drawn from the S&P 500; holdings are nearly all large-caps.",
                Etf,
            ),
            Instrument::new(
                "XLE",
                "Energy",
                "U.S.",
                "Liquid exposure to a market-like basket of US energy firms, concentrated in the industry giants.",
                Etf,
            ),
            Instrument::new(
                "XLF",
                "Financials",
                "U.S.",
                "Index of S&P 500 financial stocks, weighted by market cap.",
                Etf,
            ),
            Instrument::new(
                "SMH",
                "Semiconductors",
                "U.S.",
                "Market-cap-weighted index of 25 of the largest US-listed semiconductor companies.",
                Etf,
            ),
            Instrument::new(
                "IWM",
                "iShares Russell 2000",
                "U.S. small cap",
                "Tracks an index composed of small-capitalization U.S. equities.",
                Etf,
            ),
        ]
    }
}

impl Default for IndexCatalog {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_lookup_by_symbol() {
        let catalog = IndexCatalog::new();
        let sp500 = catalog.get("^GSPC").unwrap();
        assert_eq!(sp500.name, "S&P 500");
        assert_eq!(sp500.category, InstrumentCategory::Index);
        assert!(catalog.get("^NOPE").is_none());
    }

    #[rstest]
    #[case(InstrumentCategory::Index, "^GSPC")]
    #[case(InstrumentCategory::Volatility, "^VIX")]
    #[case(InstrumentCategory::Etf, "XLY")]
    fn test_by_category(#[case] category: InstrumentCategory, #[case] expected: &str) {
        let catalog = IndexCatalog::new();
        let instruments = catalog.by_category(category);
        assert!(!instruments.is_empty());
        assert!(instruments.iter().any(|inst| inst.symbol == expected));
    }

    #[test]
    fn test_by_region_is_substring_match() {
        let catalog = IndexCatalog::new();

        let uk = catalog.by_region("uk");
        assert!(uk.iter().any(|inst| inst.symbol == "^FTSE"));
        assert!(uk.iter().any(|inst| inst.symbol == "^FTMC"));

        // "U.S." matches the plain and qualified regions alike.
        let us = catalog.by_region("U.S.");
        assert!(us.iter().any(|inst| inst.symbol == "^GSPC"));
        assert!(us.iter().any(|inst| inst.symbol == "^RUT"));
    }

    #[test]
    fn test_symbols_are_unique() {
        let catalog = IndexCatalog::new();
        let mut symbols = catalog.symbols();
        symbols.sort();
        symbols.dedup();
        assert_eq!(symbols.len(), catalog.instruments().len());
    }

    #[test]
    fn test_category_display() {
        assert_eq!(InstrumentCategory::Etf.to_string(), "ETF");
        assert_eq!(InstrumentCategory::Volatility.to_string(), "Volatility");
    }
}
