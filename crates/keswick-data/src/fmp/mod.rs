//! Financial Modeling Prep client.

pub mod client;
pub mod types;

pub use client::{FmpClient, FmpConfig};
pub use types::{
    CompanyProfile, HistoricalClose, PressRelease, PriceHistory, SegmentRevenue, SymbolListing,
    extract_series,
};
