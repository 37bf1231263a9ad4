//! Caching layer for fetched market data.

pub mod sqlite;

pub use sqlite::SqliteCache;
