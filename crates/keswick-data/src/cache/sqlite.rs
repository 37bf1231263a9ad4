//! SQLite cache for close series and press releases.
//!
//! Each fetch is stamped with `cached_at`; loads take a maximum age and
//! return `None` when the cached copy is older, so callers fall through to
//! a fresh fetch.

use crate::error::Result;
use crate::fmp::PressRelease;
use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, Utc};
use keswick_core::PriceTable;
use rusqlite::{Connection, params};
use std::path::Path;

/// SQLite cache for market data.
#[derive(Debug)]
pub struct SqliteCache {
    conn: Connection,
}

impl SqliteCache {
    /// Open (or create) a cache at `path`.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        let cache = Self { conn };
        cache.initialize_schema()?;
        Ok(cache)
    }

    /// Create an in-memory cache (useful for testing).
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let cache = Self { conn };
        cache.initialize_schema()?;
        Ok(cache)
    }

    fn initialize_schema(&self) -> Result<()> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS closes (
                symbol TEXT NOT NULL,
                date TEXT NOT NULL,
                close REAL NOT NULL,
                cached_at TEXT NOT NULL,
                PRIMARY KEY (symbol, date)
            )",
            [],
        )?;

        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS press_releases (
                symbol TEXT NOT NULL,
                date TEXT NOT NULL,
                title TEXT NOT NULL,
                body TEXT NOT NULL,
                cached_at TEXT NOT NULL,
                PRIMARY KEY (symbol, date, title)
            )",
            [],
        )?;

        Ok(())
    }

    /// Store a symbol's close table, replacing any previous copy.
    pub fn store_closes(&mut self, symbol: &str, table: &PriceTable) -> Result<usize> {
        let cached_at = Utc::now().to_rfc3339();
        let tx = self.conn.transaction()?;

        tx.execute("DELETE FROM closes WHERE symbol = ?1", params![symbol])?;
        {
            let mut insert = tx.prepare(
                "INSERT INTO closes (symbol, date, close, cached_at)
                 VALUES (?1, ?2, ?3, ?4)",
            )?;
            for (date, close) in table.iter() {
                insert.execute(params![symbol, date.to_string(), close, cached_at])?;
            }
        }

        tx.commit()?;
        Ok(table.len())
    }

    /// Load a symbol's close table if a copy no older than `max_age`
    /// exists.
    pub fn load_closes(&self, symbol: &str, max_age: Duration) -> Result<Option<PriceTable>> {
        if !self.is_fresh("closes", symbol, max_age)? {
            return Ok(None);
        }

        let mut select = self
            .conn
            .prepare("SELECT date, close FROM closes WHERE symbol = ?1")?;
        let rows = select.query_map(params![symbol], |row| {
            let date: String = row.get(0)?;
            let close: f64 = row.get(1)?;
            Ok((date, close))
        })?;

        let mut closes = Vec::new();
        for row in rows {
            let (date, close) = row?;
            let date = date
                .parse::<NaiveDate>()
                .map_err(|e| crate::error::DataError::Parse(e.to_string()))?;
            closes.push((date, close));
        }

        if closes.is_empty() {
            return Ok(None);
        }
        Ok(Some(PriceTable::from_closes(closes)))
    }

    /// Store a symbol's press releases, replacing any previous copy.
    pub fn store_press_releases(
        &mut self,
        symbol: &str,
        releases: &[PressRelease],
    ) -> Result<usize> {
        let cached_at = Utc::now().to_rfc3339();
        let tx = self.conn.transaction()?;

        tx.execute(
            "DELETE FROM press_releases WHERE symbol = ?1",
            params![symbol],
        )?;
        {
            let mut insert = tx.prepare(
                "INSERT OR REPLACE INTO press_releases (symbol, date, title, body, cached_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )?;
            for release in releases {
                insert.execute(params![
                    release.symbol,
                    release.date.format("%Y-%m-%d %H:%M:%S").to_string(),
                    release.title,
                    release.text,
                    cached_at
                ])?;
            }
        }

        tx.commit()?;
        Ok(releases.len())
    }

    /// Load a symbol's press releases if a copy no older than `max_age`
    /// exists, newest first.
    pub fn load_press_releases(
        &self,
        symbol: &str,
        max_age: Duration,
    ) -> Result<Option<Vec<PressRelease>>> {
        if !self.is_fresh("press_releases", symbol, max_age)? {
            return Ok(None);
        }

        let mut select = self.conn.prepare(
            "SELECT symbol, date, title, body FROM press_releases
             WHERE symbol = ?1 ORDER BY date DESC",
        )?;
        let rows = select.query_map(params![symbol], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
            ))
        })?;

        let mut releases = Vec::new();
        for row in rows {
            let (symbol, date, title, text) = row?;
            let date = NaiveDateTime::parse_from_str(&date, "%Y-%m-%d %H:%M:%S")
                .map_err(|e| crate::error::DataError::Parse(e.to_string()))?;
            releases.push(PressRelease {
                symbol,
                date,
                title,
                text,
            });
        }

        if releases.is_empty() {
            return Ok(None);
        }
        Ok(Some(releases))
    }

    /// Drop all cached rows for a symbol.
    pub fn clear(&self, symbol: &str) -> Result<()> {
        self.conn
            .execute("DELETE FROM closes WHERE symbol = ?1", params![symbol])?;
        self.conn.execute(
            "DELETE FROM press_releases WHERE symbol = ?1",
            params![symbol],
        )?;
        Ok(())
    }

    fn is_fresh(&self, table: &str, symbol: &str, max_age: Duration) -> Result<bool> {
        let query = format!("SELECT MAX(cached_at) FROM {table} WHERE symbol = ?1");
        let cached_at: Option<String> =
            self.conn
                .query_row(&query, params![symbol], |row| row.get(0))?;

        let Some(cached_at) = cached_at else {
            return Ok(false);
        };
        let cached_at = DateTime::parse_from_rfc3339(&cached_at)
            .map_err(|e| crate::error::DataError::Parse(e.to_string()))?;

        Ok(Utc::now() - cached_at.with_timezone(&Utc) <= max_age)
    }
}
