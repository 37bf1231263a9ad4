//! Built-in instrument catalog.
//!
//! The index reports cover a fixed set of world equity indexes, volatility
//! gauges and sector ETFs. Each entry is a named record rather than a
//! positional tuple, so consumers never index into field positions.

pub mod instruments;

pub use instruments::{IndexCatalog, Instrument, InstrumentCategory};

/// Trait for instrument catalogs.
pub trait Catalog {
    /// Get all symbols in the catalog.
    fn symbols(&self) -> Vec<String>;

    /// Check if a symbol is in the catalog.
    fn contains(&self, symbol: &str) -> bool {
        self.symbols().contains(&symbol.to_string())
    }

    /// Get the number of instruments.
    fn size(&self) -> usize {
        self.symbols().len()
    }
}

impl Catalog for IndexCatalog {
    fn symbols(&self) -> Vec<String> {
        self.symbols()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_trait() {
        let catalog = IndexCatalog::new();

        assert!(catalog.contains("^GSPC"));
        assert!(!catalog.contains("NOTREAL"));
        assert!(catalog.size() >= 20);
    }
}
