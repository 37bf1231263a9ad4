#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/keswick-reports/keswick/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod catalog;

// Re-export main types from sub-crates
pub use keswick_core as core;
pub use keswick_data as data;
pub use keswick_output as output;

// Re-export common catalog types
pub use catalog::{Catalog, IndexCatalog, Instrument, InstrumentCategory};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
