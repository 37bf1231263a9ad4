#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/keswick-reports/keswick/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod export;
pub mod report;

pub use export::{ExportError, ExportFormat, Exporter};
pub use report::{
    PressEntry, PressReport, PressReportRow, PressSummary, RatioRow, RatioTable, ReportError,
};

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
