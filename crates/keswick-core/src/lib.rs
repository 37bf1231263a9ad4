#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/keswick-reports/keswick/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod error;
pub mod interval;
pub mod resolve;
pub mod returns;
pub mod screener;
pub mod table;

pub use error::{ResolveError, Result};
pub use interval::average_release_interval;
pub use resolve::{MAX_LOOKBACK_DAYS, resolve_backward, resolve_forward};
pub use returns::{
    DEFAULT_OFFSETS, Dated, ForwardReturn, ResolvedReturn, derive_returns, resolve_return,
};
pub use screener::Verification;
pub use table::PriceTable;

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
