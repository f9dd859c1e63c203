#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/hotball/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod error;
pub mod loader;
pub mod prices;
pub mod sectors;

pub use error::{DataError, Result};
pub use loader::{LoadOptions, load_prices, load_sectors, read_prices, read_sectors};
pub use prices::PriceTable;
pub use sectors::SectorMapping;

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
