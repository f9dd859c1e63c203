#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/hotball/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod aggregator;
pub mod calculator;
pub mod error;
pub mod window;

pub use aggregator::{ReturnColumn, ReturnTable, compute_all_returns};
pub use calculator::{ReturnSeries, compute_return};
pub use error::{Result, ReturnsError};
pub use window::LookbackWindow;

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
