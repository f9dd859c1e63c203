#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/hotball/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod error;
pub mod monitor;

// Re-export main types from sub-crates
pub use hotball_data as data;
pub use hotball_output as output;
pub use hotball_returns as returns;

pub use error::{MonitorError, Result};
pub use monitor::{MonitorReport, run_monitor, run_monitor_with_config};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
