//! Look-back windows.
//!
//! Windows are plain calendar-day offsets from the as-of date. Weekends and
//! holidays are not special-cased: a start date that falls outside the price
//! index simply begins the slice at the next available row.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Date format used in column labels.
pub const LABEL_DATE_FORMAT: &str = "%Y-%m-%d";

/// Trailing windows reported by the monitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LookbackWindow {
    /// 7 calendar days
    SevenDay,

    /// 30 calendar days
    OneMonth,

    /// 90 calendar days
    ThreeMonth,

    /// 180 calendar days
    SixMonth,
}

impl LookbackWindow {
    /// All windows, shortest first.
    pub const ALL: [Self; 4] = [
        Self::SevenDay,
        Self::OneMonth,
        Self::ThreeMonth,
        Self::SixMonth,
    ];

    /// Length of the window in calendar days.
    pub const fn days(&self) -> i64 {
        match self {
            Self::SevenDay => 7,
            Self::OneMonth => 30,
            Self::ThreeMonth => 90,
            Self::SixMonth => 180,
        }
    }

    /// Short display name.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::SevenDay => "7-day",
            Self::OneMonth => "1-month",
            Self::ThreeMonth => "3-month",
            Self::SixMonth => "6-month",
        }
    }

    /// First calendar date of the window ending at `as_of`.
    pub fn start(&self, as_of: NaiveDate) -> NaiveDate {
        as_of - Duration::days(self.days())
    }

    /// Column label, e.g. `"7-day Return 2024-02-23 - 2024-03-01"`.
    pub fn label(&self, start: NaiveDate, end: NaiveDate) -> String {
        format!(
            "{} Return {} - {}",
            self.name(),
            start.format(LABEL_DATE_FORMAT),
            end.format(LABEL_DATE_FORMAT)
        )
    }

    /// Title of the sector-average panel, e.g. `"7-day Average Sector Return"`.
    pub fn average_title(&self) -> String {
        format!("{} Average Sector Return", self.name())
    }
}

impl fmt::Display for LookbackWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
