// src/domain/window.rs

use chrono::{DateTime, Duration, NaiveDate, Utc};
use std::fmt;

/// Inclusive calendar-date range a report covers. Always computed in UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// The window covering the `minutes` leading up to `now`, truncated to dates.
    pub fn ending_at(now: DateTime<Utc>, minutes: i64) -> Self {
        let start = now - Duration::minutes(minutes);
        Self::new(start.date_naive(), now.date_naive())
    }

    /// `YYYY-MM-DD_to_YYYY-MM-DD`, used for snapshot file names.
    pub fn file_stem(&self) -> String {
        format!("{}_to_{}", self.start, self.end)
    }
}

impl fmt::Display for DateWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", self.start, self.end)
    }
}
