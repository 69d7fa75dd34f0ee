// src/domain/timestamp.rs

use chrono::{DateTime, Datelike, Utc};
use serde_json::Value;
use std::fmt;

/// Marker the county service (and our report) uses for a date that was never set.
pub const NOT_AVAILABLE: &str = "N/A";
/// Marker for a date that was present but could not be read.
pub const INVALID_DATE: &str = "Invalid Date";

const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A `MODDATE` value after normalization.
///
/// All instants are UTC. `NotAvailable` and `Invalid` print differently but
/// share the same (minimal) sort key, so both end up at the bottom of a
/// most-recent-first report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModDate {
    NotAvailable,
    Invalid,
    At(DateTime<Utc>),
}

impl ModDate {
    /// Normalizes a raw attribute value: epoch milliseconds as a JSON number or
    /// numeric string, `null`, the `"N/A"` marker, or anything else.
    pub fn from_value(raw: Option<&Value>) -> Self {
        match raw {
            None | Some(Value::Null) => ModDate::NotAvailable,
            Some(Value::String(s)) if s == NOT_AVAILABLE => ModDate::NotAvailable,
            Some(Value::String(s)) => s
                .trim()
                .parse::<i64>()
                .map(Self::from_millis)
                .unwrap_or(ModDate::Invalid),
            Some(Value::Number(n)) => match n.as_i64() {
                Some(ms) => Self::from_millis(ms),
                // Fractional or huge values: truncate toward zero, saturating.
                None => n
                    .as_f64()
                    .filter(|f| f.is_finite())
                    .map(|f| Self::from_millis(f.trunc() as i64))
                    .unwrap_or(ModDate::Invalid),
            },
            Some(_) => ModDate::Invalid,
        }
    }

    pub fn from_millis(ms: i64) -> Self {
        match DateTime::<Utc>::from_timestamp_millis(ms) {
            // Four-digit years only, so the display format stays fixed-width.
            Some(dt) if (1..=9999).contains(&dt.year()) => ModDate::At(dt),
            _ => ModDate::Invalid,
        }
    }

    /// Ordering key for sorting. Missing and invalid dates both map to `None`,
    /// which compares below every real instant.
    pub fn sort_key(&self) -> Option<DateTime<Utc>> {
        match self {
            ModDate::At(dt) => Some(*dt),
            ModDate::NotAvailable | ModDate::Invalid => None,
        }
    }
}

impl fmt::Display for ModDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModDate::NotAvailable => f.write_str(NOT_AVAILABLE),
            ModDate::Invalid => f.write_str(INVALID_DATE),
            ModDate::At(dt) => write!(f, "{}", dt.format(DISPLAY_FORMAT)),
        }
    }
}
