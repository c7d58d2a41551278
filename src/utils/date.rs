// src/utils/date.rs

//! Article date formatting.
//!
//! Timestamps are epoch milliseconds, either numeric or as a string whose
//! leading digits are read. Dates render in UTC.

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::utils::value::leading_int;

/// Month and day for the calendar layout.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CalendarDate {
    /// Abbreviated uppercase month (`JAN`)
    pub month: String,
    /// Day of month without padding
    pub day: String,
}

/// Read a timestamp value into a date.
pub fn to_datetime(value: &Value) -> Option<DateTime<Utc>> {
    leading_int(value).and_then(DateTime::from_timestamp_millis)
}

/// Long form date, e.g. `January 5, 2024`; empty when unreadable.
pub fn format_long(value: &Value) -> String {
    to_datetime(value)
        .map(|d| d.format("%B %-d, %Y").to_string())
        .unwrap_or_default()
}

/// `YYYY-MM-DD` for `datetime` attributes; empty when unreadable.
pub fn format_iso_date(value: &Value) -> String {
    to_datetime(value)
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

/// Calendar month/day; empty fields when unreadable.
pub fn format_calendar(value: &Value) -> CalendarDate {
    to_datetime(value)
        .map(|d| CalendarDate {
            month: d.format("%b").to_string().to_uppercase(),
            day: d.format("%-d").to_string(),
        })
        .unwrap_or_default()
}
