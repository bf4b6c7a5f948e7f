//! Formatting of durations and timestamps for console output, and parsing of
//! the timestamps users type in.
//!
//! - Durations are whole seconds shown as `HH:MM:SS`; hours are not capped at
//!   24 and negative values show as `00:00:00`
//! - Timestamps are epoch milliseconds shown in local time
//!
//! ```rust
//! use tempus::libs::formatter::format_seconds;
//!
//! assert_eq!(format_seconds(3_725), "01:02:05");
//! assert_eq!(format_seconds(-5), "00:00:00");
//! ```

use anyhow::{anyhow, Result};
use chrono::{Local, NaiveDate, NaiveDateTime, TimeZone};

pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const INPUT_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M:%S"];

pub fn format_seconds(seconds: i64) -> String {
    let seconds = seconds.max(0);
    format!("{:02}:{:02}:{:02}", seconds / 3600, (seconds % 3600) / 60, seconds % 60)
}

/// Local date and time of an epoch-millisecond timestamp.
pub fn format_timestamp(millis: i64) -> String {
    match Local.timestamp_millis_opt(millis).single() {
        Some(datetime) => datetime.format(DATETIME_FORMAT).to_string(),
        None => millis.to_string(),
    }
}

/// Parses a local `YYYY-MM-DD HH:MM[:SS]` into epoch milliseconds.
pub fn parse_datetime(input: &str) -> Result<i64> {
    let input = input.trim();
    let naive = INPUT_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(input, format).ok())
        .ok_or_else(|| anyhow!("Invalid date and time '{}', expected YYYY-MM-DD HH:MM[:SS]", input))?;

    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|datetime| datetime.timestamp_millis())
        .ok_or_else(|| anyhow!("'{}' does not exist in the local time zone", input))
}

pub fn parse_date(input: &str) -> Result<NaiveDate> {
    match input.trim() {
        "today" => Ok(Local::now().date_naive()),
        date => NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(|_| anyhow!("Invalid date '{}', expected YYYY-MM-DD", date)),
    }
}
