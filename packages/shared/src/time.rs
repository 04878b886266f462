//! Time-related utilities.

use chrono::{TimeZone, Utc};

/// Get current Unix timestamp in UTC (milliseconds)
pub fn get_utc_timestamp() -> i64 {
    Utc::now().timestamp_millis()
}

/// Convert Unix timestamp (milliseconds) to UTC RFC 3339 format
pub fn timestamp_to_rfc3339(timestamp_millis: i64) -> String {
    let seconds = timestamp_millis / 1000;
    let nanos = ((timestamp_millis % 1000) * 1_000_000) as u32;
    let dt = Utc.timestamp_opt(seconds, nanos).unwrap();
    dt.to_rfc3339()
}
