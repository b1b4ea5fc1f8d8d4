//! Timestamp utilities

use chrono::{DateTime, Local, Utc};

/// Format used for error log records (second precision)
pub const LOG_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Get current UTC timestamp
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Current local time formatted for a log record
pub fn log_timestamp() -> String {
    format_log_timestamp(&Local::now())
}

/// Format any timestamp as `YYYY-MM-DD HH:MM:SS`
pub fn format_log_timestamp<Tz>(ts: &DateTime<Tz>) -> String
where
    Tz: chrono::TimeZone,
    Tz::Offset: std::fmt::Display,
{
    ts.format(LOG_TIMESTAMP_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_now_returns_valid_timestamp() {
        let timestamp = now();
        // After 2000-01-01 00:00:00 UTC
        assert!(timestamp.timestamp() > 946_684_800);
    }

    #[test]
    fn test_format_log_timestamp_second_precision() {
        let ts = Utc.with_ymd_and_hms(2024, 3, 9, 7, 5, 1).unwrap();
        assert_eq!(format_log_timestamp(&ts), "2024-03-09 07:05:01");
    }

    #[test]
    fn test_log_timestamp_shape() {
        let ts = log_timestamp();
        assert_eq!(ts.len(), 19);
        assert_eq!(&ts[4..5], "-");
        assert_eq!(&ts[10..11], " ");
        assert_eq!(&ts[13..14], ":");
    }
}
