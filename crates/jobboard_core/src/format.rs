//! Timestamp formatting for job rows.
//!
//! Both helpers take the target time zone so rendering can use the local zone
//! while tests pin `Utc`. Out-of-range timestamps render as `"unknown"`.

use std::fmt::Display;

use chrono::{DateTime, TimeZone};

/// `Jan 5, 2024`
pub fn format_date<Tz>(timestamp: i64, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    format_with(timestamp, tz, "%b %-d, %Y")
}

/// `3:04:05 PM`
pub fn format_time<Tz>(timestamp: i64, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    format_with(timestamp, tz, "%-I:%M:%S %p")
}

fn format_with<Tz>(timestamp: i64, tz: &Tz, pattern: &str) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    match DateTime::from_timestamp(timestamp, 0) {
        Some(utc) => utc.with_timezone(tz).format(pattern).to_string(),
        None => "unknown".to_string(),
    }
}
