//! "N mins ago" style rendering of a timestamp relative to now.

use chrono::{DateTime, Utc};

/// Formats the time elapsed from `then` to `now`.
///
/// Elapsed minutes are floored. Under one minute (including timestamps in
/// the future) is "just now"; then minutes, hours and days, each pluralized
/// when the count is above one.
pub fn format_relative(now: DateTime<Utc>, then: DateTime<Utc>) -> String {
    let minutes = (now - then).num_milliseconds().div_euclid(60_000);
    if minutes < 1 {
        return "just now".to_string();
    }
    if minutes < 60 {
        return ago(minutes, "min");
    }
    let hours = minutes / 60;
    if hours < 24 {
        return ago(hours, "hour");
    }
    ago(hours / 24, "day")
}

fn ago(count: i64, unit: &str) -> String {
    let plural = if count > 1 { "s" } else { "" };
    format!("{} {}{} ago", count, unit, plural)
}
