use std::fmt::Write;

use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Timelike, Utc};

// Wire format of an HTML datetime-local input, minute precision.
const DATETIME_LOCAL_FORMAT: &str = "%Y-%m-%dT%H:%M";
// Some hosts hand back seconds as well; accepted, then truncated.
const DATETIME_LOCAL_FORMAT_WITH_SECONDS: &str = "%Y-%m-%dT%H:%M:%S";

const DEADLINE_DISPLAY_FORMAT: &str = "%a %b %-d, %-I:%M %p";

/// Human-readable local-time rendering of a deadline, e.g.
/// `Tue Aug 25, 1:05 PM`. Returns an empty string if the timestamp cannot
/// be rendered; never panics.
pub fn format_deadline(timestamp: DateTime<Utc>) -> String {
    let mut out = String::new();
    let local = timestamp.with_timezone(&Local);
    if write!(out, "{}", local.format(DEADLINE_DISPLAY_FORMAT)).is_err() {
        out.clear();
    }
    out
}

/// Renders a timestamp as the local wall-clock `YYYY-MM-DDTHH:MM` value a
/// datetime-local input expects. Seconds and below are dropped.
pub fn to_datetime_local_value(timestamp: DateTime<Utc>) -> String {
    timestamp
        .with_timezone(&Local)
        .format(DATETIME_LOCAL_FORMAT)
        .to_string()
}

/// Parses a local wall-clock `YYYY-MM-DDTHH:MM` value back into a timestamp,
/// truncated to minute precision. Anything unparsable yields the current
/// time instead of an error, as does a local time skipped by a DST jump;
/// an ambiguous local time resolves to its earlier instant.
pub fn from_datetime_local_value(value: &str) -> DateTime<Utc> {
    let parsed = NaiveDateTime::parse_from_str(value, DATETIME_LOCAL_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(value, DATETIME_LOCAL_FORMAT_WITH_SECONDS));

    let Ok(naive) = parsed else {
        return Utc::now();
    };
    let naive = naive
        .with_second(0)
        .and_then(|n| n.with_nanosecond(0))
        .unwrap_or(naive);

    match Local.from_local_datetime(&naive).earliest() {
        Some(local) => local.with_timezone(&Utc),
        None => Utc::now(),
    }
}
