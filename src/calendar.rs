use chrono::{NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;

const MARKER_FORMAT: &str = "%Y-%m-%d";

/// Current calendar date in `tz`. The cache rolls over at local midnight.
pub fn today(tz: Tz) -> NaiveDate {
    date_at(tz, Utc::now().timestamp())
}

pub fn date_at(tz: Tz, timestamp: i64) -> NaiveDate {
    match tz.timestamp_opt(timestamp, 0).single() {
        Some(local) => local.date_naive(),
        None => Utc::now().date_naive(),
    }
}

pub fn format_marker(date: NaiveDate) -> String {
    date.format(MARKER_FORMAT).to_string()
}

pub fn parse_marker(marker: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(marker.trim(), MARKER_FORMAT).ok()
}
