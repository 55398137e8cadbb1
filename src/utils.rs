//! Date helpers and mood scoring shared across the crate.

use chrono::{DateTime, Local, NaiveDate, Utc};

/// Calendar day format used for completion and hydration keys
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Milliseconds in one day
pub const DAY_MILLIS: i64 = 24 * 60 * 60 * 1000;

/// Current wall-clock time in epoch milliseconds
#[must_use]
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

fn local_datetime(millis: i64) -> DateTime<Local> {
    DateTime::<Utc>::from_timestamp_millis(millis)
        .unwrap_or_default()
        .with_timezone(&Local)
}

/// Local calendar day (`YYYY-MM-DD`) containing the given instant
#[must_use]
pub fn date_string(millis: i64) -> String {
    local_datetime(millis).format(DATE_FORMAT).to_string()
}

/// Today's local calendar day (`YYYY-MM-DD`)
#[must_use]
pub fn today_string() -> String {
    Local::now().format(DATE_FORMAT).to_string()
}

/// Readable date, e.g. `Mar 01, 2025`
#[must_use]
pub fn format_timestamp(millis: i64) -> String {
    local_datetime(millis).format("%b %d, %Y").to_string()
}

/// Readable time of day, e.g. `14:05`
#[must_use]
pub fn format_time(millis: i64) -> String {
    local_datetime(millis).format("%H:%M").to_string()
}

/// Date and minute, e.g. `2025-03-01 14:05`
#[must_use]
pub fn format_date_time(millis: i64) -> String {
    local_datetime(millis).format("%Y-%m-%d %H:%M").to_string()
}

/// Parse a `YYYY-MM-DD` calendar day
pub fn parse_date(date: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(date, DATE_FORMAT).ok()
}

/// Map a mood emoji to a 0-5 score for charting.
///
/// Unknown emoji score as neutral (3).
#[must_use]
pub fn mood_score(emoji: &str) -> u8 {
    const SCALE: [(&[&str], u8); 6] = [
        (&["😍", "🥰"], 5),
        (&["😄", "😊"], 4),
        (&["😐", "😑"], 3),
        (&["😔", "😞"], 2),
        (&["😢", "😭"], 1),
        (&["😠", "😡"], 0),
    ];

    SCALE
        .iter()
        .find(|(faces, _)| faces.iter().any(|face| emoji.contains(face)))
        .map_or(3, |(_, score)| *score)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mood_score() {
        assert_eq!(mood_score("😍"), 5);
        assert_eq!(mood_score("so 😊 today"), 4);
        assert_eq!(mood_score("😭"), 1);
        assert_eq!(mood_score("😡"), 0);
        assert_eq!(mood_score("🤖"), 3);
        assert_eq!(mood_score(""), 3);
    }

    #[test]
    fn test_parse_date() {
        assert!(parse_date("2025-02-28").is_some());
        assert!(parse_date("2025-02-30").is_none());
        assert!(parse_date("28/02/2025").is_none());
    }

    #[test]
    fn test_date_string_round_trips_through_parse() {
        let day = date_string(now_millis());
        assert!(parse_date(&day).is_some());
        assert_eq!(day.len(), 10);
    }
}
