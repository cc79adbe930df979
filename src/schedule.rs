//! Calendar normalization for stored dates and times.
//!
//! Stored appointment dates reach clients either as bare dates
//! ("2025-03-10") or as full timestamps ("2025-03-10T00:00:00.000Z"),
//! depending on which path produced the row. Naive string slicing of the
//! ISO form, or converting the instant into another zone before reading
//! its fields, shifts the date by a day around midnight. [`calendar_date`]
//! therefore parses the value and reads the calendar fields it carries.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};

/// Extracts the calendar date a stored value represents.
///
/// Accepts bare dates, RFC 3339 timestamps and zone-less timestamps.
/// The date returned is always the one written in the value itself;
/// no timezone conversion is applied.
pub fn calendar_date(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Some(dt.date());
        }
    }
    None
}

/// True when a stored date value falls on `day`.
pub fn matches_date(raw: &str, day: NaiveDate) -> bool {
    calendar_date(raw) == Some(day)
}

/// Parses a wall-clock time, with or without seconds.
pub fn parse_time(raw: &str) -> Option<NaiveTime> {
    let s = raw.trim();
    NaiveTime::parse_from_str(s, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M"))
        .ok()
}

/// Truncates a stored time to HH:MM for editing and display.
/// Seconds are dropped, never rounded.
pub fn display_time(raw: &str) -> Option<String> {
    parse_time(raw).map(|t| t.format("%H:%M").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn bare_date_passes_through() {
        assert_eq!(calendar_date("2025-03-10"), Some(date(2025, 3, 10)));
    }

    #[test]
    fn utc_midnight_timestamp_keeps_its_date() {
        assert_eq!(
            calendar_date("2025-03-10T00:00:00Z"),
            Some(date(2025, 3, 10))
        );
        assert_eq!(
            calendar_date("2025-03-10T00:00:00.000Z"),
            Some(date(2025, 3, 10))
        );
    }

    #[test]
    fn offset_timestamp_keeps_its_written_date() {
        assert_eq!(
            calendar_date("2025-03-10T23:30:00+11:00"),
            Some(date(2025, 3, 10))
        );
    }

    #[test]
    fn zoneless_timestamp_keeps_its_date() {
        assert_eq!(
            calendar_date("2025-03-10T14:30:00"),
            Some(date(2025, 3, 10))
        );
        assert_eq!(
            calendar_date("2025-03-10 14:30:00"),
            Some(date(2025, 3, 10))
        );
    }

    #[test]
    fn garbage_dates_are_rejected() {
        assert_eq!(calendar_date(""), None);
        assert_eq!(calendar_date("not-a-date"), None);
        assert_eq!(calendar_date("2025-13-40"), None);
    }

    #[test]
    fn matches_date_compares_calendar_days() {
        assert!(matches_date("2025-06-01T00:00:00.000Z", date(2025, 6, 1)));
        assert!(!matches_date("2025-06-02", date(2025, 6, 1)));
    }

    #[test]
    fn time_parses_with_and_without_seconds() {
        let t = NaiveTime::from_hms_opt(14, 30, 0).unwrap();
        assert_eq!(parse_time("14:30"), Some(t));
        assert_eq!(parse_time("14:30:00"), Some(t));
        assert_eq!(parse_time("noon"), None);
    }

    #[test]
    fn display_time_truncates_seconds() {
        assert_eq!(display_time("14:30:59"), Some("14:30".to_string()));
        assert_eq!(display_time("09:05:00"), Some("09:05".to_string()));
        assert_eq!(display_time("14:30"), Some("14:30".to_string()));
        assert_eq!(display_time("bogus"), None);
    }
}
