//! Lenient date parsing shared by every parser.
//!
//! Unparseable values are logged and treated as absent, never as errors.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use envcat_core::models::TemporalExtent;
use tracing::warn;

/// Parse `YYYY-MM-DD`, ignoring any `T...` time suffix.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    let date_part = s.split('T').next().unwrap_or(s);
    match NaiveDate::parse_from_str(date_part, "%Y-%m-%d") {
        Ok(d) => Some(d),
        Err(e) => {
            warn!(value = raw, error = %e, "failed to parse date");
            None
        }
    }
}

/// Parse an ISO datetime. Offsets and fractional seconds are dropped; the
/// wall-clock time is kept. A bare date becomes midnight.
pub fn parse_datetime(raw: &str) -> Option<NaiveDateTime> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_local());
    }

    let (date_part, time_part) = match s.split_once('T') {
        Some((d, t)) => (d, Some(t)),
        None => (s, None),
    };
    let date = parse_date(date_part)?;
    let Some(time) = time_part else {
        return date.and_hms_opt(0, 0, 0);
    };

    let time = time.trim_end_matches('Z');
    let time = time.split(['+', '-']).next().unwrap_or(time);
    let time = time.split('.').next().unwrap_or(time);
    match NaiveTime::parse_from_str(time, "%H:%M:%S") {
        Ok(t) => Some(date.and_time(t)),
        Err(e) => {
            warn!(value = raw, error = %e, "failed to parse datetime");
            None
        }
    }
}

/// Build a temporal extent from optional start/end strings. `None` unless at
/// least one end parses.
pub fn parse_temporal_extent(start: Option<&str>, end: Option<&str>) -> Option<TemporalExtent> {
    let extent = TemporalExtent::new(start.and_then(parse_date), end.and_then(parse_date));
    (!extent.is_empty()).then_some(extent)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn date_with_time_suffix() {
        assert_eq!(parse_date("2020-11-25T00:00:00.000+00:00"), Some(d("2020-11-25")));
        assert_eq!(parse_date(" 2020-11-25 "), Some(d("2020-11-25")));
    }

    #[test]
    fn garbage_date_is_absent() {
        assert_eq!(parse_date("25/11/2020"), None);
        assert_eq!(parse_date(""), None);
    }

    #[test]
    fn datetime_variants() {
        let expected = d("2025-11-13").and_hms_opt(16, 18, 58).unwrap();
        assert_eq!(parse_datetime("2025-11-13T16:18:58"), Some(expected));
        assert_eq!(parse_datetime("2025-11-13T16:18:58.000+00:00"), Some(expected));
        assert_eq!(parse_datetime("2025-11-13T16:18:58Z"), Some(expected));
        assert_eq!(parse_datetime("2025-11-13T16:18:58.123"), Some(expected));
    }

    #[test]
    fn datetime_keeps_wall_clock_under_offset() {
        let expected = d("2025-11-13").and_hms_opt(16, 18, 58).unwrap();
        assert_eq!(parse_datetime("2025-11-13T16:18:58-05:00"), Some(expected));
    }

    #[test]
    fn bare_date_is_midnight() {
        let expected = d("2019-01-15").and_hms_opt(0, 0, 0).unwrap();
        assert_eq!(parse_datetime("2019-01-15"), Some(expected));
    }

    #[test]
    fn temporal_extent_needs_one_valid_end() {
        assert!(parse_temporal_extent(None, None).is_none());
        assert!(parse_temporal_extent(Some("bad"), Some("worse")).is_none());
        let open = parse_temporal_extent(Some("2020-01-01"), None).unwrap();
        assert_eq!(open.start, Some(d("2020-01-01")));
        assert_eq!(open.end, None);
    }
}
