//! Field parsing utilities for the collision CSV export.
//!
//! The source file is a pandas export, so numeric columns may carry a
//! trailing `.0` and date formats vary between the raw open-data dump
//! and re-exported copies. Every parser here degrades to `None` rather
//! than erroring.

use chrono::{Datelike, NaiveDate, NaiveTime};

/// Parses a crash date in either the open-data `%m/%d/%Y` format or the
/// ISO `%Y-%m-%d` format.
#[must_use]
pub fn parse_crash_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    // Exports sometimes carry a midnight timestamp on the date column.
    let date_part = s.split_whitespace().next()?;
    if let Ok(date) = NaiveDate::parse_from_str(date_part, "%m/%d/%Y") {
        return Some(date);
    }
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

/// Parses a crash time in `%H:%M` or `%H:%M:%S` format.
#[must_use]
pub fn parse_crash_time(s: &str) -> Option<NaiveTime> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(time) = NaiveTime::parse_from_str(s, "%H:%M:%S") {
        return Some(time);
    }
    NaiveTime::parse_from_str(s, "%H:%M").ok()
}

/// Parses an integer column that may be rendered as a float (`"2021.0"`).
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn parse_int(s: &str) -> Option<i64> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(n) = s.parse::<i64>() {
        return Some(n);
    }
    s.parse::<f64>()
        .ok()
        .filter(|f| f.is_finite() && f.fract() == 0.0)
        .map(|f| f as i64)
}

/// Parses a non-negative count column, defaulting to 0 for missing or
/// unparseable values.
#[must_use]
pub fn parse_count(s: &str) -> u32 {
    parse_int(s)
        .and_then(|n| u32::try_from(n).ok())
        .unwrap_or(0)
}

/// Parses an optional coordinate field.
#[must_use]
pub fn parse_coord(s: &str) -> Option<f64> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    s.parse::<f64>().ok().filter(|f| f.is_finite())
}

/// Derives the crash year: prefer the parsed date, fall back to the
/// source's own year column.
#[must_use]
pub fn derive_year(date: Option<NaiveDate>, year_column: Option<&str>) -> Option<i32> {
    if let Some(date) = date {
        return Some(date.year());
    }
    year_column
        .and_then(|s| parse_int(s))
        .and_then(|n| i32::try_from(n).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_open_data_date() {
        let date = parse_crash_date("07/04/2021").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2021, 7, 4).unwrap());
    }

    #[test]
    fn parses_iso_date_with_timestamp() {
        let date = parse_crash_date("2021-07-04 00:00:00").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2021, 7, 4).unwrap());
    }

    #[test]
    fn rejects_garbage_date() {
        assert!(parse_crash_date("not-a-date").is_none());
        assert!(parse_crash_date("").is_none());
    }

    #[test]
    fn parses_times() {
        assert_eq!(
            parse_crash_time("14:30"),
            NaiveTime::from_hms_opt(14, 30, 0)
        );
        assert_eq!(
            parse_crash_time("14:30:15"),
            NaiveTime::from_hms_opt(14, 30, 15)
        );
        assert!(parse_crash_time("25:00").is_none());
    }

    #[test]
    fn parses_pandas_floats_as_ints() {
        assert_eq!(parse_int("2021"), Some(2021));
        assert_eq!(parse_int("2021.0"), Some(2021));
        assert_eq!(parse_int("2021.5"), None);
        assert_eq!(parse_int(""), None);
    }

    #[test]
    fn counts_default_to_zero() {
        assert_eq!(parse_count("3"), 3);
        assert_eq!(parse_count("3.0"), 3);
        assert_eq!(parse_count(""), 0);
        assert_eq!(parse_count("-1"), 0);
    }

    #[test]
    fn derives_year_from_date_first() {
        let date = NaiveDate::from_ymd_opt(2019, 3, 1);
        assert_eq!(derive_year(date, Some("2021")), Some(2019));
        assert_eq!(derive_year(None, Some("2021.0")), Some(2021));
        assert_eq!(derive_year(None, None), None);
    }
}
