//! Coercion rules for inconsistently-typed staging values
//!
//! Staging columns arrive as text with no format discipline, so every
//! conversion here is best-effort by contract: an unparsable timestamp
//! yields `None` and an unparsable numeric yields zero, silently. Rows are
//! never rejected for bad values — the mart aggregations assume every fact
//! row is numerically aggregable.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};

/// Datetime formats accepted after the RFC 3339 attempt, tried in order.
const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Date-only formats, parsed to midnight when a datetime is requested.
const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%m/%d/%Y"];

/// Parse a timestamp permissively.
///
/// Accepts RFC 3339 (the offset is dropped and the wall-clock time kept,
/// since neither destination supports timezone-aware timestamps), common
/// `T`- and space-separated forms with or without fractional seconds,
/// minute-precision forms, and bare dates (read as midnight). Anything
/// else is `None`.
pub fn parse_datetime(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_local());
    }

    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
            return Some(dt);
        }
    }

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(value, format) {
            return date.and_hms_opt(0, 0, 0);
        }
    }

    None
}

/// Parse a calendar date permissively: the date part of anything
/// [`parse_datetime`] accepts.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    parse_datetime(value).map(|dt| dt.date())
}

/// Coerce a staging value to a number, defaulting to zero.
///
/// Null, empty, and unparsable values all yield `0.0` — never null, never
/// a row failure.
pub fn coerce_numeric(value: Option<&str>) -> f64 {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .and_then(|v| v.parse::<f64>().ok())
        .unwrap_or(0.0)
}

/// Round to two decimals, half away from zero.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Encode a calendar date as the 8-digit `YYYYMMDD` integer used as the
/// date-dimension key.
pub fn date_key(date: NaiveDate) -> i32 {
    date.year() * 10_000 + date.month() as i32 * 100 + date.day() as i32
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("2020-03-01T08:00:00" ; "t separated")]
    #[test_case("2020-03-01 08:00:00" ; "space separated")]
    #[test_case("2020-03-01T08:00:00.250" ; "fractional seconds")]
    #[test_case("2020-03-01T08:00" ; "minute precision")]
    fn test_parse_datetime_accepts(value: &str) {
        let dt = parse_datetime(value).unwrap();
        assert_eq!(dt.date(), NaiveDate::from_ymd_opt(2020, 3, 1).unwrap());
    }

    #[test]
    fn test_parse_datetime_strips_offset() {
        let dt = parse_datetime("2020-03-01T08:00:00+05:00").unwrap();
        assert_eq!(
            dt,
            NaiveDate::from_ymd_opt(2020, 3, 1)
                .unwrap()
                .and_hms_opt(8, 0, 0)
                .unwrap()
        );
    }

    #[test]
    fn test_parse_datetime_bare_date_is_midnight() {
        let dt = parse_datetime("2020-03-01").unwrap();
        assert_eq!(dt.time(), chrono::NaiveTime::from_hms_opt(0, 0, 0).unwrap());
    }

    #[test_case("" ; "empty")]
    #[test_case("   " ; "blank")]
    #[test_case("not a date" ; "garbage")]
    #[test_case("2020-13-40" ; "impossible date")]
    fn test_parse_datetime_rejects(value: &str) {
        assert_eq!(parse_datetime(value), None);
    }

    #[test]
    fn test_parse_date_takes_date_part() {
        assert_eq!(
            parse_date("2020-03-01T23:59:00"),
            NaiveDate::from_ymd_opt(2020, 3, 1)
        );
        assert_eq!(
            parse_date("03/01/2020"),
            NaiveDate::from_ymd_opt(2020, 3, 1)
        );
    }

    #[test_case(Some("125.50"), 125.5 ; "plain")]
    #[test_case(Some("  7 "), 7.0 ; "padded")]
    #[test_case(Some("N/A"), 0.0 ; "not applicable")]
    #[test_case(Some(""), 0.0 ; "empty")]
    #[test_case(None, 0.0 ; "null")]
    fn test_coerce_numeric(value: Option<&str>, expected: f64) {
        assert_eq!(coerce_numeric(value), expected);
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(2.499_999), 2.5);
        assert_eq!(round2(200.004), 200.0);
        assert_eq!(round2(-1.006), -1.01);
    }

    #[test]
    fn test_date_key_encoding() {
        assert_eq!(
            date_key(NaiveDate::from_ymd_opt(2020, 3, 1).unwrap()),
            20_200_301
        );
        assert_eq!(
            date_key(NaiveDate::from_ymd_opt(1999, 12, 31).unwrap()),
            19_991_231
        );
    }
}
