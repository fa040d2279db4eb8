//! Timestamp parsing for transaction tables.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Weekday};
use polars::prelude::{AnyValue, TimeUnit};

const DATETIME_FORMATS: [&str; 3] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%d.%m.%Y"];

/// Parses a textual timestamp.
///
/// RFC 3339 values with an offset are normalized to UTC. Date-only values
/// resolve to midnight.
pub fn parse_timestamp(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(text) {
        return Some(parsed.naive_utc());
    }
    for format in DATETIME_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(text, format) {
            return Some(parsed);
        }
    }
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(text, format).ok())
        .map(|date| date.and_time(NaiveTime::MIN))
}

/// Converts a native polars temporal value.
pub fn any_to_timestamp(value: &AnyValue<'_>) -> Option<NaiveDateTime> {
    match value {
        AnyValue::Date(days) => {
            DateTime::from_timestamp(i64::from(*days) * 86_400, 0).map(|dt| dt.naive_utc())
        }
        AnyValue::Datetime(v, unit, _) => match unit {
            TimeUnit::Nanoseconds => Some(DateTime::from_timestamp_nanos(*v).naive_utc()),
            TimeUnit::Microseconds => DateTime::from_timestamp_micros(*v).map(|dt| dt.naive_utc()),
            TimeUnit::Milliseconds => DateTime::from_timestamp_millis(*v).map(|dt| dt.naive_utc()),
        },
        AnyValue::String(s) => parse_timestamp(s),
        AnyValue::StringOwned(s) => parse_timestamp(s),
        _ => None,
    }
}

/// Whole calendar days from `last` to `reference`, negative when `last` is later.
pub fn calendar_days(last: NaiveDateTime, reference: NaiveDateTime) -> i64 {
    (reference - last).num_days()
}

/// Weekdays in `[start, end]` minus one, floored at zero.
pub fn business_days(start: NaiveDate, end: NaiveDate) -> i64 {
    if end <= start {
        return 0;
    }
    let span = (end - start).num_days() + 1;
    let weeks = span / 7;
    let mut weekdays = weeks * 5;
    for offset in weeks * 7..span {
        let day = start + TimeDelta::days(offset);
        if !matches!(day.weekday(), Weekday::Sat | Weekday::Sun) {
            weekdays += 1;
        }
    }
    (weekdays - 1).max(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn parses_supported_formats() {
        let midnight = ymd(2024, 3, 5).and_time(NaiveTime::MIN);
        assert_eq!(parse_timestamp("2024-03-05"), Some(midnight));
        assert_eq!(parse_timestamp("2024/03/05"), Some(midnight));
        assert_eq!(parse_timestamp("05.03.2024"), Some(midnight));
        assert_eq!(parse_timestamp(" 2024-03-05 00:00 "), Some(midnight));

        let noon = ymd(2024, 3, 5).and_hms_opt(12, 30, 15).unwrap();
        assert_eq!(parse_timestamp("2024-03-05 12:30:15"), Some(noon));
        assert_eq!(parse_timestamp("2024-03-05T12:30:15"), Some(noon));
        assert_eq!(parse_timestamp("2024-03-05T14:30:15+02:00"), Some(noon));
    }

    #[test]
    fn keeps_fractional_seconds() {
        let parsed = parse_timestamp("2024-03-05 12:30:15.250").unwrap();
        assert_eq!(parsed.and_utc().timestamp_subsec_millis(), 250);
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(parse_timestamp("yesterday"), None);
        assert_eq!(parse_timestamp("2024-13-01"), None);
        assert_eq!(parse_timestamp(""), None);
    }

    #[test]
    fn converts_native_dates() {
        // 2024-01-01 is 19723 days after the epoch.
        let value = AnyValue::Date(19_723);
        assert_eq!(
            any_to_timestamp(&value),
            Some(ymd(2024, 1, 1).and_time(NaiveTime::MIN))
        );
        let value = AnyValue::Datetime(1_704_067_200_000, TimeUnit::Milliseconds, None);
        assert_eq!(
            any_to_timestamp(&value),
            Some(ymd(2024, 1, 1).and_time(NaiveTime::MIN))
        );
    }

    #[test]
    fn business_days_skip_weekends() {
        // Monday to next Monday
        assert_eq!(business_days(ymd(2024, 1, 1), ymd(2024, 1, 8)), 5);
        // Friday to Monday
        assert_eq!(business_days(ymd(2024, 1, 5), ymd(2024, 1, 8)), 1);
        // Saturday to Monday
        assert_eq!(business_days(ymd(2024, 1, 6), ymd(2024, 1, 8)), 0);
        assert_eq!(business_days(ymd(2024, 1, 8), ymd(2024, 1, 8)), 0);
        assert_eq!(business_days(ymd(2024, 1, 9), ymd(2024, 1, 8)), 0);
    }

    #[test]
    fn calendar_days_truncate() {
        let last = ymd(2024, 1, 1).and_hms_opt(18, 0, 0).unwrap();
        let reference = ymd(2024, 1, 3).and_hms_opt(6, 0, 0).unwrap();
        assert_eq!(calendar_days(last, reference), 1);
    }
}
