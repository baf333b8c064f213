//! Calendar-day helpers.
//!
//! All scheduling rules compare whole days. Timestamps coming from the outside
//! are normalized to their UTC calendar day first so a local offset never moves
//! a batch into the neighbouring day.

use chrono::{DateTime, Days, NaiveDate, TimeZone, Utc};

use crate::error::{DomainError, DomainResult};

/// Wire format for days (`YYYY-MM-DD`).
pub const DAY_FORMAT: &str = "%Y-%m-%d";

/// UTC calendar day of a timestamp in any zone.
pub fn utc_day<Tz: TimeZone>(ts: &DateTime<Tz>) -> NaiveDate {
    ts.with_timezone(&Utc).date_naive()
}

/// Parse a day from `YYYY-MM-DD` or from an RFC 3339 timestamp.
pub fn parse_day(input: &str) -> DomainResult<NaiveDate> {
    let input = input.trim();
    if let Ok(day) = NaiveDate::parse_from_str(input, DAY_FORMAT) {
        return Ok(day);
    }
    DateTime::parse_from_rfc3339(input)
        .map(|ts| utc_day(&ts))
        .map_err(|_| DomainError::validation(format!("date '{input}' is not YYYY-MM-DD")))
}

/// Format a day as `YYYY-MM-DD`.
pub fn format_day(day: NaiveDate) -> String {
    day.format(DAY_FORMAT).to_string()
}

/// `day + days`, saturating at the calendar's upper bound.
pub fn add_days(day: NaiveDate, days: u32) -> NaiveDate {
    day.checked_add_days(Days::new(u64::from(days)))
        .unwrap_or(NaiveDate::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn parses_plain_days() {
        assert_eq!(parse_day("2024-01-10").unwrap(), day(2024, 1, 10));
        assert_eq!(parse_day("  2024-02-29 ").unwrap(), day(2024, 2, 29));
    }

    #[test]
    fn timestamps_are_normalized_to_utc_day() {
        // 01:30 at +03:00 is still the previous day in UTC.
        assert_eq!(parse_day("2024-01-10T01:30:00+03:00").unwrap(), day(2024, 1, 9));
        assert_eq!(parse_day("2024-01-10T23:30:00Z").unwrap(), day(2024, 1, 10));

        let offset = FixedOffset::west_opt(5 * 3600).unwrap();
        let ts = offset.with_ymd_and_hms(2024, 1, 10, 22, 0, 0).unwrap();
        assert_eq!(utc_day(&ts), day(2024, 1, 11));
    }

    #[test]
    fn rejects_garbage() {
        assert!(matches!(parse_day("10/01/2024"), Err(DomainError::Validation(_))));
        assert!(parse_day("").is_err());
    }

    #[test]
    fn add_days_crosses_month_boundaries() {
        assert_eq!(add_days(day(2024, 1, 1), 14), day(2024, 1, 15));
        assert_eq!(add_days(day(2024, 1, 25), 10), day(2024, 2, 4));
        assert_eq!(add_days(NaiveDate::MAX, 1), NaiveDate::MAX);
    }

    #[test]
    fn format_is_iso() {
        assert_eq!(format_day(day(2024, 3, 5)), "2024-03-05");
    }
}
