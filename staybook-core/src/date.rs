//! Date-only values.
//!
//! Every date that enters or leaves staybook is a calendar day, never an
//! instant. `NaiveDate` carries no offset, so reading "2025-01-10" always
//! yields January 10th no matter which timezone the process runs in.

use chrono::{NaiveDate, Utc};
use chrono_tz::Tz;

use crate::error::{BookingError, BookingResult};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a strict `YYYY-MM-DD` string.
pub fn parse_date(s: &str) -> BookingResult<NaiveDate> {
    let s = s.trim();
    // chrono accepts unpadded fields; the wire format is fixed-width
    if s.len() != 10 {
        return Err(invalid_date(s));
    }
    NaiveDate::parse_from_str(s, DATE_FORMAT).map_err(|_| invalid_date(s))
}

/// Parse a date-only string, or the date part of an ISO datetime.
///
/// The calendar date is taken as written: "2025-01-10T23:30:00-08:00" is
/// January 10th, not January 11th in UTC.
pub fn parse_date_prefix(s: &str) -> BookingResult<NaiveDate> {
    let s = s.trim();
    match s.get(..10) {
        Some(head) if s.len() == 10 || s[10..].starts_with('T') => parse_date(head),
        _ => Err(invalid_date(s)),
    }
}

/// Format as `YYYY-MM-DD`, the inverse of [`parse_date`].
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Long form used in emails and pages, e.g. "Friday, January 10, 2025".
pub fn display_date(date: NaiveDate) -> String {
    date.format("%A, %B %-d, %Y").to_string()
}

/// The current calendar day at the property.
pub fn today_in(tz: Tz) -> NaiveDate {
    Utc::now().with_timezone(&tz).date_naive()
}

fn invalid_date(s: &str) -> BookingError {
    BookingError::validation(format!("Invalid date '{}'. Expected YYYY-MM-DD", s))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    #[test]
    fn test_parse_keeps_calendar_components() {
        let date = parse_date("2025-01-10").unwrap();
        assert_eq!((date.year(), date.month(), date.day()), (2025, 1, 10));
    }

    #[test]
    fn test_format_parse_roundtrip() {
        for s in ["2024-02-29", "2025-01-01", "2025-12-31", "1999-07-04", "2030-03-09"] {
            assert_eq!(format_date(parse_date(s).unwrap()), s);
        }
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for s in ["", "2025-1-10", "2025/01/10", "2025-02-30", "10-01-2025", "2025-01-10T00:00:00Z"] {
            assert!(parse_date(s).is_err(), "{s:?} should not parse");
        }
    }

    #[test]
    fn test_parse_prefix_takes_written_date() {
        let date = parse_date_prefix("2025-01-10T23:30:00-08:00").unwrap();
        assert_eq!(format_date(date), "2025-01-10");
        assert_eq!(format_date(parse_date_prefix("2025-01-10").unwrap()), "2025-01-10");
        assert!(parse_date_prefix("2025-01-10 junk").is_err());
        assert!(parse_date_prefix("2025").is_err());
    }

    #[test]
    fn test_display_date() {
        let date = parse_date("2025-01-10").unwrap();
        assert_eq!(display_date(date), "Friday, January 10, 2025");
    }

    #[test]
    fn test_today_differs_across_the_date_line() {
        let east = today_in(chrono_tz::Pacific::Kiritimati);
        let west = today_in(chrono_tz::Pacific::Pago_Pago);
        // UTC+14 and UTC-11 are always a full day apart (give or take the hour)
        let gap = (east - west).num_days();
        assert!((1..=2).contains(&gap), "unexpected gap {gap}");
    }
}
