//! Timestamp and calendar date handling
//!
//! Creation timestamps (`addedAt`) are stored as the exact text that was written so
//! a rewrite of the document never reformats historical data. They are parsed only
//! when a comparison is needed.

use time::{
    format_description::well_known::Rfc3339, macros::format_description, Date,
    OffsetDateTime, UtcOffset,
};

use crate::CoreError;

/// Parse an ISO-8601 / RFC 3339 creation timestamp (e.g. `2026-01-25T15:30:00.000Z`)
pub fn parse_timestamp(value: &str) -> Result<OffsetDateTime, CoreError> {
    OffsetDateTime::parse(value.trim(), &Rfc3339)
        .map_err(|_| CoreError::InvalidTimestamp(value.to_string()))
}

/// Parse a `YYYY-MM-DD` attendance date as a calendar day.
///
/// The result carries no offset: "2026-01-25" is the 25th wherever the server runs.
pub fn parse_local_date(value: &str) -> Result<Date, CoreError> {
    Date::parse(value.trim(), format_description!("[year]-[month]-[day]"))
        .map_err(|_| CoreError::InvalidDate(value.to_string()))
}

/// Parse the delta cutoff (`pointsAsOf`).
///
/// Full timestamps are compared exactly. A bare date means midnight UTC of that day.
pub fn parse_cutoff(value: &str) -> Result<OffsetDateTime, CoreError> {
    if let Ok(at) = parse_timestamp(value) {
        return Ok(at);
    }
    parse_local_date(value)
        .map(|date| date.midnight().assume_utc())
        .map_err(|_| CoreError::InvalidTimestamp(value.to_string()))
}

/// Format a timestamp the way browsers do (`toISOString`): UTC, milliseconds, `Z` suffix
pub fn format_timestamp(at: OffsetDateTime) -> String {
    let utc = at.to_offset(UtcOffset::UTC);
    utc.format(format_description!(
        "[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:3]Z"
    ))
    .unwrap_or_else(|_| utc.to_string())
}

/// Current time as a creation timestamp
pub fn now_timestamp() -> String {
    format_timestamp(OffsetDateTime::now_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{date, datetime};

    #[test]
    fn test_parse_timestamp_with_millis() {
        let parsed = parse_timestamp("2026-01-25T15:30:00.000Z").unwrap();
        assert_eq!(parsed, datetime!(2026-01-25 15:30:00 UTC));
    }

    #[test]
    fn test_parse_timestamp_with_offset() {
        let parsed = parse_timestamp("2026-01-25T12:30:00-03:00").unwrap();
        assert_eq!(parsed, datetime!(2026-01-25 15:30:00 UTC));
    }

    #[test]
    fn test_parse_timestamp_rejects_garbage() {
        assert_eq!(
            parse_timestamp("yesterday"),
            Err(CoreError::InvalidTimestamp(String::from("yesterday")))
        );
    }

    #[test]
    fn test_local_date_keeps_calendar_day() {
        assert_eq!(parse_local_date("2026-01-25").unwrap(), date!(2026 - 01 - 25));
        assert!(parse_local_date("25/01/2026").is_err());
    }

    #[test]
    fn test_cutoff_accepts_plain_date() {
        assert_eq!(
            parse_cutoff("2026-02-01").unwrap(),
            datetime!(2026-02-01 00:00:00 UTC)
        );
        assert_eq!(
            parse_cutoff("2026-02-01T10:00:00.500Z").unwrap(),
            datetime!(2026-02-01 10:00:00.5 UTC)
        );
        assert!(parse_cutoff("soon").is_err());
    }

    #[test]
    fn test_format_matches_browser_iso_strings() {
        let at = datetime!(2026-03-04 05:06:07.089 -3);
        assert_eq!(format_timestamp(at), "2026-03-04T08:06:07.089Z");
        assert_eq!(parse_timestamp(&format_timestamp(at)).unwrap(), at);
    }
}
