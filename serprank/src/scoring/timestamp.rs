//! Timestamp normalization for recency scoring
//!
//! Document timestamps arrive as ISO-8601 strings with a `Z` marker, with an
//! explicit offset, or with no offset at all. Every form is reduced to a naive
//! wall-clock value: offsets are dropped, not converted. Two timestamps with
//! different offsets are therefore compared by their local clock readings, and
//! the true elapsed time between them is not computed.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};

use super::error::{ScoringError, ScoringResult};

const MICROS_PER_DAY: i64 = 86_400 * 1_000_000;

const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%:z",
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M%:z",
];

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// A value that can be turned into a naive document timestamp
pub trait TimestampInput {
    /// Normalize to naive wall-clock time
    fn to_naive(&self) -> ScoringResult<NaiveDateTime>;
}

impl TimestampInput for str {
    fn to_naive(&self) -> ScoringResult<NaiveDateTime> {
        parse_timestamp(self)
    }
}

impl TimestampInput for String {
    fn to_naive(&self) -> ScoringResult<NaiveDateTime> {
        parse_timestamp(self)
    }
}

impl TimestampInput for NaiveDateTime {
    fn to_naive(&self) -> ScoringResult<NaiveDateTime> {
        Ok(*self)
    }
}

impl<Tz: TimeZone> TimestampInput for DateTime<Tz> {
    fn to_naive(&self) -> ScoringResult<NaiveDateTime> {
        Ok(strip_offset(self))
    }
}

/// Parse an ISO-8601 timestamp and drop any offset it carries
///
/// Accepted forms:
/// - `2024-01-15T10:30:00Z`, `2024-01-15T10:30:00.123456Z`
/// - `2024-01-15T10:30:00+02:00`, `2024-01-15T10:30:00+0200`
/// - `2024-01-15T10:30:00`, `2024-01-15 10:30:00`, `2024-01-15T10:30`
/// - `2024-01-15` (midnight)
pub fn parse_timestamp(value: &str) -> ScoringResult<NaiveDateTime> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ScoringError::InvalidTimestamp {
            value: value.to_string(),
            reason: "timestamp is empty".to_string(),
        });
    }

    // A trailing UTC marker is just a zero offset
    let normalized = match trimmed.strip_suffix('Z').or_else(|| trimmed.strip_suffix('z')) {
        Some(stripped) => format!("{}+00:00", stripped),
        None => trimmed.to_string(),
    };

    if let Ok(parsed) = DateTime::parse_from_rfc3339(&normalized) {
        return Ok(parsed.naive_local());
    }

    for format in OFFSET_FORMATS {
        if let Ok(parsed) = DateTime::parse_from_str(&normalized, format) {
            return Ok(parsed.naive_local());
        }
    }

    let mut last_error = None;
    for format in NAIVE_FORMATS {
        match NaiveDateTime::parse_from_str(&normalized, format) {
            Ok(parsed) => return Ok(parsed),
            Err(e) => last_error = Some(e),
        }
    }

    match NaiveDate::parse_from_str(&normalized, "%Y-%m-%d") {
        Ok(date) => Ok(date.and_time(NaiveTime::MIN)),
        Err(_) => Err(ScoringError::InvalidTimestamp {
            value: value.to_string(),
            reason: last_error
                .map(|e| e.to_string())
                .unwrap_or_else(|| "not an ISO-8601 date-time".to_string()),
        }),
    }
}

/// Drop the offset of a zoned timestamp, keeping its wall-clock reading
pub fn strip_offset<Tz: TimeZone>(value: &DateTime<Tz>) -> NaiveDateTime {
    value.naive_local()
}

/// The default reference time: local wall clock, without offset
pub fn now_reference() -> NaiveDateTime {
    Local::now().naive_local()
}

/// Whole days from `document` to `reference`, floored toward negative infinity
///
/// A document one second in the future yields `-1`, a document 23 hours in
/// the past yields `0`.
pub fn days_between(reference: NaiveDateTime, document: NaiveDateTime) -> i64 {
    let delta = reference - document;
    let micros = delta
        .num_microseconds()
        .unwrap_or_else(|| delta.num_milliseconds().saturating_mul(1_000));
    micros.div_euclid(MICROS_PER_DAY)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};

    fn naive(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S").unwrap()
    }

    #[test]
    fn test_parse_utc_marker() {
        let parsed = parse_timestamp("2024-01-15T10:30:00Z").unwrap();
        assert_eq!(parsed, naive("2024-01-15T10:30:00"));
    }

    #[test]
    fn test_parse_fractional_utc() {
        let parsed = parse_timestamp("2024-01-15T10:30:00.123456Z").unwrap();
        assert_eq!(parsed.and_utc().timestamp_subsec_micros(), 123_456);
    }

    #[test]
    fn test_parse_offset_is_stripped_not_converted() {
        let parsed = parse_timestamp("2024-01-15T10:30:00+05:00").unwrap();
        assert_eq!(parsed, naive("2024-01-15T10:30:00"));

        let parsed = parse_timestamp("2024-01-15T10:30:00-0800").unwrap();
        assert_eq!(parsed, naive("2024-01-15T10:30:00"));
    }

    #[test]
    fn test_parse_naive_forms() {
        assert_eq!(
            parse_timestamp("2024-01-15T10:30:00").unwrap(),
            naive("2024-01-15T10:30:00")
        );
        assert_eq!(
            parse_timestamp("2024-01-15 10:30:00").unwrap(),
            naive("2024-01-15T10:30:00")
        );
        assert_eq!(
            parse_timestamp("2024-01-15T10:30").unwrap(),
            naive("2024-01-15T10:30:00")
        );
        assert_eq!(
            parse_timestamp("2024-01-15").unwrap(),
            naive("2024-01-15T00:00:00")
        );
    }

    #[test]
    fn test_parse_rejects_garbage() {
        for bad in ["", "   ", "yesterday", "2024-13-45T00:00:00", "15/01/2024"] {
            assert!(
                matches!(
                    parse_timestamp(bad),
                    Err(ScoringError::InvalidTimestamp { .. })
                ),
                "expected failure for {bad:?}"
            );
        }
    }

    #[test]
    fn test_zoned_input_keeps_wall_clock() {
        let offset = FixedOffset::east_opt(9 * 3600).unwrap();
        let zoned = offset.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap();
        assert_eq!(zoned.to_naive().unwrap(), naive("2024-03-01T08:00:00"));

        let utc = Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap();
        assert_eq!(utc.to_naive().unwrap(), naive("2024-03-01T08:00:00"));
    }

    #[test]
    fn test_days_between_floors() {
        let reference = naive("2024-02-01T12:00:00");
        assert_eq!(days_between(reference, naive("2024-02-01T12:00:00")), 0);
        assert_eq!(days_between(reference, naive("2024-01-31T13:00:00")), 0);
        assert_eq!(days_between(reference, naive("2024-01-31T12:00:00")), 1);
        assert_eq!(days_between(reference, naive("2024-01-02T12:00:00")), 30);
        assert_eq!(days_between(reference, naive("2024-02-01T12:00:01")), -1);
        assert_eq!(days_between(reference, naive("2024-02-03T12:00:00")), -2);
    }
}
