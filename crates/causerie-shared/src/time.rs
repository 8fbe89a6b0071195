//! Codec between wall-clock instants and the canonical stored time form.
//!
//! The backing store keeps timestamps as plain local-time strings rendered at
//! a fixed reference offset (UTC+9), with millisecond precision and no zone
//! suffix.  The format is collation-stable: sorting rows by the raw string is
//! the same as sorting them chronologically, which is what the store's range
//! queries rely on.

use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeZone, Utc};

use crate::constants::STORED_TIME_OFFSET_HOURS;
use crate::error::TimeError;
use crate::types::StoredTime;

/// Render format of the stored representation.
pub const STORED_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// The fixed offset all stored times are rendered in.
pub fn reference_offset() -> FixedOffset {
    FixedOffset::east_opt(STORED_TIME_OFFSET_HOURS * 3600).expect("UTC+9 is a valid offset")
}

/// Shift an instant to the reference offset and render the canonical form.
pub fn encode(instant: DateTime<Utc>) -> StoredTime {
    StoredTime(
        instant
            .with_timezone(&reference_offset())
            .format(STORED_TIME_FORMAT)
            .to_string(),
    )
}

/// Parse a stored string back into an instant at the reference offset.
///
/// Callers rendering a timeline should not propagate this error: a message
/// with an unparsable time keeps its place in the list with empty date/time
/// labels.  The condition must still be logged at the call site.
pub fn decode(time: &StoredTime) -> Result<DateTime<FixedOffset>, TimeError> {
    let naive = NaiveDateTime::parse_from_str(time.as_str(), STORED_TIME_FORMAT)
        .map_err(|_| TimeError::InvalidTimestamp(time.as_str().to_string()))?;

    reference_offset()
        .from_local_datetime(&naive)
        .single()
        .ok_or_else(|| TimeError::InvalidTimestamp(time.as_str().to_string()))
}

/// Calendar date label, e.g. `August 7, 2026`.
pub fn format_date(instant: &DateTime<FixedOffset>) -> String {
    instant.format("%B %-d, %Y").to_string()
}

/// 12-hour clock label with a leading meridiem marker, e.g. `PM 3:04`.
pub fn format_time(instant: &DateTime<FixedOffset>) -> String {
    instant.format("%p %-I:%M").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    fn utc(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    #[test]
    fn encode_shifts_to_reference_offset() {
        // 14:59 UTC is 23:59 at UTC+9, same calendar day.
        let stored = encode(utc("2026-08-06T14:59:00Z"));
        assert_eq!(stored.as_str(), "2026-08-06 23:59:00.000");

        // Two minutes later the reference-offset day has rolled over.
        let stored = encode(utc("2026-08-06T15:01:00Z"));
        assert_eq!(stored.as_str(), "2026-08-07 00:01:00.000");
    }

    #[test]
    fn round_trip_preserves_instant_and_labels() {
        for rfc in ["2026-08-06T14:59:00Z", "2026-08-06T15:01:00Z"] {
            let instant = utc(rfc);
            let decoded = decode(&encode(instant)).unwrap();

            assert_eq!(decoded.with_timezone(&Utc), instant);

            let direct = instant.with_timezone(&reference_offset());
            assert_eq!(format_date(&decoded), format_date(&direct));
            assert_eq!(format_time(&decoded), format_time(&direct));
        }
    }

    #[test]
    fn lexicographic_order_is_chronological() {
        let earlier = encode(utc("2026-08-06T14:59:00Z"));
        let later = encode(utc("2026-08-06T15:01:00Z"));
        assert!(earlier < later);
    }

    #[test]
    fn decode_rejects_garbage() {
        assert!(decode(&StoredTime("not a time".into())).is_err());
        assert!(decode(&StoredTime(String::new())).is_err());
        // RFC 3339 with a zone suffix is not the stored form.
        assert!(decode(&StoredTime("2026-08-06T14:59:00+09:00".into())).is_err());
    }

    #[test]
    fn format_time_uses_meridiem_then_space() {
        let afternoon = utc("2026-08-07T06:04:00Z"); // 15:04 at UTC+9
        let label = format_time(&decode(&encode(afternoon)).unwrap());
        assert_eq!(label, "PM 3:04");

        let morning = utc("2026-08-07T00:05:00Z"); // 09:05 at UTC+9
        let label = format_time(&decode(&encode(morning)).unwrap());
        assert_eq!(label, "AM 9:05");
    }

    #[test]
    fn decoded_instant_keeps_millis() {
        let instant = utc("2026-08-07T06:04:05.123Z");
        let decoded = decode(&encode(instant)).unwrap();
        assert_eq!(decoded.nanosecond(), 123_000_000);
    }
}
