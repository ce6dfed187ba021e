//! Timestamp handling for AirHub payloads.
//!
//! The API speaks RFC3339 in UTC with up to nanosecond precision, trailing
//! zeros of the fraction trimmed. An unset timestamp travels as the zero
//! instant `0001-01-01T00:00:00Z` rather than `null`; on our side it is
//! modelled as `None`.

use chrono::{DateTime, Datelike, NaiveDateTime, TimeZone, Timelike, Utc};
use thiserror::Error;

/// Wire form of an unset timestamp.
pub const ZERO_TIME: &str = "0001-01-01T00:00:00Z";

/// Error type for timestamp parsing.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum TimeParseError {
    #[error("Invalid timestamp: {0}")]
    InvalidFormat(String),
}

/// Format a timestamp as RFC3339 with a trimmed nanosecond fraction.
pub fn format_rfc3339_nano(dt: &DateTime<Utc>) -> String {
    let mut out = dt.format("%Y-%m-%dT%H:%M:%S").to_string();

    let nanos = dt.nanosecond();
    if nanos > 0 {
        let fraction = format!("{:09}", nanos);
        out.push('.');
        out.push_str(fraction.trim_end_matches('0'));
    }

    out.push('Z');
    out
}

/// Parse an RFC3339 timestamp, normalizing it to UTC.
///
/// A timestamp without an offset is taken to be UTC already.
pub fn parse_rfc3339(s: &str) -> Result<DateTime<Utc>, TimeParseError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }

    if let Ok(ndt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(Utc.from_utc_datetime(&ndt));
    }

    Err(TimeParseError::InvalidFormat(s.to_string()))
}

/// Whether `dt` is the zero instant (midnight, January 1st of year 1).
pub fn is_zero(dt: &DateTime<Utc>) -> bool {
    dt.year() == 1
        && dt.ordinal() == 1
        && dt.num_seconds_from_midnight() == 0
        && dt.nanosecond() == 0
}

/// Serde adapter for timestamps where `None` travels as [`ZERO_TIME`].
pub mod zero_default {
    use chrono::{DateTime, Utc};
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        value: &Option<DateTime<Utc>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(dt) => serializer.serialize_str(&super::format_rfc3339_nano(dt)),
            None => serializer.serialize_str(super::ZERO_TIME),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<DateTime<Utc>>, D::Error> {
        let Some(raw) = Option::<String>::deserialize(deserializer)? else {
            return Ok(None);
        };

        let dt = super::parse_rfc3339(&raw).map_err(de::Error::custom)?;
        Ok((!super::is_zero(&dt)).then_some(dt))
    }
}

/// Serde adapter for optional request timestamps (skip when `None`).
pub mod optional {
    use chrono::{DateTime, Utc};
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        value: &Option<DateTime<Utc>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(dt) => serializer.serialize_str(&super::format_rfc3339_nano(dt)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<DateTime<Utc>>, D::Error> {
        Option::<String>::deserialize(deserializer)?
            .map(|raw| super::parse_rfc3339(&raw).map_err(de::Error::custom))
            .transpose()
    }
}

/// Serde adapter for required timestamps.
pub mod required {
    use chrono::{DateTime, Utc};
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_rfc3339_nano(value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_rfc3339(&raw).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd_hms_nano(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32, nano: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, s)
            .unwrap()
            .with_nanosecond(nano)
            .unwrap()
    }

    #[test]
    fn test_format_without_fraction() {
        let dt = ymd_hms_nano(2024, 1, 15, 12, 0, 0, 0);
        assert_eq!(format_rfc3339_nano(&dt), "2024-01-15T12:00:00Z");
    }

    #[test]
    fn test_format_nanosecond_fraction() {
        let dt = ymd_hms_nano(2011, 11, 8, 1, 7, 3, 22);
        assert_eq!(format_rfc3339_nano(&dt), "2011-11-08T01:07:03.000000022Z");
    }

    #[test]
    fn test_format_trims_trailing_zeros() {
        let dt = ymd_hms_nano(2024, 6, 1, 0, 0, 0, 500_000_000);
        assert_eq!(format_rfc3339_nano(&dt), "2024-06-01T00:00:00.5Z");
    }

    #[test]
    fn test_format_early_year_is_zero_padded() {
        let dt = ymd_hms_nano(1902, 10, 2, 3, 5, 6, 11);
        assert_eq!(format_rfc3339_nano(&dt), "1902-10-02T03:05:06.000000011Z");
    }

    #[test]
    fn test_parse_normalizes_offset() {
        let dt = parse_rfc3339("2024-01-15T14:00:00+02:00").unwrap();
        assert_eq!(dt, ymd_hms_nano(2024, 1, 15, 12, 0, 0, 0));
    }

    #[test]
    fn test_parse_without_offset_assumes_utc() {
        let dt = parse_rfc3339("2024-01-15T12:00:00").unwrap();
        assert_eq!(dt, ymd_hms_nano(2024, 1, 15, 12, 0, 0, 0));
    }

    #[test]
    fn test_parse_invalid() {
        assert_eq!(
            parse_rfc3339("yesterday"),
            Err(TimeParseError::InvalidFormat("yesterday".to_string()))
        );
    }

    #[test]
    fn test_zero_instant() {
        let zero = parse_rfc3339(ZERO_TIME).unwrap();
        assert!(is_zero(&zero));
        assert!(!is_zero(&ymd_hms_nano(1, 1, 1, 0, 0, 0, 1)));
        assert_eq!(format_rfc3339_nano(&zero), ZERO_TIME);
    }
}
