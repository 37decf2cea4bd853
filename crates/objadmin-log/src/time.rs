//! Timestamp rendering and parsing for event records.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serializer};

/// Renders `t` as RFC 3339 in UTC with nanosecond precision.
///
/// Trailing zeros of the fractional second are trimmed and the fraction is
/// dropped entirely when it is zero, so whole seconds render as
/// `2024-01-01T00:00:00Z` and half seconds as `2024-01-01T00:00:00.5Z`.
pub fn format_rfc3339_nano(t: &DateTime<Utc>) -> String {
    let base = t.format("%Y-%m-%dT%H:%M:%S");
    // Leap seconds are carried as nanos >= 1e9.
    let nanos = t.timestamp_subsec_nanos() % 1_000_000_000;
    if nanos == 0 {
        return format!("{base}Z");
    }
    let fraction = format!("{nanos:09}");
    format!("{base}.{}Z", fraction.trim_end_matches('0'))
}

/// `0001-01-01T00:00:00Z`, written by peers that always emit the time field.
fn zero_instant() -> Option<NaiveDateTime> {
    NaiveDate::from_ymd_opt(1, 1, 1).and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Returns `true` if `t` is the zero instant and should be treated as unset.
pub fn is_zero_instant(t: &DateTime<Utc>) -> bool {
    Some(t.naive_utc()) == zero_instant()
}

/// Parses an RFC 3339 timestamp with any offset into UTC.
///
/// Also accepts the signed years beyond 9999 that [`format_rfc3339_nano`]
/// writes, such as `+10000-01-01T00:00:00Z`. Empty strings and the zero
/// instant yield `None`.
pub fn parse_timestamp(raw: &str) -> Result<Option<DateTime<Utc>>, chrono::ParseError> {
    if raw.is_empty() {
        return Ok(None);
    }
    let t = match DateTime::parse_from_rfc3339(raw) {
        Ok(t) => t.with_timezone(&Utc),
        Err(e) => parse_extended_year(raw).ok_or(e)?,
    };
    Ok(if is_zero_instant(&t) { None } else { Some(t) })
}

/// `[+-]YYYYY-MM-DDTHH:MM:SS[.f]Z`, outside the four-digit RFC 3339 range.
fn parse_extended_year(raw: &str) -> Option<DateTime<Utc>> {
    if !raw.starts_with(['+', '-']) {
        return None;
    }
    let body = raw.strip_suffix('Z')?;
    let naive = NaiveDateTime::parse_from_str(body, "%Y-%m-%dT%H:%M:%S%.f").ok()?;
    Some(Utc.from_utc_datetime(&naive))
}

/// Serde adapter for `Option<DateTime<Utc>>` event timestamps.
pub(crate) mod optional {
    use super::*;

    pub fn serialize<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(t) => serializer.serialize_str(&format_rfc3339_nano(t)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        match raw {
            Some(raw) => parse_timestamp(&raw).map_err(serde::de::Error::custom),
            None => Ok(None),
        }
    }
}
