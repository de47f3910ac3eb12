//! Timestamps as the upstream weather API reports them.
//!
//! Open-Meteo returns local wall-clock strings such as `2025-11-18T15:00`
//! together with a single `utc_offset_seconds` for the whole response. Other
//! sources (and our tests) use full RFC 3339 strings with an explicit offset.
//! [`Timestamp`] accepts both and keeps the original text so it can be echoed
//! back unchanged.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Offset, Timelike, Utc};
use serde::{Serialize, Serializer};
use std::{cmp::Ordering, fmt, str::FromStr};

/// Wall-clock layouts accepted when the string carries no offset.
const LOCAL_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized timestamp '{0}'")]
pub struct TimestampError(pub String);

/// A point in time with the offset it was reported in.
///
/// Equality and ordering use the absolute instant only, so
/// `2025-11-18T20:00:00-06:00` equals `2025-11-19T02:00:00Z`.
#[derive(Debug, Clone)]
pub struct Timestamp {
    raw: String,
    at: DateTime<FixedOffset>,
}

impl Timestamp {
    /// Parse a timestamp, reading offset-less strings as UTC.
    pub fn parse(raw: &str) -> Result<Self, TimestampError> {
        Self::parse_with_offset(raw, Utc.fix())
    }

    /// Parse a timestamp, reading offset-less strings in `offset`.
    ///
    /// An explicit offset in the string always wins over `offset`.
    pub fn parse_with_offset(raw: &str, offset: FixedOffset) -> Result<Self, TimestampError> {
        if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
            return Ok(Self { raw: raw.to_owned(), at });
        }

        let naive = LOCAL_FORMATS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
            .ok_or_else(|| TimestampError(raw.to_owned()))?;

        let at = naive
            .and_local_timezone(offset)
            .single()
            .ok_or_else(|| TimestampError(raw.to_owned()))?;

        Ok(Self { raw: raw.to_owned(), at })
    }

    /// The text this timestamp was parsed from.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn instant(&self) -> DateTime<FixedOffset> {
        self.at
    }

    /// Calendar date in the timestamp's own offset.
    pub fn local_date(&self) -> NaiveDate {
        self.at.date_naive()
    }

    /// Hour of day (0-23) in the timestamp's own offset.
    pub fn local_hour(&self) -> u32 {
        self.at.hour()
    }
}

impl FromStr for Timestamp {
    type Err = TimestampError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl PartialEq for Timestamp {
    fn eq(&self, other: &Self) -> bool {
        self.at == other.at
    }
}

impl Eq for Timestamp {}

impl PartialOrd for Timestamp {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Timestamp {
    fn cmp(&self, other: &Self) -> Ordering {
        self.at.cmp(&other.at)
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(s: &str) -> Timestamp {
        Timestamp::parse(s).expect("valid timestamp")
    }

    #[test]
    fn parses_open_meteo_minutes_format() {
        let t = ts("2025-11-18T15:00");
        assert_eq!(t.local_hour(), 15);
        assert_eq!(t.local_date(), NaiveDate::from_ymd_opt(2025, 11, 18).unwrap());
        assert_eq!(t.as_str(), "2025-11-18T15:00");
    }

    #[test]
    fn parses_seconds_and_explicit_offsets() {
        assert_eq!(ts("2025-11-18T15:00:00").local_hour(), 15);
        assert_eq!(ts("2025-11-18T14:00:00Z").local_hour(), 14);

        let cst = ts("2025-11-18T20:00:00-06:00");
        assert_eq!(cst.local_hour(), 20);
        assert_eq!(cst.local_date(), NaiveDate::from_ymd_opt(2025, 11, 18).unwrap());
    }

    #[test]
    fn explicit_offset_beats_fallback() {
        let fallback = FixedOffset::east_opt(3600).unwrap();
        let t = Timestamp::parse_with_offset("2025-11-18T20:00:00-06:00", fallback).unwrap();
        assert_eq!(t.instant().offset().local_minus_utc(), -6 * 3600);
    }

    #[test]
    fn fallback_offset_applies_to_local_strings() {
        let cst = FixedOffset::west_opt(6 * 3600).unwrap();
        let local = Timestamp::parse_with_offset("2025-11-18T20:00", cst).unwrap();
        assert_eq!(local, ts("2025-11-19T02:00:00Z"));
        assert_eq!(local.local_hour(), 20);
    }

    #[test]
    fn equality_is_by_instant_not_text() {
        assert_eq!(ts("2025-11-18T20:00:00-06:00"), ts("2025-11-19T02:00:00Z"));
        assert!(ts("2025-11-18T23:59:00Z") < ts("2025-11-19T00:01:00Z"));
    }

    #[test]
    fn rejects_garbage() {
        for bad in ["", "tomorrow", "2025-13-01T00:00", "2025-11-18", "15:00"] {
            let err = Timestamp::parse(bad).unwrap_err();
            assert_eq!(err, TimestampError(bad.to_string()));
        }
    }

    #[test]
    fn serializes_as_original_text() {
        let json = serde_json::to_string(&ts("2025-11-19T03:00:00-06:00")).unwrap();
        assert_eq!(json, "\"2025-11-19T03:00:00-06:00\"");
    }
}
