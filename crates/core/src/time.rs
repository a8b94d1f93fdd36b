//! Timestamp normalization.
//!
//! Store documents carry time values in several shapes: epoch millis,
//! `{seconds, nanoseconds}` wrappers, ISO strings, or nothing at all.
//! Everything is folded into `DateTime<Utc>` once, at ingestion, so the
//! aggregation code only ever sees one representation.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value;

/// A raw timestamp as found in a document, before normalization.
#[derive(Debug, Clone, PartialEq)]
pub enum Timestamp {
    EpochMillis(i64),
    EpochSeconds { seconds: i64, nanos: u32 },
    Iso(String),
    Native(DateTime<Utc>),
}

const MILLIS_KEYS: [&str; 2] = ["millis", "_millis"];
const SECONDS_KEYS: [&str; 2] = ["seconds", "_seconds"];
const NANOS_KEYS: [&str; 2] = ["nanoseconds", "_nanoseconds"];

impl Timestamp {
    /// Classify a JSON value. Returns `None` for null, booleans, arrays and
    /// objects without a recognizable time field.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(_) => number_as_i64(value).map(Self::EpochMillis),
            Value::String(s) => Some(Self::Iso(s.clone())),
            Value::Object(map) => {
                // A millisecond field wins over a seconds count.
                if let Some(ms) = MILLIS_KEYS
                    .iter()
                    .find_map(|k| map.get(*k))
                    .and_then(number_as_i64)
                {
                    return Some(Self::EpochMillis(ms));
                }
                let seconds = SECONDS_KEYS
                    .iter()
                    .find_map(|k| map.get(*k))
                    .and_then(number_as_i64)?;
                let nanos = NANOS_KEYS
                    .iter()
                    .find_map(|k| map.get(*k))
                    .and_then(Value::as_u64)
                    .map(|n| n.min(999_999_999) as u32)
                    .unwrap_or(0);
                Some(Self::EpochSeconds { seconds, nanos })
            }
            _ => None,
        }
    }

    /// Canonical date, or `None` when the value cannot be interpreted.
    pub fn to_date(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::EpochMillis(ms) => DateTime::from_timestamp_millis(*ms),
            Self::EpochSeconds { seconds, nanos } => DateTime::from_timestamp(*seconds, *nanos),
            Self::Iso(s) => parse_datetime(s),
            Self::Native(dt) => Some(*dt),
        }
    }

    /// Canonical epoch milliseconds, `0` when unparseable.
    pub fn to_ms(&self) -> i64 {
        match self {
            Self::EpochMillis(ms) => *ms,
            other => other.to_date().map(|d| d.timestamp_millis()).unwrap_or(0),
        }
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Self::Native(dt)
    }
}

/// Epoch milliseconds for an optional timestamp; `0` keeps sorts stable.
pub fn to_ms(ts: Option<&Timestamp>) -> i64 {
    ts.map(Timestamp::to_ms).unwrap_or(0)
}

/// Canonical date for an optional timestamp.
pub fn to_date(ts: Option<&Timestamp>) -> Option<DateTime<Utc>> {
    ts.and_then(Timestamp::to_date)
}

/// Shorthand used by the document decoders.
pub fn date_from_value(value: &Value) -> Option<DateTime<Utc>> {
    Timestamp::from_value(value).and_then(|t| t.to_date())
}

/// Generic date parsing for string timestamps.
///
/// Accepts RFC 3339, naive `YYYY-MM-DD[ T]HH:MM:SS[.f]` (read as UTC),
/// a bare `YYYY-MM-DD` (midnight UTC) and numeric millisecond strings.
pub fn parse_datetime(input: &str) -> Option<DateTime<Utc>> {
    let s = input.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M:%S",
    ] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(naive.and_utc());
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|n| n.and_utc());
    }
    s.parse::<i64>().ok().and_then(DateTime::from_timestamp_millis)
}

fn number_as_i64(value: &Value) -> Option<i64> {
    value.as_i64().or_else(|| {
        value
            .as_f64()
            .filter(|f| f.is_finite() && f.abs() < i64::MAX as f64)
            .map(|f| f.round() as i64)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, s).unwrap()
    }

    #[test]
    fn number_is_millis() {
        let ts = Timestamp::from_value(&json!(1_767_225_600_000_i64)).unwrap();
        assert_eq!(ts, Timestamp::EpochMillis(1_767_225_600_000));
        assert_eq!(ts.to_date(), Some(utc(2026, 1, 1, 0, 0, 0)));
    }

    #[test]
    fn float_millis_are_rounded() {
        let ts = Timestamp::from_value(&json!(1_767_225_600_000.4_f64)).unwrap();
        assert_eq!(ts.to_ms(), 1_767_225_600_000);
    }

    #[test]
    fn seconds_wrapper() {
        let ts = Timestamp::from_value(&json!({"seconds": 1_767_225_600, "nanoseconds": 500_000_000})).unwrap();
        assert_eq!(ts.to_ms(), 1_767_225_600_500);

        let underscored = Timestamp::from_value(&json!({"_seconds": 1_767_225_600})).unwrap();
        assert_eq!(underscored.to_date(), Some(utc(2026, 1, 1, 0, 0, 0)));
    }

    #[test]
    fn millis_field_preferred_over_seconds() {
        let ts = Timestamp::from_value(&json!({"millis": 1_000, "seconds": 99})).unwrap();
        assert_eq!(ts.to_ms(), 1_000);
    }

    #[test]
    fn iso_variants() {
        assert_eq!(parse_datetime("2026-03-04T10:00:00Z"), Some(utc(2026, 3, 4, 10, 0, 0)));
        assert_eq!(parse_datetime("2026-03-04T12:00:00+02:00"), Some(utc(2026, 3, 4, 10, 0, 0)));
        assert_eq!(parse_datetime("2026-03-04 10:00:00"), Some(utc(2026, 3, 4, 10, 0, 0)));
        assert_eq!(parse_datetime("2026-03-04T10:00:00.250"), Some(utc(2026, 3, 4, 10, 0, 0) + chrono::Duration::milliseconds(250)));
        assert_eq!(parse_datetime("2026-03-04"), Some(utc(2026, 3, 4, 0, 0, 0)));
        assert_eq!(parse_datetime("1767225600000"), Some(utc(2026, 1, 1, 0, 0, 0)));
    }

    #[test]
    fn garbage_degrades_to_fallbacks() {
        let ts = Timestamp::from_value(&json!("next tuesday")).unwrap();
        assert_eq!(ts.to_date(), None);
        assert_eq!(ts.to_ms(), 0);

        assert_eq!(Timestamp::from_value(&json!(null)), None);
        assert_eq!(Timestamp::from_value(&json!(true)), None);
        assert_eq!(Timestamp::from_value(&json!({"when": 3})), None);
        assert_eq!(to_ms(None), 0);
        assert_eq!(to_date(None), None);
    }

    proptest::proptest! {
        #[test]
        fn arbitrary_strings_never_panic(s in ".{0,40}") {
            let ts = Timestamp::Iso(s);
            let _ = ts.to_date();
            let _ = ts.to_ms();
        }

        #[test]
        fn millis_survive_normalization(ms in -8_000_000_000_000_i64..8_000_000_000_000_i64) {
            let ts = Timestamp::from_value(&json!(ms)).unwrap();
            proptest::prop_assert_eq!(ts.to_ms(), ms);
            proptest::prop_assert_eq!(ts.to_date().map(|d| d.timestamp_millis()), Some(ms));
        }
    }

    #[test]
    fn native_passthrough() {
        let dt = utc(2025, 12, 31, 23, 59, 59);
        let ts = Timestamp::from(dt);
        assert_eq!(ts.to_date(), Some(dt));
        assert_eq!(to_ms(Some(&ts)), dt.timestamp_millis());
    }
}
