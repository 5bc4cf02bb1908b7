//! Date-time encoding for metadata documents and the sanitized timestamp wrapper.
//!
//! Every date in an `info.json` document is written as RFC 3339 text in UTC,
//! with as many fractional-second digits as the value needs. Any RFC 3339
//! offset is accepted on decode.

use chrono::{DateTime, Utc};
use serde::de::{Deserializer, Error as DeError};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

/// Unix seconds of `0001-01-01T00:00:00Z`, the earliest displayable instant.
pub const TIMESTAMP_MIN_SECS: i64 = -62_135_596_800;

/// Unix seconds of `4001-01-01T00:00:00Z`, the latest displayable instant.
pub const TIMESTAMP_MAX_SECS: i64 = 64_092_211_200;

/// Serde adapter for `DateTime<Utc>` fields, used as `#[serde(with = "iso8601")]`.
pub mod iso8601 {
    use super::*;
    use chrono::SecondsFormat;

    /// Formats `value` the way it is stored in metadata documents.
    #[must_use]
    pub fn format(value: &DateTime<Utc>) -> String {
        value.to_rfc3339_opts(SecondsFormat::AutoSi, true)
    }

    /// Parses an RFC 3339 date-time and normalises it to UTC.
    pub fn parse(text: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
        DateTime::parse_from_rfc3339(text).map(|date| date.with_timezone(&Utc))
    }

    pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format(value))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        parse(&text).map_err(|e| D::Error::custom(format!("invalid date `{text}`: {e}")))
    }
}

/// A timestamp that is always a finite, displayable instant.
///
/// Values at or beyond [`TIMESTAMP_MIN_SECS`] / [`TIMESTAMP_MAX_SECS`] are
/// replaced with the current time, both on construction and on decode.
/// Encoding always writes the stored value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SanitizedTimestamp(DateTime<Utc>);

impl SanitizedTimestamp {
    /// Wraps `value`, substituting the current time if it is out of range.
    pub fn new(value: DateTime<Utc>) -> Self {
        Self(sanitize(value))
    }

    /// The current time.
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Returns the stored instant.
    #[must_use]
    pub fn get(&self) -> DateTime<Utc> {
        self.0
    }

    /// Replaces the stored instant, applying the same sanitization as [`new`](Self::new).
    pub fn set(&mut self, value: DateTime<Utc>) {
        self.0 = sanitize(value);
    }
}

impl Default for SanitizedTimestamp {
    fn default() -> Self {
        Self::now()
    }
}

impl From<DateTime<Utc>> for SanitizedTimestamp {
    fn from(value: DateTime<Utc>) -> Self {
        Self::new(value)
    }
}

impl Serialize for SanitizedTimestamp {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        iso8601::serialize(&self.0, serializer)
    }
}

impl<'de> Deserialize<'de> for SanitizedTimestamp {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        iso8601::deserialize(deserializer).map(Self::new)
    }
}

/// Returns `true` when `value` lies strictly between the displayable bounds.
#[must_use]
pub fn is_displayable(value: &DateTime<Utc>) -> bool {
    let secs = value.timestamp();
    let after_min =
        secs > TIMESTAMP_MIN_SECS || (secs == TIMESTAMP_MIN_SECS && value.timestamp_subsec_nanos() > 0);
    after_min && secs < TIMESTAMP_MAX_SECS
}

fn sanitize(value: DateTime<Utc>) -> DateTime<Utc> {
    if is_displayable(&value) {
        value
    } else {
        log::warn!(
            "timestamp {} is outside the displayable range; substituting current time",
            iso8601::format(&value)
        );
        Utc::now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn within_a_minute_of_now(value: DateTime<Utc>) -> bool {
        (Utc::now() - value).num_seconds().abs() < 60
    }

    #[test]
    fn test_format_uses_utc_and_fractional_seconds() {
        let date = Utc.with_ymd_and_hms(2023, 4, 5, 6, 7, 8).unwrap() + Duration::milliseconds(250);
        assert_eq!(iso8601::format(&date), "2023-04-05T06:07:08.250Z");

        let whole = Utc.with_ymd_and_hms(2023, 4, 5, 6, 7, 8).unwrap();
        assert_eq!(iso8601::format(&whole), "2023-04-05T06:07:08Z");
    }

    #[test]
    fn test_parse_normalises_offsets() {
        let parsed = iso8601::parse("2023-04-05T08:07:08+02:00").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2023, 4, 5, 6, 7, 8).unwrap());
    }

    #[test]
    fn test_in_range_value_is_preserved() {
        let date = Utc.with_ymd_and_hms(1999, 12, 31, 23, 59, 59).unwrap();
        let json = format!("\"{}\"", iso8601::format(&date));
        let decoded: SanitizedTimestamp = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded.get(), date);
        assert_eq!(serde_json::to_string(&decoded).unwrap(), json);
    }

    #[test]
    fn test_minimum_instant_decodes_to_now() {
        let decoded: SanitizedTimestamp =
            serde_json::from_str("\"0001-01-01T00:00:00Z\"").unwrap();
        assert!(within_a_minute_of_now(decoded.get()));
    }

    #[test]
    fn test_maximum_instant_decodes_to_now() {
        let decoded: SanitizedTimestamp =
            serde_json::from_str("\"4001-01-01T00:00:00Z\"").unwrap();
        assert!(within_a_minute_of_now(decoded.get()));
    }

    #[test]
    fn test_just_inside_bounds_is_kept() {
        let inside: SanitizedTimestamp =
            serde_json::from_str("\"0001-01-01T00:00:00.5Z\"").unwrap();
        assert_eq!(inside.get().timestamp(), TIMESTAMP_MIN_SECS);

        let below_max: SanitizedTimestamp =
            serde_json::from_str("\"4000-12-31T23:59:59Z\"").unwrap();
        assert_eq!(below_max.get().timestamp(), TIMESTAMP_MAX_SECS - 1);
    }

    #[test]
    fn test_set_sanitizes() {
        let mut stamp = SanitizedTimestamp::new(Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap());
        stamp.set(Utc.with_ymd_and_hms(9999, 1, 1, 0, 0, 0).unwrap());
        assert!(within_a_minute_of_now(stamp.get()));
    }

    #[test]
    fn test_unparseable_date_is_an_error() {
        assert!(serde_json::from_str::<SanitizedTimestamp>("\"yesterday\"").is_err());
        assert!(serde_json::from_str::<SanitizedTimestamp>("12").is_err());
    }
}
