//! Gateway timestamps.
//!
//! The gateway is inconsistent about how it writes instants: epoch
//! milliseconds (as a JSON number or a 13-digit string), bare dates, a legacy
//! truncated shape with a space instead of `T`, and RFC3339 with or without
//! nanoseconds. [`Timestamp::parse`] accepts all of them by input length.
//! Output is always RFC3339 at seconds precision in UTC.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use crate::error::LiqPayError;

const EPOCH_MILLIS_LEN: usize = "1700000000000".len();
const DATE_LEN: usize = "2006-01-02".len();
const LEGACY_LEN: usize = "2006-01-02T15:04:05Z".len();
const RFC3339_LEN: usize = "2006-01-02T15:04:05Z07:00".len();
const RFC3339_NANO_LEN: usize = "2006-01-02T15:04:05.999999999Z07:00".len();

/// An absolute instant in UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Parse any accepted shape. Empty input yields `Ok(None)`.
    pub fn parse(text: &str) -> Result<Option<Self>, LiqPayError> {
        let text = text.trim_matches('"');
        let normalized = match text.len() {
            0 => return Ok(None),
            EPOCH_MILLIS_LEN => {
                let millis: i64 = text.parse().map_err(|_| unsupported(text))?;
                return Self::from_millis(millis).map(Some);
            }
            DATE_LEN => format!("{text}T00:00:00Z"),
            // Legacy shape: index 10 holds a separator other than `T`.
            LEGACY_LEN => match (text.get(..10), text.get(11..)) {
                (Some(date), Some(time)) => format!("{date}T{time}"),
                _ => return Err(unsupported(text)),
            },
            // Only the legacy shape tolerates a separator other than `T`.
            RFC3339_LEN | RFC3339_NANO_LEN if text.as_bytes().get(10) == Some(&b'T') => {
                text.to_string()
            }
            _ => return Err(unsupported(text)),
        };
        DateTime::parse_from_rfc3339(&normalized)
            .map(|dt| Some(Self(dt.with_timezone(&Utc))))
            .map_err(|e| LiqPayError::UnsupportedTimeFormat(format!("{text}: {e}")))
    }

    pub fn from_millis(millis: i64) -> Result<Self, LiqPayError> {
        DateTime::from_timestamp_millis(millis)
            .map(Self)
            .ok_or_else(|| LiqPayError::UnsupportedTimeFormat(format!("{millis} out of range")))
    }

    pub fn now() -> Self {
        Self(Utc::now())
    }

    pub fn as_datetime(&self) -> DateTime<Utc> {
        self.0
    }

    pub fn timestamp_millis(&self) -> i64 {
        self.0.timestamp_millis()
    }

    /// Canonical text form.
    pub fn to_rfc3339(&self) -> String {
        self.0.to_rfc3339_opts(SecondsFormat::Secs, true)
    }
}

fn unsupported(text: &str) -> LiqPayError {
    LiqPayError::UnsupportedTimeFormat(format!("{text:?}"))
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }
}

impl From<Timestamp> for DateTime<Utc> {
    fn from(ts: Timestamp) -> Self {
        ts.0
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_rfc3339())
    }
}

struct TimestampVisitor;

impl<'de> Visitor<'de> for TimestampVisitor {
    type Value = Option<Timestamp>;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("an RFC3339 string, a date, or epoch milliseconds")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        Timestamp::parse(v).map_err(E::custom)
    }

    // Numbers go through the same length rules as strings.
    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        self.visit_str(&v.to_string())
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        self.visit_str(&v.to_string())
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
        deserializer.deserialize_any(TimestampVisitor)
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_rfc3339())
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer
            .deserialize_any(TimestampVisitor)?
            .ok_or_else(|| de::Error::custom("empty timestamp"))
    }
}

/// Serde adapter for `Option<Timestamp>` fields: `null`, `""` and a missing
/// field all leave the value unset.
///
/// ```ignore
/// #[serde(default, with = "crate::time::optional", skip_serializing_if = "Option::is_none")]
/// pub end_date: Option<Timestamp>,
/// ```
pub mod optional {
    use super::{Timestamp, TimestampVisitor};
    use serde::{Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(
        value: &Option<Timestamp>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(ts) => ts.serialize(serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Timestamp>, D::Error> {
        deserializer.deserialize_any(TimestampVisitor)
    }
}

#[cfg(feature = "full")]
mod sql {
    use super::Timestamp;
    use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
    use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};

    /// Parse a timestamp read back from storage.
    fn parse_stored(text: &str) -> Option<Timestamp> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
            return Some(Timestamp(dt.with_timezone(&Utc)));
        }
        // SQLite's own `datetime('now')` shape, always UTC.
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S%.f") {
            return Some(Timestamp(naive.and_utc()));
        }
        Timestamp::parse(text).ok().flatten()
    }

    impl ToSql for Timestamp {
        fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
            Ok(ToSqlOutput::from(
                self.0.to_rfc3339_opts(SecondsFormat::Nanos, true),
            ))
        }
    }

    impl FromSql for Timestamp {
        fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
            match value {
                ValueRef::Text(text) => {
                    let text =
                        std::str::from_utf8(text).map_err(|e| FromSqlError::Other(Box::new(e)))?;
                    parse_stored(text).ok_or_else(|| {
                        FromSqlError::Other(format!("unrecognised timestamp {text:?}").into())
                    })
                }
                ValueRef::Integer(millis) => {
                    Timestamp::from_millis(millis).map_err(|e| FromSqlError::Other(Box::new(e)))
                }
                _ => Err(FromSqlError::InvalidType),
            }
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use chrono::TimeZone;

        fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
            Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
        }

        #[test]
        fn test_stored_forms() {
            let expected = utc(2023, 5, 1, 12, 30, 45);
            assert_eq!(
                parse_stored("2023-05-01T12:30:45.000000000Z").unwrap().as_datetime(),
                expected
            );
            assert_eq!(
                parse_stored("2023-05-01 12:30:45").unwrap().as_datetime(),
                expected
            );
            assert_eq!(parse_stored("2023-05-01").unwrap().as_datetime(), utc(2023, 5, 1, 0, 0, 0));
            assert!(parse_stored("garbage").is_none());
        }
    }
}
