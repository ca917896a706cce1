// SPDX-License-Identifier: MPL-2.0

//! Timestamps from the backend.
//!
//! Timezone-aware columns come back as RFC 3339. Values built from a naive
//! UTC clock (story expiry, SQLite-backed columns) carry no offset at all and
//! are read as UTC.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serializer};

pub fn parse(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(aware) = DateTime::parse_from_rfc3339(value) {
        return Some(aware.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .map(|naive| naive.and_utc())
}

pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&value.to_rfc3339())
}

pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
    let raw = String::deserialize(deserializer)?;
    parse(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {raw}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::User;

    #[test]
    fn test_parse_offset_and_naive_forms() {
        let aware = parse("2025-01-01T12:00:00.123456Z").unwrap();
        let naive = parse("2025-01-01T12:00:00.123456").unwrap();
        assert_eq!(aware, naive);

        let shifted = parse("2025-01-01T14:00:00+02:00").unwrap();
        assert_eq!(shifted, parse("2025-01-01T12:00:00").unwrap());

        assert!(parse("yesterday").is_none());
    }

    #[test]
    fn test_user_with_naive_created_at_deserializes() {
        let naive: User = serde_json::from_str(
            r#"{"id":1,"username":"bob","created_at":"2025-01-01T12:00:00.123456"}"#,
        )
        .unwrap();
        let aware: User = serde_json::from_str(
            r#"{"id":1,"username":"bob","created_at":"2025-01-01T12:00:00.123456Z"}"#,
        )
        .unwrap();
        assert_eq!(naive.created_at, aware.created_at);

        let round: User = serde_json::from_str(&serde_json::to_string(&naive).unwrap()).unwrap();
        assert_eq!(round.created_at, naive.created_at);
    }

    #[test]
    fn test_garbage_timestamp_is_an_error() {
        let result =
            serde_json::from_str::<User>(r#"{"id":1,"username":"bob","created_at":"soon"}"#);
        assert!(result.is_err());
    }
}
