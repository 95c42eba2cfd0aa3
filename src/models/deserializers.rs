use chrono::{DateTime, NaiveDateTime, Utc};
use serde::de::Error;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Parse a server timestamp string.
///
/// Accepts RFC 3339, RFC 2822 (what Flask's `jsonify` emits for datetimes)
/// and naive ISO-8601, which is taken as UTC.
pub fn parse_timestamp_str(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(ts) = s.parse::<DateTime<Utc>>() {
        return Some(ts);
    }
    if let Ok(ts) = DateTime::parse_from_rfc2822(s) {
        return Some(ts.with_timezone(&Utc));
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|naive| naive.and_utc())
}

/// Deserializer for optional timestamps: integers (ms), date strings or null
pub fn deserialize_optional_timestamp<'de, D>(
    deserializer: D,
) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    match value {
        Value::Null => Ok(None),
        Value::Number(n) => {
            let ms = n.as_i64().ok_or_else(|| Error::custom("invalid timestamp"))?;
            DateTime::from_timestamp_millis(ms)
                .map(Some)
                .ok_or_else(|| Error::custom("timestamp out of range"))
        }
        Value::String(s) => parse_timestamp_str(&s)
            .map(Some)
            .ok_or_else(|| Error::custom(format!("unrecognised timestamp: {}", s))),
        _ => Err(Error::custom("timestamp must be a number, string or null")),
    }
}

/// Deserializer that maps `null` to the type's default (serde's `default` only covers absence)
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rfc3339() {
        let ts = parse_timestamp_str("2026-10-13T09:05:00Z").unwrap();
        assert_eq!(ts.to_rfc3339(), "2026-10-13T09:05:00+00:00");
    }

    #[test]
    fn test_parse_rfc2822_gmt() {
        let ts = parse_timestamp_str("Tue, 13 Oct 2026 09:05:00 GMT").unwrap();
        assert_eq!(ts.to_rfc3339(), "2026-10-13T09:05:00+00:00");
    }

    #[test]
    fn test_parse_naive_iso_as_utc() {
        let ts = parse_timestamp_str("2026-10-13T09:05:00.250").unwrap();
        assert_eq!(ts.timestamp_millis(), 1_791_882_300_250);

        let spaced = parse_timestamp_str("2026-10-13 09:05:00").unwrap();
        assert_eq!(spaced.timestamp(), 1_791_882_300);
    }

    #[test]
    fn test_parse_clock_time_is_not_a_timestamp() {
        assert!(parse_timestamp_str("09:05 AM").is_none());
        assert!(parse_timestamp_str("").is_none());
    }

    #[derive(Deserialize)]
    struct Stamped {
        #[serde(default, deserialize_with = "deserialize_optional_timestamp")]
        at: Option<DateTime<Utc>>,
    }

    #[test]
    fn test_optional_timestamp_millis() {
        let stamped: Stamped = serde_json::from_str(r#"{"at": 1762076480016}"#).unwrap();
        assert_eq!(stamped.at, DateTime::from_timestamp_millis(1762076480016));
    }

    #[test]
    fn test_optional_timestamp_null_and_missing() {
        let stamped: Stamped = serde_json::from_str(r#"{"at": null}"#).unwrap();
        assert!(stamped.at.is_none());

        let stamped: Stamped = serde_json::from_str("{}").unwrap();
        assert!(stamped.at.is_none());
    }

    #[test]
    fn test_optional_timestamp_rejects_garbage() {
        assert!(serde_json::from_str::<Stamped>(r#"{"at": "yesterday"}"#).is_err());
        assert!(serde_json::from_str::<Stamped>(r#"{"at": true}"#).is_err());
    }
}
