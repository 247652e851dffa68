//! Normalize — parse one raw feed line into a typed position report.
//!
//! The rename/convert table is an enumerated `match` on the recognized
//! source keys rather than a lookup map, so adding or removing a mapping
//! is a compile-time change.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use super::model::{NormalizeError, PositionReport};

/// Source key carrying the aircraft identifier.
const IDENTIFIER_KEY: &str = "hex";
/// Source key carrying the flight designator. The feed pads it with spaces.
const CALLSIGN_KEY: &str = "flight";
/// Source key carrying the epoch-seconds observation time.
const TIMESTAMP_KEY: &str = "now";

/// Parse `raw` as a JSON object and apply the field renames/conversions:
/// `flight` becomes a trimmed `callsign`, `now` becomes an absolute
/// `timestamp`, and every other key passes through unchanged.
///
/// Any failure drops the line; the caller logs and moves on.
pub fn normalize(raw: &str) -> Result<PositionReport, NormalizeError> {
    let value: Value =
        serde_json::from_str(raw).map_err(|e| NormalizeError::InvalidJson(e.to_string()))?;
    let Value::Object(source) = value else {
        return Err(NormalizeError::NotAnObject);
    };

    let mut hex = None;
    let mut callsign = None;
    let mut timestamp = None;
    let mut extra = Map::new();

    for (key, value) in source {
        match key.as_str() {
            IDENTIFIER_KEY => {
                if let Value::String(s) = value {
                    hex = Some(s);
                }
            }
            CALLSIGN_KEY => {
                if let Value::String(s) = &value {
                    let trimmed = s.trim();
                    if !trimmed.is_empty() {
                        callsign = Some(trimmed.to_string());
                    }
                }
            }
            TIMESTAMP_KEY => {
                let secs = value.as_f64().ok_or(NormalizeError::NonNumericTimestamp)?;
                timestamp = Some(epoch_to_datetime(secs)?);
            }
            _ => {
                extra.insert(key, value);
            }
        }
    }

    Ok(PositionReport {
        hex: hex.ok_or(NormalizeError::MissingIdentifier)?,
        callsign,
        timestamp: timestamp.ok_or(NormalizeError::MissingTimestamp)?,
        extra,
    })
}

/// Convert fractional epoch seconds to a UTC timestamp.
fn epoch_to_datetime(secs: f64) -> Result<DateTime<Utc>, NormalizeError> {
    if !secs.is_finite() {
        return Err(NormalizeError::TimestampOutOfRange(secs));
    }
    let whole = secs.trunc() as i64;
    let nanos = (secs.fract().abs() * 1_000_000_000.0) as u32;
    DateTime::from_timestamp(whole, nanos).ok_or(NormalizeError::TimestampOutOfRange(secs))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_full_report() {
        let raw = r#"{"hex":"a1b2c3","flight":"UAL123  ","now":1700000000,"lat":52.3,"lon":4.9,"alt_baro":36000}"#;
        let report = normalize(raw).unwrap();

        assert_eq!(report.hex, "a1b2c3");
        assert_eq!(report.callsign.as_deref(), Some("UAL123"));
        assert_eq!(report.timestamp.timestamp(), 1700000000);
        assert_eq!(report.extra.get("lat").and_then(|v| v.as_f64()), Some(52.3));
        assert_eq!(report.extra.get("alt_baro").and_then(|v| v.as_i64()), Some(36000));
    }

    #[test]
    fn test_callsign_is_trimmed() {
        let raw = r#"{"hex":"a1b2c3","flight":"  KLM87 ","now":1700000000}"#;
        let report = normalize(raw).unwrap();
        assert_eq!(report.callsign.as_deref(), Some("KLM87"));
    }

    #[test]
    fn test_blank_callsign_becomes_none() {
        let raw = r#"{"hex":"a1b2c3","flight":"        ","now":1700000000}"#;
        let report = normalize(raw).unwrap();
        assert!(report.callsign.is_none());
    }

    #[test]
    fn test_missing_callsign_is_fine() {
        let raw = r#"{"hex":"a1b2c3","now":1700000000}"#;
        let report = normalize(raw).unwrap();
        assert!(report.callsign.is_none());
    }

    #[test]
    fn test_fractional_epoch_seconds() {
        let raw = r#"{"hex":"a1b2c3","now":1700000000.5}"#;
        let report = normalize(raw).unwrap();
        assert_eq!(report.timestamp.timestamp(), 1700000000);
        assert_eq!(report.timestamp.timestamp_subsec_millis(), 500);
    }

    #[test]
    fn test_renamed_keys_do_not_leak_into_extra() {
        let raw = r#"{"hex":"a1b2c3","flight":"UAL123","now":1700000000,"track":270}"#;
        let report = normalize(raw).unwrap();
        assert!(report.extra.get("flight").is_none());
        assert!(report.extra.get("now").is_none());
        assert!(report.extra.get("hex").is_none());
        assert!(report.extra.get("track").is_some());
    }

    #[test]
    fn test_invalid_json_is_rejected() {
        let result = normalize("{not json");
        assert!(matches!(result, Err(NormalizeError::InvalidJson(_))));
    }

    #[test]
    fn test_non_object_is_rejected() {
        assert!(matches!(normalize("[1,2,3]"), Err(NormalizeError::NotAnObject)));
        assert!(matches!(normalize("42"), Err(NormalizeError::NotAnObject)));
    }

    #[test]
    fn test_missing_identifier_is_rejected() {
        let raw = r#"{"flight":"UAL123","now":1700000000}"#;
        assert!(matches!(normalize(raw), Err(NormalizeError::MissingIdentifier)));
    }

    #[test]
    fn test_missing_timestamp_is_rejected() {
        let raw = r#"{"hex":"a1b2c3","flight":"UAL123"}"#;
        assert!(matches!(normalize(raw), Err(NormalizeError::MissingTimestamp)));
    }

    #[test]
    fn test_non_numeric_timestamp_is_rejected() {
        let raw = r#"{"hex":"a1b2c3","now":"yesterday"}"#;
        assert!(matches!(normalize(raw), Err(NormalizeError::NonNumericTimestamp)));
    }

    #[test]
    fn test_serialized_report_uses_normalized_names() {
        let raw = r#"{"hex":"a1b2c3","flight":"UAL123 ","now":1700000000,"lat":52.3}"#;
        let report = normalize(raw).unwrap();
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["hex"], "a1b2c3");
        assert_eq!(json["callsign"], "UAL123");
        assert_eq!(json["lat"], 52.3);
        assert!(json.get("flight").is_none());
        assert!(json.get("now").is_none());
    }
}
