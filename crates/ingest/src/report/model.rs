//! Model — normalized position report and normalization errors.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error("Invalid JSON: {0}")]
    InvalidJson(String),
    #[error("Payload is not a JSON object")]
    NotAnObject,
    #[error("Missing aircraft identifier field `hex`")]
    MissingIdentifier,
    #[error("Missing timestamp field `now`")]
    MissingTimestamp,
    #[error("Timestamp field `now` is not numeric")]
    NonNumericTimestamp,
    #[error("Timestamp out of range: {0}")]
    TimestampOutOfRange(f64),
}

/// One normalized telemetry sample.
#[derive(Debug, Clone, Serialize)]
pub struct PositionReport {
    /// ICAO24 hardware identifier; stable across a flight.
    pub hex: String,
    /// Flight designator, trimmed of the feed's padding.
    /// Values that are empty after trimming become `None`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub callsign: Option<String>,
    /// Absolute observation time derived from the feed's epoch seconds.
    pub timestamp: DateTime<Utc>,
    /// Passthrough telemetry (position, altitude, speed, ...), kept verbatim
    /// under the original key names. Opaque to the stitcher.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
