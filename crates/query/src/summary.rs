//! Summary — session projection without the raw report array.

use bson::serde_helpers::chrono_datetime_as_bson_datetime;
use bson::{doc, Document};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A flight session with `adsb_data` excluded.
///
/// Deserializes from the persisted BSON documents; serializes with
/// ISO-8601 timestamps for CLI output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSummary {
    pub flight_id: String,
    pub hex: String,
    #[serde(deserialize_with = "chrono_datetime_as_bson_datetime::deserialize")]
    pub adsb_data_start: DateTime<Utc>,
    #[serde(deserialize_with = "chrono_datetime_as_bson_datetime::deserialize")]
    pub adsb_data_stop: DateTime<Utc>,
    pub adsb_data_count: i64,
    #[serde(default)]
    pub callsign: Vec<String>,
}

/// Projection shared by the summary queries: everything but the reports.
pub fn summary_projection() -> Document {
    doc! {
        "_id": 0,
        "flight_id": 1,
        "hex": 1,
        "adsb_data_start": 1,
        "adsb_data_stop": 1,
        "adsb_data_count": 1,
        "callsign": 1,
    }
}
