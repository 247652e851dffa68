//! Session — flight session document model and id derivation.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::report::PositionReport;

/// Minute-granularity stamp embedded in `flight_id`.
const FLIGHT_ID_MINUTE_FORMAT: &str = "%y%m%d_%H%M";

/// One persisted flight session: a contiguous run of reports for a single
/// airframe, bounded by the maximum inter-report gap.
///
/// Field names match the persisted document schema.
#[derive(Debug, Clone, Serialize)]
pub struct FlightSession {
    pub flight_id: String,
    pub hex: String,
    pub adsb_data_start: DateTime<Utc>,
    pub adsb_data_stop: DateTime<Utc>,
    pub adsb_data: Vec<PositionReport>,
    pub adsb_data_count: i64,
    /// Distinct non-empty callsigns seen during the session.
    pub callsign: Vec<String>,
}

impl FlightSession {
    /// Build the session opened by a first report. `flight_id` is assigned
    /// here and never changes afterwards.
    pub fn open(report: PositionReport) -> Self {
        let flight_id = derive_flight_id(&report.hex, report.timestamp);
        let callsign = report.callsign.iter().cloned().collect();
        Self {
            flight_id,
            hex: report.hex.clone(),
            adsb_data_start: report.timestamp,
            adsb_data_stop: report.timestamp,
            adsb_data_count: 1,
            callsign,
            adsb_data: vec![report],
        }
    }
}

/// Derive a session id from the identifier and the minute-truncated start
/// time. A pure function: equal inputs always yield equal ids.
pub fn derive_flight_id(hex: &str, started_at: DateTime<Utc>) -> String {
    format!("{}_{}", hex, started_at.format(FLIGHT_ID_MINUTE_FORMAT))
}

/// Lookup projection for the most recently active session of an identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveSession {
    pub flight_id: String,
    pub ended_at: DateTime<Utc>,
}
