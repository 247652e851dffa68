//! Engine — decides whether a report extends a session or starts a new one.

use std::sync::Arc;

use chrono::Duration;
use dashmap::DashMap;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::report::PositionReport;
use crate::store::{FlightSession, SessionStore, StoreError};

/// Outcome of stitching one report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StitchOutcome {
    /// The report extended the identifier's active session.
    Attached { flight_id: String },
    /// No session qualified; a new one was created.
    Created { flight_id: String },
}

impl StitchOutcome {
    pub fn flight_id(&self) -> &str {
        match self {
            StitchOutcome::Attached { flight_id } | StitchOutcome::Created { flight_id } => flight_id,
        }
    }
}

/// The session stitcher: one read-decide-write sequence per report.
pub struct Stitcher {
    store: Arc<dyn SessionStore>,
    /// Per-identifier locks serializing the read-decide-write sequence.
    /// The table grows with the observed fleet; entries are a pointer plus
    /// a mutex each, so it stays small even across busy airspace.
    locks: DashMap<String, Arc<Mutex<()>>>,
    /// Maximum inter-report gap before a new session starts.
    max_gap: Duration,
}

impl Stitcher {
    pub fn new(store: Arc<dyn SessionStore>, max_gap_minutes: i64) -> Self {
        Self {
            store,
            locks: DashMap::new(),
            max_gap: Duration::minutes(max_gap_minutes),
        }
    }

    /// Attach `report` to the active session for its identifier if the gap
    /// rule allows it, otherwise create a new session.
    ///
    /// The whole sequence holds the identifier's lock: two concurrent calls
    /// for the same `hex` can never both observe a stale `adsb_data_stop`
    /// and double-create. Reports for different identifiers proceed in
    /// parallel.
    pub async fn stitch(&self, report: &PositionReport) -> Result<StitchOutcome, StoreError> {
        let lock = self.identifier_lock(&report.hex);
        let _guard = lock.lock().await;

        if let Some(active) = self.store.find_active_session(&report.hex).await? {
            if report.timestamp - active.ended_at <= self.max_gap {
                // Out-of-order reports must not rewind the session stop.
                let new_stop = report.timestamp.max(active.ended_at);
                self.store
                    .append_report(&active.flight_id, report, new_stop, report.callsign.as_deref())
                    .await?;
                debug!("Attached report for {} to {}", report.hex, active.flight_id);
                return Ok(StitchOutcome::Attached { flight_id: active.flight_id });
            }
        }

        let session = FlightSession::open(report.clone());
        let flight_id = session.flight_id.clone();
        info!("No recent session for {}; creating {}", report.hex, flight_id);
        self.store.create_session(&session).await?;
        Ok(StitchOutcome::Created { flight_id })
    }

    fn identifier_lock(&self, hex: &str) -> Arc<Mutex<()>> {
        self.locks
            .entry(hex.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}
