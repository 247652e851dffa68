//! Store trait — abstract interface over the session document store.
//!
//! The stitcher and ingestion loop access persistence through this trait.
//! `mongo.rs` provides the real MongoDB-backed implementation.
//! `fake.rs` provides a test double.

use std::pin::Pin;

use chrono::{DateTime, Utc};

use crate::report::PositionReport;
use crate::store::mongo::StoreError;
use crate::store::session::{ActiveSession, FlightSession};

/// Async interface over the flight session collection.
///
/// Object-safe thanks to `Pin<Box<…>>` returns. Implementations must be
/// `Send + Sync` so they can live inside `Arc<IngestState>`, and must read
/// the global session set rather than a local cache so that concurrent
/// stitchers observe consistent state.
pub trait SessionStore: Send + Sync {
    /// Return the session with the greatest `adsb_data_stop` for `hex`,
    /// or `None` if the identifier has never been seen.
    fn find_active_session<'a>(
        &'a self,
        hex: &'a str,
    ) -> Pin<Box<dyn std::future::Future<Output = Result<Option<ActiveSession>, StoreError>> + Send + 'a>>;

    /// Append `report` to an existing session: push it onto `adsb_data`,
    /// increment `adsb_data_count`, set `adsb_data_stop` to `new_stop`, and
    /// add `callsign` to the callsign set when present and non-empty.
    fn append_report<'a>(
        &'a self,
        flight_id: &'a str,
        report: &'a PositionReport,
        new_stop: DateTime<Utc>,
        callsign: Option<&'a str>,
    ) -> Pin<Box<dyn std::future::Future<Output = Result<(), StoreError>> + Send + 'a>>;

    /// Insert a fully-populated new session document.
    fn create_session<'a>(
        &'a self,
        session: &'a FlightSession,
    ) -> Pin<Box<dyn std::future::Future<Output = Result<(), StoreError>> + Send + 'a>>;
}
