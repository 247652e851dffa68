//! Fake — test double for the session store.
//!
//! Provides a deterministic [`FakeSessionStore`] that implements
//! [`SessionStore`] using in-memory state. Useful for unit-testing the
//! stitcher and ingestion loop without a running MongoDB. Failures can be
//! injected to exercise the retry path.

use std::pin::Pin;

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use crate::report::PositionReport;
use crate::store::mongo::StoreError;
use crate::store::ops::SessionStore;
use crate::store::session::{ActiveSession, FlightSession};

/// Mutable inner state protected by a mutex.
#[derive(Default)]
struct Inner {
    sessions: Vec<FlightSession>,
    /// Remaining injected failures; each store call consumes one.
    fail_next: u32,
}

/// An in-memory session store for deterministic testing.
pub struct FakeSessionStore {
    inner: Mutex<Inner>,
}

impl FakeSessionStore {
    /// Create an empty fake store.
    pub fn new() -> Self {
        Self { inner: Mutex::new(Inner::default()) }
    }

    /// Seed a session into the fake store.
    pub async fn add_session(&self, session: FlightSession) {
        self.inner.lock().await.sessions.push(session);
    }

    /// Snapshot of every stored session.
    pub async fn sessions(&self) -> Vec<FlightSession> {
        self.inner.lock().await.sessions.clone()
    }

    /// Make the next `count` store calls fail with a connection error.
    pub async fn fail_next(&self, count: u32) {
        self.inner.lock().await.fail_next = count;
    }

    fn consume_failure(inner: &mut Inner) -> Result<(), StoreError> {
        if inner.fail_next > 0 {
            inner.fail_next -= 1;
            return Err(StoreError::ConnectionFailed("injected failure".to_string()));
        }
        Ok(())
    }
}

impl Default for FakeSessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore for FakeSessionStore {
    fn find_active_session<'a>(
        &'a self,
        hex: &'a str,
    ) -> Pin<Box<dyn std::future::Future<Output = Result<Option<ActiveSession>, StoreError>> + Send + 'a>>
    {
        Box::pin(async move {
            let mut inner = self.inner.lock().await;
            Self::consume_failure(&mut inner)?;
            Ok(inner
                .sessions
                .iter()
                .filter(|s| s.hex == hex)
                .max_by_key(|s| s.adsb_data_stop)
                .map(|s| ActiveSession {
                    flight_id: s.flight_id.clone(),
                    ended_at: s.adsb_data_stop,
                }))
        })
    }

    fn append_report<'a>(
        &'a self,
        flight_id: &'a str,
        report: &'a PositionReport,
        new_stop: DateTime<Utc>,
        callsign: Option<&'a str>,
    ) -> Pin<Box<dyn std::future::Future<Output = Result<(), StoreError>> + Send + 'a>> {
        Box::pin(async move {
            let mut inner = self.inner.lock().await;
            Self::consume_failure(&mut inner)?;
            let session = inner
                .sessions
                .iter_mut()
                .find(|s| s.flight_id == flight_id)
                .ok_or_else(|| StoreError::SessionNotFound(flight_id.to_string()))?;

            session.adsb_data.push(report.clone());
            session.adsb_data_count += 1;
            session.adsb_data_stop = new_stop;
            if let Some(callsign) = callsign.filter(|c| !c.is_empty()) {
                if !session.callsign.iter().any(|c| c == callsign) {
                    session.callsign.push(callsign.to_string());
                }
            }
            Ok(())
        })
    }

    fn create_session<'a>(
        &'a self,
        session: &'a FlightSession,
    ) -> Pin<Box<dyn std::future::Future<Output = Result<(), StoreError>> + Send + 'a>> {
        Box::pin(async move {
            let mut inner = self.inner.lock().await;
            Self::consume_failure(&mut inner)?;
            inner.sessions.push(session.clone());
            Ok(())
        })
    }
}

// ── Tests ───────────────────────────────────────────────────────
