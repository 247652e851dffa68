//! Mongo store — live MongoDB-backed session store and error types.
//!
//! Document conversion lives here so the domain model stays BSON-free:
//! `report_document` / `session_document` translate the typed structs into
//! the persisted schema.

use bson::{doc, Bson, DateTime as BsonDateTime, Document};
use chrono::{DateTime, Utc};
use mongodb::{Client, Collection};
use std::pin::Pin;
use thiserror::Error;
use tracing::debug;

use crate::report::PositionReport;
use crate::store::ops::SessionStore;
use crate::store::session::{ActiveSession, FlightSession};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Store connection failed: {0}")]
    ConnectionFailed(String),
    #[error("Session not found: {0}")]
    SessionNotFound(String),
    #[error("Malformed session document: {0}")]
    MalformedDocument(String),
    #[error("Unstorable report value: {0}")]
    UnstorableValue(String),
    #[error("MongoDB error: {0}")]
    MongoError(#[from] mongodb::error::Error),
}

/// Session store backed by a MongoDB collection of flight documents.
#[derive(Debug, Clone)]
pub struct MongoSessionStore {
    flights: Collection<Document>,
}

impl MongoSessionStore {
    /// Build a store over `database`/`collection` at `url`.
    ///
    /// The driver connects lazily; a bad address surfaces on first use.
    pub async fn connect(url: &str, database: &str, collection: &str) -> Result<Self, StoreError> {
        let client = Client::with_uri_str(url)
            .await
            .map_err(|e| StoreError::ConnectionFailed(e.to_string()))?;
        let flights = client.database(database).collection::<Document>(collection);
        Ok(Self { flights })
    }

    /// The session with the greatest `adsb_data_stop` for `hex`, if any.
    pub async fn find_active_session(&self, hex: &str) -> Result<Option<ActiveSession>, StoreError> {
        let found = self
            .flights
            .find_one(doc! { "hex": hex })
            .sort(doc! { "adsb_data_stop": -1 })
            .projection(doc! { "flight_id": 1, "adsb_data_stop": 1 })
            .await?;

        found
            .map(|doc| {
                let flight_id = doc
                    .get_str("flight_id")
                    .map_err(|e| StoreError::MalformedDocument(e.to_string()))?
                    .to_string();
                let ended_at = doc
                    .get_datetime("adsb_data_stop")
                    .map_err(|e| StoreError::MalformedDocument(e.to_string()))?
                    .to_chrono();
                Ok(ActiveSession { flight_id, ended_at })
            })
            .transpose()
    }

    /// Push one report onto an existing session in a single update.
    pub async fn append_report(
        &self,
        flight_id: &str,
        report: &PositionReport,
        new_stop: DateTime<Utc>,
        callsign: Option<&str>,
    ) -> Result<(), StoreError> {
        let mut update = doc! {
            "$set": { "adsb_data_stop": BsonDateTime::from_chrono(new_stop) },
            "$inc": { "adsb_data_count": 1_i64 },
            "$push": { "adsb_data": report_document(report)? },
        };
        if let Some(callsign) = callsign.filter(|c| !c.is_empty()) {
            update.insert("$addToSet", doc! { "callsign": callsign });
        }

        let result = self
            .flights
            .update_one(doc! { "flight_id": flight_id }, update)
            .await?;
        if result.matched_count == 0 {
            return Err(StoreError::SessionNotFound(flight_id.to_string()));
        }
        debug!("Appended report to {}", flight_id);
        Ok(())
    }

    /// Insert a new session document.
    pub async fn create_session(&self, session: &FlightSession) -> Result<(), StoreError> {
        self.flights.insert_one(session_document(session)?).await?;
        debug!("Created session {}", session.flight_id);
        Ok(())
    }
}

impl SessionStore for MongoSessionStore {
    fn find_active_session<'a>(
        &'a self,
        hex: &'a str,
    ) -> Pin<Box<dyn std::future::Future<Output = Result<Option<ActiveSession>, StoreError>> + Send + 'a>>
    {
        Box::pin(self.find_active_session(hex))
    }

    fn append_report<'a>(
        &'a self,
        flight_id: &'a str,
        report: &'a PositionReport,
        new_stop: DateTime<Utc>,
        callsign: Option<&'a str>,
    ) -> Pin<Box<dyn std::future::Future<Output = Result<(), StoreError>> + Send + 'a>> {
        Box::pin(self.append_report(flight_id, report, new_stop, callsign))
    }

    fn create_session<'a>(
        &'a self,
        session: &'a FlightSession,
    ) -> Pin<Box<dyn std::future::Future<Output = Result<(), StoreError>> + Send + 'a>> {
        Box::pin(self.create_session(session))
    }
}

/// One report as it is embedded in `adsb_data`: normalized names, BSON
/// datetime, passthrough fields verbatim. `callsign` is omitted when absent
/// so appends never reset anything.
fn report_document(report: &PositionReport) -> Result<Document, StoreError> {
    let mut doc = doc! {
        "hex": &report.hex,
        "timestamp": BsonDateTime::from_chrono(report.timestamp),
    };
    if let Some(callsign) = &report.callsign {
        doc.insert("callsign", callsign);
    }
    for (key, value) in &report.extra {
        let bson =
            Bson::try_from(value.clone()).map_err(|e| StoreError::UnstorableValue(e.to_string()))?;
        doc.insert(key, bson);
    }
    Ok(doc)
}

/// A full session in the persisted schema.
fn session_document(session: &FlightSession) -> Result<Document, StoreError> {
    let reports = session
        .adsb_data
        .iter()
        .map(report_document)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(doc! {
        "flight_id": &session.flight_id,
        "hex": &session.hex,
        "adsb_data_start": BsonDateTime::from_chrono(session.adsb_data_start),
        "adsb_data_stop": BsonDateTime::from_chrono(session.adsb_data_stop),
        "adsb_data": reports,
        "adsb_data_count": session.adsb_data_count,
        "callsign": session.callsign.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Map};

    fn make_report(callsign: Option<&str>) -> PositionReport {
        let mut extra = Map::new();
        extra.insert("lat".to_string(), json!(52.3));
        extra.insert("lon".to_string(), json!(4.9));
        extra.insert("alt_baro".to_string(), json!(36000));
        PositionReport {
            hex: "a1b2c3".to_string(),
            callsign: callsign.map(str::to_string),
            timestamp: DateTime::from_timestamp(1700000000, 0).unwrap(),
            extra,
        }
    }

    #[test]
    fn test_report_document_carries_passthrough_fields() {
        let doc = report_document(&make_report(Some("UAL123"))).unwrap();

        assert_eq!(doc.get_str("hex").unwrap(), "a1b2c3");
        assert_eq!(doc.get_str("callsign").unwrap(), "UAL123");
        assert_eq!(doc.get_f64("lat").unwrap(), 52.3);
        // Integer width after JSON-to-BSON conversion is an implementation
        // detail; only the value matters.
        let alt = doc.get("alt_baro").unwrap();
        assert_eq!(alt.as_i32().map(i64::from).or_else(|| alt.as_i64()), Some(36000));
        assert_eq!(
            doc.get_datetime("timestamp").unwrap().timestamp_millis(),
            1700000000000
        );
    }

    #[test]
    fn test_report_document_omits_missing_callsign() {
        let doc = report_document(&make_report(None)).unwrap();
        assert!(!doc.contains_key("callsign"));
    }

    #[test]
    fn test_session_document_matches_schema() {
        let session = FlightSession::open(make_report(Some("UAL123")));
        let doc = session_document(&session).unwrap();

        assert_eq!(doc.get_str("flight_id").unwrap(), "a1b2c3_231114_2213");
        assert_eq!(doc.get_str("hex").unwrap(), "a1b2c3");
        assert_eq!(doc.get_i64("adsb_data_count").unwrap(), 1);
        assert_eq!(doc.get_array("adsb_data").unwrap().len(), 1);
        let callsigns = doc.get_array("callsign").unwrap();
        assert_eq!(callsigns.len(), 1);
        assert_eq!(
            doc.get_datetime("adsb_data_start").unwrap(),
            doc.get_datetime("adsb_data_stop").unwrap()
        );
    }

    #[test]
    fn test_session_document_empty_callsign_array_when_unknown() {
        let session = FlightSession::open(make_report(None));
        let doc = session_document(&session).unwrap();
        assert!(doc.get_array("callsign").unwrap().is_empty());
    }
}
