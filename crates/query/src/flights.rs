//! Flights — read-only queries over the flights collection.
//!
//! Everything here reads the schema the ingest daemon writes; nothing is
//! mutated. The queries assume only the collection's default `_id` index
//! plus the deployment's indexes on `hex` and the embedded report
//! timestamps.

use bson::{doc, Document};
use futures_util::TryStreamExt;
use mongodb::{Client, Collection};
use thiserror::Error;

use crate::fence::GeoFence;
use crate::summary::{summary_projection, SessionSummary};

#[derive(Debug, Error)]
pub enum QueryError {
    #[error("Store connection failed: {0}")]
    ConnectionFailed(String),
    #[error("MongoDB error: {0}")]
    MongoError(#[from] mongodb::error::Error),
    #[error("Malformed session document: {0}")]
    MalformedDocument(#[from] bson::de::Error),
}

/// Read-only handle on the flight session collection.
pub struct FlightQueries {
    flights: Collection<Document>,
}

impl FlightQueries {
    pub async fn connect(url: &str, database: &str, collection: &str) -> Result<Self, QueryError> {
        let client = Client::with_uri_str(url)
            .await
            .map_err(|e| QueryError::ConnectionFailed(e.to_string()))?;
        let flights = client.database(database).collection::<Document>(collection);
        Ok(Self { flights })
    }

    /// The most recently inserted session document, raw.
    pub async fn latest_session(&self) -> Result<Option<Document>, QueryError> {
        Ok(self.flights.find_one(doc! {}).sort(doc! { "_id": -1 }).await?)
    }

    /// The last `n` sessions, newest first, without their report arrays.
    pub async fn recent_sessions(&self, n: i64) -> Result<Vec<SessionSummary>, QueryError> {
        let cursor = self
            .flights
            .find(doc! {})
            .sort(doc! { "_id": -1 })
            .limit(n)
            .projection(summary_projection())
            .await?;
        collect_summaries(cursor).await
    }

    /// Sessions with at least one report inside `fence`.
    pub async fn sessions_entering_fence(
        &self,
        fence: &GeoFence,
    ) -> Result<Vec<SessionSummary>, QueryError> {
        let cursor = self
            .flights
            .find(fence_filter(fence))
            .projection(summary_projection())
            .await?;
        collect_summaries(cursor).await
    }
}

async fn collect_summaries(
    mut cursor: mongodb::Cursor<Document>,
) -> Result<Vec<SessionSummary>, QueryError> {
    let mut sessions = Vec::new();
    while let Some(doc) = cursor.try_next().await? {
        sessions.push(bson::from_document(doc)?);
    }
    Ok(sessions)
}

/// `$elemMatch` filter selecting sessions with a report inside the fence.
/// Both bounds of each axis come pre-ordered from [`GeoFence`].
pub fn fence_filter(fence: &GeoFence) -> Document {
    doc! {
        "adsb_data": {
            "$elemMatch": {
                "lat": { "$gte": fence.lat_min, "$lte": fence.lat_max },
                "lon": { "$gte": fence.lon_min, "$lte": fence.lon_max },
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fence_filter_shape() {
        let fence = GeoFence::new(54.0, 50.0, 3.0, 7.0);
        let filter = fence_filter(&fence);

        let elem = filter
            .get_document("adsb_data")
            .unwrap()
            .get_document("$elemMatch")
            .unwrap();
        let lat = elem.get_document("lat").unwrap();
        assert_eq!(lat.get_f64("$gte").unwrap(), 50.0);
        assert_eq!(lat.get_f64("$lte").unwrap(), 54.0);
        let lon = elem.get_document("lon").unwrap();
        assert_eq!(lon.get_f64("$gte").unwrap(), 3.0);
        assert_eq!(lon.get_f64("$lte").unwrap(), 7.0);
    }
}
