//! Store module — session documents, the store trait, live and fake adapters.

pub mod fake;
pub mod mongo;
pub mod ops;
pub mod session;

pub use mongo::{MongoSessionStore, StoreError};
pub use ops::SessionStore;
pub use session::{derive_flight_id, ActiveSession, FlightSession};
