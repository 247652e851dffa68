// Read-only reporting over persisted flight sessions.

pub mod fence;
pub mod flights;
pub mod summary;
