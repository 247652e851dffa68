//! Runtime module — daemon lifecycle: boot, ingest loop, shutdown.

pub mod boot;
pub mod ingest;
pub mod stop;
