//! Boot — logging init, config load, store connection, state creation.

use std::sync::Arc;

use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::conf::{Cli, IngestConfig};
use crate::state::{IngestState, SharedState};
use crate::store::MongoSessionStore;

/// Initialise the tracing / logging subsystem.
pub fn init_logging(verbose: bool) {
    let default_directive = if verbose { "ingest=debug" } else { "ingest=info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_directive.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Load config, open the session store, and build shared state.
///
/// Returns `(SharedState, IngestConfig)` on success.
pub async fn boot(cli: &Cli) -> Result<(SharedState, IngestConfig), Box<dyn std::error::Error>> {
    info!("Starting ADS-B ingest daemon v0.0.1");

    let config = IngestConfig::load(cli)?;
    config.validate()?;
    info!("Loaded configuration: feed_url={}", config.feed_url);

    info!(
        "Connecting to MongoDB ({} / {})",
        config.store_database, config.store_collection
    );
    let store = MongoSessionStore::connect(
        &config.store_url,
        &config.store_database,
        &config.store_collection,
    )
    .await
    .map_err(|e| {
        error!("Failed to open the session store: {}", e);
        e
    })?;
    info!("Session store ready");

    let state = Arc::new(IngestState::new(Arc::new(store), config.clone()));
    info!("Initialized shared application state");

    Ok((state, config))
}
