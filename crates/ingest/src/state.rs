//! Ingest state — IngestState struct, shared state type alias.

use std::sync::Arc;

use crate::conf::IngestConfig;
use crate::metrics::IngestMetrics;
use crate::stitch::Stitcher;
use crate::store::SessionStore;

pub struct IngestState {
    pub store: Arc<dyn SessionStore>,
    pub config: IngestConfig,
    pub metrics: Arc<IngestMetrics>,
    pub stitcher: Stitcher,
}

impl IngestState {
    pub fn new(store: Arc<dyn SessionStore>, config: IngestConfig) -> Self {
        let stitcher = Stitcher::new(Arc::clone(&store), config.session_gap_minutes);
        Self {
            store,
            config,
            metrics: Arc::new(IngestMetrics::new()),
            stitcher,
        }
    }
}

pub type SharedState = Arc<IngestState>;
