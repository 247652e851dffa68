//! Ingest — the main read → normalize → stitch loop.
//!
//! Two recovery loops keep the pipeline alive indefinitely: the outer loop
//! reconnects on any socket failure after the policy's delay, and the
//! per-line path drops malformed or unstorable messages without stopping.

use std::time::{Duration, Instant};

use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::conf::IngestConfig;
use crate::feed::{FeedReader, ReconnectPolicy};
use crate::runtime::stop;
use crate::state::SharedState;
use crate::stitch::StitchOutcome;

/// Drive the pipeline until a shutdown signal arrives.
pub async fn ingest(state: SharedState, config: IngestConfig) -> Result<(), Box<dyn std::error::Error>> {
    let reader = FeedReader::new(&config.feed_url)?;
    let policy = ReconnectPolicy::fixed(Duration::from_secs(config.reconnect_delay_secs));
    let token = stop::shutdown_token();
    run(state, reader, policy, token).await;
    Ok(())
}

/// Reconnect-forever loop, parameterized so tests can drive it against a
/// loopback listener with a short delay and an explicit token.
pub async fn run(
    state: SharedState,
    reader: FeedReader,
    policy: ReconnectPolicy,
    token: CancellationToken,
) {
    let mut attempt: u64 = 0;
    loop {
        let connected = tokio::select! {
            _ = token.cancelled() => break,
            connected = reader.connect() => connected,
        };

        match connected {
            Ok(mut lines) => {
                attempt = 0;
                // Deliver lines in arrival order until EOF or a read error.
                loop {
                    let line = tokio::select! {
                        _ = token.cancelled() => {
                            info!("Shutdown requested; closing feed connection");
                            return;
                        }
                        line = lines.next_line() => line,
                    };
                    match line {
                        Ok(Some(line)) => process_line(&state, &line).await,
                        Ok(None) => {
                            warn!("Feed closed the connection");
                            state.metrics.record_feed_error("feed closed the connection".to_string());
                            break;
                        }
                        Err(e) => {
                            warn!("Feed read failed: {}", e);
                            state.metrics.record_feed_error(e.to_string());
                            break;
                        }
                    }
                }
            }
            Err(e) => {
                warn!("Feed connection failed: {}", e);
                state.metrics.record_feed_error(e.to_string());
            }
        }

        state.metrics.record_reconnect();
        let delay = policy.delay_for(attempt);
        attempt = attempt.saturating_add(1);
        debug!("Reconnecting to feed in {:?}", delay);
        tokio::select! {
            _ = token.cancelled() => break,
            _ = tokio::time::sleep(delay) => {}
        }
    }
    info!("Ingestion loop stopped");
}

/// Handle one raw feed line: normalize, stitch, account.
async fn process_line(state: &SharedState, raw: &str) {
    state.metrics.record_line(raw);
    let started = Instant::now();

    let report = match crate::report::normalize(raw) {
        Ok(report) => report,
        Err(e) => {
            warn!("Dropping malformed line: {}", e);
            state.metrics.record_normalize_error(e.to_string());
            return;
        }
    };

    // Store failures are retried a bounded number of times; after that the
    // single report is lost and the loss is logged.
    let attempts = state.config.store_attempts.max(1);
    for attempt in 1..=attempts {
        match state.stitcher.stitch(&report).await {
            Ok(outcome) => {
                match &outcome {
                    StitchOutcome::Attached { flight_id } => {
                        debug!("Attached report for {} to {}", report.hex, flight_id);
                        state.metrics.record_attach();
                    }
                    StitchOutcome::Created { flight_id } => {
                        debug!("Opened session {}", flight_id);
                        state.metrics.record_create();
                    }
                }
                state.metrics.mark_processed();
                break;
            }
            Err(e) if attempt < attempts => {
                warn!("Store operation failed (attempt {}/{}): {}", attempt, attempts, e);
            }
            Err(e) => {
                error!(
                    "Dropping report for {} after {} attempts: {}",
                    report.hex, attempts, e
                );
                state.metrics.record_store_error(e.to_string());
            }
        }
    }

    debug!("Processed line in {:.1} ms", started.elapsed().as_secs_f64() * 1000.0);
}
