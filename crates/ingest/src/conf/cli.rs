//! Cli — command-line flags for the ingest daemon.

use clap::Parser;

/// Stitch receiver position reports into flight sessions in MongoDB.
#[derive(Debug, Parser)]
#[command(name = "ingest", about = "ADS-B flight session recorder", long_about = None)]
pub struct Cli {
    /// Receiver JSON-port address. Falls back to READSB_JSONPORT_URL.
    #[arg(long)]
    pub feed_url: Option<String>,

    /// MongoDB connection string. Falls back to MONGODB_URL.
    #[arg(long)]
    pub store_url: Option<String>,

    /// Log at debug level. Falls back to the VERBOSE environment toggle.
    #[arg(short, long)]
    pub verbose: bool,
}
