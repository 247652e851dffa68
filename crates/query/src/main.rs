//! Query CLI — inspect recorded flight sessions.

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use query::fence::GeoFence;
use query::flights::FlightQueries;

#[derive(Debug, Parser)]
#[command(name = "query", about = "Inspect recorded flight sessions", long_about = None)]
struct Args {
    /// MongoDB connection string.
    #[arg(long, env = "MONGODB_URL", default_value = "mongodb://127.0.0.1:27017")]
    store_url: String,

    #[arg(long, default_value = "adsb")]
    database: String,

    #[arg(long, default_value = "flights")]
    collection: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the most recent session document
    Latest,
    /// Print the last N sessions without their report arrays
    Recent {
        #[arg(long, default_value = "10")]
        count: i64,
    },
    /// Print sessions with at least one report inside a bounding box.
    /// Corners may be given in any order; each axis is sorted on its own.
    Fence {
        #[arg(long)]
        lat1: f64,
        #[arg(long)]
        lat2: f64,
        #[arg(long)]
        lon1: f64,
        #[arg(long)]
        lon2: f64,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "query=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    let queries =
        FlightQueries::connect(&args.store_url, &args.database, &args.collection).await?;

    match args.command {
        Command::Latest => match queries.latest_session().await? {
            Some(doc) => println!("{}", serde_json::to_string_pretty(&doc)?),
            None => eprintln!("No sessions recorded yet"),
        },
        Command::Recent { count } => {
            let sessions = queries.recent_sessions(count).await?;
            println!("{}", serde_json::to_string_pretty(&sessions)?);
        }
        Command::Fence { lat1, lat2, lon1, lon2 } => {
            let fence = GeoFence::new(lat1, lat2, lon1, lon2);
            let sessions = queries.sessions_entering_fence(&fence).await?;
            println!("{}", serde_json::to_string_pretty(&sessions)?);
        }
    }

    Ok(())
}
