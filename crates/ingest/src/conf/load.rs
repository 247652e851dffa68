//! Load — config loading from file, environment variables, and CLI flags.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use super::cli::Cli;
use super::model::IngestConfig;

impl IngestConfig {
    /// Load configuration.
    /// Priority: CLI flags > Environment Variables > Config File > Defaults
    pub fn load(cli: &Cli) -> Result<Self, Box<dyn std::error::Error>> {
        let config_path = std::env::var("INGEST_CONFIG_FILE")
            .unwrap_or_else(|_| "/etc/adsb/ingest.toml".to_string());

        let mut config = if Path::new(&config_path).exists() {
            tracing::info!("Loading configuration from: {}", config_path);
            Self::from_file(&config_path)?
        } else {
            tracing::info!("Config file not found at {}, using environment variables", config_path);
            Self::from_env()
        };

        // Environment variables override file config for the endpoints.
        if let Ok(feed) = std::env::var("READSB_JSONPORT_URL") {
            config.feed_url = feed;
        }
        if let Ok(store) = std::env::var("MONGODB_URL") {
            config.store_url = store;
        }
        if verbose_from_env() {
            config.verbose = true;
        }

        // CLI flags override everything.
        if let Some(feed) = &cli.feed_url {
            config.feed_url = feed.clone();
        }
        if let Some(store) = &cli.store_url {
            config.store_url = store.clone();
        }
        if cli.verbose {
            config.verbose = true;
        }

        Ok(config)
    }

    /// Load configuration from a TOML file.
    pub fn from_file(path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        let config: IngestConfig = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load configuration from environment variables with sensible defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            feed_url: std::env::var("READSB_JSONPORT_URL").unwrap_or(defaults.feed_url),
            store_url: std::env::var("MONGODB_URL").unwrap_or(defaults.store_url),
            store_database: std::env::var("INGEST_DATABASE").unwrap_or(defaults.store_database),
            store_collection: std::env::var("INGEST_COLLECTION")
                .unwrap_or(defaults.store_collection),
            reconnect_delay_secs: std::env::var("INGEST_RECONNECT_DELAY_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.reconnect_delay_secs),
            store_attempts: std::env::var("INGEST_STORE_ATTEMPTS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.store_attempts),
            session_gap_minutes: std::env::var("INGEST_SESSION_GAP_MINUTES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.session_gap_minutes),
            verbose: verbose_from_env(),
        }
    }
}

/// The VERBOSE toggle counts as set for any non-empty value except the
/// usual falsy spellings.
pub fn verbose_from_env() -> bool {
    match std::env::var("VERBOSE") {
        Ok(value) => {
            let value = value.trim();
            !value.is_empty() && value != "0" && !value.eq_ignore_ascii_case("false")
        }
        Err(_) => false,
    }
}
