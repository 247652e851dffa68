//! Model — IngestConfig.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    /// Receiver JSON-port address (`host:port` or `tcp://host:port`).
    pub feed_url: String,
    /// MongoDB connection string.
    pub store_url: String,
    pub store_database: String,
    pub store_collection: String,
    /// Seconds to wait between reconnect attempts to the feed.
    pub reconnect_delay_secs: u64,
    /// Attempts per report before a store failure counts as permanent loss.
    pub store_attempts: u32,
    /// Maximum inter-report gap in minutes before a new session starts.
    pub session_gap_minutes: i64,
    /// Log at debug level.
    pub verbose: bool,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            feed_url: "127.0.0.1:30047".to_string(),
            store_url: "mongodb://127.0.0.1:27017".to_string(),
            store_database: "adsb".to_string(),
            store_collection: "flights".to_string(),
            reconnect_delay_secs: 5,
            store_attempts: 3,
            session_gap_minutes: 10,
            verbose: false,
        }
    }
}

impl IngestConfig {
    /// Validate configuration values; no I/O.
    pub fn validate(&self) -> Result<(), String> {
        if self.feed_url.is_empty() {
            return Err("feed_url must not be empty".to_string());
        }
        if self.store_url.is_empty() {
            return Err("store_url must not be empty".to_string());
        }
        if self.store_database.is_empty() {
            return Err("store_database must not be empty".to_string());
        }
        if self.store_collection.is_empty() {
            return Err("store_collection must not be empty".to_string());
        }
        if self.store_attempts == 0 {
            return Err("store_attempts must be > 0".to_string());
        }
        if self.session_gap_minutes <= 0 {
            return Err("session_gap_minutes must be > 0".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── Defaults ────────────────────────────────────────────────

    #[test]
    fn test_default_endpoints() {
        let cfg = IngestConfig::default();
        assert_eq!(cfg.feed_url, "127.0.0.1:30047");
        assert_eq!(cfg.store_url, "mongodb://127.0.0.1:27017");
        assert_eq!(cfg.store_database, "adsb");
        assert_eq!(cfg.store_collection, "flights");
    }

    #[test]
    fn test_default_tuning() {
        let cfg = IngestConfig::default();
        assert_eq!(cfg.reconnect_delay_secs, 5);
        assert_eq!(cfg.store_attempts, 3);
        assert_eq!(cfg.session_gap_minutes, 10);
        assert!(!cfg.verbose);
    }

    // ── Validation ──────────────────────────────────────────────

    #[test]
    fn test_validate_default_passes() {
        assert!(IngestConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validate_empty_feed_url() {
        let cfg = IngestConfig { feed_url: String::new(), ..IngestConfig::default() };
        let err = cfg.validate().unwrap_err();
        assert!(err.contains("feed_url"));
    }

    #[test]
    fn test_validate_empty_store_url() {
        let cfg = IngestConfig { store_url: String::new(), ..IngestConfig::default() };
        assert!(cfg.validate().unwrap_err().contains("store_url"));
    }

    #[test]
    fn test_validate_zero_store_attempts() {
        let cfg = IngestConfig { store_attempts: 0, ..IngestConfig::default() };
        assert!(cfg.validate().unwrap_err().contains("store_attempts"));
    }

    #[test]
    fn test_validate_non_positive_gap() {
        let cfg = IngestConfig { session_gap_minutes: 0, ..IngestConfig::default() };
        assert!(cfg.validate().unwrap_err().contains("session_gap_minutes"));
    }

    // ── Serialization ───────────────────────────────────────────

    #[test]
    fn test_toml_round_trip() {
        let cfg = IngestConfig::default();
        let toml_str = toml::to_string(&cfg).expect("Should serialize to TOML");
        let back: IngestConfig = toml::from_str(&toml_str).expect("Should deserialize from TOML");
        assert_eq!(back.feed_url, cfg.feed_url);
        assert_eq!(back.session_gap_minutes, cfg.session_gap_minutes);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let cfg: IngestConfig = toml::from_str(r#"feed_url = "10.0.0.5:30047""#).unwrap();
        assert_eq!(cfg.feed_url, "10.0.0.5:30047");
        assert_eq!(cfg.store_database, "adsb"); // default
        assert_eq!(cfg.reconnect_delay_secs, 5); // default
    }
}
