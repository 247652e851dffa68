//! Ingest metrics — process-wide counters and the recent-error ring.
//!
//! All counters use relaxed atomics; the ring and the last-line cell sit
//! behind short-critical-section mutexes. `snapshot()` is the read surface
//! for health reporting. There is no reset operation.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::Serialize;

/// Capacity of the recent-error ring.
pub const ERROR_RING_CAPACITY: usize = 10;

/// Fixed-capacity circular buffer of the most recent error messages.
///
/// A push beyond capacity overwrites the oldest entry in place; the buffer
/// never reallocates once full.
#[derive(Debug)]
pub struct ErrorRing {
    slots: Vec<String>,
    /// Index of the oldest entry once the buffer has wrapped.
    head: usize,
    capacity: usize,
}

impl ErrorRing {
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            head: 0,
            capacity,
        }
    }

    pub fn push(&mut self, message: String) {
        if self.capacity == 0 {
            return;
        }
        if self.slots.len() < self.capacity {
            self.slots.push(message);
        } else {
            self.slots[self.head] = message;
            self.head = (self.head + 1) % self.capacity;
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Entries oldest-first.
    pub fn to_vec(&self) -> Vec<String> {
        let mut out = Vec::with_capacity(self.slots.len());
        for i in 0..self.slots.len() {
            out.push(self.slots[(self.head + i) % self.slots.len()].clone());
        }
        out
    }
}

impl Default for ErrorRing {
    fn default() -> Self {
        Self::new(ERROR_RING_CAPACITY)
    }
}

/// Process-wide ingestion counters.
#[derive(Debug, Default)]
pub struct IngestMetrics {
    lines_processed: AtomicU64,
    reports_attached: AtomicU64,
    sessions_created: AtomicU64,
    normalize_errors: AtomicU64,
    store_errors: AtomicU64,
    reconnects: AtomicU64,
    last_line: Mutex<String>,
    last_processed_at: Mutex<Option<DateTime<Utc>>>,
    recent_errors: Mutex<ErrorRing>,
}

impl IngestMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count a raw line and remember it.
    #[inline]
    pub fn record_line(&self, raw: &str) {
        self.lines_processed.fetch_add(1, Ordering::Relaxed);
        *self.last_line.lock() = raw.to_string();
    }

    #[inline]
    pub fn record_attach(&self) {
        self.reports_attached.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_create(&self) {
        self.sessions_created.fetch_add(1, Ordering::Relaxed);
    }

    /// Stamp the last successful processing time.
    pub fn mark_processed(&self) {
        *self.last_processed_at.lock() = Some(Utc::now());
    }

    pub fn record_normalize_error(&self, message: String) {
        self.normalize_errors.fetch_add(1, Ordering::Relaxed);
        self.recent_errors.lock().push(message);
    }

    pub fn record_store_error(&self, message: String) {
        self.store_errors.fetch_add(1, Ordering::Relaxed);
        self.recent_errors.lock().push(message);
    }

    /// A feed connect/read failure; the reconnect counter is tracked
    /// separately because every failure schedules exactly one reconnect.
    pub fn record_feed_error(&self, message: String) {
        self.recent_errors.lock().push(message);
    }

    #[inline]
    pub fn record_reconnect(&self) {
        self.reconnects.fetch_add(1, Ordering::Relaxed);
    }

    /// Consistent-enough view of current metrics. Individual reads are
    /// atomic but the snapshot as a whole is not transactional, which is
    /// acceptable for observability.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            lines_processed: self.lines_processed.load(Ordering::Relaxed),
            reports_attached: self.reports_attached.load(Ordering::Relaxed),
            sessions_created: self.sessions_created.load(Ordering::Relaxed),
            normalize_errors: self.normalize_errors.load(Ordering::Relaxed),
            store_errors: self.store_errors.load(Ordering::Relaxed),
            reconnects: self.reconnects.load(Ordering::Relaxed),
            last_line: self.last_line.lock().clone(),
            last_processed_at: *self.last_processed_at.lock(),
            recent_errors: self.recent_errors.lock().to_vec(),
        }
    }
}

/// A read-only snapshot of ingestion metrics, serializable for a health or
/// metrics surface.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub lines_processed: u64,
    pub reports_attached: u64,
    pub sessions_created: u64,
    pub normalize_errors: u64,
    pub store_errors: u64,
    pub reconnects: u64,
    pub last_line: String,
    pub last_processed_at: Option<DateTime<Utc>>,
    /// Most recent error messages, oldest first.
    pub recent_errors: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── ErrorRing ───────────────────────────────────────────────

    #[test]
    fn test_ring_starts_empty() {
        let ring = ErrorRing::default();
        assert!(ring.is_empty());
        assert!(ring.to_vec().is_empty());
    }

    #[test]
    fn test_ring_keeps_insertion_order_before_wrap() {
        let mut ring = ErrorRing::new(3);
        ring.push("one".to_string());
        ring.push("two".to_string());
        assert_eq!(ring.to_vec(), vec!["one", "two"]);
    }

    #[test]
    fn test_ring_evicts_oldest_on_overflow() {
        let mut ring = ErrorRing::new(3);
        for msg in ["one", "two", "three", "four", "five"] {
            ring.push(msg.to_string());
        }
        assert_eq!(ring.len(), 3);
        assert_eq!(ring.to_vec(), vec!["three", "four", "five"]);
    }

    #[test]
    fn test_ring_retains_last_ten_of_many() {
        let mut ring = ErrorRing::default();
        for i in 0..25 {
            ring.push(format!("error {}", i));
        }
        let entries = ring.to_vec();
        assert_eq!(entries.len(), ERROR_RING_CAPACITY);
        assert_eq!(entries.first().map(String::as_str), Some("error 15"));
        assert_eq!(entries.last().map(String::as_str), Some("error 24"));
    }

    #[test]
    fn test_zero_capacity_ring_drops_everything() {
        let mut ring = ErrorRing::new(0);
        ring.push("ignored".to_string());
        assert!(ring.is_empty());
    }

    // ── IngestMetrics ───────────────────────────────────────────

    #[test]
    fn test_new_metrics_are_empty() {
        let metrics = IngestMetrics::new();
        let snap = metrics.snapshot();

        assert_eq!(snap.lines_processed, 0);
        assert_eq!(snap.sessions_created, 0);
        assert_eq!(snap.store_errors, 0);
        assert!(snap.last_line.is_empty());
        assert!(snap.last_processed_at.is_none());
        assert!(snap.recent_errors.is_empty());
    }

    #[test]
    fn test_record_line_remembers_raw_text() {
        let metrics = IngestMetrics::new();
        metrics.record_line(r#"{"hex":"a1b2c3"}"#);
        metrics.record_line(r#"{"hex":"ffffff"}"#);

        let snap = metrics.snapshot();
        assert_eq!(snap.lines_processed, 2);
        assert_eq!(snap.last_line, r#"{"hex":"ffffff"}"#);
    }

    #[test]
    fn test_error_categories_share_the_ring() {
        let metrics = IngestMetrics::new();
        metrics.record_normalize_error("bad json".to_string());
        metrics.record_store_error("store down".to_string());
        metrics.record_feed_error("connection refused".to_string());

        let snap = metrics.snapshot();
        assert_eq!(snap.normalize_errors, 1);
        assert_eq!(snap.store_errors, 1);
        assert_eq!(snap.recent_errors, vec!["bad json", "store down", "connection refused"]);
    }

    #[test]
    fn test_mark_processed_sets_timestamp() {
        let metrics = IngestMetrics::new();
        metrics.mark_processed();
        assert!(metrics.snapshot().last_processed_at.is_some());
    }

    #[test]
    fn test_snapshot_serializes() {
        let metrics = IngestMetrics::new();
        metrics.record_line("x");
        let json = serde_json::to_value(metrics.snapshot()).unwrap();
        assert_eq!(json["lines_processed"], 1);
    }
}
