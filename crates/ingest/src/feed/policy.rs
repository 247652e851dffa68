//! Policy — reconnect behavior for the feed connection.

use std::time::Duration;

/// How long to wait before reconnect attempt `n`. There is no attempt
/// limit anywhere: the feed is reconnected forever.
///
/// The default is the feed's fixed five-second delay. Keeping the policy
/// out of the reader means an exponential or jittered variant only touches
/// the ingestion loop's construction site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconnectPolicy {
    delay: Duration,
}

impl ReconnectPolicy {
    pub fn fixed(delay: Duration) -> Self {
        Self { delay }
    }

    /// Delay to apply before the given reconnect attempt. The fixed policy
    /// ignores the attempt number.
    pub fn delay_for(&self, _attempt: u64) -> Duration {
        self.delay
    }
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self::fixed(Duration::from_secs(5))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_delay_is_five_seconds() {
        let policy = ReconnectPolicy::default();
        assert_eq!(policy.delay_for(0), Duration::from_secs(5));
    }

    #[test]
    fn test_fixed_delay_ignores_attempt_number() {
        let policy = ReconnectPolicy::fixed(Duration::from_millis(250));
        assert_eq!(policy.delay_for(0), policy.delay_for(1_000_000));
    }
}
