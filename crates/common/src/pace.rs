//! Interval pacing for external API calls.
//!
//! The acquisition pipeline must leave a fixed gap between successive
//! provider calls (rate-limit compliance). `Pacer` wraps a governor
//! limiter with a one-call-per-period quota; the first call passes
//! immediately, every later call waits out the remainder of the period.

use governor::{Quota, RateLimiter as GovLimiter};
use std::sync::Arc;
use std::time::Duration;

/// Awaitable gap enforcer shared across the calls of one run.
#[derive(Debug, Clone)]
pub struct Pacer {
    limiter: Arc<
        GovLimiter<
            governor::state::NotKeyed,
            governor::state::InMemoryState,
            governor::clock::DefaultClock,
        >,
    >,
}

impl Pacer {
    /// Create a pacer enforcing at least `gap` between successive calls.
    pub fn with_interval(gap: Duration) -> Self {
        let quota = Quota::with_period(gap).expect("pacing interval must be non-zero");
        Self {
            limiter: Arc::new(GovLimiter::direct(quota)),
        }
    }

    /// Wait until the next call is allowed.
    pub async fn wait(&self) {
        self.limiter.until_ready().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[tokio::test]
    async fn test_enforces_gap_between_calls() {
        let pacer = Pacer::with_interval(Duration::from_millis(40));

        pacer.wait().await;
        let after_first = Instant::now();
        pacer.wait().await;
        let gap = after_first.elapsed();

        assert!(gap >= Duration::from_millis(35), "gap was {:?}", gap);
    }

    #[tokio::test]
    async fn test_first_call_is_immediate() {
        let pacer = Pacer::with_interval(Duration::from_secs(60));
        let start = Instant::now();
        pacer.wait().await;
        assert!(start.elapsed() < Duration::from_millis(50));
    }
}
