// In crates/stream-client/src/backoff.rs

use app_config::types::StreamSettings;
use std::time::Duration;

/// Reconnect policy for the event stream.
///
/// Nothing in this environment retries the connection for us, so backoff is
/// an explicit, configurable policy: delays grow by `factor` per consecutive
/// failure and are capped at `max`.
#[derive(Debug, Clone)]
pub struct BackoffPolicy {
    pub initial: Duration,
    pub max: Duration,
    pub factor: f64,
}

impl BackoffPolicy {
    pub fn from_settings(settings: &StreamSettings) -> Self {
        Self {
            initial: Duration::from_millis(settings.backoff_initial_ms),
            max: Duration::from_millis(settings.backoff_max_ms),
            // A factor below 1 would shrink delays on repeated failure.
            factor: settings.backoff_factor.max(1.0),
        }
    }
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self {
            initial: Duration::from_secs(1),
            max: Duration::from_secs(30),
            factor: 2.0,
        }
    }
}

/// The mutable side of a [`BackoffPolicy`]: tracks the delay for the next
/// attempt across consecutive failures.
#[derive(Debug)]
pub struct Backoff {
    policy: BackoffPolicy,
    next: Duration,
}

impl Backoff {
    pub fn new(policy: BackoffPolicy) -> Self {
        let next = policy.initial;
        Self { policy, next }
    }

    /// The delay to sleep before the next attempt. Each call grows the
    /// following delay by the policy factor, up to the cap.
    pub fn next_delay(&mut self) -> Duration {
        let delay = self.next;
        self.next = self.next.mul_f64(self.policy.factor).min(self.policy.max);
        delay
    }

    /// A successful connection starts the schedule over.
    pub fn reset(&mut self) {
        self.next = self.policy.initial;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy(initial_ms: u64, max_ms: u64, factor: f64) -> BackoffPolicy {
        BackoffPolicy {
            initial: Duration::from_millis(initial_ms),
            max: Duration::from_millis(max_ms),
            factor,
        }
    }

    #[test]
    fn delays_grow_by_factor_and_cap_at_max() {
        let mut backoff = Backoff::new(policy(100, 450, 2.0));
        assert_eq!(backoff.next_delay(), Duration::from_millis(100));
        assert_eq!(backoff.next_delay(), Duration::from_millis(200));
        assert_eq!(backoff.next_delay(), Duration::from_millis(400));
        assert_eq!(backoff.next_delay(), Duration::from_millis(450));
        assert_eq!(backoff.next_delay(), Duration::from_millis(450));
    }

    #[test]
    fn reset_restores_the_initial_delay() {
        let mut backoff = Backoff::new(policy(100, 1_000, 2.0));
        backoff.next_delay();
        backoff.next_delay();
        backoff.reset();
        assert_eq!(backoff.next_delay(), Duration::from_millis(100));
    }

    #[test]
    fn factor_below_one_is_clamped() {
        let settings = StreamSettings {
            backoff_initial_ms: 100,
            backoff_max_ms: 1_000,
            backoff_factor: 0.5,
        };
        let mut backoff = Backoff::new(BackoffPolicy::from_settings(&settings));
        assert_eq!(backoff.next_delay(), Duration::from_millis(100));
        assert_eq!(backoff.next_delay(), Duration::from_millis(100));
    }
}
