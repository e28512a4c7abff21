use reqwest::StatusCode;
use std::time::Duration;

/// Bounds for every retry the sweeper performs.
///
/// One policy governs both overlapping retry mechanisms: transport-level
/// retries of individual requests (on transient server or rate-limit
/// statuses), and the coordinator's restart-from-page-1 when a later page
/// comes back empty. The two bounds are separate fields so they can be tuned
/// independently, but keeping them in a single bounded policy means a
/// persistently degraded API can never trap a run in a retry loop.
#[derive(Clone, Debug)]
pub struct RetryPolicy {
    /// Maximum transport-level retries per request after the first attempt.
    pub max_attempts: u32,
    /// Budget for empty-page restarts across one whole run.
    pub max_restarts: u32,
    /// Delay before the first retry, doubled on each subsequent one. Also
    /// the pause before an empty-page restart.
    pub initial_delay: Duration,
    /// Ceiling on the backoff delay.
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> RetryPolicy {
        RetryPolicy {
            max_attempts: 3,
            max_restarts: 3,
            initial_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(8),
        }
    }
}

impl RetryPolicy {
    /// Statuses worth retrying: rate limiting and transient server failures.
    /// Anything else is treated as a definitive answer.
    pub(crate) fn is_transient(status: StatusCode) -> bool {
        matches!(status.as_u16(), 429 | 500 | 502 | 503 | 504)
    }

    /// Backoff delay for the given zero-based attempt.
    pub(crate) fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt);
        self.initial_delay.saturating_mul(factor).min(self.max_delay)
    }
}

#[cfg(test)]
mod tests {
    use super::RetryPolicy;
    use reqwest::StatusCode;
    use std::time::Duration;

    #[test]
    fn test_transient_statuses() {
        assert!(RetryPolicy::is_transient(StatusCode::TOO_MANY_REQUESTS));
        assert!(RetryPolicy::is_transient(StatusCode::INTERNAL_SERVER_ERROR));
        assert!(RetryPolicy::is_transient(StatusCode::SERVICE_UNAVAILABLE));
        assert!(!RetryPolicy::is_transient(StatusCode::OK));
        assert!(!RetryPolicy::is_transient(StatusCode::NOT_FOUND));
        assert!(!RetryPolicy::is_transient(StatusCode::UNAUTHORIZED));
        assert!(!RetryPolicy::is_transient(StatusCode::GONE));
    }

    #[test]
    fn test_delay_doubles_up_to_the_cap() {
        let policy = RetryPolicy {
            initial_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(2),
            ..RetryPolicy::default()
        };
        assert_eq!(policy.delay_for(0), Duration::from_millis(500));
        assert_eq!(policy.delay_for(1), Duration::from_secs(1));
        assert_eq!(policy.delay_for(2), Duration::from_secs(2));
        assert_eq!(policy.delay_for(3), Duration::from_secs(2));
        assert_eq!(policy.delay_for(30), Duration::from_secs(2));
    }
}
