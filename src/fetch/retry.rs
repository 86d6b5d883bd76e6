//! Retry policy for protection interstitials.
//!
//! The catalog occasionally answers with a short-lived verification page
//! instead of content. Unlike transport failures, those clear on their own
//! after a few seconds, so the policy re-fetches at a fixed interval until
//! a bounded attempt budget is spent.

use std::time::Duration;

/// Default maximum number of fetch attempts per page, including the first.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;

/// Default wait between attempts while an interstitial is up.
pub const DEFAULT_RETRY_INTERVAL: Duration = Duration::from_secs(5);

/// Decision from the retry policy about whether to fetch again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetryDecision {
    /// Wait for `delay`, then re-fetch as attempt number `attempt`.
    Retry {
        /// How long to wait before the next attempt.
        delay: Duration,
        /// The attempt number for the next try (1-indexed).
        attempt: u32,
    },
    /// Stop fetching and surface an error.
    DoNotRetry {
        /// Human-readable reason why no retry occurs.
        reason: String,
    },
}

/// Bounded fixed-interval retry policy for interstitial pages.
///
/// The interval does not back off: verification windows end on the server's
/// schedule, so spacing attempts further apart does not change when they
/// clear, only how late the client notices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterstitialPolicy {
    /// Maximum number of attempts, including the initial one.
    max_attempts: u32,
    /// Fixed delay between attempts.
    retry_interval: Duration,
}

impl Default for InterstitialPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            retry_interval: DEFAULT_RETRY_INTERVAL,
        }
    }
}

impl InterstitialPolicy {
    /// Creates a policy with an explicit attempt budget and interval.
    ///
    /// `max_attempts` is clamped to at least 1, since the initial request
    /// always counts as an attempt.
    #[must_use]
    pub fn new(max_attempts: u32, retry_interval: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            retry_interval,
        }
    }

    /// Creates a policy with a custom attempt budget and the default interval.
    #[must_use]
    pub fn with_max_attempts(max_attempts: u32) -> Self {
        Self::new(max_attempts, DEFAULT_RETRY_INTERVAL)
    }

    /// Returns the attempt budget.
    #[must_use]
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Returns the fixed wait between attempts.
    #[must_use]
    pub fn retry_interval(&self) -> Duration {
        self.retry_interval
    }

    /// Decides whether an interstitial on attempt `attempt` warrants another
    /// fetch. Attempts are 1-indexed: the initial request is attempt 1.
    #[must_use]
    pub fn should_retry(&self, attempt: u32) -> RetryDecision {
        if attempt >= self.max_attempts {
            RetryDecision::DoNotRetry {
                reason: format!("max attempts ({}) exhausted", self.max_attempts),
            }
        } else {
            RetryDecision::Retry {
                delay: self.retry_interval,
                attempt: attempt + 1,
            }
        }
    }
}
