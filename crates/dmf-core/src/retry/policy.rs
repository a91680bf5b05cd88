use crate::config::RetryConfig;
use std::time::Duration;

/// Longest wait between attempts accepted from config.
const MAX_DELAY: Duration = Duration::from_secs(3600);

/// Decision returned by the retry policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Do not retry this error.
    NoRetry,
    /// Retry after the given delay.
    RetryAfter(Duration),
}

/// Flat-delay policy: up to `max_attempts` tries, `delay` between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum number of attempts (including the first). Values below 1 act as 1.
    pub max_attempts: u32,
    /// Wait between a failed attempt and the next one.
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            delay: Duration::from_secs(3),
        }
    }
}

impl RetryPolicy {
    /// Policy without any wait between attempts (tests, local mirrors).
    pub fn immediate(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            delay: Duration::ZERO,
        }
    }

    /// `attempt` is 1-based and names the attempt that just failed.
    pub fn decide(&self, attempt: u32) -> RetryDecision {
        if attempt >= self.max_attempts.max(1) {
            RetryDecision::NoRetry
        } else {
            RetryDecision::RetryAfter(self.delay)
        }
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(cfg: &RetryConfig) -> Self {
        let delay = if cfg.delay_secs > 0.0 {
            Duration::try_from_secs_f64(cfg.delay_secs)
                .map(|d| d.min(MAX_DELAY))
                .unwrap_or(MAX_DELAY)
        } else {
            Duration::ZERO
        };
        if delay == MAX_DELAY {
            tracing::warn!(delay_secs = cfg.delay_secs, "retry delay capped at {:?}", MAX_DELAY);
        }
        Self {
            max_attempts: cfg.max_attempts.max(1),
            delay,
        }
    }
}
