//! # Reconnection policy.
//!
//! [`ReconnectPolicy`] decides, after a failed connect attempt, whether to try
//! again and how long to wait.
//!
//! ```text
//! connect() fails ─► failures += 1
//!                     ├─ failures <  max_attempts ─► Retry { delay }   (ReconnectScheduled)
//!                     └─ failures >= max_attempts ─► GiveUp            (ConnectionFailed)
//! ```
//!
//! With `max_attempts = N` exactly `N` attempts fail before the channel gives up.
//! `max_attempts = 0` behaves like `1`: the first failure is terminal.

use std::time::Duration;

use super::backoff::BackoffPolicy;

/// What to do after a failed connect attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconnectDecision {
    /// Schedule another attempt after `delay`.
    Retry { delay: Duration },
    /// Stop retrying; a manual `connect()` starts over.
    GiveUp,
}

/// Bounded retry policy for connect attempts.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ReconnectPolicy {
    /// Failed attempts allowed before giving up.
    pub max_attempts: u32,
    /// Delay schedule between attempts.
    pub backoff: BackoffPolicy,
}

impl Default for ReconnectPolicy {
    /// 5 attempts, fixed 5 s apart.
    fn default() -> Self {
        Self {
            max_attempts: 5,
            backoff: BackoffPolicy::default(),
        }
    }
}

impl ReconnectPolicy {
    /// Decides the next step given the number of failures so far (including the latest).
    pub fn decide(&self, failures: u32) -> ReconnectDecision {
        if failures >= self.max_attempts.max(1) {
            ReconnectDecision::GiveUp
        } else {
            ReconnectDecision::Retry {
                delay: self.backoff.delay_after(failures),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retries_until_budget_is_spent() {
        let policy = ReconnectPolicy {
            max_attempts: 3,
            backoff: BackoffPolicy::fixed(Duration::from_millis(100)),
        };
        assert_eq!(
            policy.decide(1),
            ReconnectDecision::Retry {
                delay: Duration::from_millis(100)
            }
        );
        assert!(matches!(policy.decide(2), ReconnectDecision::Retry { .. }));
        assert_eq!(policy.decide(3), ReconnectDecision::GiveUp);
        assert_eq!(policy.decide(4), ReconnectDecision::GiveUp);
    }

    #[test]
    fn zero_budget_gives_up_on_first_failure() {
        let policy = ReconnectPolicy {
            max_attempts: 0,
            ..ReconnectPolicy::default()
        };
        assert_eq!(policy.decide(1), ReconnectDecision::GiveUp);
    }
}
