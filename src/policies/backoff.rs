//! # Delay schedule between reconnect attempts.
//!
//! [`BackoffPolicy`] computes the wait before attempt `n + 1` after `n` failures:
//! `first × factor^(n-1)`, clamped to `max`, then jittered. The base is derived
//! from the failure count alone, so jitter never feeds back into later delays.
//!
//! The default is a **fixed** 5 s interval (`factor = 1.0`). Raising `factor`
//! gives exponential backoff; termination stays bounded by
//! [`ReconnectPolicy::max_attempts`](crate::ReconnectPolicy::max_attempts).
//!
//! # Example
//! ```rust
//! use std::time::Duration;
//! use fieldlink::{BackoffPolicy, JitterPolicy};
//!
//! let backoff = BackoffPolicy {
//!     first: Duration::from_secs(1),
//!     max: Duration::from_secs(8),
//!     factor: 2.0,
//!     jitter: JitterPolicy::None,
//! };
//!
//! assert_eq!(backoff.delay_after(1), Duration::from_secs(1));
//! assert_eq!(backoff.delay_after(3), Duration::from_secs(4));
//! assert_eq!(backoff.delay_after(10), Duration::from_secs(8));
//! ```

use std::time::Duration;

use super::jitter::JitterPolicy;

/// Reconnect delay schedule.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BackoffPolicy {
    /// Delay after the first failure.
    pub first: Duration,
    /// Upper bound for any computed delay.
    pub max: Duration,
    /// Growth per additional failure (`1.0` = constant).
    pub factor: f64,
    /// Randomization applied after clamping.
    pub jitter: JitterPolicy,
}

impl Default for BackoffPolicy {
    /// Constant 5 s, capped at 60 s, no jitter.
    fn default() -> Self {
        Self::fixed(Duration::from_secs(5))
    }
}

impl BackoffPolicy {
    /// Constant delay with no jitter.
    pub fn fixed(delay: Duration) -> Self {
        Self {
            first: delay,
            max: delay.max(Duration::from_secs(60)),
            factor: 1.0,
            jitter: JitterPolicy::None,
        }
    }

    /// Delay to wait after `failures` consecutive failures (`0` is treated as `1`).
    pub fn delay_after(&self, failures: u32) -> Duration {
        let exp = failures.saturating_sub(1).min(i32::MAX as u32) as i32;
        let secs = self.first.as_secs_f64() * self.factor.powi(exp);
        let base = if !secs.is_finite() || secs < 0.0 || secs > self.max.as_secs_f64() {
            self.max
        } else {
            Duration::from_secs_f64(secs)
        };
        self.jitter.apply(base)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_fixed_five_seconds() {
        let policy = BackoffPolicy::default();
        for failures in 0..10 {
            assert_eq!(policy.delay_after(failures), Duration::from_secs(5));
        }
    }

    #[test]
    fn exponential_growth_is_capped() {
        let policy = BackoffPolicy {
            first: Duration::from_millis(250),
            max: Duration::from_secs(2),
            factor: 2.0,
            jitter: JitterPolicy::None,
        };
        assert_eq!(policy.delay_after(1), Duration::from_millis(250));
        assert_eq!(policy.delay_after(2), Duration::from_millis(500));
        assert_eq!(policy.delay_after(4), Duration::from_secs(2));
        assert_eq!(policy.delay_after(u32::MAX), Duration::from_secs(2));
    }

    #[test]
    fn fixed_keeps_max_above_first() {
        let policy = BackoffPolicy::fixed(Duration::from_secs(120));
        assert_eq!(policy.max, Duration::from_secs(120));
        assert_eq!(policy.delay_after(3), Duration::from_secs(120));
    }

    #[test]
    fn jitter_never_exceeds_base() {
        let policy = BackoffPolicy {
            jitter: JitterPolicy::Full,
            ..BackoffPolicy::fixed(Duration::from_millis(800))
        };
        for failures in 1..50 {
            assert!(policy.delay_after(failures) <= Duration::from_millis(800));
        }
    }
}
