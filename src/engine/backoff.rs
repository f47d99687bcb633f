//! Retry backoff shape
//!
//! Capped exponential with a small fixed floor: attempt `i` sleeps
//! `min(floor + base * 2^i, cap)`. Early attempts retry near-immediately,
//! later ones spread out without blocking a worker for minutes.

use std::time::Duration;

#[derive(Debug, Clone, Copy)]
pub struct BackoffPolicy {
    floor: Duration,
    base: Duration,
    cap: Duration,
}

impl BackoffPolicy {
    pub const fn new(floor: Duration, base: Duration, cap: Duration) -> Self {
        Self { floor, base, cap }
    }

    /// No delay at all; keeps retry loops instant in tests and dry runs.
    pub const fn none() -> Self {
        Self {
            floor: Duration::ZERO,
            base: Duration::ZERO,
            cap: Duration::ZERO,
        }
    }

    /// Delay to sleep after the failed attempt with this index.
    pub fn delay(&self, attempt: usize) -> Duration {
        let factor = match u32::try_from(attempt).ok().and_then(|i| 1u32.checked_shl(i)) {
            Some(f) => f,
            None => return self.cap,
        };
        let grown = match self.base.checked_mul(factor) {
            Some(d) => d,
            None => return self.cap,
        };
        self.floor.saturating_add(grown).min(self.cap)
    }
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self::new(
            Duration::from_millis(200),
            Duration::from_secs(1),
            Duration::from_secs(60),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delay_grows_monotonically() {
        let policy = BackoffPolicy::default();
        let mut previous = Duration::ZERO;
        for attempt in 0..12 {
            let delay = policy.delay(attempt);
            assert!(delay >= previous, "attempt {} shrank the delay", attempt);
            previous = delay;
        }
    }

    #[test]
    fn test_delay_has_floor_and_cap() {
        let policy = BackoffPolicy::default();
        assert_eq!(policy.delay(0), Duration::from_millis(1200));
        assert_eq!(policy.delay(1), Duration::from_millis(2200));
        assert_eq!(policy.delay(10), Duration::from_secs(60));
        assert_eq!(policy.delay(100), Duration::from_secs(60));
    }

    #[test]
    fn test_none_is_always_zero() {
        let policy = BackoffPolicy::none();
        assert_eq!(policy.delay(0), Duration::ZERO);
        assert_eq!(policy.delay(31), Duration::ZERO);
        assert_eq!(policy.delay(64), Duration::ZERO);
    }
}
