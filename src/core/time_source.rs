use std::fmt::Debug;
use std::time::Instant;

/// Wall-clock capability injected into an estimator.
///
/// Implementations must return seconds that never decrease between calls.
/// The origin is arbitrary; only differences are used.
pub trait TimeSource: Debug + Send + Sync {
    fn now_seconds(&self) -> f64;
}

/// Monotonic clock measuring seconds since its own creation.
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for MonotonicClock {
    #[inline]
    fn now_seconds(&self) -> f64 {
        self.origin.elapsed().as_secs_f64()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_near_zero_and_never_goes_back() {
        let clock = MonotonicClock::new();
        let a = clock.now_seconds();
        let b = clock.now_seconds();
        assert!(a >= 0.0 && a < 1.0);
        assert!(b >= a);
    }
}
