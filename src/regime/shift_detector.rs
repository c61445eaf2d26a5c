/// Observations before the detector may flag anything.
const MIN_OBSERVATIONS: u32 = 8;
const MIN_MAD: f64 = 1e-9;
/// The MAD is never taken below this fraction of the rolling mean.
const MAD_FLOOR_RATIO: f64 = 0.01;

/// Flags sudden, sustained changes in pace.
///
/// Keeps an EMA of recent seconds-per-unit and of the absolute deviation
/// from it. An observation further than `threshold` deviations from the
/// rolling mean is a shift.
#[derive(Debug, Clone, Copy)]
pub struct RegimeDetector {
    alpha: f64,
    threshold: f64,
    seen: u32,
    window_mean: Option<f64>,
    window_mad: f64,
}

impl RegimeDetector {
    pub fn new(alpha: f64, threshold: f64) -> Self {
        Self {
            alpha,
            threshold,
            seen: 0,
            window_mean: None,
            window_mad: 0.0,
        }
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.seen >= MIN_OBSERVATIONS
    }

    #[inline]
    pub fn window_mean(&self) -> Option<f64> {
        self.window_mean
    }

    #[inline]
    pub fn window_mad(&self) -> f64 {
        self.window_mad
    }

    /// Whether `x` departs from the current regime. Does not update state.
    pub fn is_shift(&self, x: f64) -> bool {
        if !self.is_active() {
            return false;
        }
        let Some(mean) = self.window_mean else {
            return false;
        };
        let mad = self.window_mad.max(MIN_MAD).max(MAD_FLOOR_RATIO * mean.abs());
        (x - mean).abs() > self.threshold * mad
    }

    pub fn push(&mut self, x: f64) {
        self.seen = self.seen.saturating_add(1);
        match self.window_mean {
            None => self.window_mean = Some(x),
            Some(mean) => {
                let deviation = (x - mean).abs();
                self.window_mad = self.alpha * deviation + (1.0 - self.alpha) * self.window_mad;
                self.window_mean = Some(mean + self.alpha * (x - mean));
            }
        }
    }
}

/// Countdown of fast-adaptation steps after a detected shift.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RegimeOverride {
    remaining: u32,
}

impl RegimeOverride {
    #[inline]
    pub fn is_active(&self) -> bool {
        self.remaining > 0
    }

    #[inline]
    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    /// Re-arms on a shift, otherwise counts down one step.
    #[inline]
    pub fn step(&mut self, shifted: bool, steps: u32) {
        if shifted {
            self.remaining = steps;
        } else {
            self.remaining = self.remaining.saturating_sub(1);
        }
    }
}
