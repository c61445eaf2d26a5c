use crate::core::Options;

/// Raw estimates at or below this are shown as done.
const SNAP_TO_ZERO_SECONDS: f64 = 0.25;
/// With a zero target, a display this close to zero snaps straight to it.
const END_TOLERANCE_SECONDS: u64 = 1;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StabilizerConfig {
    pub max_drop_per_second: f64,
    pub rise_grace_seconds: f64,
    pub rise_min_jump: f64,
    pub max_lag_at_end: f64,
    pub lag_slope_sqrt: f64,
    pub near_end_snap_seconds: f64,
}

impl From<&Options> for StabilizerConfig {
    fn from(o: &Options) -> Self {
        Self {
            max_drop_per_second: o.max_drop_per_second,
            rise_grace_seconds: o.rise_grace_seconds,
            rise_min_jump: o.rise_min_jump,
            max_lag_at_end: o.max_lag_at_end,
            lag_slope_sqrt: o.lag_slope_sqrt,
            near_end_snap_seconds: o.near_end_snap_seconds,
        }
    }
}

impl Default for StabilizerConfig {
    fn default() -> Self {
        Self::from(&Options::default())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayPhase {
    Uninitialized,
    Displaying(u64),
}

/// Turns a jittery raw estimate into whole seconds fit for continuous display.
///
/// Falls are paid for with drop credit, which accrues at
/// `max_drop_per_second` of wall time; rises are held for a grace period
/// after a drop and ignored when smaller than `rise_min_jump`. Lag beyond a
/// cap that grows with `sqrt(target)`, and any drop near the end, is forced
/// through so the display always reaches zero.
#[derive(Debug, Clone)]
pub struct DisplayStabilizer {
    config: StabilizerConfig,
    phase: DisplayPhase,
    drop_credit: f64,
    last_decrease_at: Option<f64>,
    last_read_at: Option<f64>,
}

impl DisplayStabilizer {
    pub fn new(config: StabilizerConfig) -> Self {
        Self {
            config,
            phase: DisplayPhase::Uninitialized,
            drop_credit: 0.0,
            last_decrease_at: None,
            last_read_at: None,
        }
    }

    #[inline]
    pub fn phase(&self) -> DisplayPhase {
        self.phase
    }

    #[inline]
    pub fn drop_credit(&self) -> f64 {
        self.drop_credit
    }

    pub fn reset(&mut self) {
        *self = Self::new(self.config);
    }

    /// Stabilized value for `raw` read at wall time `now`.
    pub fn read(&mut self, raw: f64, now: f64, complete: bool) -> f64 {
        if !raw.is_finite() {
            return f64::INFINITY;
        }
        // a stale `now` never rewinds the read clock
        let now = self.last_read_at.map_or(now, |prev| now.max(prev));
        if raw <= SNAP_TO_ZERO_SECONDS || complete {
            self.phase = DisplayPhase::Displaying(0);
            self.drop_credit = 0.0;
            self.last_decrease_at = Some(now);
            self.last_read_at = Some(now);
            return 0.0;
        }

        let dt = self.last_read_at.map_or(0.0, |prev| now - prev);
        self.last_read_at = Some(now);
        self.drop_credit += dt * self.config.max_drop_per_second;

        let target = raw.round() as u64;
        let shown = match self.phase {
            DisplayPhase::Uninitialized => target,
            DisplayPhase::Displaying(current) if target > current => self.rise(current, target, now),
            DisplayPhase::Displaying(current) if target < current => self.fall(current, target, now),
            DisplayPhase::Displaying(current) => current,
        };

        self.phase = DisplayPhase::Displaying(shown);
        self.drop_credit = self.drop_credit.fract();
        shown as f64
    }

    fn rise(&self, current: u64, target: u64, now: f64) -> u64 {
        let in_grace = self
            .last_decrease_at
            .is_some_and(|t| now - t < self.config.rise_grace_seconds);
        if !in_grace && (target - current) as f64 >= self.config.rise_min_jump {
            target
        } else {
            current
        }
    }

    fn fall(&mut self, current: u64, target: u64, now: f64) -> u64 {
        let desired = current - target;
        let lag_cap = self
            .config
            .max_lag_at_end
            .max(self.config.lag_slope_sqrt * (target as f64).sqrt());

        let forced = if target as f64 <= self.config.near_end_snap_seconds {
            desired as f64
        } else {
            (desired as f64 - lag_cap).max(0.0)
        };
        self.drop_credit += forced;

        let step = desired.min(self.drop_credit.floor() as u64);
        self.drop_credit -= step as f64;
        let mut next = current - step;

        if target == 0 && next <= END_TOLERANCE_SECONDS {
            next = 0;
            self.drop_credit = 0.0;
        }
        if next < current {
            self.last_decrease_at = Some(now);
        }
        next
    }
}
