use crate::core::error::validate_total;
use crate::core::{EtaError, MonotonicClock, Options, Snapshot, TimeSource};
use crate::display::{DisplayStabilizer, StabilizerConfig};
use crate::eta::predictors::PredictorBank;
use crate::fusion::{Candidate, FusionEngine};
use crate::trace::TracePoint;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, trace};

/// Shortest interval credited to a progress event. Zero or negative clock
/// deltas are clamped here so every predictor stays finite.
const MIN_STEP_SECONDS: f64 = 1e-9;

#[derive(Debug)]
struct EstimatorState {
    total: f64,
    done: f64,
    start_at: f64,
    last_event_at: f64,
    events: u64,
    predictors: PredictorBank,
    display: DisplayStabilizer,
    last_step_eta: Option<f64>,
}

impl EstimatorState {
    fn new(total: f64, now: f64, options: &Options) -> Self {
        Self {
            total,
            done: 0.0,
            start_at: now,
            last_event_at: now,
            events: 0,
            predictors: PredictorBank::new(options),
            display: DisplayStabilizer::new(StabilizerConfig::from(options)),
            last_step_eta: None,
        }
    }

    #[inline]
    fn is_complete(&self) -> bool {
        self.done >= self.total
    }

    #[inline]
    fn percent(&self) -> f64 {
        (100.0 * self.done / self.total).clamp(0.0, 100.0)
    }

    fn candidates(&self) -> Vec<Candidate> {
        let elapsed = self.last_event_at - self.start_at;
        self.predictors.candidates(self.total, self.done, elapsed)
    }

    /// Fused raw estimate; a function of recorded events only.
    fn raw_eta(&self) -> f64 {
        if self.is_complete() {
            return 0.0;
        }
        if self.events == 0 {
            return f64::INFINITY;
        }
        FusionEngine::fuse(&self.candidates())
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            remaining_seconds: self.raw_eta(),
            percent_complete: self.percent(),
            pace_ema: self.predictors.pace_ema(),
            pace_filtered: self.predictors.pace_filtered(),
        }
    }

    fn stabilized(&mut self, now: f64) -> f64 {
        let raw = self.raw_eta();
        let complete = self.is_complete();
        self.display.read(raw, now, complete)
    }

    /// Keeps the value handed out by successive progress events from rising
    /// or from falling faster than `max_drop` per event. Completion is
    /// always reported as zero.
    fn clamp_step(&mut self, eta: f64, max_drop: f64) -> f64 {
        if self.is_complete() {
            self.last_step_eta = Some(0.0);
            return 0.0;
        }
        let clamped = match self.last_step_eta {
            Some(last) if last.is_finite() => last.min(eta.max(last - max_drop)).max(0.0),
            _ => eta,
        };
        self.last_step_eta = Some(clamped);
        clamped
    }
}

/// Online remaining-time estimator for a fixed amount of work.
///
/// Progress events update every predictor under one lock; reads fuse the
/// predictors' candidates on demand. All operations take `&self`, so an
/// estimator can be shared across threads behind an `Arc`.
///
/// ```
/// use eta_estimator::{EtaEstimator, Options};
///
/// let eta = EtaEstimator::new(100.0, Options::default()).unwrap();
/// assert!(eta.snapshot().remaining_seconds.is_infinite());
/// eta.record_progress(1.0);
/// assert_eq!(eta.completed_units(), 1.0);
/// ```
#[derive(Debug)]
pub struct EtaEstimator {
    options: Options,
    clock: Arc<dyn TimeSource>,
    state: Mutex<EstimatorState>,
}

impl EtaEstimator {
    /// Creates an estimator timed by a [`MonotonicClock`].
    pub fn new(total_units: f64, options: Options) -> Result<Self, EtaError> {
        Self::with_time_source(total_units, options, Arc::new(MonotonicClock::new()))
    }

    pub fn with_time_source(
        total_units: f64,
        options: Options,
        clock: Arc<dyn TimeSource>,
    ) -> Result<Self, EtaError> {
        let total = validate_total(total_units)?;
        options.validate()?;
        let state = EstimatorState::new(total, clock.now_seconds(), &options);
        debug!(total, "eta estimator created");
        Ok(Self {
            options,
            clock,
            state: Mutex::new(state),
        })
    }

    #[inline]
    pub fn options(&self) -> &Options {
        &self.options
    }

    fn lock(&self) -> MutexGuard<'_, EstimatorState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Discards all predictor and display state and starts over with a new
    /// total. Options and time source are kept. On error nothing changes.
    pub fn reset(&self, total_units: f64) -> Result<(), EtaError> {
        let total = validate_total(total_units)?;
        let mut state = self.lock();
        *state = EstimatorState::new(total, self.clock.now_seconds(), &self.options);
        debug!(total, "eta estimator reset");
        Ok(())
    }

    /// Records `units` of completed work at the current time.
    ///
    /// Non-positive or non-finite `units` change nothing and return the
    /// current snapshot.
    pub fn record_progress(&self, units: f64) -> Snapshot {
        let mut state = self.lock();
        if !(units.is_finite() && units > 0.0) {
            return state.snapshot();
        }

        let now = self.clock.now_seconds();
        let dt = now - state.last_event_at;
        let dt = if dt.is_finite() {
            dt.max(MIN_STEP_SECONDS)
        } else {
            MIN_STEP_SECONDS
        };
        state.last_event_at = state.last_event_at.max(now);

        let sec_per_unit = dt / units;
        let done = (state.done + units).min(state.total);
        let elapsed = state.last_event_at - state.start_at;
        state.predictors.observe(sec_per_unit, done, elapsed, &self.options);
        state.done = done;
        state.events += 1;

        trace!(
            done,
            total = state.total,
            sec_per_unit,
            "progress recorded"
        );

        let mut snapshot = state.snapshot();
        if let Some(max_drop) = self.options.max_drop_per_step {
            snapshot.remaining_seconds = state.clamp_step(snapshot.remaining_seconds, max_drop);
        }
        snapshot
    }

    /// Current raw view. Pure: repeated calls without progress agree.
    pub fn snapshot(&self) -> Snapshot {
        self.lock().snapshot()
    }

    /// Fused raw remaining seconds.
    pub fn remaining_seconds(&self) -> f64 {
        self.lock().raw_eta()
    }

    /// Remaining seconds as whole numbers fit for continuous display, or
    /// `+inf` while nothing is known.
    ///
    /// Unlike [`snapshot`](Self::snapshot) this advances the display
    /// stabilizer, whose state depends on when it is called.
    pub fn stabilized_remaining_seconds(&self) -> f64 {
        let mut state = self.lock();
        let now = self.clock.now_seconds();
        state.stabilized(now)
    }

    /// The predictor candidates a raw read would fuse right now.
    pub fn candidates(&self) -> Vec<Candidate> {
        let state = self.lock();
        if state.events == 0 || state.is_complete() {
            return Vec::new();
        }
        state.candidates()
    }

    /// Captures a trace point, advancing the display stabilizer like
    /// [`stabilized_remaining_seconds`](Self::stabilized_remaining_seconds).
    pub fn trace_point(&self) -> TracePoint {
        let mut state = self.lock();
        let now = self.clock.now_seconds();
        let snapshot = state.snapshot();
        let stabilized_seconds = state.stabilized(now);
        TracePoint {
            elapsed_seconds: now - state.start_at,
            completed_units: state.done,
            total_units: state.total,
            snapshot,
            stabilized_seconds,
        }
    }

    pub fn total_units(&self) -> f64 {
        self.lock().total
    }

    pub fn completed_units(&self) -> f64 {
        self.lock().done
    }

    /// Share of work done in `[0, 100]`.
    pub fn percent_complete(&self) -> f64 {
        self.lock().percent()
    }
}
