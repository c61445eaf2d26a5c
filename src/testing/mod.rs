pub mod stubs;

pub use stubs::{JitteredPace, ManualClock};

use crate::EtaEstimator;

/// Records `steps` single-unit events, advancing `clock` by `interval`
/// before each one.
pub fn drive(estimator: &EtaEstimator, clock: &ManualClock, interval: f64, steps: usize) {
    for _ in 0..steps {
        clock.advance(interval);
        estimator.record_progress(1.0);
    }
}
