//! Online remaining-time estimation.
//!
//! An [`EtaEstimator`] is fed progress events and fuses several streaming
//! predictors of the per-unit pace into one remaining-time estimate, with a
//! stabilized whole-second view for continuous display.

pub mod core;
pub mod display;
pub mod eta;
pub mod filters;
pub mod fusion;
pub mod regime;
pub mod regression;
pub mod stats;
pub mod trace;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use crate::core::{EtaError, MonotonicClock, Options, Snapshot, TimeSource};
pub use crate::eta::EtaEstimator;
pub use crate::fusion::{Candidate, PredictorKind};
pub use crate::trace::{ProgressTrace, TraceFormat, TracePoint};
