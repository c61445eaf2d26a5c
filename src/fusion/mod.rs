mod candidate;
mod engine;

pub use candidate::{Candidate, PredictorKind};
pub use engine::{FusionEngine, MAX_WEIGHT, MIN_VARIANCE};
