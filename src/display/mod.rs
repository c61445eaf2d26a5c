mod stabilizer;

pub use stabilizer::{DisplayPhase, DisplayStabilizer, StabilizerConfig};
