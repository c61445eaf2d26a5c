use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result};

/// Point-in-time view of an estimator.
///
/// `remaining_seconds` is `+inf` until there is enough information to
/// estimate anything, and exactly `0.0` once all units are done.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub remaining_seconds: f64,
    pub percent_complete: f64,
    pub pace_ema: f64,
    pub pace_filtered: Option<f64>,
}

impl Display for Snapshot {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(
            f,
            "eta={:.3}s, done={:.2}%, ema={:.6}s/u",
            self.remaining_seconds, self.percent_complete, self.pace_ema
        )?;
        match self.pace_filtered {
            Some(p) => write!(f, ", filtered={p:.6}s/u"),
            None => write!(f, ", filtered=-"),
        }
    }
}
