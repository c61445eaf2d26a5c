use crate::fusion::FusionEngine;
use serde::Serialize;
use strum_macros::{Display, EnumIter, IntoStaticStr};

/// Source of a remaining-time candidate.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, EnumIter, IntoStaticStr,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum PredictorKind {
    PaceFilter,
    Trend,
    Mean,
    Ema,
    Quantile,
}

/// One predictor's view of the remaining time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Candidate {
    pub kind: PredictorKind,
    pub eta_seconds: f64,
    pub variance: f64,
}

impl Candidate {
    #[inline]
    pub fn new(kind: PredictorKind, eta_seconds: f64, variance: f64) -> Self {
        Self {
            kind,
            eta_seconds,
            variance,
        }
    }

    /// Candidates with a non-finite or non-positive eta carry no information.
    #[inline]
    pub fn is_usable(&self) -> bool {
        self.eta_seconds.is_finite() && self.eta_seconds > 0.0 && !self.variance.is_nan()
    }

    /// Effective fusion weight, `None` when the candidate is skipped.
    #[inline]
    pub fn weight(&self) -> Option<f64> {
        FusionEngine::weight_of(self)
    }
}
