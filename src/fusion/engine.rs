use crate::fusion::Candidate;

/// Variances are floored here before inversion.
pub const MIN_VARIANCE: f64 = 1e-12;
/// No single candidate may weigh more than this.
pub const MAX_WEIGHT: f64 = 1e6;

/// Inverse-variance weighted combination of candidates.
#[derive(Debug, Default, Clone, Copy)]
pub struct FusionEngine {
    weighted_sum: f64,
    weight_total: f64,
}

impl FusionEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Weight a candidate would receive, or `None` when it is skipped.
    #[inline]
    pub fn weight_of(candidate: &Candidate) -> Option<f64> {
        if !candidate.is_usable() {
            return None;
        }
        Some((1.0 / candidate.variance.max(MIN_VARIANCE)).min(MAX_WEIGHT))
    }

    #[inline]
    pub fn collect(&mut self, candidate: &Candidate) {
        if let Some(w) = Self::weight_of(candidate) {
            self.weighted_sum += w * candidate.eta_seconds;
            self.weight_total += w;
        }
    }

    /// Fused estimate, `+inf` if nothing usable was collected.
    #[inline]
    pub fn estimate(&self) -> f64 {
        if self.weight_total <= 0.0 {
            f64::INFINITY
        } else {
            (self.weighted_sum / self.weight_total).max(0.0)
        }
    }

    pub fn fuse<'a, I>(candidates: I) -> f64
    where
        I: IntoIterator<Item = &'a Candidate>,
    {
        let mut engine = Self::new();
        for c in candidates {
            engine.collect(c);
        }
        engine.estimate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fusion::PredictorKind;
    use proptest::prelude::*;

    fn c(eta: f64, var: f64) -> Candidate {
        Candidate::new(PredictorKind::Ema, eta, var)
    }

    #[test]
    fn empty_is_infinite() {
        assert_eq!(FusionEngine::fuse(&[] as &[Candidate]), f64::INFINITY);
        assert_eq!(FusionEngine::new().estimate(), f64::INFINITY);
    }

    #[test]
    fn single_candidate_passes_through() {
        assert_eq!(FusionEngine::fuse(&[c(4.0, 2.0)]), 4.0);
    }

    #[test]
    fn inverse_variance_weighting() {
        // weights 1 and 3
        let got = FusionEngine::fuse(&[c(10.0, 1.0), c(2.0, 1.0 / 3.0)]);
        assert!((got - 4.0).abs() < 1e-12, "got={got}");
    }

    #[test]
    fn skips_unusable_candidates() {
        let got = FusionEngine::fuse(&[c(f64::INFINITY, 1.0), c(-1.0, 1.0), c(0.0, 1.0), c(5.0, 1.0)]);
        assert_eq!(got, 5.0);
        assert_eq!(FusionEngine::fuse(&[c(0.0, 1.0)]), f64::INFINITY);
    }

    #[test]
    fn near_zero_variances_are_capped_not_dominant() {
        // both hit the cap, so they average evenly
        let got = FusionEngine::fuse(&[c(1.0, 0.0), c(3.0, 1e-20)]);
        assert!((got - 2.0).abs() < 1e-12, "got={got}");
        assert_eq!(FusionEngine::weight_of(&c(1.0, 0.0)), Some(MAX_WEIGHT));
    }

    proptest! {
        #[test]
        fn fused_lies_within_candidate_range(
            cs in proptest::collection::vec((0.001f64..1e4, 0.0f64..1e3), 1..8),
        ) {
            let candidates: Vec<Candidate> = cs.iter().map(|&(eta, var)| c(eta, var)).collect();
            let got = FusionEngine::fuse(&candidates);
            let lo = cs.iter().map(|p| p.0).fold(f64::INFINITY, f64::min);
            let hi = cs.iter().map(|p| p.0).fold(0.0, f64::max);
            prop_assert!(got >= lo * (1.0 - 1e-9) && got <= hi * (1.0 + 1e-9), "got={} lo={} hi={}", got, lo, hi);
        }
    }
}
