use crate::stats::Estimator;

const SMOOTHING: f64 = 0.2;
/// MAD-to-sigma conversion for a Gaussian, `sqrt(pi / 2)`.
const SQRT_PI_OVER_2: f64 = 1.253_314_137_315_500_3;

/// Robust scale estimate of residuals.
///
/// Tracks EMAs of `|r|` and `r^2`; the reported sigma averages the
/// MAD-derived and RMS-derived scales.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoiseMeter {
    abs_avg: Option<f64>,
    sq_avg: Option<f64>,
}

impl NoiseMeter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, residual: f64) {
        let ar = residual.abs();
        let r2 = residual * residual;
        self.abs_avg = Some(blend(self.abs_avg, ar));
        self.sq_avg = Some(blend(self.sq_avg, r2));
    }

    pub fn sigma(&self) -> Option<f64> {
        let from_mad = self.abs_avg.map(|a| a * SQRT_PI_OVER_2);
        let from_rms = self.sq_avg.map(f64::sqrt);
        match (from_mad, from_rms) {
            (Some(a), Some(b)) => Some(0.5 * (a + b)),
            (a, b) => a.or(b),
        }
    }
}

#[inline]
fn blend(prev: Option<f64>, x: f64) -> f64 {
    match prev {
        None => x,
        Some(p) => SMOOTHING * x + (1.0 - SMOOTHING) * p,
    }
}

impl Estimator for NoiseMeter {
    #[inline]
    fn add(&mut self, v: f64) {
        if v.is_finite() {
            self.push(v);
        }
    }

    #[inline]
    fn estimation(&self) -> Option<f64> {
        self.sigma()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_before_any_sample() {
        assert!(NoiseMeter::new().sigma().is_none());
    }

    #[test]
    fn first_sample_averages_both_scales() {
        let mut m = NoiseMeter::new();
        m.push(-2.0);
        let want = 0.5 * (2.0 * SQRT_PI_OVER_2 + 2.0);
        assert!((m.sigma().unwrap() - want).abs() < 1e-12);
    }

    #[test]
    fn zero_residuals_give_zero_sigma() {
        let mut m = NoiseMeter::new();
        for _ in 0..10 {
            m.push(0.0);
        }
        assert_eq!(m.sigma(), Some(0.0));
    }

    #[test]
    fn tracks_scale_of_symmetric_noise() {
        let mut m = NoiseMeter::new();
        for i in 0..200 {
            m.push(if i % 2 == 0 { 1.0 } else { -1.0 });
        }
        let s = m.sigma().unwrap();
        // |r| = 1 everywhere: MAD scale is 1.2533, RMS scale is 1.0
        assert!((s - 0.5 * (SQRT_PI_OVER_2 + 1.0)).abs() < 1e-9, "s={s}");
    }

    #[test]
    fn spike_decays_geometrically() {
        let mut m = NoiseMeter::new();
        m.push(0.0);
        m.push(10.0);
        let high = m.sigma().unwrap();
        for _ in 0..30 {
            m.push(0.0);
        }
        let low = m.sigma().unwrap();
        assert!(low < high * 0.05, "high={high}, low={low}");
    }
}
