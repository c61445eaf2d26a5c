const INITIAL_COVARIANCE: f64 = 1e6;
const RESIDUAL_BLEND: f64 = 0.1;

/// Symmetric 2x2 matrix stored row-major.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Mat2 {
    m: [[f64; 2]; 2],
}

impl Mat2 {
    fn diagonal(v: f64) -> Self {
        Self {
            m: [[v, 0.0], [0.0, v]],
        }
    }

    #[inline]
    fn mul_vec(&self, x: [f64; 2]) -> [f64; 2] {
        [
            self.m[0][0] * x[0] + self.m[0][1] * x[1],
            self.m[1][0] * x[0] + self.m[1][1] * x[1],
        ]
    }

    #[inline]
    fn symmetrize(&mut self) {
        let off = 0.5 * (self.m[0][1] + self.m[1][0]);
        self.m[0][1] = off;
        self.m[1][0] = off;
    }
}

/// Recursive least squares fit of `elapsed ≈ a + b * done`.
///
/// The forgetting factor `lambda < 1` discounts old observations so the fit
/// follows a changing pace. Residual variance is an EMA of squared prediction
/// errors.
#[derive(Debug, Clone, Copy)]
pub struct ProgressTrend {
    a: f64,
    b: f64,
    p: Mat2,
    residual_variance: Option<f64>,
    lambda: f64,
}

impl ProgressTrend {
    pub fn new(lambda: f64) -> Self {
        Self {
            a: 0.0,
            b: 1.0,
            p: Mat2::diagonal(INITIAL_COVARIANCE),
            residual_variance: None,
            lambda,
        }
    }

    #[inline]
    pub fn intercept(&self) -> f64 {
        self.a
    }

    #[inline]
    pub fn slope(&self) -> f64 {
        self.b
    }

    #[inline]
    pub fn residual_variance(&self) -> Option<f64> {
        self.residual_variance
    }

    /// Incorporates one observation of elapsed time `y` at regressors `x`.
    pub fn update(&mut self, x0: f64, x1: f64, y: f64) {
        let x = [x0, x1];
        let px = self.p.mul_vec(x);
        let denom = self.lambda + (x[0] * px[0] + x[1] * px[1]);
        let gain = [px[0] / denom, px[1] / denom];

        let error = y - (self.a * x[0] + self.b * x[1]);
        self.a += gain[0] * error;
        self.b += gain[1] * error;

        // xᵀP, row vector
        let xp = [
            x[0] * self.p.m[0][0] + x[1] * self.p.m[1][0],
            x[0] * self.p.m[0][1] + x[1] * self.p.m[1][1],
        ];
        for (i, g) in gain.iter().enumerate() {
            for (j, v) in xp.iter().enumerate() {
                self.p.m[i][j] = (self.p.m[i][j] - g * v) / self.lambda;
            }
        }
        self.p.symmetrize();

        let sq = error * error;
        self.residual_variance = Some(match self.residual_variance {
            None => sq,
            Some(prev) => RESIDUAL_BLEND * sq + (1.0 - RESIDUAL_BLEND) * prev,
        });
    }

    /// Predicted elapsed time when `done` units are complete.
    #[inline]
    pub fn predict(&self, done: f64) -> f64 {
        self.a + self.b * done
    }

    /// `xᵀ P x`, the predictive variance multiplier at `x`.
    #[inline]
    pub fn leverage(&self, x0: f64, x1: f64) -> f64 {
        let px = self.p.mul_vec([x0, x1]);
        x0 * px[0] + x1 * px[1]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_with_identity_prior_and_no_residuals() {
        let t = ProgressTrend::new(0.995);
        assert_eq!(t.intercept(), 0.0);
        assert_eq!(t.slope(), 1.0);
        assert!(t.residual_variance().is_none());
        assert_eq!(t.leverage(1.0, 0.0), INITIAL_COVARIANCE);
    }

    #[test]
    fn recovers_exact_line() {
        let mut t = ProgressTrend::new(0.995);
        for k in 1..=20 {
            let done = k as f64;
            t.update(1.0, done, 0.5 + 0.025 * done);
        }
        assert!((t.slope() - 0.025).abs() < 1e-3, "b={}", t.slope());
        assert!((t.intercept() - 0.5).abs() < 1e-2, "a={}", t.intercept());
        assert!((t.predict(40.0) - 1.5).abs() < 0.05);
    }

    #[test]
    fn covariance_stays_symmetric() {
        let mut t = ProgressTrend::new(0.98);
        for k in 1..=50 {
            let done = k as f64;
            let noise = if k % 3 == 0 { 0.01 } else { -0.005 };
            t.update(1.0, done, 0.1 * done + noise);
            assert_eq!(t.p.m[0][1], t.p.m[1][0]);
        }
    }

    #[test]
    fn leverage_grows_with_extrapolation() {
        let mut t = ProgressTrend::new(0.995);
        for k in 1..=10 {
            t.update(1.0, k as f64, 0.05 * k as f64);
        }
        assert!(t.leverage(1.0, 40.0) > t.leverage(1.0, 5.0));
    }

    #[test]
    fn residual_variance_decays_on_clean_fit() {
        let mut t = ProgressTrend::new(0.995);
        for k in 1..=60 {
            t.update(1.0, k as f64, 0.2 * k as f64);
        }
        let rv = t.residual_variance().unwrap();
        assert!(rv < 1e-2, "rv={rv}");
    }
}
