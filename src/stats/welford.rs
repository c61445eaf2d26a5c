use crate::stats::Estimator;

/// Welford's online mean/variance of seconds-per-unit.
#[derive(Debug, Default, Clone, Copy)]
pub struct Welford {
    count: u64,
    mean: f64,
    m2: f64,
}

impl Welford {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn push(&mut self, x: f64) {
        self.count += 1;
        let d = x - self.mean;
        self.mean += d / self.count as f64;
        self.m2 += d * (x - self.mean);
    }

    #[inline]
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Running mean, `None` before the first sample.
    #[inline]
    pub fn mean(&self) -> Option<f64> {
        (self.count > 0).then_some(self.mean)
    }

    /// Unbiased sample variance, `None` for fewer than two samples.
    #[inline]
    pub fn variance(&self) -> Option<f64> {
        (self.count >= 2).then(|| self.m2 / (self.count - 1) as f64)
    }
}

impl Estimator for Welford {
    #[inline]
    fn add(&mut self, v: f64) {
        if v.is_finite() {
            self.push(v);
        }
    }

    #[inline]
    fn estimation(&self) -> Option<f64> {
        self.mean()
    }
}
