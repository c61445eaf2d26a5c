/// Exponential moving average of seconds-per-unit, seeded with a cold-start
/// pace so it is available before the first observation.
#[derive(Debug, Clone, Copy)]
pub struct PaceEma {
    value: f64,
    samples: u32,
}

impl PaceEma {
    pub fn new(cold_start: f64) -> Self {
        Self {
            value: cold_start,
            samples: 0,
        }
    }

    #[inline]
    pub fn push(&mut self, x: f64, alpha: f64) {
        self.value = alpha * x + (1.0 - alpha) * self.value;
        self.samples = self.samples.saturating_add(1);
    }

    #[inline]
    pub fn value(&self) -> f64 {
        self.value
    }

    #[inline]
    pub fn samples(&self) -> u32 {
        self.samples
    }
}
