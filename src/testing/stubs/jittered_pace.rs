use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Seeded generator of per-unit durations around a base pace.
#[derive(Debug)]
pub struct JitteredPace {
    rng: StdRng,
    base: f64,
    jitter: f64,
}

impl JitteredPace {
    /// `jitter` is the relative half-width of the uniform noise, in `[0, 1)`.
    pub fn new(base: f64, jitter: f64, seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            base,
            jitter: jitter.clamp(0.0, 0.99),
        }
    }

    pub fn set_base(&mut self, base: f64) {
        self.base = base;
    }

    pub fn next_interval(&mut self) -> f64 {
        if self.jitter == 0.0 {
            return self.base;
        }
        let f: f64 = self.rng.random_range(-self.jitter..self.jitter);
        self.base * (1.0 + f)
    }
}
