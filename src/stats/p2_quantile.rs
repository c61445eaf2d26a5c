use crate::stats::Estimator;

const MARKERS: usize = 5;

/// Streaming quantile estimator (Jain & Chlamtac P² algorithm).
///
/// Keeps five markers whose middle height tracks quantile `p` in O(1) time
/// and memory. The first five samples only fill the markers; the estimate is
/// available from the fifth sample on.
#[derive(Debug, Clone)]
pub struct P2Quantile {
    p: f64,
    count: usize,
    heights: [f64; MARKERS],
    positions: [f64; MARKERS],
    desired: [f64; MARKERS],
    increments: [f64; MARKERS],
}

impl P2Quantile {
    pub fn new(p: f64) -> Self {
        Self {
            p,
            count: 0,
            heights: [0.0; MARKERS],
            positions: [1.0, 2.0, 3.0, 4.0, 5.0],
            desired: [1.0, 1.0 + 2.0 * p, 1.0 + 4.0 * p, 3.0 + 2.0 * p, 5.0],
            increments: [0.0, p / 2.0, p, (1.0 + p) / 2.0, 1.0],
        }
    }

    #[inline]
    pub fn target(&self) -> f64 {
        self.p
    }

    #[inline]
    pub fn count(&self) -> usize {
        self.count
    }

    pub fn push(&mut self, x: f64) {
        if self.count < MARKERS {
            self.heights[self.count] = x;
            self.count += 1;
            if self.count == MARKERS {
                self.heights.sort_by(f64::total_cmp);
            }
            return;
        }
        self.count += 1;

        let q = &mut self.heights;
        let k = if x < q[0] {
            q[0] = x;
            0
        } else if x >= q[4] {
            q[4] = x;
            3
        } else {
            (0..4).find(|&i| x < q[i + 1]).unwrap_or(3)
        };

        for n in &mut self.positions[k + 1..] {
            *n += 1.0;
        }
        for (d, inc) in self.desired.iter_mut().zip(self.increments) {
            *d += inc;
        }

        for i in 1..MARKERS - 1 {
            let d = self.desired[i] - self.positions[i];
            let n = &self.positions;
            if (d >= 1.0 && n[i + 1] - n[i] > 1.0) || (d <= -1.0 && n[i - 1] - n[i] < -1.0) {
                let s = d.signum();
                let candidate = self.parabolic(i, s);
                self.heights[i] = if self.heights[i - 1] < candidate && candidate < self.heights[i + 1]
                {
                    candidate
                } else {
                    self.linear(i, s)
                };
                self.positions[i] += s;
            }
        }
    }

    fn parabolic(&self, i: usize, s: f64) -> f64 {
        let q = &self.heights;
        let n = &self.positions;
        q[i] + s / (n[i + 1] - n[i - 1])
            * ((n[i] - n[i - 1] + s) * (q[i + 1] - q[i]) / (n[i + 1] - n[i])
                + (n[i + 1] - n[i] - s) * (q[i] - q[i - 1]) / (n[i] - n[i - 1]))
    }

    fn linear(&self, i: usize, s: f64) -> f64 {
        let j = if s > 0.0 { i + 1 } else { i - 1 };
        let q = &self.heights;
        let n = &self.positions;
        q[i] + s * (q[j] - q[i]) / (n[j] - n[i])
    }

    /// Current quantile estimate, `None` before five samples.
    #[inline]
    pub fn value(&self) -> Option<f64> {
        (self.count >= MARKERS).then_some(self.heights[2])
    }
}

impl Estimator for P2Quantile {
    #[inline]
    fn add(&mut self, v: f64) {
        if v.is_finite() {
            self.push(v);
        }
    }

    #[inline]
    fn estimation(&self) -> Option<f64> {
        self.value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn exact_quantile(xs: &mut [f64], p: f64) -> f64 {
        xs.sort_by(f64::total_cmp);
        let idx = ((xs.len() - 1) as f64 * p).round() as usize;
        xs[idx]
    }

    #[test]
    fn undefined_before_five_samples() {
        let mut q = P2Quantile::new(0.7);
        for x in [1.0, 2.0, 3.0, 4.0] {
            q.push(x);
            assert!(q.value().is_none());
        }
        q.push(5.0);
        assert_eq!(q.value(), Some(3.0));
    }

    #[test]
    fn initial_markers_are_sorted() {
        let mut q = P2Quantile::new(0.5);
        for x in [5.0, 1.0, 4.0, 2.0, 3.0] {
            q.push(x);
        }
        assert_eq!(q.heights, [1.0, 2.0, 3.0, 4.0, 5.0]);
    }

    #[test]
    fn constant_stream_stays_constant() {
        let mut q = P2Quantile::new(0.7);
        for _ in 0..500 {
            q.push(0.25);
        }
        assert_eq!(q.value(), Some(0.25));
    }

    #[test]
    fn tracks_uniform_quantile() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut q = P2Quantile::new(0.7);
        let mut all = Vec::new();
        for _ in 0..5000 {
            let x: f64 = rng.random_range(0.0..1.0);
            q.push(x);
            all.push(x);
        }
        let want = exact_quantile(&mut all, 0.7);
        let got = q.value().unwrap();
        assert!((got - want).abs() < 0.03, "got={got}, want={want}");
    }

    #[test]
    fn heavy_tail_barely_moves_the_estimate() {
        let mut q = P2Quantile::new(0.7);
        for i in 0..1000 {
            let x = if i % 50 == 49 { 100.0 } else { 1.0 + (i % 7) as f64 * 0.01 };
            q.push(x);
        }
        let got = q.value().unwrap();
        assert!(got > 0.99 && got < 1.1, "got={got}");
    }

    #[test]
    fn markers_remain_monotonic() {
        let mut rng = StdRng::seed_from_u64(99);
        let mut q = P2Quantile::new(0.9);
        for _ in 0..2000 {
            let x: f64 = rng.random_range(0.0..1.0f64).powi(3) * 10.0;
            q.push(x);
            if q.count() >= MARKERS {
                assert!(q.heights.windows(2).all(|w| w[0] <= w[1]), "{:?}", q.heights);
            }
        }
    }
}
