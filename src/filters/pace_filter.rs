const INITIAL_VARIANCE: f64 = 1.0;
const MIN_PROCESS_NOISE: f64 = 1e-12;
const MIN_MEASUREMENT_NOISE: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq)]
enum FilterState {
    Unset,
    Tracking {
        mean: f64,
        variance: f64,
        residual_variance: f64,
    },
}

/// Adaptation rates for one filter step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Adaptation {
    pub drift_factor: f64,
    pub noise_blend: f64,
}

/// Scalar Kalman filter over seconds-per-unit.
///
/// Pace is modelled as a slowly drifting latent value. Both noise terms are
/// derived from an EMA of squared innovations: `R` is that residual variance
/// and `Q = drift_factor * R`, so a larger drift factor trusts recent
/// observations more.
#[derive(Debug, Clone, Copy)]
pub struct PaceFilter {
    state: FilterState,
}

impl Default for PaceFilter {
    fn default() -> Self {
        Self {
            state: FilterState::Unset,
        }
    }
}

impl PaceFilter {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn has_value(&self) -> bool {
        matches!(self.state, FilterState::Tracking { .. })
    }

    #[inline]
    pub fn value(&self) -> Option<f64> {
        match self.state {
            FilterState::Tracking { mean, .. } => Some(mean),
            FilterState::Unset => None,
        }
    }

    #[inline]
    pub fn variance(&self) -> Option<f64> {
        match self.state {
            FilterState::Tracking { variance, .. } => Some(variance),
            FilterState::Unset => None,
        }
    }

    /// Feeds one (already robustly weighted) observation.
    pub fn update(&mut self, z: f64, rates: Adaptation) {
        self.state = match self.state {
            FilterState::Unset => FilterState::Tracking {
                mean: z,
                variance: INITIAL_VARIANCE,
                residual_variance: (0.01 * z * z + MIN_MEASUREMENT_NOISE).max(MIN_MEASUREMENT_NOISE),
            },
            FilterState::Tracking {
                mean,
                variance,
                residual_variance,
            } => {
                let innovation = z - mean;
                let residual_variance = (1.0 - rates.noise_blend) * residual_variance
                    + rates.noise_blend * innovation * innovation;
                let q = (rates.drift_factor * residual_variance).max(MIN_PROCESS_NOISE);
                let r = residual_variance.max(MIN_MEASUREMENT_NOISE);

                let predicted = variance + q;
                let gain = predicted / (predicted + r);
                FilterState::Tracking {
                    mean: mean + gain * innovation,
                    variance: (1.0 - gain) * predicted,
                    residual_variance,
                }
            }
        };
    }
}
