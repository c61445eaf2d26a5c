use crate::core::Options;
use crate::filters::{Adaptation, PaceFilter};
use crate::fusion::{Candidate, MIN_VARIANCE, PredictorKind};
use crate::regime::{RegimeDetector, RegimeOverride};
use crate::regression::ProgressTrend;
use crate::stats::{
    Estimator, NoiseMeter, P2Quantile, PaceEma, Welford, huber_weight, shrink_toward,
};
use tracing::debug;

/// Nominal variance (s²) of the EMA candidate.
const EMA_NOMINAL_VARIANCE: f64 = 1.0;
/// Nominal variance (s²) of the quantile candidate once it is warmed up.
const QUANTILE_NOMINAL_VARIANCE: f64 = 0.25;
const REGIME_DRIFT_BOOST: f64 = 25.0;
const REGIME_BLEND_BOOST: f64 = 3.0;
const MAX_BOOSTED_BLEND: f64 = 0.9;

/// Every predictor fed by progress events, updated together.
#[derive(Debug, Clone)]
pub(crate) struct PredictorBank {
    stats: Welford,
    noise: NoiseMeter,
    pace: PaceFilter,
    trend: ProgressTrend,
    ema: PaceEma,
    quantile: P2Quantile,
    regime: RegimeDetector,
    regime_override: RegimeOverride,
}

impl PredictorBank {
    pub(crate) fn new(options: &Options) -> Self {
        Self {
            stats: Welford::new(),
            noise: NoiseMeter::new(),
            pace: PaceFilter::new(),
            trend: ProgressTrend::new(options.forgetting_factor),
            ema: PaceEma::new(options.cold_start_sec_per_unit),
            quantile: P2Quantile::new(options.quantile_target),
            regime: RegimeDetector::new(options.regime_alpha, options.regime_threshold),
            regime_override: RegimeOverride::default(),
        }
    }

    #[inline]
    pub(crate) fn pace_ema(&self) -> f64 {
        self.ema.value()
    }

    #[inline]
    pub(crate) fn pace_filtered(&self) -> Option<f64> {
        self.pace.value()
    }

    #[inline]
    pub(crate) fn regime_override_active(&self) -> bool {
        self.regime_override.is_active()
    }

    /// Feeds one seconds-per-unit observation taken when `done` units were
    /// complete after `elapsed` seconds.
    pub(crate) fn observe(&mut self, sec_per_unit: f64, done: f64, elapsed: f64, options: &Options) {
        let shifted = self.regime.is_shift(sec_per_unit);
        if shifted {
            debug!(
                sec_per_unit,
                window_mean = self.regime.window_mean(),
                window_mad = self.regime.window_mad(),
                "regime shift detected"
            );
        }
        self.regime_override.step(shifted, options.regime_warmup_steps);
        self.regime.push(sec_per_unit);
        let fast = self.regime_override.is_active();

        let base = self.stats.mean().unwrap_or(sec_per_unit);
        let residual = sec_per_unit - base;
        // a new regime is signal, not outliers
        let weight = if fast {
            1.0
        } else {
            huber_weight(residual, self.noise.estimation(), options.outlier_cutoff)
        };
        self.noise.add(residual);

        let robust = shrink_toward(base, sec_per_unit, weight);
        self.stats.add(robust);

        let pace_base = self.pace.value().unwrap_or(sec_per_unit);
        self.pace
            .update(shrink_toward(pace_base, sec_per_unit, weight), self.adaptation(fast, options));

        let alpha = if fast || self.ema.samples() < options.warmup_samples {
            options.ema_alpha_warmup
        } else {
            options.ema_alpha
        };
        self.ema.push(robust, alpha);

        self.quantile.add(sec_per_unit);
        self.trend.update(1.0, done, elapsed);
    }

    fn adaptation(&self, fast: bool, options: &Options) -> Adaptation {
        if fast {
            Adaptation {
                drift_factor: options.drift_factor * REGIME_DRIFT_BOOST,
                noise_blend: (options.noise_blend * REGIME_BLEND_BOOST).min(MAX_BOOSTED_BLEND),
            }
        } else {
            Adaptation {
                drift_factor: options.drift_factor,
                noise_blend: options.noise_blend,
            }
        }
    }

    /// Candidates for the remaining time of `total - done` units, `elapsed`
    /// seconds after the start.
    pub(crate) fn candidates(&self, total: f64, done: f64, elapsed: f64) -> Vec<Candidate> {
        let left = (total - done).max(0.0);
        let mut out = Vec::with_capacity(5);

        if let (Some(pace), Some(var)) = (self.pace.value(), self.pace.variance()) {
            if pace > 0.0 {
                out.push(Candidate::new(
                    PredictorKind::PaceFilter,
                    left * pace,
                    (left * left * var.max(MIN_VARIANCE)).max(MIN_VARIANCE),
                ));
            }
        }

        if let Some(rv) = self.trend.residual_variance() {
            let eta = (self.trend.predict(total) - elapsed).max(0.0);
            let leverage = self.trend.leverage(1.0, total).max(MIN_VARIANCE);
            out.push(Candidate::new(
                PredictorKind::Trend,
                eta,
                (rv * leverage).max(MIN_VARIANCE),
            ));
        }

        if let (Some(mean), Some(var)) = (self.stats.mean(), self.stats.variance()) {
            if mean > 0.0 {
                out.push(Candidate::new(
                    PredictorKind::Mean,
                    left * mean,
                    (var * left).max(MIN_VARIANCE),
                ));
            }
        }

        out.push(Candidate::new(
            PredictorKind::Ema,
            left * self.ema.value(),
            EMA_NOMINAL_VARIANCE,
        ));

        if let Some(q) = self.quantile.estimation() {
            out.push(Candidate::new(
                PredictorKind::Quantile,
                left * q,
                QUANTILE_NOMINAL_VARIANCE,
            ));
        }

        out
    }
}
