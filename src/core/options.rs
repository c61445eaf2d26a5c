use crate::core::error::EtaError;
use schemars::{JsonSchema, Schema, schema_for};
use serde::{Deserialize, Serialize};

/// Tuning knobs for an [`EtaEstimator`](crate::EtaEstimator).
///
/// Every field has a default, and a partial JSON document deserializes with
/// the missing fields filled in from [`Options::default`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct Options {
    #[schemars(
        title = "Outlier Cutoff",
        description = "Huber threshold in multiples of the residual sigma",
        range(min = 0.0)
    )]
    pub outlier_cutoff: f64,

    #[schemars(
        title = "Noise Blend",
        description = "EMA factor of the pace filter's residual variance",
        range(min = 0.0, max = 1.0)
    )]
    pub noise_blend: f64,

    #[schemars(
        title = "Drift Factor",
        description = "Process noise of the pace filter as a multiple of the residual variance",
        range(min = 0.0)
    )]
    pub drift_factor: f64,

    #[schemars(
        title = "Forgetting Factor",
        description = "RLS lambda; below 1 emphasizes recent progress",
        range(min = 0.0, max = 1.0)
    )]
    pub forgetting_factor: f64,

    #[schemars(
        title = "EMA Alpha",
        description = "Steady-state smoothing rate of the pace EMA",
        range(min = 0.0, max = 1.0)
    )]
    pub ema_alpha: f64,

    #[schemars(
        title = "EMA Warmup Alpha",
        description = "Faster EMA rate used during warmup and after a regime shift",
        range(min = 0.0, max = 1.0)
    )]
    pub ema_alpha_warmup: f64,

    #[schemars(
        title = "Warmup Samples",
        description = "Observations before the EMA switches to its steady rate"
    )]
    pub warmup_samples: u32,

    #[schemars(
        title = "Max Drop Per Second",
        description = "Rate at which the displayed value may fall",
        range(min = 0.0)
    )]
    pub max_drop_per_second: f64,

    #[schemars(
        title = "Rise Grace",
        description = "Seconds after a displayed drop during which rises are held",
        range(min = 0.0)
    )]
    pub rise_grace_seconds: f64,

    #[schemars(
        title = "Rise Minimum Jump",
        description = "Smallest rise, in seconds, worth showing",
        range(min = 0.0)
    )]
    pub rise_min_jump: f64,

    #[schemars(
        title = "Cold Start Pace",
        description = "Seconds per unit seeding the pace EMA",
        range(min = 0.0)
    )]
    pub cold_start_sec_per_unit: f64,

    #[schemars(
        title = "Max Lag At End",
        description = "Floor of the tolerated display lag in seconds",
        range(min = 0.0)
    )]
    pub max_lag_at_end: f64,

    #[schemars(
        title = "Lag Slope",
        description = "Tolerated display lag per square root second of target",
        range(min = 0.0)
    )]
    pub lag_slope_sqrt: f64,

    #[schemars(
        title = "Near End Snap",
        description = "Target below which the display follows drops immediately",
        range(min = 0.0)
    )]
    pub near_end_snap_seconds: f64,

    #[schemars(
        title = "Quantile Target",
        description = "Quantile of seconds per unit tracked by the P2 estimator",
        range(min = 0.0, max = 1.0)
    )]
    pub quantile_target: f64,

    #[schemars(
        title = "Regime Alpha",
        description = "Smoothing of the regime detector's rolling mean and deviation",
        range(min = 0.0, max = 1.0)
    )]
    pub regime_alpha: f64,

    #[schemars(
        title = "Regime Threshold",
        description = "Deviation, in MAD multiples, that flags a regime shift",
        range(min = 0.0)
    )]
    pub regime_threshold: f64,

    #[schemars(
        title = "Regime Warmup Steps",
        description = "Events of fast adaptation after a detected shift"
    )]
    pub regime_warmup_steps: u32,

    #[schemars(
        title = "Max Drop Per Step",
        description = "Optional clamp on how far the value returned by a progress event may fall"
    )]
    pub max_drop_per_step: Option<f64>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            outlier_cutoff: 3.0,
            noise_blend: 0.15,
            drift_factor: 0.02,
            forgetting_factor: 0.995,
            ema_alpha: 0.12,
            ema_alpha_warmup: 0.37,
            warmup_samples: 20,
            max_drop_per_second: 1.0,
            rise_grace_seconds: 3.0,
            rise_min_jump: 2.0,
            cold_start_sec_per_unit: 0.4,
            max_lag_at_end: 2.0,
            lag_slope_sqrt: 0.5,
            near_end_snap_seconds: 8.0,
            quantile_target: 0.70,
            regime_alpha: 0.10,
            regime_threshold: 4.0,
            regime_warmup_steps: 8,
            max_drop_per_step: None,
        }
    }
}

impl Options {
    /// JSON Schema of the whole options document.
    pub fn schema() -> Schema {
        schema_for!(Options)
    }

    pub fn validate(&self) -> Result<(), EtaError> {
        unit_rate("noise_blend", self.noise_blend)?;
        unit_rate("forgetting_factor", self.forgetting_factor)?;
        unit_rate("ema_alpha", self.ema_alpha)?;
        unit_rate("ema_alpha_warmup", self.ema_alpha_warmup)?;
        unit_rate("regime_alpha", self.regime_alpha)?;

        positive("outlier_cutoff", self.outlier_cutoff)?;
        positive("regime_threshold", self.regime_threshold)?;
        positive("max_drop_per_second", self.max_drop_per_second)?;

        non_negative("drift_factor", self.drift_factor)?;
        non_negative("rise_grace_seconds", self.rise_grace_seconds)?;
        non_negative("rise_min_jump", self.rise_min_jump)?;
        non_negative("cold_start_sec_per_unit", self.cold_start_sec_per_unit)?;
        non_negative("max_lag_at_end", self.max_lag_at_end)?;
        non_negative("lag_slope_sqrt", self.lag_slope_sqrt)?;
        non_negative("near_end_snap_seconds", self.near_end_snap_seconds)?;

        if !(self.quantile_target > 0.0 && self.quantile_target < 1.0) {
            return Err(EtaError::option(
                "quantile_target",
                format!("must be in (0, 1), got {}", self.quantile_target),
            ));
        }
        if let Some(step) = self.max_drop_per_step {
            non_negative("max_drop_per_step", step)?;
        }
        Ok(())
    }
}

fn unit_rate(name: &'static str, v: f64) -> Result<(), EtaError> {
    if v.is_finite() && v > 0.0 && v <= 1.0 {
        Ok(())
    } else {
        Err(EtaError::option(name, format!("must be in (0, 1], got {v}")))
    }
}

fn positive(name: &'static str, v: f64) -> Result<(), EtaError> {
    if v.is_finite() && v > 0.0 {
        Ok(())
    } else {
        Err(EtaError::option(name, format!("must be positive, got {v}")))
    }
}

fn non_negative(name: &'static str, v: f64) -> Result<(), EtaError> {
    if v.is_finite() && v >= 0.0 {
        Ok(())
    } else {
        Err(EtaError::option(name, format!("must be non-negative, got {v}")))
    }
}
