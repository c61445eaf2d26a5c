/// Sigma values at or below this cannot down-weight anything.
const MIN_SIGMA: f64 = 1e-12;

/// Soft Huber weight of a residual given the current noise scale.
///
/// Returns `1.0` inside `cutoff * sigma` and `1 / t` beyond it, where `t` is
/// the residual in cutoff units. Outliers are shrunk, never discarded.
#[inline]
pub fn huber_weight(residual: f64, sigma: Option<f64>, cutoff: f64) -> f64 {
    let Some(sigma) = sigma.filter(|s| *s > MIN_SIGMA) else {
        return 1.0;
    };
    let t = residual.abs() / (cutoff * sigma);
    if t <= 1.0 { 1.0 } else { 1.0 / t }
}

/// Moves `base` toward `x` by `weight` of the distance.
#[inline]
pub fn shrink_toward(base: f64, x: f64, weight: f64) -> f64 {
    if weight >= 1.0 {
        x
    } else {
        base + weight * (x - base)
    }
}
