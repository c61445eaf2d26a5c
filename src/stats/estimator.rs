/// Online scalar estimator fed one observation at a time.
///
/// Implementations accept values incrementally via [`add`](Estimator::add)
/// and expose the current estimate via [`estimation`](Estimator::estimation),
/// which is `None` until enough data has been seen.
pub trait Estimator {
    /// Incorporates a new observation.
    fn add(&mut self, v: f64);

    /// Returns the current estimate, if there is one.
    fn estimation(&self) -> Option<f64>;
}
