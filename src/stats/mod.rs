mod estimator;
mod noise_meter;
mod p2_quantile;
mod pace_ema;
mod robust;
mod welford;

pub use estimator::Estimator;
pub use noise_meter::NoiseMeter;
pub use p2_quantile::P2Quantile;
pub use pace_ema::PaceEma;
pub use robust::{huber_weight, shrink_toward};
pub use welford::Welford;
