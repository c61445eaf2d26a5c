mod estimator;
mod predictors;

pub use estimator::EtaEstimator;
