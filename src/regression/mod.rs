mod trend;

pub use trend::ProgressTrend;
