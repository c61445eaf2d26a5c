mod shift_detector;

pub use shift_detector::{RegimeDetector, RegimeOverride};
