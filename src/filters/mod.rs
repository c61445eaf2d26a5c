mod pace_filter;

pub use pace_filter::{Adaptation, PaceFilter};
