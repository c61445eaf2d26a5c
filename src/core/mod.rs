pub mod error;
pub mod options;
pub mod snapshot;
pub mod time_source;

pub use error::EtaError;
pub use options::Options;
pub use snapshot::Snapshot;
pub use time_source::{MonotonicClock, TimeSource};
