pub mod jittered_pace;
pub mod manual_clock;

pub use jittered_pace::JitteredPace;
pub use manual_clock::ManualClock;
