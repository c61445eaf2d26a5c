use crate::core::TimeSource;
use std::sync::Mutex;

/// Hand-driven time source for deterministic tests.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Mutex<f64>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn at(seconds: f64) -> Self {
        Self {
            now: Mutex::new(seconds),
        }
    }

    pub fn advance(&self, seconds: f64) {
        let mut now = self.now.lock().unwrap();
        *now += seconds.max(0.0);
    }

    pub fn set(&self, seconds: f64) {
        let mut now = self.now.lock().unwrap();
        *now = now.max(seconds);
    }
}

impl TimeSource for ManualClock {
    fn now_seconds(&self) -> f64 {
        *self.now.lock().unwrap()
    }
}
