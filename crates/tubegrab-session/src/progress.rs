//! Simulated progress shown while a conversion is in flight, driven only by
//! elapsed ticks.

use std::time::Duration;

pub const STAGES: [&str; 4] = [
    "Fetching video info",
    "Extracting media",
    "Converting format",
    "Preparing download",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressSequence {
    total: Duration,
    elapsed: Duration,
}

impl ProgressSequence {
    pub fn new(total: Duration) -> Self {
        Self {
            total,
            elapsed: Duration::ZERO,
        }
    }

    pub fn advance(&mut self, delta: Duration) {
        self.elapsed = (self.elapsed + delta).min(self.total);
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn percent(&self) -> u8 {
        if self.total.is_zero() {
            return 100;
        }
        let ratio = self.elapsed.as_nanos() * 100 / self.total.as_nanos();
        ratio.min(100) as u8
    }

    pub fn stage_index(&self) -> usize {
        (usize::from(self.percent()) * STAGES.len() / 100).min(STAGES.len() - 1)
    }

    pub fn stage(&self) -> &'static str {
        STAGES[self.stage_index()]
    }

    pub fn is_finished(&self) -> bool {
        self.percent() >= 100
    }
}
