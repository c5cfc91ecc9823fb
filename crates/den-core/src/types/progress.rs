use serde::{Deserialize, Serialize};

/// One progress snapshot of a long-running operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Progress {
    pub done: u64,
    pub total: u64,
}

impl Progress {
    pub fn new(done: u64, total: u64) -> Self {
        Self { done, total }
    }

    pub fn is_complete(&self) -> bool {
        self.done == self.total
    }

    /// Completion ratio in `0.0..=1.0`; an empty operation counts as complete.
    pub fn ratio(&self) -> f64 {
        if self.total == 0 {
            1.0
        } else {
            (self.done as f64 / self.total as f64).min(1.0)
        }
    }
}
