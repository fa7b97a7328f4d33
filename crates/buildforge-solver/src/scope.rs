//! Search-level scope.

use std::time::{Duration, Instant};

/// Progress state of one optimization run, visible to terminations.
#[derive(Debug, Clone)]
pub struct SearchScope {
    start_time: Instant,
    processed: u64,
}

impl SearchScope {
    /// Starts the clock with `processed` combinations already accounted for.
    pub fn start(processed: u64) -> Self {
        Self {
            start_time: Instant::now(),
            processed,
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Combinations accounted for so far, pruned ones included.
    pub fn processed(&self) -> u64 {
        self.processed
    }

    /// Accounts for combinations that will never be enumerated.
    pub fn record_skipped(&mut self, count: u64) {
        self.processed += count;
    }

    #[inline]
    pub fn record_processed(&mut self) {
        self.processed += 1;
    }
}

impl Default for SearchScope {
    fn default() -> Self {
        Self::start(0)
    }
}
