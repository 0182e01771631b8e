//! Remaining-time projection from per-chunk throughput.
//!
//! Policy: the most recent chunk's instantaneous rate wins; there is no
//! historical averaging. A fresh sample tracks drifting item cost (a run of
//! large FLAC encodes followed by small copies) better than an average over
//! the whole run.

use std::time::Duration;

/// Throughput estimator fed after every completed chunk.
#[derive(Debug, Default)]
pub struct EtaEstimator {
    per_item: Option<Duration>,
}

impl EtaEstimator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a completed chunk of `items` that took `elapsed`.
    /// Chunks too fast to measure in whole seconds are discarded rather than
    /// producing an infinite rate.
    pub fn observe(&mut self, items: usize, elapsed: Duration) {
        if items == 0 || elapsed.as_secs() == 0 {
            return;
        }
        self.per_item = Some(elapsed / items as u32);
    }

    /// Projected time to finish `remaining` items, from the latest sample.
    /// None until a usable chunk has been observed.
    pub fn project(&self, remaining: usize) -> Option<Duration> {
        self.per_item.map(|per_item| per_item * remaining as u32)
    }
}
