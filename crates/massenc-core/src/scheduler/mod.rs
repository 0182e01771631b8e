//! Batch execution scheduler.
//!
//! Takes an ordered list of opaque work items and runs it either strictly
//! one-at-a-time ([`SequentialRunner`]) or in capped-concurrency chunks
//! ([`ChunkedRunner`]), enforcing a wall-clock budget and a stop-file
//! cancellation signal at every checkpoint and projecting remaining runtime
//! from the most recent chunk's throughput.
//!
//! Stops are not errors: a run ends in a typed [`RunOutcome`] and the caller
//! owns exit policy. The scheduler never retries, never reorders, and never
//! interrupts an item that has already started.

mod checkpoint;
mod chunked;
mod clock;
mod eta;
mod sequential;
mod stop;
mod work;

pub use checkpoint::{Checkpoint, StopReason};
pub use chunked::{ChunkedRunner, MAX_CHUNK_SIZE};
pub use clock::RunClock;
pub use eta::EtaEstimator;
pub use sequential::SequentialRunner;
pub use stop::StopFile;
pub use work::{RunOutcome, RunSummary, WorkItem};

use thiserror::Error;

/// Configuration rejected when constructing a strategy.
#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error("chunk size {requested} exceeds the hard cap of {max}")]
    ChunkTooLarge { requested: usize, max: usize },

    #[error("chunk size must be at least 1")]
    ChunkEmpty,

    #[error("failed to build worker pool")]
    Pool(#[from] rayon::ThreadPoolBuildError),
}

/// An execution strategy. A runner is single-use: `run_all` consumes it,
/// runs the whole list (or as much as the checkpoints allow), and reports
/// what happened.
pub trait Runner {
    fn run_all(self, items: Vec<WorkItem>) -> RunSummary;
}
