//! Chunked strategy: bounded-concurrency execution with a full barrier per
//! chunk.
//!
//! The work list is partitioned into consecutive chunks of at most
//! [`MAX_CHUNK_SIZE`] items. Each chunk is checkpointed, dispatched into a
//! worker pool owned by the runner, and joined completely before the next
//! chunk starts. Chunk size controls checkpoint and ETA granularity; the
//! worker count controls real concurrency. A chunk larger than the worker
//! count simply queues inside the pool.

use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use super::checkpoint::Checkpoint;
use super::eta::EtaEstimator;
use super::work::{RunOutcome, RunSummary, WorkItem};
use super::{Runner, SchedulerError};

/// Hard upper bound on items per chunk.
pub const MAX_CHUNK_SIZE: usize = 64;

/// Capped-concurrency execution: per-chunk checkpoint, dispatch, barrier,
/// and throughput sample.
#[derive(Debug)]
pub struct ChunkedRunner {
    checkpoint: Checkpoint,
    chunk_size: usize,
    pool: rayon::ThreadPool,
}

impl ChunkedRunner {
    /// Build a runner with its own worker pool of `max_workers` threads
    /// (at least one). Chunk sizes outside `1..=MAX_CHUNK_SIZE` are rejected
    /// here, never clamped.
    pub fn new(
        checkpoint: Checkpoint,
        chunk_size: usize,
        max_workers: usize,
    ) -> Result<Self, SchedulerError> {
        if chunk_size == 0 {
            return Err(SchedulerError::ChunkEmpty);
        }
        if chunk_size > MAX_CHUNK_SIZE {
            return Err(SchedulerError::ChunkTooLarge {
                requested: chunk_size,
                max: MAX_CHUNK_SIZE,
            });
        }
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(max_workers.max(1))
            .thread_name(|i| format!("massenc-worker-{i}"))
            .build()?;
        Ok(Self {
            checkpoint,
            chunk_size,
            pool,
        })
    }

    /// Dispatch one chunk into the pool and wait for every item to finish.
    /// Returns the number of failed items. Panics are caught per item so the
    /// barrier can never hang and siblings are never torn down.
    fn run_chunk(&self, chunk: Vec<WorkItem>) -> usize {
        let failed = AtomicUsize::new(0);
        self.pool.scope(|scope| {
            for item in chunk {
                let failed = &failed;
                scope.spawn(move |_| {
                    let label = item.label().to_string();
                    match panic::catch_unwind(AssertUnwindSafe(|| item.run())) {
                        Ok(Ok(())) => {}
                        Ok(Err(err)) => {
                            tracing::error!("{}: {:#}", label, err);
                            failed.fetch_add(1, Ordering::Relaxed);
                        }
                        Err(_) => {
                            tracing::error!("{}: worker panicked", label);
                            failed.fetch_add(1, Ordering::Relaxed);
                        }
                    }
                });
            }
        });
        failed.into_inner()
    }
}

impl Runner for ChunkedRunner {
    fn run_all(self, items: Vec<WorkItem>) -> RunSummary {
        let total = items.len();
        let mut eta = EtaEstimator::new();
        let mut completed = 0;
        let mut failed = 0;
        // Items in fully joined chunks, counted in list order. Drives the
        // remaining-count for projections regardless of completion order
        // inside a chunk.
        let mut joined = 0;

        let mut queue = items.into_iter();
        loop {
            let chunk: Vec<WorkItem> = queue.by_ref().take(self.chunk_size).collect();
            if chunk.is_empty() {
                break;
            }
            if let Some(reason) = self.checkpoint.check() {
                tracing::info!("run stopped: {:?}", reason);
                return RunSummary {
                    outcome: reason.into(),
                    completed,
                    failed,
                };
            }

            let len = chunk.len();
            let started = Instant::now();
            let chunk_failed = self.run_chunk(chunk);
            let elapsed = started.elapsed();

            joined += len;
            failed += chunk_failed;
            completed += len - chunk_failed;

            eta.observe(len, elapsed);
            let remaining = total - joined;
            if remaining > 0 {
                match eta.project(remaining) {
                    Some(left) => tracing::info!(
                        "{} of {} item(s) done, about {} s remaining",
                        joined,
                        total,
                        left.as_secs()
                    ),
                    None => tracing::info!("{} of {} item(s) done", joined, total),
                }
            }
        }

        RunSummary {
            outcome: RunOutcome::Completed,
            completed,
            failed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::RunClock;

    fn unguarded() -> Checkpoint {
        Checkpoint::new(RunClock::start(), None, None)
    }

    #[test]
    fn chunk_size_over_cap_rejected() {
        let err = ChunkedRunner::new(unguarded(), 100, 4).unwrap_err();
        match err {
            SchedulerError::ChunkTooLarge { requested, max } => {
                assert_eq!(requested, 100);
                assert_eq!(max, MAX_CHUNK_SIZE);
            }
            other => panic!("expected ChunkTooLarge, got {other:?}"),
        }
    }

    #[test]
    fn chunk_size_zero_rejected() {
        assert!(matches!(
            ChunkedRunner::new(unguarded(), 0, 4),
            Err(SchedulerError::ChunkEmpty)
        ));
    }

    #[test]
    fn chunk_size_at_cap_accepted() {
        assert!(ChunkedRunner::new(unguarded(), MAX_CHUNK_SIZE, 4).is_ok());
    }

    #[test]
    fn zero_workers_means_one() {
        // Worker count is a floor of 1, not a validation error.
        let runner = ChunkedRunner::new(unguarded(), 8, 0).unwrap();
        assert_eq!(runner.pool.current_num_threads(), 1);
    }

    #[test]
    fn empty_work_list_completes() {
        let summary = ChunkedRunner::new(unguarded(), 8, 2)
            .unwrap()
            .run_all(Vec::new());
        assert_eq!(summary.outcome, RunOutcome::Completed);
        assert_eq!(summary.completed, 0);
        assert_eq!(summary.failed, 0);
    }
}
