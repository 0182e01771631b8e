//! Checkpoint: the combined deadline + cancellation test both strategies run
//! before starting new work (per item for sequential, per chunk for chunked).

use std::time::Duration;

use super::clock::RunClock;
use super::stop::StopFile;
use super::work::RunOutcome;

/// Why a run stopped early. Both reasons are expected, operator-requested
/// conditions, never surfaced as errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    DeadlineExceeded,
    CancellationRequested,
}

impl From<StopReason> for RunOutcome {
    fn from(reason: StopReason) -> Self {
        match reason {
            StopReason::DeadlineExceeded => RunOutcome::StoppedByDeadline,
            StopReason::CancellationRequested => RunOutcome::StoppedByCancellation,
        }
    }
}

/// Deadline guard and cancellation signal evaluated together. The clock is
/// shared with the caller (copies observe the same start instant), so several
/// passes of one run drain the same budget.
#[derive(Debug, Clone)]
pub struct Checkpoint {
    clock: RunClock,
    deadline: Option<Duration>,
    stop: Option<StopFile>,
}

impl Checkpoint {
    pub fn new(clock: RunClock, deadline: Option<Duration>, stop: Option<StopFile>) -> Self {
        Self {
            clock,
            deadline,
            stop,
        }
    }

    /// Evaluate the guards. Deadline wins over cancellation when both hold,
    /// and a detected stop file is consumed as a side effect.
    pub fn check(&self) -> Option<StopReason> {
        if self.clock.expired(self.deadline) {
            return Some(StopReason::DeadlineExceeded);
        }
        if let Some(stop) = &self.stop {
            if stop.take() {
                return Some(StopReason::CancellationRequested);
            }
        }
        None
    }
}
