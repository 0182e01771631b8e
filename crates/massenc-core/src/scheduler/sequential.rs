//! Sequential strategy: items run one at a time, in list order, with a
//! checkpoint before each. Used for work that must not overlap, such as the
//! artwork pre-pass that later encodes depend on.

use super::checkpoint::Checkpoint;
use super::work::{RunOutcome, RunSummary, WorkItem};
use super::Runner;

/// One-at-a-time execution with a per-item checkpoint.
#[derive(Debug)]
pub struct SequentialRunner {
    checkpoint: Checkpoint,
}

impl SequentialRunner {
    pub fn new(checkpoint: Checkpoint) -> Self {
        Self { checkpoint }
    }
}

impl Runner for SequentialRunner {
    fn run_all(self, items: Vec<WorkItem>) -> RunSummary {
        let mut completed = 0;
        let mut failed = 0;

        for item in items {
            if let Some(reason) = self.checkpoint.check() {
                tracing::info!("run stopped: {:?}", reason);
                return RunSummary {
                    outcome: reason.into(),
                    completed,
                    failed,
                };
            }
            let label = item.label().to_string();
            match item.run() {
                Ok(()) => completed += 1,
                Err(err) => {
                    tracing::error!("{}: {:#}", label, err);
                    failed += 1;
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
    use crate::scheduler::{RunClock, StopFile};
    use std::fs;
    use std::sync::{Arc, Mutex};

    fn unguarded() -> Checkpoint {
        Checkpoint::new(RunClock::start(), None, None)
    }

    #[test]
    fn runs_items_in_list_order() {
        let order = Arc::new(Mutex::new(Vec::new()));
        let items = (0..5)
            .map(|i| {
                let order = Arc::clone(&order);
                WorkItem::new(format!("item-{i}"), move || {
                    order.lock().unwrap().push(i);
                    Ok(())
                })
            })
            .collect();

        let summary = SequentialRunner::new(unguarded()).run_all(items);
        assert_eq!(summary.outcome, RunOutcome::Completed);
        assert_eq!(summary.completed, 5);
        assert_eq!(summary.failed, 0);
        assert_eq!(*order.lock().unwrap(), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn failure_is_counted_and_the_rest_still_runs() {
        let ran = Arc::new(Mutex::new(Vec::new()));
        let mut items = Vec::new();
        for i in 0..3 {
            let ran = Arc::clone(&ran);
            items.push(WorkItem::new(format!("item-{i}"), move || {
                ran.lock().unwrap().push(i);
                if i == 1 {
                    anyhow::bail!("copy failed");
                }
                Ok(())
            }));
        }

        let summary = SequentialRunner::new(unguarded()).run_all(items);
        assert_eq!(summary.outcome, RunOutcome::Completed);
        assert_eq!(summary.completed, 2);
        assert_eq!(summary.failed, 1);
        assert_eq!(*ran.lock().unwrap(), vec![0, 1, 2]);
    }

    #[test]
    fn stop_file_created_by_an_item_halts_before_the_next() {
        let dir = tempfile::tempdir().unwrap();
        let marker = dir.path().join("massenc.stop");

        let marker_for_item = marker.clone();
        let late = Arc::new(Mutex::new(false));
        let late_flag = Arc::clone(&late);
        let items = vec![
            WorkItem::new("creates-marker", move || {
                fs::write(&marker_for_item, b"")?;
                Ok(())
            }),
            WorkItem::new("never-runs", move || {
                *late_flag.lock().unwrap() = true;
                Ok(())
            }),
        ];

        let checkpoint = Checkpoint::new(RunClock::start(), None, Some(StopFile::new(&marker)));
        let summary = SequentialRunner::new(checkpoint).run_all(items);
        assert_eq!(summary.outcome, RunOutcome::StoppedByCancellation);
        assert_eq!(summary.completed, 1);
        assert!(!*late.lock().unwrap());
        assert!(!marker.exists());
    }
}
