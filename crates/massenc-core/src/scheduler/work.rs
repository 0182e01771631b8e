//! Work items and run outcomes shared by both execution strategies.

use std::fmt;

/// An opaque, zero-argument, failable unit of scheduled work. The scheduler
/// invokes it exactly once and never looks inside; identity is the item's
/// position in the work list, the label exists only for log lines.
pub struct WorkItem {
    label: String,
    op: Box<dyn FnOnce() -> anyhow::Result<()> + Send>,
}

impl WorkItem {
    pub fn new<F>(label: impl Into<String>, op: F) -> Self
    where
        F: FnOnce() -> anyhow::Result<()> + Send + 'static,
    {
        Self {
            label: label.into(),
            op: Box::new(op),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Execute the item, consuming it.
    pub fn run(self) -> anyhow::Result<()> {
        (self.op)()
    }
}

impl fmt::Debug for WorkItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkItem").field("label", &self.label).finish()
    }
}

/// Terminal state of one `run_all` invocation. Deadline and cancellation
/// stops are deliberate operator-requested outcomes, not errors; the caller
/// decides what they mean for the process exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// Every chunk was dispatched and joined.
    Completed,
    /// The wall-clock budget expired at a checkpoint; remaining work was
    /// abandoned.
    StoppedByDeadline,
    /// The stop file was found (and consumed) at a checkpoint; remaining
    /// work was abandoned.
    StoppedByCancellation,
}

/// What one run did. `completed + failed` counts items that actually ran;
/// items after a stop checkpoint are neither.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub outcome: RunOutcome,
    pub completed: usize,
    pub failed: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn work_item_runs_its_operation() {
        let item = WorkItem::new("noop", || Ok(()));
        assert_eq!(item.label(), "noop");
        assert!(item.run().is_ok());
    }

    #[test]
    fn work_item_surfaces_failure() {
        let item = WorkItem::new("broken", || anyhow::bail!("encoder exited with 1"));
        let err = item.run().unwrap_err();
        assert!(err.to_string().contains("encoder exited"));
    }
}
