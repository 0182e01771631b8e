//! Elapsed-run clock and deadline check.
//!
//! One clock is started when the run begins and shared by every checkpoint,
//! so the artwork pre-pass and the main conversion pass count against the
//! same wall-clock budget.

use std::time::{Duration, Instant};

/// Wall-clock timer for one run. Cheap to copy; all copies share the same
/// start instant.
#[derive(Debug, Clone, Copy)]
pub struct RunClock {
    started: Instant,
}

impl RunClock {
    /// Start the clock now.
    pub fn start() -> Self {
        Self {
            started: Instant::now(),
        }
    }

    /// Time elapsed since the clock was started.
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Whether the run has exceeded `limit`. `None` never expires.
    /// Logs elapsed minutes on every check so long runs leave a trace even
    /// when nothing else is happening.
    pub fn expired(&self, limit: Option<Duration>) -> bool {
        let elapsed = self.elapsed();
        let elapsed_min = elapsed.as_secs() / 60;
        match limit {
            Some(limit) if elapsed > limit => {
                tracing::info!(
                    "elapsed time {} min exceeds budget of {} min",
                    elapsed_min,
                    limit.as_secs() / 60
                );
                true
            }
            Some(limit) => {
                tracing::info!("elapsed time {}/{} min", elapsed_min, limit.as_secs() / 60);
                false
            }
            None => {
                tracing::info!("elapsed time {} min", elapsed_min);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn no_limit_never_expires() {
        let clock = RunClock::start();
        assert!(!clock.expired(None));
    }

    #[test]
    fn within_limit_not_expired() {
        let clock = RunClock::start();
        assert!(!clock.expired(Some(Duration::from_secs(3600))));
    }

    #[test]
    fn past_limit_expires() {
        let clock = RunClock::start();
        thread::sleep(Duration::from_millis(10));
        assert!(clock.expired(Some(Duration::from_millis(1))));
    }

    #[test]
    fn copies_share_the_start_instant() {
        let clock = RunClock::start();
        let copy = clock;
        thread::sleep(Duration::from_millis(5));
        assert!(copy.elapsed() >= clock.elapsed().saturating_sub(Duration::from_millis(1)));
    }
}
