//! Stop-file cancellation: a presence-only marker the operator creates to
//! end the run at the next checkpoint.
//!
//! The marker's contents are never read. Detection consumes the file, so one
//! `touch` produces exactly one stop event; a marker created during a chunk
//! only prevents *starting* new work, it never interrupts items in flight.

use std::fs;
use std::path::{Path, PathBuf};

/// Cancellation marker at a fixed filesystem path.
#[derive(Debug, Clone)]
pub struct StopFile {
    path: PathBuf,
}

impl StopFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Check for the marker; if present, remove it and return true.
    /// A failed removal is logged but still counts as a stop request.
    pub fn take(&self) -> bool {
        if !self.path.exists() {
            return false;
        }
        tracing::info!("stop file found: {}", self.path.display());
        if let Err(err) = fs::remove_file(&self.path) {
            tracing::warn!("could not remove stop file {}: {}", self.path.display(), err);
        }
        true
    }
}
