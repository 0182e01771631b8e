//! Conversion actions and work-item assembly.
//!
//! This is the caller side of the scheduler contract: it turns scanned
//! source files into labeled, self-contained work items. The scheduler never
//! learns what an item does; everything format- or encoder-specific lives
//! here.
//!
//! Outputs are idempotent: an existing destination is left alone (timestamps
//! are refreshed from the source), so an interrupted run can be resumed by
//! running the tool again.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{bail, Context, Result};

use crate::plan::{FileKind, SourceFile};
use crate::scheduler::WorkItem;

/// Folder artwork filename the encoder attaches to encodes.
pub const COVER_FILE_NAME: &str = "cover.jpg";

/// Settings shared by every item of one conversion run.
#[derive(Debug, Clone)]
pub struct ConvertJob {
    pub output_root: PathBuf,
    /// External AAC encoder binary (qaac-compatible argument syntax).
    pub encoder: PathBuf,
}

impl ConvertJob {
    /// Turn a scan into work lists: the sequential artwork pre-pass and the
    /// main pass, each preserving scan order.
    pub fn work_items(&self, files: Vec<SourceFile>) -> (Vec<WorkItem>, Vec<WorkItem>) {
        let mut artwork = Vec::new();
        let mut main = Vec::new();
        for file in files {
            let label = file.relative.display().to_string();
            let job = self.clone();
            let is_artwork = file.kind == FileKind::Artwork;
            let item = WorkItem::new(label, move || job.handle(&file));
            if is_artwork {
                artwork.push(item);
            } else {
                main.push(item);
            }
        }
        (artwork, main)
    }

    /// Process one source file according to its kind.
    pub fn handle(&self, file: &SourceFile) -> Result<()> {
        if !file.source.exists() {
            bail!("source file is missing: {}", file.source.display());
        }
        let dest = file.output_path(&self.output_root);
        match file.kind {
            FileKind::Lossless => self.encode(file, &dest),
            FileKind::Lossy | FileKind::Artwork | FileKind::Other => {
                copy_file(&file.source, &dest)
            }
        }
    }

    /// Encode a lossless source to AAC via the external encoder. An existing
    /// output only gets its timestamps refreshed; folder artwork next to the
    /// output is attached when present.
    fn encode(&self, file: &SourceFile, dest: &Path) -> Result<()> {
        if dest.exists() {
            return copy_timestamps(&file.source, dest);
        }
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }

        let cover = folder_cover(dest);
        let args = encoder_args(&file.source, dest, cover.as_deref());
        tracing::info!("encode {}", file.relative.display());
        let status = Command::new(&self.encoder)
            .args(&args)
            .status()
            .with_context(|| format!("spawning encoder {}", self.encoder.display()))?;
        if !status.success() {
            bail!(
                "encoder exited with {} for {}",
                status,
                file.source.display()
            );
        }
        copy_timestamps(&file.source, dest)
    }
}

/// Encoder argument list: `<source> -o <dest> [--artwork <cover>]`.
pub fn encoder_args(source: &Path, dest: &Path, cover: Option<&Path>) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec![
        source.as_os_str().to_owned(),
        "-o".into(),
        dest.as_os_str().to_owned(),
    ];
    if let Some(cover) = cover {
        args.push("--artwork".into());
        args.push(cover.as_os_str().to_owned());
    }
    args
}

/// `cover.jpg` in the destination's directory, if present.
fn folder_cover(dest: &Path) -> Option<PathBuf> {
    let cover = dest.parent()?.join(COVER_FILE_NAME);
    cover.exists().then_some(cover)
}

/// Copy `source` to `dest`, creating parent directories. An existing
/// destination is kept (its timestamps are refreshed from the source).
pub fn copy_file(source: &Path, dest: &Path) -> Result<()> {
    if dest.exists() {
        return copy_timestamps(source, dest);
    }
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent).with_context(|| format!("creating {}", parent.display()))?;
    }
    tracing::debug!("copy {} -> {}", source.display(), dest.display());
    fs::copy(source, dest)
        .with_context(|| format!("copying {} to {}", source.display(), dest.display()))?;
    copy_timestamps(source, dest)
}

/// Propagate the source's modification and access times to the destination,
/// so the mirrored tree sorts and syncs like the original.
pub fn copy_timestamps(source: &Path, dest: &Path) -> Result<()> {
    let meta = fs::metadata(source)
        .with_context(|| format!("reading metadata of {}", source.display()))?;
    let mut times = fs::FileTimes::new();
    if let Ok(modified) = meta.modified() {
        times = times.set_modified(modified);
    }
    if let Ok(accessed) = meta.accessed() {
        times = times.set_accessed(accessed);
    }
    let dest_file = fs::OpenOptions::new()
        .write(true)
        .open(dest)
        .with_context(|| format!("opening {}", dest.display()))?;
    dest_file
        .set_times(times)
        .with_context(|| format!("setting times on {}", dest.display()))?;
    Ok(())
}
