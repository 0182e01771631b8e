//! Input-tree scan and file classification.
//!
//! The planner mirrors the input tree's shape: every regular file is
//! classified by extension and mapped to a destination under the output
//! root. Ordering is the scan order (sorted by relative path), which the
//! scheduler treats as significant.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use walkdir::WalkDir;

/// How a source file is handled when mirroring the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    /// Lossless audio (`.flac`, `.flc`), encoded to AAC.
    Lossless,
    /// Already-lossy audio (`.mp3`, `.m4a`), copied as-is.
    Lossy,
    /// Cover images (`.jpg`, `.jpeg`), copied in the sequential pre-pass so
    /// they exist before the encodes that attach them.
    Artwork,
    /// Everything else, copied as-is.
    Other,
}

impl FileKind {
    /// Classify by extension, case-insensitive.
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match ext.as_deref() {
            Some("flac") | Some("flc") => FileKind::Lossless,
            Some("mp3") | Some("m4a") => FileKind::Lossy,
            Some("jpg") | Some("jpeg") => FileKind::Artwork,
            _ => FileKind::Other,
        }
    }
}

/// One file discovered under the input root.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub source: PathBuf,
    /// Path relative to the input root; determines output placement.
    pub relative: PathBuf,
    pub kind: FileKind,
}

impl SourceFile {
    /// Destination under `output_root`. Lossless sources map to `.m4a`,
    /// everything else keeps its name.
    pub fn output_path(&self, output_root: &Path) -> PathBuf {
        let mut out = output_root.join(&self.relative);
        if self.kind == FileKind::Lossless {
            out.set_extension("m4a");
        }
        out
    }
}

/// Recursively scan `input_root` and classify every regular file. Results
/// are sorted by relative path so the work-list order (and therefore chunk
/// membership) is deterministic across runs.
pub fn scan_tree(input_root: &Path) -> Result<Vec<SourceFile>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(input_root).follow_links(false) {
        let entry = entry.with_context(|| format!("walking {}", input_root.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let source = entry.into_path();
        let relative = source
            .strip_prefix(input_root)
            .with_context(|| format!("stripping {}", input_root.display()))?
            .to_path_buf();
        let kind = FileKind::from_path(&source);
        files.push(SourceFile {
            source,
            relative,
            kind,
        });
    }
    files.sort_by(|a, b| a.relative.cmp(&b.relative));
    Ok(files)
}
