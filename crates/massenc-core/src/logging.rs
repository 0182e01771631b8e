//! Logging init: stderr by default, optional file under the XDG state dir.

use anyhow::Result;
use std::fs;
use std::io;
use std::path::PathBuf;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::EnvFilter;

fn default_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,massenc_core=debug"))
}

/// Initialize logging to stderr. Progress lines (elapsed budget, ETA, stop
/// reasons) flow through this subscriber.
pub fn init_stderr() {
    tracing_subscriber::fmt()
        .with_env_filter(default_filter())
        .with_writer(io::stderr)
        .with_ansi(false)
        .init();
}

/// Writer that is either a file or stderr (used when file clone fails).
enum FileOrStderr {
    File(std::fs::File),
    Stderr,
}

impl io::Write for FileOrStderr {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            FileOrStderr::File(f) => f.write(buf),
            FileOrStderr::Stderr => io::stderr().lock().write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            FileOrStderr::File(f) => f.flush(),
            FileOrStderr::Stderr => io::stderr().lock().flush(),
        }
    }
}

/// Initialize logging to `~/.local/state/massenc/massenc.log` (append).
/// Returns Err when the state dir is unusable so the caller can fall back to
/// [`init_stderr`].
pub fn init_file() -> Result<()> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("massenc")?;
    let log_dir = xdg_dirs.get_state_home();

    fs::create_dir_all(&log_dir)?;
    let log_file_path: PathBuf = log_dir.join("massenc.log");

    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_file_path)?;

    struct FileMakeWriter(std::fs::File);

    impl<'a> MakeWriter<'a> for FileMakeWriter {
        type Writer = FileOrStderr;

        fn make_writer(&'a self) -> Self::Writer {
            self.0
                .try_clone()
                .map(FileOrStderr::File)
                .unwrap_or(FileOrStderr::Stderr)
        }
    }

    let writer: BoxMakeWriter = BoxMakeWriter::new(FileMakeWriter(file));

    tracing_subscriber::fmt()
        .with_env_filter(default_filter())
        .with_writer(writer)
        .with_ansi(false)
        .init();

    tracing::info!("massenc logging initialized at {}", log_file_path.display());

    Ok(())
}
