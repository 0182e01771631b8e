//! Command-line surface: argument parsing, config overrides, run wiring,
//! and exit policy.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Parser;

use massenc_core::config::{self, MassencConfig};
use massenc_core::convert::ConvertJob;
use massenc_core::plan;
use massenc_core::scheduler::{
    Checkpoint, ChunkedRunner, RunClock, RunOutcome, Runner, SequentialRunner, StopFile,
};

/// Mirror an audio library: encode lossless sources to AAC via an external
/// encoder, copy everything else, under an optional wall-clock budget.
#[derive(Debug, Parser)]
#[command(name = "massenc")]
#[command(about = "massenc: mass audio conversion with a wall-clock budget", long_about = None)]
pub struct Cli {
    /// Input directory, scanned recursively.
    pub input: PathBuf,

    /// Output directory; the input tree is mirrored here.
    pub output: PathBuf,

    /// Wall-clock budget in minutes; the run stops at the next checkpoint
    /// once exceeded.
    #[arg(short = 't', long)]
    pub timeout_minutes: Option<u64>,

    /// Worker threads for the parallel conversion pass.
    #[arg(long)]
    pub jobs: Option<usize>,

    /// Items per scheduler chunk (max 64).
    #[arg(long)]
    pub chunk_size: Option<usize>,

    /// Encoder binary for lossless sources.
    #[arg(long)]
    pub encoder: Option<PathBuf>,

    /// Run the conversion pass sequentially instead of chunked-parallel.
    #[arg(long)]
    pub sequential: bool,

    /// Log to the XDG state-dir file instead of stderr.
    #[arg(long)]
    pub log_file: bool,
}

fn apply_overrides(mut cfg: MassencConfig, cli: &Cli) -> MassencConfig {
    if let Some(timeout) = cli.timeout_minutes {
        cfg.timeout_minutes = Some(timeout);
    }
    if let Some(jobs) = cli.jobs {
        cfg.max_workers = jobs;
    }
    if let Some(chunk_size) = cli.chunk_size {
        cfg.chunk_size = chunk_size;
    }
    if let Some(encoder) = &cli.encoder {
        cfg.encoder = encoder.clone();
    }
    cfg
}

pub fn run(cli: Cli) -> Result<()> {
    let cfg = config::load_or_init()?;
    let cfg = apply_overrides(cfg, &cli);
    tracing::debug!("effective config: {:?}", cfg);

    if !cli.input.is_dir() {
        bail!("input directory does not exist: {}", cli.input.display());
    }
    std::fs::create_dir_all(&cli.output)
        .with_context(|| format!("creating output directory {}", cli.output.display()))?;
    // An encoder given as an explicit path must exist up front; a bare name
    // is resolved from PATH at spawn time.
    if cfg.encoder.components().count() > 1 && !cfg.encoder.exists() {
        bail!("encoder does not exist: {}", cfg.encoder.display());
    }

    let files = plan::scan_tree(&cli.input)?;
    let job = ConvertJob {
        output_root: cli.output.clone(),
        encoder: cfg.encoder.clone(),
    };
    let (artwork, main) = job.work_items(files);
    println!(
        "{} artwork file(s), {} conversion item(s)",
        artwork.len(),
        main.len()
    );

    let stop = StopFile::new(cli.output.join(&cfg.stop_file_name));
    println!("create '{}' to stop execution", stop.path().display());

    let clock = RunClock::start();
    let deadline = cfg.timeout_minutes.map(|m| Duration::from_secs(m * 60));
    if let Some(minutes) = cfg.timeout_minutes {
        tracing::info!("time budget set to {} minutes", minutes);
    }

    // Artwork first, sequentially: encodes in the main pass look for cover
    // files next to their outputs.
    let pre = SequentialRunner::new(Checkpoint::new(clock, deadline, Some(stop.clone())));
    let pre_summary = pre.run_all(artwork);

    let mut completed = pre_summary.completed;
    let mut failed = pre_summary.failed;
    let outcome = if pre_summary.outcome == RunOutcome::Completed {
        let checkpoint = Checkpoint::new(clock, deadline, Some(stop));
        let summary = if cli.sequential {
            SequentialRunner::new(checkpoint).run_all(main)
        } else {
            ChunkedRunner::new(checkpoint, cfg.chunk_size, cfg.max_workers)?.run_all(main)
        };
        completed += summary.completed;
        failed += summary.failed;
        summary.outcome
    } else {
        pre_summary.outcome
    };

    // Operator-requested stops are deliberate outcomes, not failures: every
    // arm below leaves the exit status at 0.
    match outcome {
        RunOutcome::Completed => {
            println!("done: {} item(s) processed, {} failed", completed, failed)
        }
        RunOutcome::StoppedByDeadline => println!(
            "stopped: time budget exceeded ({} item(s) processed, {} failed)",
            completed, failed
        ),
        RunOutcome::StoppedByCancellation => println!(
            "stopped: stop file consumed ({} item(s) processed, {} failed)",
            completed, failed
        ),
    }
    Ok(())
}
