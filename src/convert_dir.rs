use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Args;
use log::{error, info, warn};
use rayon::prelude::*;

use crate::convert::convert_file;
use crate::report::LogReporter;

#[derive(Args)]
pub struct ConvertDirCommand {
    /// Directory with .pgn / .pgn.zst files to convert
    #[arg(long, value_name = "dir")]
    dir: PathBuf,

    /// Number of worker threads (defaults to one per core)
    #[arg(long, value_name = "threads")]
    threads: Option<usize>,
}

/// Counters for one directory run.
pub struct DirSummary {
    pub converted: usize,
    pub failed: usize,
}

/// Returns (input, output) pairs for every game file in `dir` whose output
/// does not exist yet. Outputs sit next to their inputs, with the game
/// extension replaced by `.npy`. Each output appears at most once: when a
/// stem carries both extensions, the first input claims it.
fn scan_directory(dir: &Path) -> Result<Vec<(String, PathBuf)>> {
    let mut pending = vec![];

    let entries =
        fs::read_dir(dir).with_context(|| format!("failed to read {}", dir.display()))?;
    for entry in entries {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }

        let name = entry.file_name();
        let name = match name.to_str() {
            Some(name) => name,
            None => continue,
        };

        let stem = name
            .strip_suffix(".pgn.zst")
            .or_else(|| name.strip_suffix(".pgn"));
        let stem = match stem {
            Some(stem) => stem,
            None => continue,
        };

        let output = dir.join(format!("{}.npy", stem));
        if output.exists() {
            // already converted on an earlier run
            continue;
        }

        let input = match entry.path().to_str() {
            Some(input) => input.to_string(),
            None => continue,
        };
        pending.push((input, output));
    }

    // read_dir order depends on the filesystem
    pending.sort();

    // a.pgn and a.pgn.zst map to the same a.npy; two workers must never
    // share a destination, so only the first input keeps its claim
    let mut claimed = HashSet::new();
    pending.retain(|(input, output)| {
        if claimed.insert(output.clone()) {
            return true;
        }
        warn!(
            "{}: output {} already claimed, skipping",
            input,
            output.display()
        );
        false
    });

    Ok(pending)
}

/// Converts every unconverted game file in `dir`, one worker per file.
///
/// Each file is attempted independently: a failing file is logged and
/// counted, never aborting its siblings. `threads` bounds the pool, `None`
/// uses one worker per core.
pub fn process_directory(dir: &Path, threads: Option<usize>) -> Result<DirSummary> {
    let pending = scan_directory(dir)?;
    info!(
        "Converting {} file(s) in {}",
        pending.len(),
        dir.display()
    );

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(threads.unwrap_or(0))
        .build()
        .context("failed to build worker pool")?;

    let failed = pool.install(|| {
        pending
            .par_iter()
            .filter_map(
                |(input, output)| match convert_file(input, output, &LogReporter, false) {
                    Ok(stats) => {
                        info!("{}: {} games, {} examples", input, stats.games, stats.rows);
                        None
                    }
                    Err(err) => {
                        error!("{}: {:#}", input, err);
                        Some(())
                    }
                },
            )
            .count()
    });

    Ok(DirSummary {
        converted: pending.len() - failed,
        failed,
    })
}

pub fn convert_dir(cmd: ConvertDirCommand) -> Result<()> {
    let summary = process_directory(&cmd.dir, cmd.threads)?;

    println!(
        "Done. Converted: {}, failed: {}",
        summary.converted, summary.failed
    );
    if summary.failed > 0 {
        bail!("{} file(s) failed to convert", summary.failed);
    }
    Ok(())
}
