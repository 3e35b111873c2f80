use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use indicatif::{HumanCount, ProgressBar, ProgressStyle};

use crate::game_stream::GameStream;
use crate::report::{LogReporter, Reporter};
use crate::sample::sample_game;
use crate::schema::TrainingRow;
use crate::writer::DatasetWriter;

#[derive(Args)]
pub struct ConvertCommand {
    /// Path or URL of a .pgn or .pgn.zst file to read games
    #[arg(long, value_name = "input")]
    input: String,

    /// Output .npy file to write the examples
    #[arg(long, value_name = "output")]
    output: PathBuf,
}

/// Counters returned by a completed conversion.
pub struct ConvertStats {
    pub games: u64,
    pub rows: u64,
}

/// Opens a local path or an http(s) URL, decompressing zstd on the fly.
pub fn open_input(input: &str) -> Result<Box<dyn io::Read>> {
    // raw data stream (may be compressed)
    let raw_reader: Box<dyn io::Read> = if input.starts_with("http") {
        Box::new(
            reqwest::blocking::get(input)
                .and_then(|response| response.error_for_status())
                .with_context(|| format!("failed to fetch {}", input))?,
        )
    } else {
        Box::new(File::open(input).with_context(|| format!("failed to open {}", input))?)
    };

    // decompress if necessary
    Ok(if input.ends_with(".zst") {
        Box::new(zstd::Decoder::new(raw_reader)?)
    } else {
        raw_reader
    })
}

/// Converts one PGN source into one `.npy` dataset, at most one example
/// per game.
pub fn convert_file(
    input: &str,
    output: &Path,
    report: &dyn Reporter,
    progress: bool,
) -> Result<ConvertStats> {
    let reader = open_input(input)?;
    let mut writer = DatasetWriter::create(output, report)?;
    let mut rng = rand::thread_rng();

    let bar = if progress {
        ProgressBar::new_spinner().with_style(
            ProgressStyle::default_spinner()
                .template(
                    "{spinner:.green} [Elapsed {elapsed_precise}] [Games {human_pos} @ {per_sec}] {msg}",
                )
                .unwrap(),
        )
    } else {
        ProgressBar::hidden()
    };

    let mut games = 0;
    for record in GameStream::new(reader, report) {
        let record = record.with_context(|| format!("failed to read games from {}", input))?;
        games += 1;
        bar.inc(1);

        if let Some(example) = sample_game(&record, &mut rng, report) {
            writer.append(&TrainingRow::from(&example))?;
            bar.set_message(format!("[Examples {}]", HumanCount(writer.rows())));
        }
    }
    bar.finish();

    let rows = writer.finish()?;
    Ok(ConvertStats { games, rows })
}

pub fn convert(cmd: ConvertCommand) -> Result<()> {
    println!("Input: {}", cmd.input);
    println!("Output: {}", cmd.output.display());

    let stats = convert_file(&cmd.input, &cmd.output, &LogReporter, true)?;

    println!(
        "Done. Games: {}, examples: {}",
        stats.games, stats.rows
    );
    Ok(())
}
