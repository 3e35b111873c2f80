use clap::{Parser, Subcommand};
use pgn_dataset::convert::{convert, ConvertCommand};
use pgn_dataset::convert_dir::{convert_dir, ConvertDirCommand};
use pgn_dataset::inspect::{inspect, InspectCommand};

#[derive(Parser)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Converts a .pgn/.pgn.zst file or URL into a .npy training dataset
    Convert(ConvertCommand),
    /// Converts every unconverted game file in a directory, in parallel
    ConvertDir(ConvertDirCommand),
    /// Prints turn, check, castling and legal-move details for a FEN
    Inspect(InspectCommand),
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();

    let args = Cli::parse();

    match args.command {
        Commands::Convert(cmd) => convert(cmd),
        Commands::ConvertDir(cmd) => convert_dir(cmd),
        Commands::Inspect(cmd) => inspect(cmd),
    }
}
