mod commands;

use clap::{Parser, Subcommand};
use commands::points::points_command;
use commands::split::split_command;
use gpxsplit::DistanceUnit;
use std::error::Error;
use std::io;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "gpxsplit",
    version,
    about = "Compute distance, elapsed time and pace from GPX tracks"
)]
struct Cli {
    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Print total distance, elapsed time and average pace of a track")]
    Split {
        /// GPX file to read (`-` or omitted for stdin)
        file: Option<PathBuf>,

        /// Distance unit: mi or km
        #[arg(short, long, default_value = "mi")]
        unit: DistanceUnit,

        /// Distance the pace is reported per, in `unit`
        #[arg(long, default_value_t = 1.0)]
        per: f64,
    },
    #[command(about = "List the track points of a track, one per line")]
    Points {
        /// GPX file to read (`-` or omitted for stdin)
        file: Option<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    match cli.command {
        Commands::Split { file, unit, per } => split_command(file.as_deref(), unit, per),
        Commands::Points { file } => points_command(file.as_deref()),
    }
}
