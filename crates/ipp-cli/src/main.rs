mod commands;
mod progress;
mod summary;

use anyhow::Result;
use clap::{Parser, Subcommand};
use ipp_core::kernel::MorphOp;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "ipp", about = "Per-pixel image kernels with pluggable execution strategies")]
#[command(version)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Mark pixels that differ from a reference image
    #[command(alias = "background_subtraction")]
    Subtract(commands::subtract::SubtractArgs),
    /// Grow the black region of black/white masks
    Erode(commands::morph::MorphArgs),
    /// Grow the white region of black/white masks
    Dilate(commands::morph::MorphArgs),
    /// Run a job described by a TOML file
    Run(commands::run::RunArgs),
    /// Print a default job config as TOML
    Config(commands::config::ConfigArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match &cli.command {
        Commands::Subtract(args) => commands::subtract::run(args),
        Commands::Erode(args) => commands::morph::run(args, MorphOp::Erode),
        Commands::Dilate(args) => commands::morph::run(args, MorphOp::Dilate),
        Commands::Run(args) => commands::run::run(args),
        Commands::Config(args) => commands::config::run(args),
    }
}
