//! Courtside CLI — find rallies and sample moments in volleyball video.
//!
//! Usage:
//!   courtside analyze <VIDEO>   Detect play events (interval or rally mode)
//!   courtside probe <VIDEO>     Show stream properties
//!   courtside check             Check external tools and credentials
//!   courtside config [--init]   Show or create the configuration file

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use courtside_common::config::AppConfig;

mod commands;

#[derive(Parser)]
#[command(
    name = "courtside",
    about = "Volleyball video analysis: rally detection and coaching feedback",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Detect play events in a video
    Analyze(commands::analyze::AnalyzeArgs),

    /// Show stream properties of a video
    Probe {
        /// Path to the video file
        path: PathBuf,
    },

    /// Check that ffmpeg, ffprobe, and feedback credentials are available
    Check,

    /// Print the effective configuration
    Config {
        /// Write the default configuration file if none exists
        #[arg(long)]
        init: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // A missing .env is the normal case.
    dotenvy::dotenv().ok();

    let config = AppConfig::load();

    let mut logging = config.logging.clone();
    if cli.verbose {
        logging.level = "debug".to_string();
    }
    courtside_common::logging::init_logging(&logging);

    match cli.command {
        Commands::Analyze(args) => commands::analyze::run(args, &config).await,
        Commands::Probe { path } => commands::probe::run(path),
        Commands::Check => commands::check::run(&config),
        Commands::Config { init } => commands::config::run(&config, init),
    }
}
