//! Rocket League hitbox preset extractor
//!
//! Reads per-car stat exports from the patch tester and writes one record per
//! car plus one record per hitbox preset.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use config::Config;
use hitbox_presets::MatchMode;
use rl_hitboxes::commands;
use rl_hitboxes::commands::process::ProcessConfig;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Rocket League hitbox preset extractor
#[derive(Parser)]
#[command(name = "rl-hitboxes")]
#[command(about = "Builds car records and hitbox presets from patch tester car stats")]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Process every car stat file into car and hitbox preset records
    Process {
        /// Patch tester results directory (defaults to `PATCH_RESULTS_DIR`)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output directory (defaults to `PROCESSED_RESULTS_DIR`)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Fractional digits in output numbers (defaults to `OUTPUT_PRECISION`)
        #[arg(short, long)]
        precision: Option<usize>,

        /// Group cars whose geometry differs by at most this much.
        /// Without it, geometry must match exactly.
        #[arg(short, long)]
        tolerance: Option<f64>,
    },

    /// Print the record for a single car stat file
    Show {
        /// Path to the stat file
        #[arg(short, long)]
        file: PathBuf,

        /// Fractional digits in output numbers (defaults to `OUTPUT_PRECISION`)
        #[arg(short, long)]
        precision: Option<usize>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing subscriber
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let mut config = Config::from_env()?;

    match cli.command {
        Commands::Process {
            input,
            output,
            precision,
            tolerance,
        } => {
            if let Some(input) = input {
                config.patch_results_dir = input;
            }
            let match_mode = match tolerance {
                Some(epsilon) => MatchMode::with_tolerance(epsilon)?,
                None => MatchMode::Exact,
            };
            let process_config = ProcessConfig {
                car_stats_dir: config.car_stats_dir(),
                output_dir: output.unwrap_or(config.processed_results_dir),
                precision: precision.unwrap_or(config.output_precision),
                match_mode,
            };

            if let MatchMode::Tolerance(epsilon) = process_config.match_mode {
                info!(epsilon, "Matching hitbox presets with tolerance");
            }

            commands::process::run(&process_config).await?;
        }
        Commands::Show { file, precision } => {
            let precision = precision.unwrap_or(config.output_precision);
            commands::show::run(&file, precision)?;
        }
    }

    Ok(())
}
