//! Example: Process the configured patch tester results.
//!
//! Usage:
//!   cargo run --example process
//!
//! Environment Variables:
//!   `PATCH_RESULTS_DIR`     - Patch tester results root (default: `../RocketLeaguePatchTesterResults`)
//!   `PROCESSED_RESULTS_DIR` - Output root (default: `../ProcessedPatchTesterResults`)
//!   `OUTPUT_PRECISION`      - Fractional digits in output numbers (default: 2)
//!   `TOLERANCE`             - Match presets within this tolerance (default: exact matching)

use anyhow::{Context, Result};
use config::Config;
use hitbox_presets::MatchMode;
use rl_hitboxes::commands;
use rl_hitboxes::commands::process::ProcessConfig;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new("info"))
        .init();

    let config = Config::from_env()?;
    let tolerance: Option<f64> = std::env::var("TOLERANCE")
        .ok()
        .map(|raw| {
            raw.trim()
                .parse::<f64>()
                .context("TOLERANCE is not a number")
        })
        .transpose()?;
    let match_mode = match tolerance {
        Some(epsilon) => MatchMode::with_tolerance(epsilon)?,
        None => MatchMode::Exact,
    };

    println!("=== Hitbox Preset Extraction ===");
    println!("Stats:     {}", config.car_stats_dir().display());
    println!("Output:    {}", config.processed_results_dir.display());
    println!("Precision: {}", config.output_precision);
    println!(
        "Matching:  {}",
        tolerance.map_or_else(|| "exact".to_string(), |t| format!("within {t}"))
    );
    println!();

    let summary = commands::process::run(&ProcessConfig {
        car_stats_dir: config.car_stats_dir(),
        output_dir: config.processed_results_dir.clone(),
        precision: config.output_precision,
        match_mode,
    })
    .await?;

    println!(
        "{} cars from {} stat files in {} hitbox presets",
        summary.cars, summary.stat_files, summary.presets
    );

    Ok(())
}
