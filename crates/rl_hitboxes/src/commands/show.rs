//! Show command - prints the record for a single car stat file.

use std::path::Path;

use anyhow::Result;
use hitbox_presets::report::{CarRecord, to_fixed_json};
use stat_parser::load_car;
use tracing::info;

/// Runs the show command.
///
/// # Errors
///
/// Returns an error if the stat file cannot be read or parsed.
pub fn run(file: &Path, precision: usize) -> Result<()> {
    let car = load_car(file)?;
    info!(car = car.name(), "Loaded car stats");

    println!("{}", to_fixed_json(&CarRecord::from(&car), precision)?);

    Ok(())
}
