use std::path::PathBuf;

use anyhow::Context;

/// Default location of the patch tester results, relative to the working directory.
pub const DEFAULT_PATCH_RESULTS_DIR: &str = "../RocketLeaguePatchTesterResults";

/// Default location for processed output.
pub const DEFAULT_PROCESSED_RESULTS_DIR: &str = "../ProcessedPatchTesterResults";

/// Stat files live here, relative to the patch results directory.
pub const CAR_STATS_SUBDIR: &str = "current_patch/logs/CarStats";

/// Default number of fractional digits in output records.
pub const DEFAULT_OUTPUT_PRECISION: usize = 2;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Root of the patch tester results
    pub patch_results_dir: PathBuf,

    /// Where car and hitbox records are written
    pub processed_results_dir: PathBuf,

    /// Fractional digits in rendered numbers
    pub output_precision: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            patch_results_dir: PathBuf::from(DEFAULT_PATCH_RESULTS_DIR),
            processed_results_dir: PathBuf::from(DEFAULT_PROCESSED_RESULTS_DIR),
            output_precision: DEFAULT_OUTPUT_PRECISION,
        }
    }
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// All variables are optional:
    /// - `PATCH_RESULTS_DIR`: patch tester results root (default: `../RocketLeaguePatchTesterResults`)
    /// - `PROCESSED_RESULTS_DIR`: output root (default: `../ProcessedPatchTesterResults`)
    /// - `OUTPUT_PRECISION`: fractional digits in output records (default: `2`)
    ///
    /// # Errors
    ///
    /// Returns an error if `OUTPUT_PRECISION` is set but is not a non-negative integer.
    pub fn from_env() -> anyhow::Result<Self> {
        // Load .env file
        dotenvy::dotenv().ok();

        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let defaults = Self::default();

        let patch_results_dir = lookup("PATCH_RESULTS_DIR")
            .map_or(defaults.patch_results_dir, PathBuf::from);

        let processed_results_dir = lookup("PROCESSED_RESULTS_DIR")
            .map_or(defaults.processed_results_dir, PathBuf::from);

        let output_precision = match lookup("OUTPUT_PRECISION") {
            Some(raw) => raw
                .trim()
                .parse()
                .with_context(|| format!("OUTPUT_PRECISION is not a valid digit count: {raw}"))?,
            None => defaults.output_precision,
        };

        Ok(Self {
            patch_results_dir,
            processed_results_dir,
            output_precision,
        })
    }

    /// Directory holding one stat file per car.
    #[must_use]
    pub fn car_stats_dir(&self) -> PathBuf {
        self.patch_results_dir.join(CAR_STATS_SUBDIR)
    }
}
