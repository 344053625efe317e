//! Process command - builds car records and hitbox presets from stat exports.
//!
//! 1. Load every car stat file concurrently
//! 2. Sort cars by name
//! 3. Write one record per car
//! 4. Group cars into hitbox presets and write one record per preset

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use car_structs::Car;
use hitbox_presets::report::{CarRecord, PresetRecord, to_fixed_json};
use hitbox_presets::{HitboxPreset, MatchMode, cluster_cars, sort_cars_by_name};
use stat_parser::{car_from_stats, car_name_from_path, find_stat_files};
use tokio::task::JoinSet;
use tracing::{error, info};

use crate::output::{OutputFile, open_output_store, write_all};

/// Settings for one run of the process command.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessConfig {
    /// Directory containing one stat file per car.
    pub car_stats_dir: PathBuf,
    /// Root directory for the `Cars` and `Hitboxes` folders.
    pub output_dir: PathBuf,
    /// Fractional digits in rendered numbers.
    pub precision: usize,
    pub match_mode: MatchMode,
}

/// Counts reported at the end of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProcessSummary {
    pub stat_files: usize,
    pub cars: usize,
    pub presets: usize,
    pub car_records_written: usize,
    pub preset_records_written: usize,
}

/// Runs the process command.
///
/// # Errors
///
/// Returns an error if the stat directory cannot be listed, no car could be
/// loaded, or the output directory cannot be opened. Failures on individual
/// files are logged and skipped.
pub async fn run(config: &ProcessConfig) -> Result<ProcessSummary> {
    info!(folder = %config.car_stats_dir.display(), "Loading car stats");

    let files = find_stat_files(&config.car_stats_dir)?;
    info!(files = files.len(), "Found stat files");

    let mut cars = load_cars(files.clone()).await;
    if cars.is_empty() {
        anyhow::bail!(
            "No car stats could be loaded from {}",
            config.car_stats_dir.display()
        );
    }
    sort_cars_by_name(&mut cars);

    let presets = cluster_cars(&cars, config.match_mode);
    info!(
        cars = cars.len(),
        presets = presets.len(),
        "Grouped cars into hitbox presets"
    );

    let car_files = render_car_records(&cars, config.precision)?;
    let preset_files = render_preset_records(&presets, config.precision)?;

    let store = open_output_store(&config.output_dir)?;
    let car_records_written = write_all(&store, &car_files).await;
    let preset_records_written = write_all(&store, &preset_files).await;

    let summary = ProcessSummary {
        stat_files: files.len(),
        cars: cars.len(),
        presets: presets.len(),
        car_records_written,
        preset_records_written,
    };

    info!(
        output = %config.output_dir.display(),
        cars = summary.car_records_written,
        presets = summary.preset_records_written,
        "Processing complete"
    );

    Ok(summary)
}

/// Loads every stat file on its own task and gathers the cars once all are done.
///
/// Cars come back in the order of `files`, whatever order the tasks finish in.
/// Files that fail to load are logged and left out.
pub async fn load_cars(files: Vec<PathBuf>) -> Vec<Car> {
    let mut tasks = JoinSet::new();
    for (index, path) in files.into_iter().enumerate() {
        tasks.spawn(async move {
            let result = load_car(&path).await;
            (index, path, result)
        });
    }

    let mut loaded = Vec::with_capacity(tasks.len());
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((index, _, Ok(car))) => loaded.push((index, car)),
            Ok((_, path, Err(e))) => {
                error!(
                    file = %path.display(),
                    error = %format!("{e:#}"),
                    "Failed to load car stats, skipping"
                );
            }
            Err(e) => error!(error = %e, "Car loading task failed"),
        }
    }

    loaded.sort_unstable_by_key(|(index, _)| *index);
    loaded.into_iter().map(|(_, car)| car).collect()
}

async fn load_car(path: &Path) -> Result<Car> {
    let name = car_name_from_path(path)
        .with_context(|| format!("Cannot derive a car name from {}", path.display()))?;
    let text = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read stat file {}", path.display()))?;
    car_from_stats(&name, &text)
}

/// Renders one `Cars/<name>.json` document per car.
///
/// # Errors
///
/// Returns an error if a record cannot be serialized.
pub fn render_car_records(cars: &[Car], precision: usize) -> Result<Vec<OutputFile>> {
    cars.iter()
        .map(|car| {
            let json = to_fixed_json(&CarRecord::from(car), precision)?;
            Ok(OutputFile::car(car.name(), json))
        })
        .collect()
}

/// Renders one `Hitboxes/<index>.json` document per preset, in preset order.
///
/// # Errors
///
/// Returns an error if a record cannot be serialized.
pub fn render_preset_records(
    presets: &[HitboxPreset],
    precision: usize,
) -> Result<Vec<OutputFile>> {
    presets
        .iter()
        .enumerate()
        .map(|(index, preset)| {
            let json = to_fixed_json(&PresetRecord::from(preset), precision)?;
            Ok(OutputFile::preset(index, json))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use serde_json::Value;

    use super::*;

    const WHEELS: &str = "\
car.Wheel0.WheelRadius,12.5
car.Wheel0.PresetRestPosition.X,51.25
car.Wheel0.PresetRestPosition.Y,-25.9
car.Wheel0.PresetRestPosition.Z,20.755
car.Wheel0.SuspensionDistance,38.755
car.Wheel1.WheelRadius,12.5
car.Wheel1.PresetRestPosition.X,51.25
car.Wheel1.PresetRestPosition.Y,25.9
car.Wheel1.PresetRestPosition.Z,20.755
car.Wheel1.SuspensionDistance,38.755
car.Wheel2.WheelRadius,15
car.Wheel2.PresetRestPosition.X,-33.75
car.Wheel2.PresetRestPosition.Y,-29.5
car.Wheel2.PresetRestPosition.Z,20.755
car.Wheel2.SuspensionDistance,37.055
car.Wheel3.WheelRadius,15
car.Wheel3.PresetRestPosition.X,-33.75
car.Wheel3.PresetRestPosition.Y,29.5
car.Wheel3.PresetRestPosition.Z,20.755
car.Wheel3.SuspensionDistance,37.055
";

    fn stats(mesh_x: f64, extent_x: f64) -> String {
        format!(
            "car.LocalCollisionExtent.X,{extent_x}
car.LocalCollisionExtent.Y,30
car.LocalCollisionExtent.Z,20
car.LocalCollisionOffset.X,0
car.LocalCollisionOffset.Y,0
car.LocalCollisionOffset.Z,0
car.Quaternion.X,0
car.Quaternion.Y,0
car.Quaternion.Z,0
car.Quaternion.W,1
car.Location.X,0
car.Location.Y,0
car.Location.Z,0
car.Mesh.Location.X,{mesh_x}
{WHEELS}"
        )
    }

    fn pipeline(inputs: &[(&str, String)]) -> (Vec<Car>, Vec<HitboxPreset>) {
        let mut cars: Vec<Car> = inputs
            .iter()
            .map(|(name, text)| car_from_stats(name, text).unwrap())
            .collect();
        sort_cars_by_name(&mut cars);
        let presets = cluster_cars(&cars, MatchMode::Exact);
        (cars, presets)
    }

    fn parse(file: &OutputFile) -> Value {
        serde_json::from_str(&file.contents).unwrap()
    }

    #[test]
    fn test_octane_and_dominus_end_to_end() {
        let (cars, presets) = pipeline(&[
            ("Octane", stats(1.0, 60.0)),
            ("Dominus", stats(4.5, 60.0)),
        ]);

        let preset_files = render_preset_records(&presets, 2).unwrap();
        assert_eq!(preset_files.len(), 1);
        assert_eq!(preset_files[0].relative_path, "Hitboxes/0.json");
        let preset = parse(&preset_files[0]);
        assert_eq!(preset["Cars"], serde_json::json!(["Dominus", "Octane"]));
        assert_eq!(preset["HitboxSize"]["X"], "120.00");
        assert_eq!(preset["Wheels"]["BackLeft"]["Radius"], "15.00");

        let car_files = render_car_records(&cars, 2).unwrap();
        assert_eq!(car_files.len(), 2);
        assert_eq!(car_files[0].relative_path, "Cars/Dominus.json");
        assert_eq!(car_files[1].relative_path, "Cars/Octane.json");

        let dominus = parse(&car_files[0]);
        let octane = parse(&car_files[1]);
        assert_eq!(dominus["Name"], "Dominus");
        assert_eq!(dominus["MeshOffset"]["X"], "4.50");
        assert_eq!(octane["MeshOffset"]["X"], "1.00");
        assert_ne!(dominus["MeshOffset"], octane["MeshOffset"]);
        assert_eq!(octane["GroundRotation"]["Yaw"], "0.00");
        assert_eq!(octane["Wheels"]["FrontLeft"]["LocationOffset"]["Y"], "-25.90");
    }

    #[test]
    fn test_distinct_hitboxes_get_numbered_presets() {
        let (_, presets) = pipeline(&[
            ("takumi", stats(0.0, 60.0)),
            ("Breakout", stats(0.0, 66.0)),
            ("Octane", stats(0.0, 60.0)),
        ]);

        let files = render_preset_records(&presets, 1).unwrap();
        let names: Vec<Value> = files.iter().map(|f| parse(f)["Cars"].clone()).collect();
        assert_eq!(
            names,
            vec![
                serde_json::json!(["Breakout"]),
                serde_json::json!(["Octane", "takumi"]),
            ]
        );
        assert_eq!(files[1].relative_path, "Hitboxes/1.json");
    }

    #[test]
    fn test_record_key_order() {
        let (cars, _) = pipeline(&[("Octane", stats(0.0, 60.0))]);
        let contents = &render_car_records(&cars, 2).unwrap()[0].contents;

        let keys = [
            "\"Name\"",
            "\"HitboxSize\"",
            "\"HitboxOffset\"",
            "\"MeshOffset\"",
            "\"GroundRotation\"",
            "\"GroundLocation\"",
            "\"Wheels\"",
        ];
        let positions: Vec<usize> = keys.iter().map(|k| contents.find(k).unwrap()).collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]), "{contents}");
    }

    fn process_config(input: &Path, output: &Path) -> ProcessConfig {
        ProcessConfig {
            car_stats_dir: input.to_path_buf(),
            output_dir: output.to_path_buf(),
            precision: 2,
            match_mode: MatchMode::Exact,
        }
    }

    #[tokio::test]
    async fn test_run_skips_bad_files_and_writes_records() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        let out_dir = output.path().join("processed");
        std::fs::write(input.path().join("Octane.csv"), stats(1.0, 60.0)).unwrap();
        std::fs::write(
            input.path().join("Broken.csv"),
            "car.Location.X,1\ncar.Location.X,2\n",
        )
        .unwrap();
        std::fs::write(input.path().join("notes.txt"), stats(0.0, 60.0)).unwrap();

        let summary = run(&process_config(input.path(), &out_dir)).await.unwrap();

        assert_eq!(
            summary,
            ProcessSummary {
                stat_files: 2,
                cars: 1,
                presets: 1,
                car_records_written: 1,
                preset_records_written: 1,
            }
        );
        assert!(out_dir.join("Cars/Octane.json").is_file());
        assert!(!out_dir.join("Cars/Broken.json").exists());

        let preset = std::fs::read_to_string(out_dir.join("Hitboxes/0.json")).unwrap();
        let preset: Value = serde_json::from_str(&preset).unwrap();
        assert_eq!(preset["Cars"], serde_json::json!(["Octane"]));
    }

    #[tokio::test]
    async fn test_run_fails_when_no_car_loads() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        std::fs::write(input.path().join("Broken.csv"), "a,1\na,2\n").unwrap();

        let err = run(&process_config(input.path(), output.path()))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("No car stats"));
    }

    #[tokio::test]
    async fn test_run_fails_on_missing_input_dir() {
        let output = tempfile::tempdir().unwrap();
        let missing = output.path().join("does_not_exist");

        assert!(run(&process_config(&missing, output.path())).await.is_err());
    }

    #[tokio::test]
    async fn test_load_cars_keeps_file_order() {
        let input = tempfile::tempdir().unwrap();
        let names = ["octane", "Breakout", "Broken", "Octane", "Dominus"];
        let files: Vec<PathBuf> = names
            .iter()
            .map(|name| input.path().join(format!("{name}.csv")))
            .collect();
        for (name, path) in names.iter().zip(&files) {
            let text = if *name == "Broken" {
                "a,1\na,2\n".to_string()
            } else {
                stats(0.0, 60.0)
            };
            std::fs::write(path, text).unwrap();
        }

        let cars = load_cars(files).await;

        let loaded: Vec<&str> = cars.iter().map(Car::name).collect();
        assert_eq!(loaded, ["octane", "Breakout", "Octane", "Dominus"]);
    }
}
