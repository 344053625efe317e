//! Stat export parser for patch tester car dumps.
//!
//! Each car is exported as a two-column `key,value` file. This crate turns
//! those files into [`StatMap`]s and [`Car`]s.

use std::path::Path;

use anyhow::{Context, Result};
use car_structs::{Car, StatMap};
use tracing::{debug, warn};

/// Extension of the per-car stat files.
pub const STAT_FILE_EXTENSION: &str = "csv";

/// Parses the text of one stat export.
///
/// Rows that do not have exactly two fields, or whose value is not a finite
/// number, are skipped with a warning. Blank lines are ignored.
///
/// # Errors
///
/// Returns an error if the same key appears twice.
pub fn parse_stats(text: &str) -> Result<StatMap> {
    let mut stats = StatMap::new();

    for (index, line) in text.lines().enumerate() {
        let line_number = index + 1;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let fields: Vec<&str> = line.split(',').map(clean_field).collect();
        let [key, raw_value] = fields.as_slice() else {
            warn!(
                line = line_number,
                fields = fields.len(),
                "Stat row has the wrong number of fields, skipping"
            );
            continue;
        };

        let Some(value) = raw_value.parse::<f64>().ok().filter(|v| v.is_finite()) else {
            warn!(
                line = line_number,
                key = %key,
                value = %raw_value,
                "Stat value is not a finite number, skipping"
            );
            continue;
        };

        if stats.contains_key(key) {
            anyhow::bail!("Duplicate stat key '{key}' on line {line_number}");
        }
        stats.insert(*key, value);
    }

    Ok(stats)
}

/// Car name for a stat file: the file name without its extension.
#[must_use]
pub fn car_name_from_path(path: &Path) -> Option<String> {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .map(ToString::to_string)
}

/// Builds a car from already-loaded stat text.
///
/// # Errors
///
/// Returns an error if the stats contain duplicate keys.
pub fn car_from_stats(name: &str, text: &str) -> Result<Car> {
    let stats = parse_stats(text).with_context(|| format!("Invalid stats for car {name}"))?;

    let missing = stats.missing_keys();
    if !missing.is_empty() {
        debug!(car = name, missing = missing.len(), "Stats missing, reading as zero");
    }

    Ok(Car::from_stat_map(name, &stats))
}

/// Loads a car from its stat file, named after the file.
///
/// # Errors
///
/// Returns an error if the file name is not valid UTF-8, or if the file cannot
/// be read or parsed.
pub fn load_car(path: &Path) -> Result<Car> {
    let name = car_name_from_path(path)
        .with_context(|| format!("Cannot derive a car name from {}", path.display()))?;
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read stat file {}", path.display()))?;
    car_from_stats(&name, &text)
}

/// Finds all stat files directly inside `folder`, sorted by path.
///
/// # Errors
///
/// Returns an error if `folder` is not a readable directory.
pub fn find_stat_files(folder: &Path) -> Result<Vec<std::path::PathBuf>> {
    if !folder.is_dir() {
        anyhow::bail!("Not a directory: {}", folder.display());
    }

    let mut files = Vec::new();
    for entry in std::fs::read_dir(folder)
        .with_context(|| format!("Failed to list {}", folder.display()))?
    {
        let path = entry?.path();
        if path.is_file()
            && path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case(STAT_FILE_EXTENSION))
        {
            files.push(path);
        }
    }
    files.sort();

    Ok(files)
}

fn clean_field(field: &str) -> &str {
    let field = field.trim();
    field
        .strip_prefix('"')
        .and_then(|f| f.strip_suffix('"'))
        .unwrap_or(field)
}

#[cfg(test)]
mod tests {
    use car_structs::{Vector3, WheelRole};

    use super::*;

    #[test]
    fn test_parse_two_column_rows() {
        let text = "car.Location.X,1.5\ncar.Location.Y,-2\r\ncar.Location.Z, 17.01\n";
        let stats = parse_stats(text).unwrap();

        assert_eq!(stats.len(), 3);
        assert_eq!(stats.vector("car.Location"), Vector3::new(1.5, -2.0, 17.01));
    }

    #[test]
    fn test_malformed_rows_are_skipped() {
        let text = "car.Location.X,1\nbroken\ncar.Location.Y,2,3\n\
                    car.Location.Z,abc\n\ncar.Wheel0.WheelRadius,12.5";
        let stats = parse_stats(text).unwrap();

        assert_eq!(stats.len(), 2);
        assert_eq!(stats.get("car.Location.X"), Some(1.0));
        assert_eq!(stats.get("car.Wheel0.WheelRadius"), Some(12.5));
        assert!(!stats.contains_key("car.Location.Y"));
        assert!(!stats.contains_key("car.Location.Z"));
    }

    #[test]
    fn test_non_finite_values_are_skipped() {
        let text = "car.Location.X,NaN\ncar.Location.Y,inf\n\
                    car.Location.Z,-infinity\ncar.Mesh.Location.X,4.5";
        let stats = parse_stats(text).unwrap();

        assert_eq!(stats.len(), 1);
        assert_eq!(stats.get("car.Mesh.Location.X"), Some(4.5));
        assert!(!stats.contains_key("car.Location.X"));
        assert!(!stats.contains_key("car.Location.Y"));
    }

    #[test]
    fn test_duplicate_key_is_rejected() {
        let err = parse_stats("car.Location.X,1\ncar.Location.X,2\n").unwrap_err();
        assert!(err.to_string().contains("car.Location.X"));
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn test_quoted_fields() {
        let stats = parse_stats("\"car.Mesh.Location.Z\",\"2.25\"").unwrap();
        assert_eq!(stats.get("car.Mesh.Location.Z"), Some(2.25));
    }

    #[test]
    fn test_car_name_from_path() {
        assert_eq!(
            car_name_from_path(Path::new("logs/CarStats/Octane.csv")).as_deref(),
            Some("Octane")
        );
        assert_eq!(
            car_name_from_path(Path::new("Octane ZSR.csv")).as_deref(),
            Some("Octane ZSR")
        );
    }

    #[test]
    fn test_car_from_partial_stats() {
        let car = car_from_stats("Breakout", "car.Wheel1.WheelRadius,13.5\n").unwrap();

        assert_eq!(car.name(), "Breakout");
        assert!(car.wheels().get(WheelRole::FrontLeft).radius().abs() < f64::EPSILON);
        let front_right = car.wheels().get(WheelRole::FrontRight);
        assert!((front_right.radius() - 13.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_car_from_stats_propagates_duplicates() {
        assert!(car_from_stats("Merc", "a,1\na,1\n").is_err());
    }
}
