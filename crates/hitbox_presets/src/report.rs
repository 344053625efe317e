//! Human-readable car and preset records.
//!
//! Records carry full-precision values; rounding happens only when rendering
//! with [`to_fixed_json`].

use anyhow::{Context, Result};
use car_structs::{Car, CarGeometry, EulerDegrees, Vector3, Wheel, WheelSet};
use serde::Serialize;
use serde_json::Value;

use crate::HitboxPreset;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct WheelRecord {
    pub radius: f64,
    pub location_offset: Vector3,
    pub ground_suspension_distance: f64,
}

impl From<&Wheel> for WheelRecord {
    fn from(wheel: &Wheel) -> Self {
        Self {
            radius: wheel.radius(),
            location_offset: wheel.offset(),
            ground_suspension_distance: wheel.resting_suspension_distance(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct WheelsRecord {
    pub front_left: WheelRecord,
    pub front_right: WheelRecord,
    pub back_left: WheelRecord,
    pub back_right: WheelRecord,
}

impl From<&WheelSet> for WheelsRecord {
    fn from(wheels: &WheelSet) -> Self {
        Self {
            front_left: (&wheels.front_left).into(),
            front_right: (&wheels.front_right).into(),
            back_left: (&wheels.back_left).into(),
            back_right: (&wheels.back_right).into(),
        }
    }
}

/// Per-car output record.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CarRecord {
    pub name: String,
    pub hitbox_size: Vector3,
    pub hitbox_offset: Vector3,
    /// Mesh origin relative to the physics origin, in the car's local frame.
    pub mesh_offset: Vector3,
    pub ground_rotation: EulerDegrees,
    pub ground_location: Vector3,
    pub wheels: WheelsRecord,
}

impl From<&Car> for CarRecord {
    fn from(car: &Car) -> Self {
        Self {
            name: car.name().to_string(),
            hitbox_size: car.hitbox().size(),
            hitbox_offset: car.hitbox().offset,
            mesh_offset: car.visual_offset(),
            ground_rotation: car.resting_rotation().to_euler().to_degrees(),
            ground_location: car.resting_location(),
            wheels: car.wheels().into(),
        }
    }
}

/// Per-preset output record.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PresetRecord {
    pub hitbox_size: Vector3,
    pub hitbox_offset: Vector3,
    pub ground_rotation: EulerDegrees,
    pub ground_location: Vector3,
    pub wheels: WheelsRecord,
    pub cars: Vec<String>,
}

impl From<&HitboxPreset> for PresetRecord {
    fn from(preset: &HitboxPreset) -> Self {
        let CarGeometry {
            hitbox,
            resting_rotation,
            resting_location,
            wheels,
        } = preset.geometry();

        Self {
            hitbox_size: hitbox.size(),
            hitbox_offset: hitbox.offset,
            ground_rotation: resting_rotation.to_euler().to_degrees(),
            ground_location: *resting_location,
            wheels: wheels.into(),
            cars: preset.car_names().to_vec(),
        }
    }
}

/// Formats `n` with `precision` fractional digits.
///
/// Exact halfway values round away from zero and negative zero prints without
/// a sign, so output matches JavaScript's `Number.prototype.toFixed`.
#[must_use]
pub fn to_fixed(n: f64, precision: usize) -> String {
    let magnitude = n.abs();
    let magnitude = if is_rounding_tie(magnitude, precision) {
        magnitude.next_up()
    } else {
        magnitude
    };

    let digits = format!("{magnitude:.precision$}");
    if n < 0.0 { format!("-{digits}") } else { digits }
}

/// Whether `magnitude` sits exactly halfway between two `precision`-digit decimals.
///
/// That happens only when `magnitude * 2^(precision + 1)` is an odd integer.
/// Scaling by a power of two is exact.
#[allow(clippy::float_cmp)]
fn is_rounding_tie(magnitude: f64, precision: usize) -> bool {
    let Ok(exponent) = i32::try_from(precision + 1) else {
        return false;
    };
    (magnitude * 2f64.powi(exponent)) % 2.0 == 1.0
}

/// Replaces every number in `value` with a string of `precision` fractional digits.
#[must_use]
pub fn fix_precision(value: Value, precision: usize) -> Value {
    match value {
        Value::Number(number) => number.as_f64().map_or(Value::Number(number), |n| {
            Value::String(to_fixed(n, precision))
        }),
        Value::Array(items) => Value::Array(
            items
                .into_iter()
                .map(|item| fix_precision(item, precision))
                .collect(),
        ),
        Value::Object(fields) => Value::Object(
            fields
                .into_iter()
                .map(|(key, field)| (key, fix_precision(field, precision)))
                .collect(),
        ),
        other => other,
    }
}

/// Renders a record as pretty JSON with fixed-precision numbers.
///
/// # Errors
///
/// Returns an error if the record cannot be serialized.
pub fn to_fixed_json<T: Serialize>(record: &T, precision: usize) -> Result<String> {
    let value = serde_json::to_value(record).context("Failed to serialize record")?;
    serde_json::to_string_pretty(&fix_precision(value, precision))
        .context("Failed to render record as JSON")
}
