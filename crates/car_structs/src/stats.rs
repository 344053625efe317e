//! Flat stat maps as exported by the patch tester, and the keys a car is
//! built from.

use std::collections::HashMap;

use crate::{Quaternion, Vector3, WheelRole};

/// Dotted stat keys read when building a car.
pub mod keys {
    use crate::WheelRole;

    pub const LOCATION: &str = "car.Location";
    pub const ROTATION: &str = "car.Quaternion";
    pub const COLLISION_EXTENT: &str = "car.LocalCollisionExtent";
    pub const COLLISION_OFFSET: &str = "car.LocalCollisionOffset";
    pub const MESH_LOCATION: &str = "car.Mesh.Location";

    pub const WHEEL_RADIUS: &str = "WheelRadius";
    pub const WHEEL_LOCAL_OFFSET: &str = "LocalRestPosition";
    pub const WHEEL_PRESET_OFFSET: &str = "PresetRestPosition";
    pub const WHEEL_SUSPENSION_DISTANCE: &str = "SuspensionDistance";

    /// Builds `car.Wheel{index}.{field}`.
    #[must_use]
    pub fn wheel(role: WheelRole, field: &str) -> String {
        format!("car.Wheel{}.{field}", role.stat_index())
    }
}

/// Mapping from dotted stat path (e.g. `car.Location.X`) to its value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatMap {
    values: HashMap<String, f64>,
}

impl StatMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a value, returning the previous one if the key was present.
    pub fn insert(&mut self, key: impl Into<String>, value: f64) -> Option<f64> {
        self.values.insert(key.into(), value)
    }

    pub fn remove(&mut self, key: &str) -> Option<f64> {
        self.values.remove(key)
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<f64> {
        self.values.get(key).copied()
    }

    /// Missing stats read as zero.
    #[must_use]
    pub fn get_or_zero(&self, key: &str) -> f64 {
        self.get(key).unwrap_or_default()
    }

    /// Reads `{prefix}.X`, `{prefix}.Y` and `{prefix}.Z`.
    #[must_use]
    pub fn vector(&self, prefix: &str) -> Vector3 {
        Vector3::new(
            self.get_or_zero(&format!("{prefix}.X")),
            self.get_or_zero(&format!("{prefix}.Y")),
            self.get_or_zero(&format!("{prefix}.Z")),
        )
    }

    /// Reads `{prefix}.X` through `{prefix}.W`.
    ///
    /// A fully missing quaternion reads as all zeros, not as identity.
    #[must_use]
    pub fn quaternion(&self, prefix: &str) -> Quaternion {
        Quaternion::new(
            self.get_or_zero(&format!("{prefix}.X")),
            self.get_or_zero(&format!("{prefix}.Y")),
            self.get_or_zero(&format!("{prefix}.Z")),
            self.get_or_zero(&format!("{prefix}.W")),
        )
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Every key read by [`crate::Car::from_stat_map`] that this map lacks.
    #[must_use]
    pub fn missing_keys(&self) -> Vec<String> {
        car_stat_keys()
            .into_iter()
            .filter(|key| !self.contains_key(key))
            .collect()
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for StatMap {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

fn car_stat_keys() -> Vec<String> {
    use strum::IntoEnumIterator;

    let axes = |prefix: &str, components: &[&str]| -> Vec<String> {
        components.iter().map(|c| format!("{prefix}.{c}")).collect()
    };
    let xyz = ["X", "Y", "Z"];

    let mut all = Vec::new();
    all.extend(axes(keys::LOCATION, &xyz));
    all.extend(axes(keys::ROTATION, &["X", "Y", "Z", "W"]));
    all.extend(axes(keys::COLLISION_EXTENT, &xyz));
    all.extend(axes(keys::COLLISION_OFFSET, &xyz));
    all.extend(axes(keys::MESH_LOCATION, &xyz));

    for role in WheelRole::iter() {
        all.push(keys::wheel(role, keys::WHEEL_RADIUS));
        all.extend(axes(&keys::wheel(role, keys::WHEEL_LOCAL_OFFSET), &xyz));
        all.extend(axes(&keys::wheel(role, keys::WHEEL_PRESET_OFFSET), &xyz));
        all.push(keys::wheel(role, keys::WHEEL_SUSPENSION_DISTANCE));
    }

    all
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wheel_key_format() {
        assert_eq!(
            keys::wheel(WheelRole::FrontLeft, keys::WHEEL_RADIUS),
            "car.Wheel0.WheelRadius"
        );
        assert_eq!(
            keys::wheel(WheelRole::BackRight, keys::WHEEL_PRESET_OFFSET),
            "car.Wheel3.PresetRestPosition"
        );
    }

    #[test]
    fn test_missing_components_default_to_zero() {
        let map: StatMap = [("car.Location.X", 4.0), ("car.Location.Z", 17.0)]
            .into_iter()
            .collect();

        assert_eq!(map.vector(keys::LOCATION), Vector3::new(4.0, 0.0, 17.0));
        let zero = Quaternion::new(0.0, 0.0, 0.0, 0.0);
        assert_eq!(map.quaternion(keys::ROTATION), zero);
        assert!(map.get_or_zero("car.Nothing").abs() < f64::EPSILON);
    }

    #[test]
    fn test_insert_reports_previous_value() {
        let mut map = StatMap::new();
        assert_eq!(map.insert("car.Location.X", 1.0), None);
        assert_eq!(map.insert("car.Location.X", 2.0), Some(1.0));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_missing_keys_lists_everything_for_empty_map() {
        let missing = StatMap::new().missing_keys();
        // 5 vectors/quaternion (3+4+3+3+3) plus 4 wheels of 1+3+3+1 keys.
        assert_eq!(missing.len(), 16 + 4 * 8);
        assert!(missing.contains(&"car.Wheel0.WheelRadius".to_string()));
    }
}
