//! Hitbox preset clustering for Rocket League cars.
//!
//! Cars that share a hitbox, resting transform and wheel layout behave the
//! same physically. This crate groups them into [`HitboxPreset`]s and renders
//! cars and presets as human-readable records (see [`report`]).

use anyhow::Result;
use car_structs::{Car, CarGeometry};
use tracing::{debug, warn};

pub mod report;

/// How car geometry is compared when looking for a matching preset.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum MatchMode {
    /// Bit-for-bit equality of every component.
    #[default]
    Exact,
    /// Every component within the given absolute tolerance.
    ///
    /// Not transitive: a car can fall within tolerance of two presets that
    /// are not within tolerance of each other.
    Tolerance(f64),
}

impl MatchMode {
    /// Tolerance matching with a validated epsilon.
    ///
    /// # Errors
    ///
    /// Returns an error if `epsilon` is negative, NaN or infinite.
    pub fn with_tolerance(epsilon: f64) -> Result<Self> {
        if !epsilon.is_finite() || epsilon < 0.0 {
            anyhow::bail!("Tolerance must be a finite, non-negative number, got {epsilon}");
        }
        Ok(Self::Tolerance(epsilon))
    }

    #[must_use]
    pub fn matches(self, a: &CarGeometry, b: &CarGeometry) -> bool {
        match self {
            Self::Exact => a == b,
            Self::Tolerance(epsilon) => a.approx_eq(b, epsilon),
        }
    }
}

/// A group of cars sharing the same physical geometry.
///
/// The geometry is captured from the first car assigned to the preset.
#[derive(Debug, Clone, PartialEq)]
pub struct HitboxPreset {
    geometry: CarGeometry,
    car_names: Vec<String>,
}

impl HitboxPreset {
    /// Starts a preset with `car` as its representative and first member.
    #[must_use]
    pub fn new(car: &Car) -> Self {
        Self {
            geometry: car.geometry(),
            car_names: vec![car.name().to_string()],
        }
    }

    #[must_use]
    pub const fn geometry(&self) -> &CarGeometry {
        &self.geometry
    }

    /// Member names in the order they were assigned.
    #[must_use]
    pub fn car_names(&self) -> &[String] {
        &self.car_names
    }

    #[must_use]
    pub fn does_car_match(&self, car: &Car, mode: MatchMode) -> bool {
        mode.matches(&self.geometry, &car.geometry())
    }

    pub fn add_car(&mut self, car: &Car) {
        self.car_names.push(car.name().to_string());
    }
}

/// Sorts cars by name, ignoring case. Ties keep their input order.
pub fn sort_cars_by_name(cars: &mut [Car]) {
    cars.sort_by_cached_key(|car| car.name().to_lowercase());
}

/// Groups `cars` into presets in a single pass.
///
/// Each car is compared against every existing preset in creation order. A car
/// matching none starts a new preset. A car matching several is added to all of
/// them and reported, since it means those presets should have been one.
#[must_use]
pub fn cluster_cars(cars: &[Car], mode: MatchMode) -> Vec<HitboxPreset> {
    let mut presets: Vec<HitboxPreset> = Vec::new();

    for car in cars {
        let matching: Vec<usize> = presets
            .iter()
            .enumerate()
            .filter(|(_, preset)| preset.does_car_match(car, mode))
            .map(|(index, _)| index)
            .collect();

        if matching.len() > 1 {
            warn!(
                car = car.name(),
                presets = ?matching,
                "Car matched multiple hitbox presets"
            );
        }

        if matching.is_empty() {
            debug!(car = car.name(), preset = presets.len(), "New hitbox preset");
            presets.push(HitboxPreset::new(car));
        } else {
            for index in matching {
                presets[index].add_car(car);
            }
        }
    }

    presets
}
