use serde::Serialize;

use crate::Vector3;

/// Preset offsets shorter than this (squared) are treated as unset.
pub const PRESET_OFFSET_EPSILON_SQUARED: f64 = 0.0001;

/// Position of a wheel on the car.
///
/// The discriminant matches the wheel index used in the stat exports.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    strum::Display,
    strum::EnumIter,
    Serialize,
)]
pub enum WheelRole {
    FrontLeft = 0,
    FrontRight = 1,
    BackLeft = 2,
    BackRight = 3,
}

impl WheelRole {
    /// Index of this wheel in the `car.Wheel{index}` stat keys.
    #[must_use]
    pub const fn stat_index(self) -> usize {
        self as usize
    }
}

/// The comparable part of a wheel: what the physics actually uses.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WheelGeometry {
    pub radius: f64,
    pub offset: Vector3,
    pub resting_suspension_distance: f64,
}

impl WheelGeometry {
    #[must_use]
    pub fn approx_eq(&self, other: &Self, epsilon: f64) -> bool {
        (self.radius - other.radius).abs() <= epsilon
            && self.offset.approx_eq(other.offset, epsilon)
            && (self.resting_suspension_distance - other.resting_suspension_distance).abs()
                <= epsilon
    }
}

/// A single wheel as exported by the game.
///
/// Exports carry two candidate placements. Some cars (the Batmobile, for one)
/// leave the preset placement at zero on every axis, in which case the local
/// placement is the real one.
#[derive(Debug, Clone, Copy, Default)]
pub struct Wheel {
    radius: f64,
    local_offset: Vector3,
    preset_offset: Vector3,
    resting_suspension_distance: f64,
}

impl Wheel {
    #[must_use]
    pub const fn new(
        radius: f64,
        local_offset: Vector3,
        preset_offset: Vector3,
        resting_suspension_distance: f64,
    ) -> Self {
        Self {
            radius,
            local_offset,
            preset_offset,
            resting_suspension_distance,
        }
    }

    #[must_use]
    pub const fn radius(&self) -> f64 {
        self.radius
    }

    #[must_use]
    pub const fn local_offset(&self) -> Vector3 {
        self.local_offset
    }

    #[must_use]
    pub const fn preset_offset(&self) -> Vector3 {
        self.preset_offset
    }

    /// The authoritative wheel placement.
    #[must_use]
    pub fn offset(&self) -> Vector3 {
        if self.preset_offset.length_squared() < PRESET_OFFSET_EPSILON_SQUARED {
            self.local_offset
        } else {
            self.preset_offset
        }
    }

    #[must_use]
    pub const fn resting_suspension_distance(&self) -> f64 {
        self.resting_suspension_distance
    }

    #[must_use]
    pub fn geometry(&self) -> WheelGeometry {
        WheelGeometry {
            radius: self.radius,
            offset: self.offset(),
            resting_suspension_distance: self.resting_suspension_distance,
        }
    }
}

// Wheels are equal when their geometry is; the unused candidate offset is ignored.
impl PartialEq for Wheel {
    fn eq(&self, other: &Self) -> bool {
        self.geometry() == other.geometry()
    }
}

/// The four wheels of a car.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WheelSet {
    pub front_left: Wheel,
    pub front_right: Wheel,
    pub back_left: Wheel,
    pub back_right: Wheel,
}

impl WheelSet {
    #[must_use]
    pub const fn get(&self, role: WheelRole) -> &Wheel {
        match role {
            WheelRole::FrontLeft => &self.front_left,
            WheelRole::FrontRight => &self.front_right,
            WheelRole::BackLeft => &self.back_left,
            WheelRole::BackRight => &self.back_right,
        }
    }

    /// Builds a set by asking `make` for each role in index order.
    pub fn from_fn(mut make: impl FnMut(WheelRole) -> Wheel) -> Self {
        Self {
            front_left: make(WheelRole::FrontLeft),
            front_right: make(WheelRole::FrontRight),
            back_left: make(WheelRole::BackLeft),
            back_right: make(WheelRole::BackRight),
        }
    }

    #[must_use]
    pub fn approx_eq(&self, other: &Self, epsilon: f64) -> bool {
        use strum::IntoEnumIterator;

        WheelRole::iter().all(|role| {
            self.get(role)
                .geometry()
                .approx_eq(&other.get(role).geometry(), epsilon)
        })
    }
}
