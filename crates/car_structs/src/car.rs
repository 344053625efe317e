use crate::stats::{StatMap, keys};
use crate::{Quaternion, Vector3, Wheel, WheelSet};

/// Axis-aligned collision box of a car, relative to the car origin.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Hitbox {
    /// Half-size on each axis.
    pub extent: Vector3,
    pub offset: Vector3,
}

impl Hitbox {
    #[must_use]
    pub const fn new(extent: Vector3, offset: Vector3) -> Self {
        Self { extent, offset }
    }

    /// Full size of the box.
    #[must_use]
    pub fn size(&self) -> Vector3 {
        self.extent.scale(2.0)
    }

    #[must_use]
    pub fn approx_eq(&self, other: &Self, epsilon: f64) -> bool {
        self.extent.approx_eq(other.extent, epsilon) && self.offset.approx_eq(other.offset, epsilon)
    }
}

/// Everything two cars must share to use the same hitbox preset.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CarGeometry {
    pub hitbox: Hitbox,
    pub resting_rotation: Quaternion,
    pub resting_location: Vector3,
    pub wheels: WheelSet,
}

impl CarGeometry {
    #[must_use]
    pub fn approx_eq(&self, other: &Self, epsilon: f64) -> bool {
        self.hitbox.approx_eq(&other.hitbox, epsilon)
            && self
                .resting_rotation
                .approx_eq(other.resting_rotation, epsilon)
            && self
                .resting_location
                .approx_eq(other.resting_location, epsilon)
            && self.wheels.approx_eq(&other.wheels, epsilon)
    }
}

/// A car body as it sits at rest, built from one stat export.
#[derive(Debug, Clone, PartialEq)]
pub struct Car {
    name: String,
    hitbox: Hitbox,
    resting_visual_location: Vector3,
    resting_rotation: Quaternion,
    resting_location: Vector3,
    wheels: WheelSet,
}

impl Car {
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        hitbox: Hitbox,
        resting_visual_location: Vector3,
        resting_rotation: Quaternion,
        resting_location: Vector3,
        wheels: WheelSet,
    ) -> Self {
        Self {
            name: name.into(),
            hitbox,
            resting_visual_location,
            resting_rotation,
            resting_location,
            wheels,
        }
    }

    /// Builds a car from its stat export.
    ///
    /// Never fails: any stat missing from `stats` reads as zero, so a partial
    /// export yields a car with zeroed fields rather than an error.
    #[must_use]
    pub fn from_stat_map(name: impl Into<String>, stats: &StatMap) -> Self {
        let hitbox = Hitbox::new(
            stats.vector(keys::COLLISION_EXTENT),
            stats.vector(keys::COLLISION_OFFSET),
        );

        let wheels = WheelSet::from_fn(|role| {
            Wheel::new(
                stats.get_or_zero(&keys::wheel(role, keys::WHEEL_RADIUS)),
                stats.vector(&keys::wheel(role, keys::WHEEL_LOCAL_OFFSET)),
                stats.vector(&keys::wheel(role, keys::WHEEL_PRESET_OFFSET)),
                stats.get_or_zero(&keys::wheel(role, keys::WHEEL_SUSPENSION_DISTANCE)),
            )
        });

        Self::new(
            name,
            hitbox,
            stats.vector(keys::MESH_LOCATION),
            stats.quaternion(keys::ROTATION),
            stats.vector(keys::LOCATION),
            wheels,
        )
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn hitbox(&self) -> &Hitbox {
        &self.hitbox
    }

    #[must_use]
    pub const fn resting_visual_location(&self) -> Vector3 {
        self.resting_visual_location
    }

    #[must_use]
    pub const fn resting_rotation(&self) -> Quaternion {
        self.resting_rotation
    }

    #[must_use]
    pub const fn resting_location(&self) -> Vector3 {
        self.resting_location
    }

    #[must_use]
    pub const fn wheels(&self) -> &WheelSet {
        &self.wheels
    }

    /// Offset from the physics origin to the mesh origin, in the car's local
    /// (unrotated) frame.
    #[must_use]
    pub fn visual_offset(&self) -> Vector3 {
        (self.resting_visual_location - self.resting_location)
            .rotated(self.resting_rotation.inverse())
    }

    #[must_use]
    pub const fn geometry(&self) -> CarGeometry {
        CarGeometry {
            hitbox: self.hitbox,
            resting_rotation: self.resting_rotation,
            resting_location: self.resting_location,
            wheels: self.wheels,
        }
    }
}
