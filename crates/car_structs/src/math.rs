//! 3D vector, quaternion and Euler angle math.
//!
//! Every type here is an immutable `Copy` value. Equality is exact
//! component-wise comparison; nothing is normalized or validated.

use core::f64::consts::FRAC_PI_2;
use core::ops::{Add, Mul, Neg, Sub};

use serde::Serialize;

/// Represents a 3D vector (location, offset or extent).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub struct Vector3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vector3 {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    #[must_use]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    #[must_use]
    pub fn dot(self, other: Self) -> f64 {
        self.z.mul_add(other.z, self.x.mul_add(other.x, self.y * other.y))
    }

    #[must_use]
    pub fn cross(self, other: Self) -> Self {
        Self {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }

    /// Multiplies every component by `factor`.
    #[must_use]
    pub fn scale(self, factor: f64) -> Self {
        Self {
            x: self.x * factor,
            y: self.y * factor,
            z: self.z * factor,
        }
    }

    /// Squared magnitude; cheaper than [`Self::length`] for threshold checks.
    #[must_use]
    pub fn length_squared(self) -> f64 {
        self.dot(self)
    }

    #[must_use]
    pub fn length(self) -> f64 {
        self.length_squared().sqrt()
    }

    /// Rotates this vector by `rotation`.
    ///
    /// Uses the expanded form `2(u·v)u + (s² - u·u)v + 2s(u×v)` where `u` is the
    /// vector part and `s` the scalar part of the quaternion. The quaternion is
    /// assumed to be unit length.
    #[must_use]
    pub fn rotated(self, rotation: Quaternion) -> Self {
        let u = rotation.vector_part();
        let s = rotation.w;

        let along_axis = u.scale(2.0 * u.dot(self));
        let scaled = self.scale(s.mul_add(s, -u.dot(u)));
        let across = u.cross(self).scale(2.0 * s);

        along_axis + scaled + across
    }

    /// Compares component-wise with an absolute tolerance.
    #[must_use]
    pub fn approx_eq(self, other: Self, epsilon: f64) -> bool {
        approx(self.x, other.x, epsilon)
            && approx(self.y, other.y, epsilon)
            && approx(self.z, other.z, epsilon)
    }
}

impl Add for Vector3 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Vector3 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f64> for Vector3 {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self {
        self.scale(rhs)
    }
}

impl Neg for Vector3 {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.x, -self.y, -self.z)
    }
}

/// Represents a quaternion rotation.
///
/// Car orientations from the stat exports are unit quaternions. None of the
/// operations below check that, so feeding a non-unit quaternion gives a
/// scaled or skewed result rather than an error.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub struct Quaternion {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub w: f64,
}

impl Default for Quaternion {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Quaternion {
    /// No rotation.
    pub const IDENTITY: Self = Self::new(0.0, 0.0, 0.0, 1.0);

    #[must_use]
    pub const fn new(x: f64, y: f64, z: f64, w: f64) -> Self {
        Self { x, y, z, w }
    }

    #[must_use]
    pub const fn vector_part(self) -> Vector3 {
        Vector3::new(self.x, self.y, self.z)
    }

    /// Conjugate of this quaternion, which is its inverse only for unit length.
    #[must_use]
    pub const fn inverse(self) -> Self {
        Self::new(-self.x, -self.y, -self.z, self.w)
    }

    /// Converts to yaw (Z), pitch (Y) and roll (X) in radians.
    ///
    /// Pitch saturates at ±90° when the computed sine leaves `[-1, 1]`.
    #[must_use]
    pub fn to_euler(self) -> EulerRadians {
        let Self { x, y, z, w } = self;

        let sinr_cosp = 2.0 * w.mul_add(x, y * z);
        let cosr_cosp = 1.0 - 2.0 * x.mul_add(x, y * y);
        let roll = sinr_cosp.atan2(cosr_cosp);

        let sinp = 2.0 * w.mul_add(y, -(z * x));
        let pitch = if sinp.abs() >= 1.0 {
            FRAC_PI_2.copysign(sinp)
        } else {
            sinp.asin()
        };

        let siny_cosp = 2.0 * w.mul_add(z, x * y);
        let cosy_cosp = 1.0 - 2.0 * y.mul_add(y, z * z);
        let yaw = siny_cosp.atan2(cosy_cosp);

        EulerRadians { yaw, pitch, roll }
    }

    /// Compares component-wise with an absolute tolerance.
    #[must_use]
    pub fn approx_eq(self, other: Self, epsilon: f64) -> bool {
        approx(self.x, other.x, epsilon)
            && approx(self.y, other.y, epsilon)
            && approx(self.z, other.z, epsilon)
            && approx(self.w, other.w, epsilon)
    }
}

/// Yaw, pitch and roll in radians.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct EulerRadians {
    pub yaw: f64,
    pub pitch: f64,
    pub roll: f64,
}

impl EulerRadians {
    #[must_use]
    pub const fn new(yaw: f64, pitch: f64, roll: f64) -> Self {
        Self { yaw, pitch, roll }
    }

    #[must_use]
    pub fn to_degrees(self) -> EulerDegrees {
        EulerDegrees {
            yaw: self.yaw.to_degrees(),
            pitch: self.pitch.to_degrees(),
            roll: self.roll.to_degrees(),
        }
    }

    /// Builds the quaternion for a Z-Y-X (yaw, pitch, roll) rotation.
    #[must_use]
    pub fn to_quaternion(self) -> Quaternion {
        let (sy, cy) = (self.yaw * 0.5).sin_cos();
        let (sp, cp) = (self.pitch * 0.5).sin_cos();
        let (sr, cr) = (self.roll * 0.5).sin_cos();

        Quaternion {
            x: (sr * cp).mul_add(cy, -(cr * sp * sy)),
            y: (cr * sp).mul_add(cy, sr * cp * sy),
            z: (cr * cp).mul_add(sy, -(sr * sp * cy)),
            w: (cr * cp).mul_add(cy, sr * sp * sy),
        }
    }
}

/// Yaw, pitch and roll in degrees. Display form of [`EulerRadians`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct EulerDegrees {
    pub yaw: f64,
    pub pitch: f64,
    pub roll: f64,
}

impl EulerDegrees {
    #[must_use]
    pub const fn new(yaw: f64, pitch: f64, roll: f64) -> Self {
        Self { yaw, pitch, roll }
    }

    #[must_use]
    pub fn to_radians(self) -> EulerRadians {
        EulerRadians {
            yaw: self.yaw.to_radians(),
            pitch: self.pitch.to_radians(),
            roll: self.roll.to_radians(),
        }
    }

    #[must_use]
    pub fn to_quaternion(self) -> Quaternion {
        self.to_radians().to_quaternion()
    }
}

fn approx(a: f64, b: f64, epsilon: f64) -> bool {
    (a - b).abs() <= epsilon
}
