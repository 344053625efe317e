//! Car geometry shared across the hitbox tooling crates.
//!
//! Holds the 3D math primitives, the per-car physical model built from a
//! patch tester stat export, and the stat key layout those exports use.

mod car;
mod math;
pub mod stats;
mod wheel;

pub use car::*;
pub use math::*;
pub use stats::StatMap;
pub use wheel::*;
