//! Rocket League hitbox preset extractor.
//!
//! Turns patch tester car stat exports into per-car records and groups cars
//! that share a hitbox into presets.

pub mod commands;
pub mod output;
