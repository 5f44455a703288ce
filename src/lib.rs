//! Billiard Sim - pool table physics core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (balls, boundaries, collisions, cue)
//! - `settings`: Data-driven table dimensions and physical coefficients
//! - `error`: Failure modes surfaced to callers

pub mod error;
pub mod settings;
pub mod sim;

pub use error::{SettingsError, SimError, SnapshotError};
pub use settings::{TablePreset, TableSettings};

use glam::Vec3;

/// Simulation constants
pub mod consts {
    /// Fixed simulation timestep (120 Hz)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum resolution passes per advance before the configuration is declared unresolvable
    pub const MAX_RESOLVE_DEPTH: usize = 100;
    /// Small value for floating-point comparisons
    pub const EPSILON: f32 = 1e-6;
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Unit vector in the table plane at `angle` radians from the x axis
#[inline]
pub fn unit_at_angle(angle: f32) -> Vec3 {
    Vec3::new(angle.cos(), angle.sin(), 0.0)
}

/// `up × v`, the in-plane perpendicular of `v` rotated a quarter turn anticlockwise
#[inline]
pub fn up_cross(v: Vec3) -> Vec3 {
    Vec3::Z.cross(v)
}
