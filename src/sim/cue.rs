//! Cue aim and strike
//!
//! The input layer adjusts the [`Aim`]; the table consumes it once per shot.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::consts::EPSILON;
use crate::settings::TableSettings;
use crate::{normalize_angle, unit_at_angle, up_cross};

/// Where and how hard the cue ball will be struck
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Aim {
    /// Direction of travel (radians from the x axis)
    pub angle: f32,
    /// Cue ball speed imparted by the strike
    pub power: f32,
    /// Tip offset above centre, as a fraction of the ball radius (negative is draw)
    pub vertical_offset: f32,
    /// Tip offset right of centre, as a fraction of the ball radius
    pub side_offset: f32,
    /// Impart spin only, no translation
    pub spin_only: bool,
}

impl Aim {
    pub fn is_finite(&self) -> bool {
        self.angle.is_finite()
            && self.power.is_finite()
            && self.vertical_offset.is_finite()
            && self.side_offset.is_finite()
    }

    /// Linear and angular velocity this aim gives a ball of `ball_radius`.
    ///
    /// Spin axis is `up × dir` (pure topspin) rotated about the strike direction
    /// by `atan2(-side, vertical)`, with magnitude `5/2 · offset · power / R`
    /// from the impulse lever arm on a solid sphere.
    pub fn strike(&self, ball_radius: f32) -> (Vec3, Vec3) {
        let dir = unit_at_angle(self.angle);
        let vel = if self.spin_only {
            Vec3::ZERO
        } else {
            dir * self.power
        };

        let offset = self.vertical_offset.hypot(self.side_offset);
        if offset < EPSILON {
            return (vel, Vec3::ZERO);
        }

        let spin_angle = (-self.side_offset).atan2(self.vertical_offset);
        let axis = Quat::from_axis_angle(dir, spin_angle) * up_cross(dir);
        let rvel = axis * (2.5 * offset * self.power / ball_radius);
        (vel, rvel)
    }
}

/// The cue: current aim plus the limits input is clamped to
#[derive(Debug, Clone, PartialEq)]
pub struct Cue {
    pub aim: Aim,
    pub max_power: f32,
    /// Radius of the allowed tip-offset disc
    pub max_offset: f32,
}

impl Default for Cue {
    fn default() -> Self {
        Self::from_settings(&TableSettings::default())
    }
}

impl Cue {
    pub fn from_settings(settings: &TableSettings) -> Self {
        Self {
            aim: Aim::default(),
            max_power: settings.max_power,
            max_offset: settings.max_offset,
        }
    }

    pub fn rotate(&mut self, delta: f32) {
        self.aim.angle = normalize_angle(self.aim.angle + delta);
    }

    pub fn adjust_power(&mut self, delta: f32) {
        self.aim.power = (self.aim.power + delta).clamp(0.0, self.max_power);
    }

    /// Move the tip offset, keeping it inside the offset disc
    pub fn adjust_spin(&mut self, delta_side: f32, delta_vertical: f32) {
        let side = self.aim.side_offset + delta_side;
        let vertical = self.aim.vertical_offset + delta_vertical;
        let len = side.hypot(vertical);
        let scale = if len > self.max_offset {
            self.max_offset / len
        } else {
            1.0
        };
        self.aim.side_offset = side * scale;
        self.aim.vertical_offset = vertical * scale;
    }

    pub fn set_spin_only(&mut self, spin_only: bool) {
        self.aim.spin_only = spin_only;
    }
}
