//! Ball entity and its motion model
//!
//! The collision engine only sees balls through the [`Body`] trait: it predicts
//! where a body will be, nudges its velocity, and asks it to integrate itself.
//! How a ball slides, rolls and spins down is the ball's own business.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::consts::EPSILON;
use crate::settings::TableSettings;

/// Motion state of a ball. Exactly one at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MotionState {
    /// At rest on the cloth
    #[default]
    Stationary,
    /// Contact point slipping over the cloth
    Sliding,
    /// Rolling without slip
    Rolling,
    /// No translation, spinning about the vertical axis
    Spinning,
    /// Captured by a pocket, out of play for the rest of the rack
    InPocket,
}

/// Capabilities the collision engine needs from a simulated body
pub trait Body {
    fn radius(&self) -> f32;
    fn position(&self) -> Vec3;
    fn velocity(&self) -> Vec3;
    fn set_velocity(&mut self, vel: Vec3);
    fn angular_velocity(&self) -> Vec3;
    fn set_angular_velocity(&mut self, rvel: Vec3);
    fn state(&self) -> MotionState;
    fn set_state(&mut self, state: MotionState);

    /// Integrate position and the body's own friction/spin model over `t`
    fn update(&mut self, t: f32);

    /// Straight-line position after `t` at the current velocity
    fn future_position(&self, t: f32) -> Vec3 {
        self.position() + self.velocity() * t
    }

    fn on_table(&self) -> bool {
        self.state() != MotionState::InPocket
    }

    fn in_motion(&self) -> bool {
        matches!(
            self.state(),
            MotionState::Sliding | MotionState::Rolling | MotionState::Spinning
        )
    }

    /// Called after a cushion or knuckle has reflected the body's velocity
    fn after_bounce(&mut self, _restitution: f32) {
        self.set_state(MotionState::Sliding);
    }
}

/// Cloth friction coefficients carried by each ball
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Friction {
    pub mu_slide: f32,
    pub mu_roll: f32,
    pub mu_spin: f32,
    pub gravity: f32,
}

impl Friction {
    pub fn from_settings(settings: &TableSettings) -> Self {
        Self {
            mu_slide: settings.mu_slide,
            mu_roll: settings.mu_roll,
            mu_spin: settings.mu_spin,
            gravity: settings.gravity,
        }
    }
}

/// A pool ball
#[derive(Debug, Clone, PartialEq)]
pub struct Ball {
    pub pos: Vec3,
    pub vel: Vec3,
    /// Angular velocity (rad/s, right-hand rule)
    pub rvel: Vec3,
    pub state: MotionState,
    pub radius: f32,
    pub friction: Friction,
}

impl Ball {
    pub fn new(pos: Vec3, settings: &TableSettings) -> Self {
        Self {
            pos,
            vel: Vec3::ZERO,
            rvel: Vec3::ZERO,
            state: MotionState::Stationary,
            radius: settings.ball_radius,
            friction: Friction::from_settings(settings),
        }
    }

    /// Velocity of the cloth contact point relative to the cloth
    pub fn contact_velocity(&self) -> Vec3 {
        let r = Vec3::new(0.0, 0.0, -self.radius);
        let vc = self.vel + self.rvel.cross(r);
        Vec3::new(vc.x, vc.y, 0.0)
    }

    fn update_sliding(&mut self, t: f32) {
        let vc = self.contact_velocity();
        let slip = vc.length();
        if slip < EPSILON {
            self.state = MotionState::Rolling;
            self.update_rolling(t);
            return;
        }

        let Friction { mu_slide, gravity, .. } = self.friction;
        let dir = vc / slip;
        // Slip decays at 7/2 mu g: mu g from the linear term, 5/2 mu g from spin
        let time_to_roll = slip / (3.5 * mu_slide * gravity);
        let step = t.min(time_to_roll);

        self.vel -= dir * (mu_slide * gravity * step);
        let spin_rate = 2.5 * mu_slide * gravity / self.radius;
        self.rvel += Vec3::new(-dir.y, dir.x, 0.0) * (spin_rate * step);

        if step >= time_to_roll {
            self.state = MotionState::Rolling;
            self.match_rolling_spin();
        }
        self.decay_side_spin(t);
    }

    fn update_rolling(&mut self, t: f32) {
        let Friction { mu_roll, gravity, .. } = self.friction;
        let planar = Vec3::new(self.vel.x, self.vel.y, 0.0);
        let speed = planar.length();
        let decel = mu_roll * gravity * t;

        if speed <= decel {
            self.vel = Vec3::ZERO;
            self.rvel.x = 0.0;
            self.rvel.y = 0.0;
            self.state = if self.rvel.z.abs() > EPSILON {
                MotionState::Spinning
            } else {
                MotionState::Stationary
            };
        } else {
            self.vel = planar * ((speed - decel) / speed);
            self.match_rolling_spin();
        }
        self.decay_side_spin(t);
    }

    fn update_spinning(&mut self, t: f32) {
        self.decay_side_spin(t);
        if self.rvel.z == 0.0 {
            self.rvel = Vec3::ZERO;
            self.state = MotionState::Stationary;
        }
    }

    /// Horizontal spin components for rolling without slip at the current velocity
    fn match_rolling_spin(&mut self) {
        self.rvel.x = -self.vel.y / self.radius;
        self.rvel.y = self.vel.x / self.radius;
    }

    fn decay_side_spin(&mut self, t: f32) {
        let Friction { mu_spin, gravity, .. } = self.friction;
        let decay = 2.5 * mu_spin * gravity / self.radius * t;
        let w = self.rvel.z;
        self.rvel.z = if w.abs() <= decay { 0.0 } else { w - decay * w.signum() };
    }
}

impl Body for Ball {
    fn radius(&self) -> f32 {
        self.radius
    }

    fn position(&self) -> Vec3 {
        self.pos
    }

    fn velocity(&self) -> Vec3 {
        self.vel
    }

    fn set_velocity(&mut self, vel: Vec3) {
        self.vel = vel;
    }

    fn angular_velocity(&self) -> Vec3 {
        self.rvel
    }

    fn set_angular_velocity(&mut self, rvel: Vec3) {
        self.rvel = rvel;
    }

    fn state(&self) -> MotionState {
        self.state
    }

    fn set_state(&mut self, state: MotionState) {
        self.state = state;
    }

    fn update(&mut self, t: f32) {
        match self.state {
            MotionState::Stationary | MotionState::InPocket => {}
            MotionState::Sliding => {
                self.pos += self.vel * t;
                self.update_sliding(t);
            }
            MotionState::Rolling => {
                self.pos += self.vel * t;
                self.update_rolling(t);
            }
            MotionState::Spinning => self.update_spinning(t),
        }
    }

    /// Cushions bite into side spin; the ball leaves the rail sliding
    fn after_bounce(&mut self, restitution: f32) {
        self.rvel.z *= restitution;
        self.state = MotionState::Sliding;
    }
}
