//! Knuckles: the rounded rail ends at each pocket mouth
//!
//! Modelled as immovable circular obstacles, i.e. a ball-ball collision
//! against a ball of infinite mass.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::ball::Body;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Knuckle {
    pub pos: Vec3,
    pub radius: f32,
}

impl Knuckle {
    pub fn new(pos: Vec3, radius: f32) -> Self {
        Self { pos, radius }
    }

    /// Would a ball of `ball_radius` centred at `future_position` overlap the knuckle
    pub fn will_bounce_at(&self, future_position: Vec3, ball_radius: f32) -> bool {
        future_position.distance(self.pos) < ball_radius + self.radius
    }

    pub fn will_bounce<B: Body>(&self, ball: &B, t: f32) -> bool {
        ball.on_table() && self.will_bounce_at(ball.future_position(t), ball.radius())
    }

    /// Reflect the velocity component along the knuckle-to-ball axis.
    /// Returns the incident speed along that axis.
    pub fn bounce<B: Body>(&self, ball: &mut B, restitution: f32) -> f32 {
        let kb = (ball.position() - self.pos).normalize_or_zero();
        let vel = ball.velocity();
        let vel_dot_centres = kb.dot(vel);
        if vel_dot_centres < 0.0 {
            ball.set_velocity(vel - kb * ((1.0 + restitution) * vel_dot_centres));
        }
        ball.after_bounce(restitution);
        vel_dot_centres.abs()
    }

    /// First knuckle in declaration order the body would touch
    pub fn will_bounce_any<'a, B: Body>(knuckles: &'a [Knuckle], ball: &B, t: f32) -> Option<&'a Knuckle> {
        knuckles.iter().find(|k| k.will_bounce(ball, t))
    }
}
