//! Straight cushion segments
//!
//! A cushion is stored in ball-centre space: the segment a ball centre may not
//! cross, already inset from the rail nose by the ball radius.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::ball::Body;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cushion {
    pub start: Vec3,
    pub end: Vec3,
    /// Unit normal pointing into the playing area
    pub normal: Vec3,
}

impl Cushion {
    pub fn new(start: Vec3, end: Vec3, normal: Vec3) -> Self {
        Self {
            start,
            end,
            normal: normal.normalize_or_zero(),
        }
    }

    /// True if `point` lies behind the segment, within its extent
    pub fn is_behind(&self, point: Vec3) -> bool {
        let offset = point - self.start;
        if offset.dot(self.normal) >= 0.0 {
            return false;
        }
        let along = self.end - self.start;
        let t = offset.dot(along);
        t >= 0.0 && t <= along.length_squared()
    }

    /// Will an approaching body cross this cushion within `t`
    pub fn will_bounce<B: Body>(&self, ball: &B, t: f32) -> bool {
        ball.on_table()
            && ball.velocity().dot(self.normal) < 0.0
            && self.is_behind(ball.future_position(t))
    }

    /// Reflect the normal velocity component scaled by `restitution`.
    /// Returns the incident normal speed.
    pub fn bounce<B: Body>(&self, ball: &mut B, restitution: f32) -> f32 {
        let vel = ball.velocity();
        let vn = vel.dot(self.normal);
        ball.set_velocity(vel - self.normal * ((1.0 + restitution) * vn));
        ball.after_bounce(restitution);
        vn.abs()
    }

    /// First cushion in declaration order the body would cross
    pub fn will_bounce_any<'a, B: Body>(cushions: &'a [Cushion], ball: &B, t: f32) -> Option<&'a Cushion> {
        cushions.iter().find(|c| c.will_bounce(ball, t))
    }
}
