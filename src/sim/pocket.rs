//! Pockets: capture circles that take a ball out of play

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::ball::{Body, MotionState};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pocket {
    pub pos: Vec3,
    /// Capture radius for the ball centre
    pub radius: f32,
}

impl Pocket {
    pub fn new(pos: Vec3, radius: f32) -> Self {
        Self { pos, radius }
    }

    pub fn will_fall<B: Body>(&self, ball: &B, t: f32) -> bool {
        ball.on_table() && ball.future_position(t).distance(self.pos) < self.radius
    }

    /// Capture the ball. Returns its speed on entry.
    pub fn fall<B: Body>(&self, ball: &mut B) -> f32 {
        let speed = ball.velocity().length();
        ball.set_velocity(Vec3::ZERO);
        ball.set_angular_velocity(Vec3::ZERO);
        ball.set_state(MotionState::InPocket);
        speed
    }

    pub fn will_fall_any<'a, B: Body>(pockets: &'a [Pocket], ball: &B, t: f32) -> Option<&'a Pocket> {
        pockets.iter().find(|p| p.will_fall(ball, t))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::TableSettings;
    use crate::sim::ball::Ball;

    fn ball_at(pos: Vec3, vel: Vec3) -> Ball {
        let mut ball = Ball::new(pos, &TableSettings::default());
        ball.vel = vel;
        ball.rvel = Vec3::new(0.0, 10.0, 3.0);
        ball.state = MotionState::Rolling;
        ball
    }

    #[test]
    fn test_will_fall() {
        let pocket = Pocket::new(Vec3::new(1.0, 0.0, 0.0), 0.05);
        let ball = ball_at(Vec3::new(0.9, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0));
        assert!(!pocket.will_fall(&ball, 0.01));
        assert!(pocket.will_fall(&ball, 0.07));
    }

    #[test]
    fn test_fall_captures() {
        let pocket = Pocket::new(Vec3::new(1.0, 0.0, 0.0), 0.05);
        let mut ball = ball_at(Vec3::new(0.96, 0.0, 0.0), Vec3::new(3.0, 4.0, 0.0));

        let speed = pocket.fall(&mut ball);
        assert!((speed - 5.0).abs() < 1e-6);
        assert_eq!(ball.state, MotionState::InPocket);
        assert_eq!(ball.vel, Vec3::ZERO);
        assert_eq!(ball.rvel, Vec3::ZERO);
        // Last known position is kept
        assert_eq!(ball.pos, Vec3::new(0.96, 0.0, 0.0));
        assert!(!pocket.will_fall(&ball, 0.0));
    }
}
