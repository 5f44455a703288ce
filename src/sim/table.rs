//! The table: balls, cue and outcome log, advanced in fixed steps
//!
//! Each step runs a bounded fixed-point loop rather than solving for the
//! earliest time of impact:
//! 1. Scan ball pairs in index order; resolve the first predicted contact.
//! 2. Only if no pair collided, scan balls against cushion, knuckle, pocket
//!    (in that order); resolve the first predicted contact.
//! 3. Any resolution restarts the scan from the first pair. A clean pass ends
//!    the loop and every ball integrates by the full step.
//!
//! Exhausting the pass limit is fatal for the step.

use std::sync::Arc;

use super::ball::{Ball, Body, MotionState};
use super::collision::{collide, will_collide};
use super::cue::Cue;
use super::cushion::Cushion;
use super::geometry::TableGeometry;
use super::knuckle::Knuckle;
use super::outcome::Outcome;
use super::pocket::Pocket;
use crate::consts::MAX_RESOLVE_DEPTH;
use crate::error::SimError;
use crate::settings::TableSettings;

pub struct Table<B: Body = Ball> {
    balls: Vec<B>,
    /// Every (a, b) with a < b, built once
    pairs: Vec<(usize, usize)>,
    outcome: Vec<Outcome>,
    pub cue: Cue,
    geometry: Arc<TableGeometry>,
}

impl<B: Body> Table<B> {
    /// Rack `balls` on a table layout. Ball 0 is the cue ball.
    pub fn new(balls: Vec<B>, geometry: Arc<TableGeometry>) -> Self {
        let n = balls.len();
        let mut pairs = Vec::with_capacity(n * n.saturating_sub(1) / 2);
        for a in 0..n {
            for b in (a + 1)..n {
                pairs.push((a, b));
            }
        }

        Self {
            balls,
            pairs,
            outcome: Vec::new(),
            cue: Cue::default(),
            geometry,
        }
    }

    pub fn with_cue(mut self, cue: Cue) -> Self {
        self.cue = cue;
        self
    }

    pub fn balls(&self) -> &[B] {
        &self.balls
    }

    pub fn ball(&self, index: usize) -> Option<&B> {
        self.balls.get(index)
    }

    pub fn ball_mut(&mut self, index: usize) -> Option<&mut B> {
        self.balls.get_mut(index)
    }

    pub fn pairs(&self) -> &[(usize, usize)] {
        &self.pairs
    }

    pub fn geometry(&self) -> &TableGeometry {
        &self.geometry
    }

    /// Collisions resolved since the last strike, in resolution order
    pub fn outcomes(&self) -> &[Outcome] {
        &self.outcome
    }

    /// Drain the outcome log
    pub fn take_outcomes(&mut self) -> Vec<Outcome> {
        std::mem::take(&mut self.outcome)
    }

    /// Advance every ball by `t`, resolving all collisions predicted within it
    pub fn advance(&mut self, t: f32) -> Result<(), SimError> {
        for depth in 0..MAX_RESOLVE_DEPTH {
            if self.prepare_advance_all(t) {
                for ball in &mut self.balls {
                    ball.update(t);
                }
                return Ok(());
            }
            log::trace!("Pass {depth} resolved a collision, rescanning");
        }

        log::error!(
            "Depth exceeded resolving collisions ({} passes, {} outcomes)",
            MAX_RESOLVE_DEPTH,
            self.outcome.len()
        );
        Err(SimError::DepthExceeded {
            depth: MAX_RESOLVE_DEPTH,
        })
    }

    /// One resolution pass. True if nothing would collide within `t`.
    fn prepare_advance_all(&mut self, t: f32) -> bool {
        if let Some(outcome) = self.resolve_first_pair(t) {
            self.outcome.push(outcome);
            return false;
        }

        for index in 0..self.balls.len() {
            if let Some(outcome) = self.resolve_boundary(index, t) {
                self.outcome.push(outcome);
                return false;
            }
        }

        true
    }

    fn resolve_first_pair(&mut self, t: f32) -> Option<Outcome> {
        let balls = &self.balls;
        let (a, b) = self
            .pairs
            .iter()
            .copied()
            .find(|&(a, b)| will_collide(&balls[a], &balls[b], t))?;

        let (ball_a, ball_b) = pair_mut(&mut self.balls, a, b);
        let speed = collide(ball_a, ball_b, self.geometry.restitution.ball);
        log::debug!("Ball {a} hit ball {b} at {speed:.3}");
        Some(Outcome::collision(a, b, speed))
    }

    fn resolve_boundary(&mut self, index: usize, t: f32) -> Option<Outcome> {
        let geometry = &self.geometry;
        let ball = &mut self.balls[index];

        if !ball.on_table() || geometry.within_playfield(ball.future_position(t)) {
            return None;
        }

        if let Some(cushion) = Cushion::will_bounce_any(&geometry.cushions, ball, t) {
            let speed = cushion.bounce(ball, geometry.restitution.cushion);
            log::debug!("Ball {index} hit cushion at {speed:.3}");
            return Some(Outcome::cushion(index, speed));
        }

        if let Some(knuckle) = Knuckle::will_bounce_any(&geometry.knuckles, ball, t) {
            let speed = knuckle.bounce(ball, geometry.restitution.knuckle);
            log::debug!("Ball {index} hit knuckle at {speed:.3}");
            return Some(Outcome::cushion(index, speed));
        }

        if let Some(pocket) = Pocket::will_fall_any(&geometry.pockets, ball, t) {
            let speed = pocket.fall(ball);
            log::info!("Ball {index} potted at {speed:.3}");
            return Some(Outcome::pot(index, speed));
        }

        None
    }

    /// True when nothing on the table is moving
    pub fn all_stationary(&self) -> bool {
        self.balls.iter().all(|b| !b.in_motion() || !b.on_table())
    }

    /// Strike the cue ball with the current aim, then consume the aim's power.
    /// Starts a new outcome log.
    pub fn hit(&mut self) {
        let aim = self.cue.aim;
        if let Some(cue_ball) = self.balls.first_mut() {
            let (vel, rvel) = aim.strike(cue_ball.radius());
            cue_ball.set_velocity(vel);
            cue_ball.set_angular_velocity(rvel);
            cue_ball.set_state(MotionState::Sliding);
            log::info!(
                "Strike: angle {:.3} power {:.3} offset ({:.2}, {:.2})",
                aim.angle,
                aim.power,
                aim.side_offset,
                aim.vertical_offset
            );
        }
        self.cue.aim.power = 0.0;
        self.outcome.clear();
    }
}

impl Table<Ball> {
    /// Build the geometry and cue for `settings` and rack `balls` on it
    pub fn from_settings(balls: Vec<Ball>, settings: &TableSettings) -> Self {
        Table::new(balls, Arc::new(TableGeometry::from_settings(settings)))
            .with_cue(Cue::from_settings(settings))
    }
}

/// Two distinct mutable balls, `a < b`
fn pair_mut<B>(balls: &mut [B], a: usize, b: usize) -> (&mut B, &mut B) {
    debug_assert!(a < b);
    let (left, right) = balls.split_at_mut(b);
    (&mut left[a], &mut right[0])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::sim::rack;
    use glam::Vec3;

    fn settings() -> TableSettings {
        TableSettings::default()
    }

    fn ball(pos: Vec3, vel: Vec3) -> Ball {
        let mut b = Ball::new(pos, &settings());
        b.vel = vel;
        if vel != Vec3::ZERO {
            b.state = MotionState::Rolling;
        }
        b
    }

    fn table(balls: Vec<Ball>) -> Table {
        Table::from_settings(balls, &settings())
    }

    #[test]
    fn test_pairs_built_once() {
        let t = table(rack::triangle(&settings(), 1));
        assert_eq!(t.balls().len(), 16);
        assert_eq!(t.pairs().len(), 16 * 15 / 2);
        assert!(t.pairs().iter().all(|&(a, b)| a < b));
        assert_eq!(t.pairs()[0], (0, 1));
    }

    #[test]
    fn test_free_ball_moves() {
        let mut t = table(vec![ball(Vec3::ZERO, Vec3::new(1.0, 0.0, 0.0))]);
        t.advance(SIM_DT).unwrap();
        assert!((t.balls()[0].pos.x - SIM_DT).abs() < 1e-6);
        assert!(t.outcomes().is_empty());
    }

    #[test]
    fn test_no_tunnelling_for_isolated_pair() {
        let dt = 0.02;
        let mut t = table(vec![
            ball(Vec3::new(-0.05, 0.0, 0.0), Vec3::new(2.0, 0.0, 0.0)),
            ball(Vec3::new(0.05, 0.0, 0.0), Vec3::new(-2.0, 0.0, 0.0)),
        ]);
        // Predicted end positions overlap
        assert!(will_collide(&t.balls()[0], &t.balls()[1], dt));

        t.advance(dt).unwrap();

        let r = settings().ball_radius;
        let separation = t.balls()[0].pos.distance(t.balls()[1].pos);
        assert!(separation >= 2.0 * r, "separation {separation}");
        assert_eq!(t.outcomes().len(), 1);
        assert!(matches!(t.outcomes()[0], Outcome::Collision { a: 0, b: 1, .. }));
        assert!((t.outcomes()[0].speed() - 4.0).abs() < 1e-5);
    }

    #[test]
    fn test_substeps_agree_with_single_step() {
        let setup = || {
            table(vec![
                ball(Vec3::ZERO, Vec3::new(1.0, 0.0, 0.0)),
                ball(Vec3::new(0.07, 0.0, 0.0), Vec3::ZERO),
            ])
        };
        let dt = 0.05;

        let mut once = setup();
        once.advance(dt).unwrap();

        let mut split = setup();
        for _ in 0..4 {
            split.advance(dt / 4.0).unwrap();
        }

        assert_eq!(once.outcomes().len(), 1);
        assert_eq!(split.outcomes().len(), 1);
        match (once.outcomes()[0], split.outcomes()[0]) {
            (
                Outcome::Collision { a: a1, b: b1, speed: s1 },
                Outcome::Collision { a: a2, b: b2, speed: s2 },
            ) => {
                assert_eq!((a1, b1), (a2, b2));
                assert!((s1 - s2).abs() < 0.01, "{s1} vs {s2}");
            }
            other => panic!("unexpected outcomes {other:?}"),
        }
    }

    #[test]
    fn test_overlapping_at_rest_is_fatal() {
        let mut t = table(vec![
            ball(Vec3::ZERO, Vec3::ZERO),
            ball(Vec3::new(0.01, 0.0, 0.0), Vec3::ZERO),
        ]);
        let err = t.advance(SIM_DT).unwrap_err();
        assert_eq!(
            err,
            SimError::DepthExceeded {
                depth: MAX_RESOLVE_DEPTH
            }
        );
        // Balls were not integrated
        assert_eq!(t.balls()[0].pos, Vec3::ZERO);
    }

    #[test]
    fn test_ball_pair_takes_priority_over_boundary() {
        let mut t = table(vec![
            ball(Vec3::new(1.15, 0.0, 0.0), Vec3::new(2.0, 0.0, 0.0)),
            ball(Vec3::new(1.21, 0.0, 0.0), Vec3::ZERO),
            ball(Vec3::new(-1.23, 0.0, 0.0), Vec3::new(-2.0, 0.0, 0.0)),
        ]);
        t.advance(SIM_DT).unwrap();

        let outcomes = t.outcomes();
        assert!(matches!(outcomes[0], Outcome::Collision { a: 0, b: 1, .. }));
        assert!(
            outcomes
                .iter()
                .any(|o| matches!(o, Outcome::Cushion { ball: 2, .. }))
        );
        assert!(t.balls()[2].vel.x > 0.0);
    }

    #[test]
    fn test_cushion_bounce_reverses_ball() {
        let s = settings();
        let mut t = table(vec![ball(
            Vec3::new(s.table_x() - 0.005, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
        )]);
        t.advance(SIM_DT).unwrap();

        assert_eq!(t.outcomes().len(), 1);
        assert!(matches!(t.outcomes()[0], Outcome::Cushion { ball: 0, .. }));
        assert!((t.outcomes()[0].speed() - 1.0).abs() < 1e-6);
        let b = &t.balls()[0];
        assert!(b.vel.x < 0.0 && b.vel.x.abs() <= s.cushion_restitution + 1e-6);
        assert!(b.pos.x < s.table_x());
        assert_eq!(b.state, MotionState::Sliding);
    }

    #[test]
    fn test_pocketed_ball_leaves_play() {
        let mut t = table(vec![
            ball(Vec3::new(-0.3, 0.0, 0.0), Vec3::ZERO),
            ball(
                Vec3::new(1.2, 0.57, 0.0),
                Vec3::new(1.0, 1.0, 0.0).normalize() * 1.0,
            ),
        ]);

        let mut ticks = 0;
        while t.balls()[1].state != MotionState::InPocket && ticks < 120 {
            t.advance(SIM_DT).unwrap();
            ticks += 1;
        }
        assert_eq!(t.balls()[1].state, MotionState::InPocket);
        assert_eq!(Outcome::pots(t.outcomes()), vec![1]);
        assert!(!t.balls()[1].on_table());

        // Leave the captured ball's last position directly in the cue ball's path
        t.ball_mut(1).unwrap().pos = Vec3::ZERO;
        t.take_outcomes();
        t.ball_mut(0).unwrap().vel = Vec3::new(1.0, 0.0, 0.0);
        t.ball_mut(0).unwrap().state = MotionState::Rolling;

        for _ in 0..60 {
            t.advance(SIM_DT).unwrap();
        }
        assert!(t.balls()[0].pos.x > 0.1);
        assert!(t.outcomes().iter().all(|o| !o.involves(1)));
        assert_eq!(t.balls()[1].pos, Vec3::ZERO);
        assert_eq!(t.balls()[1].state, MotionState::InPocket);
    }

    #[test]
    fn test_knuckle_bounce_in_middle_pocket_mouth() {
        let s = settings();
        let g = TableGeometry::from_settings(&s);
        // Head straight up into the first knuckle of the top middle pocket
        let knuckle = g
            .knuckles
            .iter()
            .find(|k| k.pos.y > 0.0 && (k.pos.x - s.middle_mouth).abs() < 1e-6)
            .unwrap()
            .clone();
        // Just off the end of the rail so the cushion segment cannot claim it
        let start = Vec3::new(knuckle.pos.x - 0.005, g.table_y - 0.001, 0.0);
        let mut t = table(vec![ball(start, Vec3::new(0.0, 2.0, 0.0))]);

        let mut ticks = 0;
        while t.outcomes().is_empty() && ticks < 30 {
            t.advance(SIM_DT).unwrap();
            ticks += 1;
        }
        assert!(matches!(t.outcomes()[0], Outcome::Cushion { ball: 0, .. }));
        assert!(t.balls()[0].vel.y < 0.0);
        assert!(t.balls()[0].on_table());
    }

    #[test]
    fn test_hit_plain_strike() {
        let mut t = table(rack::diamond(&settings(), 7));
        t.cue.aim.angle = 0.0;
        t.cue.aim.power = 2.0;
        t.hit();

        let cue_ball = &t.balls()[0];
        assert_eq!(cue_ball.vel, Vec3::new(2.0 * 0.0_f32.cos(), 2.0 * 0.0_f32.sin(), 0.0));
        assert_eq!(cue_ball.rvel, Vec3::ZERO);
        assert_eq!(cue_ball.state, MotionState::Sliding);
        assert_eq!(t.cue.aim.power, 0.0);
        assert!(!t.all_stationary());
    }

    #[test]
    fn test_hit_spin_only() {
        let mut t = table(vec![ball(Vec3::ZERO, Vec3::ZERO)]);
        t.cue.aim.power = 1.0;
        t.cue.aim.vertical_offset = 0.3;
        t.cue.set_spin_only(true);
        t.hit();
        assert_eq!(t.balls()[0].vel, Vec3::ZERO);
        assert!(t.balls()[0].rvel.length() > 0.0);
    }

    #[test]
    fn test_break_runs_to_rest() {
        let s = settings();
        let mut t = table(rack::diamond(&s, 42));
        t.cue.aim.power = 4.0;
        t.hit();

        let mut ticks = 0;
        while !t.all_stationary() && ticks < 120 * 120 {
            t.advance(SIM_DT).unwrap();
            ticks += 1;
        }

        assert!(t.all_stationary());
        assert!(matches!(
            Outcome::first_collision(t.outcomes()),
            Some(Outcome::Collision { a: 0, .. })
        ));
        let reach_x = s.half_length + s.ball_radius;
        let reach_y = s.half_width + s.ball_radius;
        for b in t.balls().iter().filter(|b| b.on_table()) {
            assert!(b.pos.x.abs() <= reach_x && b.pos.y.abs() <= reach_y, "{b:?}");
        }
    }
}
