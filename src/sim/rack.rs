//! Opening racks
//!
//! Ball 0 is the cue ball, on the head spot. Object balls pack in rows from
//! the foot spot toward the foot rail, each nudged by a seeded sub-gap jitter.

use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::ball::Ball;
use crate::settings::TableSettings;

/// Clearance between neighbouring rack balls, as a fraction of the radius
const GAP_FRACTION: f32 = 0.05;

/// Nine-ball diamond
pub fn diamond(settings: &TableSettings, seed: u64) -> Vec<Ball> {
    layout(settings, seed, &[1, 2, 3, 2, 1])
}

/// Fifteen-ball triangle
pub fn triangle(settings: &TableSettings, seed: u64) -> Vec<Ball> {
    layout(settings, seed, &[1, 2, 3, 4, 5])
}

fn layout(settings: &TableSettings, seed: u64, rows: &[usize]) -> Vec<Ball> {
    let r = settings.ball_radius;
    let gap = r * GAP_FRACTION;
    let spacing = 2.0 * r + gap;
    let row_step = spacing * 3.0_f32.sqrt() * 0.5;
    // Worst case two neighbours close by 2 * sqrt(2) * jitter, kept under the gap
    let jitter = gap * 0.3;

    let mut rng = Pcg32::seed_from_u64(seed);
    let foot_spot = settings.half_length * 0.5;

    let mut balls = Vec::with_capacity(1 + rows.iter().sum::<usize>());
    balls.push(Ball::new(Vec3::new(-foot_spot, 0.0, 0.0), settings));

    for (row, &count) in rows.iter().enumerate() {
        let x = foot_spot + row as f32 * row_step;
        let half = (count as f32 - 1.0) * 0.5;
        for k in 0..count {
            let y = (k as f32 - half) * spacing;
            let nudge = Vec3::new(
                rng.random_range(-jitter..=jitter),
                rng.random_range(-jitter..=jitter),
                0.0,
            );
            balls.push(Ball::new(Vec3::new(x, y, 0.0) + nudge, settings));
        }
    }

    log::debug!("Racked {} balls (seed {seed})", balls.len());
    balls
}
