//! Ball-ball collision detection and response
//!
//! Detection is discrete: two balls collide if their straight-line predicted
//! positions after `t` overlap. Response is an impulse along the line of
//! centres at the current positions; tangential components are untouched.

use super::ball::{Body, MotionState};

/// Would `a` and `b` overlap after advancing `t` at their current velocities
pub fn will_collide<B: Body>(a: &B, b: &B, t: f32) -> bool {
    if !(a.on_table() && b.on_table()) {
        return false;
    }
    let contact = a.radius() + b.radius();
    a.future_position(t).distance_squared(b.future_position(t)) < contact * contact
}

/// Exchange normal momentum between two equal-mass balls.
///
/// The approach speed along the line of centres is reversed and scaled by
/// `restitution`. Positions are not moved. Returns the incident normal speed.
pub fn collide<B: Body>(a: &mut B, b: &mut B, restitution: f32) -> f32 {
    let ab = (b.position() - a.position()).normalize_or_zero();
    let approach = (a.velocity() - b.velocity()).dot(ab);

    if approach > 0.0 {
        let dv = ab * (approach * (1.0 + restitution) * 0.5);
        a.set_velocity(a.velocity() - dv);
        b.set_velocity(b.velocity() + dv);
        a.set_state(MotionState::Sliding);
        b.set_state(MotionState::Sliding);
    }

    approach.abs()
}
