//! Collision outcome records
//!
//! One record per resolved contact, in the order they were resolved. Read by
//! the sound and scoring layers.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Outcome {
    /// Two balls, by index
    Collision { a: usize, b: usize, speed: f32 },
    /// A ball against a cushion or knuckle
    Cushion { ball: usize, speed: f32 },
    /// A ball captured by a pocket
    Pot { ball: usize, speed: f32 },
}

impl Outcome {
    pub fn collision(a: usize, b: usize, speed: f32) -> Self {
        Outcome::Collision {
            a,
            b,
            speed: speed.max(0.0),
        }
    }

    pub fn cushion(ball: usize, speed: f32) -> Self {
        Outcome::Cushion {
            ball,
            speed: speed.max(0.0),
        }
    }

    pub fn pot(ball: usize, speed: f32) -> Self {
        Outcome::Pot {
            ball,
            speed: speed.max(0.0),
        }
    }

    /// Impact speed (always non-negative)
    pub fn speed(&self) -> f32 {
        match *self {
            Outcome::Collision { speed, .. }
            | Outcome::Cushion { speed, .. }
            | Outcome::Pot { speed, .. } => speed,
        }
    }

    pub fn is_pot(&self) -> bool {
        matches!(self, Outcome::Pot { .. })
    }

    /// Does this record involve ball `index`
    pub fn involves(&self, index: usize) -> bool {
        match *self {
            Outcome::Collision { a, b, .. } => a == index || b == index,
            Outcome::Cushion { ball, .. } | Outcome::Pot { ball, .. } => ball == index,
        }
    }

    /// Indices of potted balls, in pot order
    pub fn pots(outcomes: &[Outcome]) -> Vec<usize> {
        outcomes
            .iter()
            .filter_map(|o| match *o {
                Outcome::Pot { ball, .. } => Some(ball),
                _ => None,
            })
            .collect()
    }

    /// First ball-ball contact (the "first hit" for foul rules)
    pub fn first_collision(outcomes: &[Outcome]) -> Option<&Outcome> {
        outcomes
            .iter()
            .find(|o| matches!(o, Outcome::Collision { .. }))
    }

    pub fn cushion_count(outcomes: &[Outcome]) -> usize {
        outcomes
            .iter()
            .filter(|o| matches!(o, Outcome::Cushion { .. }))
            .count()
    }
}
