//! Deterministic simulation module
//!
//! All physics lives here. This module must be pure and deterministic:
//! - Caller-supplied timestep only
//! - Seeded RNG only (rack jitter)
//! - Stable iteration order (by ball index, then boundary declaration order)
//! - No rendering or platform dependencies

pub mod ball;
pub mod collision;
pub mod cue;
pub mod cushion;
pub mod geometry;
pub mod knuckle;
pub mod outcome;
pub mod pocket;
pub mod rack;
pub mod snapshot;
pub mod table;

pub use ball::{Ball, Body, Friction, MotionState};
pub use collision::{collide, will_collide};
pub use cue::{Aim, Cue};
pub use cushion::Cushion;
pub use geometry::{Restitution, TableGeometry};
pub use knuckle::Knuckle;
pub use outcome::Outcome;
pub use pocket::Pocket;
pub use snapshot::{BallSnapshot, TableSnapshot};
pub use table::Table;
