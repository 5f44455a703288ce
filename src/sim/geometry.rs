//! Table boundary geometry
//!
//! Built once per table layout from [`TableSettings`] and shared by reference
//! between every table racked on it. Nothing here changes during a rack.
//!
//! ```text
//!   P─k  k───────────k  k───────────k  k─P
//!   k                   P                k
//!   │                                    │
//!   │               (0, 0)               │
//!   │                                    │
//!   k                   P                k
//!   P─k  k───────────k  k───────────k  k─P
//! ```
//!
//! Six pockets (P), six straight cushions, and a knuckle (k) at each rail end.

use glam::Vec3;

use super::cushion::Cushion;
use super::knuckle::Knuckle;
use super::pocket::Pocket;
use crate::settings::TableSettings;

/// Restitution coefficients for each collision type
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Restitution {
    pub ball: f32,
    pub cushion: f32,
    pub knuckle: f32,
}

/// Immutable boundary geometry for one table layout
#[derive(Debug, Clone, PartialEq)]
pub struct TableGeometry {
    /// Half-extent of ball-centre space along x (cushion nose minus radius)
    pub table_x: f32,
    /// Half-extent of ball-centre space along y
    pub table_y: f32,
    pub cushions: Vec<Cushion>,
    pub knuckles: Vec<Knuckle>,
    pub pockets: Vec<Pocket>,
    pub restitution: Restitution,
}

impl TableGeometry {
    pub fn from_settings(settings: &TableSettings) -> Self {
        let l = settings.half_length;
        let w = settings.half_width;
        let tx = settings.table_x();
        let ty = settings.table_y();
        let c = settings.corner_mouth;
        let m = settings.middle_mouth;
        let kr = settings.knuckle_radius;

        let mut cushions = Vec::with_capacity(6);
        let mut knuckles = Vec::with_capacity(12);

        for sy in [1.0_f32, -1.0] {
            let normal = Vec3::new(0.0, -sy, 0.0);
            // Long rails either side of the middle pocket
            for (x0, x1) in [(-(l - c), -m), (m, l - c)] {
                cushions.push(Cushion::new(
                    Vec3::new(x0, sy * ty, 0.0),
                    Vec3::new(x1, sy * ty, 0.0),
                    normal,
                ));
                knuckles.push(Knuckle::new(Vec3::new(x0, sy * (w + kr), 0.0), kr));
                knuckles.push(Knuckle::new(Vec3::new(x1, sy * (w + kr), 0.0), kr));
            }
        }

        for sx in [1.0_f32, -1.0] {
            cushions.push(Cushion::new(
                Vec3::new(sx * tx, -(w - c), 0.0),
                Vec3::new(sx * tx, w - c, 0.0),
                Vec3::new(-sx, 0.0, 0.0),
            ));
            knuckles.push(Knuckle::new(Vec3::new(sx * (l + kr), -(w - c), 0.0), kr));
            knuckles.push(Knuckle::new(Vec3::new(sx * (l + kr), w - c, 0.0), kr));
        }

        let co = settings.corner_pocket_offset;
        let mut pockets = Vec::with_capacity(6);
        for sy in [1.0_f32, -1.0] {
            for sx in [-1.0_f32, 1.0] {
                pockets.push(Pocket::new(
                    Vec3::new(sx * (l + co), sy * (w + co), 0.0),
                    settings.corner_pocket_radius,
                ));
            }
            pockets.push(Pocket::new(
                Vec3::new(0.0, sy * (w + settings.middle_pocket_offset), 0.0),
                settings.middle_pocket_radius,
            ));
        }

        Self {
            table_x: tx,
            table_y: ty,
            cushions,
            knuckles,
            pockets,
            restitution: Restitution {
                ball: settings.ball_restitution,
                cushion: settings.cushion_restitution,
                knuckle: settings.knuckle_restitution,
            },
        }
    }

    /// True if a ball centred at `p` is strictly inside the cushion lines.
    /// No boundary can be touched from here.
    #[inline]
    pub fn within_playfield(&self, p: Vec3) -> bool {
        p.x.abs() < self.table_x && p.y.abs() < self.table_y
    }
}

impl Default for TableGeometry {
    fn default() -> Self {
        Self::from_settings(&TableSettings::default())
    }
}
