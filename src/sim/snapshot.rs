//! Table state snapshots
//!
//! The full snapshot carries everything needed to resume a shot mid-flight.
//! The short form is just the x, y of each ball, for streaming to a spectator
//! between full syncs.
//!
//! Snapshots are checked in full before any ball is touched, so a bad payload
//! leaves the table as it was.

use std::sync::Arc;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::ball::{Ball, MotionState};
use super::cue::{Aim, Cue};
use super::geometry::TableGeometry;
use super::table::Table;
use crate::error::SnapshotError;
use crate::settings::TableSettings;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BallSnapshot {
    pub pos: Vec3,
    pub vel: Vec3,
    pub rvel: Vec3,
    pub state: MotionState,
}

impl From<&Ball> for BallSnapshot {
    fn from(ball: &Ball) -> Self {
        Self {
            pos: ball.pos,
            vel: ball.vel,
            rvel: ball.rvel,
            state: ball.state,
        }
    }
}

impl BallSnapshot {
    fn is_finite(&self) -> bool {
        self.pos.is_finite() && self.vel.is_finite() && self.rvel.is_finite()
    }

    fn apply(&self, ball: &mut Ball) {
        ball.pos = self.pos;
        ball.vel = self.vel;
        ball.rvel = self.rvel;
        ball.state = self.state;
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableSnapshot {
    pub balls: Vec<BallSnapshot>,
    pub aim: Aim,
}

impl TableSnapshot {
    pub fn to_json(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Decode and check every value is finite
    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        let snapshot: TableSnapshot = serde_json::from_str(json)?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    pub fn validate(&self) -> Result<(), SnapshotError> {
        if let Some(i) = self.balls.iter().position(|b| !b.is_finite()) {
            return Err(SnapshotError::NonFinite(format!("ball {i}")));
        }
        if !self.aim.is_finite() {
            return Err(SnapshotError::NonFinite("aim".to_string()));
        }
        Ok(())
    }
}

impl Table<Ball> {
    pub fn serialise(&self) -> TableSnapshot {
        TableSnapshot {
            balls: self.balls().iter().map(BallSnapshot::from).collect(),
            aim: self.cue.aim,
        }
    }

    /// Rebuild a table from a snapshot, with balls and cue limits from `settings`
    pub fn from_snapshot(
        snapshot: &TableSnapshot,
        settings: &TableSettings,
        geometry: Arc<TableGeometry>,
    ) -> Result<Self, SnapshotError> {
        snapshot.validate()?;

        let balls = snapshot
            .balls
            .iter()
            .map(|s| {
                let mut ball = Ball::new(s.pos, settings);
                s.apply(&mut ball);
                ball
            })
            .collect();

        let mut cue = Cue::from_settings(settings);
        cue.aim = snapshot.aim;
        Ok(Table::new(balls, geometry).with_cue(cue))
    }

    /// Overwrite every ball and the aim. The ball count must match.
    pub fn update_from_snapshot(&mut self, snapshot: &TableSnapshot) -> Result<(), SnapshotError> {
        let expected = self.balls().len();
        if snapshot.balls.len() != expected {
            return Err(SnapshotError::BallCount {
                expected,
                found: snapshot.balls.len(),
            });
        }
        snapshot.validate()?;

        for (i, s) in snapshot.balls.iter().enumerate() {
            if let Some(ball) = self.ball_mut(i) {
                s.apply(ball);
            }
        }
        self.cue.aim = snapshot.aim;
        Ok(())
    }

    /// x, y of each ball in index order
    pub fn short_serialise(&self) -> Vec<f32> {
        self.balls()
            .iter()
            .flat_map(|b| [b.pos.x, b.pos.y])
            .collect()
    }

    /// Move balls to the positions from [`Table::short_serialise`].
    /// Velocities and states are left alone.
    pub fn update_from_short_serialised(&mut self, data: &[f32]) -> Result<(), SnapshotError> {
        let expected = self.balls().len() * 2;
        if data.len() != expected {
            return Err(SnapshotError::ShortLength {
                expected,
                found: data.len(),
            });
        }
        if let Some(i) = data.iter().position(|v| !v.is_finite()) {
            return Err(SnapshotError::NonFinite(format!("ball {}", i / 2)));
        }

        for (i, xy) in data.chunks_exact(2).enumerate() {
            if let Some(ball) = self.ball_mut(i) {
                ball.pos.x = xy[0];
                ball.pos.y = xy[1];
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::sim::rack;

    fn mid_shot() -> Table {
        let s = TableSettings::default();
        let mut table = Table::from_settings(rack::diamond(&s, 5), &s);
        table.cue.aim.power = 5.0;
        table.cue.aim.side_offset = 0.2;
        table.hit();
        for _ in 0..90 {
            table.advance(SIM_DT).unwrap();
        }
        table.cue.aim.angle = 1.25;
        table
    }

    #[test]
    fn test_json_round_trip() {
        let table = mid_shot();
        let snapshot = table.serialise();
        let json = snapshot.to_json().unwrap();
        let decoded = TableSnapshot::from_json(&json).unwrap();
        assert_eq!(decoded, snapshot);

        let s = TableSettings::default();
        let restored =
            Table::from_snapshot(&decoded, &s, Arc::new(TableGeometry::from_settings(&s))).unwrap();
        assert_eq!(restored.balls(), table.balls());
        assert_eq!(restored.cue.aim, table.cue.aim);
    }

    #[test]
    fn test_restored_table_continues_identically() {
        let mut table = mid_shot();
        let s = TableSettings::default();
        let mut restored = Table::from_snapshot(
            &table.serialise(),
            &s,
            Arc::new(TableGeometry::from_settings(&s)),
        )
        .unwrap();

        for _ in 0..60 {
            table.advance(SIM_DT).unwrap();
            restored.advance(SIM_DT).unwrap();
        }
        assert_eq!(restored.balls(), table.balls());
    }

    #[test]
    fn test_update_rejects_wrong_count() {
        let mut table = mid_shot();
        let mut snapshot = table.serialise();
        snapshot.balls.pop();
        let err = table.update_from_snapshot(&snapshot).unwrap_err();
        assert!(matches!(err, SnapshotError::BallCount { expected: 10, found: 9 }));
    }

    #[test]
    fn test_update_rejects_nan_without_mutating() {
        let mut table = mid_shot();
        let before = table.balls().to_vec();
        let mut snapshot = table.serialise();
        snapshot.balls[0].pos = Vec3::ZERO;
        snapshot.balls[3].vel.x = f32::NAN;

        let err = table.update_from_snapshot(&snapshot).unwrap_err();
        assert!(matches!(err, SnapshotError::NonFinite(_)));
        assert_eq!(table.balls(), before.as_slice());
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(matches!(
            TableSnapshot::from_json("{\"balls\": 3}"),
            Err(SnapshotError::Json(_))
        ));
    }

    #[test]
    fn test_short_round_trip() {
        let source = mid_shot();
        let data = source.short_serialise();
        assert_eq!(data.len(), 20);

        let s = TableSettings::default();
        let mut target = Table::from_settings(rack::diamond(&s, 99), &s);
        target.update_from_short_serialised(&data).unwrap();
        for (a, b) in source.balls().iter().zip(target.balls()) {
            assert_eq!((a.pos.x, a.pos.y), (b.pos.x, b.pos.y));
        }
    }

    #[test]
    fn test_short_rejects_bad_input() {
        let s = TableSettings::default();
        let mut table = Table::from_settings(rack::diamond(&s, 1), &s);
        assert!(matches!(
            table.update_from_short_serialised(&[0.0; 3]),
            Err(SnapshotError::ShortLength { expected: 20, found: 3 })
        ));

        let mut data = table.short_serialise();
        data[5] = f32::INFINITY;
        assert!(matches!(
            table.update_from_short_serialised(&data),
            Err(SnapshotError::NonFinite(_))
        ));
    }
}
