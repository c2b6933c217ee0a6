//! Read-only view of the table for the render layer
//!
//! Built once per scheduler step and published behind an `Arc`, so a
//! renderer never observes a ball list halfway through a tick.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::sim::{Bounds, GameState, PocketKind, RoundPhase};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BallView {
    pub id: u32,
    pub center: Vec2,
    /// Sprite rotation, degrees
    pub facing: f32,
    pub frame: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PocketView {
    pub center: Vec2,
    pub radius: f32,
    pub kind: PocketKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CueView {
    pub visible: bool,
    pub angle_deg: f32,
    pub strength: f32,
    pub aim_forward: bool,
    /// Centre the cue is drawn around (cue-ball centre)
    pub anchor: Option<Vec2>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub tick: u64,
    /// Visible balls only; a hidden cue ball is left out
    pub balls: Vec<BallView>,
    pub pockets: Vec<PocketView>,
    pub collision_points: Vec<Vec2>,
    pub bounds: Bounds,
    pub ball_radius: f32,
    pub cue: CueView,
    pub remaining_balls: usize,
    pub seconds_left: u32,
    pub score: u32,
    pub phase: RoundPhase,
}

impl Snapshot {
    pub fn capture(state: &GameState) -> Self {
        let balls = state
            .balls
            .iter()
            .filter(|b| !b.is_hidden())
            .map(|b| BallView {
                id: b.id,
                center: b.position(),
                facing: b.facing(),
                frame: b.anim_frame(),
            })
            .collect();

        let pockets = state
            .table
            .pockets
            .iter()
            .map(|p| PocketView {
                center: p.center,
                radius: state.table.pocket_radius(p.kind),
                kind: p.kind,
            })
            .collect();

        let anchor = state
            .cue_ball()
            .filter(|b| !b.is_hidden())
            .map(|b| b.position());

        Self {
            tick: state.time_ticks,
            balls,
            pockets,
            collision_points: state.table.collision_points.to_vec(),
            bounds: state.table.bounds,
            ball_radius: state.settings.ball.radius,
            cue: CueView {
                visible: state.cue.visible,
                angle_deg: state.cue.angle_deg,
                strength: state.cue.strength,
                aim_forward: state.cue.aim_forward,
                anchor,
            },
            remaining_balls: state.remaining_balls(),
            seconds_left: state.clock.left_seconds(),
            score: state.score(),
            phase: state.phase,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;

    #[test]
    fn test_capture_fresh_table() {
        let state = GameState::new(Settings::default());
        let snap = Snapshot::capture(&state);

        assert_eq!(snap.balls.len(), 16);
        assert_eq!(snap.balls[0].id, 0);
        assert_eq!(snap.balls[0].center, state.table.cue_spot());
        assert_eq!(snap.pockets.len(), 6);
        assert_eq!(snap.pockets[1].radius, 32.0);
        assert_eq!(snap.pockets[0].radius, 23.0);
        assert_eq!(snap.collision_points.len(), 12);
        assert_eq!(snap.cue.anchor, Some(state.table.cue_spot()));
        assert!(snap.cue.visible);
        assert_eq!(snap.remaining_balls, 15);
        assert_eq!(snap.seconds_left, 720);
        assert_eq!(snap.phase, RoundPhase::Aiming);
    }

    #[test]
    fn test_hidden_cue_ball_left_out() {
        let mut state = GameState::new(Settings::default());
        state.balls[0].hide();
        let snap = Snapshot::capture(&state);

        assert_eq!(snap.balls.len(), 15);
        assert!(snap.balls.iter().all(|b| b.id != 0));
        assert_eq!(snap.cue.anchor, None);
    }

    #[test]
    fn test_snapshot_serializes() {
        let state = GameState::new(Settings::default());
        let snap = Snapshot::capture(&state);
        let json = snap.to_json().unwrap();
        let back: Snapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back.balls.len(), snap.balls.len());
        for (a, b) in back.balls.iter().zip(snap.balls.iter()) {
            assert_eq!(a.id, b.id);
            assert!(a.center.distance(b.center) < 1e-3);
        }
        assert_eq!(back.bounds, snap.bounds);
        assert_eq!(back.phase, snap.phase);
    }
}
