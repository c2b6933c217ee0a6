//! Ball entity and its per-tick motion step

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::{CollisionEvent, can_advance_to};
use super::table::Table;
use crate::error::PlacementError;
use crate::geometry::{magnitude, squared_distance};
use crate::settings::BallConfig;
use crate::{heading_degrees, normalize_degrees, polar_to_cartesian};

/// Ball state, derived from velocity and the pocket/hidden flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BallState {
    Moving,
    Stopped,
    /// Entered a pocket this tick; the driver removes or hides it
    Pocketed,
    /// Cue ball taken off the table, waiting for a respawn slot
    Hidden,
}

/// A ball on the table
///
/// `pos` is the ball centre. Only the motion step (guarded by the collision
/// resolver) and the driver's hide/reset write it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    pub id: u32,
    pub(crate) pos: Vec2,
    pub(crate) vel: Vec2,
    /// Heading used to rotate the sprite, degrees in [0, 360)
    pub(crate) facing: f32,
    /// Accumulated rolling distance in sprite frames
    pub(crate) anim_phase: f32,
    pub(crate) anim_frame: u32,
    pub(crate) pocketed: bool,
    pub(crate) hidden: bool,
}

impl Ball {
    /// A ball at rest at `pos`
    pub fn new(id: u32, pos: Vec2) -> Self {
        Self {
            id,
            pos,
            vel: Vec2::ZERO,
            facing: 0.0,
            anim_phase: 0.0,
            anim_frame: 0,
            pocketed: false,
            hidden: false,
        }
    }

    pub fn with_velocity(mut self, vel: Vec2) -> Self {
        self.vel = vel;
        self
    }

    pub fn position(&self) -> Vec2 {
        self.pos
    }

    pub fn velocity(&self) -> Vec2 {
        self.vel
    }

    pub fn speed(&self) -> f32 {
        magnitude(self.vel)
    }

    pub fn facing(&self) -> f32 {
        self.facing
    }

    pub fn anim_frame(&self) -> u32 {
        self.anim_frame
    }

    pub fn state(&self) -> BallState {
        if self.hidden {
            BallState::Hidden
        } else if self.pocketed {
            BallState::Pocketed
        } else if self.is_stopped() {
            BallState::Stopped
        } else {
            BallState::Moving
        }
    }

    /// Both velocity components exactly zero
    #[inline]
    pub fn is_stopped(&self) -> bool {
        self.vel == Vec2::ZERO
    }

    #[inline]
    pub fn is_pocketed(&self) -> bool {
        self.pocketed
    }

    #[inline]
    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    /// Set velocity from polar form; 0° lies along +x
    pub fn change_velocity(&mut self, speed: f32, angle_degrees: f32) {
        self.vel = polar_to_cartesian(speed, angle_degrees);
        self.facing = normalize_degrees(angle_degrees);
        log::debug!(
            "Ball {} velocity set: speed={speed}, angle={angle_degrees} -> ({}, {})",
            self.id,
            self.vel.x,
            self.vel.y
        );
    }

    /// Take the ball off the table until `reset` finds it a slot
    pub fn hide(&mut self) {
        self.vel = Vec2::ZERO;
        self.hidden = true;
        self.pocketed = false;
        self.anim_frame = 0;
    }

    fn place_at(&mut self, pos: Vec2) {
        self.pos = pos;
        self.vel = Vec2::ZERO;
        self.hidden = false;
        self.pocketed = false;
        self.anim_frame = 0;
    }

    /// Snap to rest when slower than `v_min`; returns true if the ball rests
    fn settle(&mut self, v_min: f32) -> bool {
        if self.is_stopped() || self.speed() < v_min {
            self.vel = Vec2::ZERO;
            self.anim_frame = 0;
            return true;
        }
        false
    }

    /// Commit an accepted move: roll the sprite and damp the velocity
    fn commit(&mut self, candidate: Vec2, config: &BallConfig) {
        self.pos = candidate;

        let frames = config.anim_frames.max(1);
        let speed = self.speed();
        self.anim_phase = (self.anim_phase + config.anim_gain * speed).rem_euclid(frames as f32);
        self.anim_frame = (self.anim_phase as u32) % frames;

        self.vel *= config.attenuation;
    }
}

/// Result of one ball's motion step
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// Too slow to move; velocity forced to zero
    Resting,
    /// Candidate position committed
    Moved(CollisionEvent),
    /// Candidate rejected; velocity already changed by the resolver
    Blocked(CollisionEvent),
}

/// Advance `balls[index]` by one tick
///
/// The candidate position is `pos + vel * 2 * time_span`. The collision
/// resolver decides whether the ball may move there and may change the
/// velocities of this and other balls while doing so.
pub fn advance(balls: &mut [Ball], index: usize, table: &Table, config: &BallConfig) -> Step {
    let ball = &mut balls[index];
    if ball.hidden || ball.settle(config.v_min) {
        return Step::Resting;
    }

    let candidate = ball.pos + ball.vel * config.tick_span();
    let verdict = can_advance_to(balls, index, candidate, table, config);

    let ball = &mut balls[index];
    if verdict.allowed {
        ball.commit(candidate, config);
    }
    if !ball.is_stopped() {
        ball.facing = heading_degrees(ball.vel);
    }

    if verdict.allowed {
        Step::Moved(verdict.event)
    } else {
        Step::Blocked(verdict.event)
    }
}

/// Upper bound on respawn slots tried in one `reset`
pub const MAX_RESET_SLOTS: u32 = 1024;

/// Put a hidden ball back on the table
///
/// Walks from the cue spot toward the top cushion in radius-sized steps and
/// takes the first slot no other visible ball overlaps.
pub fn reset(
    balls: &mut [Ball],
    index: usize,
    table: &Table,
    config: &BallConfig,
) -> Result<Vec2, PlacementError> {
    let anchor = table.cue_spot();
    let min_dist_sq = config.diameter() * config.diameter();
    let step = config.radius.max(f32::EPSILON);

    // Slots with y - radius above the top cushion
    let room = (anchor.y - config.radius - table.bounds.top) / step;
    let max_slots = if room > 0.0 {
        (room.ceil() as u32).min(MAX_RESET_SLOTS)
    } else {
        0
    };

    for n in 0..max_slots {
        let slot = Vec2::new(anchor.x, anchor.y - step * n as f32);
        let blocked = balls
            .iter()
            .enumerate()
            .any(|(i, b)| i != index && !b.hidden && squared_distance(slot, b.pos) < min_dist_sq);

        if !blocked {
            balls[index].place_at(slot);
            return Ok(slot);
        }
    }

    Err(PlacementError::NoFreeSlot {
        id: balls[index].id,
        tried: max_slots,
    })
}
