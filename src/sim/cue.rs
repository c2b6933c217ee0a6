//! Cue aim state
//!
//! The cue is visible only while every ball is at rest. Aiming and strength
//! are set by the input layer; `strike` turns them into a cue-ball velocity.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::ball::Ball;
use crate::settings::BallConfig;
use crate::{heading_degrees, normalize_degrees};

/// Fine rotation per steer step (degrees)
pub const STEER_SLOW: f32 = 0.2;
/// Coarse rotation once the button has been held long enough (degrees)
pub const STEER_FAST: f32 = 1.0;
/// Press time added per steer step
pub const PRESS_STEP: f32 = 3.5;
/// Press time after which steering switches to the coarse step
pub const FAST_AFTER: f32 = 80.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Steer {
    /// Counter-clockwise on screen (angle increases)
    Left,
    Right,
}

/// A shot handed to the cue ball
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Shot {
    pub speed: f32,
    pub angle_deg: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cue {
    /// Shot direction, degrees in [0, 360)
    pub angle_deg: f32,
    /// Shown while the table is at rest
    pub visible: bool,
    /// When false, `aim_at` points away from the target (pull-back aiming)
    pub aim_forward: bool,
    /// Shot strength in [0, 1]
    pub strength: f32,
    press_time: f32,
}

impl Default for Cue {
    fn default() -> Self {
        Self {
            angle_deg: 0.0,
            visible: true,
            aim_forward: true,
            strength: 1.0,
            press_time: 0.0,
        }
    }
}

impl Cue {
    /// Point the cue from the cue-ball centre toward `target`
    pub fn aim_at(&mut self, target: Vec2, cue_ball_center: Vec2) {
        let mut dir = target - cue_ball_center;
        if !self.aim_forward {
            dir = -dir;
        }
        if dir != Vec2::ZERO {
            self.angle_deg = heading_degrees(dir);
        }
    }

    /// Rotate one step; holding a direction speeds rotation up
    pub fn steer(&mut self, direction: Steer) {
        self.press_time += PRESS_STEP;
        let step = if self.press_time < FAST_AFTER {
            STEER_SLOW
        } else {
            STEER_FAST
        };
        let delta = match direction {
            Steer::Left => step,
            Steer::Right => -step,
        };
        self.angle_deg = normalize_degrees(self.angle_deg + delta);
    }

    /// Steering button released
    pub fn release(&mut self) {
        self.press_time = 0.0;
    }

    pub fn set_strength(&mut self, fraction: f32) {
        self.strength = if fraction.is_nan() {
            0.0
        } else {
            fraction.clamp(0.0, 1.0)
        };
    }

    pub fn flip_aim(&mut self) {
        self.aim_forward = !self.aim_forward;
    }

    /// Speed a shot at the current strength would have
    pub fn shot_speed(&self, config: &BallConfig) -> f32 {
        config.v_max * self.strength
    }

    /// Hit the cue ball; the cue hides until the table is at rest again
    pub fn strike(&mut self, cue_ball: &mut Ball, config: &BallConfig) -> Option<Shot> {
        if !self.visible || cue_ball.is_hidden() {
            return None;
        }
        let shot = Shot {
            speed: self.shot_speed(config),
            angle_deg: self.angle_deg,
        };
        cue_ball.change_velocity(shot.speed, shot.angle_deg);
        self.visible = false;
        self.release();
        log::info!("Shot: speed={:.1}, angle={:.1}", shot.speed, shot.angle_deg);
        Some(shot)
    }
}
