//! Billiards Core - physics and collision core of a billiards table game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (ball motion, collisions, pockets, round flow)
//! - `geometry`: Small vector and rectangle helpers
//! - `settings`: Immutable ball/table configuration and the display scale hook
//! - `snapshot`: Read-only state handed to the render layer
//! - `runner`: Fixed-step cooperative scheduler

pub mod error;
pub mod geometry;
pub mod runner;
pub mod settings;
pub mod sim;
pub mod snapshot;

pub use error::{PlacementError, SettingsError};
pub use runner::{Simulation, StopHandle};
pub use settings::{BallConfig, ScreenScale, Settings, TableConfig};
pub use snapshot::Snapshot;

use glam::Vec2;

/// Default tuning constants (design resolution 800x480, ratio 1.0)
pub mod consts {
    /// Physics tick interval in milliseconds
    pub const TICK_INTERVAL_MS: u32 = 10;
    /// Maximum ticks per scheduler call to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Ball defaults
    pub const BALL_SIZE: f32 = 24.0;
    pub const V_MAX: f32 = 150.0;
    pub const V_MIN: f32 = 1.5;
    /// Nominal step; a tick moves a ball by `2 * TIME_SPAN * velocity`
    pub const TIME_SPAN: f32 = 0.05;
    /// Per-tick velocity damping (the only deceleration there is)
    pub const V_ATTENUATION: f32 = 0.99;
    /// Rolling sprite frames per ball
    pub const ANIM_FRAMES: u32 = 6;
    /// Rolling sprite advance per unit of speed
    pub const ANIM_GAIN: f32 = 1.3 / V_MAX;

    /// Table base dimensions
    pub const TABLE_X: f32 = 20.0;
    pub const TABLE_Y: f32 = 20.0;
    pub const BOTTOM_WIDTH: f32 = 85.0 * 2.0 + 168.0 * 2.0 + 95.0;
    pub const BOTTOM_HEIGHT: f32 = 85.0 * 2.0 + 228.0;
    pub const EDGE_BIG: f32 = 45.0;
    pub const EDGE_SMALL: f32 = 40.0;
    pub const MIDDLE: f32 = 95.0;
    pub const DIS_CORNER: f32 = 20.0;
    pub const DIS_MIDDLE: f32 = 30.0;
    pub const HOLE_CENTER_REVISE: f32 = 20.0;
    pub const BOTTOM_MIDDLE_NUDGE: f32 = 2.0;
    pub const CORNER_HOLE_R: f32 = 23.0;
    pub const MIDDLE_HOLE_R: f32 = 32.0;

    /// Rack layout
    pub const RACK_APEX_OFFSET: f32 = 350.0;
    pub const GAP_BETWEEN_BALLS: f32 = 3.0;
    pub const CUE_BALL_OFFSET: f32 = 238.0;

    /// Countdown round length (12 minutes)
    pub const ROUND_SECONDS: u32 = 12 * 60;
}

/// Normalize an angle in degrees to [0, 360)
#[inline]
pub fn normalize_degrees(angle: f32) -> f32 {
    let a = angle.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if a >= 360.0 { 0.0 } else { a }
}

/// Convert polar (r, degrees) to cartesian (x, y); 0° lies along +x
#[inline]
pub fn polar_to_cartesian(r: f32, degrees: f32) -> Vec2 {
    let theta = degrees.to_radians();
    Vec2::new(r * theta.cos(), r * theta.sin())
}

/// Heading of a direction vector in degrees, [0, 360)
#[inline]
pub fn heading_degrees(dir: Vec2) -> f32 {
    normalize_degrees(dir.y.atan2(dir.x).to_degrees())
}
