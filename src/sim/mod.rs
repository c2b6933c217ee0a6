//! Deterministic simulation module
//!
//! All table physics lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Stable iteration order (ball list order)
//! - No rendering or platform dependencies

pub mod ball;
pub mod clock;
pub mod collision;
pub mod cue;
pub mod state;
pub mod table;
pub mod tick;

pub use ball::{Ball, BallState, MAX_RESET_SLOTS, Step, advance, reset};
pub use clock::RoundClock;
pub use collision::{
    AXIS_EPSILON, CollisionEvent, PairContact, Verdict, can_advance_to, reflect_velocity,
    resolve_ball_pair,
};
pub use cue::{Cue, Shot, Steer};
pub use state::{GameEvent, GameState, MAX_PENDING_EVENTS, RoundEndReason, RoundPhase};
pub use table::{Bounds, CUE_BALL, Cushion, Pocket, PocketKind, RACK_SIZE, Table};
pub use tick::{TickInput, tick};
