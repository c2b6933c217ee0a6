//! Table state and round bookkeeping
//!
//! Everything the physics tick reads or writes lives here.

use std::collections::VecDeque;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::ball::Ball;
use super::clock::RoundClock;
use super::cue::{Cue, Shot};
use super::table::{CUE_BALL, Table};
use crate::error::SettingsError;
use crate::settings::Settings;

/// Events kept for a caller that stops draining; the oldest are dropped
pub const MAX_PENDING_EVENTS: usize = 4096;

/// Current phase of a round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundPhase {
    /// All balls at rest, cue shown
    Aiming,
    /// At least one ball moving
    Rolling,
    /// Round finished; ticks do nothing
    Over,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundEndReason {
    /// Every object ball pocketed
    Cleared,
    /// Countdown ran out
    TimeUp,
}

/// Signals for the collaborators around the physics core
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Shot(Shot),
    BallsCollided { a: u32, b: u32 },
    CushionHit { id: u32, corner: bool },
    BallPocketed { id: u32, pocket: usize },
    CueBallHidden,
    CueBallRespawned { pos: Vec2 },
    CueBallPlacementFailed,
    /// Table at rest; a new shot may be prepared
    ReadyForShot,
    RoundOver {
        remaining_balls: usize,
        score: u32,
        reason: RoundEndReason,
    },
}

/// Complete table state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub settings: Settings,
    pub table: Table,
    /// Active balls in resolution order; the cue ball is always first
    pub balls: Vec<Ball>,
    pub cue: Cue,
    pub clock: RoundClock,
    pub phase: RoundPhase,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Object balls pocketed this round
    pub pocketed_count: u32,
    /// Set while a failed cue-ball respawn is being retried
    pub(crate) placement_failed: bool,
    #[serde(skip)]
    events: VecDeque<GameEvent>,
}

impl GameState {
    /// A freshly racked table
    pub fn new(settings: Settings) -> Self {
        let table = Table::new(&settings.table, &settings.ball);
        let balls = table
            .rack
            .iter()
            .enumerate()
            .map(|(i, &pos)| Ball::new(i as u32, pos))
            .collect();
        Self::with_balls(settings, table, balls)
    }

    /// A table with an explicit ball list; `balls[0]` is the cue ball
    pub fn with_balls(settings: Settings, table: Table, balls: Vec<Ball>) -> Self {
        let clock = RoundClock::new(settings.round_seconds);
        Self {
            settings,
            table,
            balls,
            cue: Cue::default(),
            clock,
            phase: RoundPhase::Aiming,
            time_ticks: 0,
            pocketed_count: 0,
            placement_failed: false,
            events: VecDeque::new(),
        }
    }

    pub fn cue_ball(&self) -> Option<&Ball> {
        self.balls.get(CUE_BALL)
    }

    /// Object balls still on the table
    pub fn remaining_balls(&self) -> usize {
        self.balls.len().saturating_sub(1)
    }

    pub fn all_stopped(&self) -> bool {
        self.balls.iter().all(Ball::is_stopped)
    }

    /// Seconds left in countdown mode, otherwise balls pocketed
    pub fn score(&self) -> u32 {
        if self.settings.countdown {
            self.clock.left_seconds()
        } else {
            self.pocketed_count
        }
    }

    /// Apply a display-size change: new settings and table, ball positions
    /// and velocities scaled to match. Never called mid-tick.
    pub fn rescale(&mut self, ratio: f32) -> Result<(), SettingsError> {
        let settings = self.settings.scaled(ratio)?;
        self.table = self.table.scaled(ratio);
        self.settings = settings;
        for ball in &mut self.balls {
            ball.pos *= ratio;
            ball.vel *= ratio;
        }
        log::info!("Table rescaled by {ratio}");
        Ok(())
    }

    pub(crate) fn push_event(&mut self, event: GameEvent) {
        if self.events.len() >= MAX_PENDING_EVENTS {
            self.events.pop_front();
            log::debug!("Event queue full; dropping oldest event");
        }
        self.events.push_back(event);
    }

    /// Take all events raised since the last call
    ///
    /// Callers driving `tick` directly should drain once per tick; at most
    /// `MAX_PENDING_EVENTS` are kept between drains.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.events.drain(..).collect()
    }
}
