//! Fixed timestep simulation tick
//!
//! One call advances every ball once, in list order, then settles the
//! round: pocketed balls leave the table (the cue ball is hidden instead),
//! and once the table is at rest the cue ball is respawned and the cue is
//! handed back to the player.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::ball::{Step, advance, reset};
use super::collision::CollisionEvent;
use super::cue::Steer;
use super::state::{GameEvent, GameState, RoundEndReason, RoundPhase};
use super::table::CUE_BALL;

/// Input commands for a single tick (deterministic)
///
/// Ignored while the cue is hidden, i.e. while any ball is rolling.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TickInput {
    /// Point the cue at a table position (pointer/touch aiming)
    pub aim_at: Option<Vec2>,
    /// One steering step
    pub steer: Option<Steer>,
    /// Steering button released
    pub release_steer: bool,
    /// Shot strength fraction
    pub strength: Option<f32>,
    /// Toggle push/pull aiming
    pub flip_aim: bool,
    /// Strike the cue ball
    pub shoot: bool,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput) {
    if state.phase == RoundPhase::Over {
        return;
    }
    state.time_ticks += 1;

    apply_input(state, input);

    let captured = advance_balls(state);
    remove_pocketed(state, &captured);

    if state.all_stopped() {
        settle(state);
    } else {
        state.phase = RoundPhase::Rolling;
    }

    if state.phase != RoundPhase::Over
        && state.settings.countdown
        && state.clock.advance(state.settings.tick_interval_ms)
    {
        end_round(state, RoundEndReason::TimeUp);
    }
}

fn apply_input(state: &mut GameState, input: &TickInput) {
    if !state.cue.visible {
        return;
    }
    let Some(center) = state
        .cue_ball()
        .filter(|b| !b.is_hidden())
        .map(|b| b.position())
    else {
        return;
    };

    let cue = &mut state.cue;
    if input.flip_aim {
        cue.flip_aim();
    }
    if let Some(target) = input.aim_at {
        cue.aim_at(target, center);
    }
    if let Some(direction) = input.steer {
        cue.steer(direction);
    }
    if input.release_steer {
        cue.release();
    }
    if let Some(fraction) = input.strength {
        cue.set_strength(fraction);
    }

    if input.shoot {
        if let Some(shot) = cue.strike(&mut state.balls[CUE_BALL], &state.settings.ball) {
            state.push_event(GameEvent::Shot(shot));
            state.phase = RoundPhase::Rolling;
        }
    }
}

/// Step every ball once; returns (index, pocket) for each capture
fn advance_balls(state: &mut GameState) -> Vec<(usize, usize)> {
    let mut captured = Vec::new();
    for index in 0..state.balls.len() {
        let step = advance(&mut state.balls, index, &state.table, &state.settings.ball);
        let id = state.balls[index].id;
        match step {
            Step::Resting | Step::Moved(CollisionEvent::Clear) => {}
            Step::Moved(CollisionEvent::EnteredPocket { pocket }) => captured.push((index, pocket)),
            Step::Blocked(CollisionEvent::BlockedByBall { others }) => {
                for b in others {
                    state.push_event(GameEvent::BallsCollided { a: id, b });
                }
            }
            Step::Blocked(CollisionEvent::BlockedByCorner { .. }) => {
                state.push_event(GameEvent::CushionHit { id, corner: true });
            }
            Step::Blocked(CollisionEvent::BlockedByCushion { .. }) => {
                state.push_event(GameEvent::CushionHit { id, corner: false });
            }
            Step::Moved(event) | Step::Blocked(event) => {
                log::debug!("Ball {id}: unexpected step outcome {event:?}");
            }
        }
    }
    captured
}

/// Hide a pocketed cue ball, drop every other pocketed ball
fn remove_pocketed(state: &mut GameState, captured: &[(usize, usize)]) {
    if captured.is_empty() {
        return;
    }
    for &(index, pocket) in captured {
        let id = state.balls[index].id;
        if index == CUE_BALL {
            state.balls[index].hide();
            log::info!("Cue ball pocketed (pocket {pocket})");
            state.push_event(GameEvent::CueBallHidden);
        } else {
            state.pocketed_count += 1;
            log::info!("Ball {id} pocketed (pocket {pocket})");
            state.push_event(GameEvent::BallPocketed { id, pocket });
        }
    }
    state.balls.retain(|b| !b.is_pocketed());
}

/// Table at rest: respawn the cue ball, hand the cue back, check for a
/// cleared table
fn settle(state: &mut GameState) {
    let mut respawned = false;
    if state.cue_ball().is_some_and(|b| b.is_hidden()) {
        match reset(&mut state.balls, CUE_BALL, &state.table, &state.settings.ball) {
            Ok(pos) => {
                log::info!("Cue ball respawned at ({:.1}, {:.1})", pos.x, pos.y);
                state.placement_failed = false;
                state.push_event(GameEvent::CueBallRespawned { pos });
                respawned = true;
            }
            Err(err) => {
                if !state.placement_failed {
                    log::warn!("Cue ball respawn failed: {err}");
                    state.placement_failed = true;
                    state.push_event(GameEvent::CueBallPlacementFailed);
                } else {
                    log::debug!("Cue ball respawn still blocked: {err}");
                }
            }
        }
    }

    let cue_ball_ready = state.cue_ball().is_some_and(|b| !b.is_hidden());
    if cue_ball_ready && (!state.cue.visible || respawned) {
        state.cue.visible = true;
        state.push_event(GameEvent::ReadyForShot);
    }
    if state.cue.visible {
        state.phase = RoundPhase::Aiming;
    }

    if state.balls.len() <= 1 {
        end_round(state, RoundEndReason::Cleared);
    }
}

fn end_round(state: &mut GameState, reason: RoundEndReason) {
    let remaining_balls = state.remaining_balls();
    let score = state.score();
    log::info!("Round over ({reason:?}): {remaining_balls} balls left, score {score}");
    state.phase = RoundPhase::Over;
    state.push_event(GameEvent::RoundOver {
        remaining_balls,
        score,
        reason,
    });
}
