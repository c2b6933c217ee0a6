//! Billiards Core headless demo
//!
//! Racks a table and plays seeded random shots until the round ends or the
//! shot budget runs out, logging every table event.
//!
//! Usage: `billiards-core [settings.json] [--realtime] [--seed N]`

#[cfg(not(target_arch = "wasm32"))]
use std::path::PathBuf;

#[cfg(not(target_arch = "wasm32"))]
use billiards_core::polar_to_cartesian;
#[cfg(not(target_arch = "wasm32"))]
use billiards_core::sim::{GameEvent, RoundPhase, TickInput};
#[cfg(not(target_arch = "wasm32"))]
use billiards_core::{Settings, SettingsError, Simulation, Snapshot};
#[cfg(not(target_arch = "wasm32"))]
use clap::Parser;
#[cfg(not(target_arch = "wasm32"))]
use rand::{Rng, SeedableRng};
#[cfg(not(target_arch = "wasm32"))]
use rand_pcg::Pcg32;

/// Shots played before the demo gives up on clearing the table
#[cfg(not(target_arch = "wasm32"))]
const SHOT_BUDGET: u32 = 60;
#[cfg(not(target_arch = "wasm32"))]
const DEMO_SEED: u64 = 12345;

#[cfg(not(target_arch = "wasm32"))]
#[derive(Parser, Debug)]
#[command(author, version, about = "Play seeded random shots on a racked table", long_about = None)]
struct Args {
    /// Settings JSON file (defaults are used when omitted)
    settings: Option<PathBuf>,
    /// Run ticks in real time instead of as fast as possible
    #[arg(long)]
    realtime: bool,
    /// Seed for the random shots
    #[arg(long, default_value_t = DEMO_SEED)]
    seed: u64,
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> Result<(), SettingsError> {
    env_logger::init();
    let args = Args::parse();

    let settings = match &args.settings {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };
    let tick_seconds = settings.tick_seconds();
    log::info!("Billiards Core (native) starting...");

    let mut sim = Simulation::new(settings);
    let stop = sim.stop_handle();
    let mut rng = Pcg32::seed_from_u64(args.seed);
    let mut shots = 0;
    let mut awaiting_shot = false;

    let mut on_frame = |snapshot: &Snapshot, events: &[GameEvent]| -> Option<TickInput> {
        for event in events {
            match event {
                GameEvent::Shot(_) => awaiting_shot = false,
                GameEvent::RoundOver { .. } => stop.stop(),
                _ => {}
            }
            log::debug!("{event:?}");
        }

        if stop.is_stopped() || awaiting_shot || snapshot.phase != RoundPhase::Aiming {
            return None;
        }
        if shots >= SHOT_BUDGET {
            log::info!("Shot budget of {SHOT_BUDGET} used up");
            stop.stop();
            return None;
        }

        let anchor = snapshot.cue.anchor?;
        shots += 1;
        awaiting_shot = true;
        Some(random_shot(&mut rng, anchor))
    };

    if args.realtime {
        sim.run_until_stopped(&mut on_frame);
    } else {
        while !stop.is_stopped() {
            let events = sim.advance_by(tick_seconds);
            let snapshot = sim.snapshot();
            if let Some(input) = on_frame(snapshot.as_ref(), events.as_slice()) {
                sim.set_input(input);
            }
        }
    }

    let state = sim.state();
    log::info!(
        "Finished after {} shots and {} ticks: {} balls left, score {}",
        shots,
        state.time_ticks,
        state.remaining_balls(),
        state.score()
    );
    Ok(())
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The library is driven by the host page on wasm
}

/// Aim in a random direction at a random strength
#[cfg(not(target_arch = "wasm32"))]
fn random_shot(rng: &mut Pcg32, anchor: glam::Vec2) -> TickInput {
    let angle = rng.random_range(0.0..360.0);
    let strength = rng.random_range(0.3..1.0);
    TickInput {
        aim_at: Some(anchor + polar_to_cartesian(100.0, angle)),
        strength: Some(strength),
        shoot: true,
        ..Default::default()
    }
}
