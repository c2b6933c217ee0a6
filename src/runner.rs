//! Fixed-step scheduler
//!
//! Physics ticks run at a fixed period no matter how often the host loop
//! calls in. Ticks and snapshot sampling share the calling thread; each step
//! publishes a fresh `Arc<Snapshot>` for readers.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use crate::consts::MAX_SUBSTEPS;
use crate::error::SettingsError;
use crate::settings::Settings;
use crate::sim::{GameEvent, GameState, TickInput, tick};
use crate::snapshot::Snapshot;

/// Longest frame time fed to the accumulator in one call
const MAX_FRAME_SECONDS: f32 = 0.1;

/// Clonable stop flag, checked once per loop iteration
#[derive(Debug, Clone, Default)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    pub fn stop(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

pub struct Simulation {
    state: GameState,
    /// Unsimulated time, microseconds
    accumulator: u64,
    input: TickInput,
    published: Arc<Snapshot>,
    stop: StopHandle,
}

impl Simulation {
    pub fn new(settings: Settings) -> Self {
        Self::from_state(GameState::new(settings))
    }

    pub fn from_state(state: GameState) -> Self {
        let published = Arc::new(Snapshot::capture(&state));
        Self {
            state,
            accumulator: 0,
            input: TickInput::default(),
            published,
            stop: StopHandle::default(),
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Latest published snapshot
    pub fn snapshot(&self) -> Arc<Snapshot> {
        Arc::clone(&self.published)
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    /// Input applied from the next tick on; one-shot fields are cleared
    /// after the first tick that sees them
    pub fn set_input(&mut self, input: TickInput) {
        self.input = input;
    }

    /// Display-size change between ticks
    pub fn rescale(&mut self, ratio: f32) -> Result<(), SettingsError> {
        self.state.rescale(ratio)?;
        self.publish();
        Ok(())
    }

    /// Run every tick that fits in `seconds` (plus any carried remainder),
    /// publish a snapshot and return the events raised
    pub fn advance_by(&mut self, seconds: f32) -> Vec<GameEvent> {
        let tick_us = u64::from(self.state.settings.tick_interval_ms.max(1)) * 1000;
        let seconds = if seconds.is_finite() {
            seconds.clamp(0.0, MAX_FRAME_SECONDS)
        } else {
            0.0
        };
        self.accumulator += (f64::from(seconds) * 1e6).round() as u64;

        let mut substeps = 0;
        while self.accumulator >= tick_us && substeps < MAX_SUBSTEPS {
            tick(&mut self.state, &self.input);
            self.accumulator -= tick_us;
            substeps += 1;

            // Clear one-shot inputs after processing
            self.input.shoot = false;
            self.input.flip_aim = false;
            self.input.release_steer = false;
        }
        if substeps == MAX_SUBSTEPS && self.accumulator >= tick_us {
            log::debug!("Dropping {} us of backlog", self.accumulator);
            self.accumulator %= tick_us;
        }

        self.publish();
        self.state.drain_events()
    }

    /// Drive the simulation in real time on the calling thread until the
    /// stop handle fires. `on_frame` sees every published snapshot and the
    /// events raised since the previous frame, and may return the input for
    /// the following ticks.
    pub fn run_until_stopped<F>(&mut self, mut on_frame: F)
    where
        F: FnMut(&Snapshot, &[GameEvent]) -> Option<TickInput>,
    {
        let period = Duration::from_millis(u64::from(self.state.settings.tick_interval_ms.max(1)));
        let mut last = Instant::now();
        log::info!("Simulation loop started ({} ms ticks)", period.as_millis());

        while !self.stop.is_stopped() {
            let now = Instant::now();
            let dt = now.duration_since(last).as_secs_f32();
            last = now;

            let events = self.advance_by(dt);
            if let Some(input) = on_frame(&self.published, &events) {
                self.set_input(input);
            }
            std::thread::sleep(period.saturating_sub(now.elapsed()));
        }
        log::info!("Simulation loop stopped after {} ticks", self.state.time_ticks);
    }

    fn publish(&mut self) {
        self.published = Arc::new(Snapshot::capture(&self.state));
    }
}
