//! Fixed timestep simulation tick
//!
//! One call advances the round by `SIM_DT`. The motion, spawn and clock
//! intervals all run off this single clock, so the three never interleave
//! mid-update and need no ordering beyond the sequence below.

use super::state::{GamePhase, Sanctuary};

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Start a round (Begin / Create New Sanctuary button)
    pub start: bool,
    /// Reset to Ready
    pub reset: bool,
    /// Bird ids tapped since the last tick, in click order
    pub captures: Vec<u32>,
}

impl TickInput {
    /// Clear one-shot inputs after processing
    pub fn clear(&mut self) {
        self.start = false;
        self.reset = false;
        self.captures.clear();
    }
}

/// Advance the round by one fixed timestep
pub fn tick(state: &mut Sanctuary, input: &TickInput) {
    if input.reset {
        state.reset();
    }
    if input.start {
        state.start();
    }
    for &id in &input.captures {
        state.capture(id);
    }

    state.time_ticks += 1;

    if state.phase != GamePhase::Playing {
        return;
    }
    let Some(timers) = state.timers.as_mut() else {
        return;
    };
    if timers.generation != state.generation {
        log::warn!(
            "Dropping stale timers from round {} (current {})",
            timers.generation,
            state.generation
        );
        state.timers = None;
        return;
    }

    let motion_due = timers.motion.advance();
    let spawn_due = timers.spawn.advance();
    let clock_due = timers.clock.advance();

    if motion_due {
        state.integrate();
    }
    if spawn_due {
        state.spawn();
    }
    if clock_due {
        state.clock_tick();
    }
}
