//! Phase controller, capture detector and round clock

use super::events::{SimEvent, Toast};
use super::state::{GamePhase, Interval, RoundTimers, Sanctuary};

impl Sanctuary {
    /// Begin a round from Ready, Victory or TimeUp. Ignored while Playing.
    pub fn start(&mut self) -> bool {
        if self.phase == GamePhase::Playing {
            return false;
        }
        self.generation += 1;
        self.phase = GamePhase::Playing;
        self.captured = 0;
        self.time_remaining = self.config.round_secs;
        self.birds.clear();
        self.completion_sent = false;
        self.timers = Some(RoundTimers {
            generation: self.generation,
            motion: Interval::new(self.config.motion_ticks),
            spawn: Interval::new(self.config.spawn_ticks),
            clock: Interval::new(self.config.clock_ticks),
        });
        self.spawn_initial_batch();
        log::info!(
            "Sanctuary round {} started: catch {} in {}s",
            self.generation,
            self.config.capture_target,
            self.config.round_secs
        );
        true
    }

    /// Back to Ready from any phase, dropping every bird and timer
    pub fn reset(&mut self) {
        self.generation += 1;
        self.release_timers();
        self.phase = GamePhase::Ready;
        self.captured = 0;
        self.time_remaining = self.config.round_secs;
        self.birds.clear();
        self.completion_sent = false;
        log::info!("Sanctuary reset (generation {})", self.generation);
    }

    /// Catch a bird. Unknown ids, already-caught birds and captures outside
    /// Playing are ignored. Returns true if the count went up.
    pub fn capture(&mut self, id: u32) -> bool {
        if self.phase != GamePhase::Playing {
            return false;
        }
        let now = self.time_ticks;
        let Some(bird) = self.birds.iter_mut().find(|b| b.id == id) else {
            return false;
        };
        if !bird.capture(now) {
            return false;
        }
        self.captured += 1;
        log::debug!("Caught bird {} ({}/{})", id, self.captured, self.config.capture_target);
        self.events.push(SimEvent::Captured {
            id,
            total: self.captured,
        });
        self.evaluate();
        true
    }

    /// One clock second. Never goes below zero.
    pub(crate) fn clock_tick(&mut self) {
        if self.phase != GamePhase::Playing {
            return;
        }
        self.time_remaining = self.time_remaining.saturating_sub(1);
        self.evaluate();
    }

    /// Settle the round after a capture or a clock tick
    pub(crate) fn evaluate(&mut self) {
        if self.phase != GamePhase::Playing {
            return;
        }
        if self.captured >= self.config.capture_target {
            self.finish(GamePhase::Victory);
        } else if self.time_remaining == 0 {
            self.finish(GamePhase::TimeUp);
        }
    }

    fn finish(&mut self, outcome: GamePhase) {
        self.phase = outcome;
        self.release_timers();
        log::info!(
            "Sanctuary round {} over: {:?} with {}/{} caught",
            self.generation,
            outcome,
            self.captured,
            self.config.capture_target
        );

        if outcome == GamePhase::Victory && !self.completion_sent {
            self.completion_sent = true;
            self.events.push(SimEvent::Toast(Toast::new(
                "Sanctuary Complete! 🌟",
                "You've gathered enough peaceful thoughts to create inner calm.",
            )));
            self.events.push(SimEvent::Completed { success: true });
        }
    }

    fn release_timers(&mut self) {
        if let Some(timers) = self.timers.take() {
            log::debug!("Released timers of round {}", timers.generation);
        }
    }
}
