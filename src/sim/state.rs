//! Bird Sanctuary round state and core simulation types

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::events::SimEvent;
use crate::ms_to_ticks;
use crate::settings::Settings;

/// Current phase of a round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for the start action
    Ready,
    /// Round running: birds move, spawn, clock counts down
    Playing,
    /// Capture target reached
    Victory,
    /// Clock ran out short of the target
    TimeUp,
}

impl GamePhase {
    /// Victory and TimeUp only exit via reset/start
    pub fn is_terminal(&self) -> bool {
        matches!(self, GamePhase::Victory | GamePhase::TimeUp)
    }
}

/// A bird (or butterfly, bee, star) floating across the field
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bird {
    pub id: u32,
    /// Percent-of-field position, 0..100 is visible
    pub pos: Vec2,
    /// Added to `pos` every motion tick
    pub vel: Vec2,
    pub size: f32,
    pub glyph: &'static str,
    pub captured: bool,
    /// Tick the bird was caught on, drives the linger period
    #[serde(skip)]
    pub captured_at: Option<u64>,
}

impl Bird {
    /// Mark as caught. Returns false if it already was.
    pub fn capture(&mut self, tick: u64) -> bool {
        if self.captured {
            return false;
        }
        self.captured = true;
        self.captured_at = Some(tick);
        true
    }
}

/// Fixed-step periodic timer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval {
    pub period_ticks: u32,
    elapsed: u32,
}

impl Interval {
    pub fn new(period_ticks: u32) -> Self {
        Self {
            period_ticks: period_ticks.max(1),
            elapsed: 0,
        }
    }

    /// Advance one tick, true when the period elapses
    pub fn advance(&mut self) -> bool {
        self.elapsed += 1;
        if self.elapsed >= self.period_ticks {
            self.elapsed = 0;
            true
        } else {
            false
        }
    }
}

/// The three periodic callbacks of a round. Acquired together on start,
/// released together on every exit from Playing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundTimers {
    /// Round generation these timers belong to
    pub generation: u64,
    pub motion: Interval,
    pub spawn: Interval,
    pub clock: Interval,
}

/// Round parameters, resolved to simulation ticks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundConfig {
    pub round_secs: u32,
    pub capture_target: u32,
    pub population_cap: u32,
    pub initial_batch: u32,
    pub motion_ticks: u32,
    pub spawn_ticks: u32,
    pub clock_ticks: u32,
    pub linger_ticks: u32,
}

impl Default for RoundConfig {
    fn default() -> Self {
        Self::from(&Settings::default())
    }
}

impl From<&Settings> for RoundConfig {
    fn from(settings: &Settings) -> Self {
        Self {
            round_secs: settings.round_secs,
            capture_target: settings.capture_target,
            population_cap: settings.population_cap,
            initial_batch: settings.initial_batch.min(settings.population_cap),
            motion_ticks: ms_to_ticks(settings.motion_period_ms),
            spawn_ticks: ms_to_ticks(settings.spawn_period_ms),
            clock_ticks: ms_to_ticks(settings.clock_period_ms),
            linger_ticks: ms_to_ticks(settings.capture_linger_ms),
        }
    }
}

/// Complete Bird Sanctuary round state (deterministic for a given seed and input)
#[derive(Debug, Clone)]
pub struct Sanctuary {
    pub config: RoundConfig,
    pub phase: GamePhase,
    /// Birds caught this round
    pub captured: u32,
    /// Whole seconds left on the clock
    pub time_remaining: u32,
    /// Live birds in insertion order
    pub birds: Vec<Bird>,
    /// Simulation tick counter (never reset)
    pub time_ticks: u64,
    /// Bumped on every start/reset
    pub generation: u64,
    pub(crate) timers: Option<RoundTimers>,
    pub(crate) completion_sent: bool,
    pub(crate) rng: Pcg32,
    pub(crate) events: Vec<SimEvent>,
    next_id: u32,
}

impl Sanctuary {
    /// Create a round in Ready with the given seed
    pub fn new(config: RoundConfig, seed: u64) -> Self {
        Self {
            config,
            phase: GamePhase::Ready,
            captured: 0,
            time_remaining: config.round_secs,
            birds: Vec::new(),
            time_ticks: 0,
            generation: 0,
            timers: None,
            completion_sent: false,
            rng: Pcg32::seed_from_u64(seed),
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new bird id
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Whether the round's periodic timers are held
    pub fn timers_running(&self) -> bool {
        self.timers.is_some()
    }

    pub fn timers(&self) -> Option<&RoundTimers> {
        self.timers.as_ref()
    }

    /// Uncaptured birds
    pub fn active_count(&self) -> usize {
        self.birds.iter().filter(|b| !b.captured).count()
    }

    pub fn find_bird(&self, id: u32) -> Option<&Bird> {
        self.birds.iter().find(|b| b.id == id)
    }

    /// Take all events emitted since the last drain
    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.events)
    }

    /// Progress toward the capture target, 0..=100
    pub fn completion_percent(&self) -> u32 {
        let pct = (self.captured as f32 / self.config.capture_target.max(1) as f32) * 100.0;
        (pct.round() as u32).min(100)
    }

    /// Serializable view for the HUD
    pub fn snapshot(&self) -> SanctuarySnapshot {
        SanctuarySnapshot {
            phase: self.phase,
            captured: self.captured,
            target: self.config.capture_target,
            time_remaining: self.time_remaining,
            round_secs: self.config.round_secs,
            active: self.active_count(),
            percent: self.completion_percent(),
            instruction: self.instruction(),
            progress_note: self.progress_note(),
            clock_note: self.clock_note(),
            birds: self.birds.clone(),
        }
    }

    /// Instruction line for the current phase
    pub fn instruction(&self) -> String {
        match self.phase {
            GamePhase::Ready => {
                "Gather peaceful thoughts by catching the floating elements of joy!".to_string()
            }
            GamePhase::Playing => format!(
                "Catch the floating birds and butterflies. {}/{} collected",
                self.captured, self.config.capture_target
            ),
            GamePhase::Victory => {
                "🎉 You've created a sanctuary of peace in your mind!".to_string()
            }
            GamePhase::TimeUp => {
                "Time's up! Every bird you caught brought you closer to calm.".to_string()
            }
        }
    }

    /// Flavour text under the capture progress bar
    pub fn progress_note(&self) -> &'static str {
        let target = self.config.capture_target;
        if self.captured == 0 {
            "🌱 Start collecting"
        } else if (self.captured as f32) < target as f32 / 2.0 {
            "🌿 Keep going"
        } else if self.captured < target {
            "🌸 Almost there!"
        } else {
            "✨ Sanctuary complete!"
        }
    }

    /// Flavour text under the clock
    pub fn clock_note(&self) -> &'static str {
        if self.time_remaining > 20 {
            "⏰ Plenty of time"
        } else if self.time_remaining > 10 {
            "⚡ Time is ticking"
        } else {
            "🔥 Final moments!"
        }
    }
}

/// What the page needs to draw the sanctuary
#[derive(Debug, Clone, Serialize)]
pub struct SanctuarySnapshot {
    pub phase: GamePhase,
    pub captured: u32,
    pub target: u32,
    pub time_remaining: u32,
    pub round_secs: u32,
    pub active: usize,
    pub percent: u32,
    pub instruction: String,
    pub progress_note: &'static str,
    pub clock_note: &'static str,
    pub birds: Vec<Bird>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_round_is_ready() {
        let state = Sanctuary::new(RoundConfig::default(), 7);
        assert_eq!(state.phase, GamePhase::Ready);
        assert_eq!(state.time_remaining, 30);
        assert!(state.birds.is_empty());
        assert!(!state.timers_running());
    }

    #[test]
    fn test_config_from_settings() {
        let config = RoundConfig::default();
        assert_eq!(config.motion_ticks, 1);
        assert_eq!(config.spawn_ticks, 40);
        assert_eq!(config.clock_ticks, 20);
        assert_eq!(config.linger_ticks, 20);
    }

    #[test]
    fn test_linger_rounds_like_other_periods() {
        let settings = Settings {
            capture_linger_ms: 1010,
            spawn_period_ms: 1010,
            ..Settings::default()
        };
        let config = RoundConfig::from(&settings);
        assert_eq!(config.linger_ticks, 21);
        assert_eq!(config.linger_ticks, config.spawn_ticks);
    }

    #[test]
    fn test_interval_fires_on_period() {
        let mut interval = Interval::new(3);
        assert!(!interval.advance());
        assert!(!interval.advance());
        assert!(interval.advance());
        assert!(!interval.advance());
    }

    #[test]
    fn test_bird_capture_once() {
        let mut bird = Bird {
            id: 1,
            pos: Vec2::new(50.0, 50.0),
            vel: Vec2::ZERO,
            size: 1.0,
            glyph: "🐦",
            captured: false,
            captured_at: None,
        };
        assert!(bird.capture(5));
        assert!(!bird.capture(6));
        assert_eq!(bird.captured_at, Some(5));
    }

    #[test]
    fn test_notes() {
        let mut state = Sanctuary::new(RoundConfig::default(), 1);
        assert_eq!(state.progress_note(), "🌱 Start collecting");
        state.captured = 3;
        assert_eq!(state.progress_note(), "🌿 Keep going");
        state.captured = 4;
        assert_eq!(state.progress_note(), "🌸 Almost there!");
        state.captured = 8;
        assert_eq!(state.progress_note(), "✨ Sanctuary complete!");
        assert_eq!(state.completion_percent(), 100);

        state.time_remaining = 21;
        assert_eq!(state.clock_note(), "⏰ Plenty of time");
        state.time_remaining = 20;
        assert_eq!(state.clock_note(), "⚡ Time is ticking");
        state.time_remaining = 10;
        assert_eq!(state.clock_note(), "🔥 Final moments!");
    }
}
