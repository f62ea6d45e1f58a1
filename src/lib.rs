//! ZenQuest - a gamified mental-wellness front end
//!
//! Core modules:
//! - `sim`: Deterministic simulation (Bird Sanctuary round, breathing battle)
//! - `router`: Screen router for the top-level view switcher
//! - `content`: Static mood / quest tables loaded once at startup
//! - `mood`, `quest`: Mood check-in and adventure map
//! - `app`: Wires screens, mini-games and notifications together
//! - `settings`: User-tunable round settings

pub mod app;
pub mod content;
pub mod error;
pub mod mood;
pub mod quest;
pub mod router;
pub mod settings;
pub mod sim;

pub use app::{AppEvent, Toast, ZenQuest};
pub use content::Content;
pub use error::{ContentError, SettingsError};
pub use router::{RouteEvent, Screen};
pub use settings::{Difficulty, Settings};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep in seconds (the 50 ms motion tick)
    pub const SIM_DT: f32 = 0.05;
    /// Fixed timestep in milliseconds
    pub const SIM_DT_MS: u32 = 50;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Visible field is 0..FIELD_SIZE on both axes (percent of viewport)
    pub const FIELD_SIZE: f32 = 100.0;
    /// Spawn offset just outside the visible edge
    pub const SPAWN_OFFSET: f32 = 5.0;
    /// Birds past this margin are parked off-screen
    pub const EXIT_MARGIN: f32 = 10.0;
    /// Parked birds past this margin are dropped from the set
    pub const DESPAWN_MARGIN: f32 = 50.0;
    /// Where exiting birds are parked
    pub const PARKED_POS: f32 = -100.0;

    /// Inward speed range (units per motion tick)
    pub const INWARD_SPEED_MIN: f32 = 0.1;
    pub const INWARD_SPEED_MAX: f32 = 0.4;
    /// Sideways drift is in [-DRIFT_MAX, DRIFT_MAX)
    pub const DRIFT_MAX: f32 = 0.25;

    /// Bird size scalar range
    pub const BIRD_SIZE_MIN: f32 = 0.8;
    pub const BIRD_SIZE_MAX: f32 = 1.3;

    /// Bird glyphs, picked uniformly
    pub const BIRD_GLYPHS: [&str; 5] = ["🐦", "🕊️", "🦋", "🐝", "🌟"];
}

/// Whole simulation ticks in `ms`, rounded up so a period is never zero ticks
#[inline]
pub fn ms_to_ticks(ms: u32) -> u32 {
    ms.div_ceil(consts::SIM_DT_MS).max(1)
}
