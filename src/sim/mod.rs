//! Deterministic simulation module
//!
//! All mini-game logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (birds keep insertion order)
//! - No DOM or platform dependencies

pub mod breathing;
pub mod events;
pub mod motion;
pub mod round;
pub mod spawn;
pub mod state;
pub mod tick;

pub use breathing::{BattleSnapshot, BreathPhase, BreathingBattle, ease_in_out, orb_scale};
pub use events::{SimEvent, Toast};
pub use motion::{position_at, within_despawn_bounds, within_exit_bounds};
pub use spawn::{SpawnEdge, spawn_bird, spawn_bird_from};
pub use state::{Bird, GamePhase, Interval, RoundConfig, RoundTimers, Sanctuary, SanctuarySnapshot};
pub use tick::{TickInput, tick};
