//! Events emitted by the simulation for the host (toasts, completion callbacks, HUD).

use serde::Serialize;

/// A one-off user notification
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Toast {
    pub title: String,
    pub description: String,
}

impl Toast {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
        }
    }
}

/// Simulation events, drained by the host after each tick
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum SimEvent {
    /// A mini-game round finished. Sent at most once per round.
    Completed { success: bool },
    /// Notification for the toast sink
    Toast(Toast),
    /// A new bird entered the field
    Spawned { id: u32 },
    /// A bird was caught; `total` is the running capture count
    Captured { id: u32, total: u32 },
    /// A breath cycle finished and hit the stress monster
    BreathCompleted { damage: f32, health: f32 },
}
