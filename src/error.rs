//! Error types
//!
//! Gameplay no-ops (stale capture ids, locked quests) are not errors and never
//! show up here. These cover loading the static content table and validating
//! user settings.

/// Failure to load or validate the static content table
#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    #[error("content JSON is malformed: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("duplicate quest id `{0}`")]
    DuplicateQuest(String),
    #[error("quest `{quest}` unlocks unknown quest `{target}`")]
    UnknownUnlock { quest: String, target: String },
    #[error("mood `{label}` has value {value}, expected 1..=5")]
    MoodValueOutOfRange { label: String, value: u8 },
    #[error("duplicate mood value {0}")]
    DuplicateMood(u8),
    #[error("no mood response for value {0}")]
    MissingResponse(u8),
}

/// Rejected settings
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    #[error("round duration must be at least one second")]
    ZeroDuration,
    #[error("capture target must be at least one")]
    ZeroTarget,
    #[error("population cap must be at least one")]
    ZeroPopulationCap,
    #[error("initial batch of {batch} exceeds population cap {cap}")]
    BatchAboveCap { batch: u32, cap: u32 },
    #[error("{0} period must be non-zero")]
    ZeroPeriod(&'static str),
}
