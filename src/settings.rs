//! Round settings and preferences
//!
//! Persisted in LocalStorage on the web, defaults natively.

use serde::{Deserialize, Serialize};

use crate::error::SettingsError;

/// Difficulty presets for the Bird Sanctuary round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Difficulty {
    Gentle,
    #[default]
    Standard,
    Brisk,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Gentle => "Gentle",
            Difficulty::Standard => "Standard",
            Difficulty::Brisk => "Brisk",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "gentle" | "easy" => Some(Difficulty::Gentle),
            "standard" | "normal" => Some(Difficulty::Standard),
            "brisk" | "hard" => Some(Difficulty::Brisk),
            _ => None,
        }
    }

    /// Round length in seconds
    pub fn round_secs(&self) -> u32 {
        match self {
            Difficulty::Gentle => 45,
            Difficulty::Standard => 30,
            Difficulty::Brisk => 20,
        }
    }

    /// Birds to catch for a victory
    pub fn capture_target(&self) -> u32 {
        match self {
            Difficulty::Gentle => 6,
            Difficulty::Standard => 8,
            Difficulty::Brisk => 10,
        }
    }
}

/// Round settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Difficulty preset the round values came from
    pub difficulty: Difficulty,

    // === Round ===
    /// Round length in whole seconds
    pub round_secs: u32,
    /// Captures needed for victory
    pub capture_target: u32,
    /// Maximum birds in the set at once (captured birds count until filtered)
    pub population_cap: u32,
    /// Birds seeded when a round starts
    pub initial_batch: u32,

    // === Timers (milliseconds) ===
    pub motion_period_ms: u32,
    pub spawn_period_ms: u32,
    pub clock_period_ms: u32,
    /// How long a captured bird lingers before it is dropped
    pub capture_linger_ms: u32,

    // === Accessibility ===
    /// Reduced motion (orb stays at rest scale)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Standard,

            round_secs: 30,
            capture_target: 8,
            population_cap: 6,
            initial_batch: 3,

            motion_period_ms: 50,
            spawn_period_ms: 2000,
            clock_period_ms: 1000,
            capture_linger_ms: 1000,

            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Create settings from a difficulty preset
    pub fn from_difficulty(difficulty: Difficulty) -> Self {
        let mut settings = Self::default();
        settings.apply_difficulty(difficulty);
        settings
    }

    /// Apply a difficulty preset (updates duration and target)
    pub fn apply_difficulty(&mut self, difficulty: Difficulty) {
        self.difficulty = difficulty;
        self.round_secs = difficulty.round_secs();
        self.capture_target = difficulty.capture_target();
    }

    /// Check invariants the round relies on
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.round_secs == 0 {
            return Err(SettingsError::ZeroDuration);
        }
        if self.capture_target == 0 {
            return Err(SettingsError::ZeroTarget);
        }
        if self.population_cap == 0 {
            return Err(SettingsError::ZeroPopulationCap);
        }
        if self.initial_batch > self.population_cap {
            return Err(SettingsError::BatchAboveCap {
                batch: self.initial_batch,
                cap: self.population_cap,
            });
        }
        for (name, period) in [
            ("motion", self.motion_period_ms),
            ("spawn", self.spawn_period_ms),
            ("clock", self.clock_period_ms),
        ] {
            if period == 0 {
                return Err(SettingsError::ZeroPeriod(name));
            }
        }
        Ok(())
    }

    /// Parse settings from JSON, rejecting invalid values
    pub fn from_json(json: &str) -> Option<Self> {
        let settings: Settings = match serde_json::from_str(json) {
            Ok(s) => s,
            Err(e) => {
                log::warn!("Ignoring malformed settings: {}", e);
                return None;
            }
        };
        match settings.validate() {
            Ok(()) => Some(settings),
            Err(e) => {
                log::warn!("Ignoring invalid settings: {}", e);
                None
            }
        }
    }

    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "zen_quest_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Some(settings) = Self::from_json(&json) {
                    log::info!("Loaded settings from LocalStorage");
                    return settings;
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let settings = Settings::default();
        assert_eq!(settings.round_secs, 30);
        assert_eq!(settings.capture_target, 8);
        assert_eq!(settings.population_cap, 6);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_difficulty_presets() {
        let gentle = Settings::from_difficulty(Difficulty::Gentle);
        assert_eq!(gentle.round_secs, 45);
        assert_eq!(gentle.capture_target, 6);
        assert!(gentle.validate().is_ok());

        assert_eq!(Difficulty::from_str("HARD"), Some(Difficulty::Brisk));
        assert_eq!(Difficulty::from_str("nope"), None);
        assert_eq!(Difficulty::Standard.as_str(), "Standard");
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let settings = Settings {
            initial_batch: 7,
            ..Settings::default()
        };
        assert_eq!(
            settings.validate(),
            Err(SettingsError::BatchAboveCap { batch: 7, cap: 6 })
        );

        let settings = Settings {
            spawn_period_ms: 0,
            ..Settings::default()
        };
        assert_eq!(settings.validate(), Err(SettingsError::ZeroPeriod("spawn")));

        let settings = Settings {
            round_secs: 0,
            ..Settings::default()
        };
        assert_eq!(settings.validate(), Err(SettingsError::ZeroDuration));
    }

    #[test]
    fn test_from_json_fills_missing_fields() {
        let settings = Settings::from_json(r#"{"capture_target": 4}"#).unwrap();
        assert_eq!(settings.capture_target, 4);
        assert_eq!(settings.round_secs, 30);

        assert!(Settings::from_json(r#"{"capture_target": 0}"#).is_none());
        assert!(Settings::from_json("not json").is_none());
    }
}
