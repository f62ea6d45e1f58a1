//! Screen router
//!
//! The top-level view switcher as a value plus a pure transition function.

use serde::{Deserialize, Serialize};

use crate::content::QuestKind;

/// Screen currently shown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Screen {
    #[default]
    Home,
    Mood,
    Map,
    Breathing,
    Sanctuary,
}

impl Screen {
    pub const ALL: [Screen; 5] = [
        Screen::Home,
        Screen::Mood,
        Screen::Breathing,
        Screen::Sanctuary,
        Screen::Map,
    ];

    /// Navbar id
    pub fn id(&self) -> &'static str {
        match self {
            Screen::Home => "home",
            Screen::Mood => "mood",
            Screen::Map => "map",
            Screen::Breathing => "breathing",
            Screen::Sanctuary => "sanctuary",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Screen::ALL.into_iter().find(|s| s.id() == id)
    }

    /// Navbar label and icon
    pub fn label(&self) -> (&'static str, &'static str) {
        match self {
            Screen::Home => ("Home", "🏠"),
            Screen::Mood => ("Mood Check", "💭"),
            Screen::Map => ("Adventure", "🗺️"),
            Screen::Breathing => ("Breathing", "🫁"),
            Screen::Sanctuary => ("Sanctuary", "🐦"),
        }
    }

    /// Screens that host a timed mini-game
    pub fn is_minigame(&self) -> bool {
        matches!(self, Screen::Breathing | Screen::Sanctuary)
    }
}

/// Things that move the user between screens
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteEvent {
    /// "Start Your Quest" on the landing screen
    StartQuest,
    /// Mood check-in submitted
    MoodSubmitted,
    /// A quest was picked on the map
    QuestChosen(QuestKind),
    /// A mini-game finished, either outcome
    GameFinished,
    /// Direct navbar jump
    Navigate(Screen),
}

/// Screen after `event` arrives on `from`. Events that make no sense on the
/// current screen leave it unchanged.
pub fn transition(from: Screen, event: RouteEvent) -> Screen {
    match (from, event) {
        (_, RouteEvent::Navigate(to)) => to,
        (Screen::Home, RouteEvent::StartQuest) => Screen::Mood,
        (Screen::Mood, RouteEvent::MoodSubmitted) => Screen::Map,
        (Screen::Map, RouteEvent::QuestChosen(kind)) => match kind {
            QuestKind::Breathing => Screen::Breathing,
            QuestKind::Sanctuary => Screen::Sanctuary,
            _ => Screen::Map,
        },
        (Screen::Breathing | Screen::Sanctuary, RouteEvent::GameFinished) => Screen::Map,
        (screen, _) => screen,
    }
}

/// Seconds to wait before applying `event`, letting the current screen's
/// closing animation play
pub fn transition_delay(event: RouteEvent) -> f32 {
    match event {
        RouteEvent::MoodSubmitted => 3.5,
        RouteEvent::GameFinished => 2.0,
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_happy_path() {
        let s = transition(Screen::Home, RouteEvent::StartQuest);
        assert_eq!(s, Screen::Mood);
        let s = transition(s, RouteEvent::MoodSubmitted);
        assert_eq!(s, Screen::Map);
        let s = transition(s, RouteEvent::QuestChosen(QuestKind::Sanctuary));
        assert_eq!(s, Screen::Sanctuary);
        let s = transition(s, RouteEvent::GameFinished);
        assert_eq!(s, Screen::Map);
    }

    #[test]
    fn test_unhandled_quest_kinds_stay_on_map() {
        assert_eq!(
            transition(Screen::Map, RouteEvent::QuestChosen(QuestKind::Reflection)),
            Screen::Map
        );
    }

    #[test]
    fn test_out_of_place_events_ignored() {
        assert_eq!(transition(Screen::Map, RouteEvent::StartQuest), Screen::Map);
        assert_eq!(transition(Screen::Home, RouteEvent::GameFinished), Screen::Home);
        assert_eq!(
            transition(Screen::Sanctuary, RouteEvent::Navigate(Screen::Home)),
            Screen::Home
        );
    }

    #[test]
    fn test_ids_round_trip() {
        for screen in Screen::ALL {
            assert_eq!(Screen::from_id(screen.id()), Some(screen));
        }
        assert_eq!(Screen::from_id("settings"), None);
    }
}
