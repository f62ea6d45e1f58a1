//! Top-level view switcher
//!
//! Owns the router, the static content, the mood form, the adventure map and
//! both mini-games, and steps everything off one fixed-step clock. The host
//! feeds it frame deltas and user actions, then drains `AppEvent`s for toasts
//! and completion callbacks.

use serde::Serialize;

use crate::consts::{MAX_SUBSTEPS, SIM_DT};
use crate::content::{Content, MoodOption, QuestKind};
use crate::error::SettingsError;
use crate::mood::MoodCheckin;
use crate::quest::AdventureMap;
use crate::router::{RouteEvent, Screen, transition, transition_delay};
use crate::settings::Settings;
use crate::sim::{
    BattleSnapshot, BreathingBattle, GamePhase, RoundConfig, Sanctuary, SanctuarySnapshot, SimEvent,
    TickInput, tick,
};

pub use crate::sim::Toast;

/// Notifications for the embedding page
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum AppEvent {
    Toast(Toast),
    ScreenChanged { from: Screen, to: Screen },
    MoodSubmitted { value: u8 },
    /// A mini-game round finished. At most once per round.
    GameCompleted { screen: Screen, success: bool },
    QuestsUnlocked { ids: Vec<String> },
}

/// Route change waiting on a closing animation
#[derive(Debug, Clone, Copy, PartialEq)]
struct PendingRoute {
    event: RouteEvent,
    remaining: f32,
}

/// The whole front end
#[derive(Debug)]
pub struct ZenQuest {
    pub settings: Settings,
    content: Content,
    screen: Screen,
    pending: Option<PendingRoute>,
    pub mood: MoodCheckin,
    user_mood: Option<MoodOption>,
    pub map: AdventureMap,
    pub sanctuary: Sanctuary,
    pub battle: BreathingBattle,
    sanctuary_input: TickInput,
    active_quest: Option<(String, QuestKind)>,
    accumulator: f32,
    events: Vec<AppEvent>,
}

impl ZenQuest {
    pub fn new(settings: Settings, content: Content, seed: u64) -> Result<Self, SettingsError> {
        settings.validate()?;
        let mut battle = BreathingBattle::new(seed ^ 0x9e37_79b9_7f4a_7c15);
        battle.reduced_motion = settings.reduced_motion;
        Ok(Self {
            sanctuary: Sanctuary::new(RoundConfig::from(&settings), seed),
            battle,
            map: AdventureMap::new(content.quests.clone()),
            settings,
            content,
            screen: Screen::Home,
            pending: None,
            mood: MoodCheckin::new(),
            user_mood: None,
            sanctuary_input: TickInput::default(),
            active_quest: None,
            accumulator: 0.0,
            events: Vec::new(),
        })
    }

    /// Swap in new settings. Refused while a sanctuary round is running.
    pub fn apply_settings(&mut self, settings: Settings) -> Result<bool, SettingsError> {
        settings.validate()?;
        if self.sanctuary.phase == GamePhase::Playing {
            log::warn!("Settings change ignored mid-round");
            return Ok(false);
        }
        self.sanctuary.config = RoundConfig::from(&settings);
        // A finished round keeps showing its final clock
        if self.sanctuary.phase == GamePhase::Ready {
            self.sanctuary.time_remaining = settings.round_secs;
        }
        self.battle.reduced_motion = settings.reduced_motion;
        self.settings = settings;
        Ok(true)
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn content(&self) -> &Content {
        &self.content
    }

    /// Last submitted mood, shown in the tracking card
    pub fn user_mood(&self) -> Option<&MoodOption> {
        self.user_mood.as_ref()
    }

    /// Whether a delayed screen change is queued
    pub fn has_pending_route(&self) -> bool {
        self.pending.is_some()
    }

    pub fn drain_events(&mut self) -> Vec<AppEvent> {
        std::mem::take(&mut self.events)
    }

    // === Navigation ===

    pub fn start_quest(&mut self) {
        self.route(RouteEvent::StartQuest);
    }

    /// Navbar jump; cancels any queued transition
    pub fn navigate(&mut self, screen: Screen) {
        self.pending = None;
        self.route(RouteEvent::Navigate(screen));
    }

    // === Mood ===

    pub fn select_mood(&mut self, value: u8) -> bool {
        self.mood.select(&self.content, value)
    }

    pub fn submit_mood(&mut self) -> bool {
        let Some((mood, toast)) = self.mood.submit(&self.content) else {
            return false;
        };
        self.events.push(AppEvent::Toast(toast));
        self.events.push(AppEvent::MoodSubmitted { value: mood.value });
        self.user_mood = Some(mood);
        self.route(RouteEvent::MoodSubmitted);
        true
    }

    // === Adventure map ===

    /// Pick a quest on the map. Locked quests and picks made off the map
    /// are ignored.
    pub fn select_quest(&mut self, id: &str) -> bool {
        if self.screen != Screen::Map {
            return false;
        }
        let Some(quest) = self.map.select(id) else {
            return false;
        };
        let kind = quest.kind;
        self.active_quest = Some((quest.id.clone(), kind));
        self.route(RouteEvent::QuestChosen(kind));
        true
    }

    // === Bird Sanctuary (applied on the next step, dropped off-screen) ===

    pub fn start_sanctuary(&mut self) {
        if self.screen == Screen::Sanctuary {
            self.sanctuary_input.start = true;
        }
    }

    pub fn reset_sanctuary(&mut self) {
        if self.screen == Screen::Sanctuary {
            self.sanctuary_input.reset = true;
        }
    }

    /// Tap on a bird
    pub fn capture(&mut self, id: u32) {
        if self.screen == Screen::Sanctuary {
            self.sanctuary_input.captures.push(id);
        }
    }

    // === Breathing battle ===

    pub fn start_battle(&mut self) -> bool {
        self.screen == Screen::Breathing && self.battle.start()
    }

    pub fn reset_battle(&mut self) {
        self.battle.reset();
    }

    // === Clock ===

    /// Feed a frame delta in seconds; runs as many fixed steps as fit
    pub fn frame(&mut self, dt: f32) -> u32 {
        self.accumulator += dt.max(0.0);
        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            self.step();
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
        if substeps == MAX_SUBSTEPS {
            // Drop the backlog instead of spiralling
            self.accumulator = self.accumulator.min(SIM_DT);
        }
        substeps
    }

    /// One fixed step of everything on screen
    pub fn step(&mut self) {
        self.mood.tick(SIM_DT);

        match self.screen {
            Screen::Sanctuary => {
                tick(&mut self.sanctuary, &self.sanctuary_input);
                self.sanctuary_input.clear();
                let events = self.sanctuary.drain_events();
                self.handle_sim_events(events);
            }
            Screen::Breathing => {
                self.battle.tick(SIM_DT);
                let events = self.battle.drain_events();
                self.handle_sim_events(events);
            }
            _ => {}
        }

        if let Some(pending) = self.pending.as_mut() {
            pending.remaining -= SIM_DT;
            if pending.remaining <= 0.0 {
                let event = pending.event;
                self.pending = None;
                self.apply(event);
            }
        }
    }

    pub fn sanctuary_snapshot(&self) -> SanctuarySnapshot {
        self.sanctuary.snapshot()
    }

    pub fn battle_snapshot(&self) -> BattleSnapshot {
        self.battle.snapshot()
    }

    fn handle_sim_events(&mut self, events: Vec<SimEvent>) {
        for event in events {
            match event {
                SimEvent::Toast(toast) => self.events.push(AppEvent::Toast(toast)),
                SimEvent::Completed { success } => self.game_completed(success),
                _ => {}
            }
        }
    }

    fn game_completed(&mut self, success: bool) {
        let screen = self.screen;
        self.events.push(AppEvent::GameCompleted { screen, success });

        let played = match screen {
            Screen::Breathing => Some(QuestKind::Breathing),
            Screen::Sanctuary => Some(QuestKind::Sanctuary),
            _ => None,
        };
        if success {
            if let Some((id, kind)) = self.active_quest.clone() {
                if Some(kind) == played {
                    let ids = self.map.complete(&id);
                    if !ids.is_empty() {
                        self.events.push(AppEvent::QuestsUnlocked { ids });
                    }
                }
            }
        }
        self.route(RouteEvent::GameFinished);
    }

    fn route(&mut self, event: RouteEvent) {
        let delay = transition_delay(event);
        if delay > 0.0 {
            self.pending = Some(PendingRoute {
                event,
                remaining: delay,
            });
        } else {
            self.apply(event);
        }
    }

    fn apply(&mut self, event: RouteEvent) {
        let from = self.screen;
        let to = transition(from, event);
        if to == from {
            return;
        }

        // Mini-game timers never outlive their screen
        match from {
            Screen::Sanctuary => {
                self.sanctuary.reset();
                self.sanctuary.drain_events();
                self.sanctuary_input.clear();
            }
            Screen::Breathing => {
                self.battle.reset();
                self.battle.drain_events();
            }
            _ => {}
        }

        if to == Screen::Sanctuary {
            self.sanctuary_input.clear();
        }

        log::info!("Screen {:?} -> {:?}", from, to);
        self.screen = to;
        self.events.push(AppEvent::ScreenChanged { from, to });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Difficulty;

    fn app() -> ZenQuest {
        ZenQuest::new(Settings::default(), Content::builtin().unwrap(), 4242).unwrap()
    }

    fn run_secs(app: &mut ZenQuest, secs: f32) {
        let steps = (secs / SIM_DT).round() as u32;
        for _ in 0..steps {
            app.step();
        }
    }

    #[test]
    fn test_rejects_invalid_settings() {
        let settings = Settings {
            capture_target: 0,
            ..Settings::default()
        };
        assert!(ZenQuest::new(settings, Content::builtin().unwrap(), 1).is_err());
    }

    #[test]
    fn test_apply_settings_between_rounds() {
        let mut app = app();
        assert_eq!(app.apply_settings(Settings::from_difficulty(Difficulty::Brisk)), Ok(true));
        assert_eq!(app.sanctuary.config.capture_target, 10);
        assert_eq!(app.sanctuary.time_remaining, 20);

        app.navigate(Screen::Sanctuary);
        app.start_sanctuary();
        app.step();
        assert_eq!(app.apply_settings(Settings::default()), Ok(false));
        assert_eq!(app.sanctuary.config.capture_target, 10);
    }

    #[test]
    fn test_mood_flow_reaches_map_after_delay() {
        let mut app = app();
        app.start_quest();
        assert_eq!(app.screen(), Screen::Mood);

        assert!(!app.submit_mood());
        assert!(app.select_mood(4));
        assert!(app.submit_mood());
        assert_eq!(app.screen(), Screen::Mood);
        assert_eq!(app.user_mood().map(|m| m.value), Some(4));

        run_secs(&mut app, 3.0);
        assert_eq!(app.screen(), Screen::Mood);
        run_secs(&mut app, 0.6);
        assert_eq!(app.screen(), Screen::Map);

        let events = app.drain_events();
        assert!(events.contains(&AppEvent::MoodSubmitted { value: 4 }));
        assert!(events.iter().any(|e| matches!(e, AppEvent::Toast(_))));
    }

    #[test]
    fn test_navigate_cancels_pending() {
        let mut app = app();
        app.start_quest();
        app.select_mood(3);
        app.submit_mood();
        app.navigate(Screen::Home);
        run_secs(&mut app, 5.0);
        assert_eq!(app.screen(), Screen::Home);
        assert!(!app.has_pending_route());
    }

    #[test]
    fn test_sanctuary_victory_completes_quest() {
        let mut app = app();
        app.navigate(Screen::Map);
        assert!(!app.select_quest("3"), "locked");
        assert!(app.select_quest("5"));
        assert_eq!(app.screen(), Screen::Sanctuary);

        app.start_sanctuary();
        app.step();
        assert_eq!(app.sanctuary.phase, GamePhase::Playing);

        let mut events = Vec::new();
        for _ in 0..(30 * 20) {
            if let Some(bird) = app.sanctuary.birds.iter().find(|b| !b.captured) {
                let id = bird.id;
                app.capture(id);
            }
            app.step();
            events.extend(app.drain_events());
            if app.sanctuary.phase != GamePhase::Playing {
                break;
            }
        }
        assert_eq!(app.sanctuary.phase, GamePhase::Victory);
        let completions: Vec<_> = events
            .iter()
            .filter(|e| matches!(e, AppEvent::GameCompleted { .. }))
            .collect();
        assert_eq!(completions.len(), 1);
        assert!(app.map.quest("5").unwrap().completed);

        // Back to the map after the closing delay, with the round torn down
        run_secs(&mut app, 2.1);
        assert_eq!(app.screen(), Screen::Map);
        assert_eq!(app.sanctuary.phase, GamePhase::Ready);
        assert!(!app.sanctuary.timers_running());
    }

    #[test]
    fn test_leaving_sanctuary_stops_round() {
        let mut app = app();
        app.navigate(Screen::Sanctuary);
        app.start_sanctuary();
        app.step();
        assert!(app.sanctuary.timers_running());

        app.navigate(Screen::Home);
        assert_eq!(app.sanctuary.phase, GamePhase::Ready);
        assert!(!app.sanctuary.timers_running());
        assert!(app.sanctuary.birds.is_empty());
    }

    #[test]
    fn test_breathing_battle_returns_to_map() {
        let mut app = app();
        app.navigate(Screen::Map);
        assert!(app.select_quest("2"));
        assert_eq!(app.screen(), Screen::Breathing);
        assert!(app.start_battle());

        run_secs(&mut app, 11.0 * 7.0 + 1.0);
        let events = app.drain_events();
        assert!(events.contains(&AppEvent::GameCompleted {
            screen: Screen::Breathing,
            success: true
        }));
        assert!(events.contains(&AppEvent::QuestsUnlocked {
            ids: vec!["4".to_string()]
        }));

        run_secs(&mut app, 2.5);
        assert_eq!(app.screen(), Screen::Map);
    }

    #[test]
    fn test_sanctuary_input_off_screen_ignored() {
        let mut app = app();
        app.start_sanctuary();
        for _ in 0..1000 {
            app.capture(1);
        }
        run_secs(&mut app, 5.0);

        app.navigate(Screen::Sanctuary);
        app.step();
        assert_eq!(app.sanctuary.phase, GamePhase::Ready);
        assert_eq!(app.sanctuary.captured, 0);
        assert!(app.sanctuary.birds.is_empty());

        // Taps on the screen itself still land
        app.start_sanctuary();
        app.step();
        assert_eq!(app.sanctuary.phase, GamePhase::Playing);
    }

    #[test]
    fn test_select_quest_only_on_map() {
        let mut app = app();
        assert!(!app.select_quest("2"), "not on the map yet");

        app.navigate(Screen::Map);
        assert!(app.select_quest("2"));
        assert_eq!(app.screen(), Screen::Breathing);
        assert!(!app.select_quest("5"));
        assert_eq!(app.map.selected().map(|q| q.id.as_str()), Some("2"));

        assert!(app.start_battle());
        run_secs(&mut app, 11.0 * 7.0 + 1.0);
        assert!(app.map.quest("2").unwrap().completed);
    }

    #[test]
    fn test_sanctuary_time_up_stays_on_screen() {
        let mut app = app();
        app.navigate(Screen::Map);
        assert!(app.select_quest("5"));
        app.start_sanctuary();
        app.step();
        app.drain_events();

        // No taps: the clock runs out
        run_secs(&mut app, 31.0);
        assert_eq!(app.sanctuary.phase, GamePhase::TimeUp);
        assert_eq!(app.sanctuary.time_remaining, 0);

        run_secs(&mut app, 3.0);
        let events = app.drain_events();
        assert!(!events.iter().any(|e| matches!(e, AppEvent::GameCompleted { .. })));
        assert!(!app.has_pending_route());
        assert_eq!(app.screen(), Screen::Sanctuary);
        assert!(!app.map.quest("5").unwrap().completed);
    }

    #[test]
    fn test_apply_settings_keeps_finished_clock() {
        let mut app = app();
        app.navigate(Screen::Sanctuary);
        app.start_sanctuary();
        app.step();
        run_secs(&mut app, 31.0);
        assert_eq!(app.sanctuary.phase, GamePhase::TimeUp);

        assert_eq!(app.apply_settings(Settings::from_difficulty(Difficulty::Gentle)), Ok(true));
        assert_eq!(app.sanctuary.time_remaining, 0);
        assert_eq!(app.sanctuary.config.round_secs, 45);

        // The next round picks up the new length
        app.start_sanctuary();
        app.step();
        assert_eq!(app.sanctuary.time_remaining, 45);
    }

    #[test]
    fn test_frame_caps_substeps() {
        let mut app = app();
        assert_eq!(app.frame(0.1), 2);
        assert_eq!(app.frame(10.0), MAX_SUBSTEPS);
    }
}
