//! Breathing battle
//!
//! Inhale 4 s, hold 1 s, exhale 6 s. Every finished exhale damages the stress
//! monster. The orb scale is a pure function of the phase start scale and the
//! time spent in the phase.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::events::{SimEvent, Toast};

/// Orb scale at rest and when idle
pub const REST_SCALE: f32 = 1.0;
pub const INHALE_SCALE: f32 = 1.4;
pub const EXHALE_SCALE: f32 = 0.8;

pub const MONSTER_MAX_HEALTH: f32 = 100.0;
/// Damage per breath is drawn from [MIN, MAX)
pub const BREATH_DAMAGE_MIN: f32 = 15.0;
pub const BREATH_DAMAGE_MAX: f32 = 40.0;
/// Breaths allowed before the battle is lost
pub const MAX_BREATHS: u32 = 8;
/// Slack for accumulated fixed steps landing just short of a phase boundary
const PHASE_EPSILON: f32 = 1e-4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BreathPhase {
    Ready,
    Inhale,
    Hold,
    Exhale,
    Victory,
    Defeat,
}

impl BreathPhase {
    /// Seconds the phase lasts, None for phases that wait on the user
    pub fn duration_secs(&self) -> Option<f32> {
        match self {
            BreathPhase::Inhale => Some(4.0),
            BreathPhase::Hold => Some(1.0),
            BreathPhase::Exhale => Some(6.0),
            _ => None,
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(
            self,
            BreathPhase::Inhale | BreathPhase::Hold | BreathPhase::Exhale
        )
    }

    pub fn instruction(&self) -> &'static str {
        match self {
            BreathPhase::Ready => "Press Start to begin your breathing battle!",
            BreathPhase::Inhale => "Breathe in slowly... 4 seconds",
            BreathPhase::Hold => "Hold your breath... 1 second",
            BreathPhase::Exhale => "Breathe out slowly... 6 seconds",
            BreathPhase::Victory => "🎉 You defeated the stress monster! Well done!",
            BreathPhase::Defeat => "The stress grew stronger. Try again with deeper breaths.",
        }
    }
}

/// Cosine ease-in-out on [0, 1]
#[inline]
pub fn ease_in_out(progress: f32) -> f32 {
    let p = progress.clamp(0.0, 1.0);
    0.5 * (1.0 - (p * std::f32::consts::PI).cos())
}

/// Orb scale `elapsed` seconds into `phase`, starting from `start_scale`
pub fn orb_scale(phase: BreathPhase, start_scale: f32, elapsed: f32) -> f32 {
    let Some(duration) = phase.duration_secs() else {
        return REST_SCALE;
    };
    let target = match phase {
        BreathPhase::Inhale => INHALE_SCALE,
        BreathPhase::Exhale => EXHALE_SCALE,
        _ => start_scale,
    };
    let eased = ease_in_out(elapsed / duration);
    start_scale + (target - start_scale) * eased
}

/// Breathing battle state
#[derive(Debug, Clone)]
pub struct BreathingBattle {
    pub phase: BreathPhase,
    pub monster_health: f32,
    /// Completed breath cycles this battle
    pub breaths: u32,
    /// Seconds spent in the current phase
    pub phase_elapsed: f32,
    phase_start_scale: f32,
    scale: f32,
    /// Keep the orb at rest scale
    pub reduced_motion: bool,
    completion_sent: bool,
    rng: Pcg32,
    events: Vec<SimEvent>,
}

impl BreathingBattle {
    pub fn new(seed: u64) -> Self {
        Self {
            phase: BreathPhase::Ready,
            monster_health: MONSTER_MAX_HEALTH,
            breaths: 0,
            phase_elapsed: 0.0,
            phase_start_scale: REST_SCALE,
            scale: REST_SCALE,
            reduced_motion: false,
            completion_sent: false,
            rng: Pcg32::seed_from_u64(seed),
            events: Vec::new(),
        }
    }

    /// Begin a battle from Ready, Victory or Defeat
    pub fn start(&mut self) -> bool {
        if self.phase.is_active() {
            return false;
        }
        self.monster_health = MONSTER_MAX_HEALTH;
        self.breaths = 0;
        self.completion_sent = false;
        self.scale = REST_SCALE;
        self.enter(BreathPhase::Inhale);
        log::info!("Breathing battle started");
        true
    }

    /// Back to Ready from any phase
    pub fn reset(&mut self) {
        self.phase = BreathPhase::Ready;
        self.monster_health = MONSTER_MAX_HEALTH;
        self.breaths = 0;
        self.phase_elapsed = 0.0;
        self.phase_start_scale = REST_SCALE;
        self.scale = REST_SCALE;
        self.completion_sent = false;
    }

    /// Advance by `dt` seconds
    pub fn tick(&mut self, dt: f32) {
        let Some(duration) = self.phase.duration_secs() else {
            return;
        };
        self.phase_elapsed += dt;
        self.scale = orb_scale(self.phase, self.phase_start_scale, self.phase_elapsed);
        if self.phase_elapsed + PHASE_EPSILON >= duration {
            self.complete_phase();
        }
    }

    /// Scale to draw the orb at
    pub fn orb_scale(&self) -> f32 {
        if self.reduced_motion || !self.phase.is_active() {
            REST_SCALE
        } else {
            self.scale
        }
    }

    pub fn monster_opacity(&self) -> f32 {
        (self.monster_health / MONSTER_MAX_HEALTH).max(0.2)
    }

    pub fn monster_scale(&self) -> f32 {
        0.5 + (self.monster_health / MONSTER_MAX_HEALTH) * 0.5
    }

    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn snapshot(&self) -> BattleSnapshot {
        BattleSnapshot {
            phase: self.phase,
            instruction: self.phase.instruction(),
            monster_health: self.monster_health,
            monster_opacity: self.monster_opacity(),
            monster_scale: self.monster_scale(),
            orb_scale: self.orb_scale(),
            breaths: self.breaths,
        }
    }

    fn enter(&mut self, phase: BreathPhase) {
        self.phase = phase;
        self.phase_elapsed = 0.0;
        self.phase_start_scale = self.scale;
    }

    fn complete_phase(&mut self) {
        match self.phase {
            BreathPhase::Inhale => self.enter(BreathPhase::Hold),
            BreathPhase::Hold => self.enter(BreathPhase::Exhale),
            BreathPhase::Exhale => self.finish_breath(),
            _ => {}
        }
    }

    fn finish_breath(&mut self) {
        let damage = self.rng.random_range(BREATH_DAMAGE_MIN..BREATH_DAMAGE_MAX);
        self.monster_health = (self.monster_health - damage).max(0.0);
        self.breaths += 1;
        self.events.push(SimEvent::BreathCompleted {
            damage,
            health: self.monster_health,
        });
        log::debug!(
            "Breath {} dealt {:.1}, monster at {:.1}",
            self.breaths,
            damage,
            self.monster_health
        );

        if self.monster_health <= 0.0 {
            self.enter(BreathPhase::Victory);
            self.complete(true);
        } else if self.breaths >= MAX_BREATHS {
            self.enter(BreathPhase::Defeat);
            self.complete(false);
        } else {
            self.enter(BreathPhase::Inhale);
        }
    }

    fn complete(&mut self, success: bool) {
        if self.completion_sent {
            return;
        }
        self.completion_sent = true;
        log::info!(
            "Breathing battle over after {} breaths: {}",
            self.breaths,
            if success { "victory" } else { "defeat" }
        );
        if success {
            self.events.push(SimEvent::Toast(Toast::new(
                "Victory! 🌟",
                "You've successfully calmed your stress. Take a moment to appreciate this feeling of peace.",
            )));
        }
        self.events.push(SimEvent::Completed { success });
    }
}

/// What the page needs to draw the battle
#[derive(Debug, Clone, Serialize)]
pub struct BattleSnapshot {
    pub phase: BreathPhase,
    pub instruction: &'static str,
    pub monster_health: f32,
    pub monster_opacity: f32,
    pub monster_scale: f32,
    pub orb_scale: f32,
    pub breaths: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;

    fn run_secs(battle: &mut BreathingBattle, secs: f32) {
        let steps = (secs / SIM_DT).round() as u32;
        for _ in 0..steps {
            battle.tick(SIM_DT);
        }
    }

    #[test]
    fn test_ease_endpoints() {
        assert_eq!(ease_in_out(0.0), 0.0);
        assert!((ease_in_out(0.5) - 0.5).abs() < 1e-6);
        assert!((ease_in_out(1.0) - 1.0).abs() < 1e-6);
        assert!((ease_in_out(3.0) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_orb_scale_curves() {
        assert_eq!(orb_scale(BreathPhase::Inhale, 1.0, 0.0), 1.0);
        assert!((orb_scale(BreathPhase::Inhale, 1.0, 4.0) - INHALE_SCALE).abs() < 1e-5);
        assert!((orb_scale(BreathPhase::Inhale, 1.0, 2.0) - 1.2).abs() < 1e-5);
        assert!((orb_scale(BreathPhase::Exhale, 1.4, 6.0) - EXHALE_SCALE).abs() < 1e-5);
        assert_eq!(orb_scale(BreathPhase::Hold, 1.4, 0.5), 1.4);
        assert_eq!(orb_scale(BreathPhase::Ready, 1.4, 0.5), REST_SCALE);
    }

    #[test]
    fn test_phase_sequence() {
        let mut battle = BreathingBattle::new(1);
        assert!(battle.start());
        assert_eq!(battle.phase, BreathPhase::Inhale);
        run_secs(&mut battle, 4.0);
        assert_eq!(battle.phase, BreathPhase::Hold);
        assert!((battle.orb_scale() - INHALE_SCALE).abs() < 1e-3);
        run_secs(&mut battle, 1.0);
        assert_eq!(battle.phase, BreathPhase::Exhale);
        run_secs(&mut battle, 6.0);
        assert_eq!(battle.breaths, 1);
        assert!(battle.monster_health <= MONSTER_MAX_HEALTH - BREATH_DAMAGE_MIN);
        assert!(battle.monster_health > MONSTER_MAX_HEALTH - BREATH_DAMAGE_MAX);
    }

    #[test]
    fn test_battle_ends_with_single_completion() {
        let mut battle = BreathingBattle::new(77);
        battle.start();
        run_secs(&mut battle, 11.0 * MAX_BREATHS as f32 + 5.0);
        assert!(matches!(
            battle.phase,
            BreathPhase::Victory | BreathPhase::Defeat
        ));
        let events = battle.drain_events();
        let completions = events
            .iter()
            .filter(|e| matches!(e, SimEvent::Completed { .. }))
            .count();
        assert_eq!(completions, 1);
        // Worst case is seven 15-point breaths
        assert!(battle.breaths <= 7);
        assert_eq!(battle.phase, BreathPhase::Victory);
    }

    #[test]
    fn test_reset_and_reduced_motion() {
        let mut battle = BreathingBattle::new(5);
        battle.start();
        run_secs(&mut battle, 2.0);
        battle.reduced_motion = true;
        assert_eq!(battle.orb_scale(), REST_SCALE);
        battle.reset();
        assert_eq!(battle.phase, BreathPhase::Ready);
        assert_eq!(battle.monster_health, MONSTER_MAX_HEALTH);
        battle.tick(10.0);
        assert_eq!(battle.phase, BreathPhase::Ready);
    }

    #[test]
    fn test_monster_visuals() {
        let mut battle = BreathingBattle::new(5);
        assert_eq!(battle.monster_opacity(), 1.0);
        assert_eq!(battle.monster_scale(), 1.0);
        battle.monster_health = 0.0;
        assert_eq!(battle.monster_opacity(), 0.2);
        assert_eq!(battle.monster_scale(), 0.5);
    }
}
