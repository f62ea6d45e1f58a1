//! Motion integrator
//!
//! Plain Euler steps with no acceleration. Birds that leave the extended bound
//! are parked off-screen, then dropped once past the despawn bound. The gap
//! between `EXIT_MARGIN` and `DESPAWN_MARGIN` is a hysteresis margin.

use glam::Vec2;

use super::state::{Bird, Sanctuary};
use crate::consts::*;

/// Position after `steps` motion ticks from `origin`
#[inline]
pub fn position_at(origin: Vec2, vel: Vec2, steps: u32) -> Vec2 {
    origin + vel * steps as f32
}

/// Inside the extended bound a bird may roam before it is parked
#[inline]
pub fn within_exit_bounds(pos: Vec2) -> bool {
    let lo = -EXIT_MARGIN;
    let hi = FIELD_SIZE + EXIT_MARGIN;
    pos.x >= lo && pos.x <= hi && pos.y >= lo && pos.y <= hi
}

/// Inside the bound past which parked birds are dropped
#[inline]
pub fn within_despawn_bounds(pos: Vec2) -> bool {
    let lo = -DESPAWN_MARGIN;
    let hi = FIELD_SIZE + DESPAWN_MARGIN;
    pos.x > lo && pos.x < hi && pos.y > lo && pos.y < hi
}

/// Advance one uncaptured bird by a single step
pub fn step_bird(bird: &mut Bird) {
    if bird.captured {
        return;
    }
    let next = bird.pos + bird.vel;
    bird.pos = if within_exit_bounds(next) {
        next
    } else {
        Vec2::splat(PARKED_POS)
    };
}

impl Sanctuary {
    /// One motion tick: move uncaptured birds, drop parked ones and captured
    /// ones whose linger period is over
    pub fn integrate(&mut self) {
        for bird in &mut self.birds {
            step_bird(bird);
        }

        let now = self.time_ticks;
        let linger = self.config.linger_ticks as u64;
        let before = self.birds.len();
        self.birds.retain(|bird| match bird.captured_at {
            Some(at) => now.saturating_sub(at) < linger,
            None => within_despawn_bounds(bird.pos),
        });
        let dropped = before - self.birds.len();
        if dropped > 0 {
            log::debug!("Dropped {} birds, {} remain", dropped, self.birds.len());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{GamePhase, RoundConfig};

    fn bird(id: u32, pos: Vec2, vel: Vec2) -> Bird {
        Bird {
            id,
            pos,
            vel,
            size: 1.0,
            glyph: "🦋",
            captured: false,
            captured_at: None,
        }
    }

    #[test]
    fn test_position_at_matches_stepping() {
        let mut b = bird(1, Vec2::new(-5.0, 40.0), Vec2::new(0.3, -0.1));
        for _ in 0..25 {
            step_bird(&mut b);
        }
        let expected = position_at(Vec2::new(-5.0, 40.0), Vec2::new(0.3, -0.1), 25);
        assert!((b.pos - expected).length() < 1e-4);
    }

    #[test]
    fn test_exit_parks_then_drops() {
        let mut state = Sanctuary::new(RoundConfig::default(), 1);
        state.phase = GamePhase::Playing;
        state
            .birds
            .push(bird(1, Vec2::new(109.9, 50.0), Vec2::new(0.4, 0.0)));
        state
            .birds
            .push(bird(2, Vec2::new(50.0, 50.0), Vec2::new(0.1, 0.1)));

        // Parked at (-100, -100), which is past the despawn bound: dropped same tick
        state.integrate();
        assert_eq!(state.birds.len(), 1);
        assert_eq!(state.birds[0].id, 2);
    }

    #[test]
    fn test_in_bounds_birds_are_kept() {
        let mut state = Sanctuary::new(RoundConfig::default(), 1);
        state
            .birds
            .push(bird(1, Vec2::new(-9.0, -9.0), Vec2::new(0.5, 0.5)));
        state.integrate();
        assert_eq!(state.birds.len(), 1);
        assert_eq!(state.birds[0].pos, Vec2::new(-8.5, -8.5));
    }

    #[test]
    fn test_captured_birds_freeze_then_expire() {
        let mut state = Sanctuary::new(RoundConfig::default(), 1);
        let mut caught = bird(1, Vec2::new(30.0, 30.0), Vec2::new(1.0, 1.0));
        caught.capture(0);
        state.birds.push(caught);

        for tick in 1..20 {
            state.time_ticks = tick;
            state.integrate();
            assert_eq!(state.birds.len(), 1);
            assert_eq!(state.birds[0].pos, Vec2::new(30.0, 30.0));
        }
        state.time_ticks = 20;
        state.integrate();
        assert!(state.birds.is_empty());
    }

    #[test]
    fn test_bounds() {
        assert!(within_exit_bounds(Vec2::new(-10.0, 110.0)));
        assert!(!within_exit_bounds(Vec2::new(-10.1, 50.0)));
        assert!(within_despawn_bounds(Vec2::new(-49.0, 149.0)));
        assert!(!within_despawn_bounds(Vec2::splat(PARKED_POS)));
    }
}
