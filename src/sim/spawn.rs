//! Entity spawner
//!
//! New birds appear just outside one of the four field edges and always drift
//! inward, so a fresh bird never leaves the field on its first ticks.

use glam::Vec2;
use rand::Rng;

use super::events::SimEvent;
use super::state::{Bird, GamePhase, Sanctuary};
use crate::consts::*;

/// Field edge a bird enters from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnEdge {
    Top,
    Right,
    Bottom,
    Left,
}

impl SpawnEdge {
    pub const ALL: [SpawnEdge; 4] = [
        SpawnEdge::Top,
        SpawnEdge::Right,
        SpawnEdge::Bottom,
        SpawnEdge::Left,
    ];

    /// Unit vector pointing from this edge into the field
    pub fn inward(&self) -> Vec2 {
        match self {
            SpawnEdge::Top => Vec2::Y,
            SpawnEdge::Right => Vec2::NEG_X,
            SpawnEdge::Bottom => Vec2::NEG_Y,
            SpawnEdge::Left => Vec2::X,
        }
    }

    /// Edge a position sits outside of, if any
    pub fn of_position(pos: Vec2) -> Option<SpawnEdge> {
        if pos.y < 0.0 {
            Some(SpawnEdge::Top)
        } else if pos.x > FIELD_SIZE {
            Some(SpawnEdge::Right)
        } else if pos.y > FIELD_SIZE {
            Some(SpawnEdge::Bottom)
        } else if pos.x < 0.0 {
            Some(SpawnEdge::Left)
        } else {
            None
        }
    }
}

/// Build a bird entering from a uniformly chosen edge
pub fn spawn_bird<R: Rng + ?Sized>(rng: &mut R, id: u32) -> Bird {
    let edge = SpawnEdge::ALL[rng.random_range(0..SpawnEdge::ALL.len())];
    spawn_bird_from(rng, id, edge)
}

/// Build a bird entering from `edge`
pub fn spawn_bird_from<R: Rng + ?Sized>(rng: &mut R, id: u32, edge: SpawnEdge) -> Bird {
    let along = rng.random_range(0.0..FIELD_SIZE);
    let inward_speed = rng.random_range(INWARD_SPEED_MIN..INWARD_SPEED_MAX);
    let drift = rng.random_range(-DRIFT_MAX..DRIFT_MAX);

    let (pos, vel) = match edge {
        SpawnEdge::Top => (
            Vec2::new(along, -SPAWN_OFFSET),
            Vec2::new(drift, inward_speed),
        ),
        SpawnEdge::Right => (
            Vec2::new(FIELD_SIZE + SPAWN_OFFSET, along),
            Vec2::new(-inward_speed, drift),
        ),
        SpawnEdge::Bottom => (
            Vec2::new(along, FIELD_SIZE + SPAWN_OFFSET),
            Vec2::new(drift, -inward_speed),
        ),
        SpawnEdge::Left => (
            Vec2::new(-SPAWN_OFFSET, along),
            Vec2::new(inward_speed, drift),
        ),
    };

    Bird {
        id,
        pos,
        vel,
        size: rng.random_range(BIRD_SIZE_MIN..BIRD_SIZE_MAX),
        glyph: BIRD_GLYPHS[rng.random_range(0..BIRD_GLYPHS.len())],
        captured: false,
        captured_at: None,
    }
}

impl Sanctuary {
    /// Add one bird if the round is playing and the set is under the cap.
    /// Captured birds still lingering count toward the cap.
    pub fn spawn(&mut self) -> Option<u32> {
        if self.phase != GamePhase::Playing {
            return None;
        }
        if self.birds.len() >= self.config.population_cap as usize {
            return None;
        }
        let id = self.next_entity_id();
        let bird = spawn_bird(&mut self.rng, id);
        log::debug!("Spawned bird {} at ({:.1}, {:.1})", id, bird.pos.x, bird.pos.y);
        self.birds.push(bird);
        self.events.push(SimEvent::Spawned { id });
        Some(id)
    }

    /// Seed the opening batch of a round
    pub(crate) fn spawn_initial_batch(&mut self) {
        for _ in 0..self.config.initial_batch {
            self.spawn();
        }
    }
}
