//! Spawn dispatcher and per-category activation
//!
//! `spawn` only turns a category into a pool acquire plus a transform. The
//! `GameState::spawn_*` helpers add what each category needs when it comes
//! alive (health, drift, spin, bullet lifetime).

use glam::Vec2;
use rand::Rng;

use super::pool::EntityPool;
use super::progression::Task;
use super::state::{Category, EntityId, GameEvent, GameState};
use crate::consts::{LARGE_ASTEROID_HEALTH, SPLIT_INTENT_SCALE};
use crate::{polar_to_cartesian, reflect};

/// Re-rolls allowed when a random position lands on the player spawn point
const SPAWN_ATTEMPTS: usize = 16;

/// Acquire an entity of `category` and place it. `None` means the pool is
/// empty right now; callers skip the spawn.
pub fn spawn(
    pool: &mut EntityPool,
    category: Category,
    position: Vec2,
    orientation: f32,
) -> Option<EntityId> {
    let id = pool.acquire(category)?;
    if let Some(entity) = pool.get_mut(id) {
        entity.pos = position;
        entity.orientation = orientation;
    }
    Some(id)
}

/// Drift directions for the two fragments of an asteroid at `parent_pos`
/// hit at `contact`. The second mirrors the first across the parent's
/// position vector.
pub fn split_directions(parent_pos: Vec2, contact: Vec2) -> (Vec2, Vec2) {
    let first = -(contact - parent_pos).normalize_or_zero() * SPLIT_INTENT_SCALE;
    let second = reflect(-first, -parent_pos.normalize_or_zero());
    (first, second)
}

/// Uniform coordinate in `[-half, half)`; a degenerate extent collapses to 0
fn sample_axis(rng: &mut impl Rng, half: f32) -> f32 {
    if half.is_finite() && half > 0.0 {
        rng.random_range(-half..half)
    } else {
        0.0
    }
}

impl GameState {
    fn spawn_or_report(&mut self, category: Category, pos: Vec2, orientation: f32) -> Option<EntityId> {
        let spawned = spawn(&mut self.pool, category, pos, orientation);
        if spawned.is_none() {
            log::warn!("Skipped {} spawn at {:?}", category.as_str(), pos);
            self.events.push(GameEvent::SpawnSkipped { category });
        }
        spawned
    }

    /// Place the player at its spawn point with no momentum
    pub fn spawn_player(&mut self) -> Option<EntityId> {
        let pos = self.settings.player_spawn_position;
        let orientation = self.settings.player_spawn_orientation;
        let id = self.spawn_or_report(Category::Player, pos, orientation)?;
        self.player = Some(id);
        Some(id)
    }

    /// Large asteroid with random drift and spin
    pub fn spawn_large_asteroid(&mut self, pos: Vec2) -> Option<EntityId> {
        let theta = self.rng.random_range(0.0..std::f32::consts::TAU);
        let spin = self.rng.random_range(-2.0..2.0);
        let orientation = self.rng.random_range(-std::f32::consts::PI..std::f32::consts::PI);

        let id = self.spawn_or_report(Category::AsteroidLarge, pos, orientation)?;
        if let Some(e) = self.pool.get_mut(id) {
            let dir = polar_to_cartesian(1.0, theta);
            e.health = LARGE_ASTEROID_HEALTH;
            e.drift = dir;
            e.vel = dir;
            e.spin = spin;
        }
        Some(id)
    }

    /// Random point inside the viewport, kept clear of the player spawn
    /// point when the field is large enough to allow it
    pub fn random_field_position(&mut self) -> Vec2 {
        let half = self.settings.viewport_half_extent;
        let spawn = self.settings.player_spawn_position;
        let clearance = self.settings.spawn_clearance;

        let mut pos = Vec2::ZERO;
        for _ in 0..SPAWN_ATTEMPTS {
            pos = Vec2::new(
                sample_axis(&mut self.rng, half.x),
                sample_axis(&mut self.rng, half.y),
            );
            if pos.distance(spawn) >= clearance {
                break;
            }
        }
        pos
    }

    /// Two `fragment` asteroids at the parent's transform, flying apart
    pub fn spawn_fragments(
        &mut self,
        fragment: Category,
        parent_pos: Vec2,
        parent_orientation: f32,
        contact: Vec2,
    ) -> [Option<EntityId>; 2] {
        let (first, second) = split_directions(parent_pos, contact);
        let spin_range = if fragment == Category::AsteroidSmall { 7.5 } else { 2.0 };

        [first, second].map(|drift| {
            let spin = self.rng.random_range(-spin_range..spin_range);
            let id = self.spawn_or_report(fragment, parent_pos, parent_orientation)?;
            if let Some(e) = self.pool.get_mut(id) {
                e.drift = drift;
                e.vel = drift;
                e.spin = spin;
            }
            Some(id)
        })
    }

    /// Bullet heading along `orientation`, expiring after the configured lifetime
    pub fn spawn_bullet(&mut self, pos: Vec2, orientation: f32) -> Option<EntityId> {
        let id = self.spawn_or_report(Category::Bullet, pos, orientation)?;
        if let Some(token) = self.pool.get(id).map(|e| e.token()) {
            let wake = self.clock + self.settings.bullet_lifetime;
            self.scheduler.schedule(wake, token, Task::ExpireBullet(id));
        }
        self.events.push(GameEvent::ShotFired { id });
        Some(id)
    }
}
