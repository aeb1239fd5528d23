//! Contact detection and collision reaction rules
//!
//! Contacts for a tick are gathered first and then each side reacts on its
//! own. Two projectiles landing on one asteroid in the same tick therefore
//! both deal damage, even past zero health.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::{Category, EntityId, GameEvent, GameState};
use crate::consts::SCORE_PER_KILL;
use crate::settings::MotionTable;
use crate::ui::UiHost;

/// Two overlapping entities and where they touch
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    pub a: EntityId,
    pub b: EntityId,
    pub point: Vec2,
}

/// What an entity does about touching something of category `other`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reaction {
    /// Nothing happens
    Ignore,
    /// Back to the pool, no score
    Deactivate,
    /// Lost health but still flying
    Damaged { health: i32 },
    /// Destroyed by a projectile: score, pool, and maybe a split
    Destroyed { fragment: Option<Category> },
    /// Already past zero from an earlier hit this tick
    Overkill { health: i32 },
    /// The player's ship was hit
    LoseLife,
}

/// Category pairs that produce contacts at all
pub fn collides(a: Category, b: Category) -> bool {
    use Category::*;
    match (a, b) {
        (Bullet | Player, x) | (x, Bullet | Player) => x.is_asteroid(),
        _ => false,
    }
}

/// Reaction rule for an entity of `category` at `health` touching `other`
pub fn react(category: Category, health: i32, other: Category) -> Reaction {
    match category {
        Category::Bullet => Reaction::Deactivate,
        Category::Player if other == Category::Bullet => Reaction::Ignore,
        Category::Player => Reaction::LoseLife,
        asteroid if other == Category::Bullet => {
            let health = health - 1;
            match health {
                0 => Reaction::Destroyed {
                    fragment: asteroid.fragment(),
                },
                h if h > 0 => Reaction::Damaged { health: h },
                h => Reaction::Overkill { health: h },
            }
        }
        _ => Reaction::Deactivate,
    }
}

/// Circle-overlap contacts among active entities, in id order
pub fn detect_contacts(state: &GameState) -> Vec<Contact> {
    detect_in(state.pool.iter_active().map(|e| (e.id, e.category, e.pos)), &state.settings.motion)
}

fn detect_in(
    entities: impl Iterator<Item = (EntityId, Category, Vec2)>,
    motion: &MotionTable,
) -> Vec<Contact> {
    let live: Vec<_> = entities.collect();
    let mut contacts = Vec::new();

    for (i, &(a, cat_a, pos_a)) in live.iter().enumerate() {
        for &(b, cat_b, pos_b) in &live[i + 1..] {
            if !collides(cat_a, cat_b) {
                continue;
            }
            let ra = motion.get(cat_a).radius;
            let rb = motion.get(cat_b).radius;
            let delta = pos_b - pos_a;
            if delta.length_squared() <= (ra + rb) * (ra + rb) {
                // On the segment between centers, split by radius
                let point = pos_a + delta * (ra / (ra + rb).max(f32::EPSILON));
                contacts.push(Contact { a, b, point });
            }
        }
    }
    contacts
}

impl GameState {
    /// Apply contact reactions for both sides of every contact.
    ///
    /// Generations are read once up front. A side whose handle was recycled
    /// by an earlier contact in the batch (released, then re-acquired as a
    /// split fragment) no longer refers to the entity that was touched and is
    /// skipped.
    pub fn apply_contacts(&mut self, contacts: &[Contact], ui: &mut dyn UiHost) {
        let delivered: Vec<_> = contacts
            .iter()
            .map(|c| (self.generation_of(c.a), self.generation_of(c.b)))
            .collect();

        for (contact, (gen_a, gen_b)) in contacts.iter().zip(delivered) {
            let (Some(cat_a), Some(cat_b)) = (
                self.pool.get(contact.a).map(|e| e.category),
                self.pool.get(contact.b).map(|e| e.category),
            ) else {
                log::warn!("Contact with unknown entity {:?}", contact);
                continue;
            };
            if self.generation_of(contact.a) == gen_a {
                self.apply_reaction(contact.a, cat_b, contact.point, ui);
            } else {
                log::trace!("Skipped recycled {:?} in {:?}", contact.a, contact);
            }
            if self.generation_of(contact.b) == gen_b {
                self.apply_reaction(contact.b, cat_a, contact.point, ui);
            } else {
                log::trace!("Skipped recycled {:?} in {:?}", contact.b, contact);
            }
        }
    }

    fn generation_of(&self, id: EntityId) -> Option<u32> {
        self.pool.get(id).map(|e| e.generation)
    }

    fn apply_reaction(&mut self, id: EntityId, other: Category, point: Vec2, ui: &mut dyn UiHost) {
        let Some(entity) = self.pool.get(id) else {
            return;
        };
        let (category, active, pos, orientation) =
            (entity.category, entity.active, entity.pos, entity.orientation);

        match react(category, entity.health, other) {
            Reaction::Ignore => {}
            Reaction::Deactivate => {
                if active {
                    self.pool.release(id);
                }
            }
            Reaction::Damaged { health } | Reaction::Overkill { health } => {
                if let Some(e) = self.pool.get_mut(id) {
                    e.health = health;
                }
                if active {
                    self.events.push(GameEvent::AsteroidDamaged { id, health });
                }
            }
            Reaction::Destroyed { fragment } => {
                if let Some(e) = self.pool.get_mut(id) {
                    e.health = 0;
                }
                if !active {
                    return;
                }
                self.pool.release(id);
                self.add_score(SCORE_PER_KILL);
                self.events.push(GameEvent::AsteroidDestroyed { category, pos });
                if let Some(fragment) = fragment {
                    self.spawn_fragments(fragment, pos, orientation, point);
                }
            }
            Reaction::LoseLife => {
                if active && self.player == Some(id) {
                    self.lose_life(ui);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::ui::HeadlessUi;

    #[test]
    fn test_collision_layers() {
        use Category::*;
        assert!(collides(Bullet, AsteroidLarge));
        assert!(collides(AsteroidSmall, Player));
        assert!(!collides(Bullet, Player));
        assert!(!collides(AsteroidLarge, AsteroidMedium));
        assert!(!collides(Bullet, Bullet));
    }

    #[test]
    fn test_reaction_rules() {
        use Category::*;
        assert_eq!(react(Bullet, 1, AsteroidLarge), Reaction::Deactivate);
        assert_eq!(react(Player, 1, AsteroidSmall), Reaction::LoseLife);
        assert_eq!(react(AsteroidLarge, 2, Bullet), Reaction::Damaged { health: 1 });
        assert_eq!(
            react(AsteroidLarge, 1, Bullet),
            Reaction::Destroyed { fragment: Some(AsteroidMedium) }
        );
        assert_eq!(
            react(AsteroidMedium, 1, Bullet),
            Reaction::Destroyed { fragment: Some(AsteroidSmall) }
        );
        assert_eq!(react(AsteroidSmall, 1, Bullet), Reaction::Destroyed { fragment: None });
        assert_eq!(react(AsteroidSmall, 0, Bullet), Reaction::Overkill { health: -1 });
        assert_eq!(react(AsteroidLarge, 2, Player), Reaction::Deactivate);
    }

    #[test]
    fn test_detect_overlap_only_for_colliding_pairs() {
        let mut state = GameState::new(Settings::default());
        let rock = state.spawn_large_asteroid(Vec2::ZERO).unwrap();
        let bullet = state.spawn_bullet(Vec2::new(3.0, 0.0), 0.0).unwrap();
        state.spawn_bullet(Vec2::new(30.0, 0.0), 0.0).unwrap();
        state.spawn_large_asteroid(Vec2::new(1.0, 0.0)).unwrap();

        let contacts = detect_contacts(&state);
        assert_eq!(contacts.len(), 2);
        assert!(
            contacts
                .iter()
                .any(|c| (c.a, c.b) == (rock, bullet) || (c.a, c.b) == (bullet, rock))
        );
        // Contact point sits between the two centers
        let c = contacts[0];
        assert!(c.point.x > 0.0 && c.point.x < 3.0);
    }

    #[test]
    fn test_large_hit_twice_splits_once() {
        let mut ui = HeadlessUi::new(3);
        let mut state = GameState::new(Settings::default());
        let rock = state.spawn_large_asteroid(Vec2::new(5.0, 5.0)).unwrap();
        let b1 = state.spawn_bullet(Vec2::new(5.0, 7.0), 0.0).unwrap();
        let b2 = state.spawn_bullet(Vec2::new(5.0, 3.0), 0.0).unwrap();

        let first = [Contact { a: rock, b: b1, point: Vec2::new(5.0, 6.0) }];
        state.apply_contacts(&first, &mut ui);
        assert!(state.pool.is_active(rock));
        assert_eq!(state.score, 0);
        assert!(!state.pool.is_active(b1));

        let second = [Contact { a: rock, b: b2, point: Vec2::new(5.0, 4.0) }];
        state.apply_contacts(&second, &mut ui);
        assert!(!state.pool.is_active(rock));
        assert_eq!(state.score, SCORE_PER_KILL);
        assert_eq!(state.asteroids_of(Category::AsteroidMedium), 2);
    }

    #[test]
    fn test_simultaneous_hits_over_decrement() {
        let mut ui = HeadlessUi::new(3);
        let mut state = GameState::new(Settings::default());
        let rock = state.spawn_large_asteroid(Vec2::ZERO).unwrap();
        let bullets: Vec<_> = (0..3)
            .map(|_| state.spawn_bullet(Vec2::ZERO, 0.0).unwrap())
            .collect();
        let contacts: Vec<_> = bullets
            .iter()
            .map(|&b| Contact { a: rock, b, point: Vec2::new(0.0, 1.0) })
            .collect();

        state.apply_contacts(&contacts, &mut ui);
        assert_eq!(state.pool.get(rock).unwrap().health, -1);
        assert_eq!(state.score, SCORE_PER_KILL);
        assert_eq!(state.asteroids_of(Category::AsteroidMedium), 2);
    }

    #[test]
    fn test_recycled_handle_in_same_batch_is_not_hit() {
        use crate::sim::spawn::spawn;

        let mut ui = HeadlessUi::new(3);
        let mut settings = Settings::default();
        settings.pools.asteroid_small = 2;
        let mut state = GameState::new(settings);

        let small = spawn(&mut state.pool, Category::AsteroidSmall, Vec2::new(5.0, 5.0), 0.0).unwrap();
        let medium = spawn(&mut state.pool, Category::AsteroidMedium, Vec2::new(-5.0, 5.0), 0.0).unwrap();
        let b1 = state.spawn_bullet(Vec2::new(5.0, 5.0), 0.0).unwrap();
        let b2 = state.spawn_bullet(Vec2::new(-5.0, 5.0), 0.0).unwrap();
        let small_generation = state.pool.get(small).unwrap().generation;

        // The medium's split re-acquires the small's handle before the last
        // contact is applied
        let contacts = [
            Contact { a: b1, b: small, point: Vec2::new(5.0, 5.0) },
            Contact { a: b2, b: medium, point: Vec2::new(-5.0, 5.0) },
            Contact { a: b2, b: small, point: Vec2::new(5.0, 5.0) },
        ];
        state.apply_contacts(&contacts, &mut ui);

        assert_eq!(state.score, 2 * SCORE_PER_KILL);
        assert_eq!(state.asteroids_of(Category::AsteroidSmall), 2);
        let fragment = state.pool.get(small).unwrap();
        assert!(fragment.active);
        assert_eq!(fragment.generation, small_generation + 1);
        assert_eq!(fragment.health, 1);
    }

    #[test]
    fn test_asteroid_hitting_player_scores_nothing() {
        let mut ui = HeadlessUi::new(3);
        let mut state = GameState::new(Settings::default());
        let player = state.spawn_player().unwrap();
        let rock = state.spawn_large_asteroid(Vec2::ZERO).unwrap();

        state.apply_contacts(&[Contact { a: player, b: rock, point: Vec2::ZERO }], &mut ui);
        assert!(!state.pool.is_active(rock));
        assert!(!state.player_active());
        assert_eq!(state.lives, 2);
        assert_eq!(state.score, 0);
        assert_eq!(state.asteroids_of(Category::AsteroidMedium), 0);
    }
}
