//! Pooled entity store
//!
//! Every category gets a fixed number of entities at startup. `acquire` hands
//! out the least recently released one; the pool never grows, so running dry
//! is logged and reported as `None`.

use std::collections::VecDeque;

use super::state::{Category, Entity, EntityId};
use crate::settings::PoolCapacities;

/// Fixed-capacity recycling store of entities, one FIFO per category
#[derive(Debug, Clone)]
pub struct EntityPool {
    /// Arena; `EntityId` indexes into it
    entities: Vec<Entity>,
    /// Inactive handles per category, oldest release first
    free: [VecDeque<EntityId>; Category::COUNT],
    capacity: [usize; Category::COUNT],
}

impl EntityPool {
    /// Pre-allocate every category to its configured capacity
    pub fn new(capacities: &PoolCapacities) -> Self {
        let total: usize = Category::ALL.iter().map(|&c| capacities.get(c)).sum();
        let mut entities = Vec::with_capacity(total);
        let mut free: [VecDeque<EntityId>; Category::COUNT] = Default::default();
        let mut capacity = [0; Category::COUNT];

        for category in Category::ALL {
            let size = capacities.get(category);
            capacity[category.index()] = size;
            let queue = &mut free[category.index()];
            queue.reserve_exact(size);
            for _ in 0..size {
                let id = EntityId(entities.len() as u32);
                entities.push(Entity::new(id, category));
                queue.push_back(id);
            }
            log::debug!("Pool '{}' filled with {} entities", category.as_str(), size);
        }

        Self {
            entities,
            free,
            capacity,
        }
    }

    /// Activate the least recently released entity of `category`
    pub fn acquire(&mut self, category: Category) -> Option<EntityId> {
        let Some(id) = self.free[category.index()].pop_front() else {
            log::error!(
                "Pool '{}' exhausted ({} active), cannot spawn",
                category.as_str(),
                self.capacity[category.index()]
            );
            return None;
        };

        let entity = &mut self.entities[id.index()];
        debug_assert_eq!(entity.category, category, "entity queued in the wrong pool");
        debug_assert!(!entity.active, "queued entity was still active");
        entity.active = true;
        entity.generation = entity.generation.wrapping_add(1);
        entity.reset_motion();
        Some(id)
    }

    /// Deactivate and requeue at the tail. Returns false if it was not active.
    pub fn release(&mut self, id: EntityId) -> bool {
        let Some(entity) = self.entities.get_mut(id.index()) else {
            log::error!("Release of unknown entity {:?}", id);
            return false;
        };
        if !entity.active {
            log::warn!("Release of inactive {} {:?} ignored", entity.category.as_str(), id);
            return false;
        }
        entity.active = false;
        entity.vel = glam::Vec2::ZERO;
        self.free[entity.category.index()].push_back(id);
        true
    }

    /// Deactivate everything (level reset). Returns how many were released.
    pub fn release_all(&mut self) -> usize {
        let active: Vec<EntityId> = self.active_ids();
        for &id in &active {
            self.release(id);
        }
        active.len()
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(id.index())
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(id.index())
    }

    pub fn is_active(&self, id: EntityId) -> bool {
        self.get(id).is_some_and(|e| e.active)
    }

    pub fn capacity(&self, category: Category) -> usize {
        self.capacity[category.index()]
    }

    /// Live entities of `category`
    pub fn active_count(&self, category: Category) -> usize {
        self.capacity[category.index()] - self.free[category.index()].len()
    }

    /// Handles waiting for reuse
    pub fn available(&self, category: Category) -> usize {
        self.free[category.index()].len()
    }

    /// Active handles in id order (stable iteration)
    pub fn active_ids(&self) -> Vec<EntityId> {
        self.iter_active().map(|e| e.id).collect()
    }

    pub fn iter_active(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter().filter(|e| e.active)
    }

    pub fn iter_active_mut(&mut self) -> impl Iterator<Item = &mut Entity> {
        self.entities.iter_mut().filter(|e| e.active)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_pool() -> EntityPool {
        EntityPool::new(&PoolCapacities {
            player: 1,
            bullet: 3,
            asteroid_large: 2,
            asteroid_medium: 2,
            asteroid_small: 2,
        })
    }

    #[test]
    fn test_prefilled_inactive() {
        let pool = small_pool();
        for category in Category::ALL {
            assert_eq!(pool.active_count(category), 0);
            assert_eq!(pool.available(category), pool.capacity(category));
        }
        assert_eq!(pool.iter_active().count(), 0);
    }

    #[test]
    fn test_acquire_until_exhausted() {
        let mut pool = small_pool();
        let a = pool.acquire(Category::Bullet).unwrap();
        let b = pool.acquire(Category::Bullet).unwrap();
        let c = pool.acquire(Category::Bullet).unwrap();
        assert_ne!(a, b);
        assert_ne!(b, c);
        assert_eq!(pool.active_count(Category::Bullet), 3);
        assert!(pool.acquire(Category::Bullet).is_none());
        // Other categories are unaffected
        assert!(pool.acquire(Category::AsteroidLarge).is_some());
    }

    #[test]
    fn test_release_is_fifo() {
        let mut pool = small_pool();
        let ids: Vec<_> = (0..3).map(|_| pool.acquire(Category::Bullet).unwrap()).collect();
        pool.release(ids[1]);
        pool.release(ids[0]);
        assert_eq!(pool.acquire(Category::Bullet), Some(ids[1]));
        assert_eq!(pool.acquire(Category::Bullet), Some(ids[0]));
    }

    #[test]
    fn test_released_not_reused_while_alternatives_exist() {
        let mut pool = small_pool();
        let first = pool.acquire(Category::Bullet).unwrap();
        pool.release(first);
        // Two never-used bullets are queued ahead of it
        let next = pool.acquire(Category::Bullet).unwrap();
        assert_ne!(next, first);
    }

    #[test]
    fn test_double_release_ignored() {
        let mut pool = small_pool();
        let id = pool.acquire(Category::AsteroidSmall).unwrap();
        assert!(pool.release(id));
        assert!(!pool.release(id));
        assert_eq!(pool.available(Category::AsteroidSmall), 2);
    }

    #[test]
    fn test_generation_bumps_on_acquire() {
        let mut pool = small_pool();
        let id = pool.acquire(Category::Player).unwrap();
        let gen1 = pool.get(id).unwrap().generation;
        pool.release(id);
        assert_eq!(pool.acquire(Category::Player), Some(id));
        assert_eq!(pool.get(id).unwrap().generation, gen1 + 1);
    }

    #[test]
    fn test_release_all() {
        let mut pool = small_pool();
        pool.acquire(Category::Bullet);
        pool.acquire(Category::AsteroidLarge);
        assert_eq!(pool.release_all(), 2);
        assert_eq!(pool.iter_active().count(), 0);
        assert_eq!(pool.available(Category::Bullet), 3);
    }
}
