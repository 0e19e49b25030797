//! Bounded recycler for interchangeable entities.
//!
//! A pool hands out entity handles from its idle set, lazily instantiating new
//! ones through its [`Prefab`] until `max_capacity` instances exist. Released
//! handles are deactivated and parked for reuse instead of being despawned.

use std::collections::VecDeque;

use hecs::{Entity, World};

/// Identifies the pool that owns an entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PoolId(pub u32);

/// Ownership and activation state stamped on every pooled entity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pooled {
    pub pool: PoolId,
    pub active: bool,
}

/// Builds fresh instances for a pool
pub trait Prefab {
    fn instantiate(&self, world: &mut World) -> Entity;
}

impl<F> Prefab for F
where
    F: Fn(&mut World) -> Entity,
{
    fn instantiate(&self, world: &mut World) -> Entity {
        self(world)
    }
}

/// What happened to a handle passed to [`ObjectPool::release`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Release {
    /// Deactivated and parked in the idle set
    Pooled,
    /// Unknown to the pool, so it was despawned instead
    Destroyed,
}

pub struct ObjectPool<P> {
    id: PoolId,
    prefab: P,
    idle: VecDeque<Entity>,
    active: Vec<Entity>,
    max_capacity: usize,
    torn_down: bool,
}

impl<P: Prefab> ObjectPool<P> {
    /// Create a pool and pre-instantiate `initial_size` inactive instances
    pub fn new(
        world: &mut World,
        id: PoolId,
        prefab: P,
        initial_size: usize,
        max_capacity: usize,
    ) -> Self {
        if initial_size > max_capacity {
            log::warn!(
                "pool {:?}: initial size {} exceeds capacity {}, clamping",
                id,
                initial_size,
                max_capacity
            );
        }

        let mut pool = Self {
            id,
            prefab,
            idle: VecDeque::with_capacity(max_capacity),
            active: Vec::with_capacity(max_capacity),
            max_capacity,
            torn_down: false,
        };

        for _ in 0..initial_size.min(max_capacity) {
            let entity = pool.instantiate(world);
            pool.idle.push_back(entity);
        }

        pool
    }

    fn instantiate(&self, world: &mut World) -> Entity {
        let entity = self.prefab.instantiate(world);
        set_pooled(world, entity, self.id, false);
        entity
    }

    /// Hand out an active instance, or `None` when the pool is exhausted.
    pub fn acquire(&mut self, world: &mut World) -> Option<Entity> {
        if self.torn_down {
            log::warn!("pool {:?}: acquire after teardown", self.id);
            return None;
        }

        while let Some(entity) = self.idle.pop_front() {
            // Something outside the pool despawned it; forget the handle
            if !world.contains(entity) {
                log::warn!("pool {:?}: dropping stale idle handle {:?}", self.id, entity);
                continue;
            }
            set_pooled(world, entity, self.id, true);
            self.active.push(entity);
            return Some(entity);
        }

        // Active handles despawned elsewhere would hold capacity forever
        let id = self.id;
        self.active.retain(|&e| {
            let alive = world.contains(e);
            if !alive {
                log::warn!("pool {:?}: dropping stale active handle {:?}", id, e);
            }
            alive
        });

        if self.len() < self.max_capacity {
            let entity = self.instantiate(world);
            set_pooled(world, entity, self.id, true);
            self.active.push(entity);
            return Some(entity);
        }

        log::warn!(
            "pool {:?}: max capacity {} reached, no instance available",
            self.id,
            self.max_capacity
        );
        None
    }

    /// Return an instance for reuse. Handles this pool did not issue are despawned.
    pub fn release(&mut self, world: &mut World, entity: Entity) -> Release {
        if let Some(index) = self.active.iter().position(|&e| e == entity) {
            self.active.swap_remove(index);
            set_pooled(world, entity, self.id, false);
            self.idle.push_back(entity);
            return Release::Pooled;
        }

        log::warn!(
            "pool {:?}: release of untracked entity {:?}, destroying it",
            self.id,
            entity
        );
        self.idle.retain(|&e| e != entity);
        let _ = world.despawn(entity);
        Release::Destroyed
    }

    /// Deactivate every active instance
    pub fn release_all(&mut self, world: &mut World) {
        for entity in std::mem::take(&mut self.active) {
            set_pooled(world, entity, self.id, false);
            self.idle.push_back(entity);
        }
    }

    /// Despawn every instance. The pool hands out nothing afterwards.
    pub fn teardown(&mut self, world: &mut World) {
        for entity in self.idle.drain(..).chain(self.active.drain(..)) {
            let _ = world.despawn(entity);
        }
        self.torn_down = true;
    }
}

impl<P> ObjectPool<P> {
    pub fn id(&self) -> PoolId {
        self.id
    }

    pub fn prefab(&self) -> &P {
        &self.prefab
    }

    pub fn max_capacity(&self) -> usize {
        self.max_capacity
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    pub fn idle_count(&self) -> usize {
        self.idle.len()
    }

    /// Instances currently owned, active or idle
    pub fn len(&self) -> usize {
        self.active.len() + self.idle.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_active(&self, entity: Entity) -> bool {
        self.active.contains(&entity)
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    pub fn active(&self) -> &[Entity] {
        &self.active
    }
}

fn set_pooled(world: &mut World, entity: Entity, pool: PoolId, active: bool) {
    if let Ok(mut pooled) = world.get::<&mut Pooled>(entity) {
        pooled.pool = pool;
        pooled.active = active;
        return;
    }
    let _ = world.insert_one(entity, Pooled { pool, active });
}
