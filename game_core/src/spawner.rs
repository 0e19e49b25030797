//! Obstacle spawner: decides when, where and which obstacle category to
//! spawn, owns one pool per category, and ramps difficulty by shrinking the
//! spawn interval toward a floor after every spawn.

use glam::Vec3;
use hecs::{Entity, World};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::{
    setup_obstacle, Category, Config, Events, GameRng, ObjectPool, Obstacle, ObstaclePrefab,
    OffScreen, PoolId, Release, SpawnerConfig,
};

pub const WAVE_POOL: PoolId = PoolId(0);
pub const PARTICLE_POOL: PoolId = PoolId(1);

/// Mutable spawn bookkeeping
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnState {
    pub interval_current: f32, // Never below the configured floor
    pub timer: f32,            // Seconds since the last spawn
    pub last_category: Option<Category>,
    pub is_active: bool,
}

/// Pick the next category. The first pick is a coin flip; afterwards the
/// previous category flips with probability `opposite_probability`.
pub fn choose_category(
    last: Option<Category>,
    opposite_probability: f32,
    rng: &mut GameRng,
) -> Category {
    match last {
        None => {
            if rng.0.gen_bool(0.5) {
                Category::Wave
            } else {
                Category::Particle
            }
        }
        Some(last) => {
            let p = f64::from(opposite_probability.clamp(0.0, 1.0));
            if rng.0.gen_bool(p) {
                last.opposite()
            } else {
                last
            }
        }
    }
}

pub struct ObstacleSpawner {
    settings: SpawnerConfig,
    wave_pool: Option<ObjectPool<ObstaclePrefab>>,
    particle_pool: Option<ObjectPool<ObstaclePrefab>>,
    state: SpawnState,
}

impl ObstacleSpawner {
    pub fn new(world: &mut World, config: &Config) -> Self {
        let mut build_pool = |category: Category, id: PoolId| {
            let Some(template) = config.obstacles.template(category) else {
                log::error!("no {category:?} obstacle template configured, that category will not spawn");
                return None;
            };
            Some(ObjectPool::new(
                world,
                id,
                ObstaclePrefab::new(category, *template),
                config.pool.initial_size,
                config.pool.max_capacity,
            ))
        };

        let wave_pool = build_pool(Category::Wave, WAVE_POOL);
        let particle_pool = build_pool(Category::Particle, PARTICLE_POOL);

        let settings = config.spawner.clone();
        let state = SpawnState {
            interval_current: settings.initial_interval.max(settings.min_interval),
            // First obstacle appears on the first tick
            timer: settings.initial_interval,
            last_category: None,
            is_active: true,
        };

        Self {
            settings,
            wave_pool,
            particle_pool,
            state,
        }
    }

    /// Advance the spawn timer. Returns the obstacle spawned this tick, if any.
    pub fn tick(
        &mut self,
        world: &mut World,
        dt: f32,
        player_pos: Option<Vec3>,
        rng: &mut GameRng,
        events: &mut Events,
    ) -> Option<Entity> {
        if !self.state.is_active {
            return None;
        }
        let Some(player_pos) = player_pos else {
            log::error!("spawner has no player to spawn relative to, disabling spawning");
            self.state.is_active = false;
            return None;
        };

        self.state.timer += dt;
        if self.state.timer < self.state.interval_current {
            return None;
        }

        self.state.timer = 0.0;
        let spawned = self.spawn_obstacle(world, player_pos.z, rng);
        self.adjust_spawn_interval();

        if spawned.is_some() {
            events.spawned += 1;
        }
        spawned
    }

    /// Spawn one obstacle ahead of `player_z`. `None` if the chosen pool is missing or exhausted.
    pub fn spawn_obstacle(
        &mut self,
        world: &mut World,
        player_z: f32,
        rng: &mut GameRng,
    ) -> Option<Entity> {
        let position = self.spawn_position(player_z, rng);
        let category = self.next_category(rng);

        let Some(pool) = self.pool_mut(category) else {
            log::warn!("skipping {category:?} spawn: no pool for that category");
            return None;
        };
        let entity = pool.acquire(world)?;

        let speed = rng
            .0
            .gen_range(self.settings.min_speed..=self.settings.max_speed);
        setup_obstacle(world, entity, position, speed);

        log::debug!(
            "spawned {:?} obstacle {:?} at z={:.1} speed={:.1}",
            category,
            entity,
            position.z,
            speed
        );
        Some(entity)
    }

    pub fn spawn_position(&self, player_z: f32, rng: &mut GameRng) -> Vec3 {
        let offset = self
            .settings
            .z_offsets
            .choose(&mut rng.0)
            .copied()
            .unwrap_or_default();
        let range = self.settings.x_range;
        let x = rng.0.gen_range(-range..=range);
        Vec3::new(x, self.settings.spawn_y, player_z + offset)
    }

    /// Choose and remember the next category
    pub fn next_category(&mut self, rng: &mut GameRng) -> Category {
        let category = choose_category(
            self.state.last_category,
            self.settings.opposite_probability,
            rng,
        );
        self.state.last_category = Some(category);
        category
    }

    /// Difficulty ramp applied after every spawn
    pub fn adjust_spawn_interval(&mut self) {
        self.state.interval_current = (self.state.interval_current
            * self.settings.interval_decay)
            .max(self.settings.min_interval);
    }

    pub fn set_spawn_interval(&mut self, interval: f32) {
        self.state.interval_current = interval.max(self.settings.min_interval);
    }

    pub fn set_spawning_active(&mut self, active: bool) {
        self.state.is_active = active;
    }

    /// Restore the initial interval and forget the last category
    pub fn reset_spawner(&mut self) {
        self.state.interval_current = self
            .settings
            .initial_interval
            .max(self.settings.min_interval);
        self.state.timer = 0.0;
        self.state.last_category = None;
    }

    /// Route an obstacle back to the pool of its category. Untagged entities are despawned.
    pub fn return_obstacle_to_pool(&mut self, world: &mut World, entity: Entity) -> Release {
        if let Ok(mut off_screen) = world.get::<&mut OffScreen>(entity) {
            off_screen.clear();
        }

        let category = world.get::<&Obstacle>(entity).map(|o| o.category).ok();
        let Some(category) = category else {
            log::warn!("entity {entity:?} has no obstacle category, destroying it");
            let _ = world.despawn(entity);
            return Release::Destroyed;
        };

        match self.pool_mut(category) {
            Some(pool) => pool.release(world, entity),
            None => {
                log::warn!("no {category:?} pool to return {entity:?} to, destroying it");
                let _ = world.despawn(entity);
                Release::Destroyed
            }
        }
    }

    /// Deactivate every live obstacle in both pools
    pub fn release_all(&mut self, world: &mut World) {
        for pool in self.pools_mut() {
            pool.release_all(world);
        }
    }

    /// Despawn every pooled obstacle, e.g. on scene change
    pub fn teardown(&mut self, world: &mut World) {
        for pool in self.pools_mut() {
            pool.teardown(world);
        }
    }

    pub fn is_torn_down(&self) -> bool {
        [&self.wave_pool, &self.particle_pool]
            .into_iter()
            .flatten()
            .any(|pool| pool.is_torn_down())
    }

    pub fn state(&self) -> &SpawnState {
        &self.state
    }

    pub fn settings(&self) -> &SpawnerConfig {
        &self.settings
    }

    pub fn pool(&self, category: Category) -> Option<&ObjectPool<ObstaclePrefab>> {
        match category {
            Category::Wave => self.wave_pool.as_ref(),
            Category::Particle => self.particle_pool.as_ref(),
        }
    }

    fn pool_mut(&mut self, category: Category) -> Option<&mut ObjectPool<ObstaclePrefab>> {
        match category {
            Category::Wave => self.wave_pool.as_mut(),
            Category::Particle => self.particle_pool.as_mut(),
        }
    }

    fn pools_mut(&mut self) -> impl Iterator<Item = &mut ObjectPool<ObstaclePrefab>> {
        self.wave_pool
            .as_mut()
            .into_iter()
            .chain(self.particle_pool.as_mut())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{create_player, resolve_contact, Collider, Pooled, Session, Transform};

    fn setup_spawner(config: &Config) -> (World, ObstacleSpawner, GameRng, Events) {
        let mut world = World::new();
        let spawner = ObstacleSpawner::new(&mut world, config);
        (world, spawner, GameRng::new(2024), Events::new())
    }

    fn flip_rate(opposite_probability: f32, spawns: usize) -> (f32, Vec<Category>) {
        let mut rng = GameRng::new(31);
        let mut last = None;
        let mut picks = Vec::with_capacity(spawns);
        for _ in 0..spawns {
            let next = choose_category(last, opposite_probability, &mut rng);
            picks.push(next);
            last = Some(next);
        }
        let flips = picks.windows(2).filter(|w| w[0] != w[1]).count();
        (flips as f32 / (spawns - 1) as f32, picks)
    }

    #[test]
    fn test_strict_alternation_when_probability_is_one() {
        let (rate, picks) = flip_rate(1.0, 2000);
        assert_eq!(rate, 1.0);
        assert!(picks.windows(2).all(|w| w[0] != w[1]));
    }

    #[test]
    fn test_category_never_changes_when_probability_is_zero() {
        let (rate, picks) = flip_rate(0.0, 2000);
        assert_eq!(rate, 0.0);
        assert!(picks.iter().all(|&c| c == picks[0]));
    }

    #[test]
    fn test_half_probability_flips_about_half_the_time() {
        let (rate, _) = flip_rate(0.5, 5000);
        assert!(
            (rate - 0.5).abs() < 0.05,
            "Flip rate {rate} should be close to 0.5"
        );
    }

    #[test]
    fn test_first_pick_uses_both_categories() {
        let mut rng = GameRng::new(5);
        let firsts: Vec<_> = (0..200)
            .map(|_| choose_category(None, 0.0, &mut rng))
            .collect();
        assert!(firsts.contains(&Category::Wave));
        assert!(firsts.contains(&Category::Particle));
    }

    #[test]
    fn test_interval_decays_to_floor() {
        let mut config = Config::new();
        config.spawner.initial_interval = 3.0;
        config.spawner.min_interval = 1.0;
        config.spawner.interval_decay = 0.98;
        let (_world, mut spawner, _rng, _events) = setup_spawner(&config);

        let mut previous = spawner.state().interval_current;
        for _ in 0..50 {
            spawner.adjust_spawn_interval();
            let current = spawner.state().interval_current;
            assert!(current <= previous, "Interval must not grow");
            assert!(current >= 1.0, "Interval must not drop below the floor");
            previous = current;
        }
        assert!(previous < 3.0);

        for _ in 0..50 {
            spawner.adjust_spawn_interval();
        }
        assert_eq!(spawner.state().interval_current, 1.0, "Clamped at the floor");
    }

    #[test]
    fn test_set_spawn_interval_clamps_to_floor() {
        let config = Config::new();
        let (_world, mut spawner, _rng, _events) = setup_spawner(&config);
        spawner.set_spawn_interval(0.1);
        assert_eq!(spawner.state().interval_current, config.spawner.min_interval);
        spawner.set_spawn_interval(4.0);
        assert_eq!(spawner.state().interval_current, 4.0);
    }

    #[test]
    fn test_first_tick_spawns_immediately() {
        let config = Config::new();
        let (mut world, mut spawner, mut rng, mut events) = setup_spawner(&config);

        let spawned = spawner.tick(&mut world, 0.016, Some(Vec3::ZERO), &mut rng, &mut events);

        assert!(spawned.is_some(), "Timer starts primed");
        assert_eq!(events.spawned, 1);
        assert_eq!(spawner.state().timer, 0.0);
        assert!(spawner.state().interval_current < config.spawner.initial_interval);
    }

    #[test]
    fn test_tick_waits_for_interval() {
        let config = Config::new();
        let (mut world, mut spawner, mut rng, mut events) = setup_spawner(&config);
        spawner.reset_spawner();

        let player = Some(Vec3::ZERO);
        assert!(spawner.tick(&mut world, 1.0, player, &mut rng, &mut events).is_none());
        assert!(spawner.tick(&mut world, 1.0, player, &mut rng, &mut events).is_none());
        assert!(spawner.tick(&mut world, 1.0, player, &mut rng, &mut events).is_some());
        assert_eq!(events.spawned, 1);
    }

    #[test]
    fn test_inactive_spawner_does_nothing() {
        let config = Config::new();
        let (mut world, mut spawner, mut rng, mut events) = setup_spawner(&config);
        spawner.set_spawning_active(false);

        for _ in 0..10 {
            spawner.tick(&mut world, 5.0, Some(Vec3::ZERO), &mut rng, &mut events);
        }
        assert_eq!(events.spawned, 0);
    }

    #[test]
    fn test_missing_player_disables_spawning() {
        let config = Config::new();
        let (mut world, mut spawner, mut rng, mut events) = setup_spawner(&config);

        assert!(spawner.tick(&mut world, 5.0, None, &mut rng, &mut events).is_none());
        assert!(!spawner.state().is_active);
    }

    #[test]
    fn test_spawned_obstacle_is_configured() {
        let config = Config::new();
        let (mut world, mut spawner, mut rng, _events) = setup_spawner(&config);

        let player_z = 100.0;
        for _ in 0..20 {
            let Some(entity) = spawner.spawn_obstacle(&mut world, player_z, &mut rng) else {
                continue;
            };
            let transform = *world.get::<&Transform>(entity).expect("transform");
            let obstacle = *world.get::<&Obstacle>(entity).expect("obstacle");
            let pooled = *world.get::<&Pooled>(entity).expect("pooled");

            let offset = transform.pos.z - player_z;
            assert!(config.spawner.z_offsets.contains(&offset), "offset {offset}");
            assert!(transform.pos.x.abs() <= config.spawner.x_range);
            assert_eq!(transform.pos.y, config.spawner.spawn_y);
            assert_eq!(transform.scale, Vec3::ONE);
            assert!(obstacle.speed >= config.spawner.min_speed);
            assert!(obstacle.speed <= config.spawner.max_speed);
            assert!(pooled.active);
            assert_eq!(Some(obstacle.category), spawner.state().last_category);
        }
    }

    #[test]
    fn test_return_routes_to_matching_pool() {
        let mut config = Config::new();
        config.spawner.opposite_probability = 1.0;
        let (mut world, mut spawner, mut rng, _events) = setup_spawner(&config);

        let first = spawner
            .spawn_obstacle(&mut world, 0.0, &mut rng)
            .expect("spawned");
        let category = world.get::<&Obstacle>(first).expect("obstacle").category;
        let other = category.opposite();

        let idle_before = spawner.pool(category).expect("pool").idle_count();
        let other_idle_before = spawner.pool(other).expect("pool").idle_count();

        assert_eq!(spawner.return_obstacle_to_pool(&mut world, first), Release::Pooled);
        assert_eq!(
            spawner.pool(category).expect("pool").idle_count(),
            idle_before + 1
        );
        assert_eq!(
            spawner.pool(other).expect("pool").idle_count(),
            other_idle_before,
            "Other pool untouched"
        );
    }

    #[test]
    fn test_return_of_untagged_entity_destroys_it() {
        let config = Config::new();
        let (mut world, mut spawner, _rng, _events) = setup_spawner(&config);
        let stray = world.spawn((Transform::default(),));

        assert_eq!(
            spawner.return_obstacle_to_pool(&mut world, stray),
            Release::Destroyed
        );
        assert!(!world.contains(stray));
    }

    #[test]
    fn test_missing_template_skips_that_category() {
        let mut config = Config::new();
        config.obstacles.particle = None;
        config.spawner.opposite_probability = 0.0;
        let (mut world, mut spawner, mut rng, _events) = setup_spawner(&config);

        assert!(spawner.pool(Category::Particle).is_none());
        for _ in 0..10 {
            if let Some(entity) = spawner.spawn_obstacle(&mut world, 0.0, &mut rng) {
                let category = world.get::<&Obstacle>(entity).expect("obstacle").category;
                assert_eq!(category, Category::Wave);
            }
        }
    }

    #[test]
    fn test_exhausted_pool_skips_spawn() {
        let mut config = Config::new();
        config.pool.initial_size = 1;
        config.pool.max_capacity = 1;
        config.spawner.opposite_probability = 0.0;
        let (mut world, mut spawner, mut rng, _events) = setup_spawner(&config);

        assert!(spawner.spawn_obstacle(&mut world, 0.0, &mut rng).is_some());
        assert!(
            spawner.spawn_obstacle(&mut world, 0.0, &mut rng).is_none(),
            "Same category again, pool is full"
        );
    }

    #[test]
    fn test_struck_obstacle_comes_back_clean() {
        let mut config = Config::new();
        config.pool.initial_size = 1;
        config.pool.max_capacity = 1;
        config.spawner.opposite_probability = 0.0;
        let (mut world, mut spawner, mut rng, mut events) = setup_spawner(&config);
        let player = create_player(&mut world, &config);
        let mut session = Session::new(&config);

        let first = spawner
            .spawn_obstacle(&mut world, 0.0, &mut rng)
            .expect("spawned");
        let category = world.get::<&Obstacle>(first).expect("obstacle").category;
        assert!(resolve_contact(&mut world, player, first, &mut session, &mut events).is_some());
        assert!(!world.get::<&Collider>(first).expect("collider").enabled);

        assert_eq!(spawner.return_obstacle_to_pool(&mut world, first), Release::Pooled);
        let again = spawner
            .spawn_obstacle(&mut world, 0.0, &mut rng)
            .expect("respawned");

        assert_eq!(again, first, "Single-slot pool reuses the instance");
        let obstacle = *world.get::<&Obstacle>(again).expect("obstacle");
        assert_eq!(obstacle.category, category);
        assert!(!obstacle.passed);
        assert_eq!(obstacle.struck_for, None);
        assert!(world.get::<&Collider>(again).expect("collider").enabled);
    }

    #[test]
    fn test_reset_restores_initial_interval_and_memory() {
        let config = Config::new();
        let (mut world, mut spawner, mut rng, mut events) = setup_spawner(&config);
        for _ in 0..5 {
            spawner.tick(&mut world, 10.0, Some(Vec3::ZERO), &mut rng, &mut events);
        }
        assert!(spawner.state().last_category.is_some());

        spawner.reset_spawner();

        let state = spawner.state();
        assert_eq!(state.interval_current, config.spawner.initial_interval);
        assert_eq!(state.timer, 0.0);
        assert!(state.last_category.is_none());
    }

    #[test]
    fn test_teardown_empties_both_pools() {
        let config = Config::new();
        let (mut world, mut spawner, mut rng, _events) = setup_spawner(&config);
        spawner.spawn_obstacle(&mut world, 0.0, &mut rng);

        spawner.teardown(&mut world);

        assert!(spawner.is_torn_down());
        assert_eq!(world.len(), 0);
    }
}
