use glam::Vec3;
use hecs::{Entity, World};

use crate::{Category, Collider, Obstacle, ObstacleTemplate, OffScreen, Prefab, Transform};

/// Instantiates obstacles of one category for a pool
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObstaclePrefab {
    pub category: Category,
    pub template: ObstacleTemplate,
}

impl ObstaclePrefab {
    pub fn new(category: Category, template: ObstacleTemplate) -> Self {
        Self { category, template }
    }
}

impl Prefab for ObstaclePrefab {
    fn instantiate(&self, world: &mut World) -> Entity {
        world.spawn((
            Obstacle::new(self.category, self.template.score_amount),
            Transform::default(),
            Collider::new(self.template.collider_radius),
            OffScreen::default(),
        ))
    }
}

/// Restore the per-run flags of a recycled obstacle. Returns false if `entity` is not an obstacle.
pub fn reset_obstacle(world: &mut World, entity: Entity) -> bool {
    match world.query_one_mut::<(&mut Obstacle, &mut Collider, &mut OffScreen)>(entity) {
        Ok((obstacle, collider, off_screen)) => {
            obstacle.passed = false;
            obstacle.struck_for = None;
            collider.enabled = true;
            off_screen.clear();
            true
        }
        Err(_) => false,
    }
}

/// Place a freshly acquired obstacle and give it its speed
pub fn setup_obstacle(world: &mut World, entity: Entity, position: Vec3, speed: f32) {
    reset_obstacle(world, entity);
    if let Ok((obstacle, transform)) = world.query_one_mut::<(&mut Obstacle, &mut Transform)>(entity)
    {
        transform.pos = position;
        transform.scale = Vec3::ONE;
        obstacle.speed = speed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wave_prefab() -> ObstaclePrefab {
        ObstaclePrefab::new(
            Category::Wave,
            ObstacleTemplate {
                score_amount: 10,
                collider_radius: 1.0,
            },
        )
    }

    #[test]
    fn test_prefab_spawns_full_bundle() {
        let mut world = World::new();
        let entity = wave_prefab().instantiate(&mut world);

        let obstacle = *world.get::<&Obstacle>(entity).expect("obstacle component");
        assert_eq!(obstacle.category, Category::Wave);
        assert_eq!(obstacle.score_amount, 10);
        assert!(world.get::<&Collider>(entity).expect("collider").enabled);
        assert!(world.get::<&Transform>(entity).is_ok());
        assert!(world.get::<&OffScreen>(entity).is_ok());
    }

    #[test]
    fn test_reset_clears_contact_state() {
        let mut world = World::new();
        let entity = wave_prefab().instantiate(&mut world);
        {
            let (obstacle, collider, off_screen) = world
                .query_one_mut::<(&mut Obstacle, &mut Collider, &mut OffScreen)>(entity)
                .expect("obstacle bundle");
            obstacle.passed = true;
            obstacle.struck_for = Some(0.1);
            collider.enabled = false;
            off_screen.is_off = true;
            off_screen.timer = 2.0;
        }

        assert!(reset_obstacle(&mut world, entity));

        let obstacle = *world.get::<&Obstacle>(entity).expect("obstacle");
        assert!(!obstacle.passed);
        assert!(obstacle.struck_for.is_none());
        assert!(world.get::<&Collider>(entity).expect("collider").enabled);
        assert_eq!(
            *world.get::<&OffScreen>(entity).expect("off-screen"),
            OffScreen::default()
        );
    }

    #[test]
    fn test_reset_rejects_non_obstacle() {
        let mut world = World::new();
        let entity = world.spawn((Transform::default(),));
        assert!(!reset_obstacle(&mut world, entity));
    }

    #[test]
    fn test_setup_places_and_restores_scale() {
        let mut world = World::new();
        let entity = wave_prefab().instantiate(&mut world);
        world
            .get::<&mut Transform>(entity)
            .expect("transform")
            .scale = Vec3::splat(0.2);

        setup_obstacle(&mut world, entity, Vec3::new(2.0, 1.0, 45.0), 12.5);

        let transform = *world.get::<&Transform>(entity).expect("transform");
        assert_eq!(transform.pos, Vec3::new(2.0, 1.0, 45.0));
        assert_eq!(transform.scale, Vec3::ONE);
        assert_eq!(world.get::<&Obstacle>(entity).expect("obstacle").speed, 12.5);
    }
}
