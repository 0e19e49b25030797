use crate::{Config, Obstacle, Player, PlayerIntent, Pooled, Time, Transform};
use hecs::World;

/// Accelerate the player, move it forward and ease it toward its lateral target
pub fn move_player(world: &mut World, time: &Time, config: &Config) {
    let settings = &config.player;
    for (_entity, (player, intent, transform)) in
        world.query_mut::<(&mut Player, &PlayerIntent, &mut Transform)>()
    {
        transform.pos.z += player.forward_speed * time.dt;

        player.target_x = config.clamp_player_x(
            player.target_x + f32::from(intent.lateral) * settings.lateral_speed * time.dt,
        );
        let blend = (settings.lateral_smoothing * time.dt).min(1.0);
        transform.pos.x += (player.target_x - transform.pos.x) * blend;

        player.forward_speed = (player.forward_speed + settings.forward_acceleration * time.dt)
            .clamp(settings.initial_forward_speed, settings.max_forward_speed);
    }
}

/// Move active obstacles toward -Z at their own speed
pub fn move_obstacles(world: &mut World, time: &Time) {
    for (_entity, (obstacle, transform, pooled)) in
        world.query_mut::<(&Obstacle, &mut Transform, &Pooled)>()
    {
        if pooled.active {
            transform.pos.z -= obstacle.speed * time.dt;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{create_player, setup_obstacle, Category, ObstaclePrefab, Prefab};
    use approx::assert_relative_eq;
    use glam::Vec3;

    fn setup_world() -> (World, Config, Time) {
        (World::new(), Config::new(), Time::new(0.1, 0.0))
    }

    #[test]
    fn test_player_moves_forward_and_accelerates() {
        let (mut world, config, time) = setup_world();
        let player = create_player(&mut world, &config);

        move_player(&mut world, &time, &config);

        let z = world.get::<&Transform>(player).expect("transform").pos.z;
        assert_relative_eq!(z, config.player.initial_forward_speed * 0.1);
        let speed = world.get::<&Player>(player).expect("player").forward_speed;
        assert_relative_eq!(
            speed,
            config.player.initial_forward_speed + config.player.forward_acceleration * 0.1
        );
    }

    #[test]
    fn test_forward_speed_capped() {
        let (mut world, config, time) = setup_world();
        let player = create_player(&mut world, &config);
        world.get::<&mut Player>(player).expect("player").forward_speed =
            config.player.max_forward_speed;

        move_player(&mut world, &time, &config);

        assert_eq!(
            world.get::<&Player>(player).expect("player").forward_speed,
            config.player.max_forward_speed
        );
    }

    #[test]
    fn test_lateral_target_clamped_to_track() {
        let (mut world, config, time) = setup_world();
        let player = create_player(&mut world, &config);
        world.get::<&mut PlayerIntent>(player).expect("intent").lateral = 1;

        for _ in 0..100 {
            move_player(&mut world, &time, &config);
        }

        let target = world.get::<&Player>(player).expect("player").target_x;
        let x = world.get::<&Transform>(player).expect("transform").pos.x;
        assert_eq!(target, config.player.x_max);
        assert!(x <= config.player.x_max);
        assert!(x > 0.0, "Sphere eased right");
    }

    #[test]
    fn test_only_active_obstacles_move() {
        let (mut world, config, time) = setup_world();
        let template = config.obstacles.wave.expect("default template");
        let prefab = ObstaclePrefab::new(Category::Wave, template);

        let moving = prefab.instantiate(&mut world);
        world
            .insert_one(
                moving,
                Pooled {
                    pool: crate::WAVE_POOL,
                    active: true,
                },
            )
            .expect("entity exists");
        setup_obstacle(&mut world, moving, Vec3::new(0.0, 1.0, 50.0), 10.0);

        let parked = prefab.instantiate(&mut world);
        world
            .insert_one(
                parked,
                Pooled {
                    pool: crate::WAVE_POOL,
                    active: false,
                },
            )
            .expect("entity exists");
        setup_obstacle(&mut world, parked, Vec3::new(0.0, 1.0, 50.0), 10.0);

        move_obstacles(&mut world, &time);

        assert_relative_eq!(
            world.get::<&Transform>(moving).expect("transform").pos.z,
            49.0
        );
        assert_eq!(
            world.get::<&Transform>(parked).expect("transform").pos.z,
            50.0
        );
    }
}
