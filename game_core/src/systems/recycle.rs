use hecs::{Entity, World};

use crate::{Config, Events, Obstacle, ObstacleSpawner, OffScreen, Pooled, Session, Time, Transform};

/// Return obstacles that are done: contacted ones after the hit release
/// delay, and ones left behind the player after the off-screen grace.
/// Returns how many obstacles went back to their pools.
pub fn recycle_obstacles(
    world: &mut World,
    time: &Time,
    player_z: Option<f32>,
    config: &Config,
    spawner: &mut ObstacleSpawner,
    session: &mut Session,
    events: &mut Events,
) -> usize {
    let settings = &config.obstacles;
    let mut finished: Vec<(Entity, bool)> = Vec::new();

    for (entity, (obstacle, transform, off_screen, pooled)) in
        world.query_mut::<(&mut Obstacle, &Transform, &mut OffScreen, &Pooled)>()
    {
        if !pooled.active {
            continue;
        }

        if let Some(struck_for) = obstacle.struck_for.as_mut() {
            *struck_for += time.dt;
            if *struck_for >= settings.hit_release_delay {
                finished.push((entity, false));
                continue;
            }
        }

        // Without a player nothing can fall behind
        let Some(player_z) = player_z else {
            continue;
        };

        if !off_screen.is_off && transform.pos.z < player_z - settings.despawn_distance {
            off_screen.is_off = true;
            off_screen.timer = 0.0;
        }
        if off_screen.is_off {
            off_screen.timer += time.dt;
            if off_screen.timer >= settings.off_screen_grace {
                finished.push((entity, !obstacle.passed));
            }
        }
    }

    // Deterministic release order
    finished.sort_by_key(|(entity, _)| entity.id());

    for &(entity, avoided) in &finished {
        if avoided {
            session.record_avoided();
        }
        spawner.return_obstacle_to_pool(world, entity);
        events.recycled += 1;
    }

    if !finished.is_empty() {
        log::debug!("recycled {} obstacles", finished.len());
    }
    finished.len()
}
