use hecs::{Entity, World};

use game_core::{Collider, Obstacle, Pooled, Transform};

/// Obstacles whose trigger sphere overlaps the player's, in entity order.
/// Disabled colliders and parked obstacles never touch.
pub fn detect(world: &World, player: Entity) -> Vec<Entity> {
    // Collect player data without holding borrows
    let player_data = {
        let transform = world.get::<&Transform>(player).ok();
        let collider = world.get::<&Collider>(player).ok();
        match (transform, collider) {
            (Some(transform), Some(collider)) if collider.enabled => {
                Some((transform.pos, collider.radius * transform.scale.max_element()))
            }
            _ => None,
        }
    };
    let Some((player_pos, player_radius)) = player_data else {
        return Vec::new();
    };

    let mut touching: Vec<Entity> = world
        .query::<(&Obstacle, &Transform, &Collider, &Pooled)>()
        .iter()
        .filter(|(_e, (_obstacle, _transform, collider, pooled))| pooled.active && collider.enabled)
        .filter(|(_e, (_obstacle, transform, collider, _pooled))| {
            let reach = player_radius + collider.radius * transform.scale.max_element();
            transform.pos.distance_squared(player_pos) < reach * reach
        })
        .map(|(entity, _)| entity)
        .collect();

    touching.sort_by_key(|entity| entity.id());
    touching
}
