pub mod components;
pub mod config;
pub mod error;
pub mod obstacle;
pub mod params;
pub mod pool;
pub mod resources;
pub mod scene;
pub mod session;
pub mod simulation;
pub mod spawner;
pub mod systems;

pub use components::*;
pub use config::*;
pub use error::*;
pub use obstacle::*;
pub use params::*;
pub use pool::*;
pub use resources::*;
pub use scene::*;
pub use session::*;
pub use simulation::*;
pub use spawner::*;
pub use systems::{
    ingest_inputs, move_obstacles, move_player, recycle_obstacles, resolve_contact,
    ContactOutcome,
};

use glam::Vec3;
use hecs::World;

/// Helper to create the player sphere at the start of the track
pub fn create_player(world: &mut World, config: &Config) -> hecs::Entity {
    world.spawn((
        Player::new(config.player.initial_forward_speed),
        PlayerIntent::new(),
        Transform::new(Vec3::new(0.0, Params::PLAYER_Y, 0.0)),
        Collider::new(config.player.radius),
    ))
}
