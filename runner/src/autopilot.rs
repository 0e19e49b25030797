use hecs::Entity;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use game_core::{
    is_safe, Category, Collider, Obstacle, PlayerInput, Pooled, Simulation, Transform,
};

/// Scripted stand-in for the input device: steers at the next obstacle and
/// switches into the mode that passes it, unless it decides to slip up.
pub struct Autopilot {
    mistake_rate: f64,
    rng: StdRng,
    target: Option<Entity>,
    ignoring: bool,
}

/// Nearest live obstacle that has not reached the player yet
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Target {
    pub entity: Entity,
    pub category: Category,
    pub x: f32,
    pub distance: f32,
}

pub fn nearest_ahead(sim: &Simulation) -> Option<Target> {
    let (_player, player_transform) = sim.player_state()?;
    let player_pos = player_transform.pos;

    let nearest = sim
        .world()
        .query::<(&Obstacle, &Transform, &Collider, &Pooled)>()
        .iter()
        .filter(|(_e, (obstacle, _t, collider, pooled))| {
            pooled.active && collider.enabled && !obstacle.passed
        })
        .map(move |(entity, (obstacle, transform, _c, _p))| Target {
            entity,
            category: obstacle.category,
            x: transform.pos.x,
            distance: transform.pos.z - player_pos.z,
        })
        .filter(|target| target.distance >= -1.0)
        .min_by(|a, b| {
            a.distance
                .total_cmp(&b.distance)
                .then(a.entity.id().cmp(&b.entity.id()))
        });
    nearest
}

impl Autopilot {
    pub fn new(mistake_rate: f32, seed: u64) -> Self {
        Self {
            mistake_rate: f64::from(mistake_rate.clamp(0.0, 1.0)),
            rng: StdRng::seed_from_u64(seed),
            target: None,
            ignoring: false,
        }
    }

    /// Input for this frame, if the pilot wants to do anything
    pub fn decide(&mut self, sim: &Simulation) -> Option<PlayerInput> {
        let (player, transform) = sim.player_state()?;
        let Some(target) = nearest_ahead(sim) else {
            self.target = None;
            return None;
        };

        if self.target != Some(target.entity) {
            self.target = Some(target.entity);
            self.ignoring = self.rng.gen_bool(self.mistake_rate);
            if self.ignoring {
                log::debug!("autopilot ignoring {:?} obstacle", target.category);
            }
        }

        let dx = target.x - transform.pos.x;
        let lateral = if dx.abs() < 0.25 { 0 } else { dx.signum() as i8 };
        let switch_mode = !self.ignoring && !is_safe(target.category, player.mode);

        if lateral == 0 && !switch_mode {
            return None;
        }
        Some(PlayerInput {
            lateral,
            switch_mode,
        })
    }
}
