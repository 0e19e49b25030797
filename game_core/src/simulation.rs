//! One endless run: the world, its resources and the fixed-step loop that
//! drives the player, the spawner and obstacle recycling.

use glam::Vec3;
use hecs::{Entity, World};

use crate::systems::*;
use crate::{
    create_player, Config, Cue, Events, GameRng, InputQueue, LightMode, ObstacleSpawner, Params,
    Player, PlayerInput, PlayerIntent, Scene, SceneTransition, Session, StatSink, Time, Transform,
};

/// Snapshot for the score/lives/mode text display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hud {
    pub score: u32,
    pub lives: i32,
    pub mode: LightMode,
}

impl std::fmt::Display for Hud {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Score: {} | Lives: {} | Mode: {}",
            self.score, self.lives, self.mode
        )
    }
}

pub struct Simulation {
    world: World,
    config: Config,
    time: Time,
    rng: GameRng,
    events: Events,
    input: InputQueue,
    session: Session,
    spawner: ObstacleSpawner,
    player: Entity,
    scene: Scene,
    transition: Option<SceneTransition>,
    sink: Box<dyn StatSink>,
}

impl Simulation {
    pub fn new(config: Config, seed: u64, sink: Box<dyn StatSink>) -> Self {
        let mut world = World::new();
        let player = create_player(&mut world, &config);
        let spawner = ObstacleSpawner::new(&mut world, &config);
        let session = Session::new(&config);

        log::info!("run started with seed {seed}");

        Self {
            world,
            config,
            time: Time::default(),
            rng: GameRng::new(seed),
            events: Events::new(),
            input: InputQueue::new(),
            session,
            spawner,
            player,
            scene: Scene::Game,
            transition: None,
            sink,
        }
    }

    /// Advance the run by `dt` seconds of wall time
    pub fn tick(&mut self, dt: f32) {
        // Clamp dt to prevent large jumps
        let clamped_dt = dt.clamp(0.0, self.config.session.max_dt);

        // Fixed micro-steps for stable movement
        let mut remaining_dt = clamped_dt;
        while remaining_dt > 0.0 {
            let step_dt = remaining_dt.min(self.config.session.fixed_dt);
            remaining_dt -= step_dt;

            let step_time = Time {
                dt: step_dt,
                now: self.time.now + (clamped_dt - remaining_dt),
            };
            self.step(&step_time);
        }

        self.time.dt = clamped_dt;
        self.time.now += clamped_dt;
    }

    fn step(&mut self, time: &Time) {
        if self.scene == Scene::Game {
            if !self.session.game_over {
                // 1. Apply queued input to the player
                ingest_inputs(
                    &mut self.world,
                    &mut self.input,
                    &mut self.session,
                    &mut self.events,
                );

                // 2. Run forward and steer
                move_player(&mut self.world, time, &self.config);

                // 3. Spawn ahead of the player
                let player_pos = self.player_position();
                self.spawner.tick(
                    &mut self.world,
                    time.dt,
                    player_pos,
                    &mut self.rng,
                    &mut self.events,
                );
            }

            // 4. Obstacles keep drifting through the game-over fade
            move_obstacles(&mut self.world, time);

            // 5. Return finished obstacles to their pools
            let player_z = self.player_position().map(|pos| pos.z);
            recycle_obstacles(
                &mut self.world,
                time,
                player_z,
                &self.config,
                &mut self.spawner,
                &mut self.session,
                &mut self.events,
            );

            // 6. Survival clock
            self.session.advance(time.dt);
        }

        // 7. Scene fade
        self.advance_transition(time.dt);
    }

    fn advance_transition(&mut self, dt: f32) {
        let Some(transition) = self.transition.as_mut() else {
            return;
        };
        transition.advance(dt);
        if transition.is_complete() {
            let target = transition.target;
            self.change_scene(target);
        }
    }

    /// Trigger contact reported by the physics collaborator, in either order.
    /// Pairs that are not player/obstacle are ignored.
    pub fn on_collision(&mut self, a: Entity, b: Entity) -> Option<ContactOutcome> {
        if self.scene != Scene::Game || self.session.game_over {
            return None;
        }

        let obstacle = if a == self.player {
            b
        } else if b == self.player {
            a
        } else {
            return None;
        };

        let outcome = resolve_contact(
            &mut self.world,
            self.player,
            obstacle,
            &mut self.session,
            &mut self.events,
        )?;

        if matches!(outcome, ContactOutcome::Hit { game_over: true }) {
            self.finish_run();
        }
        Some(outcome)
    }

    /// Stop spawning, persist the run and start fading to the game-over scene
    fn finish_run(&mut self) {
        if self.transition.is_some() {
            return;
        }

        self.spawner.set_spawning_active(false);
        self.events.push_cue(Cue::GameOver);

        let summary = self.session.summary();
        log::info!(
            "game over: survived {:.1}s, score {}, {} switches, {} avoided",
            summary.survival_time,
            summary.total_score,
            summary.mode_switches,
            summary.obstacles_avoided
        );
        if let Err(err) = self.sink.save(&summary) {
            log::error!("failed to save run statistics: {err}");
        }

        self.transition = Some(SceneTransition::new(
            Scene::GameOver,
            self.config.session.game_over_fade,
        ));
    }

    /// Switch scenes. Leaving the game scene despawns every pooled obstacle.
    pub fn change_scene(&mut self, scene: Scene) {
        log::info!("scene change: {:?} -> {:?}", self.scene, scene);
        self.scene = scene;
        self.transition = None;

        if scene != Scene::Game && !self.spawner.is_torn_down() {
            self.spawner.teardown(&mut self.world);
        }
    }

    /// Start a fresh run in the game scene
    pub fn restart(&mut self) {
        log::info!("restarting run");

        self.session.reset();
        self.input.clear();
        self.transition = None;

        if self.spawner.is_torn_down() {
            self.spawner = ObstacleSpawner::new(&mut self.world, &self.config);
        } else {
            self.spawner.release_all(&mut self.world);
            self.spawner.reset_spawner();
        }
        self.spawner.set_spawning_active(true);

        self.reset_player();
        self.scene = Scene::Game;
    }

    fn reset_player(&mut self) {
        let initial_speed = self.config.player.initial_forward_speed;
        let spawn_y = Params::PLAYER_Y;
        match self
            .world
            .query_one_mut::<(&mut Player, &mut PlayerIntent, &mut Transform)>(self.player)
        {
            Ok((player, intent, transform)) => {
                *player = Player::new(initial_speed);
                *intent = PlayerIntent::new();
                *transform = Transform::new(Vec3::new(0.0, spawn_y, 0.0));
            }
            Err(_) => {
                log::warn!("player entity missing on restart, creating a new one");
                self.player = create_player(&mut self.world, &self.config);
            }
        }
    }

    pub fn push_input(&mut self, input: PlayerInput) {
        self.input.push_input(input);
    }

    pub fn player(&self) -> Entity {
        self.player
    }

    pub fn player_state(&self) -> Option<(Player, Transform)> {
        let player = *self.world.get::<&Player>(self.player).ok()?;
        let transform = *self.world.get::<&Transform>(self.player).ok()?;
        Some((player, transform))
    }

    fn player_position(&self) -> Option<Vec3> {
        self.world
            .get::<&Transform>(self.player)
            .ok()
            .map(|transform| transform.pos)
    }

    pub fn hud(&self) -> Hud {
        let mode = self
            .world
            .get::<&Player>(self.player)
            .map(|player| player.mode)
            .unwrap_or_default();
        Hud {
            score: self.session.score,
            lives: self.session.lives,
            mode,
        }
    }

    /// Drain events raised since the last call
    pub fn take_events(&mut self) -> Events {
        std::mem::take(&mut self.events)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn time(&self) -> &Time {
        &self.time
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn spawner(&self) -> &ObstacleSpawner {
        &self.spawner
    }

    pub fn spawner_mut(&mut self) -> &mut ObstacleSpawner {
        &mut self.spawner
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn scene(&self) -> Scene {
        self.scene
    }

    pub fn transition(&self) -> Option<&SceneTransition> {
        self.transition.as_ref()
    }
}
