/// Game tuning parameters for the duality runner
#[derive(Debug, Clone, Copy)]
pub struct Params;

impl Params {
    // Spawner
    pub const SPAWN_Z_OFFSETS: [f32; 4] = [30.0, 40.0, 50.0, 60.0]; // Ahead of the player
    pub const SPAWN_INTERVAL_INITIAL: f32 = 3.0; // seconds
    pub const SPAWN_INTERVAL_MIN: f32 = 1.0; // Hardest difficulty
    pub const SPAWN_INTERVAL_DECAY: f32 = 0.98; // Multiplied in after every spawn
    pub const SPAWN_X_RANGE: f32 = 4.0; // Lateral half-width
    pub const SPAWN_Y: f32 = 1.0;
    pub const OPPOSITE_SPAWN_PROBABILITY: f32 = 0.5;
    pub const OBSTACLE_SPEED_MIN: f32 = 10.0;
    pub const OBSTACLE_SPEED_MAX: f32 = 20.0;

    // Pools
    pub const POOL_INITIAL_SIZE: usize = 5;
    pub const POOL_MAX_CAPACITY: usize = 20;

    // Obstacle lifecycle
    pub const DESPAWN_DISTANCE: f32 = 10.0; // Behind the player
    pub const OFF_SCREEN_GRACE: f32 = 3.0; // Lets trailing effects finish
    pub const HIT_RELEASE_DELAY: f32 = 0.2;
    pub const WAVE_SCORE: u32 = 10;
    pub const PARTICLE_SCORE: u32 = 15;
    pub const OBSTACLE_RADIUS: f32 = 1.0;

    // Player
    pub const PLAYER_RADIUS: f32 = 0.5;
    pub const PLAYER_Y: f32 = 1.0;
    pub const LATERAL_SPEED: f32 = 10.0;
    pub const FORWARD_SPEED_INITIAL: f32 = 10.0;
    pub const FORWARD_ACCELERATION: f32 = 0.5; // units per second, per second
    pub const FORWARD_SPEED_MAX: f32 = 200.0;
    pub const X_MIN: f32 = -5.0;
    pub const X_MAX: f32 = 5.0;
    pub const LATERAL_SMOOTHING: f32 = 7.0;

    // Session
    pub const LIVES_INITIAL: i32 = 3;
    pub const LIVES_MAX: i32 = 5;
    pub const GAME_OVER_FADE: f32 = 1.0;

    // Simulation
    pub const FIXED_DT: f32 = 1.0 / 60.0;
    pub const MAX_DT: f32 = 0.1; // Clamp to prevent large jumps
}
