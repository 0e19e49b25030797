use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{Category, ConfigError, Params};

/// Spawn timing, placement and type-mix settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnerConfig {
    pub z_offsets: Vec<f32>,
    pub initial_interval: f32,
    pub min_interval: f32,
    pub interval_decay: f32,
    pub x_range: f32,
    pub spawn_y: f32,
    pub opposite_probability: f32,
    pub min_speed: f32,
    pub max_speed: f32,
}

impl Default for SpawnerConfig {
    fn default() -> Self {
        Self {
            z_offsets: Params::SPAWN_Z_OFFSETS.to_vec(),
            initial_interval: Params::SPAWN_INTERVAL_INITIAL,
            min_interval: Params::SPAWN_INTERVAL_MIN,
            interval_decay: Params::SPAWN_INTERVAL_DECAY,
            x_range: Params::SPAWN_X_RANGE,
            spawn_y: Params::SPAWN_Y,
            opposite_probability: Params::OPPOSITE_SPAWN_PROBABILITY,
            min_speed: Params::OBSTACLE_SPEED_MIN,
            max_speed: Params::OBSTACLE_SPEED_MAX,
        }
    }
}

/// Sizing shared by both obstacle pools
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    pub initial_size: usize,
    pub max_capacity: usize,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            initial_size: Params::POOL_INITIAL_SIZE,
            max_capacity: Params::POOL_MAX_CAPACITY,
        }
    }
}

/// Per-category obstacle template. A missing template means that category is never spawned.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObstacleTemplate {
    pub score_amount: u32,
    #[serde(default = "default_obstacle_radius")]
    pub collider_radius: f32,
}

fn default_obstacle_radius() -> f32 {
    Params::OBSTACLE_RADIUS
}

/// Obstacle templates and lifecycle timings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObstacleConfig {
    pub wave: Option<ObstacleTemplate>,
    pub particle: Option<ObstacleTemplate>,
    pub despawn_distance: f32,
    pub off_screen_grace: f32,
    pub hit_release_delay: f32,
}

impl Default for ObstacleConfig {
    fn default() -> Self {
        Self {
            wave: Some(ObstacleTemplate {
                score_amount: Params::WAVE_SCORE,
                collider_radius: Params::OBSTACLE_RADIUS,
            }),
            particle: Some(ObstacleTemplate {
                score_amount: Params::PARTICLE_SCORE,
                collider_radius: Params::OBSTACLE_RADIUS,
            }),
            despawn_distance: Params::DESPAWN_DISTANCE,
            off_screen_grace: Params::OFF_SCREEN_GRACE,
            hit_release_delay: Params::HIT_RELEASE_DELAY,
        }
    }
}

impl ObstacleConfig {
    pub fn template(&self, category: Category) -> Option<&ObstacleTemplate> {
        match category {
            Category::Wave => self.wave.as_ref(),
            Category::Particle => self.particle.as_ref(),
        }
    }
}

/// Player motion settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub radius: f32,
    pub lateral_speed: f32,
    pub initial_forward_speed: f32,
    pub forward_acceleration: f32,
    pub max_forward_speed: f32,
    pub x_min: f32,
    pub x_max: f32,
    pub lateral_smoothing: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            radius: Params::PLAYER_RADIUS,
            lateral_speed: Params::LATERAL_SPEED,
            initial_forward_speed: Params::FORWARD_SPEED_INITIAL,
            forward_acceleration: Params::FORWARD_ACCELERATION,
            max_forward_speed: Params::FORWARD_SPEED_MAX,
            x_min: Params::X_MIN,
            x_max: Params::X_MAX,
            lateral_smoothing: Params::LATERAL_SMOOTHING,
        }
    }
}

/// Lives, fade timing and simulation step sizes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub initial_lives: i32,
    pub max_lives: i32,
    pub game_over_fade: f32,
    pub fixed_dt: f32,
    pub max_dt: f32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            initial_lives: Params::LIVES_INITIAL,
            max_lives: Params::LIVES_MAX,
            game_over_fade: Params::GAME_OVER_FADE,
            fixed_dt: Params::FIXED_DT,
            max_dt: Params::MAX_DT,
        }
    }
}

/// Game configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub spawner: SpawnerConfig,
    pub pool: PoolConfig,
    pub obstacles: ObstacleConfig,
    pub player: PlayerConfig,
    pub session: SessionConfig,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and validate a TOML document. Missing keys fall back to [`Params`].
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let s = &self.spawner;
        if s.z_offsets.is_empty() {
            return Err(ConfigError::invalid("spawner.z_offsets", "must not be empty"));
        }
        if s.min_interval.is_nan() || s.min_interval <= 0.0 {
            return Err(ConfigError::invalid(
                "spawner.min_interval",
                "must be positive",
            ));
        }
        if s.initial_interval.is_nan() || s.initial_interval < s.min_interval {
            return Err(ConfigError::invalid(
                "spawner.initial_interval",
                format!("{} is below min_interval {}", s.initial_interval, s.min_interval),
            ));
        }
        if !(s.interval_decay > 0.0 && s.interval_decay <= 1.0) {
            return Err(ConfigError::invalid(
                "spawner.interval_decay",
                "must be in (0, 1]",
            ));
        }
        if !(0.0..=1.0).contains(&s.opposite_probability) {
            return Err(ConfigError::invalid(
                "spawner.opposite_probability",
                "must be in [0, 1]",
            ));
        }
        if !s.x_range.is_finite() || s.x_range < 0.0 {
            return Err(ConfigError::invalid(
                "spawner.x_range",
                "must be finite and not negative",
            ));
        }
        if !s.min_speed.is_finite() || !s.max_speed.is_finite() {
            return Err(ConfigError::invalid("spawner.min_speed", "speeds must be finite"));
        }
        if s.min_speed > s.max_speed {
            return Err(ConfigError::invalid(
                "spawner.min_speed",
                format!("{} exceeds max_speed {}", s.min_speed, s.max_speed),
            ));
        }

        if self.pool.max_capacity == 0 {
            return Err(ConfigError::invalid("pool.max_capacity", "must be positive"));
        }
        if self.pool.initial_size > self.pool.max_capacity {
            return Err(ConfigError::invalid(
                "pool.initial_size",
                "must not exceed max_capacity",
            ));
        }

        let p = &self.player;
        if p.x_min.is_nan() || p.x_max.is_nan() || p.x_min > p.x_max {
            return Err(ConfigError::invalid("player.x_min", "must not exceed x_max"));
        }
        if p.initial_forward_speed.is_nan()
            || p.max_forward_speed.is_nan()
            || p.initial_forward_speed > p.max_forward_speed {
            return Err(ConfigError::invalid(
                "player.initial_forward_speed",
                "must not exceed max_forward_speed",
            ));
        }

        let session = &self.session;
        if session.initial_lives > session.max_lives {
            return Err(ConfigError::invalid(
                "session.initial_lives",
                "must not exceed max_lives",
            ));
        }
        if session.fixed_dt.is_nan() || session.fixed_dt <= 0.0 {
            return Err(ConfigError::invalid("session.fixed_dt", "must be positive"));
        }
        if session.max_dt.is_nan() || session.max_dt <= 0.0 {
            return Err(ConfigError::invalid("session.max_dt", "must be positive"));
        }
        if session.game_over_fade.is_nan() || session.game_over_fade < 0.0 {
            return Err(ConfigError::invalid(
                "session.game_over_fade",
                "must not be negative",
            ));
        }

        Ok(())
    }

    /// Clamp a lateral position to the player's track
    pub fn clamp_player_x(&self, x: f32) -> f32 {
        x.clamp(self.player.x_min, self.player.x_max)
    }
}
