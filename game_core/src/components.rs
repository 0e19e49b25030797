use glam::Vec3;

/// Obstacle category: the player mode required to pass it safely
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Wave,
    Particle,
}

impl Category {
    pub fn opposite(self) -> Self {
        match self {
            Category::Wave => Category::Particle,
            Category::Particle => Category::Wave,
        }
    }
}

/// The player's current light mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LightMode {
    #[default]
    Wave,
    Particle,
}

impl LightMode {
    pub fn toggled(self) -> Self {
        match self {
            LightMode::Wave => LightMode::Particle,
            LightMode::Particle => LightMode::Wave,
        }
    }
}

impl std::fmt::Display for LightMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LightMode::Wave => f.write_str("Wave"),
            LightMode::Particle => f.write_str("Particle"),
        }
    }
}

/// Whether a player in `mode` passes an obstacle of `category` unharmed
pub fn is_safe(category: Category, mode: LightMode) -> bool {
    matches!(
        (category, mode),
        (Category::Wave, LightMode::Wave) | (Category::Particle, LightMode::Particle)
    )
}

/// World placement of an entity
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub pos: Vec3,
    pub scale: Vec3,
}

impl Transform {
    pub fn new(pos: Vec3) -> Self {
        Self {
            pos,
            scale: Vec3::ONE,
        }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::new(Vec3::ZERO)
    }
}

/// Trigger volume used for player contact
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Collider {
    pub radius: f32,
    pub enabled: bool,
}

impl Collider {
    pub fn new(radius: f32) -> Self {
        Self {
            radius,
            enabled: true,
        }
    }
}

/// Obstacle component - a pooled, color-coded hazard
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Obstacle {
    pub category: Category,
    pub speed: f32,        // Units per second toward -Z
    pub score_amount: u32, // Awarded when passed in the right mode
    pub passed: bool,      // Player already interacted with it
    pub struck_for: Option<f32>, // Seconds since contact, if contacted
}

impl Obstacle {
    pub fn new(category: Category, score_amount: u32) -> Self {
        Self {
            category,
            speed: 0.0,
            score_amount,
            passed: false,
            struck_for: None,
        }
    }
}

/// Tracks how long an obstacle has been out of the play area
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct OffScreen {
    pub is_off: bool,
    pub timer: f32,
}

impl OffScreen {
    pub fn clear(&mut self) {
        self.is_off = false;
        self.timer = 0.0;
    }
}

/// Player component - the runner sphere
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Player {
    pub mode: LightMode,
    pub forward_speed: f32,
    pub target_x: f32, // Lateral position the sphere eases toward
}

impl Player {
    pub fn new(forward_speed: f32) -> Self {
        Self {
            mode: LightMode::default(),
            forward_speed,
            target_x: 0.0,
        }
    }
}

/// Movement intent for the player
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlayerIntent {
    pub lateral: i8, // -1 = left, 0 = stay, 1 = right
}

impl PlayerIntent {
    pub fn new() -> Self {
        Self::default()
    }
}
