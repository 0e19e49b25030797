use crate::{Config, StatError};

/// End-of-run statistics handed to the stat sink
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RunSummary {
    pub survival_time: f32,
    pub mode_switches: u32,
    pub obstacles_avoided: u32,
    pub total_score: u32,
}

/// Persistent store for end-of-run statistics
pub trait StatSink {
    fn save(&mut self, summary: &RunSummary) -> Result<(), StatError>;
}

/// Score, lives and per-run counters
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub score: u32,
    pub lives: i32,
    pub initial_lives: i32,
    pub max_lives: i32,
    pub time_elapsed: f32,
    pub mode_switches: u32,
    pub obstacles_avoided: u32,
    pub total_score: u32,
    pub game_over: bool,
}

impl Session {
    pub fn new(config: &Config) -> Self {
        Self {
            score: 0,
            lives: config.session.initial_lives,
            initial_lives: config.session.initial_lives,
            max_lives: config.session.max_lives,
            time_elapsed: 0.0,
            mode_switches: 0,
            obstacles_avoided: 0,
            total_score: 0,
            game_over: false,
        }
    }

    pub fn add_score(&mut self, amount: u32) {
        if self.game_over {
            return;
        }
        self.score += amount;
        self.total_score += amount;
    }

    pub fn gain_life(&mut self, amount: i32) {
        if self.game_over {
            return;
        }
        self.lives = (self.lives + amount).min(self.max_lives);
    }

    /// Deduct a life. Returns true if this ended the run.
    pub fn lose_life(&mut self) -> bool {
        if self.game_over {
            return false;
        }
        self.lives -= 1;
        if self.lives <= 0 {
            self.game_over = true;
        }
        self.game_over
    }

    pub fn advance(&mut self, dt: f32) {
        if !self.game_over {
            self.time_elapsed += dt;
        }
    }

    pub fn record_mode_switch(&mut self) {
        self.mode_switches += 1;
    }

    pub fn record_avoided(&mut self) {
        self.obstacles_avoided += 1;
    }

    pub fn reset(&mut self) {
        self.score = 0;
        self.lives = self.initial_lives;
        self.time_elapsed = 0.0;
        self.mode_switches = 0;
        self.obstacles_avoided = 0;
        self.total_score = 0;
        self.game_over = false;
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary {
            survival_time: self.time_elapsed,
            mode_switches: self.mode_switches,
            obstacles_avoided: self.obstacles_avoided,
            total_score: self.total_score,
        }
    }
}
