/// Scenes the run moves between
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scene {
    MainMenu,
    Game,
    GameOver,
}

/// Timed fade toward a target scene, advanced once per tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneTransition {
    pub target: Scene,
    pub elapsed: f32,
    pub duration: f32,
}

impl SceneTransition {
    pub fn new(target: Scene, duration: f32) -> Self {
        Self {
            target,
            elapsed: 0.0,
            duration: duration.max(0.0),
        }
    }

    pub fn advance(&mut self, dt: f32) {
        self.elapsed = (self.elapsed + dt).min(self.duration);
    }

    /// Fraction of the fade completed, in [0, 1]
    pub fn progress(&self) -> f32 {
        if self.duration <= 0.0 {
            1.0
        } else {
            (self.elapsed / self.duration).clamp(0.0, 1.0)
        }
    }

    pub fn is_complete(&self) -> bool {
        self.progress() >= 1.0
    }
}
