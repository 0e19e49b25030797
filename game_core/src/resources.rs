/// Time resource for tracking simulation time
#[derive(Debug, Clone, Copy)]
pub struct Time {
    pub dt: f32,  // Delta time for this step
    pub now: f32, // Total elapsed time
}

impl Time {
    pub fn new(dt: f32, now: f32) -> Self {
        Self { dt, now }
    }
}

impl Default for Time {
    fn default() -> Self {
        Self {
            dt: 0.016,
            now: 0.0,
        }
    }
}

/// Random number generator
pub struct GameRng(pub rand::rngs::StdRng);

impl GameRng {
    pub fn new(seed: u64) -> Self {
        use rand::SeedableRng;
        Self(rand::rngs::StdRng::seed_from_u64(seed))
    }
}

impl Default for GameRng {
    fn default() -> Self {
        Self::new(12345)
    }
}

/// Fire-and-forget audio cues raised by the simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    ModeSwitch,
    ObstaclePassed,
    ObstacleHit,
    GameOver,
}

/// Events that occurred since the caller last drained them
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Events {
    pub cues: Vec<Cue>,
    pub spawned: u32,
    pub recycled: u32,
}

impl Events {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.cues.clear();
        self.spawned = 0;
        self.recycled = 0;
    }

    pub fn push_cue(&mut self, cue: Cue) {
        self.cues.push(cue);
    }

    pub fn has_cue(&self, cue: Cue) -> bool {
        self.cues.contains(&cue)
    }
}

/// One frame of player input from the input collaborator
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlayerInput {
    pub lateral: i8, // -1 = left, 0 = stay, 1 = right
    pub switch_mode: bool,
}

/// Input queue filled between ticks
#[derive(Debug, Clone, Default)]
pub struct InputQueue {
    pub inputs: Vec<PlayerInput>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.inputs.clear();
    }

    pub fn push_input(&mut self, input: PlayerInput) {
        self.inputs.push(input);
    }

    pub fn pop_inputs(&mut self) -> Vec<PlayerInput> {
        std::mem::take(&mut self.inputs)
    }
}
