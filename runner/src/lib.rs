//! Headless driver for the duality runner: feeds the simulation fixed
//! frames, plays the input and contact collaborators, and reports the run.

pub mod autopilot;
pub mod contacts;


use game_core::{Config, ConfigError, Cue, RunSummary, Scene, Simulation, StatSink};
use records::RecordError;

use crate::autopilot::Autopilot;

/// Simulation frame length (60 Hz)
pub const FRAME_DT: f32 = 1.0 / 60.0;

const PROGRESS_EVERY: u32 = 600;

#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Records(#[from] RecordError),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunOptions {
    pub seed: u64,
    pub seconds: f32,      // Simulated time budget
    pub mistake_rate: f32, // Chance the autopilot ignores an obstacle
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            seed: 12345,
            seconds: 120.0,
            mistake_rate: 0.1,
        }
    }
}

/// What happened during a run
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RunReport {
    pub summary: RunSummary,
    pub frames: u32,
    pub game_over: bool,
    pub spawned: u32,
    pub recycled: u32,
    pub passed: u32,
    pub hits: u32,
}

impl std::fmt::Display for RunReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "{} after {:.1}s ({} frames)",
            if self.game_over { "Game over" } else { "Out of time" },
            self.summary.survival_time,
            self.frames
        )?;
        writeln!(f, "  total score:       {}", self.summary.total_score)?;
        writeln!(f, "  mode switches:     {}", self.summary.mode_switches)?;
        writeln!(f, "  obstacles avoided: {}", self.summary.obstacles_avoided)?;
        write!(
            f,
            "  spawned {} / recycled {} / passed {} / hit {}",
            self.spawned, self.recycled, self.passed, self.hits
        )
    }
}

pub struct Driver {
    sim: Simulation,
    pilot: Autopilot,
    options: RunOptions,
    accumulator: f32, // Wall time not yet simulated
    report: RunReport,
}

impl Driver {
    pub fn new(config: Config, options: RunOptions, sink: Box<dyn StatSink>) -> Self {
        let sim = Simulation::new(config, options.seed, sink);
        // Separate stream so piloting does not perturb spawning
        let pilot = Autopilot::new(options.mistake_rate, options.seed.wrapping_add(1));

        Self {
            sim,
            pilot,
            options,
            accumulator: 0.0,
            report: RunReport::default(),
        }
    }

    /// Feed wall time in; runs as many whole frames as it covers
    pub fn advance(&mut self, wall_dt: f32) -> u32 {
        self.accumulator += wall_dt.max(0.0);
        let mut ran = 0;
        while self.accumulator >= FRAME_DT && !self.is_finished() {
            self.accumulator -= FRAME_DT;
            self.frame();
            ran += 1;
        }
        ran
    }

    /// Run until game over or the time budget is spent
    pub fn run(mut self) -> RunReport {
        while !self.is_finished() {
            self.advance(FRAME_DT);
        }
        self.finish()
    }

    fn frame(&mut self) {
        if let Some(input) = self.pilot.decide(&self.sim) {
            self.sim.push_input(input);
        }

        self.sim.tick(FRAME_DT);

        let player = self.sim.player();
        for obstacle in contacts::detect(self.sim.world(), player) {
            self.sim.on_collision(player, obstacle);
        }

        let events = self.sim.take_events();
        self.report.spawned += events.spawned;
        self.report.recycled += events.recycled;
        for cue in &events.cues {
            match cue {
                Cue::ObstaclePassed => self.report.passed += 1,
                Cue::ObstacleHit => self.report.hits += 1,
                Cue::GameOver | Cue::ModeSwitch => {}
            }
            log::debug!("cue: {cue:?}");
        }

        self.report.frames += 1;
        if self.report.frames % PROGRESS_EVERY == 0 {
            log::info!(
                "frame {}: {} | active obstacles {}",
                self.report.frames,
                self.sim.hud(),
                self.active_obstacles()
            );
        }
    }

    fn active_obstacles(&self) -> usize {
        [game_core::Category::Wave, game_core::Category::Particle]
            .into_iter()
            .filter_map(|category| self.sim.spawner().pool(category))
            .map(|pool| pool.active_count())
            .sum()
    }

    pub fn is_finished(&self) -> bool {
        self.sim.scene() == Scene::GameOver
            || self.report.frames as f32 * FRAME_DT >= self.options.seconds
    }

    pub fn simulation(&self) -> &Simulation {
        &self.sim
    }

    pub fn report(&self) -> RunReport {
        RunReport {
            summary: self.sim.session().summary(),
            game_over: self.sim.session().game_over,
            ..self.report
        }
    }

    fn finish(self) -> RunReport {
        let report = self.report();
        log::info!(
            "run finished: score {}, survived {:.1}s",
            report.summary.total_score,
            report.summary.survival_time
        );
        report
    }
}
