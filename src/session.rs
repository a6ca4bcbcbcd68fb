//! Session driver: the simulation context and the frame loop.
//!
//! A [`Simulation`] owns everything a session mutates. One call to
//! [`Simulation::tick`] runs the four stages in a fixed order:
//!
//! 1. classify the sampled landmarks into a gesture intent
//! 2. step the swarm under that intent
//! 3. move monsters and resolve overlap damage
//! 4. credit defeats, and start the next wave if the field is clear
//!
//! All randomness comes from one generator seeded from the config, so the
//! same config and input samples always produce the same session.

mod scheduler;

pub use scheduler::{FpsCounter, RealtimeScheduler, Scheduler, SteppedScheduler};

use std::ops::ControlFlow;

use rand::rngs::SmallRng;
use rand::SeedableRng;
use serde::Serialize;

use crate::config::GameConfig;
use crate::game::{
    check_invariants, classify, spawn_swarm, step_monsters, step_swarm, Bounds, DefeatEvent,
    GameState, GestureIntent, LandmarkFrame, Monster, MonsterSpawner, Particle, INITIAL_MONSTERS,
};
use crate::input::LandmarkSource;
use crate::render::RenderSnapshot;

/// What happened during one tick.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameOutcome {
    /// 1-based number of the tick that produced this outcome.
    pub frame: u64,
    /// Intent the swarm was steered by.
    pub intent: GestureIntent,
    /// Total overlap damage dealt.
    pub damage: u32,
    /// Monsters defeated.
    pub defeats: Vec<DefeatEvent>,
    /// The wave that started at the end of this tick, if any.
    pub new_wave: Option<u32>,
}

/// Complete mutable state of one session.
#[derive(Debug, Clone)]
pub struct Simulation {
    config: GameConfig,
    bounds: Bounds,
    particles: Vec<Particle>,
    monsters: Vec<Monster>,
    state: GameState,
    rng: SmallRng,
    spawner: MonsterSpawner,
    frame: u64,
    intent: GestureIntent,
    landmarks: Option<LandmarkFrame>,
}

impl Simulation {
    /// Start a session: seeded swarm, wave 1 with its opening monsters.
    ///
    /// The config is expected to have passed [`GameConfig::validate`].
    #[must_use]
    pub fn new(config: &GameConfig) -> Self {
        let bounds = config.bounds();
        let mut rng = SmallRng::seed_from_u64(config.seed);
        let particles = spawn_swarm(config.particles, bounds, &mut rng);
        let mut spawner = MonsterSpawner::new();
        let mut monsters = Vec::new();
        spawner.spawn_wave(&mut monsters, INITIAL_MONSTERS, bounds, &mut rng);

        log::info!(
            "session start: seed={} canvas={}x{} particles={}",
            config.seed,
            bounds.width,
            bounds.height,
            particles.len()
        );

        Self {
            config: *config,
            bounds,
            particles,
            monsters,
            state: GameState::new(),
            rng,
            spawner,
            frame: 0,
            intent: GestureIntent::IDLE,
            landmarks: None,
        }
    }

    /// Advance the session by one frame.
    pub fn tick(&mut self, landmarks: Option<&LandmarkFrame>) -> FrameOutcome {
        let landmarks = landmarks.filter(|f| f.is_finite()).copied();
        let intent = classify(landmarks.as_ref(), self.bounds);

        step_swarm(&mut self.particles, &intent, self.bounds, &mut self.rng);

        let step = step_monsters(&mut self.monsters, &self.particles, self.bounds);
        self.state.record_defeats(&step.defeats);
        for defeat in &step.defeats {
            log::debug!(
                "monster {} defeated at ({:.0}, {:.0}), score {}",
                defeat.monster_id,
                defeat.position.x,
                defeat.position.y,
                self.state.score()
            );
        }

        let new_wave = if self.monsters.is_empty() {
            let count = self.state.advance_wave();
            self.spawner
                .spawn_wave(&mut self.monsters, count, self.bounds, &mut self.rng);
            log::info!(
                "wave {} begins with {count} monsters (score {})",
                self.state.wave(),
                self.state.score()
            );
            Some(self.state.wave())
        } else {
            None
        };

        self.frame += 1;
        self.intent = intent;
        self.landmarks = landmarks;

        log::trace!(
            "frame {}: intent={} damage={} monsters={}",
            self.frame,
            intent.label(),
            step.damage,
            self.monsters.len()
        );

        FrameOutcome {
            frame: self.frame,
            intent,
            damage: step.damage,
            defeats: step.defeats,
            new_wave,
        }
    }

    /// Change the canvas size. Entities are pulled back inside the new bounds.
    ///
    /// Non-positive or non-finite sizes are ignored.
    pub fn resize(&mut self, bounds: Bounds) {
        let valid = |v: f64| v.is_finite() && v > 0.0;
        if !valid(bounds.width) || !valid(bounds.height) || bounds == self.bounds {
            return;
        }
        log::debug!("canvas resized to {}x{}", bounds.width, bounds.height);
        self.bounds = bounds;
        for p in &mut self.particles {
            p.position = bounds.wrap(p.position);
        }
        for m in &mut self.monsters {
            m.confine(bounds);
        }
    }

    /// Record the measured frame rate for display.
    pub fn set_fps(&mut self, fps: u32) {
        self.state.set_fps(fps);
    }

    /// Copy out everything a renderer needs for this frame.
    #[must_use]
    pub fn snapshot(&self) -> RenderSnapshot {
        RenderSnapshot::capture(self)
    }

    /// The config this session started from.
    #[must_use]
    pub const fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Current canvas bounds.
    #[must_use]
    pub const fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// The swarm, leader included.
    #[must_use]
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Monsters still in play.
    #[must_use]
    pub fn monsters(&self) -> &[Monster] {
        &self.monsters
    }

    /// Score, wave, combo and fps.
    #[must_use]
    pub const fn state(&self) -> &GameState {
        &self.state
    }

    /// Ticks completed.
    #[must_use]
    pub const fn frame(&self) -> u64 {
        self.frame
    }

    /// Intent used by the most recent tick.
    #[must_use]
    pub const fn intent(&self) -> GestureIntent {
        self.intent
    }

    /// Landmarks sampled by the most recent tick.
    #[must_use]
    pub const fn landmarks(&self) -> Option<&LandmarkFrame> {
        self.landmarks.as_ref()
    }

    #[cfg(test)]
    pub(crate) fn particles_mut(&mut self) -> &mut Vec<Particle> {
        &mut self.particles
    }

    #[cfg(test)]
    pub(crate) fn monsters_mut(&mut self) -> &mut Vec<Monster> {
        &mut self.monsters
    }
}

/// Drive `sim` until the scheduler or `on_frame` stops it.
///
/// Each frame samples `source` once, ticks, updates the fps readout, then
/// hands the outcome to `on_frame`. Returns the number of frames run.
pub fn run<L, S, F>(sim: &mut Simulation, source: &mut L, scheduler: &mut S, mut on_frame: F) -> u64
where
    L: LandmarkSource + ?Sized,
    S: Scheduler + ?Sized,
    F: FnMut(&mut Simulation, &FrameOutcome) -> ControlFlow<()>,
{
    let mut fps = FpsCounter::new();
    let mut frames = 0;

    while let Some(now) = scheduler.request_next_tick() {
        let landmarks = source.latest();
        let outcome = sim.tick(landmarks.as_ref());
        frames += 1;
        if let Some(rate) = fps.record(now) {
            sim.set_fps(rate);
        }
        if on_frame(sim, &outcome).is_break() {
            break;
        }
    }

    frames
}

/// End-of-session statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct SessionSummary {
    /// Seed the session ran with.
    pub seed: u64,
    /// Frames simulated.
    pub frames: u64,
    /// Final score.
    pub score: u64,
    /// Final wave.
    pub wave: u32,
    /// Final combo.
    pub combo: u32,
    /// Monsters defeated.
    pub defeated: u64,
    /// Monsters alive at the end.
    pub monsters_left: usize,
    /// Frames steered by a gather intent.
    pub gather_frames: u64,
    /// Frames steered by a scatter intent.
    pub scatter_frames: u64,
    /// Frames with a free intent.
    pub free_frames: u64,
    /// Invariant violations observed after any frame.
    pub invariant_violations: u64,
}

impl SessionSummary {
    /// Tally one finished frame and check invariants against `sim`.
    pub fn record(&mut self, sim: &Simulation, outcome: &FrameOutcome) {
        match outcome.intent {
            GestureIntent::Gather { .. } => self.gather_frames += 1,
            GestureIntent::Scatter { .. } => self.scatter_frames += 1,
            GestureIntent::Free { .. } => self.free_frames += 1,
        }
        let violations = check_invariants(sim);
        if let Some(first) = violations.first() {
            log::error!("frame {}: {first}", outcome.frame);
        }
        self.invariant_violations += violations.len() as u64;
    }

    /// Fill in the end-of-session readouts from `sim`.
    #[must_use]
    pub fn finish(mut self, sim: &Simulation) -> Self {
        let state = sim.state();
        self.seed = sim.config().seed;
        self.frames = sim.frame();
        self.score = state.score();
        self.wave = state.wave();
        self.combo = state.combo();
        self.defeated = state.defeated();
        self.monsters_left = sim.monsters().len();
        self
    }
}

/// Run a session for `frames` ticks on a simulated clock, checking
/// invariants after every tick.
pub fn run_headless<L>(sim: &mut Simulation, source: &mut L, frames: u64) -> SessionSummary
where
    L: LandmarkSource + ?Sized,
{
    let mut scheduler = SteppedScheduler::new(sim.config().target_fps).with_limit(frames);
    let mut summary = SessionSummary::default();
    run(sim, source, &mut scheduler, |sim, outcome| {
        summary.record(sim, outcome);
        ControlFlow::Continue(())
    });
    let summary = summary.finish(sim);
    log::info!(
        "session end: {} frames, score {}, wave {}",
        summary.frames,
        summary.score,
        summary.wave
    );
    summary
}
