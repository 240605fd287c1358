use anyhow::{bail, Context, Result};
use rand::{rngs::StdRng, SeedableRng};
use std::io::Write;
use std::time::Instant;
use steer_core::behavior::random_jitter;
use steer_core::{
    Bounds, Crowd, Environment, Obstacle, Pilot, SingleBehavior, TargetTracker, Vector2D,
};
use steer_shared::{FrameReport, RunSummary, SceneDescription, SteeringSettings};

use crate::config;

/// Largest crowd the driver will simulate.
pub const CROWD_CAPACITY: usize = 256;

/// Scripted stand-in for the pointer the agents chase
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TargetScript {
    Fixed(Vector2D),
    /// Circles `center`, advancing `speed` radians per tick.
    Orbit {
        center: Vector2D,
        radius: f32,
        speed: f32,
    },
}

impl TargetScript {
    pub fn position_at(&self, tick: u64) -> Vector2D {
        match *self {
            TargetScript::Fixed(position) => position,
            TargetScript::Orbit {
                center,
                radius,
                speed,
            } => center + Vector2D::from_angle(tick as f32 * speed) * radius,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Mode {
    Single {
        behavior: SingleBehavior,
        blend: bool,
    },
    Crowd,
}

impl Mode {
    pub fn name(&self) -> &'static str {
        match self {
            Mode::Single { .. } => "single",
            Mode::Crowd => "crowd",
        }
    }
}

#[derive(Debug, Clone)]
pub struct RunOptions {
    pub mode: Mode,
    pub ticks: u64,
    /// Emit every n-th frame; the last frame is always emitted.
    pub every: u64,
    pub seed: u64,
    pub target: TargetScript,
}

enum World {
    Single(Pilot),
    Crowd(Box<Crowd<CROWD_CAPACITY>>),
}

/// A scene, its agents and the per-tick inputs that drive them
pub struct Simulation {
    bounds: Bounds,
    obstacles: Vec<Obstacle>,
    path: Vec<Vector2D>,
    world: World,
    mode: Mode,
    settings: SteeringSettings,
    target: TargetScript,
    tracker: TargetTracker,
    rng: StdRng,
    tick: u64,
    waypoints_reached: u64,
}

impl Simulation {
    pub fn new(
        scene: &SceneDescription,
        settings: &SteeringSettings,
        options: &RunOptions,
    ) -> Result<Self> {
        let bounds = config::bounds(scene);
        let path = config::path(scene);
        let mut rng = StdRng::seed_from_u64(options.seed);

        let world = match options.mode {
            Mode::Single { behavior, blend } => {
                let pilot_config = config::pilot_config(settings, behavior, blend);
                log::debug!("Pilot config: {:?}", pilot_config);
                World::Single(Pilot::new(config::pilot_agent(scene), pilot_config))
            }
            Mode::Crowd => {
                let crowd_config = config::crowd_config(settings);
                log::debug!("Crowd config: {:?}", crowd_config);

                let mut crowd = Box::new(Crowd::<CROWD_CAPACITY>::new(crowd_config));
                if scene.agent_count > crowd.capacity() {
                    bail!(
                        "Scene asks for {} agents but at most {} are supported",
                        scene.agent_count,
                        crowd.capacity()
                    );
                }
                crowd.populate(&mut rng, bounds, path.len(), scene.agent_count);
                World::Crowd(crowd)
            }
        };

        Ok(Self {
            bounds,
            obstacles: config::obstacles(scene),
            path,
            world,
            mode: options.mode,
            settings: settings.clone(),
            target: options.target,
            tracker: TargetTracker::new(),
            rng,
            tick: 0,
            waypoints_reached: 0,
        })
    }

    /// Runs one tick and reports the resulting state.
    pub fn step(&mut self) -> FrameReport {
        let env = Environment::new(self.bounds, &self.obstacles, &self.path);

        let (target, agents) = match &mut self.world {
            World::Single(pilot) => {
                let target = self.tracker.observe(self.target.position_at(self.tick));
                let jitter = random_jitter(&mut self.rng);
                pilot.tick(&target, env.bounds, jitter);
                (
                    Some(config::to_position(target.position)),
                    vec![config::snapshot(&pilot.agent)],
                )
            }
            World::Crowd(crowd) => {
                let before: Vec<usize> = crowd.agents.iter().map(|a| a.path_index).collect();
                crowd.update(&env);
                self.waypoints_reached += crowd
                    .agents
                    .iter()
                    .zip(before)
                    .filter(|(agent, index)| agent.path_index != *index)
                    .count() as u64;
                (None, crowd.agents.iter().map(config::snapshot).collect())
            }
        };

        self.tick += 1;
        FrameReport {
            tick: self.tick,
            target,
            agents,
        }
    }

    pub fn summary(&self) -> RunSummary {
        let agent_count = match &self.world {
            World::Single(_) => 1,
            World::Crowd(crowd) => crowd.agents.len(),
        };
        RunSummary {
            ticks: self.tick,
            agent_count,
            mode: self.mode.name().to_string(),
            combination: match self.mode {
                Mode::Crowd => Some(self.settings.combination),
                Mode::Single { .. } => None,
            },
            waypoints_reached: self.waypoints_reached,
        }
    }
}

/// Runs a whole simulation, writing one JSON line per emitted frame and a
/// final summary line to `out`.
///
/// Ticks are fixed-step: wall time is measured for logging only.
pub fn run<W: Write>(
    scene: &SceneDescription,
    settings: &SteeringSettings,
    options: &RunOptions,
    out: &mut W,
) -> Result<RunSummary> {
    let mut simulation = Simulation::new(scene, settings, options)?;
    let every = options.every.max(1);
    let started = Instant::now();

    log::info!(
        "Running {} ticks in {} mode",
        options.ticks,
        options.mode.name()
    );

    for _ in 0..options.ticks {
        let tick_started = Instant::now();
        let frame = simulation.step();
        log::trace!("Tick {} took {:?}", frame.tick, tick_started.elapsed());

        if frame.tick % every == 0 || frame.tick == options.ticks {
            serde_json::to_writer(&mut *out, &frame).context("Failed to write frame")?;
            writeln!(out).context("Failed to write frame")?;
        }
    }

    let summary = simulation.summary();
    serde_json::to_writer(&mut *out, &summary).context("Failed to write summary")?;
    writeln!(out).context("Failed to write summary")?;
    out.flush().context("Failed to flush output")?;

    log::info!(
        "Finished {} ticks in {:.2?} ({} waypoints reached)",
        summary.ticks,
        started.elapsed(),
        summary.waypoints_reached
    );

    Ok(summary)
}
