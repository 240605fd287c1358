//! A fixed-capacity population steered by group and environment behaviors.

use crate::agent::Agent;
use crate::combine::{Combination, CombinationStrategy, Contributions};
use crate::environment::Environment;
use crate::group;
use crate::vector::Vector2D;

#[cfg(feature = "std")]
use crate::environment::Bounds;
#[cfg(feature = "std")]
use rand::Rng;

/// Which group/environment behaviors run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BehaviorToggles {
    pub path_following: bool,
    pub separation: bool,
    pub predictive_avoidance: bool,
    pub obstacle_avoidance: bool,
    pub wall_avoidance: bool,
}

impl Default for BehaviorToggles {
    fn default() -> Self {
        Self {
            path_following: true,
            separation: true,
            predictive_avoidance: true,
            obstacle_avoidance: true,
            wall_avoidance: true,
        }
    }
}

/// Configuration for the crowd simulation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CrowdConfig {
    pub toggles: BehaviorToggles,
    pub combination: Combination,
    pub separation_radius: f32,
    pub separation_strength: f32,
    pub predictive_look_ahead: f32,
    pub predictive_strength: f32,
    pub obstacle_look_ahead: f32,
    pub obstacle_strength: f32,
    pub wall_margin: f32,
    pub wall_strength: f32,
    pub waypoint_radius: f32,
    /// How far past an edge an agent may drift before it wraps around.
    pub wrap_buffer: f32,
}

impl Default for CrowdConfig {
    fn default() -> Self {
        Self {
            toggles: BehaviorToggles::default(),
            combination: Combination::default(),
            separation_radius: 48.0,
            separation_strength: 0.9,
            predictive_look_ahead: 0.9,
            predictive_strength: 0.9,
            obstacle_look_ahead: 70.0,
            obstacle_strength: 1.2,
            wall_margin: 40.0,
            wall_strength: 1.6,
            waypoint_radius: 22.0,
            wrap_buffer: 60.0,
        }
    }
}

/// A collection of agents sharing one environment.
///
/// Backed by `heapless` so it works without an allocator.
pub struct Crowd<const N: usize> {
    pub agents: heapless::Vec<Agent, N>,
    pub config: CrowdConfig,
}

impl<const N: usize> Crowd<N> {
    pub fn new(config: CrowdConfig) -> Self {
        Self {
            agents: heapless::Vec::new(),
            config,
        }
    }

    /// Hands the agent back when the crowd is full.
    pub fn add_agent(&mut self, agent: Agent) -> Result<(), Agent> {
        self.agents.push(agent)
    }

    pub fn capacity(&self) -> usize {
        N
    }

    /// Fills the crowd with up to `count` randomly placed agents and returns
    /// how many were added.
    #[cfg(feature = "std")]
    pub fn populate<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        bounds: Bounds,
        path_len: usize,
        count: usize,
    ) -> usize {
        let mut added = 0;
        for _ in 0..count {
            if self.add_agent(Agent::random(rng, bounds, path_len)).is_err() {
                log::warn!("crowd is full at {} agents", N);
                break;
            }
            added += 1;
        }
        added
    }

    /// Every agent except the one at `index`.
    pub fn neighbors(&self, index: usize) -> impl Iterator<Item = &Agent> + '_ {
        self.agents
            .iter()
            .enumerate()
            .filter(move |(other, _)| *other != index)
            .map(|(_, agent)| agent)
    }

    /// Steering contributions for the agent at `index`, plus the path index
    /// it should continue with.
    pub fn contributions(&self, index: usize, env: &Environment<'_>) -> (Contributions, usize) {
        let config = &self.config;
        let toggles = config.toggles;
        let agent = &self.agents[index];
        let mut path_index = agent.path_index;
        let mut contributions = Contributions::default();

        if toggles.path_following {
            let desired =
                group::path_following(agent, env.path, &mut path_index, config.waypoint_radius);
            contributions.path = desired - agent.velocity;
        }

        if toggles.separation {
            contributions.separation = group::separation(
                agent,
                self.neighbors(index),
                config.separation_radius,
                config.separation_strength,
            );
        }

        if toggles.predictive_avoidance {
            contributions.predictive = group::predictive_avoidance_all(
                agent,
                self.neighbors(index),
                config.predictive_look_ahead,
                config.predictive_strength,
            );
        }

        if toggles.obstacle_avoidance {
            contributions.obstacle = group::obstacle_avoidance(
                agent,
                env.obstacles,
                config.obstacle_look_ahead,
                config.obstacle_strength,
            );
        }

        if toggles.wall_avoidance {
            contributions.wall = group::wall_avoidance(
                agent,
                env.bounds,
                config.wall_margin,
                config.wall_strength,
            );
        }

        (contributions, path_index)
    }

    /// Advances every agent by one tick.
    ///
    /// Agents move in place, in order: later agents react to the positions
    /// earlier agents reached during this same tick.
    pub fn update(&mut self, env: &Environment<'_>) {
        for index in 0..self.agents.len() {
            let (contributions, path_index) = self.contributions(index, env);
            let max_force = self.agents[index].max_force;
            let force = self.config.combination.combine(&contributions, max_force);

            let agent = &mut self.agents[index];
            if agent.path_index != path_index {
                log::debug!("agent {} advanced to waypoint {}", index, path_index);
            }
            agent.path_index = path_index;
            agent.steer(force);
            agent.wrap_edges(env.bounds, self.config.wrap_buffer);
        }

        log::trace!(
            "crowd of {} updated with {} combination",
            self.agents.len(),
            self.config.combination.name()
        );
    }
}
