//! A lone agent driven by one single-target behavior at a time.

use crate::agent::Agent;
use crate::behavior::{self, SingleBehavior};
use crate::combine::weighted_blend;
use crate::environment::{Bounds, Target};
use crate::vector::Vector2D;

pub const DEFAULT_PREDICTION_FACTOR: f32 = 0.8;
pub const DEFAULT_SLOWING_RADIUS: f32 = 140.0;

/// Blend of wander and seek that replaces the selected behavior.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WanderSeekBlend {
    pub wander_weight: f32,
    pub seek_weight: f32,
    /// The blend is clamped to `max_force` times this.
    pub force_scale: f32,
}

impl Default for WanderSeekBlend {
    fn default() -> Self {
        Self {
            wander_weight: 0.6,
            seek_weight: 1.0,
            force_scale: 2.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PilotConfig {
    pub behavior: SingleBehavior,
    pub blend: Option<WanderSeekBlend>,
    pub prediction_factor: f32,
    pub slowing_radius: f32,
}

impl Default for PilotConfig {
    fn default() -> Self {
        Self {
            behavior: SingleBehavior::Seek,
            blend: None,
            prediction_factor: DEFAULT_PREDICTION_FACTOR,
            slowing_radius: DEFAULT_SLOWING_RADIUS,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Pilot {
    pub agent: Agent,
    pub config: PilotConfig,
}

impl Pilot {
    pub fn new(agent: Agent, config: PilotConfig) -> Self {
        Self { agent, config }
    }

    /// Desired velocity for this tick. Wander (alone or blended) consumes
    /// `jitter` and advances the agent's wander angle.
    pub fn desired_velocity(&mut self, target: &Target, jitter: f32) -> Vector2D {
        let agent = &mut self.agent;

        if let Some(blend) = self.config.blend {
            let wander = behavior::wander(
                agent.velocity,
                agent.max_speed,
                &mut agent.wander_angle,
                jitter,
            );
            let seek = behavior::seek(agent.position, target.position, agent.max_speed);
            return weighted_blend(
                &[(wander, blend.wander_weight), (seek, blend.seek_weight)],
                agent.max_force * blend.force_scale,
            );
        }

        match self.config.behavior {
            SingleBehavior::Seek => {
                behavior::seek(agent.position, target.position, agent.max_speed)
            }
            SingleBehavior::Flee => {
                behavior::flee(agent.position, target.position, agent.max_speed)
            }
            SingleBehavior::Pursue => behavior::pursue(
                agent.position,
                target.position,
                target.velocity,
                agent.max_speed,
                self.config.prediction_factor,
            ),
            SingleBehavior::Evade => behavior::evade(
                agent.position,
                target.position,
                target.velocity,
                agent.max_speed,
                self.config.prediction_factor,
            ),
            SingleBehavior::Arrive => behavior::arrive(
                agent.position,
                target.position,
                agent.max_speed,
                self.config.slowing_radius,
            ),
            SingleBehavior::Wander => behavior::wander(
                agent.velocity,
                agent.max_speed,
                &mut agent.wander_angle,
                jitter,
            ),
        }
    }

    /// Advances the pilot one tick and returns the applied steering force.
    ///
    /// The position is hard-clamped to `bounds`; the pilot never wraps.
    pub fn tick(&mut self, target: &Target, bounds: Bounds, jitter: f32) -> Vector2D {
        let desired = self.desired_velocity(target, jitter);
        let steering = (desired - self.agent.velocity).limit(self.agent.max_force);

        self.agent.steer(steering);
        self.agent.clamp_to_bounds(bounds);
        steering
    }
}
