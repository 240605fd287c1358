#![cfg_attr(not(feature = "std"), no_std)]

//! Steering behaviors for autonomous agents.
//!
//! Single-target behaviors ([`behavior`]) produce desired velocities, group
//! and environment behaviors ([`group`]) produce steering contributions, and
//! a [`CombinationStrategy`] reduces those to one force per agent. [`Pilot`]
//! and [`Crowd`] integrate the result once per tick.

mod float;

pub mod agent;
pub mod behavior;
pub mod combine;
pub mod crowd;
pub mod environment;
pub mod group;
pub mod pilot;
pub mod vector;

pub use agent::Agent;
pub use behavior::SingleBehavior;
pub use combine::{
    Combination, CombinationStrategy, Contributions, PrioritySelection, WeightedBlend,
};
pub use crowd::{BehaviorToggles, Crowd, CrowdConfig};
pub use environment::{Bounds, Environment, Obstacle, Target, TargetTracker};
pub use pilot::{Pilot, PilotConfig, WanderSeekBlend};
pub use vector::Vector2D;
