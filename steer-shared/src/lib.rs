#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

use alloc::vec;
use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

/// Represents a 2D position in screen coordinates
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Calculate distance to another position
    pub fn distance_to(&self, other: &Position) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        libm::sqrtf(dx * dx + dy * dy)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// A circular obstacle in scene coordinates
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ObstacleSpec {
    pub center: Position,
    pub radius: f32,
}

impl ObstacleSpec {
    pub fn new(x: f32, y: f32, radius: f32) -> Self {
        Self {
            center: Position::new(x, y),
            radius,
        }
    }
}

/// Starting state of the lone agent
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PilotSpec {
    pub position: Position,
    pub velocity: Position,
    pub max_speed: f32,
    pub max_force: f32,
}

impl Default for PilotSpec {
    fn default() -> Self {
        Self {
            position: Position::new(500.0, 400.0),
            // slightly moving so the heading is defined from the first frame
            velocity: Position::new(0.05, 0.0),
            max_speed: 3.0,
            max_force: 0.12,
        }
    }
}

/// Everything static about a scene: play area, patrol route and obstacles
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SceneDescription {
    pub width: f32,
    pub height: f32,
    /// Closed loop of waypoints
    pub path: Vec<Position>,
    pub obstacles: Vec<ObstacleSpec>,
    pub agent_count: usize,
    pub pilot: PilotSpec,
}

impl Default for SceneDescription {
    fn default() -> Self {
        Self {
            width: 1800.0,
            height: 1000.0,
            path: vec![
                Position::new(150.0, 120.0),
                Position::new(400.0, 90.0),
                Position::new(800.0, 150.0),
                Position::new(920.0, 300.0),
                Position::new(800.0, 520.0),
                Position::new(520.0, 620.0),
                Position::new(240.0, 500.0),
                Position::new(100.0, 350.0),
            ],
            obstacles: vec![
                ObstacleSpec::new(500.0, 320.0, 60.0),
                ObstacleSpec::new(300.0, 380.0, 45.0),
                ObstacleSpec::new(700.0, 460.0, 55.0),
            ],
            agent_count: 12,
            pilot: PilotSpec::default(),
        }
    }
}

/// How crowd steering contributions are merged
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum CombinationMode {
    #[default]
    Priority,
    Weighted,
}

/// On/off switch per crowd behavior
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct BehaviorSwitches {
    pub path_following: bool,
    pub separation: bool,
    pub predictive_avoidance: bool,
    pub obstacle_avoidance: bool,
    pub wall_avoidance: bool,
}

impl Default for BehaviorSwitches {
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

/// Steering simulation tuning
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SteeringSettings {
    pub combination: CombinationMode,
    pub switches: BehaviorSwitches,
    pub separation_radius: f32,
    pub separation_strength: f32,
    pub predictive_look_ahead: f32,
    pub predictive_strength: f32,
    pub obstacle_look_ahead: f32,
    pub obstacle_strength: f32,
    pub wall_margin: f32,
    pub wall_strength: f32,
    pub waypoint_radius: f32,
    pub wrap_buffer: f32,
    pub prediction_factor: f32,
    pub slowing_radius: f32,
}

impl Default for SteeringSettings {
    fn default() -> Self {
        Self {
            combination: CombinationMode::Priority,
            switches: BehaviorSwitches::default(),
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
            prediction_factor: 0.8,
            slowing_radius: 140.0,
        }
    }
}

/// One agent as seen by a renderer
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct AgentSnapshot {
    pub position: Position,
    pub velocity: Position,
    /// Radians; `0.0` while the agent is effectively still
    pub heading: f32,
    pub path_index: usize,
}

/// State of every agent after one tick
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FrameReport {
    pub tick: u64,
    pub target: Option<Position>,
    pub agents: Vec<AgentSnapshot>,
}

/// Emitted once when a run finishes
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunSummary {
    pub ticks: u64,
    pub agent_count: usize,
    pub mode: alloc::string::String,
    pub combination: Option<CombinationMode>,
    pub waypoints_reached: u64,
}
