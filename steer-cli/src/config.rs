use anyhow::{bail, Context, Result};
use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;
use steer_core::{
    Agent, BehaviorToggles, Bounds, Combination, CrowdConfig, Obstacle, PilotConfig,
    SingleBehavior, Vector2D, WanderSeekBlend,
};
use steer_shared::{AgentSnapshot, CombinationMode, Position, SceneDescription, SteeringSettings};

/// A crowd behavior that can be switched off from the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Toggle {
    Path,
    Separation,
    Predictive,
    Obstacle,
    Wall,
}

fn load_json<T: DeserializeOwned + Default>(path: Option<&Path>, what: &str) -> Result<T> {
    let Some(path) = path else {
        log::debug!("No {} file given, using defaults", what);
        return Ok(T::default());
    };

    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {} file {}", what, path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse {} file {}", what, path.display()))
}

pub fn load_scene(path: Option<&Path>) -> Result<SceneDescription> {
    let scene: SceneDescription = load_json(path, "scene")?;
    validate_scene(&scene)?;
    Ok(scene)
}

pub fn load_settings(path: Option<&Path>) -> Result<SteeringSettings> {
    let settings: SteeringSettings = load_json(path, "settings")?;
    validate_settings(&settings)?;
    Ok(settings)
}

pub fn validate_scene(scene: &SceneDescription) -> Result<()> {
    let positive = |v: f32| v.is_finite() && v > 0.0;
    if !(positive(scene.width) && positive(scene.height)) {
        bail!("Scene bounds must be positive, got {}x{}", scene.width, scene.height);
    }

    for (i, waypoint) in scene.path.iter().enumerate() {
        if !waypoint.is_finite() {
            bail!("Waypoint {} is not a finite position: {:?}", i, waypoint);
        }
    }

    for (i, obstacle) in scene.obstacles.iter().enumerate() {
        if !obstacle.center.is_finite() {
            bail!("Obstacle {} has a non-finite center: {:?}", i, obstacle.center);
        }
        if !(obstacle.radius.is_finite() && obstacle.radius > 0.0) {
            bail!("Obstacle {} must have a positive radius, got {}", i, obstacle.radius);
        }
    }

    let pilot = &scene.pilot;
    if !(pilot.position.is_finite() && pilot.velocity.is_finite()) {
        bail!("Pilot start state must be finite");
    }
    if !(pilot.max_speed > 0.0 && pilot.max_force > 0.0) {
        bail!(
            "Pilot max speed and max force must be positive, got {} and {}",
            pilot.max_speed,
            pilot.max_force
        );
    }

    if scene.path.is_empty() {
        log::warn!("Scene has no path, path following will idle");
    }
    if scene.agent_count == 0 {
        log::warn!("Scene has no crowd agents");
    }

    Ok(())
}

pub fn validate_settings(settings: &SteeringSettings) -> Result<()> {
    let positive = [
        ("separation_radius", settings.separation_radius),
        ("wall_margin", settings.wall_margin),
        ("waypoint_radius", settings.waypoint_radius),
        ("slowing_radius", settings.slowing_radius),
    ];
    for (name, value) in positive {
        if !(value.is_finite() && value > 0.0) {
            bail!("Setting {} must be positive, got {}", name, value);
        }
    }

    let non_negative = [
        ("separation_strength", settings.separation_strength),
        ("predictive_look_ahead", settings.predictive_look_ahead),
        ("predictive_strength", settings.predictive_strength),
        ("obstacle_look_ahead", settings.obstacle_look_ahead),
        ("obstacle_strength", settings.obstacle_strength),
        ("wall_strength", settings.wall_strength),
        ("wrap_buffer", settings.wrap_buffer),
        ("prediction_factor", settings.prediction_factor),
    ];
    for (name, value) in non_negative {
        if !(value.is_finite() && value >= 0.0) {
            bail!("Setting {} must be zero or more, got {}", name, value);
        }
    }

    Ok(())
}

/// Applies command line overrides on top of loaded settings.
pub fn apply_overrides(
    settings: &mut SteeringSettings,
    combination: Option<CombinationMode>,
    disabled: &[Toggle],
) {
    if let Some(combination) = combination {
        settings.combination = combination;
    }
    for toggle in disabled {
        let switches = &mut settings.switches;
        match toggle {
            Toggle::Path => switches.path_following = false,
            Toggle::Separation => switches.separation = false,
            Toggle::Predictive => switches.predictive_avoidance = false,
            Toggle::Obstacle => switches.obstacle_avoidance = false,
            Toggle::Wall => switches.wall_avoidance = false,
        }
    }
}

pub fn crowd_config(settings: &SteeringSettings) -> CrowdConfig {
    let switches = settings.switches;
    CrowdConfig {
        toggles: BehaviorToggles {
            path_following: switches.path_following,
            separation: switches.separation,
            predictive_avoidance: switches.predictive_avoidance,
            obstacle_avoidance: switches.obstacle_avoidance,
            wall_avoidance: switches.wall_avoidance,
        },
        combination: match settings.combination {
            CombinationMode::Priority => Combination::priority(),
            CombinationMode::Weighted => Combination::weighted(),
        },
        separation_radius: settings.separation_radius,
        separation_strength: settings.separation_strength,
        predictive_look_ahead: settings.predictive_look_ahead,
        predictive_strength: settings.predictive_strength,
        obstacle_look_ahead: settings.obstacle_look_ahead,
        obstacle_strength: settings.obstacle_strength,
        wall_margin: settings.wall_margin,
        wall_strength: settings.wall_strength,
        waypoint_radius: settings.waypoint_radius,
        wrap_buffer: settings.wrap_buffer,
    }
}

pub fn pilot_config(
    settings: &SteeringSettings,
    behavior: SingleBehavior,
    blend: bool,
) -> PilotConfig {
    PilotConfig {
        behavior,
        blend: blend.then(WanderSeekBlend::default),
        prediction_factor: settings.prediction_factor,
        slowing_radius: settings.slowing_radius,
    }
}

pub fn to_vector(position: Position) -> Vector2D {
    Vector2D::new(position.x, position.y)
}

pub fn to_position(vector: Vector2D) -> Position {
    Position::new(vector.x, vector.y)
}

pub fn bounds(scene: &SceneDescription) -> Bounds {
    Bounds::new(scene.width, scene.height)
}

pub fn obstacles(scene: &SceneDescription) -> Vec<Obstacle> {
    scene
        .obstacles
        .iter()
        .map(|o| Obstacle::new(to_vector(o.center), o.radius))
        .collect()
}

pub fn path(scene: &SceneDescription) -> Vec<Vector2D> {
    scene.path.iter().copied().map(to_vector).collect()
}

pub fn pilot_agent(scene: &SceneDescription) -> Agent {
    let pilot = &scene.pilot;
    Agent::new(
        to_vector(pilot.position),
        to_vector(pilot.velocity),
        pilot.max_speed,
        pilot.max_force,
    )
}

pub fn snapshot(agent: &Agent) -> AgentSnapshot {
    AgentSnapshot {
        position: to_position(agent.position),
        velocity: to_position(agent.velocity),
        heading: agent.heading(),
        path_index: agent.path_index,
    }
}
