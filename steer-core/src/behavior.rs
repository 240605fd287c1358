//! Single-target behaviors.
//!
//! Every function here returns a *desired velocity*; the caller turns it
//! into a steering force by subtracting the agent's current velocity.

use crate::vector::Vector2D;

#[cfg(feature = "std")]
use rand::Rng;

/// Keeps the pursuit horizon finite for a pursuer with zero top speed.
pub const PURSUIT_EPSILON: f32 = 0.0001;

/// Distance at which arrive considers the target reached.
pub const ARRIVAL_TOLERANCE: f32 = 0.001;

pub const WANDER_CIRCLE_DISTANCE: f32 = 50.0;
pub const WANDER_CIRCLE_RADIUS: f32 = 30.0;
pub const WANDER_ANGLE_CHANGE: f32 = 0.5;

pub fn seek(position: Vector2D, target: Vector2D, max_speed: f32) -> Vector2D {
    (target - position).normalize() * max_speed
}

pub fn flee(position: Vector2D, target: Vector2D, max_speed: f32) -> Vector2D {
    (position - target).normalize() * max_speed
}

/// Linear extrapolation of a moving target. The horizon grows with distance
/// and shrinks with the pursuer's speed.
pub fn predict_target(
    position: Vector2D,
    target_position: Vector2D,
    target_velocity: Vector2D,
    max_speed: f32,
    prediction_factor: f32,
) -> Vector2D {
    let distance = (target_position - position).magnitude();
    let horizon = distance / (max_speed + PURSUIT_EPSILON) * prediction_factor;
    target_position + target_velocity * horizon
}

pub fn pursue(
    position: Vector2D,
    target_position: Vector2D,
    target_velocity: Vector2D,
    max_speed: f32,
    prediction_factor: f32,
) -> Vector2D {
    let future = predict_target(
        position,
        target_position,
        target_velocity,
        max_speed,
        prediction_factor,
    );
    seek(position, future, max_speed)
}

pub fn evade(
    position: Vector2D,
    target_position: Vector2D,
    target_velocity: Vector2D,
    max_speed: f32,
    prediction_factor: f32,
) -> Vector2D {
    let future = predict_target(
        position,
        target_position,
        target_velocity,
        max_speed,
        prediction_factor,
    );
    flee(position, future, max_speed)
}

/// Seek that ramps speed down linearly inside `slowing_radius`.
pub fn arrive(
    position: Vector2D,
    target: Vector2D,
    max_speed: f32,
    slowing_radius: f32,
) -> Vector2D {
    let offset = target - position;
    let distance = offset.magnitude();
    if distance < ARRIVAL_TOLERANCE {
        return Vector2D::zero();
    }

    let speed = (max_speed * (distance / slowing_radius)).min(max_speed);
    offset.normalize() * speed
}

/// Random walk steered by a point on a circle projected ahead of the agent.
///
/// `wander_angle` is the agent's persistent state and is advanced by
/// `jitter * WANDER_ANGLE_CHANGE`, with `jitter` clamped to `[-1, 1]`.
/// The circle is placed relative to the agent, so only its heading matters.
pub fn wander(velocity: Vector2D, max_speed: f32, wander_angle: &mut f32, jitter: f32) -> Vector2D {
    let circle_center = velocity.direction_or(Vector2D::UP) * WANDER_CIRCLE_DISTANCE;

    *wander_angle += jitter.clamp(-1.0, 1.0) * WANDER_ANGLE_CHANGE;

    let displacement = Vector2D::from_angle(*wander_angle) * WANDER_CIRCLE_RADIUS;
    (circle_center + displacement).limit(max_speed)
}

/// Draws a wander jitter in `[-1, 1]` with a 0.01 step.
#[cfg(feature = "std")]
pub fn random_jitter<R: Rng + ?Sized>(rng: &mut R) -> f32 {
    rng.gen_range(-100..=100) as f32 / 100.0
}

/// The closed set of behaviors a lone agent can run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SingleBehavior {
    #[default]
    Seek,
    Flee,
    Pursue,
    Evade,
    Arrive,
    Wander,
}

impl SingleBehavior {
    pub const ALL: [SingleBehavior; 6] = [
        SingleBehavior::Seek,
        SingleBehavior::Flee,
        SingleBehavior::Pursue,
        SingleBehavior::Evade,
        SingleBehavior::Arrive,
        SingleBehavior::Wander,
    ];

    /// Maps the number keys `1..=6` to behaviors.
    pub fn from_key(key: u8) -> Option<Self> {
        match key {
            1..=6 => Some(Self::ALL[(key - 1) as usize]),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            SingleBehavior::Seek => "Seek",
            SingleBehavior::Flee => "Flee",
            SingleBehavior::Pursue => "Pursue",
            SingleBehavior::Evade => "Evade",
            SingleBehavior::Arrive => "Arrive",
            SingleBehavior::Wander => "Wander",
        }
    }
}

impl core::fmt::Display for SingleBehavior {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}
