use crate::vector::Vector2D;

/// Rectangular play area anchored at the origin
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> Vector2D {
        Vector2D::new(self.width * 0.5, self.height * 0.5)
    }

    pub fn contains(&self, point: Vector2D) -> bool {
        point.x >= 0.0 && point.y >= 0.0 && point.x <= self.width && point.y <= self.height
    }
}

/// A circular obstacle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Obstacle {
    pub center: Vector2D,
    pub radius: f32,
}

impl Obstacle {
    pub fn new(center: Vector2D, radius: f32) -> Self {
        Self { center, radius }
    }
}

/// Everything a tick reads but never mutates.
///
/// The path is a closed loop: after the last waypoint the first follows.
#[derive(Debug, Clone, Copy)]
pub struct Environment<'a> {
    pub bounds: Bounds,
    pub obstacles: &'a [Obstacle],
    pub path: &'a [Vector2D],
}

impl<'a> Environment<'a> {
    pub fn new(bounds: Bounds, obstacles: &'a [Obstacle], path: &'a [Vector2D]) -> Self {
        Self {
            bounds,
            obstacles,
            path,
        }
    }

    /// An environment with walls only.
    pub fn open(bounds: Bounds) -> Self {
        Self::new(bounds, &[], &[])
    }
}

/// A moving goal: where it is and how far it moved last frame
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Target {
    pub position: Vector2D,
    pub velocity: Vector2D,
}

impl Target {
    pub fn new(position: Vector2D, velocity: Vector2D) -> Self {
        Self { position, velocity }
    }

    pub fn stationary(position: Vector2D) -> Self {
        Self::new(position, Vector2D::zero())
    }
}

/// Derives a target velocity from successive observed positions.
#[derive(Debug, Clone, Default)]
pub struct TargetTracker {
    previous: Option<Vector2D>,
}

impl TargetTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `position` and returns it with the delta since the last call.
    /// The first observation has zero velocity.
    pub fn observe(&mut self, position: Vector2D) -> Target {
        let velocity = match self.previous {
            Some(previous) => position - previous,
            None => Vector2D::zero(),
        };
        self.previous = Some(position);
        Target::new(position, velocity)
    }
}
