use crate::environment::Bounds;
use crate::vector::Vector2D;

#[cfg(feature = "std")]
use rand::Rng;

/// A single steerable entity
#[derive(Debug, Clone, PartialEq)]
pub struct Agent {
    pub position: Vector2D,
    pub velocity: Vector2D,
    pub max_speed: f32,
    pub max_force: f32,
    /// Current waypoint on the shared path. Advanced by path following.
    pub path_index: usize,
    /// Angle on the wander circle, carried across ticks.
    pub wander_angle: f32,
}

impl Agent {
    pub fn new(position: Vector2D, velocity: Vector2D, max_speed: f32, max_force: f32) -> Self {
        Self {
            position,
            velocity,
            max_speed,
            max_force,
            path_index: 0,
            wander_angle: 0.0,
        }
    }

    pub fn with_path_index(mut self, path_index: usize) -> Self {
        self.path_index = path_index;
        self
    }

    /// Spawns an agent somewhere inside `bounds`, kept 80 units off the edges.
    #[cfg(feature = "std")]
    pub fn random<R: Rng + ?Sized>(rng: &mut R, bounds: Bounds, path_len: usize) -> Self {
        const EDGE_CLEARANCE: f32 = 80.0;

        let position = Vector2D::new(
            spawn_coordinate(rng, bounds.width, EDGE_CLEARANCE),
            spawn_coordinate(rng, bounds.height, EDGE_CLEARANCE),
        );
        let velocity = Vector2D::new(
            rng.gen_range(-50..=50) as f32 / 10.0,
            rng.gen_range(-50..=50) as f32 / 10.0,
        );
        let max_speed = 2.4 + rng.gen_range(0..=30) as f32 / 100.0;
        let path_index = if path_len > 0 {
            rng.gen_range(0..path_len)
        } else {
            0
        };

        Self::new(position, velocity, max_speed, 0.14).with_path_index(path_index)
    }

    /// Heading for rendering; `0.0` when the agent is effectively still.
    pub fn heading(&self) -> f32 {
        self.velocity.heading()
    }

    /// Integrates one tick: the force is clamped to `max_force`, the
    /// resulting velocity to `max_speed`, then the position advances.
    pub fn steer(&mut self, force: Vector2D) {
        let force = force.limit(self.max_force);
        self.velocity = (self.velocity + force).limit(self.max_speed);
        self.position += self.velocity;
    }

    /// Hard clamp into the play area; velocity is left alone.
    pub fn clamp_to_bounds(&mut self, bounds: Bounds) {
        self.position.x = self.position.x.max(0.0).min(bounds.width);
        self.position.y = self.position.y.max(0.0).min(bounds.height);
    }

    /// Toroidal wrap once the agent is more than `buffer` past an edge.
    pub fn wrap_edges(&mut self, bounds: Bounds, buffer: f32) {
        if self.position.x < -buffer {
            self.position.x = bounds.width + buffer;
        }
        if self.position.x > bounds.width + buffer {
            self.position.x = -buffer;
        }
        if self.position.y < -buffer {
            self.position.y = bounds.height + buffer;
        }
        if self.position.y > bounds.height + buffer {
            self.position.y = -buffer;
        }
    }
}

#[cfg(feature = "std")]
fn spawn_coordinate<R: Rng + ?Sized>(rng: &mut R, extent: f32, clearance: f32) -> f32 {
    let low = clearance as i32;
    let high = (extent - clearance) as i32;
    if high > low {
        rng.gen_range(low..=high) as f32
    } else {
        extent * 0.5
    }
}
