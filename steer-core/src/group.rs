//! Behaviors that react to other agents and to the environment.
//!
//! Except for path following, the results are already force-like
//! contributions and are fed to a combination strategy as is.

use crate::agent::Agent;
use crate::behavior::arrive;
use crate::environment::{Bounds, Obstacle};
use crate::vector::Vector2D;

/// Sum of two agent radii used by predictive avoidance.
pub const PREDICTIVE_COMBINED_RADIUS: f32 = 24.0;

/// Extra clearance added around every obstacle.
pub const OBSTACLE_BUFFER: f32 = 8.0;

/// Strength of the correction applied when already inside an obstacle.
pub const OBSTACLE_INSIDE_FACTOR: f32 = 0.8;

/// The slowing radius of path following is this multiple of the waypoint radius.
pub const PATH_SLOWING_FACTOR: f32 = 2.5;

/// Pushes away from every neighbor closer than `radius`, closer ones harder.
///
/// `neighbors` must not contain `agent` itself. Neighbors sharing the exact
/// same position carry no direction and are skipped.
pub fn separation<'a, I>(agent: &Agent, neighbors: I, radius: f32, strength: f32) -> Vector2D
where
    I: Iterator<Item = &'a Agent>,
{
    let mut steering = Vector2D::zero();
    let mut count = 0;

    for other in neighbors {
        let offset = agent.position - other.position;
        let distance = offset.magnitude();
        if distance > 0.0 && distance < radius {
            let weight = (radius - distance) / radius;
            steering += offset.normalize() * weight;
            count += 1;
        }
    }

    if count > 0 {
        steering = steering / count as f32;
    }

    if steering.magnitude() < 0.0001 {
        return Vector2D::zero();
    }

    steering.normalize() * strength
}

/// Avoidance of one other agent based on where both will be in
/// `look_ahead_time` ticks.
///
/// Only `agent` is pushed; the pair must be evaluated from both sides to
/// move both.
pub fn predictive_avoidance(
    agent: &Agent,
    other: &Agent,
    look_ahead_time: f32,
    max_avoid_force: f32,
) -> Vector2D {
    let future_self = agent.position + agent.velocity * look_ahead_time;
    let future_other = other.position + other.velocity * look_ahead_time;
    let offset = future_self - future_other;
    let distance = offset.magnitude();

    if distance < PREDICTIVE_COMBINED_RADIUS && distance > 0.001 {
        let depth = (PREDICTIVE_COMBINED_RADIUS - distance) / PREDICTIVE_COMBINED_RADIUS;
        offset.normalize() * (max_avoid_force * (0.4 + 0.6 * depth))
    } else {
        Vector2D::zero()
    }
}

/// Sum of [`predictive_avoidance`] against every neighbor.
pub fn predictive_avoidance_all<'a, I>(
    agent: &Agent,
    neighbors: I,
    look_ahead_time: f32,
    max_avoid_force: f32,
) -> Vector2D
where
    I: Iterator<Item = &'a Agent>,
{
    let mut steering = Vector2D::zero();
    for other in neighbors {
        steering += predictive_avoidance(agent, other, look_ahead_time, max_avoid_force);
    }
    steering
}

pub fn obstacle_avoidance(
    agent: &Agent,
    obstacles: &[Obstacle],
    look_ahead: f32,
    avoid_strength: f32,
) -> Vector2D {
    let heading = agent.velocity.direction_or(Vector2D::UP);
    let ahead = agent.position + heading * look_ahead;
    let mut steering = Vector2D::zero();

    for obstacle in obstacles {
        let buffered = obstacle.radius + OBSTACLE_BUFFER;
        let ahead_offset = ahead - obstacle.center;
        let ahead_distance = ahead_offset.magnitude();

        if ahead_distance < buffered {
            let penetration = buffered - ahead_distance;
            steering += ahead_offset.normalize() * (penetration * avoid_strength);
        } else {
            // look-ahead is clear, but we may already be inside
            let offset = agent.position - obstacle.center;
            let distance = offset.magnitude();
            if distance < buffered {
                let penetration = buffered - distance;
                steering +=
                    offset.normalize() * (penetration * avoid_strength * OBSTACLE_INSIDE_FACTOR);
            }
        }
    }

    if steering.magnitude() < 0.001 {
        return Vector2D::zero();
    }
    steering.limit(avoid_strength)
}

/// Inward push ramping from zero at `margin` to `strength` at the edge.
pub fn wall_avoidance(agent: &Agent, bounds: Bounds, margin: f32, strength: f32) -> Vector2D {
    let position = agent.position;
    Vector2D::new(
        axis_push(position.x, bounds.width, margin, strength),
        axis_push(position.y, bounds.height, margin, strength),
    )
}

fn axis_push(coordinate: f32, extent: f32, margin: f32, strength: f32) -> f32 {
    if coordinate < margin {
        strength * (1.0 - coordinate / margin)
    } else if coordinate > extent - margin {
        -strength * (1.0 - (extent - coordinate) / margin)
    } else {
        0.0
    }
}

/// Arrive at the current waypoint, moving on to the next one (wrapping)
/// once within `waypoint_radius` of it.
///
/// Returns a desired velocity. `path_index` is reset to 0 when it points
/// past the end of `path`.
pub fn path_following(
    agent: &Agent,
    path: &[Vector2D],
    path_index: &mut usize,
    waypoint_radius: f32,
) -> Vector2D {
    if path.is_empty() {
        return Vector2D::zero();
    }
    if *path_index >= path.len() {
        *path_index = 0;
    }

    let mut waypoint = path[*path_index];
    if waypoint.distance(&agent.position) < waypoint_radius {
        *path_index = (*path_index + 1) % path.len();
        waypoint = path[*path_index];
        log::trace!("waypoint reached, heading to #{}", *path_index);
    }

    arrive(
        agent.position,
        waypoint,
        agent.max_speed,
        waypoint_radius * PATH_SLOWING_FACTOR,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn still(x: f32, y: f32) -> Agent {
        Agent::new(Vector2D::new(x, y), Vector2D::zero(), 2.5, 0.14)
    }

    fn approx(a: Vector2D, b: Vector2D) -> bool {
        (a - b).magnitude() < 1e-5
    }

    #[test]
    fn test_separation_no_neighbors() {
        let agent = still(0.0, 0.0);
        assert_eq!(separation(&agent, core::iter::empty(), 48.0, 0.9), Vector2D::zero());

        let far = [still(100.0, 0.0), still(0.0, -48.0)];
        assert_eq!(separation(&agent, far.iter(), 48.0, 0.9), Vector2D::zero());
    }

    #[test]
    fn test_separation_skips_coincident_neighbor() {
        let agent = still(5.0, 5.0);
        let twin = [still(5.0, 5.0)];
        assert_eq!(separation(&agent, twin.iter(), 48.0, 0.9), Vector2D::zero());
    }

    #[test]
    fn test_separation_has_fixed_strength() {
        let agent = still(0.0, 0.0);
        let neighbors = [still(10.0, 0.0), still(0.0, 30.0)];
        let steering = separation(&agent, neighbors.iter(), 48.0, 0.9);

        assert!((steering.magnitude() - 0.9).abs() < 1e-5);
        assert!(steering.x < 0.0 && steering.y < 0.0);
        // the closer neighbor dominates
        assert!(steering.x.abs() > steering.y.abs());
    }

    #[test]
    fn test_predictive_avoidance_head_on() {
        let a = Agent::new(Vector2D::new(0.0, 0.0), Vector2D::new(2.0, 0.0), 2.5, 0.14);
        let b = Agent::new(Vector2D::new(30.0, 0.0), Vector2D::new(-2.0, 0.0), 2.5, 0.14);

        // after 5 ticks they are 10 apart
        let push = predictive_avoidance(&a, &b, 5.0, 1.0);
        let depth = (24.0 - 10.0) / 24.0;
        assert!(approx(push, Vector2D::new(-(0.4 + 0.6 * depth), 0.0)));

        let other_side = predictive_avoidance(&b, &a, 5.0, 1.0);
        assert!(approx(other_side, -push));
    }

    #[test]
    fn test_predictive_avoidance_force_range() {
        let a = still(0.0, 0.0);
        for d in [0.01_f32, 1.0, 12.0, 23.9] {
            let b = still(d, 0.0);
            let magnitude = predictive_avoidance(&a, &b, 0.9, 0.9).magnitude();
            assert!(magnitude >= 0.9 * 0.4 - 1e-5);
            assert!(magnitude <= 0.9 + 1e-5);
        }
    }

    #[test]
    fn test_predictive_avoidance_clear_or_degenerate() {
        let a = still(0.0, 0.0);
        assert_eq!(predictive_avoidance(&a, &still(24.0, 0.0), 0.9, 0.9), Vector2D::zero());
        assert_eq!(predictive_avoidance(&a, &still(0.0, 0.0), 0.9, 0.9), Vector2D::zero());
    }

    #[test]
    fn test_predictive_avoidance_sums_pairs() {
        let a = still(0.0, 0.0);
        let neighbors = [still(10.0, 0.0), still(-10.0, 0.0)];
        // symmetric threats cancel out
        let total = predictive_avoidance_all(&a, neighbors.iter(), 0.9, 0.9);
        assert!(total.magnitude() < 1e-5);
    }

    #[test]
    fn test_obstacle_avoidance_clear_path() {
        let agent = Agent::new(Vector2D::new(0.0, 0.0), Vector2D::new(1.0, 0.0), 2.5, 0.14);
        let obstacles = [Obstacle::new(Vector2D::new(0.0, 300.0), 40.0)];
        assert_eq!(obstacle_avoidance(&agent, &obstacles, 70.0, 1.2), Vector2D::zero());
        assert_eq!(obstacle_avoidance(&agent, &[], 70.0, 1.2), Vector2D::zero());
    }

    #[test]
    fn test_obstacle_avoidance_inside_uses_weaker_push() {
        // heading away so the look-ahead point is clear
        let agent = Agent::new(Vector2D::new(0.0, 67.5), Vector2D::new(0.0, 1.0), 2.5, 0.14);
        let obstacles = [Obstacle::new(Vector2D::new(0.0, 0.0), 60.0)];
        let steering = obstacle_avoidance(&agent, &obstacles, 70.0, 1.2);

        // penetration 0.5 * 1.2 * 0.8
        assert!(approx(steering, Vector2D::new(0.0, 0.48)));
    }

    #[test]
    fn test_obstacle_avoidance_still_agent_looks_up() {
        let agent = still(100.0, 100.0);
        let obstacles = [Obstacle::new(Vector2D::new(100.0, 20.0), 20.0)];
        let steering = obstacle_avoidance(&agent, &obstacles, 70.0, 1.2);
        assert!(steering.y > 0.0);
    }

    #[test]
    fn test_wall_avoidance_ramp_and_corner() {
        let bounds = Bounds::new(200.0, 100.0);

        let centered = still(100.0, 50.0);
        assert_eq!(wall_avoidance(&centered, bounds, 40.0, 1.6), Vector2D::zero());

        let half_left = still(20.0, 50.0);
        assert!(approx(
            wall_avoidance(&half_left, bounds, 40.0, 1.6),
            Vector2D::new(0.8, 0.0)
        ));

        let corner = still(200.0, 0.0);
        assert!(approx(
            wall_avoidance(&corner, bounds, 40.0, 1.6),
            Vector2D::new(-1.6, 1.6)
        ));
    }

    #[test]
    fn test_path_following_advances_and_wraps() {
        let path = [Vector2D::new(0.0, 0.0), Vector2D::new(100.0, 0.0)];
        let agent = still(99.0, 0.0);
        let mut index = 1;

        let desired = path_following(&agent, &path, &mut index, 22.0);
        assert_eq!(index, 0);
        assert!(desired.x < 0.0);
    }

    #[test]
    fn test_path_following_resets_stale_index() {
        let path = [Vector2D::new(0.0, 0.0), Vector2D::new(100.0, 0.0)];
        let agent = still(50.0, 50.0);
        let mut index = 9;
        path_following(&agent, &path, &mut index, 22.0);
        assert_eq!(index, 0);
    }

    #[test]
    fn test_path_following_single_waypoint() {
        let path = [Vector2D::new(10.0, 10.0)];
        let mut index = 0;
        for position in [Vector2D::new(10.0, 10.0), Vector2D::new(500.0, 10.0)] {
            let agent = Agent::new(position, Vector2D::zero(), 3.0, 0.1);
            let desired = path_following(&agent, &path, &mut index, 22.0);
            assert_eq!(index, 0);
            assert_eq!(desired, arrive(position, path[0], 3.0, 55.0));
        }
    }

    #[test]
    fn test_path_following_empty_path() {
        let mut index = 3;
        assert_eq!(
            path_following(&still(0.0, 0.0), &[], &mut index, 22.0),
            Vector2D::zero()
        );
    }
}
