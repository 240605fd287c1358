use rand::{rngs::StdRng, SeedableRng};
use steer_core::behavior::{self, random_jitter};
use steer_core::group::{self, OBSTACLE_BUFFER};
use steer_core::{
    Agent, BehaviorToggles, Bounds, Combination, Crowd, CrowdConfig, Environment, Obstacle, Pilot,
    PilotConfig, SingleBehavior, Target, TargetTracker, Vector2D,
};

fn reference_path() -> Vec<Vector2D> {
    [
        (150.0, 120.0),
        (400.0, 90.0),
        (800.0, 150.0),
        (920.0, 300.0),
        (800.0, 520.0),
        (520.0, 620.0),
        (240.0, 500.0),
        (100.0, 350.0),
    ]
    .iter()
    .map(|&(x, y)| Vector2D::new(x, y))
    .collect()
}

fn reference_obstacles() -> Vec<Obstacle> {
    vec![
        Obstacle::new(Vector2D::new(500.0, 320.0), 60.0),
        Obstacle::new(Vector2D::new(300.0, 380.0), 45.0),
        Obstacle::new(Vector2D::new(700.0, 460.0), 55.0),
    ]
}

#[test]
fn seek_then_integrate_once() {
    let agent = Agent::new(Vector2D::zero(), Vector2D::zero(), 3.0, 0.12);
    let target = Vector2D::new(100.0, 0.0);

    assert_eq!(
        behavior::seek(agent.position, target, agent.max_speed),
        Vector2D::new(3.0, 0.0)
    );

    let mut pilot = Pilot::new(agent, PilotConfig::default());
    pilot.tick(&Target::stationary(target), Bounds::new(1800.0, 1000.0), 0.0);

    assert!((pilot.agent.velocity.x - 0.12).abs() < 1e-6);
    assert_eq!(pilot.agent.velocity.y, 0.0);
    assert!((pilot.agent.position.x - 0.12).abs() < 1e-6);
    assert_eq!(pilot.agent.position.y, 0.0);
}

#[test]
fn two_agents_push_apart() {
    let a = Agent::new(Vector2D::new(0.0, 0.0), Vector2D::zero(), 2.4, 0.14);
    let b = Agent::new(Vector2D::new(10.0, 0.0), Vector2D::zero(), 2.4, 0.14);

    let away_from_b = group::separation(&a, std::iter::once(&b), 48.0, 0.9);
    let away_from_a = group::separation(&b, std::iter::once(&a), 48.0, 0.9);

    assert!((away_from_b - Vector2D::new(-0.9, 0.0)).magnitude() < 1e-6);
    assert!((away_from_a - Vector2D::new(0.9, 0.0)).magnitude() < 1e-6);
}

#[test]
fn heading_into_obstacle_steers_away() {
    let obstacle = Obstacle::new(Vector2D::new(200.0, 100.0), 40.0);
    // starts outside the buffered circle, moving straight at the center
    let start_x = 200.0 - obstacle.radius - OBSTACLE_BUFFER - 30.0;
    let agent = Agent::new(Vector2D::new(start_x, 100.0), Vector2D::new(2.0, 0.0), 2.4, 0.14);

    let steering = group::obstacle_avoidance(&agent, &[obstacle], 70.0, 1.2);

    assert!(steering.magnitude() > 0.0);
    assert!(steering.magnitude() <= 1.2 + 1e-6);
    let to_center = obstacle.center - agent.position;
    assert!(steering.x * to_center.x + steering.y * to_center.y < 0.0);
}

#[test]
fn single_point_path_never_advances() {
    let path = [Vector2D::new(300.0, 300.0)];
    let config = CrowdConfig {
        toggles: BehaviorToggles {
            path_following: true,
            separation: false,
            predictive_avoidance: false,
            obstacle_avoidance: false,
            wall_avoidance: false,
        },
        ..Default::default()
    };
    let mut crowd = Crowd::<1>::new(config);
    crowd
        .add_agent(Agent::new(Vector2D::new(250.0, 300.0), Vector2D::zero(), 2.4, 0.14))
        .unwrap();

    let env = Environment::new(Bounds::new(1800.0, 1000.0), &[], &path);
    for _ in 0..600 {
        crowd.update(&env);
        assert_eq!(crowd.agents[0].path_index, 0);
    }
    assert!(crowd.agents[0].position.distance(&path[0]) < 22.0);
}

#[test]
fn reference_scene_runs_clean_with_both_strategies() {
    let bounds = Bounds::new(1800.0, 1000.0);
    let path = reference_path();
    let obstacles = reference_obstacles();
    let env = Environment::new(bounds, &obstacles, &path);

    for combination in [Combination::priority(), Combination::weighted()] {
        let mut rng = StdRng::seed_from_u64(42);
        let mut crowd = Crowd::<32>::new(CrowdConfig {
            combination,
            ..Default::default()
        });
        assert_eq!(crowd.populate(&mut rng, bounds, path.len(), 12), 12);

        for _ in 0..1_000 {
            crowd.update(&env);
        }

        for agent in crowd.agents.iter() {
            assert!(agent.position.is_finite());
            assert!(agent.velocity.magnitude() <= agent.max_speed + 1e-5);
            assert!(agent.path_index < path.len());
            assert!(agent.position.x >= -60.0 && agent.position.x <= bounds.width + 60.0);
            assert!(agent.position.y >= -60.0 && agent.position.y <= bounds.height + 60.0);
        }
    }
}

#[test]
fn crowd_makes_progress_along_path() {
    let bounds = Bounds::new(1800.0, 1000.0);
    let path = reference_path();
    let env = Environment::new(bounds, &[], &path);

    let mut crowd = Crowd::<1>::new(CrowdConfig::default());
    crowd
        .add_agent(Agent::new(Vector2D::new(150.0, 160.0), Vector2D::zero(), 2.5, 0.14))
        .unwrap();

    let mut visited = vec![false; path.len()];
    for _ in 0..5_000 {
        crowd.update(&env);
        visited[crowd.agents[0].path_index] = true;
    }
    assert!(visited.iter().all(|&v| v), "visited: {:?}", visited);
}

#[test]
fn wandering_pilot_stays_on_screen() {
    let bounds = Bounds::new(800.0, 600.0);
    let agent = Agent::new(Vector2D::new(400.0, 300.0), Vector2D::new(0.05, 0.0), 3.0, 0.12);
    let mut pilot = Pilot::new(
        agent,
        PilotConfig {
            behavior: SingleBehavior::Wander,
            ..Default::default()
        },
    );
    let mut rng = StdRng::seed_from_u64(5);
    let mut tracker = TargetTracker::new();
    let target = tracker.observe(Vector2D::new(0.0, 0.0));

    let mut angle_changed = false;
    for _ in 0..2_000 {
        let before = pilot.agent.wander_angle;
        pilot.tick(&target, bounds, random_jitter(&mut rng));
        angle_changed |= pilot.agent.wander_angle != before;
        assert!(bounds.contains(pilot.agent.position));
    }
    assert!(angle_changed);
}
