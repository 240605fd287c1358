//! Reducing several steering contributions to one force.

use crate::vector::Vector2D;

/// Contributions at or below this magnitude are ignored by priority selection.
pub const DEFAULT_PRIORITY_EPSILON: f32 = 0.001;

/// Returns the first contribution whose magnitude exceeds `epsilon`.
///
/// `ordered` is highest priority first. Falls back to the zero vector when
/// everything is negligible.
pub fn priority_select(ordered: &[Vector2D], epsilon: f32) -> Vector2D {
    ordered
        .iter()
        .copied()
        .find(|force| force.magnitude() > epsilon)
        .unwrap_or_else(Vector2D::zero)
}

/// Weighted sum of `(contribution, weight)` pairs, clamped to `max_force`.
pub fn weighted_blend(weighted: &[(Vector2D, f32)], max_force: f32) -> Vector2D {
    let mut total = Vector2D::zero();
    for &(force, weight) in weighted {
        total += force * weight;
    }
    total.limit(max_force)
}

/// One tick's worth of group/environment steering for a single agent.
///
/// Disabled behaviors contribute the zero vector.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Contributions {
    pub obstacle: Vector2D,
    pub wall: Vector2D,
    pub predictive: Vector2D,
    pub separation: Vector2D,
    pub path: Vector2D,
}

/// Force arbitration policy
pub trait CombinationStrategy {
    fn combine(&self, contributions: &Contributions, max_force: f32) -> Vector2D;
}

/// Urgent forces override navigation instead of being diluted by it.
///
/// Contributions are grouped into three tiers (danger, crowding, navigation),
/// each tier weighted and clamped to `max_force` before selection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PrioritySelection {
    pub epsilon: f32,
    pub obstacle_weight: f32,
    pub wall_weight: f32,
    pub predictive_weight: f32,
    pub separation_weight: f32,
    pub path_weight: f32,
}

impl Default for PrioritySelection {
    fn default() -> Self {
        Self {
            epsilon: DEFAULT_PRIORITY_EPSILON,
            obstacle_weight: 2.0,
            wall_weight: 1.8,
            predictive_weight: 1.4,
            separation_weight: 1.2,
            path_weight: 0.9,
        }
    }
}

impl PrioritySelection {
    pub fn tiers(&self, c: &Contributions, max_force: f32) -> [Vector2D; 3] {
        [
            (c.obstacle * self.obstacle_weight + c.wall * self.wall_weight).limit(max_force),
            (c.predictive * self.predictive_weight + c.separation * self.separation_weight)
                .limit(max_force),
            (c.path * self.path_weight).limit(max_force),
        ]
    }
}

impl CombinationStrategy for PrioritySelection {
    fn combine(&self, contributions: &Contributions, max_force: f32) -> Vector2D {
        priority_select(&self.tiers(contributions, max_force), self.epsilon)
    }
}

/// Smooth blend of everything at once
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightedBlend {
    pub obstacle_weight: f32,
    pub wall_weight: f32,
    pub predictive_weight: f32,
    pub separation_weight: f32,
    pub path_weight: f32,
}

impl Default for WeightedBlend {
    fn default() -> Self {
        Self {
            obstacle_weight: 1.8,
            wall_weight: 1.4,
            predictive_weight: 1.2,
            separation_weight: 1.0,
            path_weight: 0.9,
        }
    }
}

impl CombinationStrategy for WeightedBlend {
    fn combine(&self, c: &Contributions, max_force: f32) -> Vector2D {
        weighted_blend(
            &[
                (c.obstacle, self.obstacle_weight),
                (c.wall, self.wall_weight),
                (c.predictive, self.predictive_weight),
                (c.separation, self.separation_weight),
                (c.path, self.path_weight),
            ],
            max_force,
        )
    }
}

/// The configured strategy
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Combination {
    Priority(PrioritySelection),
    Weighted(WeightedBlend),
}

impl Default for Combination {
    fn default() -> Self {
        Combination::Priority(PrioritySelection::default())
    }
}

impl Combination {
    pub fn priority() -> Self {
        Combination::Priority(PrioritySelection::default())
    }

    pub fn weighted() -> Self {
        Combination::Weighted(WeightedBlend::default())
    }

    pub fn name(&self) -> &'static str {
        match self {
            Combination::Priority(_) => "priority",
            Combination::Weighted(_) => "weighted",
        }
    }
}

impl CombinationStrategy for Combination {
    fn combine(&self, contributions: &Contributions, max_force: f32) -> Vector2D {
        match self {
            Combination::Priority(strategy) => strategy.combine(contributions, max_force),
            Combination::Weighted(strategy) => strategy.combine(contributions, max_force),
        }
    }
}
