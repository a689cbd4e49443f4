use bevy::math::Vec2;

use super::{Body, CellGrid, Force, Jitter};

/// Pairwise force between all bodies. Negative strength repels, positive
/// strength attracts. Pairs farther apart than `distance_max` are ignored;
/// with a finite cap the pairs are found through a `CellGrid`.
#[derive(Debug, Clone)]
pub struct ManyBody {
    strength: f32,
    distance_min2: f32,
    distance_max2: f32,
}

impl Default for ManyBody {
    fn default() -> Self {
        Self {
            strength: -30.0,
            distance_min2: 1.0,
            distance_max2: f32::INFINITY,
        }
    }
}

impl ManyBody {
    pub fn new(strength: f32) -> Self {
        Self {
            strength,
            ..Default::default()
        }
    }

    pub fn distance_max(mut self, d: f32) -> Self {
        self.distance_max2 = d * d;
        self
    }

    pub fn distance_min(mut self, d: f32) -> Self {
        self.distance_min2 = d * d;
        self
    }

    /// Velocity `body` gains from `other` at separation `delta = other - body`.
    fn pull(&self, mut delta: Vec2, alpha: f32, jitter: &mut Jitter) -> Option<Vec2> {
        let mut l = delta.length_squared();
        if l >= self.distance_max2 {
            return None;
        }
        if delta.x == 0.0 {
            delta.x = jitter.nudge();
            l += delta.x * delta.x;
        }
        if delta.y == 0.0 {
            delta.y = jitter.nudge();
            l += delta.y * delta.y;
        }
        if l < self.distance_min2 {
            l = (self.distance_min2 * l).sqrt();
        }
        Some(delta * self.strength * alpha / l)
    }
}

impl Force for ManyBody {
    fn apply(&mut self, bodies: &mut [Body], alpha: f32, jitter: &mut Jitter) {
        if self.strength == 0.0 || self.distance_max2 <= 0.0 || bodies.len() < 2 {
            return;
        }
        let positions: Vec<Vec2> = bodies.iter().map(|b| b.position).collect();

        if self.distance_max2.is_finite() {
            let grid = CellGrid::build(positions.iter().copied(), self.distance_max2.sqrt());
            for (i, body) in bodies.iter_mut().enumerate() {
                for j in grid.around(positions[i]) {
                    if j == i {
                        continue;
                    }
                    if let Some(dv) = self.pull(positions[j] - positions[i], alpha, jitter) {
                        body.velocity += dv;
                    }
                }
            }
        } else {
            for (i, body) in bodies.iter_mut().enumerate() {
                for (j, other) in positions.iter().enumerate() {
                    if j == i {
                        continue;
                    }
                    if let Some(dv) = self.pull(*other - positions[i], alpha, jitter) {
                        body.velocity += dv;
                    }
                }
            }
        }
    }
}
