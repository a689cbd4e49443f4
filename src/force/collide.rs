use super::{Body, CellGrid, Force, Jitter};

/// Pushes apart bodies whose circles overlap. Works on predicted positions
/// (position + velocity) and is not scaled by alpha. Strength 0 disables it.
#[derive(Debug, Clone)]
pub struct Collide {
    radius: f32,
    strength: f32,
    iterations: usize,
}

impl Collide {
    pub fn new(radius: f32) -> Self {
        Self {
            radius,
            strength: 1.0,
            iterations: 1,
        }
    }

    pub fn strength(mut self, strength: f32) -> Self {
        self.strength = strength.clamp(0.0, 1.0);
        self
    }

    pub fn iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations.max(1);
        self
    }
}

impl Force for Collide {
    fn apply(&mut self, bodies: &mut [Body], _alpha: f32, jitter: &mut Jitter) {
        if self.strength == 0.0 || self.radius <= 0.0 || bodies.len() < 2 {
            return;
        }
        let r = self.radius * 2.0;
        let r2 = r * r;
        // Equal radii: each body of a colliding pair takes half the push.
        let share = 0.5;

        for _ in 0..self.iterations {
            let grid = CellGrid::build(bodies.iter().map(Body::predicted), r);
            for i in 0..bodies.len() {
                let near: Vec<usize> = grid
                    .around(bodies[i].predicted())
                    .filter(|&j| j > i)
                    .collect();
                for j in near {
                    let xi = bodies[i].predicted();
                    let mut delta = xi - bodies[j].predicted();
                    let mut l = delta.length_squared();
                    if l >= r2 {
                        continue;
                    }
                    if delta.x == 0.0 {
                        delta.x = jitter.nudge();
                        l += delta.x * delta.x;
                    }
                    if delta.y == 0.0 {
                        delta.y = jitter.nudge();
                        l += delta.y * delta.y;
                    }
                    let l = l.sqrt();
                    let push = delta * ((r - l) / l * self.strength);
                    bodies[i].velocity += push * share;
                    bodies[j].velocity -= push * share;
                }
            }
        }
    }
}
