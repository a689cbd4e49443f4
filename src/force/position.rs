use bevy::math::Vec2;

use super::{Body, Force, Jitter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

impl Axis {
    fn of(self, v: Vec2) -> f32 {
        match self {
            Axis::X => v.x,
            Axis::Y => v.y,
        }
    }
}

/// Pulls each body along one axis toward its own target coordinate.
#[derive(Debug, Clone)]
pub struct Position {
    axis: Axis,
    strength: f32,
    targets: Vec<f32>,
}

impl Position {
    /// Anchor every body to the coordinate it has when the force is
    /// initialized.
    pub fn anchored(axis: Axis) -> Self {
        Self {
            axis,
            strength: 0.1,
            targets: Vec::new(),
        }
    }

    pub fn strength(mut self, strength: f32) -> Self {
        self.strength = strength;
        self
    }
}

impl Force for Position {
    fn initialize(&mut self, bodies: &[Body]) {
        self.targets = bodies.iter().map(|b| self.axis.of(b.position)).collect();
    }

    fn apply(&mut self, bodies: &mut [Body], alpha: f32, _jitter: &mut Jitter) {
        let k = self.strength * alpha;
        for (body, &target) in bodies.iter_mut().zip(&self.targets) {
            let pull = (target - self.axis.of(body.position)) * k;
            match self.axis {
                Axis::X => body.velocity.x += pull,
                Axis::Y => body.velocity.y += pull,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anchored_targets_are_captured_at_initialize() {
        let mut bodies = vec![Body::at(Vec2::new(5.0, 7.0))];
        let mut fx = Position::anchored(Axis::X);
        let mut fy = Position::anchored(Axis::Y);
        fx.initialize(&bodies);
        fy.initialize(&bodies);

        bodies[0].position = Vec2::new(15.0, 3.0);
        let mut jitter = Jitter::seeded(0);
        fx.apply(&mut bodies, 1.0, &mut jitter);
        fy.apply(&mut bodies, 1.0, &mut jitter);
        assert!((bodies[0].velocity.x + 1.0).abs() < 1e-6);
        assert!((bodies[0].velocity.y - 0.4).abs() < 1e-6);
    }

    #[test]
    fn pull_scales_with_strength_and_alpha() {
        let mut bodies = vec![Body::at(Vec2::new(10.0, 0.0)), Body::at(Vec2::new(-10.0, 0.0))];
        let mut f = Position::anchored(Axis::X).strength(0.5);
        f.initialize(&bodies);
        bodies[0].position.x = 0.0;
        bodies[1].position.x = 0.0;
        f.apply(&mut bodies, 0.5, &mut Jitter::seeded(0));
        assert_eq!(bodies[0].velocity.x, 2.5);
        assert_eq!(bodies[1].velocity.x, -2.5);
        assert_eq!(bodies[0].velocity.y, 0.0);
    }

    #[test]
    fn uninitialized_force_is_inert() {
        let mut bodies = vec![Body::at(Vec2::new(3.0, 3.0))];
        Position::anchored(Axis::Y).apply(&mut bodies, 1.0, &mut Jitter::seeded(0));
        assert_eq!(bodies[0].velocity, Vec2::ZERO);
    }
}
