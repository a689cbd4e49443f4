use bevy::math::Vec2;

use super::{Body, Force, Jitter};

/// Spring along each link toward a rest length. The correction is split
/// between the two ends in proportion to their degree, so hubs move less.
#[derive(Debug, Clone)]
pub struct Link {
    links: Vec<(usize, usize)>,
    /// `None` uses `1 / min(degree(source), degree(target))` per link.
    strength: Option<f32>,
    distance: f32,
    strengths: Vec<f32>,
    bias: Vec<f32>,
}

impl Link {
    pub fn new(links: Vec<(usize, usize)>) -> Self {
        Self {
            links,
            strength: None,
            distance: 30.0,
            strengths: Vec::new(),
            bias: Vec::new(),
        }
    }

    pub fn strength(mut self, strength: f32) -> Self {
        self.strength = Some(strength);
        self
    }

    pub fn distance(mut self, distance: f32) -> Self {
        self.distance = distance;
        self
    }

    pub fn links(&self) -> &[(usize, usize)] {
        &self.links
    }
}

impl Force for Link {
    fn initialize(&mut self, bodies: &[Body]) {
        self.links.retain(|&(s, t)| s < bodies.len() && t < bodies.len());

        let mut degree = vec![0u32; bodies.len()];
        for &(s, t) in &self.links {
            degree[s] += 1;
            degree[t] += 1;
        }

        self.bias = self
            .links
            .iter()
            .map(|&(s, t)| degree[s] as f32 / (degree[s] + degree[t]) as f32)
            .collect();
        self.strengths = self
            .links
            .iter()
            .map(|&(s, t)| match self.strength {
                Some(k) => k,
                None => 1.0 / degree[s].min(degree[t]) as f32,
            })
            .collect();
    }

    fn apply(&mut self, bodies: &mut [Body], alpha: f32, jitter: &mut Jitter) {
        for (k, &(s, t)) in self.links.iter().enumerate() {
            let mut delta = bodies[t].predicted() - bodies[s].predicted();
            if delta.x == 0.0 {
                delta.x = jitter.nudge();
            }
            if delta.y == 0.0 {
                delta.y = jitter.nudge();
            }
            let l = delta.length();
            let stretch = (l - self.distance) / l * alpha * self.strengths[k];
            let correction: Vec2 = delta * stretch;
            let b = self.bias[k];
            bodies[t].velocity -= correction * b;
            bodies[s].velocity += correction * (1.0 - b);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_rest_length_pulls_ends_together() {
        let mut bodies = vec![Body::at(Vec2::ZERO), Body::at(Vec2::new(10.0, 0.0))];
        let mut f = Link::new(vec![(0, 1)]).strength(0.7).distance(0.0);
        f.initialize(&bodies);
        f.apply(&mut bodies, 1.0, &mut Jitter::seeded(0));
        // Equal degree: each end takes half of 0.7 * 10.
        assert!((bodies[0].velocity.x - 3.5).abs() < 1e-3);
        assert!((bodies[1].velocity.x + 3.5).abs() < 1e-3);
    }

    #[test]
    fn stretched_beyond_rest_length_only() {
        let mut bodies = vec![Body::at(Vec2::ZERO), Body::at(Vec2::new(0.0, 5.0))];
        let mut f = Link::new(vec![(0, 1)]).distance(10.0);
        f.initialize(&bodies);
        f.apply(&mut bodies, 1.0, &mut Jitter::seeded(0));
        // Shorter than rest length: pushed apart.
        assert!(bodies[0].velocity.y < 0.0);
        assert!(bodies[1].velocity.y > 0.0);
    }

    #[test]
    fn hub_moves_less_than_leaf() {
        let mut bodies = vec![
            Body::at(Vec2::ZERO),
            Body::at(Vec2::new(10.0, 0.0)),
            Body::at(Vec2::new(-10.0, 0.0)),
            Body::at(Vec2::new(0.0, 10.0)),
        ];
        let mut f = Link::new(vec![(0, 1), (0, 2), (0, 3)]).strength(0.5).distance(0.0);
        f.initialize(&bodies);
        f.apply(&mut bodies, 1.0, &mut Jitter::seeded(0));
        let leaf = bodies[1].velocity.length();
        // The hub's pulls partly cancel; compare a single link's share instead.
        assert!(leaf > 3.0);
        assert!((f.bias[0] - 0.75).abs() < 1e-6);
    }

    #[test]
    fn default_strength_uses_min_degree() {
        let bodies = vec![Body::at(Vec2::ZERO); 3];
        let mut f = Link::new(vec![(0, 1), (0, 2)]);
        f.initialize(&bodies);
        assert_eq!(f.strengths, vec![1.0, 1.0]);
    }

    #[test]
    fn drops_links_outside_the_body_set() {
        let bodies = vec![Body::at(Vec2::ZERO); 2];
        let mut f = Link::new(vec![(0, 1), (1, 5)]);
        f.initialize(&bodies);
        assert_eq!(f.links(), &[(0, 1)]);
    }
}
