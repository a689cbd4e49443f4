//! Force-directed simulation: bodies accumulate velocity from a set of forces,
//! velocity decays each step, and a cooling `alpha` scales every force until
//! it drops below `ALPHA_MIN`.

mod collide;
mod grid;
mod link;
mod many_body;
mod position;

use bevy::math::Vec2;
use bevy::log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub use collide::Collide;
pub use grid::CellGrid;
pub use link::Link;
pub use many_body::ManyBody;
pub use position::{Axis, Position};

/// Alpha below which a simulation stops stepping.
pub const ALPHA_MIN: f32 = 0.001;
/// Stock cooling rate: alpha reaches `ALPHA_MIN` after about 300 ticks.
pub const DEFAULT_ALPHA_DECAY: f32 = 0.022_763_76;
/// Fraction of velocity lost per tick.
pub const DEFAULT_VELOCITY_DECAY: f32 = 0.4;

/// One simulated point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Body {
    pub position: Vec2,
    pub velocity: Vec2,
    /// Pinned bodies are held at this position and never accumulate velocity.
    pub pin: Option<Vec2>,
}

impl Body {
    pub fn at(position: Vec2) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            pin: None,
        }
    }

    pub fn pinned(position: Vec2) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            pin: Some(position),
        }
    }

    /// Where the body will be after this tick if nothing else pushes it.
    pub fn predicted(&self) -> Vec2 {
        self.position + self.velocity
    }
}

/// Tiny random offsets used to separate coincident bodies.
pub struct Jitter(StdRng);

impl Jitter {
    pub fn seeded(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }

    pub fn nudge(&mut self) -> f32 {
        (self.0.random::<f32>() - 0.5) * 1e-6
    }
}

/// A force contributes velocity to bodies once per tick.
pub trait Force: Send + Sync {
    /// Called once when the force joins a simulation.
    fn initialize(&mut self, _bodies: &[Body]) {}

    fn apply(&mut self, bodies: &mut [Body], alpha: f32, jitter: &mut Jitter);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimulationState {
    Running,
    /// Alpha fell below `ALPHA_MIN`; ticks are no-ops.
    Cooled,
    /// Stopped by its owner. Terminal.
    Stopped,
}

pub struct Simulation {
    bodies: Vec<Body>,
    forces: Vec<(&'static str, Box<dyn Force>)>,
    alpha: f32,
    alpha_decay: f32,
    alpha_target: f32,
    velocity_decay: f32,
    jitter: Jitter,
    state: SimulationState,
    ticks: u64,
}

impl Simulation {
    pub fn new(mut bodies: Vec<Body>, seed: u64) -> Self {
        for body in &mut bodies {
            if let Some(pin) = body.pin {
                body.position = pin;
            }
        }
        Self {
            bodies,
            forces: Vec::new(),
            alpha: 1.0,
            alpha_decay: DEFAULT_ALPHA_DECAY,
            alpha_target: 0.0,
            velocity_decay: DEFAULT_VELOCITY_DECAY,
            jitter: Jitter::seeded(seed),
            state: SimulationState::Running,
            ticks: 0,
        }
    }

    pub fn alpha_decay(mut self, decay: f32) -> Self {
        self.alpha_decay = decay.clamp(0.0, 1.0);
        self
    }

    pub fn velocity_decay(mut self, decay: f32) -> Self {
        self.velocity_decay = decay.clamp(0.0, 1.0);
        self
    }

    /// Register a named force; it is initialized against the current bodies.
    pub fn with_force(mut self, name: &'static str, mut force: Box<dyn Force>) -> Self {
        force.initialize(&self.bodies);
        self.forces.push((name, force));
        self
    }

    pub fn force_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.forces.iter().map(|(name, _)| *name)
    }

    /// Advance one step. Returns false without moving anything once the
    /// simulation has cooled or been stopped.
    pub fn tick(&mut self) -> bool {
        if self.state != SimulationState::Running {
            return false;
        }

        self.alpha += (self.alpha_target - self.alpha) * self.alpha_decay;
        for (_, force) in &mut self.forces {
            force.apply(&mut self.bodies, self.alpha, &mut self.jitter);
        }

        let keep = 1.0 - self.velocity_decay;
        for body in &mut self.bodies {
            match body.pin {
                Some(pin) => {
                    body.position = pin;
                    body.velocity = Vec2::ZERO;
                }
                None => {
                    body.velocity *= keep;
                    body.position += body.velocity;
                }
            }
        }

        self.ticks += 1;
        if self.alpha < ALPHA_MIN {
            self.state = SimulationState::Cooled;
            debug!("simulation cooled after {} ticks", self.ticks);
        }
        true
    }

    /// Stop for good. Returns false if it was already stopped.
    pub fn stop(&mut self) -> bool {
        if self.state == SimulationState::Stopped {
            return false;
        }
        self.state = SimulationState::Stopped;
        true
    }

    pub fn state(&self) -> SimulationState {
        self.state
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    pub fn positions(&self) -> Vec<Vec2> {
        self.bodies.iter().map(|b| b.position).collect()
    }
}
