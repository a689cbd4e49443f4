//! Primary layout: original nodes held near their mapped coordinates while
//! collision keeps them from overlapping.

use bevy::log::info;

use crate::core::config::LayoutConfig;
use crate::core::network::Node;
use crate::force::{Axis, Body, Collide, Position, Simulation, SimulationState};
use crate::layout::segments::PositionSnapshot;
use crate::render::LayoutRenderer;

pub struct PrimaryLayout {
    nodes: Vec<Node>,
    simulation: Simulation,
}

impl PrimaryLayout {
    /// Build the simulation over `nodes`, whose positions must already be
    /// mapped to screen space.
    pub fn start(nodes: Vec<Node>, config: &LayoutConfig) -> Self {
        let bodies = nodes
            .iter()
            .map(|n| match n.pin {
                Some(pin) => Body::pinned(pin),
                None => Body::at(n.position),
            })
            .collect();

        let mut simulation =
            Simulation::new(bodies, config.seed).velocity_decay(config.velocity_decay);
        if let Some(decay) = config.primary_alpha_decay {
            simulation = simulation.alpha_decay(decay);
        }
        let simulation = simulation
            .with_force(
                "collide",
                Box::new(
                    Collide::new(config.node_radius)
                        .strength(config.collide_strength)
                        .iterations(config.collide_iterations),
                ),
            )
            .with_force(
                "x",
                Box::new(Position::anchored(Axis::X).strength(config.position_strength)),
            )
            .with_force(
                "y",
                Box::new(Position::anchored(Axis::Y).strength(config.position_strength)),
            );

        info!("primary layout started over {} nodes", nodes.len());
        Self { nodes, simulation }
    }

    /// Step once and publish the new positions. Does nothing once cooled.
    pub fn tick(&mut self, renderer: &mut dyn LayoutRenderer) -> bool {
        if !self.simulation.tick() {
            return false;
        }
        for (node, body) in self.nodes.iter_mut().zip(self.simulation.bodies()) {
            node.position = body.position;
        }
        renderer.update_nodes(&self.simulation.positions());
        true
    }

    pub fn is_cooled(&self) -> bool {
        self.simulation.state() == SimulationState::Cooled
    }

    pub fn ticks(&self) -> u64 {
        self.simulation.ticks()
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Stop the simulation for good and hand over the final positions.
    pub fn stop(&mut self) -> PositionSnapshot {
        self.simulation.stop();
        PositionSnapshot::new(self.nodes.clone())
    }
}
